use std::io::{self, Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use super::Word;

/// C1: reads one little-endian 16-bit word, distinguishing a clean
/// end-of-stream (returns `Ok(None)`) from a word cut off after exactly one
/// byte (returns `Err(WordReadError::Truncated)`), which `byteorder`'s
/// `read_exact`-based helpers cannot tell apart. The byte-order decode
/// itself still goes through `byteorder`, same as the teacher's
/// `memory/mod.rs`.
pub enum WordReadError {
    Truncated,
    Io(io::Error),
}

impl From<io::Error> for WordReadError {
    fn from(err: io::Error) -> WordReadError {
        WordReadError::Io(err)
    }
}

pub fn read_word<R: Read>(reader: &mut R) -> Result<Option<Word>, WordReadError> {
    let mut buf = [0u8; 2];
    let mut filled = 0;

    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    match filled {
        0 => Ok(None),
        2 => Ok(Some(LittleEndian::read_u16(&buf))),
        _ => Err(WordReadError::Truncated),
    }
}

pub fn write_word<W: Write>(writer: &mut W, word: Word) -> io::Result<()> {
    let mut buf = [0u8; 2];
    LittleEndian::write_u16(&mut buf, word);
    writer.write_all(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_little_endian_word() {
        let mut cursor = Cursor::new(vec![0x34, 0x12]);
        assert_eq!(read_word(&mut cursor).ok(), Some(Some(0x1234)));
    }

    #[test]
    fn distinguishes_zero_word_from_eof() {
        let mut zero = Cursor::new(vec![0x00, 0x00]);
        assert_eq!(read_word(&mut zero).ok(), Some(Some(0)));

        let mut empty = Cursor::new(Vec::<u8>::new());
        assert_eq!(read_word(&mut empty).ok(), Some(None));
    }

    #[test]
    fn truncated_word_is_an_error() {
        let mut cursor = Cursor::new(vec![0x12]);
        assert!(matches!(read_word(&mut cursor), Err(WordReadError::Truncated)));
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut buf = Vec::new();
        write_word(&mut buf, 0xBEEF).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_word(&mut cursor).ok(), Some(Some(0xBEEF)));
    }
}
