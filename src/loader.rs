use std::io::{Cursor, Read, Write};

use super::constants::{DUMP_MAGIC, MAX_VALID_WORD, REGISTER_COUNT};
use super::error::LoadError;
use super::state::Vm;
use super::word::{read_word, write_word, WordReadError};
use super::Word;

/// C3: detects whether `reader` starts with a snapshot ("DUMP") or a plain
/// image, and loads it into a fresh [`Vm`].
pub fn load<R: Read>(reader: &mut R) -> Result<Vm, LoadError> {
    let mut prefix = [0u8; 4];
    let mut filled = 0;
    while filled < prefix.len() {
        let n = reader.read(&mut prefix[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if filled == prefix.len() && &prefix == DUMP_MAGIC {
        load_snapshot(reader)
    } else {
        load_plain_image(&prefix[..filled], reader)
    }
}

fn load_plain_image<R: Read>(prefix: &[u8], rest: &mut R) -> Result<Vm, LoadError> {
    let mut chained = Cursor::new(prefix.to_vec()).chain(rest);
    let mut words = Vec::new();

    loop {
        match read_word(&mut chained) {
            Ok(Some(word)) => {
                if word > MAX_VALID_WORD {
                    return Err(LoadError::OutOfRange(word));
                }
                words.push(word);
            }
            Ok(None) => break,
            Err(WordReadError::Truncated) => return Err(LoadError::TruncatedImage),
            Err(WordReadError::Io(err)) => return Err(LoadError::Io(err)),
        }
    }

    let mut vm = Vm::new();
    if !vm.memory.load_image(&words) {
        return Err(LoadError::ImageTooLarge { words: words.len() });
    }
    Ok(vm)
}

fn load_snapshot<R: Read>(reader: &mut R) -> Result<Vm, LoadError> {
    let mut vm = Vm::new();

    for index in 0..REGISTER_COUNT {
        vm.set_register(index, expect_word(reader)?);
    }

    let stack_len = expect_word(reader)? as usize;
    let mut stack = Vec::with_capacity(stack_len);
    for _ in 0..stack_len {
        stack.push(expect_word(reader)?);
    }
    vm.stack = stack;

    vm.set_pc(expect_word(reader)? as usize);

    let mut memory_words = Vec::new();
    loop {
        match read_word(reader) {
            Ok(Some(word)) => memory_words.push(word),
            Ok(None) => break,
            Err(WordReadError::Truncated) => return Err(LoadError::TruncatedImage),
            Err(WordReadError::Io(err)) => return Err(LoadError::Io(err)),
        }
    }
    if !vm.memory.load_image(&memory_words) {
        return Err(LoadError::ImageTooLarge {
            words: memory_words.len(),
        });
    }

    Ok(vm)
}

fn expect_word<R: Read>(reader: &mut R) -> Result<Word, LoadError> {
    match read_word(reader)? {
        Some(word) => Ok(word),
        None => Err(LoadError::TruncatedImage),
    }
}

/// Writes a full snapshot of `vm`'s state, per SPEC_FULL.md §4.2.
pub fn write_snapshot<W: Write>(vm: &Vm, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(DUMP_MAGIC)?;

    for register in vm.registers() {
        write_word(writer, *register)?;
    }

    write_word(writer, vm.stack().len() as Word)?;
    for value in vm.stack() {
        write_word(writer, *value)?;
    }

    write_word(writer, vm.pc() as Word)?;

    for word in vm.memory().as_slice() {
        write_word(writer, *word)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_plain_image_words() {
        let bytes: Vec<u8> = [19u16, 72, 0]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        let mut cursor = Cursor::new(bytes);
        let vm = load(&mut cursor).unwrap();
        assert_eq!(vm.memory().read(0), Some(19));
        assert_eq!(vm.memory().read(1), Some(72));
        assert_eq!(vm.memory().read(2), Some(0));
    }

    #[test]
    fn rejects_out_of_range_word() {
        let bytes: Vec<u8> = 32776u16.to_le_bytes().to_vec();
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(load(&mut cursor), Err(LoadError::OutOfRange(32776))));
    }

    #[test]
    fn rejects_truncated_word() {
        let mut cursor = Cursor::new(vec![0x01u8]);
        assert!(matches!(load(&mut cursor), Err(LoadError::TruncatedImage)));
    }

    #[test]
    fn rejects_an_image_longer_than_the_address_space() {
        let word_count = super::super::constants::MEMORY_SIZE + 1;
        let bytes: Vec<u8> = std::iter::repeat(0u16)
            .take(word_count)
            .flat_map(|w| w.to_le_bytes())
            .collect();
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(
            load(&mut cursor),
            Err(LoadError::ImageTooLarge { words }) if words == word_count
        ));
    }

    #[test]
    fn snapshot_round_trips() {
        let mut vm = Vm::new();
        vm.set_register(0, 42);
        vm.set_register(7, 999);
        vm.push(1);
        vm.push(2);
        vm.set_pc(10);
        vm.memory.load_image(&[1, 2, 3, 4]);

        let mut buf = Vec::new();
        write_snapshot(&vm, &mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let restored = load(&mut cursor).unwrap();

        assert_eq!(restored.registers(), vm.registers());
        assert_eq!(restored.stack(), vm.stack());
        assert_eq!(restored.pc(), vm.pc());
        assert_eq!(restored.memory().as_slice(), vm.memory().as_slice());
    }

    #[test]
    fn detects_dump_magic() {
        let mut buf = Vec::new();
        write_snapshot(&Vm::new(), &mut buf).unwrap();
        assert_eq!(&buf[..4], DUMP_MAGIC);
    }
}
