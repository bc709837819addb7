use super::Word;

/// Total number of addressable words. The reference source lets memory grow
/// implicitly past the loaded image; we make that an explicit, fixed-size
/// array instead so out-of-range reads/writes have one well-defined meaning.
pub const MEMORY_SIZE: usize = 1 << 15;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// First encoded value that denotes a register rather than a literal.
pub const REGISTER_BASE: Word = 32768;

/// Largest valid encoded word (`REGISTER_BASE` + last register index).
pub const MAX_VALID_WORD: Word = REGISTER_BASE + REGISTER_COUNT as Word - 1;

/// Modulus for arithmetic opcodes (ADD, MULT) and the literal value range.
pub const MODULUS: u32 = REGISTER_BASE as u32;

pub const DUMP_MAGIC: &[u8; 4] = b"DUMP";
