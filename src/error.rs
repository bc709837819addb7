use std::fmt;
use std::io;

use super::Word;

/// Failure raised while turning a file into a [`Vm`](crate::Vm).
#[derive(Debug)]
pub enum LoadError {
    /// A word was cut off by end-of-file after exactly one byte was read.
    TruncatedImage,
    /// A word in a plain image exceeded the valid range `[0, 32775]`.
    OutOfRange(Word),
    /// The image (or a snapshot's memory tail) held more words than fit in
    /// the 32768-word address space.
    ImageTooLarge { words: usize },
    /// The underlying file could not be read or written.
    Io(io::Error),
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> LoadError {
        LoadError::Io(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::TruncatedImage => write!(f, "image ended mid-word"),
            LoadError::OutOfRange(word) => {
                write!(f, "word {} is out of the valid [0, 32775] range", word)
            }
            LoadError::ImageTooLarge { words } => write!(
                f,
                "image holds {} words, more than the 32768-word address space",
                words
            ),
            LoadError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure raised by the fetch-decode-execute loop. Every variant carries the
/// program counter of the offending instruction so the launcher can print a
/// diagnostic without needing to re-run under the debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    UnknownOpcode { pc: usize, opcode: Word },
    InvalidDestination { pc: usize, operand: Word },
    OutOfBounds { pc: usize, address: Word },
    EmptyStack { pc: usize },
    DivByZero { pc: usize },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnknownOpcode { pc, opcode } => {
                write!(f, "unknown opcode {} at pc={}", opcode, pc)
            }
            RuntimeError::InvalidDestination { pc, operand } => write!(
                f,
                "operand {} at pc={} is not a valid destination register",
                operand, pc
            ),
            RuntimeError::OutOfBounds { pc, address } => {
                write!(f, "address {} at pc={} is out of bounds", address, pc)
            }
            RuntimeError::EmptyStack { pc } => write!(f, "pop from empty stack at pc={}", pc),
            RuntimeError::DivByZero { pc } => write!(f, "division by zero at pc={}", pc),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Raised internally while parsing a `!`-prefixed debugger command. Never
/// propagated past the debugger: an unknown command is silently swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerError {
    UnknownCommand,
}
