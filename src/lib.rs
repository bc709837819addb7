//! A fixed-ISA 15-bit virtual machine: load a binary image or a snapshot,
//! run it to completion against a pluggable [`io::Host`], and optionally
//! drop into a line-oriented debugger while it runs.

pub mod constants;
pub mod debugger;
pub mod disassembler;
pub mod error;
pub mod executor;
pub mod io;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod state;
pub mod word;

/// A single machine word. Valid encoded values occupy `[0, 32775]`; see
/// `constants::MAX_VALID_WORD`.
pub type Word = u16;

pub use error::{DebuggerError, LoadError, RuntimeError};
pub use executor::{run, step, StepOutcome};
pub use io::{Host, StdHost};
pub use loader::{load, write_snapshot};
pub use state::Vm;
