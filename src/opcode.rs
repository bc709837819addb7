use num_derive::{FromPrimitive, ToPrimitive};

/// The 22 opcodes of the instruction set, in encoded order. Decoded from the
/// raw word at the program counter with `num_traits::FromPrimitive`, then
/// dispatched with a single exhaustive `match` in [`crate::executor`] —
/// the reference source's opcode-to-method dictionary has no equivalent
/// here, per SPEC_FULL.md §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum OpCode {
    Halt = 0,
    Set = 1,
    Push = 2,
    Pop = 3,
    Eq = 4,
    Gt = 5,
    Jmp = 6,
    Jt = 7,
    Jf = 8,
    Add = 9,
    Mult = 10,
    Mod = 11,
    And = 12,
    Or = 13,
    Not = 14,
    Rmem = 15,
    Wmem = 16,
    Call = 17,
    Ret = 18,
    Out = 19,
    In = 20,
    Noop = 21,
}

impl OpCode {
    /// Number of operand words following the opcode word itself.
    pub fn arity(self) -> usize {
        match self {
            OpCode::Halt | OpCode::Ret | OpCode::Noop => 0,
            OpCode::Push | OpCode::Pop | OpCode::Jmp | OpCode::Call | OpCode::Out | OpCode::In => 1,
            OpCode::Set | OpCode::Jt | OpCode::Jf | OpCode::Not | OpCode::Rmem | OpCode::Wmem => 2,
            OpCode::Eq | OpCode::Gt | OpCode::Add | OpCode::Mult | OpCode::Mod | OpCode::And
            | OpCode::Or => 3,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Halt => "halt",
            OpCode::Set => "set",
            OpCode::Push => "push",
            OpCode::Pop => "pop",
            OpCode::Eq => "eq",
            OpCode::Gt => "gt",
            OpCode::Jmp => "jmp",
            OpCode::Jt => "jt",
            OpCode::Jf => "jf",
            OpCode::Add => "add",
            OpCode::Mult => "mult",
            OpCode::Mod => "mod",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Not => "not",
            OpCode::Rmem => "rmem",
            OpCode::Wmem => "wmem",
            OpCode::Call => "call",
            OpCode::Ret => "ret",
            OpCode::Out => "out",
            OpCode::In => "in",
            OpCode::Noop => "noop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn decodes_every_opcode_value() {
        for value in 0..=21u16 {
            assert!(OpCode::from_u16(value).is_some());
        }
    }

    #[test]
    fn rejects_unknown_opcode_value() {
        assert!(OpCode::from_u16(22).is_none());
    }

    #[test]
    fn arities_match_spec_table() {
        assert_eq!(OpCode::Halt.arity(), 0);
        assert_eq!(OpCode::Set.arity(), 2);
        assert_eq!(OpCode::Eq.arity(), 3);
        assert_eq!(OpCode::In.arity(), 1);
    }
}
