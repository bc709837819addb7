use num_traits::FromPrimitive;

use super::constants::{MAX_VALID_WORD, REGISTER_BASE};
use super::opcode::OpCode;
use super::state::Vm;
use super::Word;

/// C6: renders the instruction stored at `address` as `mnemonic op1 op2 …`.
/// Returns an empty string if the word at `address` is not a known opcode
/// or `address` is out of bounds. Pure with respect to `vm`: it only reads.
pub fn disassemble(vm: &Vm, address: usize) -> String {
    let opcode_word = match vm.memory().read(address) {
        Some(word) => word,
        None => return String::new(),
    };

    let opcode = match OpCode::from_u16(opcode_word) {
        Some(opcode) => opcode,
        None => return String::new(),
    };

    let mut rendered = opcode.mnemonic().to_owned();
    for offset in 1..=opcode.arity() {
        let operand = match vm.memory().read(address + offset) {
            Some(word) => word,
            None => return String::new(),
        };
        rendered.push(' ');
        rendered.push_str(&format_operand(vm, operand));
    }
    rendered
}

fn format_operand(vm: &Vm, operand: Word) -> String {
    if operand >= REGISTER_BASE && operand <= MAX_VALID_WORD {
        let index = (operand - REGISTER_BASE) as usize;
        format!("<{}:{}>", index, vm.register(index))
    } else {
        operand.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_zero_arity_instruction() {
        let mut vm = Vm::new();
        vm.memory.load_image(&[0]);
        assert_eq!(disassemble(&vm, 0), "halt");
    }

    #[test]
    fn renders_literal_operands() {
        let mut vm = Vm::new();
        vm.memory.load_image(&[19, 65]);
        assert_eq!(disassemble(&vm, 0), "out 65");
    }

    #[test]
    fn renders_register_operand_with_value() {
        let mut vm = Vm::new();
        vm.memory.load_image(&[1, 32768, 7]);
        vm.set_register(0, 7);
        assert_eq!(disassemble(&vm, 0), "set <0:7> 7");
    }

    #[test]
    fn unknown_opcode_renders_empty() {
        let mut vm = Vm::new();
        vm.memory.load_image(&[255]);
        assert_eq!(disassemble(&vm, 0), "");
    }

    #[test]
    fn out_of_bounds_address_renders_empty() {
        let vm = Vm::new();
        assert_eq!(disassemble(&vm, super::super::constants::MEMORY_SIZE), "");
    }
}
