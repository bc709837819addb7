use std::sync::atomic::{AtomicBool, Ordering};

use num_traits::FromPrimitive;

use super::constants::MODULUS;
use super::debugger;
use super::error::RuntimeError;
use super::io::{Host, RefillOutcome};
use super::opcode::OpCode;
use super::state::Vm;
use super::Word;

/// Result of a single fetch-decode-execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// C4: executes one instruction at the current program counter.
///
/// `in` blocks on `host` exactly the way the reference source blocks on
/// `stdin`: this call does not return until a byte is available, a `!`
/// command has been handled by the debugger, or input is exhausted. A `!`
/// line leaves the program counter unmoved, so the same `in` instruction
/// runs again on the next call once the debugger has had its turn.
pub fn step(vm: &mut Vm, host: &mut dyn Host, debug_enabled: bool) -> Result<StepOutcome, RuntimeError> {
    let pc = vm.pc();
    let opcode_word = fetch(vm, 0)?;
    let opcode = OpCode::from_u16(opcode_word).ok_or(RuntimeError::UnknownOpcode {
        pc,
        opcode: opcode_word,
    })?;

    match opcode {
        OpCode::Halt => return Ok(StepOutcome::Halted),

        OpCode::Set => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let value = vm.value_of(fetch(vm, 2)?);
            vm.set_register(dest, value);
            vm.set_pc(pc + 3);
        }

        OpCode::Push => {
            let value = vm.value_of(fetch(vm, 1)?);
            vm.push(value);
            vm.set_pc(pc + 2);
        }

        OpCode::Pop => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let value = vm.pop().ok_or(RuntimeError::EmptyStack { pc })?;
            vm.set_register(dest, value);
            vm.set_pc(pc + 2);
        }

        OpCode::Eq => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?);
            let rhs = vm.value_of(fetch(vm, 3)?);
            vm.set_register(dest, if lhs == rhs { 1 } else { 0 });
            vm.set_pc(pc + 4);
        }

        OpCode::Gt => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?);
            let rhs = vm.value_of(fetch(vm, 3)?);
            vm.set_register(dest, if lhs > rhs { 1 } else { 0 });
            vm.set_pc(pc + 4);
        }

        OpCode::Jmp => {
            let target = vm.value_of(fetch(vm, 1)?);
            vm.set_pc(target as usize);
        }

        OpCode::Jt => {
            let condition = vm.value_of(fetch(vm, 1)?);
            let target = vm.value_of(fetch(vm, 2)?);
            vm.set_pc(if condition != 0 { target as usize } else { pc + 3 });
        }

        OpCode::Jf => {
            let condition = vm.value_of(fetch(vm, 1)?);
            let target = vm.value_of(fetch(vm, 2)?);
            vm.set_pc(if condition == 0 { target as usize } else { pc + 3 });
        }

        OpCode::Add => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?) as u32;
            let rhs = vm.value_of(fetch(vm, 3)?) as u32;
            vm.set_register(dest, ((lhs + rhs) % MODULUS) as Word);
            vm.set_pc(pc + 4);
        }

        OpCode::Mult => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?) as u32;
            let rhs = vm.value_of(fetch(vm, 3)?) as u32;
            vm.set_register(dest, ((lhs * rhs) % MODULUS) as Word);
            vm.set_pc(pc + 4);
        }

        OpCode::Mod => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?);
            let rhs = vm.value_of(fetch(vm, 3)?);
            if rhs == 0 {
                return Err(RuntimeError::DivByZero { pc });
            }
            vm.set_register(dest, lhs % rhs);
            vm.set_pc(pc + 4);
        }

        OpCode::And => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?);
            let rhs = vm.value_of(fetch(vm, 3)?);
            vm.set_register(dest, lhs & rhs);
            vm.set_pc(pc + 4);
        }

        OpCode::Or => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let lhs = vm.value_of(fetch(vm, 2)?);
            let rhs = vm.value_of(fetch(vm, 3)?);
            vm.set_register(dest, lhs | rhs);
            vm.set_pc(pc + 4);
        }

        OpCode::Not => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let value = vm.value_of(fetch(vm, 2)?);
            vm.set_register(dest, !value & 0x7fff);
            vm.set_pc(pc + 3);
        }

        OpCode::Rmem => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            let address = vm.value_of(fetch(vm, 2)?) as usize;
            let value = vm
                .memory()
                .read(address)
                .ok_or(RuntimeError::OutOfBounds { pc, address: address as Word })?;
            vm.set_register(dest, value);
            vm.set_pc(pc + 3);
        }

        OpCode::Wmem => {
            let address = vm.value_of(fetch(vm, 1)?) as usize;
            let value = vm.value_of(fetch(vm, 2)?);
            if !vm.write_memory(address, value) {
                return Err(RuntimeError::OutOfBounds { pc, address: address as Word });
            }
            vm.set_pc(pc + 3);
        }

        OpCode::Call => {
            let target = vm.value_of(fetch(vm, 1)?);
            vm.push((pc + 2) as Word);
            vm.set_pc(target as usize);
        }

        OpCode::Ret => match vm.pop() {
            Some(address) => vm.set_pc(address as usize),
            None => return Ok(StepOutcome::Halted),
        },

        OpCode::Out => {
            let value = vm.value_of(fetch(vm, 1)?);
            let _ = host.write_out((value & 0xff) as u8);
            vm.set_pc(pc + 2);
        }

        OpCode::In => {
            let dest = vm.resolve_destination(fetch(vm, 1)?)?;
            loop {
                if let Some(byte) = vm.pop_input_byte() {
                    vm.set_register(dest, byte as Word);
                    vm.set_pc(pc + 2);
                    return Ok(StepOutcome::Continue);
                }
                match vm.refill_input(host, debug_enabled) {
                    Ok(RefillOutcome::Ready) => continue,
                    Ok(RefillOutcome::BangLine(line)) => {
                        let _ = debugger::handle_command(&line, vm, host);
                        return Ok(StepOutcome::Continue);
                    }
                    Ok(RefillOutcome::EndOfInput) | Err(_) => return Ok(StepOutcome::Halted),
                }
            }
        }

        OpCode::Noop => {
            vm.set_pc(pc + 1);
        }
    }

    Ok(StepOutcome::Continue)
}

fn fetch(vm: &Vm, offset: usize) -> Result<Word, RuntimeError> {
    let address = vm.pc() + offset;
    vm.memory().read(address).ok_or(RuntimeError::OutOfBounds {
        pc: vm.pc(),
        address: address as Word,
    })
}

/// Runs `vm` to completion, feeding output through `host` and honouring
/// `!`-prefixed debugger commands when `debug_enabled` is set.
///
/// Checked once per instruction, `interrupted` mirrors the reference
/// source's `except KeyboardInterrupt: break` in its own `run()`: when it is
/// set (typically by a `ctrlc`-style SIGINT handler in the caller) the loop
/// returns cleanly without persisting any state, rather than leaving the
/// process to die under the OS's default signal disposition.
pub fn run(
    vm: &mut Vm,
    host: &mut dyn Host,
    debug_enabled: bool,
    interrupted: &AtomicBool,
) -> Result<(), RuntimeError> {
    loop {
        if interrupted.load(Ordering::SeqCst) {
            return Ok(());
        }
        match step(vm, host, debug_enabled)? {
            StepOutcome::Continue => {}
            StepOutcome::Halted => return Ok(()),
        }
    }
}
