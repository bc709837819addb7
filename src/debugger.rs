use std::fs::File;
use std::io::BufWriter;

use super::disassembler::disassemble;
use super::error::DebuggerError;
use super::io::Host;
use super::loader::write_snapshot;
use super::state::Vm;

/// How many words on either side of the target address `!mem` prints.
const MEM_WINDOW_RADIUS: usize = 4;

/// C7: parses and executes one `!`-prefixed debugger command. Unknown
/// commands return `Err(DebuggerError::UnknownCommand)`; the caller (the
/// executor) treats that the same as success — the buffer is still
/// cleared and the `in` instruction still does not advance the PC.
pub fn handle_command(line: &str, vm: &mut Vm, host: &mut dyn Host) -> Result<(), DebuggerError> {
    let body = line.strip_prefix('!').unwrap_or(line);
    let mut tokens = body.split_whitespace();

    match tokens.next() {
        Some("dump") => dump(tokens.next(), vm, host),
        Some("reg") => reg(tokens.next(), tokens.next(), vm, host),
        Some("sta") => {
            stack(vm, host);
            Ok(())
        }
        Some("mem") => {
            mem(tokens.next(), vm, host);
            Ok(())
        }
        _ => Err(DebuggerError::UnknownCommand),
    }
}

fn dump(path: Option<&str>, vm: &Vm, host: &mut dyn Host) -> Result<(), DebuggerError> {
    let path = path.ok_or(DebuggerError::UnknownCommand)?;
    match File::create(path) {
        Ok(file) => {
            let mut writer = BufWriter::new(file);
            if write_snapshot(vm, &mut writer).is_err() {
                let _ = host.write_line(&format!("failed to write snapshot to {}", path));
            }
        }
        Err(err) => {
            let _ = host.write_line(&format!("failed to open {}: {}", path, err));
        }
    }
    Ok(())
}

fn reg(
    index: Option<&str>,
    value: Option<&str>,
    vm: &mut Vm,
    host: &mut dyn Host,
) -> Result<(), DebuggerError> {
    match (index, value) {
        (None, None) => {
            for (i, value) in vm.registers().iter().enumerate() {
                let _ = host.write_line(&format!("R{} = {}", i, value));
            }
            Ok(())
        }
        (Some(index), Some(value)) => {
            let index: usize = index.parse().map_err(|_| DebuggerError::UnknownCommand)?;
            let value = value.parse().map_err(|_| DebuggerError::UnknownCommand)?;
            if index >= vm.registers().len() {
                return Err(DebuggerError::UnknownCommand);
            }
            vm.set_register(index, value);
            Ok(())
        }
        _ => Err(DebuggerError::UnknownCommand),
    }
}

fn stack(vm: &Vm, host: &mut dyn Host) {
    for value in vm.stack().iter().rev() {
        let _ = host.write_line(&value.to_string());
    }
}

fn mem(addr: Option<&str>, vm: &Vm, host: &mut dyn Host) {
    let center = addr
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or_else(|| vm.pc());

    let start = center.saturating_sub(MEM_WINDOW_RADIUS);
    let end = center + MEM_WINDOW_RADIUS;

    for address in start..=end {
        let marker = if address == vm.pc() { "->" } else { "  " };
        let _ = host.write_line(&format!("{} {:05}: {}", marker, address, disassemble(vm, address)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Default)]
    struct RecordingHost {
        lines: Vec<String>,
    }

    impl Host for RecordingHost {
        fn read_line(&mut self) -> io::Result<Option<String>> {
            Ok(None)
        }
        fn write_out(&mut self, _: u8) -> io::Result<()> {
            Ok(())
        }
        fn write_prompt(&mut self) -> io::Result<()> {
            Ok(())
        }
        fn write_echo(&mut self, _: &str) -> io::Result<()> {
            Ok(())
        }
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.lines.push(line.to_owned());
            Ok(())
        }
    }

    #[test]
    fn reg_with_no_args_prints_all_registers() {
        let mut vm = Vm::new();
        vm.set_register(0, 42);
        let mut host = RecordingHost::default();
        handle_command("!reg", &mut vm, &mut host).unwrap();
        assert_eq!(host.lines.len(), 8);
        assert_eq!(host.lines[0], "R0 = 42");
    }

    #[test]
    fn reg_with_two_args_sets_register() {
        let mut vm = Vm::new();
        let mut host = RecordingHost::default();
        handle_command("!reg 2 123", &mut vm, &mut host).unwrap();
        assert_eq!(vm.register(2), 123);
    }

    #[test]
    fn sta_prints_top_to_bottom() {
        let mut vm = Vm::new();
        vm.push(1);
        vm.push(2);
        let mut host = RecordingHost::default();
        handle_command("!sta", &mut vm, &mut host).unwrap();
        assert_eq!(host.lines, vec!["2".to_owned(), "1".to_owned()]);
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut vm = Vm::new();
        let mut host = RecordingHost::default();
        assert_eq!(
            handle_command("!bogus", &mut vm, &mut host),
            Err(DebuggerError::UnknownCommand)
        );
    }

    #[test]
    fn mem_marks_the_pc_row() {
        let mut vm = Vm::new();
        vm.memory.load_image(&[21, 21, 21, 21, 21, 21, 21, 21, 21, 21]);
        vm.set_pc(4);
        let mut host = RecordingHost::default();
        handle_command("!mem", &mut vm, &mut host).unwrap();
        assert!(host.lines.iter().any(|l| l.starts_with("->") && l.contains("00004")));
    }
}
