use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Where scripted and interactive program input come from, and where
/// program output and debugger prompts go. The launcher wires this to real
/// `stdin`/`stdout`; tests wire it to in-memory buffers.
pub trait Host {
    /// Blocks for one line of interactive input (no trailing newline).
    /// Returning `Ok(None)` signals end-of-input (e.g. piped stdin closed).
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn write_out(&mut self, byte: u8) -> io::Result<()>;

    /// Emits the `> ` prompt before blocking on interactive input.
    fn write_prompt(&mut self) -> io::Result<()>;

    /// Echoes a scripted action line as `> line` before it is consumed.
    fn write_echo(&mut self, line: &str) -> io::Result<()>;

    /// Writes one line of debugger output (register dumps, memory windows).
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// [`Host`] backed by the process's real standard streams.
pub struct StdHost {
    stdin: io::BufReader<io::Stdin>,
    stdout: io::Stdout,
}

impl StdHost {
    pub fn new() -> StdHost {
        StdHost {
            stdin: io::BufReader::new(io::stdin()),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdHost {
    fn default() -> StdHost {
        StdHost::new()
    }
}

impl Host for StdHost {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.stdin.read_line(&mut line)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn write_out(&mut self, byte: u8) -> io::Result<()> {
        self.stdout.write_all(&[byte])?;
        if byte == b'\n' {
            self.stdout.flush()?;
        }
        Ok(())
    }

    fn write_prompt(&mut self) -> io::Result<()> {
        write!(self.stdout, "> ")?;
        self.stdout.flush()
    }

    fn write_echo(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.stdout, "> {}", line)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.stdout, "{}", line)
    }
}

/// Outcome of refilling the input buffer, used by the executor to decide
/// whether the `in` instruction advances the program counter.
pub enum RefillOutcome {
    /// A byte is now available; `in` should consume it and advance as usual.
    Ready,
    /// The refilled line begins with `!` and the debugger is enabled; the
    /// executor must hand it to the debugger instead of queuing it, and
    /// `in` must not advance so it re-enters on the next tick.
    BangLine(String),
    /// Interactive input reached end-of-stream with nothing queued.
    EndOfInput,
}

/// C5: the single-line input buffer and the pre-loaded action script.
pub struct InputState {
    buffer: VecDeque<u8>,
    actions: VecDeque<String>,
}

impl InputState {
    pub fn new() -> InputState {
        InputState {
            buffer: VecDeque::new(),
            actions: VecDeque::new(),
        }
    }

    pub fn set_actions(&mut self, actions: Vec<String>) {
        self.actions = actions.into();
    }

    fn load_line(&mut self, line: String) {
        self.buffer = line.bytes().chain(std::iter::once(b'\n')).collect();
    }

    /// Refills the buffer if empty, consulting the action list first and the
    /// interactive prompt second, as described in SPEC_FULL.md §4.4. When
    /// `debug_enabled` is set, a line beginning with `!` is returned as
    /// [`RefillOutcome::BangLine`] instead of being queued as program input;
    /// otherwise such a line is delivered to the program like any other.
    pub fn refill(&mut self, host: &mut dyn Host, debug_enabled: bool) -> io::Result<RefillOutcome> {
        if !self.buffer.is_empty() {
            return Ok(RefillOutcome::Ready);
        }

        let line = if let Some(action) = self.actions.pop_front() {
            host.write_echo(&action)?;
            action
        } else {
            host.write_prompt()?;
            match host.read_line()? {
                Some(line) => line,
                None => return Ok(RefillOutcome::EndOfInput),
            }
        };

        if debug_enabled && line.starts_with('!') {
            return Ok(RefillOutcome::BangLine(line));
        }

        self.load_line(line);
        Ok(RefillOutcome::Ready)
    }

    pub fn pop_byte(&mut self) -> Option<u8> {
        self.buffer.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for InputState {
    fn default() -> InputState {
        InputState::new()
    }
}

/// Parses an action file per SPEC_FULL.md §6: blank lines and lines whose
/// first non-whitespace character is `#` are skipped, everything else is
/// trimmed and kept in order.
pub fn parse_action_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}
