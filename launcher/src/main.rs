#[macro_use]
extern crate clap;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Arg;

use synacor_vm::{self, LoadError, RuntimeError, StdHost};

#[derive(Debug)]
enum Error {
    Io(std::io::Error),
    Load(LoadError),
    Runtime(RuntimeError),
    Signal(ctrlc::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{}", err),
            Error::Load(err) => write!(f, "{}", err),
            Error::Runtime(err) => write!(f, "{}", err),
            Error::Signal(err) => write!(f, "{}", err),
        }
    }
}

impl From<ctrlc::Error> for Error {
    fn from(err: ctrlc::Error) -> Error {
        Error::Signal(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Error {
        Error::Load(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Error {
        Error::Runtime(err)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("PROGRAM")
                .help("Sets the image or snapshot file to load")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::with_name("actions")
                .long("actions")
                .takes_value(true)
                .value_name("FILE")
                .help("Feeds this file's lines to `in` before prompting interactively"),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Intercepts `!`-prefixed input lines as debugger commands"),
        )
        .get_matches();

    let program_path = matches.value_of("PROGRAM").unwrap();
    let mut program_file = File::open(program_path)?;
    let mut vm = synacor_vm::load(&mut program_file)?;

    if let Some(actions_path) = matches.value_of("actions") {
        let mut contents = String::new();
        File::open(actions_path)?.read_to_string(&mut contents)?;
        vm.set_actions(synacor_vm::io::parse_action_file(&contents));
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))?;

    let debug_enabled = matches.is_present("debug");
    let mut host = StdHost::new();
    synacor_vm::run(&mut vm, &mut host, debug_enabled, &interrupted)?;

    Ok(())
}
