use crate::debugger::Debugger;
use env_logger::Env;
use mips_interpreter::config::Config;
use mips_interpreter::{Interpreter, Program};
use std::error::Error;
use std::io;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod debugger;

#[derive(StructOpt)]
struct CliArgs {
    /// Treat registers holding a label reference as zero in arithmetic
    /// instead of stopping with a fault
    #[structopt(long)]
    coerce_references: bool,

    #[structopt(parse(from_os_str))]
    file_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
    let args = CliArgs::from_args();

    // Load the program
    let program = Program::from_file(&args.file_path)?;
    info!("Loaded {}", args.file_path.display());

    // The program reads stdin a byte at a time so debugger commands
    // typed after its input are left for the prompt
    let input = BufReader::with_capacity(1, io::stdin());
    let interpreter = Interpreter::with_io(
        program,
        Config {
            coerce_references: args.coerce_references,
        },
        input,
        io::stdout(),
    );
    let mut debugger = Debugger::new(interpreter);

    debugger.run()?;

    Ok(())
}
