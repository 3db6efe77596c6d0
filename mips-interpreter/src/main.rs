use env_logger::Env;
use mips_interpreter::config::Config;
use mips_interpreter::{Interpreter, Program, Termination};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;

#[macro_use]
extern crate log;

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

    let program = Program::from_file(&args.file_path)?;
    info!("Loaded {}", args.file_path.display());

    let mut interpreter = Interpreter::new(
        program,
        Config {
            coerce_references: args.coerce_references,
        },
    );

    match interpreter.run()? {
        Termination::Halted { line, reason } => {
            debug!("Stopped at line {}: {}", line, reason)
        }
        termination => debug!("Finished: {:?}", termination),
    }

    Ok(())
}
