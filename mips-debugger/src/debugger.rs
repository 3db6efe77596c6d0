use mips_interpreter::{Interpreter, Status};
use std::io;
use std::io::{BufRead, Write};

pub struct Debugger<I, O> {
    pub interpreter: Interpreter<I, O>,
    pub trace: bool,
}

impl<I: BufRead, O: Write> Debugger<I, O> {
    pub fn new(interpreter: Interpreter<I, O>) -> Self {
        Debugger {
            interpreter,
            trace: false,
        }
    }

    /// Read and run commands until the program stops or the user exits
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut command = String::new();

        loop {
            eprint!("> ");
            io::stderr().flush()?;

            command.clear();
            if stdin.read_line(&mut command)? == 0 || !self.run_command(&command) {
                return Ok(());
            }
        }
    }

    /// Run a command. Returns true if execution should continue, else false.
    pub fn run_command(&mut self, command: &str) -> bool {
        let command: Vec<_> = command.split_whitespace().collect();

        match command.as_slice() {
            ["trace", enabled] => match *enabled {
                "on" => {
                    self.trace = true;
                    eprintln!("Instruction tracing is ON");
                }
                "off" => {
                    self.trace = false;
                    eprintln!("Instruction tracing is OFF");
                }
                _ => eprintln!("Unknown input"),
            },
            ["step"] | ["s"] => return self.step(),
            ["continue"] | ["c"] => while self.step() {},
            ["regs"] => self.print_registers(),
            ["exit"] => return false,
            [] => {}
            _ => eprintln!("Unknown input"),
        }

        self.interpreter.is_running()
    }

    /// Execute one line. Returns false once the program has stopped.
    fn step(&mut self) -> bool {
        if self.trace {
            if let Some(line) = self.interpreter.current_line() {
                eprintln!("{:>4}: {}", self.interpreter.program_counter(), line);
            }
        }

        if let Err(fault) = self.interpreter.step() {
            eprintln!("Fault: {}", fault);
            return false;
        }

        if let Status::Terminated(termination) = self.interpreter.status() {
            eprintln!("Program stopped: {:?}", termination);
            return false;
        }

        true
    }

    fn print_registers(&self) {
        for (i, (name, value)) in self.interpreter.registers().iter().enumerate() {
            eprint!("{:>5} = {:<12}", name, value.to_string());

            if i % 4 == 3 {
                eprintln!();
            }
        }
        eprintln!();
    }
}
