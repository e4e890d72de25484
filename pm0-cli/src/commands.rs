//! CLI command implementations.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Execute a program, reading SIO input from `--input` (or stdin) and
/// writing SIO output to stdout. With `-o`, the code listing and the
/// execution trace go to the named file.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires a program file");
        eprintln!("Usage: pm0 run <program.pm0> [-o trace.out] [--input data.txt]");
        return Err(1);
    }

    let input = &args[0];
    let flags = parse_run_flags(&args[1..])?;

    let program = load_program(input)?;

    let mut data: Box<dyn BufRead> = match &flags.data {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{path}': {e}");
                1
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(std::io::stdin().lock()),
    };
    let mut stdout = std::io::stdout();

    let result = match &flags.trace {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                eprintln!("error: cannot write '{path}': {e}");
                1
            })?;
            let mut trace = BufWriter::new(file);
            write!(trace, "{}", pm0_loader::listing(&program)).map_err(|e| {
                eprintln!("error: cannot write '{path}': {e}");
                1
            })?;
            let result = pm0_vm::run_traced(&program, &mut data, &mut stdout, &mut trace);
            trace.flush().map_err(|e| {
                eprintln!("error: cannot write '{path}': {e}");
                1
            })?;
            result
        }
        None => pm0_vm::run(&program, &mut data, &mut stdout),
    };

    result.map_err(|e| {
        eprintln!("runtime error: {e}");
        2
    })
}

/// Print the code-memory listing of a program.
pub fn list(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: list requires a program file");
        eprintln!("Usage: pm0 list <program.pm0>");
        return Err(1);
    }

    let program = load_program(&args[0])?;
    print!("{}", pm0_loader::listing(&program));
    Ok(())
}

// --- Helpers ---

struct RunFlags {
    trace: Option<String>,
    data: Option<String>,
}

/// Parse the optional `-o` and `--input` flags.
fn parse_run_flags(args: &[String]) -> Result<RunFlags, i32> {
    let mut flags = RunFlags {
        trace: None,
        data: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                if i + 1 >= args.len() {
                    eprintln!("error: -o requires a file name");
                    return Err(1);
                }
                flags.trace = Some(args[i + 1].clone());
                i += 2;
            }
            "--input" => {
                if i + 1 >= args.len() {
                    eprintln!("error: --input requires a file name");
                    return Err(1);
                }
                flags.data = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                eprintln!("error: unknown argument '{other}'");
                return Err(1);
            }
        }
    }

    Ok(flags)
}

/// Read and decode a textual program file.
fn load_program(path: &str) -> Result<pm0_common::Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    pm0_loader::load(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}
