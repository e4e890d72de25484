//! pm0 CLI — load, list, and execute pm0 programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/load error
//! - 2: Runtime error

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "list" => commands::list(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: pm0 <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <program.pm0> [-o trace.out] [--input data.txt]   Execute a program");
    eprintln!("  list <program.pm0>                                    Print the code listing");
}
