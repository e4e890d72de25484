//! pm0 virtual machine — executes decoded instruction streams.
//!
//! The machine is a stack machine with:
//! - A register file for scratch values
//! - A 1-based memory stack holding nested activation records
//! - Base-pointer chaining: each record's header carries a static link (to
//!   the lexically enclosing record) and a dynamic link (to the caller)
//!
//! # Usage
//!
//! ```
//! use pm0_common::{Instruction, Opcode, Program};
//! use pm0_vm::{Channels, Vm};
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::Lit, 0, 0, 5),
//!     Instruction::new(Opcode::Lit, 1, 0, 3),
//!     Instruction::new(Opcode::Add, 2, 0, 1),
//!     Instruction::new(Opcode::SioWrite, 2, 0, 0),
//!     Instruction::new(Opcode::SioHalt, 0, 0, 0),
//! ]);
//!
//! let mut input = std::io::empty();
//! let mut input = std::io::BufReader::new(&mut input);
//! let mut output = Vec::new();
//! let mut vm = Vm::new(&program);
//! vm.run(&mut Channels::new(&mut input, &mut output)).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "8 ");
//! ```

pub mod error;
pub mod execute;
pub mod io;
pub mod machine;
pub mod trace;

pub use error::RuntimeError;
pub use execute::Step;
pub use io::Channels;
pub use machine::{Vm, MAX_STACK_HEIGHT};

use pm0_common::Program;
use std::io::{BufRead, Write};

/// Execute a program to completion without tracing.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution faults (division by zero, stack
/// out of range, exhausted input, ...).
pub fn run(
    program: &Program,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), RuntimeError> {
    let mut vm = Vm::new(program);
    vm.run(&mut Channels::new(input, output))
}

/// Execute a program to completion, writing the execution trace (one line
/// per instruction, ending with `HLT`) to `trace`.
pub fn run_traced(
    program: &Program,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    trace: &mut dyn Write,
) -> Result<(), RuntimeError> {
    let mut vm = Vm::new(program);
    vm.run_traced(&mut Channels::new(input, output), trace)
}
