//! Runtime errors for the pm0 machine.
//!
//! These are the faults that survive load-time decoding: arithmetic faults,
//! resource exhaustion, and corrupted activation-record links. Every variant
//! carries the index (`at`) of the faulting instruction. All failures are
//! terminal for the run; nothing is retried.

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Integer division or modulo by zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// A stack access landed outside the machine's stack.
    #[error("stack index {index} out of range at instruction {at}")]
    StackOutOfRange { at: usize, index: i64 },

    /// A static or dynamic link read from the stack is not a valid stack
    /// address (the base-pointer chain walk left the available frames).
    #[error("activation-record link {value} is not a valid stack address at instruction {at}")]
    CorruptFrame { at: usize, value: i64 },

    /// A return address restored from a frame header is not a valid code
    /// index.
    #[error("return address {value} is not a valid code index at instruction {at}")]
    CorruptReturn { at: usize, value: i64 },

    /// The program counter ran past the end of the program without halting.
    #[error("program counter {at} past end of program")]
    EndOfProgram { at: usize },

    /// The input channel ended while a read instruction was waiting for an
    /// integer.
    #[error("input exhausted during read at instruction {at}")]
    InputExhausted { at: usize },

    /// The input channel produced a token that is not an integer.
    #[error("malformed integer '{token}' on input at instruction {at}")]
    InputMalformed { at: usize, token: String },

    /// An underlying channel failed while reading or writing.
    #[error("i/o failure at instruction {at}: {message}")]
    Io { at: usize, message: String },
}
