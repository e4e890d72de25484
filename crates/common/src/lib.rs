//! pm0 common types and instruction decoding.
//!
//! This crate provides the foundational data structures for the pm0
//! instruction set:
//!
//! - [`Opcode`] — the 24 machine opcodes (value 0 is reserved/illegal)
//! - [`Instruction`] — a decoded `op r l m` record with field validation
//! - [`Program`] — an ordered, index-addressed instruction sequence
//! - [`DecodeError`] — errors from decoding raw integer quads
//!
//! Decoding is a load-time decision: a program that decodes cleanly can
//! never hit an illegal-instruction condition while executing.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::{Instruction, REGISTER_COUNT};
pub use opcode::Opcode;
pub use program::{Program, MAX_CODE_LENGTH};
