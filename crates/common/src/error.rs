//! Decode errors for pm0 instruction streams.

use thiserror::Error;

/// Errors that occur while decoding raw `op r l m` integer quads.
///
/// Decoding happens once, at load time. A program that decodes cleanly can
/// never raise an illegal-instruction condition during execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Opcode 0 is reserved and always rejected.
    #[error("illegal opcode 0")]
    IllegalOpcode,

    /// Opcode value outside 1..=24.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(i64),

    /// Register field outside the register file.
    #[error("register index {0} out of range")]
    RegisterOutOfRange(i64),

    /// Lexical-level field is negative or too large to represent.
    #[error("lexical level {0} out of range")]
    LevelOutOfRange(i64),

    /// Jump/call target must be a non-negative instruction index.
    #[error("code target {0} out of range")]
    TargetOutOfRange(i64),
}
