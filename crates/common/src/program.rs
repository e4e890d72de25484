//! Program representation for pm0 instruction streams.

use crate::instruction::Instruction;

/// Maximum number of instructions a program may contain.
pub const MAX_CODE_LENGTH: usize = 500;

/// A pm0 program: an ordered, index-addressed instruction sequence.
///
/// Instructions are loaded once and never mutated; the machine addresses
/// them by absolute index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Fetch the instruction at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
