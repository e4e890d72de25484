//! Textual program loader and code-listing renderer.
//!
//! A program file is a whitespace-separated stream of decimal integers,
//! four per instruction: opcode, R, L, M. Reading stops silently at the
//! first token that is not an integer, and a trailing incomplete group is
//! dropped; everything read up to that point still loads. A group that
//! decodes to an invalid instruction, or a stream that overflows code
//! memory, is a hard error.

pub mod error;

pub use error::LoadError;

use pm0_common::{Instruction, Program, MAX_CODE_LENGTH};

/// Decode a textual instruction stream into a program.
///
/// # Errors
///
/// Returns [`LoadError::Decode`] when a complete field group is not a
/// valid instruction, and [`LoadError::TooManyInstructions`] when the
/// stream holds more than [`MAX_CODE_LENGTH`] instructions.
pub fn load(text: &str) -> Result<Program, LoadError> {
    let mut fields: Vec<i64> = Vec::new();
    for token in text.split_whitespace() {
        match token.parse() {
            Ok(value) => fields.push(value),
            Err(_) => break,
        }
    }

    let count = fields.len() / 4;
    if count > MAX_CODE_LENGTH {
        return Err(LoadError::TooManyInstructions { count });
    }

    let mut instructions = Vec::with_capacity(count);
    for (index, group) in fields.chunks_exact(4).enumerate() {
        let instr = Instruction::from_fields(group[0], group[1], group[2], group[3])
            .map_err(|source| LoadError::Decode { index, source })?;
        instructions.push(instr);
    }

    Ok(Program::new(instructions))
}

/// Render the code-memory listing for a loaded program.
pub fn listing(program: &Program) -> String {
    let mut out = String::from("***Code Memory***\n");
    out.push_str(&format!(
        "{:>3} {:>3} {:>3} {:>3} {:>3} \n",
        "#", "OP", "R", "L", "M"
    ));
    for (index, instr) in program.instructions.iter().enumerate() {
        out.push_str(&format!(
            "{:>3} {:>3} {:>3} {:>3} {:>3} \n",
            index,
            instr.opcode.mnemonic(),
            instr.r,
            instr.l,
            instr.m
        ));
    }
    out
}
