//! Decoded instruction representation for the pm0 machine.
//!
//! Raw programs arrive as four-integer groups `op r l m`. Decoding validates
//! the opcode and the operand fields once, up front, so the executor never
//! has to re-check them.

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// Number of registers in the machine's register file.
pub const REGISTER_COUNT: usize = 16;

/// A single decoded pm0 instruction.
///
/// The meaning of `l` and `m` depends on the opcode: `l` is a lexical-level
/// delta for LOD/STO/CAL and a source register for the three-register
/// arithmetic group; `m` is an immediate, a stack offset, a code target, or
/// a source register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Register operand. Always a valid index into the register file.
    pub r: u8,
    /// Lexical-level delta or source register, depending on opcode.
    pub l: u16,
    /// Immediate value, stack offset, code target, or source register.
    pub m: i64,
}

impl Instruction {
    /// Create an instruction from already-validated parts.
    ///
    /// `r` must index the register file; use [`Instruction::from_fields`]
    /// for untrusted input.
    pub fn new(opcode: Opcode, r: u8, l: u16, m: i64) -> Self {
        debug_assert!(
            usize::from(r) < REGISTER_COUNT,
            "register {r} outside the register file"
        );
        Self { opcode, r, l, m }
    }

    /// Decode one instruction from raw `op r l m` integer fields.
    ///
    /// Validation performed here, per the opcode:
    /// - `op` must be 1..=24 (0 is the reserved illegal opcode);
    /// - `r` must index the register file;
    /// - `l` must be non-negative, and a valid register index for the
    ///   three-register arithmetic/comparison opcodes;
    /// - `m` must be a valid register index for those same opcodes, and a
    ///   non-negative code target for JMP/JPC/CAL.
    pub fn from_fields(op: i64, r: i64, l: i64, m: i64) -> Result<Self, DecodeError> {
        let opcode = match u8::try_from(op) {
            Ok(byte) => Opcode::try_from(byte)?,
            Err(_) => {
                return Err(if op == 0 {
                    DecodeError::IllegalOpcode
                } else {
                    DecodeError::InvalidOpcode(op)
                })
            }
        };

        if !(0..REGISTER_COUNT as i64).contains(&r) {
            return Err(DecodeError::RegisterOutOfRange(r));
        }
        let r = r as u8;

        let l_field = if opcode.uses_register_operands() {
            if !(0..REGISTER_COUNT as i64).contains(&l) {
                return Err(DecodeError::RegisterOutOfRange(l));
            }
            l as u16
        } else {
            u16::try_from(l).map_err(|_| DecodeError::LevelOutOfRange(l))?
        };

        if opcode.uses_register_operands() && !(0..REGISTER_COUNT as i64).contains(&m) {
            return Err(DecodeError::RegisterOutOfRange(m));
        }
        if opcode.uses_code_target() && m < 0 {
            return Err(DecodeError::TargetOutOfRange(m));
        }

        Ok(Self {
            opcode,
            r,
            l: l_field,
            m,
        })
    }
}
