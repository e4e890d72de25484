//! Opcode definitions for the pm0 instruction set.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// Opcode value 0 is reserved and always rejected at decode time. The
/// `#[repr(u8)]` attribute ensures each variant has a stable numeric value
/// matching the textual instruction format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `reg[r] = m` — load an immediate into a register.
    Lit = 1,
    /// Pop the current activation record and return to the caller.
    Rtn = 2,
    /// `reg[r] = stack[base(l) + m]` — load from a frame `l` levels up.
    Lod = 3,
    /// `stack[base(l) + m] = reg[r]` — store into a frame `l` levels up.
    Sto = 4,
    /// Push a new activation-record header and jump to `m`.
    Cal = 5,
    /// `sp += m` — allocate (or release) stack space.
    Inc = 6,
    /// `pc = m` — unconditional jump.
    Jmp = 7,
    /// `if reg[r] == 0 { pc = m }` — jump on false.
    Jpc = 8,
    /// Emit `reg[r]` to the output channel.
    SioWrite = 9,
    /// Read one integer from the input channel into `reg[r]`.
    SioRead = 10,
    /// Halt the machine.
    SioHalt = 11,
    /// `reg[r] = -reg[r]`.
    Neg = 12,
    /// `reg[r] = reg[l] + reg[m]`.
    Add = 13,
    /// `reg[r] = reg[l] - reg[m]`.
    Sub = 14,
    /// `reg[r] = reg[l] * reg[m]`.
    Mul = 15,
    /// `reg[r] = reg[l] / reg[m]` — integer division.
    Div = 16,
    /// `reg[r] = reg[r] mod 2`.
    Odd = 17,
    /// `reg[r] = reg[l] mod reg[m]`.
    Mod = 18,
    /// `reg[r] = (reg[l] == reg[m]) as 0/1`.
    Eql = 19,
    /// `reg[r] = (reg[l] != reg[m]) as 0/1`.
    Neq = 20,
    /// `reg[r] = (reg[l] < reg[m]) as 0/1`.
    Lss = 21,
    /// `reg[r] = (reg[l] <= reg[m]) as 0/1`.
    Leq = 22,
    /// `reg[r] = (reg[l] > reg[m]) as 0/1`.
    Gtr = 23,
    /// `reg[r] = (reg[l] >= reg[m]) as 0/1`.
    Geq = 24,
}

/// All valid opcodes, in numeric order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 24] = [
    Opcode::Lit,
    Opcode::Rtn,
    Opcode::Lod,
    Opcode::Sto,
    Opcode::Cal,
    Opcode::Inc,
    Opcode::Jmp,
    Opcode::Jpc,
    Opcode::SioWrite,
    Opcode::SioRead,
    Opcode::SioHalt,
    Opcode::Neg,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Odd,
    Opcode::Mod,
    Opcode::Eql,
    Opcode::Neq,
    Opcode::Lss,
    Opcode::Leq,
    Opcode::Gtr,
    Opcode::Geq,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Err(DecodeError::IllegalOpcode),
            1 => Ok(Opcode::Lit),
            2 => Ok(Opcode::Rtn),
            3 => Ok(Opcode::Lod),
            4 => Ok(Opcode::Sto),
            5 => Ok(Opcode::Cal),
            6 => Ok(Opcode::Inc),
            7 => Ok(Opcode::Jmp),
            8 => Ok(Opcode::Jpc),
            9 => Ok(Opcode::SioWrite),
            10 => Ok(Opcode::SioRead),
            11 => Ok(Opcode::SioHalt),
            12 => Ok(Opcode::Neg),
            13 => Ok(Opcode::Add),
            14 => Ok(Opcode::Sub),
            15 => Ok(Opcode::Mul),
            16 => Ok(Opcode::Div),
            17 => Ok(Opcode::Odd),
            18 => Ok(Opcode::Mod),
            19 => Ok(Opcode::Eql),
            20 => Ok(Opcode::Neq),
            21 => Ok(Opcode::Lss),
            22 => Ok(Opcode::Leq),
            23 => Ok(Opcode::Gtr),
            24 => Ok(Opcode::Geq),
            other => Err(DecodeError::InvalidOpcode(other as i64)),
        }
    }
}

impl Opcode {
    /// Returns the listing/trace mnemonic for this opcode.
    ///
    /// All three SIO variants share the `sio` mnemonic; the operand fields
    /// distinguish them in a listing.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Lit => "lit",
            Opcode::Rtn => "rtn",
            Opcode::Lod => "lod",
            Opcode::Sto => "sto",
            Opcode::Cal => "cal",
            Opcode::Inc => "inc",
            Opcode::Jmp => "jmp",
            Opcode::Jpc => "jpc",
            Opcode::SioWrite | Opcode::SioRead | Opcode::SioHalt => "sio",
            Opcode::Neg => "neg",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Odd => "odd",
            Opcode::Mod => "mod",
            Opcode::Eql => "eql",
            Opcode::Neq => "neq",
            Opcode::Lss => "lss",
            Opcode::Leq => "leq",
            Opcode::Gtr => "gtr",
            Opcode::Geq => "geq",
        }
    }

    /// True for the three-register arithmetic/comparison opcodes whose `l`
    /// and `m` fields name source registers.
    pub fn uses_register_operands(&self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Mod
                | Opcode::Eql
                | Opcode::Neq
                | Opcode::Lss
                | Opcode::Leq
                | Opcode::Gtr
                | Opcode::Geq
        )
    }

    /// True for opcodes whose `m` field is an absolute instruction index.
    pub fn uses_code_target(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Jpc | Opcode::Cal)
    }
}
