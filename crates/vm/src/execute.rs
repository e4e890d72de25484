//! Single-step instruction semantics and the fetch/execute driver loop.

use crate::error::RuntimeError;
use crate::io::Channels;
use crate::machine::{Vm, MAX_STACK_HEIGHT};
use crate::trace;
use pm0_common::{Instruction, Opcode};
use std::io::Write;

/// Outcome of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep fetching.
    Continue,
    /// The machine halted normally.
    Halt,
}

impl<'a> Vm<'a> {
    /// Fetch, pre-increment PC, and execute exactly one instruction.
    ///
    /// Control-transfer opcodes overwrite PC after the pre-increment, which
    /// is why JMP/JPC/CAL/RTN targets are absolute instruction indices.
    pub fn step(&mut self, io: &mut Channels<'_>) -> Result<Step, RuntimeError> {
        let instr = *self.fetch()?;
        self.pc += 1;
        self.steps += 1;
        let outcome = self.dispatch(&instr, io)?;
        self.note_record(&instr);
        Ok(outcome)
    }

    /// Run until the machine halts.
    pub fn run(&mut self, io: &mut Channels<'_>) -> Result<(), RuntimeError> {
        while self.step(io)? == Step::Continue {}
        Ok(())
    }

    /// Run until halt, writing one trace line per executed instruction.
    ///
    /// The trace shows the executed instruction, the resulting PC/BP/SP, and
    /// the reconstructed activation-record groups, and ends with a `HLT`
    /// marker on normal halt.
    pub fn run_traced(
        &mut self,
        io: &mut Channels<'_>,
        trace: &mut dyn Write,
    ) -> Result<(), RuntimeError> {
        let trace_err = |e: std::io::Error, at: usize| RuntimeError::Io {
            at,
            message: e.to_string(),
        };

        writeln!(trace, "\n***Execution***").map_err(|e| trace_err(e, self.pc))?;
        writeln!(trace, "{}", trace::execution_header()).map_err(|e| trace_err(e, self.pc))?;

        loop {
            let index = self.pc;
            let instr = *self.fetch()?;
            let outcome = self.step(io)?;
            let line = trace::render_step(index, &instr, self.pc, self.bp, self.sp, &self.stack);
            writeln!(trace, "{line}").map_err(|e| trace_err(e, index))?;
            if outcome == Step::Halt {
                break;
            }
        }

        writeln!(trace, "HLT").map_err(|e| trace_err(e, self.pc))?;
        Ok(())
    }

    fn dispatch(&mut self, instr: &Instruction, io: &mut Channels<'_>) -> Result<Step, RuntimeError> {
        let r = instr.r as usize;

        match instr.opcode {
            Opcode::Lit => self.registers[r] = instr.m,

            Opcode::Rtn => self.exec_rtn()?,

            Opcode::Lod => {
                let base = self.resolve_base(instr.l)?;
                self.registers[r] = self.read_stack(base as i64 + instr.m)?;
            }

            Opcode::Sto => {
                let base = self.resolve_base(instr.l)?;
                self.write_stack(base as i64 + instr.m, self.registers[r])?;
            }

            Opcode::Cal => self.exec_cal(instr)?,

            Opcode::Inc => {
                let new_sp = self.sp as i64 + instr.m;
                if !(0..=MAX_STACK_HEIGHT as i64).contains(&new_sp) {
                    return Err(RuntimeError::StackOutOfRange {
                        at: self.fault_index(),
                        index: new_sp,
                    });
                }
                self.sp = new_sp as usize;
            }

            Opcode::Jmp => self.pc = instr.m as usize,

            Opcode::Jpc => {
                if self.registers[r] == 0 {
                    self.pc = instr.m as usize;
                }
            }

            Opcode::SioWrite => io.write_int(self.registers[r], self.fault_index())?,

            Opcode::SioRead => self.registers[r] = io.read_int(self.fault_index())?,

            Opcode::SioHalt => return Ok(Step::Halt),

            Opcode::Neg => self.registers[r] = self.registers[r].wrapping_neg(),

            Opcode::Add => self.exec_binary(instr, i64::wrapping_add),
            Opcode::Sub => self.exec_binary(instr, i64::wrapping_sub),
            Opcode::Mul => self.exec_binary(instr, i64::wrapping_mul),
            Opcode::Div => self.exec_divmod(instr, i64::wrapping_div)?,
            Opcode::Odd => self.registers[r] %= 2,
            Opcode::Mod => self.exec_divmod(instr, i64::wrapping_rem)?,

            Opcode::Eql => self.exec_compare(instr, |a, b| a == b),
            Opcode::Neq => self.exec_compare(instr, |a, b| a != b),
            Opcode::Lss => self.exec_compare(instr, |a, b| a < b),
            Opcode::Leq => self.exec_compare(instr, |a, b| a <= b),
            Opcode::Gtr => self.exec_compare(instr, |a, b| a > b),
            Opcode::Geq => self.exec_compare(instr, |a, b| a >= b),
        }

        Ok(Step::Continue)
    }

    /// Pop the current frame: restore the caller's SP, PC, and BP from the
    /// activation-record header.
    fn exec_rtn(&mut self) -> Result<(), RuntimeError> {
        let at = self.fault_index();
        if self.bp == 0 {
            return Err(RuntimeError::CorruptFrame { at, value: 0 });
        }
        let new_sp = self.bp - 1;

        let return_pc = self.read_stack(new_sp as i64 + 4)?;
        let saved_bp = self.read_stack(new_sp as i64 + 3)?;

        self.pc = usize::try_from(return_pc).map_err(|_| RuntimeError::CorruptReturn {
            at,
            value: return_pc,
        })?;
        self.bp = usize::try_from(saved_bp).map_err(|_| RuntimeError::CorruptFrame {
            at,
            value: saved_bp,
        })?;
        self.sp = new_sp;
        Ok(())
    }

    /// Push a new activation-record header above SP and transfer control.
    ///
    /// Header layout at the new base `b = sp + 1`: `b` reserved zero, `b+1`
    /// static link (resolved from the caller's BP), `b+2` dynamic link,
    /// `b+3` return PC. SP itself is unchanged; the callee's INC allocates
    /// its locals.
    fn exec_cal(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let static_link = self.resolve_base(instr.l)?;
        let base = self.sp as i64 + 1;

        self.write_stack(base, 0)?;
        self.write_stack(base + 1, static_link as i64)?;
        self.write_stack(base + 2, self.bp as i64)?;
        self.write_stack(base + 3, self.pc as i64)?;

        self.bp = base as usize;
        self.pc = instr.m as usize;
        Ok(())
    }

    /// Three-register arithmetic. Operands are read before the destination
    /// is written, so `r == l` or `r == m` aliasing is well-defined.
    fn exec_binary(&mut self, instr: &Instruction, op: fn(i64, i64) -> i64) {
        let a = self.registers[instr.l as usize];
        let b = self.registers[instr.m as usize];
        self.registers[instr.r as usize] = op(a, b);
    }

    /// Division/modulo with an explicit zero-divisor fault.
    fn exec_divmod(
        &mut self,
        instr: &Instruction,
        op: fn(i64, i64) -> i64,
    ) -> Result<(), RuntimeError> {
        let a = self.registers[instr.l as usize];
        let b = self.registers[instr.m as usize];
        if b == 0 {
            return Err(RuntimeError::DivisionByZero {
                at: self.fault_index(),
            });
        }
        self.registers[instr.r as usize] = op(a, b);
        Ok(())
    }

    /// Three-register comparison producing 0/1.
    fn exec_compare(&mut self, instr: &Instruction, op: fn(i64, i64) -> bool) {
        let a = self.registers[instr.l as usize];
        let b = self.registers[instr.m as usize];
        self.registers[instr.r as usize] = op(a, b) as i64;
    }

    /// Record activation-record bases for trace attribution: every CAL, and
    /// every INC with `m > 1` that does not immediately follow a CAL (a
    /// block-created record rather than a call-created one).
    fn note_record(&mut self, instr: &Instruction) {
        if instr.opcode == Opcode::Cal {
            self.record_bases.push(self.bp);
            self.prev_call = true;
        } else {
            if instr.opcode == Opcode::Inc && !self.prev_call && instr.m > 1 {
                self.record_bases.push(self.bp);
            }
            self.prev_call = false;
        }
    }
}
