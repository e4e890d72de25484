//! Machine state: register file, memory stack, and the frame resolver.

use crate::error::RuntimeError;
use pm0_common::{Instruction, Program, REGISTER_COUNT};

/// Maximum height of the memory stack.
pub const MAX_STACK_HEIGHT: usize = 2000;

/// The pm0 virtual machine.
///
/// Owns all mutable execution state. The stack is addressed 1-based; slot 0
/// is an unused sentinel. Every stack access is bounds-checked and returns an
/// explicit error instead of touching adjacent memory.
pub struct Vm<'a> {
    /// The program being executed. Read-only for the whole run.
    pub(crate) program: &'a Program,
    /// Register file.
    pub(crate) registers: [i64; REGISTER_COUNT],
    /// Memory stack, `MAX_STACK_HEIGHT + 1` slots, index 0 unused.
    pub(crate) stack: Vec<i64>,
    /// Index of the next instruction to fetch.
    pub(crate) pc: usize,
    /// Base of the current activation record.
    pub(crate) bp: usize,
    /// Topmost occupied stack slot.
    pub(crate) sp: usize,
    /// Number of instructions executed so far.
    pub(crate) steps: usize,
    /// Bases of activation records seen so far (presentation bookkeeping).
    pub(crate) record_bases: Vec<usize>,
    /// Whether the previously executed instruction was a CAL.
    pub(crate) prev_call: bool,
}

impl<'a> Vm<'a> {
    /// Create a machine for the given program, initialized to
    /// `{bp: 1, sp: 0, pc: 0}` with a zeroed stack and register file.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            registers: [0; REGISTER_COUNT],
            stack: vec![0; MAX_STACK_HEIGHT + 1],
            pc: 0,
            bp: 1,
            sp: 0,
            steps: 0,
            record_bases: Vec::new(),
            prev_call: false,
        }
    }

    /// Current program counter.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Current base pointer.
    pub fn bp(&self) -> usize {
        self.bp
    }

    /// Current stack pointer.
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Value of register `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r >= REGISTER_COUNT`; decoded instructions can never carry
    /// such an index.
    pub fn register(&self, r: usize) -> i64 {
        self.registers[r]
    }

    /// Snapshot view of the memory stack.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    /// Bases of every activation record recognized so far: one per CAL, and
    /// one per block-allocating INC (`m > 1` not immediately after a CAL).
    /// Presentation bookkeeping only; execution never consults this.
    pub fn activation_records(&self) -> &[usize] {
        &self.record_bases
    }

    /// Walk the static chain `levels` times from the current base pointer
    /// and return the base of the target activation record.
    ///
    /// `levels == 0` returns BP unchanged. Each hop reads the static-link
    /// slot (`stack[base + 1]`); a hop that leaves the stack or yields a
    /// value below the first frame base (walking past the bottom of the
    /// chain lands on zeroed slots) is an explicit error.
    pub fn resolve_base(&self, levels: u16) -> Result<usize, RuntimeError> {
        let mut base = self.bp;
        for _ in 0..levels {
            let link = self.read_stack(base as i64 + 1)?;
            base = match usize::try_from(link) {
                Ok(b) if b >= 1 => b,
                _ => {
                    return Err(RuntimeError::CorruptFrame {
                        at: self.fault_index(),
                        value: link,
                    })
                }
            };
        }
        Ok(base)
    }

    /// Index of the instruction currently being executed (PC is incremented
    /// before dispatch).
    pub(crate) fn fault_index(&self) -> usize {
        self.pc.saturating_sub(1)
    }

    /// Read the stack slot at `index`, bounds-checked.
    pub(crate) fn read_stack(&self, index: i64) -> Result<i64, RuntimeError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.stack.get(i))
            .copied()
            .ok_or(RuntimeError::StackOutOfRange {
                at: self.fault_index(),
                index,
            })
    }

    /// Write the stack slot at `index`, bounds-checked.
    pub(crate) fn write_stack(&mut self, index: i64, value: i64) -> Result<(), RuntimeError> {
        let at = self.fault_index();
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| self.stack.get_mut(i))
            .ok_or(RuntimeError::StackOutOfRange { at, index })?;
        *slot = value;
        Ok(())
    }

    /// Fetch the instruction at the current PC.
    pub(crate) fn fetch(&self) -> Result<&Instruction, RuntimeError> {
        self.program
            .get(self.pc)
            .ok_or(RuntimeError::EndOfProgram { at: self.pc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm0_common::{Opcode, Program};

    fn empty_program() -> Program {
        Program::new(vec![Instruction::new(Opcode::SioHalt, 0, 0, 0)])
    }

    #[test]
    fn initial_state() {
        let program = empty_program();
        let vm = Vm::new(&program);
        assert_eq!(vm.bp(), 1);
        assert_eq!(vm.sp(), 0);
        assert_eq!(vm.pc(), 0);
        assert_eq!(vm.steps(), 0);
        assert_eq!(vm.stack().len(), MAX_STACK_HEIGHT + 1);
        assert!(vm.stack().iter().all(|&v| v == 0));
    }

    #[test]
    fn resolve_zero_levels_returns_bp() {
        let program = empty_program();
        let mut vm = Vm::new(&program);
        for bp in [1usize, 5, 42, 1999] {
            vm.bp = bp;
            assert_eq!(vm.resolve_base(0), Ok(bp));
        }
    }

    #[test]
    fn resolve_follows_static_links() {
        let program = empty_program();
        let mut vm = Vm::new(&program);
        // Outer frame at 1, middle at 5, inner at 9; static links chain down.
        vm.stack[6] = 1; // static link of frame at 5
        vm.stack[10] = 5; // static link of frame at 9
        vm.bp = 9;
        assert_eq!(vm.resolve_base(1), Ok(5));
        assert_eq!(vm.resolve_base(2), Ok(1));
    }

    #[test]
    fn resolve_rejects_walk_past_bottom_frame() {
        // A fresh machine has one frame whose static-link slot is zero;
        // asking for an enclosing frame must fail, not land on base 0.
        let program = empty_program();
        let vm = Vm::new(&program);
        assert_eq!(
            vm.resolve_base(1),
            Err(RuntimeError::CorruptFrame { at: 0, value: 0 })
        );
        assert_eq!(
            vm.resolve_base(2),
            Err(RuntimeError::CorruptFrame { at: 0, value: 0 })
        );
    }

    #[test]
    fn resolve_rejects_negative_link() {
        let program = empty_program();
        let mut vm = Vm::new(&program);
        vm.bp = 9;
        vm.stack[10] = -3;
        assert_eq!(
            vm.resolve_base(1),
            Err(RuntimeError::CorruptFrame { at: 0, value: -3 })
        );
    }

    #[test]
    fn stack_reads_are_bounds_checked() {
        let program = empty_program();
        let vm = Vm::new(&program);
        assert!(vm.read_stack(0).is_ok());
        assert!(vm.read_stack(MAX_STACK_HEIGHT as i64).is_ok());
        assert_eq!(
            vm.read_stack(MAX_STACK_HEIGHT as i64 + 1),
            Err(RuntimeError::StackOutOfRange {
                at: 0,
                index: MAX_STACK_HEIGHT as i64 + 1
            })
        );
        assert_eq!(
            vm.read_stack(-1),
            Err(RuntimeError::StackOutOfRange { at: 0, index: -1 })
        );
    }

    #[test]
    fn stack_writes_are_bounds_checked() {
        let program = empty_program();
        let mut vm = Vm::new(&program);
        assert!(vm.write_stack(7, 99).is_ok());
        assert_eq!(vm.stack[7], 99);
        assert_eq!(
            vm.write_stack(MAX_STACK_HEIGHT as i64 + 1, 1),
            Err(RuntimeError::StackOutOfRange {
                at: 0,
                index: MAX_STACK_HEIGHT as i64 + 1
            })
        );
    }
}
