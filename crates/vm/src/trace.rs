//! Stack-trace reconstruction and rendering.
//!
//! The tracer reconstructs every active activation record from a `(stack,
//! SP, BP)` snapshot by walking the dynamic chain, oldest record first. The
//! walk is iterative over the immutable snapshot, so arbitrarily deep call
//! chains cannot exhaust the host call stack, and a corrupted link ends the
//! walk instead of faulting.

use pm0_common::Instruction;

/// Reconstruct the active activation records, oldest to newest.
///
/// Each returned segment holds the live slots `stack[base..=top]` of one
/// record. The current record spans `BP..=SP`; each predecessor's top is one
/// below its successor's base, and its base is the successor's dynamic link
/// (`stack[base + 2]`). The walk terminates at the sentinel frame (`BP ==
/// 1`, which renders as a lone zero, not a segment) and skips records whose
/// base lies above their top (a frame pushed by CAL before its INC).
pub fn frame_segments(stack: &[i64], sp: usize, bp: usize) -> Vec<Vec<i64>> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut base = bp;
    let mut top = sp;

    while base > 1 {
        if base <= top {
            spans.push((base, top));
        }
        top = base - 1;
        let Some(&link) = stack.get(base + 2) else {
            break;
        };
        // The dynamic chain must strictly decrease; anything else means the
        // snapshot is corrupt and the walk stops here.
        match usize::try_from(link) {
            Ok(next) if next < base && next > 0 => base = next,
            _ => break,
        }
    }

    if base == 1 && top >= 1 {
        spans.push((1, top));
    }

    spans.reverse();
    spans
        .into_iter()
        .filter(|&(b, _)| b < stack.len())
        .map(|(b, t)| stack[b..=t.min(stack.len() - 1)].to_vec())
        .collect()
}

/// Render the nested-frame stack dump: the bottom sentinel as a lone zero,
/// then each activation record as a `| `-delimited group of width-3 values.
pub fn render_stack(stack: &[i64], sp: usize, bp: usize) -> String {
    if bp == 0 {
        return String::new();
    }

    let mut out = String::from("  0 ");
    for segment in frame_segments(stack, sp, bp) {
        out.push_str("| ");
        for value in segment {
            out.push_str(&format!("{value:>3} "));
        }
    }
    out
}

/// Column header for the execution trace table.
pub fn execution_header() -> String {
    format!(
        "{:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {} ",
        "#", "OP", "R", "L", "M", "PC", "BP", "SP", "STK"
    )
}

/// Render one executed instruction: its index, mnemonic and operands, the
/// resulting PC/BP/SP, and the reconstructed frame dump.
pub fn render_step(
    index: usize,
    instr: &Instruction,
    pc: usize,
    bp: usize,
    sp: usize,
    stack: &[i64],
) -> String {
    format!(
        "{:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {}",
        index,
        instr.opcode.mnemonic(),
        instr.r,
        instr.l,
        instr.m,
        pc,
        bp,
        sp,
        render_stack(stack, sp, bp)
    )
}
