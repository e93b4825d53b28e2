//! Z-order (Morton) comparison of cell coordinates without building keys.

use crate::grid::CellCoord;
use std::cmp::Ordering;

/// True when the highest set bit of `x` is strictly below that of `y`.
#[inline]
pub fn less_msb(x: u32, y: u32) -> bool {
    x < y && x < (x ^ y)
}

/// Z-order comparison.
///
/// The axis whose coordinates differ at the most significant bit decides the
/// order; on a tie the x axis wins. This is the order of [`interleave`].
pub fn morton_cmp(a: CellCoord, b: CellCoord) -> Ordering {
    let mut axis = 0;
    let mut msb = 0;
    for k in 0..2 {
        let diff = a.axis(k) ^ b.axis(k);
        if less_msb(msb, diff) {
            axis = k;
            msb = diff;
        }
    }
    a.axis(axis).cmp(&b.axis(axis))
}

/// Interleaved-bit Morton key with x bits above y bits at each level.
pub fn interleave(c: CellCoord) -> u64 {
    (spread(c.x) << 1) | spread(c.y)
}

fn spread(v: u32) -> u64 {
    let mut v = v as u64;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}
