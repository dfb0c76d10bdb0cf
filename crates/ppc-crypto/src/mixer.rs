//! # Byte Mixer
//!
//! The diffusion primitive shared by the keystream engine: a chained
//! substitution of four bytes followed by rotate-and-XOR cross diffusion.
//! The state helpers apply it to the 16-byte keystream state viewed as a
//! 4×4 grid, either along rows (contiguous groups) or columns (stride 4).

use crate::permutation::Permutation;

/// Rotate an 8-bit value left by `rotation` bits.
#[inline]
pub fn rotate_bits(value: u8, rotation: u32) -> u8 {
    value.rotate_left(rotation)
}

/// Substitute and cross-diffuse four bytes.
///
/// Each substitution is keyed by the previous substituted byte, then each
/// output byte folds in a rotation of its already-updated neighbour.
pub fn mix_bytes(a: u8, b: u8, c: u8, d: u8, perm: &Permutation) -> [u8; 4] {
    let a = perm.substitute(a);
    let b = perm.substitute(b.wrapping_add(a));
    let c = perm.substitute(c.wrapping_add(b));
    let d = perm.substitute(d.wrapping_add(c));

    let a = rotate_bits(a, 1) ^ rotate_bits(d, 3);
    let b = rotate_bits(b, 2) ^ rotate_bits(a, 1);
    let c = rotate_bits(c, 3) ^ rotate_bits(b, 2);
    let d = rotate_bits(d, 4) ^ rotate_bits(c, 3);
    [a, b, c, d]
}

/// Mix each row `(4r, 4r+1, 4r+2, 4r+3)` of the state.
pub fn mix_rows(state: &mut [u8; 16], perm: &Permutation) {
    for row in state.chunks_exact_mut(4) {
        let mixed = mix_bytes(row[0], row[1], row[2], row[3], perm);
        row.copy_from_slice(&mixed);
    }
}

/// Mix each column `(c, c+4, c+8, c+12)` of the state.
pub fn mix_columns(state: &mut [u8; 16], perm: &Permutation) {
    for col in 0..4 {
        let [a, b, c, d] = mix_bytes(
            state[col],
            state[col + 4],
            state[col + 8],
            state[col + 12],
            perm,
        );
        state[col] = a;
        state[col + 4] = b;
        state[col + 8] = c;
        state[col + 12] = d;
    }
}
