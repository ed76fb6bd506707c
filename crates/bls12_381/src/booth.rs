use std::ops::Neg;

/// Extracts the signed digit for one window of a little-endian scalar.
///
/// Booth recoding slices `window_size + 1` bits with a one-bit overlap
/// between neighbouring windows (a zero bit is appended at the least
/// significant end). Digits land in `[-2^(w-1), 2^(w-1)]`, which halves the
/// bucket space compared to unsigned windows without preprocessing the
/// scalar.
pub(crate) fn get_booth_index(window_index: usize, window_size: usize, el: &[u8]) -> i32 {
    let skip_bits = (window_index * window_size).saturating_sub(1);
    let skip_bytes = skip_bits / 8;

    // Pull the relevant bytes into a u32 window.
    let mut v: [u8; 4] = [0; 4];
    for (dst, src) in v.iter_mut().zip(el.iter().skip(skip_bytes)) {
        *dst = *src;
    }
    let mut tmp = u32::from_le_bytes(v);

    // The least significant window gets the appended zero bit.
    if window_index == 0 {
        tmp <<= 1;
    }

    tmp >>= skip_bits - (skip_bytes * 8);
    tmp &= (1 << (window_size + 1)) - 1;

    let sign = tmp & (1 << window_size) == 0;

    // ceil-divide by two to get the digit magnitude
    tmp = (tmp + 1) >> 1;

    if sign {
        tmp as i32
    } else {
        ((!(tmp - 1) & ((1 << window_size) - 1)) as i32).neg()
    }
}
