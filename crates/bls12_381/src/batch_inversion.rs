use ff::Field;

/// Inverts every element of `v` in place.
///
/// Panics if any element is zero.
pub fn batch_inverse<F: Field>(v: &mut [F]) {
    let mut scratchpad = Vec::with_capacity(v.len());
    batch_inverse_scratch_pad(v, &mut scratchpad);
}

/// Inverts every element of `v` in place, reusing `scratchpad` for the
/// intermediate products so repeated calls do not reallocate.
///
/// Montgomery's trick: one field inversion plus 3(n-1) multiplications.
///
/// Panics if any element is zero.
pub fn batch_inverse_scratch_pad<F: Field>(v: &mut [F], scratchpad: &mut Vec<F>) {
    let n = v.len();
    if n == 0 {
        return;
    }

    scratchpad.clear();
    scratchpad.reserve(n);

    // Forward pass: running products [a, ab, abc, ...]
    let mut tmp = F::ONE;
    for f in v.iter() {
        tmp *= f;
        scratchpad.push(tmp);
    }

    // A single inversion of the total product.
    tmp = tmp
        .invert()
        .expect("batch inversion requires all inputs to be non-zero");

    // Backward pass: peel off one factor at a time.
    for (f, s) in v
        .iter_mut()
        .rev()
        .zip(scratchpad.iter().rev().skip(1).chain(Some(&F::ONE)))
    {
        let next_tmp = tmp * *f;
        *f = tmp * *s;
        tmp = next_tmp;
    }
}
