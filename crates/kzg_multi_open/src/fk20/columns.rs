use bls12_381::{g1_batch_normalize, traits::*, G1Point, G1Projective};
use maybe_rayon::prelude::*;
use polynomial::domain::Domain;

/// Splits `list` into `n` strided groups: group `i` holds the elements at
/// positions `i, i + n, i + 2n, ...`.
pub(crate) fn take_every_nth<T: Clone + Copy>(list: &[T], n: usize) -> Vec<Vec<T>> {
    (0..n)
        .map(|i| list.iter().copied().skip(i).step_by(n).collect())
        .collect()
}

/// The FK20 setup precomputation: the frequency-domain form of the SRS
/// vectors that every Toeplitz matrix-vector product is taken against.
///
/// The SRS is reversed and the lowest `coset_size` points dropped (a
/// quotient for a `coset_size` opening never touches them), strided into
/// `coset_size` vectors, and each vector is G1-FFT'd over the circulant
/// domain of twice its length. The result is returned transposed, grouped
/// by frequency: `2 * coset_size` groups (one per circulant frequency) of
/// `coset_size` points each.
///
/// For the blob configuration this is the `128 x 64` table that dominates
/// the settings precomputation.
pub fn compute_x_ext_fft_columns(g1s: &[G1Point], coset_size: usize) -> Vec<Vec<G1Point>> {
    assert!(coset_size.is_power_of_two());
    assert!(g1s.len() > coset_size);

    let srs_truncated: Vec<_> = g1s.iter().copied().rev().skip(coset_size).collect();
    let mut srs_vectors = take_every_nth(&srs_truncated, coset_size);

    // Pad each vector to the next power of two so the FFT domain below is
    // the same for all of them.
    for srs_vector in &mut srs_vectors {
        let pad_by = srs_vector.len().next_power_of_two();
        srs_vector.resize(pad_by, G1Point::identity());
    }

    let circulant_domain = Domain::new(coset_size * 2);

    let frequency_major: Vec<Vec<G1Point>> = srs_vectors
        .maybe_into_par_iter()
        .map(|vector| {
            let vector_projective = vector
                .iter()
                .map(|point| G1Projective::from(*point))
                .collect();
            g1_batch_normalize(&circulant_domain.fft_g1(vector_projective))
        })
        .collect();

    transpose(frequency_major)
}

/// Transposes a row-major 2D matrix.
pub(crate) fn transpose<T: Clone>(v: Vec<Vec<T>>) -> Vec<Vec<T>> {
    if v.is_empty() || v[0].is_empty() {
        return Vec::new();
    }

    let rows = v.len();
    let cols = v[0].len();

    let mut result = vec![Vec::with_capacity(rows); cols];

    for row in v {
        for (i, elem) in row.into_iter().enumerate() {
            result[i].push(elem);
        }
    }

    result
}
