//! Direct (quadratic) construction of the FK20 proofs; the reference the
//! optimized prover is tested against.

use bls12_381::{g1_batch_normalize, G1Point, Scalar};
use polynomial::{bit_reversal_permutation, domain::Domain, poly_coeff::PolyCoeff};

use crate::commit_key::CommitKey;

/// `floor(f(x) / x^degree)`: drops the lowest `degree` coefficients.
fn shift_polynomial(poly: &PolyCoeff, degree: usize) -> &[Scalar] {
    let n = poly.len();
    if degree >= n {
        &[]
    } else {
        &poly[degree..]
    }
}

/// The `h` polynomials, one shift per proof (section 3.1.1 of the FK20
/// paper).
fn compute_h_polys(polynomial: &PolyCoeff, coset_size: usize) -> Vec<&[Scalar]> {
    assert!(coset_size.is_power_of_two());
    assert!(polynomial.len().is_power_of_two());

    let num_h_polys = polynomial.len() / coset_size;

    (1..=num_h_polys)
        .map(|index| shift_polynomial(polynomial, index * coset_size))
        .collect()
}

/// Computes the FK20 proofs and coset evaluations directly: commit to each
/// `h` polynomial separately, then FFT the commitments.
pub(crate) fn open_multi_point(
    commit_key: &CommitKey,
    polynomial: &PolyCoeff,
    coset_size: usize,
    number_of_points_to_open: usize,
) -> (Vec<G1Point>, Vec<Vec<Scalar>>) {
    assert!(number_of_points_to_open > coset_size);
    assert!(commit_key.g1s.len() >= polynomial.len());

    let h_polys = compute_h_polys(polynomial, coset_size);
    let h_poly_commitments: Vec<_> = h_polys
        .iter()
        .map(|h_poly| commit_key.commit_g1(h_poly))
        .collect();

    let proof_domain = Domain::new(number_of_points_to_open / coset_size);
    let proofs = proof_domain.fft_g1(h_poly_commitments);
    let mut proofs_affine = g1_batch_normalize(&proofs);
    bit_reversal_permutation(&mut proofs_affine);

    let evaluation_domain = Domain::new(number_of_points_to_open);
    let mut evaluations = evaluation_domain.fft_scalars(polynomial.clone());
    bit_reversal_permutation(&mut evaluations);
    let coset_evaluations = evaluations
        .chunks_exact(coset_size)
        .map(<[Scalar]>::to_vec)
        .collect();

    (proofs_affine, coset_evaluations)
}

/// A fixed non-trivial polynomial for the prover tests.
pub(crate) fn test_polynomial(len: usize) -> PolyCoeff {
    PolyCoeff((0..len as u64).map(|i| -Scalar::from(i + 1)).collect())
}
