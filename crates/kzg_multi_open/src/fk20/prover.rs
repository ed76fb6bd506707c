use bls12_381::fixed_base_msm::UsePrecomp;
use bls12_381::traits::Field;
use bls12_381::{g1_batch_normalize, G1Point, G1Projective, Scalar};
use polynomial::{bit_reversal_permutation, domain::Domain, poly_coeff::PolyCoeff};

use crate::fk20::batch_toeplitz::BatchToeplitzMatrixVecMul;
use crate::fk20::columns::take_every_nth;
use crate::fk20::toeplitz::ToeplitzMatrix;

/// Produces every coset opening proof for a polynomial at once.
///
/// FK20 (Feist-Khovratovich) observes that the quotient polynomials for
/// openings at all cosets of the domain share a family of "h" polynomials
/// whose commitments can be computed together as a sum of Toeplitz
/// matrix-vector products, followed by one G1 FFT over the proof domain.
/// The overall cost is quasi-linear instead of quadratic.
///
/// See <https://github.com/khovratovich/Kate/blob/master/Kate_amortized.pdf>.
#[derive(Debug)]
pub struct FK20Prover {
    batch_toeplitz: BatchToeplitzMatrixVecMul,
    /// Number of points a single proof attests to; `l` in the paper.
    coset_size: usize,
    /// Total number of points opened across all proofs.
    number_of_points_to_open: usize,

    /// Domain of size `number_of_points_to_open / coset_size`; the proofs
    /// are its G1 FFT.
    proof_domain: Domain,
    /// Domain the polynomial is evaluated over to produce the coset
    /// evaluations.
    evaluation_domain: Domain,
    /// Domain of the polynomial itself, used to interpolate wire-format
    /// data into monomial form.
    poly_domain: Domain,
}

impl FK20Prover {
    /// `x_ext_fft_columns` is the precomputed table from
    /// [`crate::fk20::columns::compute_x_ext_fft_columns`] for the same
    /// `coset_size`.
    pub fn new(
        x_ext_fft_columns: Vec<Vec<G1Point>>,
        polynomial_bound: usize,
        coset_size: usize,
        number_of_points_to_open: usize,
        use_precomp: UsePrecomp,
    ) -> Self {
        assert!(coset_size.is_power_of_two());
        assert!(number_of_points_to_open.is_power_of_two());
        assert!(number_of_points_to_open > coset_size);
        assert!(polynomial_bound.is_power_of_two());
        assert_eq!(x_ext_fft_columns.len(), 2 * coset_size);

        let batch_toeplitz = BatchToeplitzMatrixVecMul::new(x_ext_fft_columns, use_precomp);
        assert_eq!(batch_toeplitz.batch_size(), coset_size);

        let num_proofs = number_of_points_to_open / coset_size;

        Self {
            batch_toeplitz,
            coset_size,
            number_of_points_to_open,
            proof_domain: Domain::new(num_proofs),
            evaluation_domain: Domain::new(number_of_points_to_open),
            poly_domain: Domain::new(polynomial_bound),
        }
    }

    /// Number of proofs a single run produces.
    pub const fn num_proofs(&self) -> usize {
        self.number_of_points_to_open / self.coset_size
    }

    /// Interpolates wire-format data (evaluations over the bit-reversed
    /// polynomial domain) into monomial form.
    pub fn interpolate(&self, mut brp_evaluations: Vec<Scalar>) -> PolyCoeff {
        bit_reversal_permutation(&mut brp_evaluations);
        self.poly_domain.ifft_scalars(brp_evaluations)
    }

    /// Evaluates the polynomial over the extended domain and groups the
    /// results into wire-order cosets.
    ///
    /// One FFT over the full extended domain plus a bit-reversal gives
    /// every coset contiguously; no per-coset evaluation is needed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn extend_polynomial(&self, polynomial: PolyCoeff) -> Vec<Vec<Scalar>> {
        let mut evaluations = self.evaluation_domain.fft_scalars(polynomial);
        bit_reversal_permutation(&mut evaluations);
        evaluations
            .chunks_exact(self.coset_size)
            .map(|slice| slice.to_vec())
            .collect()
    }

    /// Commitments to the `h` polynomials (section 3.1.1 of the paper):
    /// the coefficient vector is reversed, strided into `coset_size`
    /// Toeplitz rows, and the whole family is committed with one batched
    /// Toeplitz product against the precomputed SRS columns.
    fn compute_h_poly_commitments(&self, mut polynomial: PolyCoeff) -> Vec<G1Projective> {
        assert_eq!(
            polynomial.len(),
            self.poly_domain.size(),
            "expected a polynomial over the full polynomial domain"
        );

        // Highest-degree coefficient first; the paper's ordering.
        polynomial.reverse();

        let toeplitz_rows = take_every_nth(&polynomial, self.coset_size);

        let mut matrices = Vec::with_capacity(toeplitz_rows.len());
        for row in toeplitz_rows {
            let mut toeplitz_column = vec![Scalar::ZERO; row.len()];
            toeplitz_column[0] = row[0];
            matrices.push(ToeplitzMatrix::new(row, toeplitz_column));
        }

        self.batch_toeplitz.sum_matrix_vector_mul(matrices)
    }

    /// Computes all opening proofs and the matching coset evaluations, in
    /// wire (bit-reversed) order.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn compute_multi_opening_proofs(
        &self,
        polynomial: PolyCoeff,
    ) -> (Vec<G1Point>, Vec<Vec<Scalar>>) {
        let h_poly_commitments = self.compute_h_poly_commitments(polynomial.clone());
        let mut proofs = self.proof_domain.fft_g1(h_poly_commitments);

        // Line the proofs up with the wire order of the coset evaluations.
        bit_reversal_permutation(&mut proofs);

        (
            g1_batch_normalize(&proofs),
            self.extend_polynomial(polynomial),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use bls12_381::{ff::Field, fixed_base_msm::UsePrecomp, Scalar};

    use crate::{
        commit_key::CommitKey,
        compute_x_ext_fft_columns,
        fk20::naive,
        verification_key::VerificationKey,
        FK20Prover, FK20Verifier,
    };

    pub(crate) const POLY_LEN: usize = 64;
    pub(crate) const COSET_SIZE: usize = 8;
    pub(crate) const NUM_POINTS_TO_OPEN: usize = 2 * POLY_LEN;
    pub(crate) const NUM_COSETS: usize = NUM_POINTS_TO_OPEN / COSET_SIZE;

    /// Commitment and verification keys over a known secret. Only for
    /// tests.
    pub(crate) fn insecure_keys() -> (CommitKey, VerificationKey) {
        use bls12_381::{
            g1_batch_normalize, g2_batch_normalize, traits::*, G1Projective, G2Projective,
        };

        let secret = -Scalar::ONE;

        let mut g1_points = Vec::new();
        let mut current_secret_pow = Scalar::ONE;
        for _ in 0..POLY_LEN {
            g1_points.push(G1Projective::generator() * current_secret_pow);
            current_secret_pow *= secret;
        }
        let g1_points = g1_batch_normalize(&g1_points);

        let ck = CommitKey::new(g1_points.clone());

        let mut g2_points = Vec::new();
        let mut current_secret_pow = Scalar::ONE;
        for _ in 0..=COSET_SIZE {
            g2_points.push(G2Projective::generator() * current_secret_pow);
            current_secret_pow *= secret;
        }
        let g2_points = g2_batch_normalize(&g2_points);

        let vk = VerificationKey::new(
            g1_points[0..=COSET_SIZE].to_vec(),
            g2_points,
            COSET_SIZE,
            POLY_LEN,
        );

        (ck, vk)
    }

    pub(crate) fn test_prover(ck: &CommitKey) -> FK20Prover {
        FK20Prover::new(
            compute_x_ext_fft_columns(&ck.g1s, COSET_SIZE),
            POLY_LEN,
            COSET_SIZE,
            NUM_POINTS_TO_OPEN,
            UsePrecomp::No,
        )
    }

    #[test]
    fn wire_format_data_lands_in_the_first_cells() {
        // Proving over interpolated wire-format data must reproduce that
        // data verbatim in the leading coset evaluations.
        let (ck, _) = insecure_keys();
        let fk20 = test_prover(&ck);
        assert_eq!(fk20.num_proofs(), NUM_COSETS);

        let data: Vec<_> = (0..POLY_LEN as u64).map(Scalar::from).collect();
        let (proofs, cells) = fk20.compute_multi_opening_proofs(fk20.interpolate(data.clone()));
        assert_eq!(proofs.len(), fk20.num_proofs());

        let cells_flattened: Vec<_> = cells.into_iter().flatten().collect();
        assert_eq!(&data, &cells_flattened[..POLY_LEN]);
    }

    #[test]
    fn proofs_match_the_naive_construction() {
        let (ck, _) = insecure_keys();
        let fk20 = test_prover(&ck);

        let poly = crate::fk20::naive::test_polynomial(POLY_LEN);

        let (expected_proofs, expected_evaluations) =
            naive::open_multi_point(&ck, &poly, COSET_SIZE, NUM_POINTS_TO_OPEN);

        let (got_proofs, got_evaluations) = fk20.compute_multi_opening_proofs(poly);

        assert_eq!(got_evaluations, expected_evaluations);
        assert_eq!(got_proofs, expected_proofs);
    }

    #[test]
    fn precomputed_tables_do_not_change_the_proofs() {
        let (ck, _) = insecure_keys();
        let columns = compute_x_ext_fft_columns(&ck.g1s, COSET_SIZE);

        let poly = crate::fk20::naive::test_polynomial(POLY_LEN);

        let plain = FK20Prover::new(
            columns.clone(),
            POLY_LEN,
            COSET_SIZE,
            NUM_POINTS_TO_OPEN,
            UsePrecomp::No,
        );
        let precomp = FK20Prover::new(
            columns,
            POLY_LEN,
            COSET_SIZE,
            NUM_POINTS_TO_OPEN,
            UsePrecomp::Yes { width: 8 },
        );

        assert_eq!(
            plain.compute_multi_opening_proofs(poly.clone()),
            precomp.compute_multi_opening_proofs(poly)
        );
    }

    #[test]
    fn prove_then_verify_round_trip() {
        let (ck, vk) = insecure_keys();
        let fk20 = test_prover(&ck);
        let verifier = FK20Verifier::new(vk, NUM_POINTS_TO_OPEN, NUM_COSETS);

        let data: Vec<_> = (0..POLY_LEN as u64).map(Scalar::from).collect();
        let poly = fk20.interpolate(data);

        let commitment = ck.commit_g1(&poly).into();
        let (proofs, cells) = fk20.compute_multi_opening_proofs(poly);

        let coset_indices: Vec<u64> = (0..NUM_COSETS as u64).collect();
        let valid = verifier.verify_multi_opening(
            &[commitment],
            &vec![0u64; NUM_COSETS],
            &coset_indices,
            &cells,
            &proofs,
        );
        assert!(valid);
    }
}
