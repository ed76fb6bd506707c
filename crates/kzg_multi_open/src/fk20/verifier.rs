use crate::{fk20::cosets::coset_gens, verification_key::VerificationKey};
use bls12_381::{
    ff::Field, g1_batch_normalize, lincomb::g1_lincomb, multi_pairings, reduce_bytes_to_scalar,
    G1Point, G2Prepared, Scalar,
};
use polynomial::{bit_reversal_permutation, domain::Domain, poly_coeff::PolyCoeff, CosetFFT};
use sha2::{Digest, Sha256};

/// Wire-order index of a coset. Prover and verifier agree on the coset
/// layout, so an index is all that needs to travel.
pub type CosetIndex = u64;

/// Index into a deduplicated commitment list. Batches routinely open many
/// cosets of the same polynomial, so commitments are sent once and rows
/// refer to them by position.
pub type CommitmentIndex = u64;

/// Domain separator for the cell-batch verification challenge.
const DOMAIN_SEP: &str = "RCKZGCBATCH__V1_";

/// Batch verifier for coset opening proofs.
#[derive(Debug)]
pub struct FK20Verifier {
    pub verification_key: VerificationKey,
    /// Coset shifts in wire order.
    pub bit_reversed_coset_gens: Vec<Scalar>,
    /// Domain of one coset; interpolation polynomials live here.
    coset_domain: Domain,
    // Precomputed pairing inputs.
    //
    // [tau^n]_2
    tau_pow_n: G2Prepared,
    // [-1]_2
    neg_g2_gen: G2Prepared,
    /// Coset shifts raised to the coset size, one per coset in wire
    /// order; the `h^n` weights of the final pairing.
    bit_reversed_coset_gens_pow_n: Vec<Scalar>,
    /// Coset shifts packaged for coset IFFTs.
    bit_reversed_coset_fft_gens: Vec<CosetFFT>,
}

impl FK20Verifier {
    pub fn new(
        verification_key: VerificationKey,
        num_points_to_open: usize,
        num_cosets: usize,
    ) -> Self {
        const BIT_REVERSED: bool = true;

        let coset_size = num_points_to_open / num_cosets;
        assert!(
            verification_key.g2s.len() > coset_size,
            "the verification key must hold more than coset_size G2 points"
        );

        assert_eq!(coset_size, verification_key.coset_size);

        let coset_gens = coset_gens(num_points_to_open, num_cosets, BIT_REVERSED);
        let coset_domain = Domain::new(verification_key.coset_size);

        let n = verification_key.coset_size;
        let tau_pow_n = G2Prepared::from(verification_key.g2s[n]);
        let neg_g2_gen = G2Prepared::from(-verification_key.g2_gen);

        let coset_gens_pow_n = coset_gens
            .iter()
            .map(|gen| gen.pow_vartime([n as u64]))
            .collect();
        let coset_fft_gens = coset_gens.iter().map(|gen| CosetFFT::new(*gen)).collect();

        Self {
            verification_key,
            bit_reversed_coset_gens: coset_gens,
            coset_domain,
            tau_pow_n,
            neg_g2_gen,
            bit_reversed_coset_gens_pow_n: coset_gens_pow_n,
            bit_reversed_coset_fft_gens: coset_fft_gens,
        }
    }

    /// Verifies a batch of coset openings with one two-term pairing.
    ///
    /// Every row `i` claims that the polynomial behind
    /// `deduplicated_commitments[commitment_indices[i]]` evaluates to
    /// `coset_evals[i]` over the coset `coset_indices[i]`, with proof
    /// `proofs[i]`. The rows are folded with powers of a Fiat-Shamir
    /// challenge; soundness follows from Schwartz-Zippel.
    ///
    /// Returns false when the pairing check fails; that is a well-formed
    /// "no", not an error. Panics if the row slices disagree in length or
    /// an index is out of bounds — callers validate untrusted input first.
    pub fn verify_multi_opening(
        &self,
        deduplicated_commitments: &[G1Point],
        commitment_indices: &[CommitmentIndex],
        coset_indices: &[CosetIndex],
        coset_evals: &[Vec<Scalar>],
        proofs: &[G1Point],
    ) -> bool {
        assert_eq!(
            commitment_indices.len(),
            proofs.len(),
            "each opening must reference a commitment"
        );
        assert_eq!(
            coset_indices.len(),
            proofs.len(),
            "each opening must reference a coset"
        );
        assert_eq!(
            coset_evals.len(),
            proofs.len(),
            "each opening must carry its claimed evaluations"
        );

        let batch_size = coset_indices.len();

        // One challenge from the whole transcript; the rest are its
        // powers.
        let r = compute_batch_challenge(
            &self.verification_key,
            deduplicated_commitments,
            commitment_indices,
            coset_indices,
            coset_evals,
            proofs,
        );
        let r_powers = compute_powers(r, batch_size);

        // sum r^i proof_i
        let random_sum_proofs = g1_lincomb(proofs, &r_powers)
            .expect("as many proofs as powers of the challenge");

        // sum r^i h_i^n proof_i, where h_i is the coset shift of row i.
        let weighted_r_powers: Vec<Scalar> = coset_indices
            .iter()
            .zip(&r_powers)
            .map(|(coset_index, r_power)| {
                r_power * self.bit_reversed_coset_gens_pow_n[*coset_index as usize]
            })
            .collect();
        let random_weighted_sum_proofs = g1_lincomb(proofs, &weighted_r_powers)
            .expect("as many proofs as weighted powers");

        // sum r^i C_(index_i), folding repeated commitments into one
        // weight each so the MSM stays as small as the deduplicated list.
        let mut weights = vec![Scalar::ZERO; deduplicated_commitments.len()];
        for (commitment_index, r_power) in commitment_indices.iter().zip(&r_powers) {
            weights[*commitment_index as usize] += r_power;
        }
        let random_sum_commitments = g1_lincomb(deduplicated_commitments, &weights)
            .expect("one weight per deduplicated commitment");

        // Commitment to sum r^i I_i(X), where I_i interpolates row i's
        // evaluations over its coset.
        let random_sum_interpolation_poly = self.sum_interpolation_poly(
            coset_evals,
            coset_indices,
            &r_powers,
        );
        let comm_random_sum_interpolation_poly = self
            .verification_key
            .commit_g1(&random_sum_interpolation_poly);

        let pairing_input_g1 = (random_sum_commitments - comm_random_sum_interpolation_poly)
            + random_weighted_sum_proofs;

        let normalized = g1_batch_normalize(&[random_sum_proofs, pairing_input_g1]);

        multi_pairings(&[
            (&normalized[0], &self.tau_pow_n),
            (&normalized[1], &self.neg_g2_gen),
        ])
    }

    /// `sum_i r^i I_i(X)`: each row's evaluations are un-permuted,
    /// interpolated over their coset with a coset IFFT, scaled by the
    /// row's challenge power and accumulated.
    fn sum_interpolation_poly(
        &self,
        coset_evals: &[Vec<Scalar>],
        coset_indices: &[CosetIndex],
        r_powers: &[Scalar],
    ) -> PolyCoeff {
        let mut sum = PolyCoeff::default();

        for ((coset_eval, coset_index), r_power) in
            coset_evals.iter().zip(coset_indices).zip(r_powers)
        {
            let mut eval = coset_eval.clone();
            bit_reversal_permutation(&mut eval);

            let coset_gen = &self.bit_reversed_coset_fft_gens[*coset_index as usize];
            let mut interpolation_poly = self.coset_domain.coset_ifft_scalars(eval, coset_gen);

            for coeff in interpolation_poly.iter_mut() {
                *coeff *= r_power;
            }

            sum = sum.add(&interpolation_poly);
        }

        sum
    }
}

/// The cell-batch Fiat-Shamir challenge.
///
/// Transcript: tag, polynomial degree, coset size, commitment count and
/// row count (8-byte little-endian integers), the deduplicated
/// commitments, then per row its commitment index, coset index,
/// evaluations (32-byte big-endian scalars) and proof.
fn compute_batch_challenge(
    verification_key: &VerificationKey,
    row_commitments: &[G1Point],
    commitment_indices: &[CommitmentIndex],
    coset_indices: &[CosetIndex],
    coset_evals: &[Vec<Scalar>],
    proofs: &[G1Point],
) -> Scalar {
    let num_rows = coset_indices.len();

    let hash_input_size = DOMAIN_SEP.len()
        + size_of::<u64>() // polynomial degree
        + size_of::<u64>() // coset size
        + size_of::<u64>() // number of commitments
        + size_of::<u64>() // number of rows
        + row_commitments.len() * 48
        + num_rows * (2 * size_of::<u64>() + verification_key.coset_size * 32 + 48);

    let mut hash_input: Vec<u8> = Vec::with_capacity(hash_input_size);

    hash_input.extend(DOMAIN_SEP.as_bytes());
    hash_input.extend((verification_key.num_coefficients_in_polynomial as u64).to_le_bytes());
    hash_input.extend((verification_key.coset_size as u64).to_le_bytes());
    hash_input.extend((row_commitments.len() as u64).to_le_bytes());
    hash_input.extend((num_rows as u64).to_le_bytes());

    for commitment in row_commitments {
        hash_input.extend(commitment.to_compressed());
    }

    for row in 0..num_rows {
        hash_input.extend(commitment_indices[row].to_le_bytes());
        hash_input.extend(coset_indices[row].to_le_bytes());
        for eval in &coset_evals[row] {
            hash_input.extend(eval.to_bytes_be());
        }
        hash_input.extend(proofs[row].to_compressed());
    }

    assert_eq!(hash_input.len(), hash_input_size);
    let mut hasher = Sha256::new();
    hasher.update(hash_input);
    let result: [u8; 32] = hasher.finalize().into();

    // ~128 uniform bits are enough for a batching challenge; the bias
    // from the modular reduction is negligible at that size.
    reduce_bytes_to_scalar(result)
}

/// `[1, x, x^2, ..., x^(n-1)]`
fn compute_powers(value: Scalar, num_elements: usize) -> Vec<Scalar> {
    let mut powers = Vec::with_capacity(num_elements);
    let mut current_power = Scalar::ONE;

    for _ in 0..num_elements {
        powers.push(current_power);
        current_power *= value;
    }

    powers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fk20::prover::tests::{
        insecure_keys, test_prover, NUM_COSETS, NUM_POINTS_TO_OPEN, POLY_LEN,
    };

    #[test]
    fn compute_powers_basic() {
        let base = Scalar::from(2u64);
        let powers = compute_powers(base, 5);

        assert_eq!(powers.len(), 5);
        assert_eq!(powers[0], Scalar::ONE);
        for (i, power) in powers.iter().enumerate() {
            assert_eq!(*power, base.pow_vartime([i as u64]));
        }

        assert!(compute_powers(base, 0).is_empty());
    }

    #[test]
    fn tampered_rows_fail_batch_verification() {
        let (ck, vk) = insecure_keys();
        let fk20 = test_prover(&ck);
        let verifier = FK20Verifier::new(vk, NUM_POINTS_TO_OPEN, NUM_COSETS);

        let data: Vec<_> = (0..POLY_LEN as u64).map(Scalar::from).collect();
        let poly = fk20.interpolate(data);
        let commitment: G1Point = ck.commit_g1(&poly).into();
        let (proofs, cells) = fk20.compute_multi_opening_proofs(poly);

        let coset_indices: Vec<u64> = (0..NUM_COSETS as u64).collect();
        let commitment_indices = vec![0u64; NUM_COSETS];

        // Baseline: the honest batch verifies.
        assert!(verifier.verify_multi_opening(
            &[commitment],
            &commitment_indices,
            &coset_indices,
            &cells,
            &proofs,
        ));

        // A single corrupted evaluation must sink the whole batch.
        let mut bad_cells = cells.clone();
        bad_cells[3][1] += Scalar::ONE;
        assert!(!verifier.verify_multi_opening(
            &[commitment],
            &commitment_indices,
            &coset_indices,
            &bad_cells,
            &proofs,
        ));

        // Swapping two proofs must fail as well.
        let mut bad_proofs = proofs.clone();
        bad_proofs.swap(0, 1);
        assert!(!verifier.verify_multi_opening(
            &[commitment],
            &commitment_indices,
            &coset_indices,
            &cells,
            &bad_proofs,
        ));

        // A subset of the rows still verifies.
        assert!(verifier.verify_multi_opening(
            &[commitment],
            &commitment_indices[..4],
            &coset_indices[..4],
            &cells[..4],
            &proofs[..4],
        ));
    }
}
