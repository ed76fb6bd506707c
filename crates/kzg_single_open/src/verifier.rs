use bls12_381::{
    group::Curve, lincomb::g1_lincomb, multi_pairings, G1Point, G2Point, G2Prepared, Scalar,
};
use polynomial::{bit_reversal_permutation, domain::Domain};

use crate::quotient::evaluate;

/// The points needed to check a single opening:
/// the G1/G2 generators and `[tau] G2`.
#[derive(Debug, Clone)]
pub struct VerificationKey {
    pub g1_gen: G1Point,
    pub g2_gen: G2Point,
    pub tau_g2: G2Point,
}

/// Verifies single-point opening proofs.
#[derive(Debug)]
pub struct Verifier {
    domain: Domain,
    verification_key: VerificationKey,
}

impl Verifier {
    pub fn new(domain_size: usize, verification_key: VerificationKey) -> Self {
        Self {
            domain: Domain::new(domain_size),
            verification_key,
        }
    }

    /// Evaluates a polynomial given in bit-reversed evaluation form at `z`.
    pub fn evaluate(&self, brp_evaluations: &[Scalar], z: Scalar) -> Scalar {
        let mut evaluations = brp_evaluations.to_vec();
        bit_reversal_permutation(&mut evaluations);
        evaluate(&self.domain, &evaluations, z)
    }

    /// Checks `e(C - [y]G1, [-1]G2) * e(proof, [tau - z]G2) == 1`, which is
    /// the statement `p(X) - y = q(X) (X - z)` at `tau`.
    ///
    /// Returns false on a mismatch; a mismatch is a well-formed "no".
    pub fn verify(&self, commitment: G1Point, z: Scalar, y: Scalar, proof: G1Point) -> bool {
        let vk = &self.verification_key;

        // [p(tau) - y] G1
        let commitment_minus_y = (commitment - vk.g1_gen * y).into();

        // [-1] G2
        let neg_g2_gen = G2Prepared::from(-vk.g2_gen);

        // [tau - z] G2
        let tau_minus_z_g2 = G2Prepared::from((vk.tau_g2 - vk.g2_gen * z).to_affine());

        multi_pairings(&[
            (&commitment_minus_y, &neg_g2_gen),
            (&proof, &tau_minus_z_g2),
        ])
    }

    /// Checks a batch of openings with one pairing equation.
    ///
    /// With random weights `r^i`, the combined statement is
    ///
    /// `e(sum r^i (C_i - [y_i]) + sum r^i z_i proof_i, [-1]G2)
    ///     * e(sum r^i proof_i, [tau]G2) == 1`
    ///
    /// Soundness comes from the weights being drawn by Fiat-Shamir after
    /// all inputs are fixed.
    pub fn verify_batch(
        &self,
        commitments: &[G1Point],
        zs: &[Scalar],
        ys: &[Scalar],
        proofs: &[G1Point],
        r_powers: &[Scalar],
    ) -> bool {
        assert!(
            commitments.len() == zs.len()
                && commitments.len() == ys.len()
                && commitments.len() == proofs.len()
                && commitments.len() == r_powers.len()
        );

        let vk = &self.verification_key;

        // sum r^i C_i + sum r^i z_i proof_i - (sum r^i y_i) [1]G1
        let lhs_g1 = {
            let points = commitments
                .iter()
                .chain(proofs)
                .chain([&vk.g1_gen])
                .copied()
                .collect::<Vec<_>>();
            let scalars = r_powers
                .iter()
                .copied()
                .chain(r_powers.iter().zip(zs).map(|(r_i, z_i)| *r_i * z_i))
                .chain([-r_powers
                    .iter()
                    .zip(ys)
                    .map(|(r_i, y_i)| *r_i * y_i)
                    .sum::<Scalar>()])
                .collect::<Vec<_>>();
            g1_lincomb(&points, &scalars)
                .expect("points and scalars have the same length")
                .into()
        };

        // sum r^i proof_i
        let rhs_g1 = g1_lincomb(proofs, r_powers)
            .expect("points and scalars have the same length")
            .into();

        let neg_g2_gen = G2Prepared::from(-vk.g2_gen);
        let tau_g2 = G2Prepared::from(vk.tau_g2);

        multi_pairings(&[(&lhs_g1, &neg_g2_gen), (&rhs_g1, &tau_g2)])
    }
}
