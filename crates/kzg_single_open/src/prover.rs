use bls12_381::{lincomb::g1_lincomb, G1Point, G1Projective, Scalar};
use polynomial::{bit_reversal_permutation, domain::Domain};

use crate::quotient::evaluate_and_quotient;

/// The G1 side of the trusted setup, in both bases.
///
/// The Lagrange basis commits to blob data directly; the monomial basis
/// commits to quotients after interpolation.
#[derive(Debug, Clone)]
pub struct CommitKey {
    /// `[tau^i] G1` for `i` in `0..n`.
    pub g1_monomial: Vec<G1Point>,
    /// `[l_i(tau)] G1` in bit-reversed order, where `l_i` are the Lagrange
    /// basis polynomials of the domain.
    pub g1_lagrange_brp: Vec<G1Point>,
}

/// Creates commitments and single-point opening proofs for polynomials
/// given as evaluations over the bit-reversal-permuted domain.
#[derive(Debug)]
pub struct Prover {
    domain: Domain,
    commit_key: CommitKey,
}

impl Prover {
    pub fn new(domain_size: usize, commit_key: CommitKey) -> Self {
        assert_eq!(commit_key.g1_monomial.len(), domain_size);
        assert_eq!(commit_key.g1_lagrange_brp.len(), domain_size);

        Self {
            domain: Domain::new(domain_size),
            commit_key,
        }
    }

    /// Commits to a polynomial given as evaluations in bit-reversed order.
    ///
    /// A linear combination against the matching Lagrange commitments; no
    /// basis conversion is needed.
    pub fn commit(&self, brp_evaluations: &[Scalar]) -> G1Projective {
        g1_lincomb(&self.commit_key.g1_lagrange_brp, brp_evaluations)
            .expect("the commitment key holds one point per evaluation")
    }

    /// Computes `y = p(z)` and the opening proof `[q(tau)] G1` where
    /// `q(X) = (p(X) - y) / (X - z)`.
    ///
    /// The quotient is produced in evaluation form, interpolated, and
    /// committed against the monomial basis.
    pub fn compute_proof(&self, brp_evaluations: &[Scalar], z: Scalar) -> (G1Projective, Scalar) {
        let mut evaluations = brp_evaluations.to_vec();
        bit_reversal_permutation(&mut evaluations);

        let (y, quotient_evals) = evaluate_and_quotient(&self.domain, &evaluations, z);

        let quotient_monomial = self.domain.ifft_scalars(quotient_evals);
        let proof = g1_lincomb(&self.commit_key.g1_monomial, &quotient_monomial)
            .expect("the commitment key holds one point per coefficient");

        (proof, y)
    }
}
