use bls12_381::{lincomb::g1_lincomb, G1Point, G1Projective, Scalar};

/// The key for committing to polynomials in monomial form: the G1 points
/// `[tau^i] G` for `i` up to the largest supported degree.
#[derive(Debug, Clone)]
pub struct CommitKey {
    pub g1s: Vec<G1Point>,
}

impl CommitKey {
    /// Panics if `g1s` is empty.
    pub fn new(g1s: Vec<G1Point>) -> Self {
        assert!(
            !g1s.is_empty(),
            "cannot initialize a commitment key with no g1 points"
        );
        Self { g1s }
    }

    /// Commits to a polynomial in monomial form.
    ///
    /// Panics if the polynomial has more coefficients than the key has
    /// points.
    pub fn commit_g1(&self, poly_coeff: &[Scalar]) -> G1Projective {
        g1_lincomb(&self.g1s[0..poly_coeff.len()], poly_coeff)
            .expect("number of g1 points equals the number of coefficients")
    }
}
