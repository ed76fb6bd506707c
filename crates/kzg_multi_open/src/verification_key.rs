use bls12_381::{lincomb::g1_lincomb, G1Point, G1Projective, G2Point, Scalar};

/// The key for verifying multi-point opening proofs.
#[derive(Clone, Debug)]
pub struct VerificationKey {
    /// `[tau^i] G1`; the verifier commits to interpolation polynomials of
    /// degree below the coset size, so `coset_size + 1` points suffice.
    pub g1s: Vec<G1Point>,
    /// `[tau^i] G2`; `g2s[coset_size]` is the `[tau^n]` term in the final
    /// pairing.
    pub g2s: Vec<G2Point>,
    /// The degree-zero G2 term.
    pub g2_gen: G2Point,
    /// Number of points each proof attests to.
    pub coset_size: usize,
    /// Number of coefficients in the committed polynomials.
    pub num_coefficients_in_polynomial: usize,
}

impl VerificationKey {
    pub fn new(
        g1s: Vec<G1Point>,
        g2s: Vec<G2Point>,
        coset_size: usize,
        num_coefficients_in_polynomial: usize,
    ) -> Self {
        let g2_gen = g2s[0];

        assert!(
            coset_size < g2s.len(),
            "the verifier needs [tau^coset_size] G2, so the key must hold more than coset_size G2 points"
        );

        Self {
            g1s,
            g2s,
            g2_gen,
            coset_size,
            num_coefficients_in_polynomial,
        }
    }

    /// Commits to a polynomial in monomial form using the G1 points.
    pub fn commit_g1(&self, polynomial: &[Scalar]) -> G1Projective {
        assert!(self.g1s.len() >= polynomial.len());
        g1_lincomb(&self.g1s[..polynomial.len()], polynomial)
            .expect("number of g1 points equals the number of coefficients")
    }
}

#[cfg(test)]
mod tests {
    use bls12_381::{traits::*, G1Projective, G2Projective, Scalar};

    use super::*;

    #[test]
    fn g2_gen_is_the_first_g2_element() {
        let g1s: Vec<_> = (0..4).map(|_| G1Projective::generator().into()).collect();
        let g2s: Vec<_> = (0..4).map(|_| G2Projective::generator().into()).collect();

        let vk = VerificationKey::new(g1s, g2s.clone(), 1, 3);
        assert_eq!(vk.g2_gen, g2s[0]);
    }

    #[test]
    #[should_panic]
    fn coset_size_must_be_less_than_the_number_of_g2_points() {
        let g1s = vec![G1Projective::generator().into(); 2];
        let g2s = vec![G2Projective::generator().into(); 2];
        let _ = VerificationKey::new(g1s, g2s, 2, 2);
    }

    #[test]
    fn commit_g1_matches_naive_sum() {
        let g1s: Vec<G1Point> = (0..3).map(|_| G1Point::generator()).collect();
        let g2s: Vec<G2Point> = (0..4).map(|_| G2Projective::generator().into()).collect();
        let vk = VerificationKey::new(g1s, g2s, 2, 3);

        let poly = vec![Scalar::from(1), Scalar::from(2), Scalar::from(3)];
        let expected = G1Projective::generator() * Scalar::from(6);
        assert_eq!(vk.commit_g1(&poly), expected);
    }
}
