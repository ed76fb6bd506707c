use std::ops::{Deref, DerefMut};

use bls12_381::{ff::Field, Scalar};

/// A polynomial in monomial form over Fr.
///
/// Coefficients are stored in ascending degree order:
/// `a_0 + a_1 x + ... + a_(n-1) x^(n-1)`.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct PolyCoeff(pub Vec<Scalar>);

impl PolyCoeff {
    /// Returns `self + other`; the shorter polynomial is zero-padded.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut result = self.clone();
        if other.len() > result.len() {
            result.resize(other.len(), Scalar::ZERO);
        }
        for (i, &b) in other.iter().enumerate() {
            result[i] += b;
        }
        result.truncate_trailing_zeros();
        result
    }

    /// Returns `-self`.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self(self.iter().map(|c| -*c).collect())
    }

    /// Returns `self - other`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Evaluates the polynomial at `x` with Horner's method.
    #[must_use]
    pub fn eval(&self, x: &Scalar) -> Scalar {
        let mut result = Scalar::ZERO;
        for coeff in self.iter().rev() {
            result = result * x + coeff;
        }
        result
    }

    /// Returns `self * other` by schoolbook multiplication.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut result = Self(vec![
            Scalar::ZERO;
            (self.len() + other.len()).saturating_sub(1)
        ]);
        for (i, a) in self.iter().enumerate() {
            for (j, b) in other.iter().enumerate() {
                result[i + j] += a * b;
            }
        }

        result.truncate_trailing_zeros();
        result
    }

    fn truncate_trailing_zeros(&mut self) {
        while self.last().is_some_and(|c| c.is_zero().into()) {
            self.pop();
        }
    }
}

impl Deref for PolyCoeff {
    type Target = Vec<Scalar>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PolyCoeff {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Scalar>> for PolyCoeff {
    fn from(value: Vec<Scalar>) -> Self {
        Self(value)
    }
}

/// The monic polynomial whose roots are exactly the given points.
///
/// `vanishing_poly([r1, r2]) = (x - r1)(x - r2)`
pub fn vanishing_poly(roots: &[Scalar]) -> PolyCoeff {
    let mut poly = PolyCoeff(vec![Scalar::ONE]);
    for root in roots {
        poly = poly.mul(&PolyCoeff(vec![-root, Scalar::ONE]));
    }
    poly
}

#[cfg(test)]
mod tests {
    use bls12_381::ff::Field;
    use proptest::prelude::*;

    use super::*;

    fn arb_scalar_vec(max_len: usize) -> impl Strategy<Value = Vec<Scalar>> {
        prop::collection::vec(any::<u64>().prop_map(Scalar::from), 0..=max_len)
    }

    fn naive_poly_eval(poly: &PolyCoeff, value: &Scalar) -> Scalar {
        let mut result = Scalar::ZERO;
        for (i, coeff) in poly.iter().enumerate() {
            result += coeff * value.pow_vartime([i as u64]);
        }
        result
    }

    #[test]
    fn add_with_unequal_lengths() {
        let a = PolyCoeff(vec![Scalar::from(2), Scalar::from(3)]);
        let b = PolyCoeff(vec![Scalar::from(4), Scalar::from(5), Scalar::from(6)]);
        let c = PolyCoeff(vec![Scalar::from(6), Scalar::from(8), Scalar::from(6)]);
        assert_eq!(a.add(&b), c);
    }

    #[test]
    fn sub_matches_add_of_negation() {
        let a = PolyCoeff(vec![Scalar::from(1), Scalar::from(2), Scalar::from(3)]);
        let b = PolyCoeff(vec![Scalar::from(4), Scalar::from(5), Scalar::from(6)]);
        let c = PolyCoeff(vec![-Scalar::from(3), -Scalar::from(3), -Scalar::from(3)]);
        assert_eq!(a.sub(&b), c);
        assert_eq!(a.add(&b.neg()), c);
    }

    #[test]
    fn horner_evaluation_matches_naive() {
        // f(x) = 1 + 2x + 3x^2, f(2) = 17
        let poly = PolyCoeff(vec![Scalar::from(1), Scalar::from(2), Scalar::from(3)]);
        let value = Scalar::from(2u64);
        assert_eq!(poly.eval(&value), Scalar::from(17u64));
        assert_eq!(poly.eval(&value), naive_poly_eval(&poly, &value));
    }

    #[test]
    fn schoolbook_multiplication() {
        // (1 + 2x + 3x^2)(4 + 5x) = 4 + 13x + 22x^2 + 15x^3
        let a = PolyCoeff(vec![Scalar::from(1), Scalar::from(2), Scalar::from(3)]);
        let b = PolyCoeff(vec![Scalar::from(4), Scalar::from(5)]);
        let expected = PolyCoeff(vec![
            Scalar::from(4),
            Scalar::from(13),
            Scalar::from(22),
            Scalar::from(15),
        ]);
        assert_eq!(a.mul(&b), expected);
    }

    #[test]
    fn vanishing_poly_has_the_given_roots() {
        // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
        let roots = vec![Scalar::from(1u64), Scalar::from(2u64), Scalar::from(3u64)];
        let expected = PolyCoeff(vec![
            -Scalar::from(6u64),
            Scalar::from(11u64),
            -Scalar::from(6u64),
            Scalar::from(1u64),
        ]);
        let poly = vanishing_poly(&roots);
        assert_eq!(&poly, &expected);

        for root in &roots {
            assert_eq!(poly.eval(root), Scalar::ZERO);
        }
    }

    #[test]
    fn trailing_zeros_are_not_kept() {
        let a = PolyCoeff(vec![]);
        let b = PolyCoeff(vec![Scalar::from(0)]);
        assert_eq!(a.add(&b).sub(&b), a);
    }

    proptest! {
        #[test]
        fn prop_add_commutative(a in arb_scalar_vec(16), b in arb_scalar_vec(16)) {
            let a_poly = PolyCoeff(a);
            let b_poly = PolyCoeff(b);
            prop_assert_eq!(a_poly.add(&b_poly), b_poly.add(&a_poly));
        }

        #[test]
        fn prop_add_sub_round_trip(a in arb_scalar_vec(16), b in arb_scalar_vec(16)) {
            let a_poly = PolyCoeff(a);
            let b_poly = PolyCoeff(b);
            let back = a_poly.add(&b_poly).sub(&b_poly);
            prop_assert_eq!(a_poly, back);
        }

        #[test]
        fn prop_eval_horner_vs_naive(poly in arb_scalar_vec(12), x in any::<u64>()) {
            let poly = PolyCoeff(poly);
            let x = Scalar::from(x);
            prop_assert_eq!(poly.eval(&x), naive_poly_eval(&poly, &x));
        }

        #[test]
        fn prop_distributivity(
            a in arb_scalar_vec(8),
            b in arb_scalar_vec(8),
            c in arb_scalar_vec(8),
        ) {
            let a_poly = PolyCoeff(a);
            let b_poly = PolyCoeff(b);
            let c_poly = PolyCoeff(c);

            let left = a_poly.add(&b_poly).mul(&c_poly);
            let right = a_poly.mul(&c_poly).add(&b_poly.mul(&c_poly));

            prop_assert_eq!(left, right);
        }
    }
}
