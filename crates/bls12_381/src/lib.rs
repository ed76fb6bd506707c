//! Boundary crate to the BLS12-381 arithmetic.
//!
//! All field and group arithmetic is consumed from `blstrs`/`blst`; this
//! crate only adds the pieces the KZG engine needs on top of it: pairing
//! equality checks, batch normalization, hash-output reduction and the
//! multi-scalar multiplication engines.

use pairing::{MillerLoopResult, MultiMillerLoop};
use traits::*;

pub mod batch_addition;
pub mod batch_inversion;
mod booth;
pub mod fixed_base_msm;
pub mod lincomb;
pub mod msm;

// Re-export ff and group so other crates do not need to directly
// import (and independently version) them.
pub use ff;
pub use group;

pub mod traits {
    pub use ff::{Field, PrimeField};
    pub use group::{prime::PrimeCurveAffine, Curve, Group};
}

/// Affine representation of a point in the BLS12-381 G1 group.
pub type G1Point = blstrs::G1Affine;

/// Projective representation of a point in the BLS12-381 G1 group.
pub type G1Projective = blstrs::G1Projective;

/// Affine representation of a point in the BLS12-381 G2 group.
pub type G2Point = blstrs::G2Affine;

/// Projective representation of a point in the BLS12-381 G2 group.
pub type G2Projective = blstrs::G2Projective;

/// A G2 point with the Miller-loop precomputation applied.
pub type G2Prepared = blstrs::G2Prepared;

/// Element of the BLS12-381 scalar field Fr.
pub type Scalar = blstrs::Scalar;

/// Returns true if the product of the pairings over all pairs is the
/// identity element of the target group.
///
/// This is the only shape of pairing check the library performs; callers
/// arrange their equations as `e(a, b) * e(c, d) == 1`.
pub fn multi_pairings(pairs: &[(&G1Point, &G2Prepared)]) -> bool {
    blstrs::Bls12::multi_miller_loop(pairs)
        .final_exponentiation()
        .is_identity()
        .into()
}

/// Converts projective G1 points to affine form in a single batch.
///
/// blst's batched conversion collapses everything to the identity if any
/// input is the identity, so identity points are pulled out first and
/// reinserted at their original positions afterwards.
pub fn g1_batch_normalize(projective_points: &[G1Projective]) -> Vec<G1Point> {
    if projective_points.is_empty() {
        return Vec::new();
    }

    let mut identity_positions = Vec::new();
    let mut non_identity_points = Vec::new();

    for (idx, point) in projective_points.iter().enumerate() {
        if point.is_identity().into() {
            identity_positions.push(idx);
        } else {
            non_identity_points.push(*point);
        }
    }

    if non_identity_points.is_empty() {
        return vec![G1Point::identity(); projective_points.len()];
    }

    // blstrs G1Projective has the same layout as blst_p1.
    let points = unsafe {
        std::slice::from_raw_parts(
            non_identity_points.as_ptr().cast::<blst::blst_p1>(),
            non_identity_points.len(),
        )
    };

    let normalized = blst::p1_affines::from(points);

    let mut result: Vec<_> = normalized
        .as_slice()
        .iter()
        .map(|p| G1Point::from_raw_unchecked(p.x.into(), p.y.into(), false))
        .collect();

    for pos in identity_positions {
        result.insert(pos, G1Point::identity());
    }

    result
}

/// Converts projective G2 points to affine form in a single batch.
pub fn g2_batch_normalize(projective_points: &[G2Projective]) -> Vec<G2Point> {
    batch_normalize_points(projective_points)
}

/// Batch-normalizes projective points of any curve implementing `PrimeCurveAffine`.
pub fn batch_normalize_points<T: PrimeCurveAffine>(points: &[T::Curve]) -> Vec<T>
where
    T::Curve: Curve<AffineRepr = T>,
{
    let mut affine_points = vec![T::identity(); points.len()];
    T::Curve::batch_normalize(points, &mut affine_points);
    affine_points
}

/// Interprets 32 big-endian bytes as an integer and reduces it mod r.
///
/// The reduction introduces a negligible bias; the challenges this is used
/// for only need ~128 bits of entropy, so the bias is of no consequence.
pub fn reduce_bytes_to_scalar(bytes: [u8; 32]) -> Scalar {
    let mut out = blst::blst_fr::default();

    unsafe {
        let mut s = blst::blst_scalar::default();
        blst::blst_scalar_from_bendian(&raw mut s, bytes.as_ptr());
        blst::blst_fr_from_scalar(&raw mut out, std::ptr::addr_of!(s));
    }

    Scalar::from(out)
}

#[cfg(test)]
mod tests {
    use rand::rngs::OsRng;

    use super::*;
    use crate::ff::Field;

    /// BLS12-381 scalar field modulus r.
    const BLS12_381_R: [u8; 32] = [
        0x73, 0xED, 0xA7, 0x53, 0x29, 0x9D, 0x7D, 0x48, 0x33, 0x39, 0xD8, 0x08, 0x09, 0xA1, 0xD8,
        0x05, 0x53, 0xBD, 0xA4, 0x02, 0xFF, 0xFE, 0x5B, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00,
        0x00, 0x01,
    ];

    /// 2^256 - 1 mod r.
    const TWO_256_MINUS_ONE_MOD_R: [u8; 32] = [
        0x18, 0x24, 0xB1, 0x59, 0xAC, 0xC5, 0x05, 0x6F, 0x99, 0x8C, 0x4F, 0xEF, 0xEC, 0xBC, 0x4F,
        0xF5, 0x58, 0x84, 0xB7, 0xFA, 0x00, 0x03, 0x48, 0x02, 0x00, 0x00, 0x00, 0x01, 0xFF, 0xFF,
        0xFF, 0xFD,
    ];

    #[test]
    fn reduce_bytes_to_scalar_edge_cases() {
        let result = reduce_bytes_to_scalar([0u8; 32]);
        assert_eq!(result, Scalar::ZERO);

        let mut one_bytes = [0u8; 32];
        one_bytes[31] = 1;
        assert_eq!(reduce_bytes_to_scalar(one_bytes), Scalar::ONE);

        // r reduces to zero, r + 1 to one.
        assert_eq!(reduce_bytes_to_scalar(BLS12_381_R), Scalar::ZERO);
        let mut r_plus_one = BLS12_381_R;
        r_plus_one[31] += 1;
        assert_eq!(reduce_bytes_to_scalar(r_plus_one), Scalar::ONE);

        // r - 1 is -1 in the field.
        let mut r_minus_one = BLS12_381_R;
        r_minus_one[31] -= 1;
        assert_eq!(reduce_bytes_to_scalar(r_minus_one), -Scalar::ONE);

        // The largest 32-byte value reduces as a big integer would.
        let expected =
            Scalar::from_bytes_be(&TWO_256_MINUS_ONE_MOD_R).expect("value must be canonical");
        assert_eq!(reduce_bytes_to_scalar([0xFF; 32]), expected);
    }

    #[test]
    fn batch_normalize_empty_and_identity() {
        let empty: Vec<G1Projective> = vec![];
        assert!(g1_batch_normalize(&empty).is_empty());

        let mixed = vec![
            G1Projective::identity(),
            G1Projective::generator(),
            G1Projective::identity(),
        ];
        let result = g1_batch_normalize(&mixed);
        assert!(bool::from(result[0].is_identity()));
        assert!(!bool::from(result[1].is_identity()));
        assert!(bool::from(result[2].is_identity()));
    }

    #[test]
    fn batch_normalize_matches_pointwise_conversion() {
        let mut rng = OsRng;
        let points: Vec<G1Projective> = (0..100).map(|_| G1Projective::random(&mut rng)).collect();

        let normalized = g1_batch_normalize(&points);

        assert_eq!(normalized.len(), points.len());
        for (norm, proj) in normalized.iter().zip(points.iter()) {
            assert_eq!(*norm, G1Point::from(*proj));
        }
    }

    #[test]
    fn g2_batch_normalize_matches_pointwise_conversion() {
        let mut rng = OsRng;
        let points: Vec<G2Projective> = (0..10).map(|_| G2Projective::random(&mut rng)).collect();
        let result = g2_batch_normalize(&points);

        assert_eq!(result.len(), points.len());
        for (proj, affine) in points.iter().zip(result.iter()) {
            assert_eq!(G2Point::from(*proj), *affine);
        }
    }

    #[test]
    fn pairing_check_detects_negation() {
        let g1 = G1Point::generator();
        let g2 = G2Prepared::from(G2Point::generator());
        let g1_neg = -g1;

        // e(g, h) * e(-g, h) == 1
        assert!(multi_pairings(&[(&g1, &g2), (&g1_neg, &g2)]));
        // e(g, h)^2 != 1
        assert!(!multi_pairings(&[(&g1, &g2), (&g1, &g2)]));
    }

    #[test]
    fn pairing_with_identity_is_identity() {
        let id_g1 = G1Point::identity();
        let g2 = G2Prepared::from(G2Point::generator());
        assert!(multi_pairings(&[(&id_g1, &g2)]));
    }
}
