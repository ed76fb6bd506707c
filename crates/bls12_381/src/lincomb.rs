use crate::{msm::g1_msm_unchecked, traits::*, G1Point, G1Projective, Scalar};

/// Linear combination over G1 without filtering identity points.
///
/// Returns `None` if the lengths differ. The bucket MSM underneath cannot
/// represent the identity in affine coordinates, so the caller must know
/// that no input point is the identity.
pub fn g1_lincomb_unchecked(points: &[G1Point], scalars: &[Scalar]) -> Option<G1Projective> {
    (points.len() == scalars.len()).then(|| g1_msm_unchecked(points, scalars))
}

/// Linear combination over G1.
///
/// Returns `None` if the lengths differ. Identity points are filtered out
/// before the MSM since they contribute nothing to the sum.
pub fn g1_lincomb(points: &[G1Point], scalars: &[Scalar]) -> Option<G1Projective> {
    if points.len() != scalars.len() {
        return None;
    }

    let (points_filtered, scalars_filtered): (Vec<_>, Vec<_>) = points
        .iter()
        .zip(scalars)
        .filter(|(point, _)| !(bool::from(point.is_identity())))
        .map(|(point, scalar)| (*point, *scalar))
        .unzip();

    if points_filtered.is_empty() {
        Some(G1Projective::identity())
    } else {
        g1_lincomb_unchecked(&points_filtered, &scalars_filtered)
    }
}
