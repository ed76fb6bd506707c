use blstrs::{Fp, G1Affine, G1Projective};

use crate::{
    batch_inversion::{batch_inverse, batch_inverse_scratch_pad},
    traits::*,
};

/// Affine addition (or doubling, when the points coincide) with the slope
/// denominator already inverted by the caller.
#[inline(always)]
fn point_add_double(p1: G1Affine, p2: G1Affine, inv: &Fp) -> G1Affine {
    let lambda = if p1 == p2 {
        p1.x().square().mul3() * inv
    } else {
        (p2.y() - p1.y()) * inv
    };

    let x = lambda.square() - p1.x() - p2.x();
    let y = lambda * (p1.x() - x) - p1.y();

    G1Affine::from_raw_unchecked(x, y, false)
}

/// The slope denominator: `2y` for a doubling, `x2 - x1` otherwise.
///
/// Does not handle `p1 == -p2`; the callers in this crate never produce
/// that pair except with negligible probability.
#[inline(always)]
fn choose_add_or_double(p1: G1Affine, p2: G1Affine) -> Fp {
    if p1 == p2 {
        p2.y().double()
    } else {
        p2.x() - p1.x()
    }
}

/// Below this many pending additions, batching the inversions costs more
/// than plain mixed addition. Must be >= 2.
const BATCH_INVERSE_THRESHOLD: usize = 16;

/// Sums a set of affine points by pairing them up, computing all slope
/// denominators, inverting them in one batch and halving the set, until the
/// remainder is small enough to add sequentially.
///
/// Panics (inside `batch_inverse`) if any input is the identity or if a
/// `[P, -P]` pair lines up during the reduction.
pub fn batch_addition_binary_tree_stride(mut points: Vec<G1Affine>) -> G1Projective {
    if points.is_empty() {
        return G1Projective::identity();
    }

    debug_assert!(points.iter().all(|point| !bool::from(point.is_identity())));

    let mut denominators = Vec::with_capacity(points.len());
    let mut sum = G1Projective::identity();

    while points.len() > BATCH_INVERSE_THRESHOLD {
        // An unpaired trailing point goes straight into the accumulator.
        if points.len() % 2 != 0 {
            sum += points
                .pop()
                .expect("infallible: the vector has an odd, hence non-zero, length");
        }

        denominators.clear();
        for pair in points.chunks_exact(2) {
            denominators.push(choose_add_or_double(pair[0], pair[1]));
        }

        batch_inverse(&mut denominators);

        for (i, inv) in denominators.iter().enumerate() {
            let p1 = points[2 * i];
            let p2 = points[2 * i + 1];
            points[i] = point_add_double(p1, p2, inv);
        }

        // Results occupy the front half; drop the rest.
        points.truncate(denominators.len());
    }

    for point in points {
        sum += point;
    }

    sum
}

/// Sums many sets of affine points at once, amortizing the batch inversion
/// across all sets. Returns one sum per input set.
///
/// Same identity/`[P, -P]` caveats as [`batch_addition_binary_tree_stride`].
pub fn multi_batch_addition_binary_tree_stride(
    mut multi_points: Vec<Vec<G1Affine>>,
) -> Vec<G1Projective> {
    #[inline(always)]
    fn pending_pairs(points: &[Vec<G1Affine>]) -> usize {
        points.iter().map(|p| p.len() / 2).sum()
    }

    debug_assert!(multi_points
        .iter()
        .all(|points| points.iter().all(|point| !bool::from(point.is_identity()))));

    let total_num_points = multi_points.iter().map(Vec::len).sum();
    let mut scratchpad = Vec::with_capacity(total_num_points);

    let max_set_length = multi_points.iter().map(Vec::len).max().unwrap_or(0);
    let mut denominators = Vec::with_capacity(max_set_length);

    let mut sums = vec![G1Projective::identity(); multi_points.len()];

    let mut total_pending = pending_pairs(&multi_points);
    while total_pending > BATCH_INVERSE_THRESHOLD {
        for (points, sum) in multi_points.iter_mut().zip(sums.iter_mut()) {
            if points.len() % 2 != 0 {
                *sum += points.pop().expect("length checked odd");
            }
        }

        denominators.clear();
        for points in &multi_points {
            for pair in points.chunks_exact(2) {
                denominators.push(choose_add_or_double(pair[0], pair[1]));
            }
        }

        batch_inverse_scratch_pad(&mut denominators, &mut scratchpad);

        let mut denominators_offset = 0;
        for points in &mut multi_points {
            if points.len() < 2 {
                continue;
            }
            for (i, inv) in (0..=points.len() - 2)
                .step_by(2)
                .zip(&denominators[denominators_offset..])
            {
                let p1 = points[i];
                let p2 = points[i + 1];
                points[i / 2] = point_add_double(p1, p2, inv);
            }

            let num_pairs = points.len() / 2;
            points.truncate(num_pairs);
            denominators_offset += num_pairs;
        }

        total_pending = pending_pairs(&multi_points);
    }

    for (sum, points) in sums.iter_mut().zip(multi_points) {
        for point in points {
            *sum += point;
        }
    }

    sums
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn random_points(n: usize, seed: u64) -> Vec<G1Affine> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| G1Projective::random(&mut rng).into())
            .collect()
    }

    #[test]
    fn single_set_matches_sequential_addition() {
        let points = random_points(101, 1);

        let expected: G1Projective = points
            .iter()
            .fold(G1Projective::identity(), |acc, p| acc + p);

        let got = batch_addition_binary_tree_stride(points);
        assert_eq!(expected, got);
    }

    #[test]
    fn empty_set_sums_to_identity() {
        assert_eq!(
            batch_addition_binary_tree_stride(Vec::new()),
            G1Projective::identity()
        );
    }

    #[test]
    fn multi_set_matches_single_set() {
        let sets: Vec<Vec<G1Affine>> = (0..5).map(|i| random_points(99, i)).collect();

        let expected: Vec<G1Projective> = sets
            .clone()
            .into_iter()
            .map(batch_addition_binary_tree_stride)
            .collect();

        let got = multi_batch_addition_binary_tree_stride(sets);
        assert_eq!(got, expected);
    }

    proptest! {
        #[test]
        fn prop_batch_addition_matches_naive(n in 1usize..200, seed in any::<u64>()) {
            let points = random_points(n, seed);
            let expected: G1Projective = points.iter().map(|p| G1Projective::from(*p)).sum();
            let got = batch_addition_binary_tree_stride(points);
            prop_assert_eq!(expected, got);
        }
    }
}
