use ff::PrimeField;

use crate::{
    batch_addition::multi_batch_addition_binary_tree_stride, booth::get_booth_index, traits::*,
    G1Point, G1Projective, Scalar,
};

/// Bucket window width for a variable-base MSM of `num_points` points.
///
/// log2(n) - 3, clamped to [4, 16].
fn bucket_window_width(num_points: usize) -> usize {
    (num_points.ilog2().saturating_sub(3) as usize).clamp(4, 16)
}

/// Variable-base MSM with the bucket (Pippenger) method.
///
/// Scalars are booth-recoded into signed windows; each window assigns its
/// points to `2^(c-1)` buckets, every bucket is summed with batched affine
/// addition, and the buckets are folded with a running sum. Window results
/// are combined by repeated doubling.
///
/// The caller must not pass identity points; [`crate::lincomb::g1_lincomb`]
/// filters them out first.
pub fn g1_msm_unchecked(points: &[G1Point], scalars: &[Scalar]) -> G1Projective {
    assert_eq!(
        points.len(),
        scalars.len(),
        "each point must have a matching scalar"
    );
    if points.is_empty() {
        return G1Projective::identity();
    }

    let c = bucket_window_width(points.len());
    let num_windows = Scalar::NUM_BITS as usize / c + 1;
    let buckets_per_window = 1 << (c - 1);

    let scalars_bytes: Vec<_> = scalars.iter().map(Scalar::to_bytes_le).collect();

    // Window-major bucket layout, so that one multi-batch addition
    // amortizes the inversions over every window at once.
    let mut buckets: Vec<Vec<G1Point>> = vec![Vec::new(); num_windows * buckets_per_window];
    for window_idx in 0..num_windows {
        for (point, scalar_bytes) in points.iter().zip(&scalars_bytes) {
            let digit = get_booth_index(window_idx, c, scalar_bytes.as_ref());
            if digit == 0 {
                continue;
            }

            let bucket_idx = digit.unsigned_abs() as usize - 1;
            let point = if digit.is_positive() { *point } else { -*point };
            buckets[window_idx * buckets_per_window + bucket_idx].push(point);
        }
    }

    let bucket_sums = multi_batch_addition_binary_tree_stride(buckets);

    // Fold each window's buckets: sum_i (i+1) * bucket_i via a running sum.
    let mut window_sums = Vec::with_capacity(num_windows);
    for window_buckets in bucket_sums.chunks_exact(buckets_per_window) {
        let mut running_sum = G1Projective::identity();
        let mut window_sum = G1Projective::identity();
        for bucket in window_buckets.iter().rev() {
            running_sum += bucket;
            window_sum += running_sum;
        }
        window_sums.push(window_sum);
    }

    // Combine the windows, most significant first.
    let mut result = *window_sums
        .last()
        .expect("at least one window is always produced");
    for window_sum in window_sums.iter().rev().skip(1) {
        for _ in 0..c {
            result = result.double();
        }
        result += window_sum;
    }

    result
}

#[cfg(test)]
mod tests {
    use ff::Field;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn naive_msm(points: &[G1Point], scalars: &[Scalar]) -> G1Projective {
        points
            .iter()
            .zip(scalars)
            .map(|(p, s)| G1Projective::from(*p) * s)
            .sum()
    }

    fn random_pairs(n: usize, seed: u64) -> (Vec<G1Point>, Vec<Scalar>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<G1Point> = (0..n)
            .map(|_| G1Projective::random(&mut rng).into())
            .collect();
        let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
        (points, scalars)
    }

    #[test]
    fn window_width_is_clamped() {
        assert_eq!(bucket_window_width(1), 4);
        assert_eq!(bucket_window_width(64), 4);
        assert_eq!(bucket_window_width(1 << 10), 7);
        assert_eq!(bucket_window_width(1 << 13), 10);
        assert_eq!(bucket_window_width(usize::MAX), 16);
    }

    #[test]
    fn matches_naive_msm_across_sizes() {
        for (n, seed) in [(1usize, 0u64), (2, 1), (17, 2), (64, 3), (130, 4)] {
            let (points, scalars) = random_pairs(n, seed);
            assert_eq!(
                g1_msm_unchecked(&points, &scalars),
                naive_msm(&points, &scalars),
                "size {n}"
            );
        }
    }

    #[test]
    fn handles_zero_and_negative_scalars() {
        let (points, _) = random_pairs(8, 5);
        let scalars = vec![
            Scalar::ZERO,
            Scalar::ONE,
            -Scalar::ONE,
            Scalar::from(2),
            -Scalar::from(123456789u64),
            Scalar::ZERO,
            Scalar::ONE.double(),
            -Scalar::ONE.double(),
        ];
        assert_eq!(
            g1_msm_unchecked(&points, &scalars),
            naive_msm(&points, &scalars)
        );
    }

    #[test]
    fn empty_input_returns_identity() {
        assert_eq!(g1_msm_unchecked(&[], &[]), G1Projective::identity());
    }
}
