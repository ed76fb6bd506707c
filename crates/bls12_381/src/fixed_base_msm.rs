use ff::PrimeField;

use crate::{
    batch_addition::multi_batch_addition_binary_tree_stride, booth::get_booth_index,
    g1_batch_normalize, lincomb::g1_lincomb, traits::*, G1Point, G1Projective, Scalar,
};

/// Whether to build fixed-base lookup tables, and how wide each window is.
///
/// Wider windows trade memory (which grows as `2^(width-1)` per base) for
/// fewer additions per MSM. Width 8 is the setting used in practice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UsePrecomp {
    /// Build window tables of the given bit width.
    Yes {
        /// Window size in bits.
        width: usize,
    },
    /// Skip precomputation; fall back to the variable-base MSM.
    No,
}

impl UsePrecomp {
    /// The window width, or zero when precomputation is disabled.
    pub const fn width(self) -> usize {
        match self {
            Self::Yes { width } => width,
            Self::No => 0,
        }
    }

    /// Reconstructs the policy from a serialized width.
    pub const fn from_width(wbits: usize) -> Self {
        if wbits == 0 {
            Self::No
        } else {
            Self::Yes { width: wbits }
        }
    }
}

/// An MSM whose base points are fixed at construction time.
///
/// With precomputation enabled, multiples of every base are tabulated once
/// and each MSM becomes table lookups plus batched additions. Without it,
/// the bases are kept as-is and the variable-base engine is used.
#[derive(Debug)]
pub enum FixedBaseMSM {
    /// Window tables are built and consulted on every MSM.
    Precomp(FixedBaseMSMWindow),
    /// No tables; plain variable-base MSM over the stored bases.
    NoPrecomp(Vec<G1Point>),
}

impl FixedBaseMSM {
    pub fn new(generators: Vec<G1Point>, use_precomp: UsePrecomp) -> Self {
        match use_precomp {
            UsePrecomp::Yes { width } => {
                Self::Precomp(FixedBaseMSMWindow::new(&generators, width))
            }
            UsePrecomp::No => Self::NoPrecomp(generators),
        }
    }

    /// Multi-scalar multiplication against the fixed bases.
    ///
    /// Panics if the number of scalars differs from the number of bases.
    pub fn msm(&self, scalars: &[Scalar]) -> G1Projective {
        match self {
            Self::Precomp(precomp) => precomp.msm(scalars),
            Self::NoPrecomp(generators) => g1_lincomb(generators, scalars)
                .expect("number of generators and scalars should be equal"),
        }
    }
}

/// Windowed fixed-base MSM tables.
///
/// For every base `P` the table holds `P, 2P, ..., 2^(wbits-1) P`; a booth
/// digit then selects (and possibly negates) one entry per window, and the
/// accumulator is doubled `wbits` times between windows. Identical output
/// to the naive MSM for every input.
#[derive(Debug)]
pub struct FixedBaseMSMWindow {
    table: Vec<Vec<G1Point>>,
    wbits: usize,
}

impl FixedBaseMSMWindow {
    pub fn new(points: &[G1Point], wbits: usize) -> Self {
        let table: Vec<_> = points
            .iter()
            .map(|point| Self::precompute_multiples(wbits, *point))
            .collect();

        Self { table, wbits }
    }

    /// Tabulates `P, 2P, ..., 2^(wbits-1) P` for one base.
    fn precompute_multiples(wbits: usize, point: G1Point) -> Vec<G1Point> {
        let mut lookup_table = Vec::with_capacity(1 << (wbits - 1));

        let mut current = G1Projective::from(point);
        for _ in 0..(1 << (wbits - 1)) {
            lookup_table.push(current);
            current += point;
        }

        g1_batch_normalize(&lookup_table)
    }

    /// The base points the tables were built from.
    pub fn bases(&self) -> Vec<G1Point> {
        self.table.iter().map(|multiples| multiples[0]).collect()
    }

    pub fn msm(&self, scalars: &[Scalar]) -> G1Projective {
        assert_eq!(
            scalars.len(),
            self.table.len(),
            "number of scalars must match the number of tabulated bases"
        );

        let scalars_bytes: Vec<_> = scalars.iter().map(Scalar::to_bytes_le).collect();
        let number_of_windows = Scalar::NUM_BITS as usize / self.wbits + 1;

        let mut windows_of_points = vec![Vec::with_capacity(scalars.len()); number_of_windows];

        for (window_idx, window_points) in windows_of_points.iter_mut().enumerate() {
            for (scalar_idx, scalar_bytes) in scalars_bytes.iter().enumerate() {
                let digit = get_booth_index(window_idx, self.wbits, scalar_bytes.as_ref());
                if digit == 0 {
                    continue;
                }

                let multiples = &self.table[scalar_idx];
                let mut point = multiples[digit.unsigned_abs() as usize - 1];
                if digit.is_negative() {
                    point = -point;
                }
                window_points.push(point);
            }
        }

        let accumulated_points = multi_batch_addition_binary_tree_stride(windows_of_points);

        let mut result: G1Projective = *accumulated_points
            .last()
            .expect("at least one window required");
        for point in accumulated_points.into_iter().rev().skip(1) {
            for _ in 0..self.wbits {
                result = result.double();
            }
            result += point;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use ff::Field;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn random_bases(n: usize) -> Vec<G1Point> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..n)
            .map(|_| G1Projective::random(&mut rng).into())
            .collect()
    }

    fn random_scalars(n: usize) -> Vec<Scalar> {
        let mut rng = StdRng::seed_from_u64(1337);
        (0..n).map(|_| Scalar::random(&mut rng)).collect()
    }

    #[test]
    fn lookup_table_holds_consecutive_multiples() {
        let table = FixedBaseMSMWindow::precompute_multiples(7, G1Point::generator());

        for (i, entry) in table.iter().enumerate() {
            let expected = G1Projective::generator() * Scalar::from((i + 1) as u64);
            assert_eq!(*entry, expected.into());
        }
    }

    #[test]
    fn precomp_and_no_precomp_agree() {
        let bases = random_bases(64);
        let scalars = random_scalars(64);

        let expected = g1_lincomb(&bases, &scalars).expect("lengths match");

        for use_precomp in [
            UsePrecomp::No,
            UsePrecomp::Yes { width: 4 },
            UsePrecomp::Yes { width: 8 },
        ] {
            let msm = FixedBaseMSM::new(bases.clone(), use_precomp);
            assert_eq!(msm.msm(&scalars), expected, "{use_precomp:?}");
        }
    }

    #[test]
    fn output_is_stable_across_window_widths() {
        let bases = random_bases(16);
        let scalars = random_scalars(16);

        let reference = FixedBaseMSMWindow::new(&bases, 4).msm(&scalars);
        for wbits in [2, 3, 5, 6, 7, 8] {
            let got = FixedBaseMSMWindow::new(&bases, wbits).msm(&scalars);
            assert_eq!(got, reference, "wbits = {wbits}");
        }
    }

    #[test]
    fn all_zero_scalars_give_identity() {
        let bases = random_bases(8);
        let scalars = vec![Scalar::ZERO; 8];
        let msm = FixedBaseMSMWindow::new(&bases, 4);
        assert_eq!(msm.msm(&scalars), G1Projective::identity());
    }

    #[test]
    fn bases_round_trip_through_the_table() {
        let bases = random_bases(8);
        let msm = FixedBaseMSMWindow::new(&bases, 5);
        assert_eq!(msm.bases(), bases);
    }

    #[test]
    #[should_panic]
    fn mismatched_lengths_panic() {
        let bases = random_bases(8);
        let scalars = random_scalars(7);
        let msm = FixedBaseMSMWindow::new(&bases, 4);
        let _ = msm.msm(&scalars);
    }
}
