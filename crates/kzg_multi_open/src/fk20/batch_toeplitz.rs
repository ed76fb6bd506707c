use bls12_381::fixed_base_msm::{FixedBaseMSM, UsePrecomp};
use bls12_381::G1Projective;
use maybe_rayon::prelude::*;
use polynomial::domain::Domain;

use crate::fk20::columns::transpose;
use crate::fk20::toeplitz::{CirculantMatrix, ToeplitzMatrix};
use bls12_381::G1Point;

/// Computes the sum of many Toeplitz matrix-vector products against a
/// fixed set of G1 vectors.
///
/// The vectors are fixed at setup, so their FFTs arrive precomputed (as
/// the `x_ext_fft_columns` table, grouped by circulant frequency) and are
/// stored as fixed-base MSM tables. Each product then costs one scalar FFT
/// per matrix, one MSM per frequency, and the whole batch shares a single
/// G1 IFFT.
#[derive(Debug)]
pub(crate) struct BatchToeplitzMatrixVecMul {
    /// Number of matrix-vector products in a batch; equals the number of
    /// fixed vectors.
    batch_size: usize,
    /// One fixed-base MSM per circulant frequency, over the precomputed
    /// FFT of every fixed vector at that frequency.
    frequency_msms: Vec<FixedBaseMSM>,
    /// Length of each fixed vector; the first half of the circulant
    /// result, which is the part that corresponds to the Toeplitz product.
    size_of_vector: usize,
    /// The circulant evaluation domain; double the vector length.
    circulant_domain: Domain,
}

impl BatchToeplitzMatrixVecMul {
    /// `x_ext_fft_columns` is the output of
    /// [`crate::fk20::columns::compute_x_ext_fft_columns`]: one group of
    /// points per circulant frequency.
    pub(crate) fn new(x_ext_fft_columns: Vec<Vec<G1Point>>, use_precomp: UsePrecomp) -> Self {
        let num_frequencies = x_ext_fft_columns.len();
        assert!(
            num_frequencies.is_power_of_two(),
            "the circulant domain size must be a power of two"
        );

        let batch_size = x_ext_fft_columns[0].len();
        let columns_all_same_length = x_ext_fft_columns
            .iter()
            .all(|column| column.len() == batch_size);
        assert!(
            columns_all_same_length,
            "expected all frequency groups to hold one point per fixed vector"
        );

        let size_of_vector = num_frequencies / 2;
        let circulant_domain = Domain::new(num_frequencies);

        // How much to precompute per base is a memory/speed trade-off that
        // the caller picks once at setup.
        let frequency_msms = x_ext_fft_columns
            .maybe_into_par_iter()
            .map(|points| FixedBaseMSM::new(points, use_precomp))
            .collect();

        Self {
            batch_size,
            frequency_msms,
            size_of_vector,
            circulant_domain,
        }
    }

    pub(crate) const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Computes `sum_i A_i x_i` over the fixed vectors `x_i`.
    ///
    /// Each Toeplitz matrix is embedded into a circulant matrix and its
    /// row FFT'd; transposing turns the per-matrix Hadamard products into
    /// one inner product per frequency, each of which is a fixed-base MSM
    /// against the precomputed tables. A single G1 IFFT of the frequency
    /// results, truncated to the first half, finishes the sum.
    pub(crate) fn sum_matrix_vector_mul(&self, matrices: Vec<ToeplitzMatrix>) -> Vec<G1Projective> {
        assert_eq!(
            matrices.len(),
            self.batch_size,
            "expected as many matrices as there are fixed vectors"
        );

        let circulant_matrices = matrices
            .maybe_into_par_iter()
            .map(CirculantMatrix::from_toeplitz);

        let row_ffts = circulant_matrices
            .maybe_into_par_iter()
            .map(|matrix| self.circulant_domain.fft_scalars(matrix.row.into()))
            .collect();
        let msm_scalars = transpose(row_ffts);

        let result = {
            #[cfg(feature = "tracing")]
            let _span = tracing::info_span!("fixed-base msm per circulant frequency").entered();
            self.frequency_msms
                .maybe_par_iter()
                .zip(msm_scalars)
                .map(|(points, scalars)| points.msm(&scalars))
                .collect()
        };

        self.circulant_domain
            .ifft_g1_take_n(result, Some(self.size_of_vector))
    }
}
