use std::ops::Deref;

use bls12_381::{
    batch_inversion::batch_inverse,
    ff::{Field, PrimeField},
    Scalar,
};
use polynomial::{
    domain::Domain,
    poly_coeff::{vanishing_poly, PolyCoeff},
    CosetFFT,
};

use crate::errors::RSError;

/// Where the erasures sit inside the codeword.
///
/// Constructing the vanishing polynomial is the expensive part of
/// decoding, and it gets much cheaper when the erasures follow a known
/// structure instead of landing anywhere.
pub(crate) enum ErasurePattern {
    /// The codeword is split into equally sized blocks and the same
    /// positions are missing from every block.
    ///
    /// This is what losing a cell does to an extended blob: the cell's
    /// evaluations are spread across the codeword with a fixed stride, so
    /// one lost cell removes one position from every block.
    BlockSynchronizedErasures(BlockErasureIndices),
    /// Arbitrary erasure positions, with no structure to exploit.
    #[cfg(test)]
    Random { indices: Vec<usize> },
}

/// Position within a block at which an erasure occurred.
type BlockErasureIndex = usize;

/// The set of positions that are missing from every block of the codeword.
///
/// With `block_size = 4` and indices `[0, 2]`, every 4-element block of the
/// codeword is missing its 0th and 2nd entries.
#[derive(Debug, Clone, Default)]
pub struct BlockErasureIndices(pub Vec<BlockErasureIndex>);

impl Deref for BlockErasureIndices {
    type Target = Vec<BlockErasureIndex>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Reed-Solomon encoder and erasure decoder over a roots-of-unity domain.
///
/// Encoding evaluates the message polynomial over a domain
/// `expansion_factor` times larger than the message. Decoding multiplies
/// the punctured codeword by a vanishing polynomial over the erased
/// positions and divides it back out on a coset, where the vanishing
/// polynomial has no roots.
#[derive(Debug)]
pub struct ReedSolomon {
    /// Factor by which the message is expanded; rate is its reciprocal.
    expansion_factor: usize,
    /// Number of coefficients in the message polynomial.
    poly_len: usize,
    /// Evaluation domain of size `poly_len * expansion_factor`.
    evaluation_domain: Domain,
    /// Number of codeword values grouped into one block.
    block_size: usize,
    /// Number of blocks in the codeword.
    num_blocks: usize,
    /// Domain of size `block_size`, used to build the block vanishing
    /// polynomial cheaply.
    block_size_domain: Domain,
    /// Coset shift used for the divide step during recovery.
    fft_coset_gen: CosetFFT,
}

impl ReedSolomon {
    /// `poly_len`, `expansion_factor` and `block_size` must all be powers
    /// of two.
    pub fn new(poly_len: usize, expansion_factor: usize, block_size: usize) -> Self {
        assert!(
            expansion_factor.is_power_of_two()
                && poly_len.is_power_of_two()
                && block_size.is_power_of_two()
        );

        let evaluation_size = poly_len * expansion_factor;

        Self {
            expansion_factor,
            poly_len,
            evaluation_domain: Domain::new(evaluation_size),
            block_size,
            num_blocks: evaluation_size / block_size,
            block_size_domain: Domain::new(block_size),
            fft_coset_gen: CosetFFT::new(Scalar::MULTIPLICATIVE_GENERATOR),
        }
    }

    /// Largest number of arbitrary erasures that still leaves `poly_len`
    /// evaluations, the minimum needed to pin down the message.
    const fn acceptable_num_random_erasures(&self) -> usize {
        let total_codeword_len = self.poly_len * self.expansion_factor;
        total_codeword_len - self.poly_len
    }

    /// Largest number of erased block positions that recovery tolerates.
    pub const fn acceptable_num_block_erasures(&self) -> usize {
        self.acceptable_num_random_erasures() / self.num_blocks
    }

    /// Length of a codeword.
    pub const fn codeword_length(&self) -> usize {
        self.poly_len * self.expansion_factor
    }

    /// Evaluates the message polynomial over the full evaluation domain.
    pub fn encode(&self, poly_coefficient_form: PolyCoeff) -> Result<Vec<Scalar>, RSError> {
        if poly_coefficient_form.len() > self.poly_len {
            return Err(RSError::PolynomialHasTooManyCoefficients {
                num_coefficients: poly_coefficient_form.len(),
                max_num_coefficients: self.poly_len,
            });
        }
        Ok(self.evaluation_domain.fft_scalars(poly_coefficient_form))
    }

    /// Recovers the message polynomial from a codeword whose erased
    /// positions have been zeroed.
    ///
    /// `codeword_with_erasures` must hold the full evaluation vector in
    /// domain order, with `Scalar::ZERO` standing in for every erased
    /// value. `erasures` lists the positions missing from each block.
    pub fn recover_polynomial_coefficient(
        &self,
        codeword_with_erasures: Vec<Scalar>,
        erasures: BlockErasureIndices,
    ) -> Result<PolyCoeff, RSError> {
        self.recover_polynomial_coefficient_erasure_pattern(
            codeword_with_erasures,
            ErasurePattern::BlockSynchronizedErasures(erasures),
        )
    }

    #[cfg(test)]
    fn recover_polynomial_coefficient_random_erasure(
        &self,
        codeword_with_erasures: Vec<Scalar>,
        random_erasure: Vec<usize>,
    ) -> Result<PolyCoeff, RSError> {
        self.recover_polynomial_coefficient_erasure_pattern(
            codeword_with_erasures,
            ErasurePattern::Random {
                indices: random_erasure,
            },
        )
    }

    /// Builds the polynomial vanishing on every erased position of the
    /// codeword, given the per-block erased positions.
    ///
    /// First the polynomial vanishing on the erased positions of a single
    /// block is built over the block-size domain. Spreading its
    /// coefficients out by a stride of `num_blocks` then substitutes
    /// `x -> x^num_blocks`, which replicates each root across all blocks:
    /// exactly the erased codeword positions.
    ///
    /// The caller must have checked that the indices are in range, unique,
    /// and do not cover a whole block; with every block position erased
    /// the stride construction would be out of bounds.
    fn construct_vanishing_poly_from_block_erasures(
        &self,
        block_indices: &BlockErasureIndices,
    ) -> PolyCoeff {
        assert!(
            block_indices.len() != self.block_size,
            "all block positions are erased; recovery should have been rejected before this point"
        );

        let evaluation_domain_size = self.evaluation_domain.size();

        // Vanishing polynomial for the erased positions of one block.
        let missing_roots: Vec<_> = block_indices
            .iter()
            .map(|index| self.block_size_domain.roots[*index])
            .collect();
        let vanish_poly_single_block = vanishing_poly(&missing_roots);

        // Substitute x -> x^num_blocks by spreading the coefficients.
        let mut z_x = vec![Scalar::ZERO; evaluation_domain_size];
        for (i, coeff) in vanish_poly_single_block.0.into_iter().enumerate() {
            z_x[i * self.num_blocks] = coeff;
        }

        z_x.into()
    }

    fn construct_vanishing_poly_from_erasure_pattern(
        &self,
        erasures: ErasurePattern,
    ) -> Result<PolyCoeff, RSError> {
        match erasures {
            ErasurePattern::BlockSynchronizedErasures(indices) => {
                for &block_index in &indices.0 {
                    if block_index >= self.block_size {
                        return Err(RSError::InvalidBlockIndex {
                            block_index,
                            block_size: self.block_size,
                        });
                    }
                }
                if indices.len() > self.acceptable_num_block_erasures() {
                    return Err(RSError::TooManyBlockErasures {
                        num_block_erasures: indices.len(),
                        max_num_block_erasures_accepted: self.acceptable_num_block_erasures(),
                    });
                }
                Ok(self.construct_vanishing_poly_from_block_erasures(&indices))
            }
            #[cfg(test)]
            ErasurePattern::Random { indices } => {
                assert!(
                    indices.len() <= self.acceptable_num_random_erasures(),
                    "num random erasures = {} but tolerable erasures = {}",
                    indices.len(),
                    self.acceptable_num_random_erasures()
                );
                let roots: Vec<_> = indices
                    .into_iter()
                    .map(|index| self.evaluation_domain.roots[index])
                    .collect();
                Ok(vanishing_poly(&roots))
            }
        }
    }

    /// The recovery core.
    ///
    /// With `E` the punctured codeword and `Z` vanishing on the erased
    /// positions, `E * Z` agrees with `D * Z` on the whole domain, where
    /// `D` is the original message polynomial. Evaluating both on a coset
    /// (where `Z` has no roots) allows the pointwise division that
    /// isolates `D`.
    fn recover_polynomial_coefficient_erasure_pattern(
        &self,
        e_eval: Vec<Scalar>,
        erasure: ErasurePattern,
    ) -> Result<PolyCoeff, RSError> {
        let z_x = self.construct_vanishing_poly_from_erasure_pattern(erasure)?;

        // (E * Z) over the evaluation domain.
        let z_eval = self.evaluation_domain.fft_scalars(z_x.clone());
        let ez_eval: Vec<_> = z_eval.iter().zip(e_eval).map(|(zx, e)| zx * e).collect();

        let ez_coeffs = self.evaluation_domain.ifft_scalars(ez_eval);

        // Move to the coset, divide out Z, and come back.
        let dz_coset_eval = self
            .evaluation_domain
            .coset_fft_scalars(ez_coeffs, &self.fft_coset_gen);
        let mut z_inv_coset_eval = self
            .evaluation_domain
            .coset_fft_scalars(z_x, &self.fft_coset_gen);
        // Z has no roots on the coset, so every value is invertible.
        batch_inverse(&mut z_inv_coset_eval);

        let d_eval: Vec<_> = dz_coset_eval
            .iter()
            .zip(z_inv_coset_eval)
            .map(|(dz, zx_inv)| dz * zx_inv)
            .collect();

        let d_coeffs = self
            .evaluation_domain
            .coset_ifft_scalars(d_eval, &self.fft_coset_gen);

        // A valid codeword interpolates to degree < poly_len; anything in
        // the tail means the inputs were not consistent evaluations.
        for coefficient in d_coeffs.iter().skip(self.poly_len) {
            if *coefficient != Scalar::ZERO {
                return Err(RSError::PolynomialHasInvalidLength {
                    num_coefficients: d_coeffs.len(),
                    expected_num_coefficients: self.poly_len,
                });
            }
        }

        Ok(d_coeffs[..self.poly_len].to_vec().into())
    }
}

#[cfg(test)]
mod tests {
    use bls12_381::{ff::Field, Scalar};
    use polynomial::poly_coeff::PolyCoeff;

    use crate::{reed_solomon::ErasurePattern, BlockErasureIndices, ReedSolomon};

    #[test]
    fn encode_rejects_oversized_polynomials() {
        let rs = ReedSolomon::new(16, 2, 1);
        let poly = PolyCoeff((0..17u64).map(Scalar::from).collect());
        assert!(rs.encode(poly).is_err());
    }

    #[test]
    fn recovery_with_no_erasures_is_an_interpolation() {
        const POLY_LEN: usize = 16;

        let rs = ReedSolomon::new(POLY_LEN, 2, 1);
        let poly_coeff = PolyCoeff((0..POLY_LEN as u64).map(|i| -Scalar::from(i)).collect());

        let codeword = rs.encode(poly_coeff.clone()).expect("encode failed");
        assert_eq!(codeword.len(), rs.codeword_length());

        let got = rs
            .recover_polynomial_coefficient(codeword, BlockErasureIndices::default())
            .expect("recovery failed");

        assert_eq!(got, poly_coeff);
    }

    #[test]
    fn block_vanishing_poly_is_zero_exactly_on_erased_positions() {
        const POLY_LEN: usize = 512;
        const BLOCK_SIZE: usize = 16;

        let indices = vec![0, 1, 2, 3];

        let rs = ReedSolomon::new(POLY_LEN, 2, BLOCK_SIZE);
        let z =
            rs.construct_vanishing_poly_from_block_erasures(&BlockErasureIndices(indices.clone()));

        let evals = rs.evaluation_domain.fft_scalars(z);

        for block in evals.chunks(BLOCK_SIZE) {
            for (index, value) in block.iter().enumerate() {
                if indices.contains(&index) {
                    assert_eq!(*value, Scalar::ZERO);
                } else {
                    assert_ne!(*value, Scalar::ZERO);
                }
            }
        }
    }

    #[test]
    fn block_vanishing_poly_matches_explicit_root_list() {
        const POLY_LEN: usize = 64;
        const BLOCK_SIZE: usize = 4;

        let indices = vec![0, 1];

        let rs = ReedSolomon::new(POLY_LEN, 2, BLOCK_SIZE);
        let got_z_x =
            rs.construct_vanishing_poly_from_block_erasures(&BlockErasureIndices(indices.clone()));
        let got_z_x_lagrange = rs.evaluation_domain.fft_scalars(got_z_x);

        let num_blocks = rs.codeword_length() / BLOCK_SIZE;
        let mut all_indices = Vec::new();
        for index in indices {
            for block in 0..num_blocks {
                all_indices.push(index + block * BLOCK_SIZE);
            }
        }
        let z_x = rs
            .construct_vanishing_poly_from_erasure_pattern(ErasurePattern::Random {
                indices: all_indices,
            })
            .expect("vanishing polynomial construction failed");

        let expected_z_x_lagrange = rs.evaluation_domain.fft_scalars(z_x);
        assert_eq!(expected_z_x_lagrange, got_z_x_lagrange);
    }

    #[test]
    #[should_panic]
    fn vanishing_poly_with_every_position_erased_panics() {
        const BLOCK_SIZE: usize = 1;

        let rs = ReedSolomon::new(16, 2, BLOCK_SIZE);
        let all_positions: Vec<_> = (0..BLOCK_SIZE).collect();

        rs.construct_vanishing_poly_from_block_erasures(&BlockErasureIndices(all_positions));
    }

    #[test]
    fn recovery_up_to_the_random_erasure_limit() {
        const POLY_LEN: usize = 16;

        let rs = ReedSolomon::new(POLY_LEN, 2, 1);
        let poly_coeff = PolyCoeff((0..POLY_LEN as u64).map(Scalar::from).collect());

        let original_codeword = rs.encode(poly_coeff.clone()).expect("encode failed");
        for num_erasures in 0..=rs.acceptable_num_random_erasures() {
            let mut codeword = original_codeword.clone();

            let mut missing_indices = Vec::new();
            for (index, value) in codeword.iter_mut().enumerate().take(num_erasures) {
                *value = Scalar::ZERO;
                missing_indices.push(index);
            }

            let recovered = rs
                .recover_polynomial_coefficient_random_erasure(codeword, missing_indices)
                .expect("recovery failed");
            assert_eq!(recovered, poly_coeff, "erasures: {num_erasures}");
        }
    }

    #[test]
    fn block_erasure_recovery_succeeds_up_to_the_limit_and_fails_after() {
        const POLY_LEN: usize = 128;
        const BLOCK_SIZE: usize = 4;

        let rs = ReedSolomon::new(POLY_LEN, 2, BLOCK_SIZE);
        let poly_coeff = PolyCoeff((0..POLY_LEN as u64).map(Scalar::from).collect());

        let original_codeword = rs.encode(poly_coeff.clone()).expect("encode failed");

        for num_block_erasures in 0..=BLOCK_SIZE {
            let mut blocks: Vec<Vec<Scalar>> = original_codeword
                .chunks(BLOCK_SIZE)
                .map(<[Scalar]>::to_vec)
                .collect();

            let mut missing_block_indices = Vec::new();
            for index in 0..num_block_erasures {
                for block in &mut blocks {
                    block[index] = Scalar::ZERO;
                }
                missing_block_indices.push(index);
            }

            let codeword_with_erasures = blocks.into_iter().flatten().collect();
            let result = rs.recover_polynomial_coefficient(
                codeword_with_erasures,
                BlockErasureIndices(missing_block_indices),
            );

            if num_block_erasures <= rs.acceptable_num_block_erasures() {
                assert_eq!(result.expect("recovery failed"), poly_coeff);
            } else {
                assert!(result.is_err());
            }
        }
    }

    #[test]
    fn out_of_range_block_index_is_rejected() {
        let rs = ReedSolomon::new(16, 2, 4);
        let codeword = vec![Scalar::ZERO; 32];
        let result = rs.recover_polynomial_coefficient(codeword, BlockErasureIndices(vec![4]));
        assert!(matches!(
            result,
            Err(crate::errors::RSError::InvalidBlockIndex { .. })
        ));
    }
}
