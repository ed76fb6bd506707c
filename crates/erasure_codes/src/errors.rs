/// Errors from Reed-Solomon encoding or erasure recovery.
#[derive(Debug)]
pub enum RSError {
    /// The polynomial handed to `encode` has more coefficients than the
    /// code was configured for.
    PolynomialHasTooManyCoefficients {
        /// Number of coefficients in the provided polynomial.
        num_coefficients: usize,
        /// Maximum allowed number of coefficients.
        max_num_coefficients: usize,
    },

    /// The recovered polynomial has a higher degree than any valid
    /// codeword allows. The supplied evaluations were not a (partially
    /// erased) codeword of this code.
    PolynomialHasInvalidLength {
        /// Total number of coefficients returned.
        num_coefficients: usize,
        /// Expected number of coefficients.
        expected_num_coefficients: usize,
    },

    /// More block positions are erased than the code can correct.
    TooManyBlockErasures {
        /// Number of erased block positions.
        num_block_erasures: usize,
        /// Maximum number that can be corrected.
        max_num_block_erasures_accepted: usize,
    },

    /// A block position was out of range; positions must be less than the
    /// block size.
    InvalidBlockIndex {
        /// The offending block position.
        block_index: usize,
        /// The size of each block, used as the upper bound.
        block_size: usize,
    },
}
