use erasure_codes::errors::RSError;

use crate::CellIndex;

/// The coarse classification every error maps to.
///
/// Mirrors the return-code split a C caller would see: invalid input
/// versus a violated internal precondition. Pairing mismatches are
/// neither; verification reports them as an ordinary `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input failed validation: wrong length, non-canonical encoding,
    /// point not in the subgroup, index out of range, duplicate index, or
    /// an empty batch where one is not allowed.
    BadArgs,
    /// A condition that should hold by construction failed; the inputs
    /// passed validation but were not what they claimed to be.
    Internal,
}

/// Any error a public operation can return.
#[derive(Debug)]
pub enum Error {
    /// Byte-level validation of an input failed.
    Serialization(SerializationError),
    /// The trusted setup file could not be parsed or validated.
    TrustedSetup(TrustedSetupError),
    /// Batch verification inputs were malformed.
    Verifier(VerifierError),
    /// Cell recovery inputs were malformed, or recovery itself failed.
    Recovery(RecoveryError),
    /// A serialized settings cache was malformed or incompatible.
    Cache(CacheError),
}

impl Error {
    /// The coarse class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Recovery(RecoveryError::ReedSolomon(_)) => ErrorKind::Internal,
            _ => ErrorKind::BadArgs,
        }
    }
}

impl From<SerializationError> for Error {
    fn from(value: SerializationError) -> Self {
        Self::Serialization(value)
    }
}

impl From<TrustedSetupError> for Error {
    fn from(value: TrustedSetupError) -> Self {
        Self::TrustedSetup(value)
    }
}

impl From<VerifierError> for Error {
    fn from(value: VerifierError) -> Self {
        Self::Verifier(value)
    }
}

impl From<RecoveryError> for Error {
    fn from(value: RecoveryError) -> Self {
        Self::Recovery(value)
    }
}

impl From<RSError> for Error {
    fn from(value: RSError) -> Self {
        Self::Recovery(RecoveryError::ReedSolomon(value))
    }
}

impl From<CacheError> for Error {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

/// Errors from deserializing untrusted bytes.
#[derive(Debug)]
pub enum SerializationError {
    /// The bytes are not the canonical encoding of a field element.
    CouldNotDeserializeScalar {
        /// The offending bytes.
        bytes: Vec<u8>,
    },
    /// The bytes are not a valid compressed G1 point in the correct
    /// subgroup.
    CouldNotDeserializeG1Point {
        /// The offending bytes.
        bytes: Vec<u8>,
    },
    /// A scalar had the wrong byte length.
    ScalarHasInvalidLength {
        /// Detected length.
        length: usize,
    },
    /// A blob had the wrong byte length.
    BlobHasInvalidLength {
        /// Detected length.
        length: usize,
    },
}

/// Errors from parsing or validating the trusted setup file.
#[derive(Debug)]
pub enum TrustedSetupError {
    /// The file ended before all announced values were read.
    MissingToken {
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// A count field did not parse as an integer.
    InvalidCount {
        /// The token that failed to parse.
        token: String,
    },
    /// The announced number of G1 points is not the protocol's.
    UnexpectedNumberOfG1Points {
        /// Announced count.
        got: usize,
    },
    /// The announced number of G2 points is not the protocol's.
    UnexpectedNumberOfG2Points {
        /// Announced count.
        got: usize,
    },
    /// A point was not valid hex of the expected width.
    InvalidHexEncoding {
        /// Zero-based index of the point within its section.
        index: usize,
    },
    /// A point failed decompression or the subgroup check.
    InvalidGroupElement {
        /// Zero-based index of the point within its section.
        index: usize,
    },
    /// Unparsed tokens remained after all announced values.
    TrailingData {
        /// Number of leftover tokens.
        num_tokens: usize,
    },
    /// The setup file could not be read.
    Io(std::io::Error),
}

/// Errors from validating batch-verification inputs.
#[derive(Debug)]
pub enum VerifierError {
    /// The batch was empty; verification over nothing is rejected rather
    /// than vacuously accepted.
    EmptyBatch,
    /// The per-item inputs did not have matching lengths.
    BatchVerificationInputsMustHaveSameLength {
        /// Length of the blobs or cells input.
        items_len: usize,
        /// Length of the commitments input.
        commitments_len: usize,
        /// Length of the cell indices input, where applicable.
        cell_indices_len: usize,
        /// Length of the proofs input.
        proofs_len: usize,
    },
    /// A cell index referenced a cell beyond the extended blob.
    CellIndexOutOfRange {
        /// The offending index.
        cell_index: CellIndex,
        /// Number of cells in an extended blob.
        max_number_of_cells: u64,
    },
}

/// Errors from validating recovery inputs, or from recovery itself.
#[derive(Debug)]
pub enum RecoveryError {
    /// Each supplied cell needs exactly one index.
    NumCellIndicesNotEqualToNumCells {
        /// Number of indices provided.
        num_cell_indices: usize,
        /// Number of cells provided.
        num_cells: usize,
    },
    /// Fewer cells than the reconstruction threshold.
    NotEnoughCellsToReconstruct {
        /// Number of cells received.
        num_cells_received: usize,
        /// Minimum number required.
        min_cells_needed: usize,
    },
    /// More cells than an extended blob contains.
    TooManyCellsReceived {
        /// Number of cells received.
        num_cells_received: usize,
        /// Maximum number accepted.
        max_cells_needed: usize,
    },
    /// A cell index referenced a cell beyond the extended blob.
    CellIndexOutOfRange {
        /// The offending index.
        cell_index: CellIndex,
        /// Number of cells in an extended blob.
        max_number_of_cells: u64,
    },
    /// The same cell was supplied more than once.
    CellIndicesNotUnique,
    /// The supplied cells passed validation but were not evaluations of
    /// any single blob polynomial.
    ReedSolomon(RSError),
}

/// Errors from loading a serialized settings cache.
#[derive(Debug)]
pub enum CacheError {
    /// The bytes do not start with the settings magic.
    InvalidMagic,
    /// The format version is not one this build reads.
    UnsupportedVersion {
        /// Version byte found.
        got: u8,
    },
    /// The cache was written with a different endianness marker.
    EndiannessMismatch {
        /// Endianness byte found.
        got: u8,
    },
    /// The cache was written with a different word size marker.
    WordSizeMismatch {
        /// Word-size byte found.
        got: u8,
    },
    /// The cache is shorter than its layout requires.
    UnexpectedEndOfData,
    /// A stored field element was not canonical.
    InvalidFieldElement,
    /// A stored group element had non-canonical coordinates.
    InvalidGroupElement,
    /// The stored roots of unity disagree with the ones this build
    /// derives; the cache does not describe this domain.
    RootsMismatch,
    /// The cache has bytes beyond the end of its layout.
    TrailingData {
        /// Number of leftover bytes.
        num_bytes: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reed_solomon_failures_are_internal_everything_else_bad_args() {
        let internal: Error = RSError::PolynomialHasInvalidLength {
            num_coefficients: 10,
            expected_num_coefficients: 4,
        }
        .into();
        assert_eq!(internal.kind(), ErrorKind::Internal);

        let bad_args: Error = RecoveryError::CellIndicesNotUnique.into();
        assert_eq!(bad_args.kind(), ErrorKind::BadArgs);

        let bad_args: Error = VerifierError::EmptyBatch.into();
        assert_eq!(bad_args.kind(), ErrorKind::BadArgs);

        let bad_args: Error = SerializationError::BlobHasInvalidLength { length: 1 }.into();
        assert_eq!(bad_args.kind(), ErrorKind::BadArgs);
    }
}
