//! KZG commitments and opening proofs for EIP-4844 blobs and EIP-7594
//! data-availability cells.
//!
//! Everything runs against a [`KzgSettings`] value built once from the
//! trusted setup and then shared by reference; the settings own all
//! precomputed state (roots of unity, commitment bases, the FK20 tables)
//! and are immutable, so concurrent use needs no synchronization.

#[cfg(all(feature = "singlethreaded", feature = "multithreaded"))]
compile_error!("`singlethreaded` and `multithreaded` cannot be enabled simultaneously");

pub mod constants;
mod cache;
mod errors;
mod prover;
mod recovery;
mod serialization;
mod settings;
mod trusted_setup;
mod verifier;

pub use bls12_381::fixed_base_msm::UsePrecomp;
pub use errors::{
    CacheError, Error, ErrorKind, RecoveryError, SerializationError, TrustedSetupError,
    VerifierError,
};
pub use settings::KzgSettings;
pub use trusted_setup::TrustedSetup;

use constants::{BYTES_PER_BLOB, BYTES_PER_CELL, BYTES_PER_COMMITMENT, BYTES_PER_FIELD_ELEMENT};

/// Reference to an opaque blob.
///
/// Blobs only ever enter the library; nothing returns one, so there is no
/// owned blob type.
pub type BlobRef<'a> = &'a [u8; BYTES_PER_BLOB];

/// Reference to an untrusted 48-byte value: a purported commitment or a
/// purported proof.
pub type Bytes48Ref<'a> = &'a [u8; 48];

/// The evaluations of a polynomial over one coset, serialized.
///
/// Heap allocated; 128 of them are returned at a time.
pub type Cell = Box<[u8; BYTES_PER_CELL]>;

/// Reference to a cell.
pub type CellRef<'a> = &'a [u8; BYTES_PER_CELL];

/// A 48-byte compressed commitment to a quotient polynomial, attesting to
/// an evaluation (EIP-4844) or to a coset of evaluations (EIP-7594).
pub type KzgProof = [u8; BYTES_PER_COMMITMENT];

/// A 48-byte compressed commitment to a blob polynomial.
pub type KzgCommitment = [u8; BYTES_PER_COMMITMENT];

/// A 32-byte big-endian field element.
pub type SerializedScalar = [u8; BYTES_PER_FIELD_ELEMENT];

/// Wire-order index of a cell within the extended blob.
pub type CellIndex = kzg_multi_open::CosetIndex;
