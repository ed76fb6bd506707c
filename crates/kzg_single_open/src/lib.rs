//! Single-point KZG openings for polynomials in evaluation form.
//!
//! The blob protocol keeps polynomials as evaluations over the
//! bit-reversal-permuted domain; this crate evaluates them at arbitrary
//! points with the barycentric formula, computes opening quotients without
//! ever leaving evaluation form (including at domain roots, where the naive
//! division would be 0/0), and runs the pairing checks.

mod quotient;

pub mod prover;
pub mod transcript;
pub mod verifier;

pub use prover::{CommitKey, Prover};
pub use verifier::{VerificationKey, Verifier};
