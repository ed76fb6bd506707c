//! Multi-point KZG openings over roots-of-unity cosets.
//!
//! The prover side implements FK20: all opening proofs for a fixed set of
//! cosets are computed at once via Toeplitz matrix-vector products in the
//! frequency domain and a single G1 FFT. The verifier side batches any
//! number of coset openings into one two-term pairing check.

pub mod commit_key;
mod fk20;
pub mod verification_key;

pub use fk20::{
    columns::compute_x_ext_fft_columns,
    cosets::recover_evaluations_in_domain_order,
    prover::FK20Prover,
    verifier::{CommitmentIndex, CosetIndex, FK20Verifier},
};
