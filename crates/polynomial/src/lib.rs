pub mod domain;
pub mod poly_coeff;

mod coset_fft;
mod fft;

pub use coset_fft::CosetFFT;
pub use fft::{bit_reversal_permutation, reverse_bits};
