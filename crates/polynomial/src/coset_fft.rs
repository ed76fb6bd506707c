use bls12_381::{ff::Field, Scalar};

/// A coset shift for FFTs: evaluation happens over `g * H` instead of the
/// subgroup `H` itself.
///
/// Stores the generator and its inverse so that forward and inverse
/// transforms can scale without re-inverting.
#[derive(Debug, Clone)]
pub struct CosetFFT {
    /// The coset shift `g`.
    pub generator: Scalar,
    /// `g^-1`, applied when interpolating back from the coset.
    pub generator_inv: Scalar,
}

impl CosetFFT {
    /// Panics if the generator is zero.
    pub fn new(generator: Scalar) -> Self {
        Self {
            generator,
            generator_inv: generator.invert().expect("coset generator must be non-zero"),
        }
    }
}
