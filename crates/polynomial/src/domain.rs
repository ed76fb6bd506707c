use crate::coset_fft::CosetFFT;
use crate::fft::{fft_g1_inplace, fft_scalar_inplace, precompute_twiddle_factors};
use crate::poly_coeff::PolyCoeff;
use bls12_381::ff::{Field, PrimeField};
use bls12_381::{
    group::Group,
    {G1Projective, Scalar},
};

/// A power-of-two evaluation domain: the n-th roots of unity in Fr, with
/// the cached twiddles needed to FFT and IFFT over them.
#[derive(Debug, Clone)]
pub struct Domain {
    /// The n-th roots of unity in natural order; `roots[1]` is the
    /// domain generator.
    pub roots: Vec<Scalar>,
    /// Domain size as a field element.
    pub domain_size: Scalar,
    /// Inverse of the domain size, applied after inverse transforms.
    pub domain_size_inv: Scalar,
    /// Primitive n-th root of unity generating this domain.
    pub generator: Scalar,
    /// Inverse of the generator, used by the inverse transform.
    pub generator_inv: Scalar,
    /// Per-stage twiddles for the forward FFT.
    twiddle_factors: Vec<Scalar>,
    /// Per-stage twiddles for the inverse FFT.
    twiddle_factors_inv: Vec<Scalar>,
}

impl Domain {
    /// Creates the domain of the given size, rounded up to the next power
    /// of two.
    ///
    /// Panics if the required subgroup exceeds the 2-adicity of Fr.
    pub fn new(size: usize) -> Self {
        let size = if size.is_power_of_two() {
            size
        } else {
            size.next_power_of_two()
        };

        let generator = Self::compute_generator_for_size(size);
        let generator_inv = generator.invert().expect("generator is non-zero");

        let size_as_scalar = Scalar::from(size as u64);
        let size_as_scalar_inv = size_as_scalar.invert().expect("size is non-zero");

        let mut roots = Vec::with_capacity(size);
        roots.push(Scalar::ONE);
        for i in 1..size {
            let prev_root = roots[i - 1];
            roots.push(prev_root * generator);
        }

        let twiddle_factors = precompute_twiddle_factors(&generator, size);
        let twiddle_factors_inv = precompute_twiddle_factors(&generator_inv, size);

        Self {
            roots,
            domain_size: size_as_scalar,
            domain_size_inv: size_as_scalar_inv,
            generator,
            generator_inv,
            twiddle_factors,
            twiddle_factors_inv,
        }
    }

    /// A primitive `size`-th root of unity, obtained by raising the 2^32
    /// order generator to `2^(32 - log2 size)`.
    fn compute_generator_for_size(size: usize) -> Scalar {
        assert!(size.is_power_of_two());

        let log_size_of_group = size.trailing_zeros();
        assert!(
            log_size_of_group <= Self::TWO_ADICITY,
            "two adicity is 32 but group size needed is 2^{log_size_of_group}"
        );

        let exponent: u64 = 1 << (u64::from(Self::TWO_ADICITY) - u64::from(log_size_of_group));
        Scalar::ROOT_OF_UNITY.pow_vartime([exponent])
    }

    /// The largest power of two dividing r - 1.
    const TWO_ADICITY: u32 = 32;

    /// Number of points in the domain; always a power of two.
    pub fn size(&self) -> usize {
        self.roots.len()
    }

    /// Evaluates the polynomial at every point of the domain.
    pub fn fft_scalars(&self, mut polynomial: PolyCoeff) -> Vec<Scalar> {
        polynomial.resize(self.size(), Scalar::ZERO);
        fft_scalar_inplace(&self.twiddle_factors, &mut polynomial);
        polynomial.0
    }

    /// Evaluates the polynomial at every point of the coset `g * H`.
    pub fn coset_fft_scalars(&self, mut points: PolyCoeff, coset: &CosetFFT) -> Vec<Scalar> {
        points.resize(self.size(), Scalar::ZERO);

        let mut coset_scale = Scalar::ONE;
        for point in points.iter_mut() {
            *point *= coset_scale;
            coset_scale *= coset.generator;
        }
        fft_scalar_inplace(&self.twiddle_factors, &mut points);
        points.0
    }

    /// Interpolates evaluations over the domain into monomial form.
    pub fn ifft_scalars(&self, mut points: Vec<Scalar>) -> PolyCoeff {
        points.resize(self.size(), Scalar::ZERO);
        fft_scalar_inplace(&self.twiddle_factors_inv, &mut points);

        for element in points.iter_mut() {
            *element *= self.domain_size_inv;
        }

        PolyCoeff(points)
    }

    /// Interpolates evaluations over the coset `g * H` into monomial form.
    pub fn coset_ifft_scalars(&self, points: Vec<Scalar>, coset: &CosetFFT) -> PolyCoeff {
        let mut coset_coeffs = self.ifft_scalars(points);

        let mut coset_scale = Scalar::ONE;
        for element in coset_coeffs.iter_mut() {
            *element *= coset_scale;
            coset_scale *= coset.generator_inv;
        }
        coset_coeffs
    }

    /// The FFT over G1: inner products between the domain's powers and the
    /// input points, with scalar multiplication in place of field
    /// multiplication.
    pub fn fft_g1(&self, mut points: Vec<G1Projective>) -> Vec<G1Projective> {
        points.resize(self.size(), G1Projective::identity());
        fft_g1_inplace(&self.twiddle_factors, &mut points);
        points
    }

    /// The inverse FFT over G1.
    pub fn ifft_g1(&self, points: Vec<G1Projective>) -> Vec<G1Projective> {
        self.ifft_g1_take_n(points, None)
    }

    /// The inverse FFT over G1, returning only the first `n` outputs.
    ///
    /// Truncating before the final scaling pass saves one scalar
    /// multiplication per discarded element.
    pub fn ifft_g1_take_n(
        &self,
        mut points: Vec<G1Projective>,
        n: Option<usize>,
    ) -> Vec<G1Projective> {
        points.resize(self.size(), G1Projective::identity());
        fft_g1_inplace(&self.twiddle_factors_inv, &mut points);

        let mut ifft_g1 = match n {
            Some(num_to_take) => {
                assert!(num_to_take < points.len());
                points[0..num_to_take].to_vec()
            }
            None => points,
        };

        for element in ifft_g1.iter_mut() {
            *element *= self.domain_size_inv;
        }

        ifft_g1
    }
}
