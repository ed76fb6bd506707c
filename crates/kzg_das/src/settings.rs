use bls12_381::fixed_base_msm::UsePrecomp;
use bls12_381::{ff::Field, g1_batch_normalize, G1Point, G1Projective, G2Point, Scalar};
use erasure_codes::ReedSolomon;
use kzg_multi_open::{
    compute_x_ext_fft_columns, verification_key::VerificationKey, FK20Prover, FK20Verifier,
};
use polynomial::{bit_reversal_permutation, domain::Domain};

use crate::{
    constants::{
        CELLS_PER_EXT_BLOB, EXPANSION_FACTOR, FIELD_ELEMENTS_PER_BLOB, FIELD_ELEMENTS_PER_CELL,
        FIELD_ELEMENTS_PER_EXT_BLOB, NUM_G1_POINTS, NUM_G2_POINTS,
    },
    errors::TrustedSetupError,
    Error, TrustedSetup,
};

/// All precomputed state the blob and cell operations run against.
///
/// Built once from the trusted setup, immutable afterwards; every
/// operation borrows it read-only, so a single instance can serve any
/// number of threads. Dropping it releases everything.
#[derive(Debug)]
pub struct KzgSettings {
    /// The 8192-th roots of unity in natural order, with the first root
    /// repeated at the end so that `roots[i+1]` is always valid.
    pub(crate) roots_of_unity: Vec<Scalar>,
    /// The 8192-th roots of unity in bit-reversed order; position
    /// `i * 64` holds the shift of wire-order cell `i`.
    pub(crate) brp_roots_of_unity: Vec<Scalar>,
    /// The roots in reverse order; the inverse-transform twiddles are
    /// powers of `reverse_roots[1]`.
    pub(crate) reverse_roots_of_unity: Vec<Scalar>,
    /// `[tau^i] G1` from the setup.
    pub(crate) g1_values_monomial: Vec<G1Point>,
    /// Lagrange-basis G1 commitments in bit-reversed order, derived from
    /// the monomial points by a G1 IFFT.
    pub(crate) g1_values_lagrange_brp: Vec<G1Point>,
    /// `[tau^i] G2` from the setup.
    pub(crate) g2_values_monomial: Vec<G2Point>,
    /// The FK20 Toeplitz-column FFT table: one group of 64 points per
    /// circulant frequency, 128 groups.
    pub(crate) x_ext_fft_columns: Vec<Vec<G1Point>>,
    /// Window width of the fixed-base tables; zero when tables are
    /// disabled.
    pub(crate) wbits: usize,

    // The engines below borrow nothing; they own copies of whatever
    // precomputed state they need.
    pub(crate) single_open_prover: kzg_single_open::Prover,
    pub(crate) single_open_verifier: kzg_single_open::Verifier,
    pub(crate) fk20_prover: FK20Prover,
    pub(crate) fk20_verifier: FK20Verifier,
    pub(crate) rs: ReedSolomon,
}

impl KzgSettings {
    /// Builds the settings from a validated trusted setup.
    ///
    /// Construction order: domain roots, then the Lagrange basis by G1
    /// IFFT of the monomial points, then the FK20 column FFTs, then (when
    /// `use_precomp` says so) the fixed-base window tables over those
    /// columns.
    pub fn new(trusted_setup: &TrustedSetup, use_precomp: UsePrecomp) -> Result<Self, Error> {
        Self::build(
            trusted_setup.g1_monomial.clone(),
            None,
            trusted_setup.g2_monomial.clone(),
            None,
            use_precomp,
        )
    }

    /// The shared construction path for both the trusted setup and the
    /// serialized cache: derives whatever precomputed state was not
    /// supplied.
    pub(crate) fn build(
        g1_values_monomial: Vec<G1Point>,
        g1_values_lagrange_brp: Option<Vec<G1Point>>,
        g2_values_monomial: Vec<G2Point>,
        x_ext_fft_columns: Option<Vec<Vec<G1Point>>>,
        use_precomp: UsePrecomp,
    ) -> Result<Self, Error> {
        if g1_values_monomial.len() != NUM_G1_POINTS {
            return Err(TrustedSetupError::UnexpectedNumberOfG1Points {
                got: g1_values_monomial.len(),
            }
            .into());
        }
        if g2_values_monomial.len() != NUM_G2_POINTS {
            return Err(TrustedSetupError::UnexpectedNumberOfG2Points {
                got: g2_values_monomial.len(),
            }
            .into());
        }

        // Roots of the extended domain, in the three layouts the protocol
        // indexes by.
        let ext_domain = Domain::new(FIELD_ELEMENTS_PER_EXT_BLOB);

        let mut roots_of_unity = ext_domain.roots.clone();
        roots_of_unity.push(Scalar::ONE);

        let mut brp_roots_of_unity = ext_domain.roots.clone();
        bit_reversal_permutation(&mut brp_roots_of_unity);

        let mut reverse_roots_of_unity = roots_of_unity.clone();
        reverse_roots_of_unity.reverse();

        // Lagrange-basis commitments: the G1 IFFT of the monomial basis,
        // bit-reversed to match the wire layout of blob data. The file's
        // own Lagrange section is never trusted for this.
        let g1_values_lagrange_brp = match g1_values_lagrange_brp {
            Some(points) => points,
            None => {
                let poly_domain = Domain::new(FIELD_ELEMENTS_PER_BLOB);
                let monomial_projective: Vec<G1Projective> = g1_values_monomial
                    .iter()
                    .map(|point| G1Projective::from(*point))
                    .collect();
                let mut lagrange = poly_domain.ifft_g1(monomial_projective);
                bit_reversal_permutation(&mut lagrange);
                g1_batch_normalize(&lagrange)
            }
        };

        // The FK20 precomputation over the monomial SRS.
        let x_ext_fft_columns = match x_ext_fft_columns {
            Some(columns) => columns,
            None => compute_x_ext_fft_columns(&g1_values_monomial, FIELD_ELEMENTS_PER_CELL),
        };

        let single_open_prover = kzg_single_open::Prover::new(
            FIELD_ELEMENTS_PER_BLOB,
            kzg_single_open::CommitKey {
                g1_monomial: g1_values_monomial.clone(),
                g1_lagrange_brp: g1_values_lagrange_brp.clone(),
            },
        );
        let single_open_verifier = kzg_single_open::Verifier::new(
            FIELD_ELEMENTS_PER_BLOB,
            kzg_single_open::VerificationKey {
                g1_gen: g1_values_monomial[0],
                g2_gen: g2_values_monomial[0],
                tau_g2: g2_values_monomial[1],
            },
        );

        let fk20_prover = FK20Prover::new(
            x_ext_fft_columns.clone(),
            FIELD_ELEMENTS_PER_BLOB,
            FIELD_ELEMENTS_PER_CELL,
            FIELD_ELEMENTS_PER_EXT_BLOB,
            use_precomp,
        );

        let fk20_verifier = FK20Verifier::new(
            VerificationKey::new(
                g1_values_monomial[..NUM_G2_POINTS].to_vec(),
                g2_values_monomial.clone(),
                FIELD_ELEMENTS_PER_CELL,
                FIELD_ELEMENTS_PER_BLOB,
            ),
            FIELD_ELEMENTS_PER_EXT_BLOB,
            CELLS_PER_EXT_BLOB,
        );

        let rs = ReedSolomon::new(
            FIELD_ELEMENTS_PER_BLOB,
            EXPANSION_FACTOR,
            CELLS_PER_EXT_BLOB,
        );

        let settings = Self {
            roots_of_unity,
            brp_roots_of_unity,
            reverse_roots_of_unity,
            g1_values_monomial,
            g1_values_lagrange_brp,
            g2_values_monomial,
            x_ext_fft_columns,
            wbits: use_precomp.width(),
            single_open_prover,
            single_open_verifier,
            fk20_prover,
            fk20_verifier,
            rs,
        };

        // The verifier derives its coset shifts independently; they must
        // be the bit-reversed roots at cell stride.
        debug_assert!(settings
            .fk20_verifier
            .bit_reversed_coset_gens
            .iter()
            .enumerate()
            .all(|(i, gen)| {
                *gen == settings.brp_roots_of_unity[i * FIELD_ELEMENTS_PER_CELL]
            }));

        Ok(settings)
    }

    /// The 8192-th roots of unity in natural order; `roots()[1]` is the
    /// domain generator. The slice has 8193 entries, the last equal to
    /// the first.
    pub fn roots_of_unity(&self) -> &[Scalar] {
        &self.roots_of_unity
    }

    /// The roots in bit-reversed order, the order blob evaluations are
    /// laid out in.
    pub fn brp_roots_of_unity(&self) -> &[Scalar] {
        &self.brp_roots_of_unity
    }

    /// The roots in reverse order.
    pub fn reverse_roots_of_unity(&self) -> &[Scalar] {
        &self.reverse_roots_of_unity
    }
}
