use bls12_381::G1Point;

use crate::{
    constants::{CELLS_PER_EXT_BLOB, FIELD_ELEMENTS_PER_BLOB},
    serialization::{
        deserialize_blob_to_scalars, deserialize_bytes_to_scalar, deserialize_compressed_g1,
        serialize_cells, serialize_cells_and_proofs, serialize_g1_compressed,
    },
    settings::KzgSettings,
    BlobRef, Bytes48Ref, Cell, Error, KzgCommitment, KzgProof, SerializedScalar,
};
use kzg_single_open::transcript;

impl KzgSettings {
    /// Commits to the polynomial represented by the blob.
    ///
    /// The blob's field elements are its evaluations over the bit-reversed
    /// domain, so the commitment is a linear combination against the
    /// Lagrange-basis points.
    pub fn blob_to_kzg_commitment(&self, blob: BlobRef) -> Result<KzgCommitment, Error> {
        let evaluations = deserialize_blob_to_scalars(blob)?;

        let commitment: G1Point = self.single_open_prover.commit(&evaluations).into();

        Ok(serialize_g1_compressed(&commitment))
    }

    /// Computes the opening proof for the blob's polynomial at the point
    /// `z`, returning the proof and the evaluation `y = p(z)`.
    ///
    /// `z` may be a domain root; the quotient is computed with the
    /// finite-difference rule in that case.
    pub fn compute_kzg_proof(
        &self,
        blob: BlobRef,
        z: SerializedScalar,
    ) -> Result<(KzgProof, SerializedScalar), Error> {
        let evaluations = deserialize_blob_to_scalars(blob)?;
        let z = deserialize_bytes_to_scalar(&z)?;

        let (proof, y) = self.single_open_prover.compute_proof(&evaluations, z);

        Ok((
            serialize_g1_compressed(&proof.into()),
            y.to_bytes_be(),
        ))
    }

    /// Computes the opening proof for the blob at the Fiat-Shamir
    /// challenge point derived from the blob and its commitment.
    ///
    /// The commitment is not checked to actually commit to the blob, only
    /// to be a valid group element; a mismatched pair simply produces a
    /// proof that will not verify.
    pub fn compute_blob_kzg_proof(
        &self,
        blob: BlobRef,
        commitment: Bytes48Ref,
    ) -> Result<KzgProof, Error> {
        let evaluations = deserialize_blob_to_scalars(blob)?;

        // Validated for curve and subgroup membership only.
        let _ = deserialize_compressed_g1(commitment)?;

        let z = transcript::blob_challenge(FIELD_ELEMENTS_PER_BLOB as u64, commitment, blob);

        let (proof, _) = self.single_open_prover.compute_proof(&evaluations, z);

        Ok(serialize_g1_compressed(&proof.into()))
    }

    /// Computes the cells of the extended blob, without proofs.
    pub fn compute_cells(&self, blob: BlobRef) -> Result<[Cell; CELLS_PER_EXT_BLOB], Error> {
        let evaluations = deserialize_blob_to_scalars(blob)?;

        let polynomial = self.fk20_prover.interpolate(evaluations);
        let coset_evaluations = self.fk20_prover.extend_polynomial(polynomial);

        Ok(serialize_cells(coset_evaluations))
    }

    /// Computes the cells of the extended blob together with one opening
    /// proof per cell, via FK20.
    pub fn compute_cells_and_kzg_proofs(
        &self,
        blob: BlobRef,
    ) -> Result<([Cell; CELLS_PER_EXT_BLOB], [KzgProof; CELLS_PER_EXT_BLOB]), Error> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("compute_cells_and_kzg_proofs").entered();

        let evaluations = deserialize_blob_to_scalars(blob)?;

        let polynomial = self.fk20_prover.interpolate(evaluations);
        let (proofs, coset_evaluations) = self.fk20_prover.compute_multi_opening_proofs(polynomial);

        Ok(serialize_cells_and_proofs(coset_evaluations, &proofs))
    }
}
