use std::collections::HashMap;

use crate::{
    constants::{CELLS_PER_EXT_BLOB, FIELD_ELEMENTS_PER_BLOB},
    errors::VerifierError,
    serialization::{
        deserialize_blob_to_scalars, deserialize_bytes_to_scalar, deserialize_cells,
        deserialize_compressed_g1, deserialize_compressed_g1_points,
    },
    settings::KzgSettings,
    BlobRef, Bytes48Ref, CellIndex, CellRef, Error, SerializedScalar,
};
use kzg_single_open::transcript;

impl KzgSettings {
    /// Verifies an opening proof against a commitment: that the committed
    /// polynomial evaluates to `y` at `z`.
    ///
    /// `Ok(false)` means the proof is simply wrong; errors are reserved
    /// for malformed inputs.
    pub fn verify_kzg_proof(
        &self,
        commitment: Bytes48Ref,
        z: SerializedScalar,
        y: SerializedScalar,
        proof: Bytes48Ref,
    ) -> Result<bool, Error> {
        let commitment = deserialize_compressed_g1(commitment)?;
        let proof = deserialize_compressed_g1(proof)?;
        let z = deserialize_bytes_to_scalar(&z)?;
        let y = deserialize_bytes_to_scalar(&y)?;

        Ok(self.single_open_verifier.verify(commitment, z, y, proof))
    }

    /// Verifies a blob proof: the proof must open the commitment at the
    /// Fiat-Shamir challenge point to the blob's own evaluation there.
    pub fn verify_blob_kzg_proof(
        &self,
        blob: BlobRef,
        commitment: Bytes48Ref,
        proof: Bytes48Ref,
    ) -> Result<bool, Error> {
        let evaluations = deserialize_blob_to_scalars(blob)?;
        let commitment_point = deserialize_compressed_g1(commitment)?;
        let proof_point = deserialize_compressed_g1(proof)?;

        let z = transcript::blob_challenge(FIELD_ELEMENTS_PER_BLOB as u64, commitment, blob);
        let y = self.single_open_verifier.evaluate(&evaluations, z);

        Ok(self.single_open_verifier.verify(commitment_point, z, y, proof_point))
    }

    /// Verifies a batch of blob proofs with a single pairing equation.
    ///
    /// Empty batches are rejected; all three inputs must have the same
    /// length.
    pub fn verify_blob_kzg_proof_batch(
        &self,
        blobs: Vec<BlobRef>,
        commitments: Vec<Bytes48Ref>,
        proofs: Vec<Bytes48Ref>,
    ) -> Result<bool, Error> {
        if blobs.is_empty() {
            return Err(VerifierError::EmptyBatch.into());
        }
        let same_length = blobs.len() == commitments.len() && blobs.len() == proofs.len();
        if !same_length {
            return Err(VerifierError::BatchVerificationInputsMustHaveSameLength {
                items_len: blobs.len(),
                commitments_len: commitments.len(),
                cell_indices_len: 0,
                proofs_len: proofs.len(),
            }
            .into());
        }

        let polynomials = blobs
            .iter()
            .map(|blob| deserialize_blob_to_scalars(*blob))
            .collect::<Result<Vec<_>, _>>()?;
        let commitment_points = deserialize_compressed_g1_points(commitments.clone())?;
        let proof_points = deserialize_compressed_g1_points(proofs.clone())?;

        // Per-tuple challenge and claimed evaluation.
        let (zs, ys): (Vec<_>, Vec<_>) = blobs
            .iter()
            .zip(&polynomials)
            .zip(&commitments)
            .map(|((blob, polynomial), commitment)| {
                let z =
                    transcript::blob_challenge(FIELD_ELEMENTS_PER_BLOB as u64, commitment, *blob);
                let y = self.single_open_verifier.evaluate(polynomial, z);
                (z, y)
            })
            .unzip();

        let r_powers = transcript::batch_challenge_powers(
            FIELD_ELEMENTS_PER_BLOB as u64,
            &commitments,
            &zs,
            &ys,
            &proofs,
        );

        Ok(self.single_open_verifier.verify_batch(
            &commitment_points,
            &zs,
            &ys,
            &proof_points,
            &r_powers,
        ))
    }

    /// Verifies a batch of cell proofs against their commitments with a
    /// single pairing equation.
    ///
    /// Commitments may repeat (the common case is every cell of one
    /// blob); they are deduplicated before being folded into the check.
    pub fn verify_cell_kzg_proof_batch(
        &self,
        commitments: Vec<Bytes48Ref>,
        cell_indices: &[CellIndex],
        cells: Vec<CellRef>,
        proofs: Vec<Bytes48Ref>,
    ) -> Result<bool, Error> {
        let (deduplicated_commitments, commitment_indices) = deduplicate_with_indices(commitments);

        validate_batch(
            &deduplicated_commitments,
            &commitment_indices,
            cell_indices,
            &cells,
            &proofs,
        )?;

        let row_commitments = deserialize_compressed_g1_points(deduplicated_commitments)?;
        let proof_points = deserialize_compressed_g1_points(proofs)?;
        let coset_evals = deserialize_cells(cells)?;

        Ok(self.fk20_verifier.verify_multi_opening(
            &row_commitments,
            &commitment_indices,
            cell_indices,
            &coset_evals,
            &proof_points,
        ))
    }
}

/// Replaces duplicates with indices into a deduplicated list, preserving
/// first-seen order.
fn deduplicate_with_indices<T: Eq + std::hash::Hash + Clone>(input: Vec<T>) -> (Vec<T>, Vec<u64>) {
    let mut unique = Vec::new();
    let mut map = HashMap::new();

    let indices = input
        .into_iter()
        .map(|item| {
            *map.entry(item.clone()).or_insert_with(|| {
                let idx = unique.len();
                unique.push(item);
                idx
            }) as u64
        })
        .collect();

    (unique, indices)
}

/// Shape validation for the cell batch; everything here is bad-args.
fn validate_batch(
    deduplicated_commitments: &[Bytes48Ref],
    commitment_indices: &[u64],
    cell_indices: &[CellIndex],
    cells: &[CellRef],
    proofs: &[Bytes48Ref],
) -> Result<(), VerifierError> {
    let same_length = commitment_indices.len() == cell_indices.len()
        && commitment_indices.len() == cells.len()
        && commitment_indices.len() == proofs.len();
    if !same_length {
        return Err(VerifierError::BatchVerificationInputsMustHaveSameLength {
            items_len: cells.len(),
            commitments_len: commitment_indices.len(),
            cell_indices_len: cell_indices.len(),
            proofs_len: proofs.len(),
        });
    }

    if cells.is_empty() {
        return Err(VerifierError::EmptyBatch);
    }

    debug_assert!(commitment_indices
        .iter()
        .all(|index| (*index as usize) < deduplicated_commitments.len()));

    for cell_index in cell_indices {
        if *cell_index >= CELLS_PER_EXT_BLOB as u64 {
            return Err(VerifierError::CellIndexOutOfRange {
                cell_index: *cell_index,
                max_number_of_cells: CELLS_PER_EXT_BLOB as u64,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplication_preserves_first_seen_order() {
        let duplicated: Vec<i32> = vec![0, 1, 0, 2, 3, 4, 0];

        let (deduplicated, indices) = deduplicate_with_indices(duplicated);

        assert_eq!(deduplicated, vec![0, 1, 2, 3, 4]);
        assert_eq!(indices, vec![0, 1, 0, 2, 3, 4, 0]);
    }

    #[test]
    fn empty_cell_batch_is_rejected() {
        let result = validate_batch(&[], &[], &[], &[], &[]);
        assert!(matches!(result, Err(VerifierError::EmptyBatch)));
    }

    #[test]
    fn out_of_range_cell_index_is_rejected() {
        let commitment = [0u8; 48];
        let cell = [0u8; crate::constants::BYTES_PER_CELL];
        let proof = [0u8; 48];

        let result = validate_batch(
            &[&commitment],
            &[0],
            &[CELLS_PER_EXT_BLOB as u64],
            &[&cell],
            &[&proof],
        );
        assert!(matches!(
            result,
            Err(VerifierError::CellIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn mismatched_batch_lengths_are_rejected() {
        let commitment = [0u8; 48];
        let cell = [0u8; crate::constants::BYTES_PER_CELL];

        let result = validate_batch(&[&commitment], &[0], &[0, 1], &[&cell], &[]);
        assert!(matches!(
            result,
            Err(VerifierError::BatchVerificationInputsMustHaveSameLength { .. })
        ));
    }
}
