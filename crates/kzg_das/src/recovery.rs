use std::collections::HashSet;

use erasure_codes::BlockErasureIndices;
use kzg_multi_open::recover_evaluations_in_domain_order;
use polynomial::poly_coeff::PolyCoeff;

use crate::{
    constants::{CELLS_PER_EXT_BLOB, EXPANSION_FACTOR, FIELD_ELEMENTS_PER_EXT_BLOB},
    errors::RecoveryError,
    serialization::{deserialize_cells, serialize_cells_and_proofs},
    settings::KzgSettings,
    Cell, CellIndex, CellRef, Error, KzgProof,
};

impl KzgSettings {
    /// Recovers every cell of the extended blob from any subset of at
    /// least half of them, and computes fresh proofs for all of them.
    ///
    /// The supplied cells are the survivors; everything else is treated
    /// as an erasure and reconstructed by Reed-Solomon decoding. The
    /// recovered cells are byte-identical to the originals, and the
    /// proofs are recomputed from the recovered polynomial with FK20.
    pub fn recover_cells_and_kzg_proofs(
        &self,
        cell_indices: Vec<CellIndex>,
        cells: Vec<CellRef>,
    ) -> Result<([Cell; CELLS_PER_EXT_BLOB], [KzgProof; CELLS_PER_EXT_BLOB]), Error> {
        let poly_coeff = self.recover_polynomial_coeff(cell_indices, cells)?;

        let (proofs, coset_evaluations) =
            self.fk20_prover.compute_multi_opening_proofs(poly_coeff);

        Ok(serialize_cells_and_proofs(coset_evaluations, &proofs))
    }

    /// Reconstructs the blob polynomial (monomial form) behind a partial
    /// set of cells.
    fn recover_polynomial_coeff(
        &self,
        cell_indices: Vec<CellIndex>,
        cells: Vec<CellRef>,
    ) -> Result<PolyCoeff, Error> {
        validate_recovery_inputs(&cell_indices, &cells)?;

        let coset_evaluations = deserialize_cells(cells)?;
        let cell_indices: Vec<_> = cell_indices
            .into_iter()
            .map(|index| index as usize)
            .collect();

        // Lay the known evaluations out in domain order, zero-filling the
        // erased positions; this is the punctured Reed-Solomon codeword.
        let (cell_indices_domain_order, codeword_with_erasures) =
            recover_evaluations_in_domain_order(
                FIELD_ELEMENTS_PER_EXT_BLOB,
                cell_indices,
                coset_evaluations,
            )
            // Validation guarantees non-empty input, equal-sized cells and
            // in-range indices.
            .expect("infallible: recovery inputs were validated");

        let missing_cell_indices = find_missing_cell_indices(&cell_indices_domain_order);

        let recovered_polynomial_coeff = self.rs.recover_polynomial_coefficient(
            codeword_with_erasures,
            BlockErasureIndices(missing_cell_indices),
        )?;

        Ok(recovered_polynomial_coeff)
    }
}

#[inline]
fn find_missing_cell_indices(present_cell_indices: &[usize]) -> Vec<usize> {
    let present: HashSet<_> = present_cell_indices.iter().copied().collect();

    (0..CELLS_PER_EXT_BLOB)
        .filter(|index| !present.contains(index))
        .collect()
}

/// Checks the recovery inputs before any expensive work:
/// one index per cell, indices in range and distinct, and at least the
/// reconstruction threshold of cells (at most a full extended blob).
pub(crate) fn validate_recovery_inputs(
    cell_indices: &[CellIndex],
    cells: &[CellRef],
) -> Result<(), RecoveryError> {
    if cell_indices.len() != cells.len() {
        return Err(RecoveryError::NumCellIndicesNotEqualToNumCells {
            num_cell_indices: cell_indices.len(),
            num_cells: cells.len(),
        });
    }

    for &cell_index in cell_indices {
        if cell_index >= CELLS_PER_EXT_BLOB as u64 {
            return Err(RecoveryError::CellIndexOutOfRange {
                cell_index,
                max_number_of_cells: CELLS_PER_EXT_BLOB as u64,
            });
        }
    }

    let unique_indices: HashSet<_> = cell_indices.iter().collect();
    if unique_indices.len() != cell_indices.len() {
        return Err(RecoveryError::CellIndicesNotUnique);
    }

    if cell_indices.len() < CELLS_PER_EXT_BLOB / EXPANSION_FACTOR {
        return Err(RecoveryError::NotEnoughCellsToReconstruct {
            num_cells_received: cell_indices.len(),
            min_cells_needed: CELLS_PER_EXT_BLOB / EXPANSION_FACTOR,
        });
    }

    // Unreachable given distinct in-range indices, but kept as an
    // explicit bound on the input size.
    if cell_indices.len() > CELLS_PER_EXT_BLOB {
        return Err(RecoveryError::TooManyCellsReceived {
            num_cells_received: cell_indices.len(),
            max_cells_needed: CELLS_PER_EXT_BLOB,
        });
    }

    Ok(())
}
