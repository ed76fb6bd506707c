use bls12_381::{G1Point, Scalar};

use crate::{
    constants::{
        BYTES_PER_BLOB, BYTES_PER_FIELD_ELEMENT, BYTES_PER_G1_POINT, CELLS_PER_EXT_BLOB,
        FIELD_ELEMENTS_PER_CELL,
    },
    errors::SerializationError,
    Cell, KzgProof,
};

/// Splits a byte string into 32-byte chunks and requires every chunk to be
/// a canonical big-endian field element.
fn deserialize_bytes_to_scalars(bytes: &[u8]) -> Result<Vec<Scalar>, SerializationError> {
    if bytes.len() % BYTES_PER_FIELD_ELEMENT != 0 {
        return Err(SerializationError::ScalarHasInvalidLength {
            length: bytes.len(),
        });
    }

    bytes
        .chunks_exact(BYTES_PER_FIELD_ELEMENT)
        .map(deserialize_bytes_to_scalar)
        .collect()
}

pub(crate) fn deserialize_blob_to_scalars(
    blob_bytes: &[u8],
) -> Result<Vec<Scalar>, SerializationError> {
    if blob_bytes.len() != BYTES_PER_BLOB {
        return Err(SerializationError::BlobHasInvalidLength {
            length: blob_bytes.len(),
        });
    }
    deserialize_bytes_to_scalars(blob_bytes)
}

pub(crate) fn deserialize_bytes_to_scalar(
    scalar_bytes: &[u8],
) -> Result<Scalar, SerializationError> {
    let bytes32: &[u8; BYTES_PER_FIELD_ELEMENT] = scalar_bytes
        .try_into()
        .map_err(|_| SerializationError::ScalarHasInvalidLength {
            length: scalar_bytes.len(),
        })?;

    // Rejects values >= r; the encoding must be canonical.
    let option_scalar: Option<Scalar> = Scalar::from_bytes_be(bytes32).into();
    option_scalar.ok_or_else(|| SerializationError::CouldNotDeserializeScalar {
        bytes: scalar_bytes.to_vec(),
    })
}

/// Decompresses a G1 point; the decompression includes the on-curve and
/// subgroup checks.
pub(crate) fn deserialize_compressed_g1(
    point_bytes: &[u8; BYTES_PER_G1_POINT],
) -> Result<G1Point, SerializationError> {
    let opt_point: Option<G1Point> = Option::from(G1Point::from_compressed(point_bytes));
    opt_point.ok_or_else(|| SerializationError::CouldNotDeserializeG1Point {
        bytes: point_bytes.to_vec(),
    })
}

pub(crate) fn deserialize_compressed_g1_points(
    points: Vec<&[u8; BYTES_PER_G1_POINT]>,
) -> Result<Vec<G1Point>, SerializationError> {
    points.into_iter().map(deserialize_compressed_g1).collect()
}

pub(crate) fn serialize_g1_compressed(point: &G1Point) -> [u8; BYTES_PER_G1_POINT] {
    point.to_compressed()
}

pub(crate) fn deserialize_cells(
    cells: Vec<crate::CellRef>,
) -> Result<Vec<Vec<Scalar>>, SerializationError> {
    cells
        .into_iter()
        .map(|cell| deserialize_bytes_to_scalars(cell))
        .collect()
}

fn serialize_scalars_to_cell(scalars: &[Scalar]) -> Cell {
    assert_eq!(
        scalars.len(),
        FIELD_ELEMENTS_PER_CELL,
        "a cell holds exactly {FIELD_ELEMENTS_PER_CELL} field elements"
    );

    let bytes: Vec<u8> = scalars.iter().flat_map(Scalar::to_bytes_be).collect();
    bytes
        .into_boxed_slice()
        .try_into()
        .expect("infallible: the byte count was checked above")
}

/// Serializes the coset evaluation sets into wire-format cells.
pub(crate) fn serialize_cells(
    coset_evaluations: Vec<Vec<Scalar>>,
) -> [Cell; CELLS_PER_EXT_BLOB] {
    let cells: Vec<Cell> = coset_evaluations
        .iter()
        .map(|evals| serialize_scalars_to_cell(evals))
        .collect();

    cells
        .try_into()
        .unwrap_or_else(|_| panic!("expected {CELLS_PER_EXT_BLOB} cells"))
}

/// Serializes the coset evaluations and proofs of one extended blob.
pub(crate) fn serialize_cells_and_proofs(
    coset_evaluations: Vec<Vec<Scalar>>,
    proofs: &[G1Point],
) -> ([Cell; CELLS_PER_EXT_BLOB], [KzgProof; CELLS_PER_EXT_BLOB]) {
    let cells = serialize_cells(coset_evaluations);

    let proofs: Vec<KzgProof> = proofs.iter().map(serialize_g1_compressed).collect();
    let proofs = proofs
        .try_into()
        .unwrap_or_else(|_| panic!("expected {CELLS_PER_EXT_BLOB} proofs"));

    (cells, proofs)
}
