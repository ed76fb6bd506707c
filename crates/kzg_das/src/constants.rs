// "Field element" throughout this crate means an element of the scalar
// field of BLS12-381.

/// Bytes in the serialized form of a field element.
pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

/// Field elements in a cell. Fixed by the protocol; it sets the number of
/// proofs per blob and the cost of producing and verifying them.
pub const FIELD_ELEMENTS_PER_CELL: usize = 64;

/// Field elements in a blob.
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

/// Bytes in a blob.
pub const BYTES_PER_BLOB: usize = FIELD_ELEMENTS_PER_BLOB * BYTES_PER_FIELD_ELEMENT;

/// Bytes in a cell.
pub const BYTES_PER_CELL: usize = FIELD_ELEMENTS_PER_CELL * BYTES_PER_FIELD_ELEMENT;

/// Factor by which a blob is extended for sampling; the Reed-Solomon rate
/// is its reciprocal.
pub const EXPANSION_FACTOR: usize = 2;

/// Field elements in an extended blob.
pub const FIELD_ELEMENTS_PER_EXT_BLOB: usize = EXPANSION_FACTOR * FIELD_ELEMENTS_PER_BLOB;

/// Cells in an extended blob.
pub const CELLS_PER_EXT_BLOB: usize = FIELD_ELEMENTS_PER_EXT_BLOB / FIELD_ELEMENTS_PER_CELL;

/// Bytes in a compressed G1 point.
pub(crate) const BYTES_PER_G1_POINT: usize = 48;

/// Bytes in a compressed G2 point.
pub(crate) const BYTES_PER_G2_POINT: usize = 96;

/// Bytes in a commitment or proof; both are G1 points.
pub const BYTES_PER_COMMITMENT: usize = BYTES_PER_G1_POINT;

/// G1 points in the trusted setup; one per blob field element.
pub const NUM_G1_POINTS: usize = FIELD_ELEMENTS_PER_BLOB;

/// G2 points in the trusted setup; the verifier needs `[tau^n] G2` for a
/// coset of size `n`, hence one more than the cell width.
pub const NUM_G2_POINTS: usize = FIELD_ELEMENTS_PER_CELL + 1;
