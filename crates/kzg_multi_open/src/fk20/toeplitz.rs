use bls12_381::Scalar;

/// A Toeplitz matrix: every descending diagonal is constant, so the whole
/// matrix is determined by its first row and first column.
///
/// ```text
/// row = [1, 2, 3, 4]
/// col = [1, 5, 6, 7]
///
/// [1 2 3 4]
/// [5 1 2 3]
/// [6 5 1 2]
/// [7 6 5 1]
/// ```
#[derive(Debug, Clone)]
pub struct ToeplitzMatrix {
    /// First row; the elements on and above the main diagonal.
    pub(crate) row: Vec<Scalar>,
    /// First column; the elements on and below the main diagonal.
    pub(crate) col: Vec<Scalar>,
}

impl ToeplitzMatrix {
    /// Panics if either vector is empty or the shared top-left entry
    /// disagrees between them.
    pub fn new(row: Vec<Scalar>, col: Vec<Scalar>) -> Self {
        assert!(
            !row.is_empty() && !col.is_empty(),
            "row and col must be non-empty"
        );
        assert_eq!(
            row[0], col[0],
            "a Toeplitz matrix requires row[0] == col[0]"
        );
        Self { row, col }
    }
}

/// A circulant matrix: a Toeplitz matrix where each row is the previous
/// row rotated right by one. Fully determined by its first row, and
/// diagonalized by the Fourier transform, which is what makes the FK20
/// matrix-vector products cheap.
#[derive(Debug, Clone)]
pub(crate) struct CirculantMatrix {
    pub(crate) row: Vec<Scalar>,
}

impl CirculantMatrix {
    /// Embeds a Toeplitz matrix into a circulant matrix of twice the
    /// dimension. The first half of the circulant matrix-vector product
    /// equals the Toeplitz matrix-vector product.
    pub(crate) fn from_toeplitz(tm: ToeplitzMatrix) -> Self {
        let mut extension_col = tm.row;
        extension_col.rotate_left(1);
        extension_col.reverse();

        Self {
            row: [tm.col, extension_col].concat(),
        }
    }
}
