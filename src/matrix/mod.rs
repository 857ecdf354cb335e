//! Matrix representations and the entry view the engines consume

pub mod bitmap;
pub mod csr;
pub mod full;

pub use bitmap::BitmapMatrix;
pub use csr::SparseMatrixCSR;
pub use full::FullMatrix;

use crate::types::Scalar;

/// Physical representation of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Every slot is an entry
    Full,
    /// Compressed rows; entries may be zombies
    Sparse,
    /// Dense slots with a presence flag per slot
    Bitmap,
}

/// Encodes index `i` as a zombie: `-i - 2`, always negative and self-inverse
#[inline]
pub fn flip(i: i64) -> i64 {
    -i - 2
}

#[inline]
pub fn is_zombie(i: i64) -> bool {
    i < 0
}

/// The unflipped value of a possibly-flipped index
#[inline]
pub fn unflip(i: i64) -> i64 {
    if is_zombie(i) {
        flip(i)
    } else {
        i
    }
}

/// Which stored positions hold live entries
#[derive(Debug, Clone, Copy)]
pub enum Liveness<'a> {
    /// Every stored position is live
    All,
    /// Position `p` is live unless `indices[p]` is flipped
    Zombies(&'a [i64]),
    /// Position `p` is live iff `present[p]`
    Bitmap(&'a [bool]),
}

impl Liveness<'_> {
    #[inline]
    pub fn is_live(&self, p: usize) -> bool {
        match self {
            Liveness::All => true,
            Liveness::Zombies(indices) => !is_zombie(indices[p]),
            Liveness::Bitmap(present) => present[p],
        }
    }
}

/// Borrowed view of a matrix's stored entries
///
/// This is all the reduction engine knows about a matrix: the value array,
/// how to tell live positions from dead ones, and how many zombies there are.
#[derive(Debug, Clone, Copy)]
pub struct Entries<'a, T> {
    pub values: &'a [T],
    pub liveness: Liveness<'a>,
    pub n_zombies: usize,
}

impl<'a, T: Scalar> Entries<'a, T> {
    /// Entries of a full array of values
    pub fn dense(values: &'a [T]) -> Self {
        Self {
            values,
            liveness: Liveness::All,
            n_zombies: 0,
        }
    }

    /// Number of stored positions
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when some stored positions may be dead and must be tested one by one
    pub fn needs_presence_check(&self) -> bool {
        match self.liveness {
            Liveness::All => false,
            Liveness::Zombies(_) => self.n_zombies > 0,
            Liveness::Bitmap(_) => true,
        }
    }

    /// Iterator over the live values in storage order
    pub fn live_values(&self) -> impl Iterator<Item = T> + '_ {
        let liveness = self.liveness;
        self.values
            .iter()
            .enumerate()
            .filter(move |&(p, _)| liveness.is_live(p))
            .map(|(_, &v)| v)
    }
}

/// A matrix in one of the supported representations
#[derive(Debug, Clone)]
pub enum Matrix<T> {
    Full(FullMatrix<T>),
    Sparse(SparseMatrixCSR<T>),
    Bitmap(BitmapMatrix<T>),
}

impl<T: Scalar> Matrix<T> {
    pub fn format(&self) -> Format {
        match self {
            Matrix::Full(_) => Format::Full,
            Matrix::Sparse(_) => Format::Sparse,
            Matrix::Bitmap(_) => Format::Bitmap,
        }
    }

    pub fn n_rows(&self) -> usize {
        match self {
            Matrix::Full(m) => m.n_rows,
            Matrix::Sparse(m) => m.n_rows,
            Matrix::Bitmap(m) => m.n_rows,
        }
    }

    pub fn n_cols(&self) -> usize {
        match self {
            Matrix::Full(m) => m.n_cols,
            Matrix::Sparse(m) => m.n_cols,
            Matrix::Bitmap(m) => m.n_cols,
        }
    }

    /// Number of stored positions (zombies and absent bitmap slots included)
    pub fn n_entries(&self) -> usize {
        self.entries().len()
    }

    pub fn n_zombies(&self) -> usize {
        match self {
            Matrix::Sparse(m) => m.n_zombies(),
            _ => 0,
        }
    }

    /// Number of live entries
    pub fn n_live(&self) -> usize {
        match self {
            Matrix::Full(m) => m.values.len(),
            Matrix::Sparse(m) => m.n_live(),
            Matrix::Bitmap(m) => m.n_present(),
        }
    }

    pub fn entries(&self) -> Entries<'_, T> {
        match self {
            Matrix::Full(m) => Entries::dense(&m.values),
            Matrix::Sparse(m) => Entries {
                values: &m.values,
                liveness: Liveness::Zombies(&m.col_idx),
                n_zombies: m.n_zombies(),
            },
            Matrix::Bitmap(m) => Entries {
                values: &m.values,
                liveness: Liveness::Bitmap(&m.present),
                n_zombies: 0,
            },
        }
    }
}

impl<T> From<FullMatrix<T>> for Matrix<T> {
    fn from(m: FullMatrix<T>) -> Self {
        Matrix::Full(m)
    }
}

impl<T> From<SparseMatrixCSR<T>> for Matrix<T> {
    fn from(m: SparseMatrixCSR<T>) -> Self {
        Matrix::Sparse(m)
    }
}

impl<T> From<BitmapMatrix<T>> for Matrix<T> {
    fn from(m: BitmapMatrix<T>) -> Self {
        Matrix::Bitmap(m)
    }
}
