use super::Measurable;
use crate::{Error, Float, Result};

/// Dense n x n dissimilarity matrix, symmetric with a zero diagonal.
///
/// The buffer is owned by the matrix and released once when it is dropped.
#[derive(Clone, Debug)]
pub struct DissimilarityMatrix<T: Float> {
    data: Vec<T>,
    n_elements: usize,
}

impl<T: Float> DissimilarityMatrix<T> {
    /// Euclidean distances between the rows of a row-major `n * dim` coordinate buffer.
    pub fn from_vectors(values: &[T], dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "points need at least one coordinate",
            });
        }
        if values.len() % dim != 0 {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: values.len() % dim,
            });
        }

        let rows: Vec<&[T]> = values.chunks_exact(dim).collect();
        Ok(Self::from_points(&rows, |a, b| l2_norm(a, b)))
    }

    /// Build from any point type and dissimilarity function.
    ///
    /// `f` is evaluated once per unordered pair and mirrored; the diagonal is zero.
    pub fn from_points<P, F>(points: &[P], f: F) -> Self
    where
        F: Fn(&P, &P) -> T,
    {
        let n_elements = points.len();
        let mut data = vec![T::zero(); n_elements.pow(2)];

        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                let rho = f(a, b);
                data[i * n_elements + j] = rho;
                data[j * n_elements + i] = rho;
            }
        }

        Self { data, n_elements }
    }

    /// Adopt a precomputed row-major matrix after checking its invariants.
    pub fn from_flat(data: &[T], n_elements: usize) -> Result<Self> {
        if data.len() != n_elements * n_elements {
            return Err(Error::DimensionMismatch {
                expected: n_elements * n_elements,
                found: data.len(),
            });
        }

        for i in 0..n_elements {
            if data[i * n_elements + i] != T::zero() {
                return Err(invalid(i, i, "non-zero diagonal"));
            }
            for j in i + 1..n_elements {
                let upper = data[i * n_elements + j];
                if !upper.is_finite() {
                    return Err(invalid(i, j, "non-finite entry"));
                }
                if upper < T::zero() {
                    return Err(invalid(i, j, "negative entry"));
                }
                if upper != data[j * n_elements + i] {
                    return Err(invalid(i, j, "asymmetric entry"));
                }
            }
        }

        Ok(Self {
            data: data.to_owned(),
            n_elements,
        })
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.n_elements;
        (0..n).all(|i| {
            self.data[i * n + i] == T::zero()
                && (i + 1..n).all(|j| self.data[i * n + j] == self.data[j * n + i])
        })
    }
}

fn invalid(row: usize, col: usize, reason: &'static str) -> Error {
    Error::InvalidMatrix { row, col, reason }
}

fn l2_norm<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| {
            let diff = x - y;
            acc + diff * diff
        })
        .sqrt()
}

impl<T: Float> Measurable<T> for DissimilarityMatrix<T> {
    #[inline]
    fn measure(&self, i: usize, j: usize) -> T {
        self.data[i * self.n_elements + j]
    }

    fn num_elements(&self) -> usize {
        self.n_elements
    }
}
