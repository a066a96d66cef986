use crate::Float;

pub mod matrix;

pub trait Measurable<T: Float> {
    /// Measure the dissimilarity between two elements in the collection
    ///
    /// The engines rely on `measure(i, j) == measure(j, i)` and `measure(i, i) == 0`.
    fn measure(&self, i: usize, j: usize) -> T;

    /// Return the number of elements in the collection
    fn num_elements(&self) -> usize;
}
