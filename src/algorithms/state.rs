use super::*;

/// Medoid set plus, for every point, its distance to the nearest and second-nearest medoid.
///
/// Every worker holds its own copy; copies stay identical because each mutation
/// follows an agreement step.
#[derive(Clone, Debug)]
pub struct MedoidState<T: Float> {
    medoids: Vec<usize>,
    is_medoid: Vec<bool>,
    best_distances: Vec<T>,
    second_distances: Vec<T>,
    /// Position in `medoids` of each point's nearest medoid.
    assignments: Vec<usize>,
}

impl<T: Float> MedoidState<T> {
    pub fn empty(num_elements: usize) -> Self {
        Self {
            medoids: Vec::new(),
            is_medoid: vec![false; num_elements],
            best_distances: vec![T::infinity(); num_elements],
            second_distances: vec![T::infinity(); num_elements],
            assignments: vec![0; num_elements],
        }
    }

    /// Start from an arbitrary set of distinct medoids, e.g. the result of an earlier run.
    pub fn from_medoids(d: &impl Measurable<T>, medoids: &[usize]) -> Result<Self> {
        let num_elements = d.num_elements();
        let mut state = Self::empty(num_elements);

        for &m in medoids {
            if m >= num_elements || state.is_medoid[m] {
                return Err(Error::InvalidParameter {
                    name: "medoids",
                    message: "medoids must be distinct indices into the matrix",
                });
            }
            state.insert(d, m);
        }

        Ok(state)
    }

    pub fn medoids(&self) -> &[usize] {
        &self.medoids
    }

    pub fn len(&self) -> usize {
        self.medoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medoids.is_empty()
    }

    pub fn is_medoid(&self, i: usize) -> bool {
        self.is_medoid[i]
    }

    pub fn best_distances(&self) -> &[T] {
        &self.best_distances
    }

    pub fn second_distances(&self) -> &[T] {
        &self.second_distances
    }

    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Point indices that are not medoids, ascending.
    pub fn non_medoids(&self) -> Vec<usize> {
        self.is_medoid
            .iter()
            .enumerate()
            .filter(|(_i, &m)| !m)
            .map(|(i, _m)| i)
            .collect()
    }

    /// Sum over all points of the distance to the nearest medoid.
    pub fn total_cost(&self) -> T {
        self.best_distances
            .iter()
            .fold(T::zero(), |acc, &cost| acc + cost)
    }

    /// Append `c` and fold it into the nearest / second-nearest caches.
    pub(crate) fn insert(&mut self, d: &impl Measurable<T>, c: usize) {
        let position = self.medoids.len();
        self.medoids.push(c);
        self.is_medoid[c] = true;

        for i in 0..self.best_distances.len() {
            let cost = d.measure(i, c);

            if cost < self.best_distances[i] {
                self.second_distances[i] = self.best_distances[i];
                self.best_distances[i] = cost;
                self.assignments[i] = position;
            } else if cost < self.second_distances[i] {
                self.second_distances[i] = cost;
            }
        }
    }

    /// Put `c` in place of the medoid at `position` and rebuild the caches.
    pub(crate) fn replace(&mut self, d: &impl Measurable<T>, position: usize, c: usize) {
        let old = std::mem::replace(&mut self.medoids[position], c);
        self.is_medoid[old] = false;
        self.is_medoid[c] = true;
        self.refresh(d);
    }

    /// Recompute nearest and second-nearest distances for every point.
    pub(crate) fn refresh(&mut self, d: &impl Measurable<T>) {
        for i in 0..self.best_distances.len() {
            let mut best = T::infinity();
            let mut second = T::infinity();

            for (k, &medoid) in self.medoids.iter().enumerate() {
                let cost = d.measure(i, medoid);

                if cost < best {
                    self.assignments[i] = k;
                    second = best;
                    best = cost;
                } else if cost < second {
                    second = cost;
                }
            }

            self.best_distances[i] = best;
            self.second_distances[i] = second;
        }
    }
}
