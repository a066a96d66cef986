use tracing::{debug, trace};

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    Empty,
    Selecting,
    Built,
}

/// Greedy BUILD: one synchronized round per selected medoid.
pub struct Build<T: Float> {
    state: MedoidState<T>,
    num_medoids: usize,
}

impl<T: Float> Build<T> {
    pub fn new(d: &impl Measurable<T>, num_medoids: usize) -> Result<Self> {
        let num_elements = d.num_elements();
        if num_medoids == 0 || num_medoids > num_elements {
            return Err(Error::InvalidClusterCount {
                requested: num_medoids,
                n_items: num_elements,
            });
        }

        Ok(Self {
            state: MedoidState::empty(num_elements),
            num_medoids,
        })
    }

    pub fn phase(&self) -> BuildPhase {
        match self.state.len() {
            0 => BuildPhase::Empty,
            k if k < self.num_medoids => BuildPhase::Selecting,
            _ => BuildPhase::Built,
        }
    }

    pub fn state(&self) -> &MedoidState<T> {
        &self.state
    }

    pub fn into_state(self) -> MedoidState<T> {
        self.state
    }

    /// Run one selection round. Returns the medoid every worker agreed on, or
    /// `None` once the set is complete.
    pub fn step<C: Communicator<T>>(
        &mut self,
        d: &impl Measurable<T>,
        comm: &C,
    ) -> Result<Option<usize>> {
        if self.phase() == BuildPhase::Built {
            return Ok(None);
        }

        let candidates = self.state.non_medoids();
        let range = chunk(candidates.len(), comm.rank(), comm.size());

        let local = candidates[range]
            .iter()
            .map(|&c| Proposal::new(self.gain(d, c), c, c))
            .fold(None, |best, p| Proposal::pick(best, Some(p)));

        let chosen = comm.agree(local)?.ok_or(Error::InvalidClusterCount {
            requested: self.num_medoids,
            n_items: d.num_elements(),
        })?;

        trace!(
            rank = comm.rank(),
            round = self.state.len(),
            medoid = chosen.first,
            gain = ?chosen.gain,
            "build selection"
        );

        self.state.insert(d, chosen.first);
        Ok(Some(chosen.first))
    }

    /// Reduction in total cost if `c` became a medoid.
    ///
    /// With no medoids yet every point is infinitely far away, so the candidate with
    /// the smallest total distance to all points wins; its gain is that total, negated.
    fn gain(&self, d: &impl Measurable<T>, c: usize) -> T {
        let num_elements = d.num_elements();

        if self.state.is_empty() {
            let total = (0..num_elements).fold(T::zero(), |acc, i| acc + d.measure(i, c));
            return -total;
        }

        let best_distances = self.state.best_distances();
        (0..num_elements).fold(T::zero(), |acc, i| {
            let cost = d.measure(i, c);
            let current_best = best_distances[i];
            if cost < current_best {
                acc + (current_best - cost)
            } else {
                acc
            }
        })
    }
}

/// Select `num_medoids` initial medoids. Blocks until every worker in the group is done.
pub fn run_build<T, C>(
    d: &impl Measurable<T>,
    num_medoids: usize,
    comm: &C,
) -> Result<MedoidState<T>>
where
    T: Float,
    C: Communicator<T>,
{
    let mut build = Build::new(d, num_medoids)?;

    superluminal_perf::begin_event("BUILD");
    comm.barrier()?;
    while build.step(d, comm)?.is_some() {}
    comm.barrier()?;
    superluminal_perf::end_event();

    debug!(
        rank = comm.rank(),
        medoids = ?build.state().medoids(),
        cost = ?build.state().total_cost(),
        "build finished"
    );

    Ok(build.into_state())
}
