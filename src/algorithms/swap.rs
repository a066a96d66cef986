use tracing::{debug, trace};

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapPhase {
    Ready,
    Improving,
    /// No exchange lowers the total cost.
    Converged,
    /// The iteration cap was hit first.
    CapReached,
}

impl SwapPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SwapPhase::Converged | SwapPhase::CapReached)
    }
}

#[derive(Clone, Debug)]
pub struct SwapOutcome<T> {
    pub medoids: Vec<usize>,
    pub cost: T,
    /// Number of accepted swaps.
    pub iterations: usize,
    pub phase: SwapPhase,
}

/// Hill-climbing SWAP: each round accepts the single best strictly improving
/// (medoid, non-medoid) exchange.
pub struct Swap<T: Float> {
    state: MedoidState<T>,
    cost: T,
    phase: SwapPhase,
    iterations: usize,
    max_iter: usize,
}

impl<T: Float> Swap<T> {
    /// `max_iter == 0` means no cap.
    pub fn new(d: &impl Measurable<T>, mut state: MedoidState<T>, max_iter: usize) -> Self {
        state.refresh(d);
        let cost = state.total_cost();

        Self {
            state,
            cost,
            phase: SwapPhase::Ready,
            iterations: 0,
            max_iter,
        }
    }

    pub fn phase(&self) -> SwapPhase {
        self.phase
    }

    pub fn state(&self) -> &MedoidState<T> {
        &self.state
    }

    pub fn cost(&self) -> T {
        self.cost
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run one improvement round and return the resulting phase.
    pub fn step<C: Communicator<T>>(
        &mut self,
        d: &impl Measurable<T>,
        comm: &C,
    ) -> Result<SwapPhase> {
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }
        if self.max_iter > 0 && self.iterations >= self.max_iter {
            self.phase = SwapPhase::CapReached;
            return Ok(self.phase);
        }
        self.phase = SwapPhase::Improving;

        let medoids = self.state.medoids();
        let candidates = self.state.non_medoids();
        let num_candidates = candidates.len();
        let range = chunk(medoids.len() * num_candidates, comm.rank(), comm.size());

        let local = range
            .map(|t| {
                let position = t / num_candidates;
                let c = candidates[t % num_candidates];
                let gain = self.cost - self.swapped_cost(d, position, c);
                Proposal::new(gain, medoids[position], c)
            })
            .fold(None, |best, p| Proposal::pick(best, Some(p)));

        let best = match comm.agree(local)? {
            Some(best) if best.gain > T::zero() => best,
            _ => {
                self.phase = SwapPhase::Converged;
                return Ok(self.phase);
            }
        };

        let position = medoids
            .iter()
            .position(|&m| m == best.first)
            .ok_or(Error::ProtocolViolation {
                rank: comm.rank(),
                expected: "a swap out of the current medoid set",
            })?;

        self.state.replace(d, position, best.second);
        self.cost = self.state.total_cost();
        self.iterations += 1;

        trace!(
            rank = comm.rank(),
            iteration = self.iterations,
            removed = best.first,
            added = best.second,
            cost = ?self.cost,
            "swap accepted"
        );

        Ok(self.phase)
    }

    /// Total cost if the medoid at `position` were replaced by `c`.
    fn swapped_cost(&self, d: &impl Measurable<T>, position: usize, c: usize) -> T {
        let best_distances = self.state.best_distances();
        let second_distances = self.state.second_distances();
        let assignments = self.state.assignments();

        (0..d.num_elements()).fold(T::zero(), |total, i| {
            let cost = d.measure(i, c);
            let without = if assignments[i] == position {
                second_distances[i]
            } else {
                best_distances[i]
            };
            total + cost.min(without)
        })
    }

    pub fn into_outcome(self) -> SwapOutcome<T> {
        SwapOutcome {
            medoids: self.state.medoids().to_vec(),
            cost: self.cost,
            iterations: self.iterations,
            phase: self.phase,
        }
    }
}

/// Improve `state` until no exchange helps or `max_iter` swaps were made (`0` = no cap).
/// Blocks until every worker in the group is done.
pub fn run_swap<T, C>(
    d: &impl Measurable<T>,
    state: MedoidState<T>,
    max_iter: usize,
    comm: &C,
) -> Result<SwapOutcome<T>>
where
    T: Float,
    C: Communicator<T>,
{
    let mut swap = Swap::new(d, state, max_iter);

    superluminal_perf::begin_event("SWAP");
    comm.barrier()?;
    while !swap.step(d, comm)?.is_terminal() {}
    comm.barrier()?;
    superluminal_perf::end_event();

    debug!(
        rank = comm.rank(),
        iterations = swap.iterations(),
        phase = ?swap.phase(),
        cost = ?swap.cost(),
        "swap finished"
    );

    Ok(swap.into_outcome())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::SoloComm;
    use crate::measure::matrix::DissimilarityMatrix;

    fn line() -> DissimilarityMatrix<f64> {
        DissimilarityMatrix::from_vectors(&[0.0, 1.0, 2.0, 10.0], 1).unwrap()
    }

    #[test]
    fn built_medoids_are_already_optimal() {
        let d = line();
        let state = MedoidState::from_medoids(&d, &[1, 3]).unwrap();
        let outcome = run_swap(&d, state, 0, &SoloComm).unwrap();

        assert_eq!(outcome.medoids, vec![1, 3]);
        assert_eq!(outcome.cost, 2.0);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.phase, SwapPhase::Converged);
    }

    #[test]
    fn bad_start_is_repaired() {
        let d = line();
        let state = MedoidState::from_medoids(&d, &[0, 1]).unwrap();
        let mut swap = Swap::new(&d, state, 0);
        assert_eq!(swap.phase(), SwapPhase::Ready);
        assert_eq!(swap.cost(), 10.0);

        assert_eq!(swap.step(&d, &SoloComm).unwrap(), SwapPhase::Improving);
        assert_eq!(swap.state().medoids(), &[3, 1]);
        assert_eq!(swap.cost(), 2.0);

        assert_eq!(swap.step(&d, &SoloComm).unwrap(), SwapPhase::Converged);
        assert_eq!(swap.iterations(), 1);
    }

    #[test]
    fn cap_stops_improvement() {
        let d = line();
        let state = MedoidState::from_medoids(&d, &[0, 1]).unwrap();
        let outcome = run_swap(&d, state, 1, &SoloComm).unwrap();

        assert_eq!(outcome.phase, SwapPhase::CapReached);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.cost, 2.0);
    }

    #[test]
    fn full_medoid_set_has_nothing_to_swap() {
        let d = line();
        let state = MedoidState::from_medoids(&d, &[0, 1, 2, 3]).unwrap();
        let outcome = run_swap(&d, state, 0, &SoloComm).unwrap();

        assert_eq!(outcome.phase, SwapPhase::Converged);
        assert_eq!(outcome.cost, 0.0);
    }
}
