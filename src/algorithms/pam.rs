use tracing::info;

use super::*;
use crate::group::{LocalComm, SoloComm, WorkerPool};

pub struct PAM;

impl<T: Float> Solver<T> for PAM {
    fn fit(d: &impl Measurable<T>, k: usize) -> Result<Vec<usize>> {
        fit(d, k, 0, &SoloComm).map(|outcome| outcome.medoids)
    }
}

/// BUILD followed by SWAP inside the caller's group.
pub fn fit<T, C>(
    d: &impl Measurable<T>,
    k: usize,
    max_iter: usize,
    comm: &C,
) -> Result<SwapOutcome<T>>
where
    T: Float,
    C: Communicator<T>,
{
    let state = run_build(d, k, comm)?;
    run_swap(d, state, max_iter, comm)
}

/// Run PAM on a fresh group of `workers` in-process workers sharing `d`.
pub fn fit_parallel<T, D>(d: &D, k: usize, workers: usize) -> Result<Vec<usize>>
where
    T: Float,
    D: Measurable<T> + Sync,
{
    let group = WorkerPool::new(workers).split(workers)?;
    let mut outcomes = group.run(|comm: &LocalComm<T>| fit(d, k, 0, comm))?;

    let outcome = outcomes.remove(0);
    if let Some(rank) = outcomes
        .iter()
        .position(|other| other.medoids != outcome.medoids)
    {
        return Err(Error::ProtocolViolation {
            rank: rank + 1,
            expected: "the medoid set agreed by the group",
        });
    }

    info!(
        workers,
        k,
        iterations = outcome.iterations,
        cost = ?outcome.cost,
        "parallel fit finished"
    );
    Ok(outcome.medoids)
}
