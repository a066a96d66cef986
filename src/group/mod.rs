//! Worker groups and their collective operations.
//!
//! A group is a fixed set of workers that run the same sequence of rounds in
//! lock-step. The only collectives the engines need are a barrier and `agree`, a
//! reduce-to-one-then-broadcast over [`Proposal`]s whose ordering is total, so every
//! worker ends a round holding the same winner.

use std::cmp::Ordering;
use std::ops::Range;

use crate::{Float, Result};

mod local;
mod solo;

pub use self::local::{Group, LocalComm, WorkerPool};
pub use self::solo::SoloComm;

/// One worker's best candidate for the current round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proposal<T> {
    /// Improvement offered by the candidate; larger is better.
    pub gain: T,
    pub first: usize,
    pub second: usize,
}

impl<T: Float> Proposal<T> {
    pub fn new(gain: T, first: usize, second: usize) -> Self {
        Self {
            gain,
            first,
            second,
        }
    }

    /// Larger gain wins, equal gains fall back to the smaller `(first, second)`.
    pub fn beats(&self, other: &Self) -> bool {
        match self.gain.partial_cmp(&other.gain) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Less) => false,
            _ => (self.first, self.second) < (other.first, other.second),
        }
    }

    /// The better of two optional proposals.
    pub fn pick(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Collective operations of a worker group.
///
/// Every member must call the same collectives in the same order. A member that
/// leaves mid-round is fatal for the whole group.
pub trait Communicator<T: Float> {
    /// Ordinal of this worker in `[0, size)`.
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Block until every member has arrived.
    fn barrier(&self) -> Result<()>;

    /// Combine the local proposals of all members and return the global best to each.
    fn agree(&self, local: Option<Proposal<T>>) -> Result<Option<Proposal<T>>>;
}

/// Contiguous slice of `0..len` owned by `rank` in a group of `size`.
///
/// The first `len % size` ranks own one extra item; ranks past the end get an empty range.
pub fn chunk(len: usize, rank: usize, size: usize) -> Range<usize> {
    debug_assert!(size > 0 && rank < size);
    let base = len / size;
    let extra = len % size;
    let start = rank * base + rank.min(extra);
    let end = start + base + usize::from(rank < extra);
    start..end
}
