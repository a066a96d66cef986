mod build;
mod pam;
mod state;
mod swap;

pub use self::build::*;
pub use self::pam::*;
pub use self::state::*;
pub use self::swap::*;

use crate::{
    group::{chunk, Communicator, Proposal},
    measure::Measurable,
    Error, Float, Result,
};

pub trait Solver<T: Float> {
    fn fit(d: &impl Measurable<T>, k: usize) -> Result<Vec<usize>>;
}
