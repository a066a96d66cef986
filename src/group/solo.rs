use super::{Communicator, Proposal};
use crate::{Float, Result};

/// Group of one. Every collective is local.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoloComm;

impl<T: Float> Communicator<T> for SoloComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<()> {
        Ok(())
    }

    fn agree(&self, local: Option<Proposal<T>>) -> Result<Option<Proposal<T>>> {
        Ok(local)
    }
}
