//! Distributed PAM (Partitioning Around Medoids).
//!
//! The BUILD and SWAP phases run as synchronous rounds inside a worker group: every
//! worker scans its slice of the candidates, then a single agreement step picks the
//! global winner. Ties are broken by index, so the medoids do not depend on how many
//! workers took part.

use std::fmt::Debug;

pub trait Float: num_traits::Float + Debug + Send + Sync + 'static {}

impl Float for f64 {}
impl Float for f32 {}

pub mod algorithms;
pub mod error;
pub mod group;
pub mod harness;
pub mod measure;

pub use error::{Error, Result};
