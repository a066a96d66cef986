//! Benchmark collaborators around the engines: settings and point-set input,
//! the per-configuration timing driver and the result report.

pub mod points;
pub mod report;
pub mod runner;
pub mod settings;

pub use self::report::{RunParams, Timings};
pub use self::runner::{Benchmark, BenchmarkConfig, RunRecord};
pub use self::settings::Setting;
