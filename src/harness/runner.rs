use std::io::Write;
use std::time::Instant;

use tracing::{error, info, info_span};

use super::report::{write_report, RunParams, Timings};
use super::settings::Setting;
use crate::algorithms::{run_build, run_swap};
use crate::group::{Communicator, LocalComm, WorkerPool};
use crate::measure::matrix::DissimilarityMatrix;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Coordinates per point.
    pub dim: usize,
    /// Runs per configuration.
    pub repeats: usize,
    /// `k = n / medoid_ratio`, at least 1.
    pub medoid_ratio: usize,
    /// SWAP iteration cap, `0` for none.
    pub max_iter: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            dim: 5,
            repeats: 3,
            medoid_ratio: 50,
            max_iter: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunRecord {
    pub params: RunParams,
    pub timings: Timings,
    pub medoids: Vec<usize>,
    pub cost: f64,
    pub iterations: usize,
}

/// Times BUILD and SWAP for each configuration on groups split from one pool.
pub struct Benchmark<'a> {
    pool: WorkerPool,
    points: &'a [f64],
    config: BenchmarkConfig,
}

impl<'a> Benchmark<'a> {
    /// `points` holds row-major coordinates; configuration `n` uses the first `n` rows.
    pub fn new(pool: WorkerPool, points: &'a [f64], config: BenchmarkConfig) -> Self {
        Self {
            pool,
            points,
            config,
        }
    }

    pub fn params(&self, setting: Setting) -> RunParams {
        let ratio = self.config.medoid_ratio.max(1);
        RunParams {
            n: setting.n,
            m: self.config.dim,
            k: (setting.n / ratio).max(1),
            p: setting.p,
        }
    }

    /// One timed run. Every worker builds its own copy of the matrix.
    pub fn run_setting(&self, setting: Setting) -> Result<RunRecord> {
        let params = self.params(setting);
        let RunParams { n, m, k, p } = params;

        let needed = n * m;
        if needed > self.points.len() {
            return Err(Error::ShortInput {
                expected: needed,
                found: self.points.len(),
            });
        }
        let points = &self.points[..needed];
        let max_iter = self.config.max_iter;

        let group = self.pool.split(p)?;
        let mut results = group.run(|comm: &LocalComm<f64>| {
            let d = DissimilarityMatrix::from_vectors(points, m)?;

            comm.barrier()?;
            let start = Instant::now();
            let state = run_build(&d, k, comm)?;
            let median = Instant::now();
            let outcome = run_swap(&d, state, max_iter, comm)?;
            let finish = Instant::now();
            comm.barrier()?;

            let timings = Timings {
                build: median - start,
                swap: finish - median,
                overall: finish - start,
            };
            Ok((timings, outcome))
        })?;

        let (timings, outcome) = results.remove(0);
        Ok(RunRecord {
            params,
            timings,
            medoids: outcome.medoids,
            cost: outcome.cost,
            iterations: outcome.iterations,
        })
    }

    /// Run every configuration `repeats` times and append a report block per run.
    ///
    /// A configuration that fails is logged and skipped. Returns the number of
    /// blocks written.
    pub fn run_all<W: Write>(&self, settings: &[Setting], out: &mut W) -> Result<usize> {
        let mut written = 0;

        for &setting in settings {
            let span = info_span!("setting", n = setting.n, p = setting.p);
            let _guard = span.enter();

            for repeat in 0..self.config.repeats {
                match self.run_setting(setting) {
                    Ok(record) => {
                        info!(
                            repeat,
                            k = record.params.k,
                            cost = record.cost,
                            iterations = record.iterations,
                            overall_ns = record.timings.overall.as_nanos() as u64,
                            "run finished"
                        );
                        write_report(out, &record.params, &record.timings)?;
                        written += 1;
                    }
                    Err(err) => {
                        error!(%err, "configuration skipped");
                        break;
                    }
                }
            }
        }

        out.flush()?;
        Ok(written)
    }
}
