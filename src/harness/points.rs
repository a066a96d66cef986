use std::io::{Read, Write};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{Error, Result};

/// Read the first `n * m` whitespace-separated values, row-major.
///
/// Anything after them is ignored, so one file can serve every configuration.
pub fn load_points<R: Read>(mut reader: R, n: usize, m: usize) -> Result<Vec<f64>> {
    let expected = n * m;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut values = Vec::with_capacity(expected);
    for (position, token) in text.split_ascii_whitespace().take(expected).enumerate() {
        let value = token.parse::<f64>().map_err(|_| Error::Parse {
            token: token.to_owned(),
            position,
        })?;
        values.push(value);
    }

    if values.len() < expected {
        return Err(Error::ShortInput {
            expected,
            found: values.len(),
        });
    }

    debug!(n, m, "loaded points");
    Ok(values)
}

/// Uniform random points in `[0, 1)^m`, reproducible from `seed`.
pub fn generate_points(n: usize, m: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * m).map(|_| rng.gen::<f64>()).collect()
}

/// Write `values` as `m` space-separated coordinates per line.
pub fn write_points<W: Write>(mut writer: W, values: &[f64], m: usize) -> Result<()> {
    if m == 0 || values.len() % m != 0 {
        return Err(Error::DimensionMismatch {
            expected: m,
            found: if m == 0 { values.len() } else { values.len() % m },
        });
    }

    for row in values.chunks_exact(m) {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}
