use std::io::Write;
use std::time::Duration;

use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunParams {
    pub n: usize,
    pub m: usize,
    pub k: usize,
    pub p: usize,
}

/// Wall-clock duration of each phase, as seen by rank 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timings {
    pub build: Duration,
    pub swap: Duration,
    pub overall: Duration,
}

/// Append one result block. The key names are read by existing result parsers.
pub fn write_report<W: Write>(writer: &mut W, params: &RunParams, timings: &Timings) -> Result<()> {
    writeln!(
        writer,
        "n= {} m= {} k= {} p= {}",
        params.n, params.m, params.k, params.p
    )?;
    writeln!(writer, "buildTimeDuration= {} nano-seconds", timings.build.as_nanos())?;
    writeln!(writer, "swapTimeDuration= {} nano-seconds", timings.swap.as_nanos())?;
    writeln!(writer, "overalTimeDuration= {} nano-seconds", timings.overall.as_nanos())?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_layout() {
        let params = RunParams { n: 100, m: 5, k: 2, p: 4 };
        let timings = Timings {
            build: Duration::from_nanos(1500),
            swap: Duration::from_micros(2),
            overall: Duration::from_nanos(3500),
        };

        let mut out = vec![];
        write_report(&mut out, &params, &timings).unwrap();
        write_report(&mut out, &params, &Timings::default()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = "n= 100 m= 5 k= 2 p= 4\n\
                        buildTimeDuration= 1500 nano-seconds\n\
                        swapTimeDuration= 2000 nano-seconds\n\
                        overalTimeDuration= 3500 nano-seconds\n\
                        \n";
        assert!(text.starts_with(expected));
        assert_eq!(text.matches("n= 100").count(), 2);
        assert!(text.ends_with("overalTimeDuration= 0 nano-seconds\n\n"));
    }
}
