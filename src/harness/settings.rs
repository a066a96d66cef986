use std::io::BufRead;

use tracing::warn;

use crate::Result;

/// One benchmark configuration: `n` points clustered by a group of `p` workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Setting {
    pub n: usize,
    pub p: usize,
}

/// Read `n p` pairs, one per line.
///
/// Both fields are checked as they are read, so the end of the stream never turns
/// into an extra configuration. Blank lines are ignored; malformed lines are logged
/// and skipped.
pub fn parse_settings<R: BufRead>(reader: R) -> Result<Vec<Setting>> {
    let mut settings = vec![];

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.split_ascii_whitespace();

        let (n, p) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(n), Some(p), None) => (n, p),
            _ => {
                warn!(line = line_no + 1, content = %line, "expected two fields, skipping");
                continue;
            }
        };

        match (n.parse::<usize>(), p.parse::<usize>()) {
            (Ok(n), Ok(p)) if n > 0 && p > 0 => settings.push(Setting { n, p }),
            _ => warn!(line = line_no + 1, content = %line, "expected two positive integers, skipping"),
        }
    }

    Ok(settings)
}
