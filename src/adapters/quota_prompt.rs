use crate::domain::model::QuotaEntry;
use crate::utils::error::Result;
use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::LazyLock;

static QUOTA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:]*[^:\s])\s*:\s*(-?\d+)\s*$").expect("quota line pattern is valid")
});

/// Parses `lecturer_name:quota`. Returns `None` for anything else.
pub fn parse_quota_line(line: &str) -> Option<QuotaEntry> {
    let caps = QUOTA_LINE.captures(line)?;
    let quota = caps[2].parse().ok()?;
    Some(QuotaEntry {
        lecturer: caps[1].trim().to_string(),
        quota,
    })
}

/// Reads quota lines from `input` until a blank line or end of input.
///
/// Malformed lines get a hint on `output` and are skipped.
pub fn prompt_quotas<R: BufRead, W: Write>(input: R, mut output: W) -> Result<Vec<QuotaEntry>> {
    writeln!(
        output,
        "Enter lecturer quotas (lecturer_name:quota). Press Enter on an empty line when done:"
    )?;

    let mut quotas = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }

        match parse_quota_line(&line) {
            Some(entry) => quotas.push(entry),
            None => writeln!(
                output,
                "Invalid format. Use 'lecturer_name:quota' (e.g., 'Prof_Smith:3')"
            )?,
        }
    }

    Ok(quotas)
}
