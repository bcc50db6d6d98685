//! CSV readers for the three input files.
//!
//! All files start with a header row, which is skipped. Rows may have any
//! width, cells are trimmed, and blank cells are ignored.

use crate::domain::model::{QuotaEntry, RankedRow, ScribeEntry};
use crate::utils::error::Result;
use std::io::Read;

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

/// Reads `name,1st_choice,2nd_choice,...` rows. Rows with a blank name are skipped.
pub fn read_ranked_rows<R: Read>(source: R) -> Result<Vec<RankedRow>> {
    let mut rows = Vec::new();

    for record in reader(source).records() {
        let record = record?;
        let Some(name) = record.get(0).filter(|name| !name.is_empty()) else {
            continue;
        };

        let choices = record
            .iter()
            .skip(1)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect();

        rows.push(RankedRow {
            name: name.to_string(),
            choices,
        });
    }

    Ok(rows)
}

/// Scribes with no choices are kept; they end up unassigned.
pub fn read_scribe_preferences<R: Read>(source: R) -> Result<Vec<ScribeEntry>> {
    let rows = read_ranked_rows(source)?;
    for row in rows.iter().filter(|row| row.choices.is_empty()) {
        tracing::debug!("Scribe '{}' has no preferences and will stay unassigned", row.name);
    }

    Ok(rows
        .into_iter()
        .map(|row| ScribeEntry {
            name: row.name,
            preferences: row.choices,
        })
        .collect())
}

pub fn read_lecturer_preferences<R: Read>(source: R) -> Result<Vec<RankedRow>> {
    read_ranked_rows(source)
}

/// Reads `lecturer_name,quota` rows.
///
/// Short rows are skipped. Non-integer quotas are skipped with a warning;
/// zero or negative integers are kept so model validation can reject them.
pub fn read_lecturer_quotas<R: Read>(source: R) -> Result<Vec<QuotaEntry>> {
    let mut quotas = Vec::new();

    for (index, record) in reader(source).records().enumerate() {
        let record = record?;
        if record.len() < 2 || record[0].is_empty() {
            continue;
        }

        // +2：跳過 header 並換成 1-based 行號
        let line = record.position().map_or(index as u64 + 2, |p| p.line());
        match record[1].parse::<i64>() {
            Ok(quota) => quotas.push(QuotaEntry {
                lecturer: record[0].to_string(),
                quota,
            }),
            Err(_) => tracing::warn!(
                "⚠️ Invalid quota '{}' for lecturer '{}' on line {}",
                &record[1],
                &record[0],
                line
            ),
        }
    }

    Ok(quotas)
}
