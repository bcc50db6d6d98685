use crate::config::OutputFormat;
use crate::domain::model::MatchReport;
use crate::utils::error::Result;
use std::collections::HashMap;

pub fn render(report: &MatchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_csv(report),
    }
}

pub fn render_json(report: &MatchReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// One `scribe,lecturer` row per scribe in input order; unassigned scribes get an empty lecturer.
pub fn render_csv(report: &MatchReport) -> Result<String> {
    let lecturer_of: HashMap<&str, &str> = report.assignment.pairs().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["scribe", "lecturer"])?;
    for scribe in &report.scribes {
        let lecturer = lecturer_of.get(scribe.as_str()).copied().unwrap_or("");
        writer.write_record([scribe.as_str(), lecturer])?;
    }

    let data = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

pub fn render_table(report: &MatchReport) -> String {
    let mut out = String::new();

    let mut allocations: Vec<_> = report.assignment.allocations.iter().collect();
    allocations.sort_by(|a, b| a.lecturer.cmp(&b.lecturer));
    let rows: Vec<Vec<String>> = allocations
        .iter()
        .map(|a| {
            let mut scribes: Vec<&str> = a.scribes.iter().map(String::as_str).collect();
            scribes.sort_unstable();
            let scribes = if scribes.is_empty() {
                "None".to_string()
            } else {
                scribes.join(", ")
            };
            vec![
                a.lecturer.clone(),
                scribes,
                format!("{}/{}", a.scribes.len(), a.quota),
            ]
        })
        .collect();
    push_table(
        &mut out,
        "Scribe-Lecturer Assignments",
        &["Lecturer", "Assigned Scribes", "Count"],
        &rows,
    );

    let matched = report.assignment.matched_count();
    let summary = vec![
        vec!["Total Scribes".to_string(), report.scribes.len().to_string()],
        vec!["Matched Scribes".to_string(), matched.to_string()],
        vec!["Unmatched Scribes".to_string(), report.assignment.unassigned.len().to_string()],
        vec!["Total Lecturers".to_string(), report.assignment.allocations.len().to_string()],
        vec!["Under-filled Lecturers".to_string(), report.under_filled.len().to_string()],
    ];
    out.push('\n');
    push_table(&mut out, "Summary Statistics", &["Metric", "Count"], &summary);

    if !report.assignment.unassigned.is_empty() {
        let mut unassigned: Vec<&String> = report.assignment.unassigned.iter().collect();
        unassigned.sort_unstable();
        let rows: Vec<Vec<String>> = unassigned.into_iter().map(|s| vec![s.clone()]).collect();
        out.push('\n');
        push_table(&mut out, "Unmatched Scribes", &["Scribe"], &rows);
    }

    if !report.under_filled.is_empty() {
        let mut under: Vec<_> = report.under_filled.iter().collect();
        under.sort_by(|a, b| a.lecturer.cmp(&b.lecturer));
        let rows: Vec<Vec<String>> = under
            .into_iter()
            .map(|u| vec![u.lecturer.clone(), u.remaining.to_string()])
            .collect();
        out.push('\n');
        push_table(&mut out, "Under-filled Lecturers", &["Lecturer", "Remaining"], &rows);
    }

    if !report.stable {
        out.push_str("\nWARNING: result failed the stability check:\n");
        for violation in &report.violations {
            out.push_str("  - ");
            out.push_str(violation);
            out.push('\n');
        }
    }

    out
}

fn push_table(out: &mut String, title: &str, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };
    out.push_str(title);
    out.push('\n');
    out.push_str(&border);
    push_row(out, &widths, headers.iter().copied());
    out.push_str(&border);
    for row in rows {
        push_row(out, &widths, row.iter().map(String::as_str));
    }
    if !rows.is_empty() {
        out.push_str(&border);
    }
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    out.push('|');
    for (width, cell) in widths.iter().zip(cells) {
        let pad = width - cell.chars().count();
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(pad + 1));
        out.push('|');
    }
    out.push('\n');
}
