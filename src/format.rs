//! Format job listings and run reports as text.

use crate::jobs::JobRecord;
use crate::run::RunReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Tab-separated job listing with a `Job id\tStatus` header.
pub fn format_jobs_text(jobs: &[JobRecord]) -> String {
    let mut out = String::from("Job id\tStatus\n");
    for job in jobs {
        out.push_str(&format!("{}\t{}\n", job.job_id, job.status));
    }
    out
}

/// Format a run report as human-readable text.
pub fn format_run_report_text(report: &RunReport) -> String {
    let mut out = String::new();
    let title = format!("{} report", capitalize(report.action.name()));
    out.push_str(&format!("{}\n\n", format_section_heading(&title)));
    out.push_str(&format!("  Directory: {}\n", report.directory.display()));
    out.push_str(&format!("  Status: {}\n", report.status));
    out.push_str(&format!(
        "  Files: {} discovered, {} processed, {} failed\n\n",
        report.files_discovered, report.files_processed, report.files_failed
    ));

    if report.files_discovered == 0 {
        out.push_str("No files to load.\n");
        return out;
    }

    let counts = &report.counts;
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Created", "Updated", "Deleted"]);
    table.add_row(vec![
        "Nodes".to_string(),
        counts.nodes_created.to_string(),
        counts.nodes_updated.to_string(),
        counts.nodes_deleted.to_string(),
    ]);
    table.add_row(vec![
        "Relationships".to_string(),
        counts.relationships_created.to_string(),
        counts.relationships_updated.to_string(),
        counts.relationships_deleted.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    if !report.failures.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Failed files")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["File", "Error"]);
        for failure in &report.failures {
            table.add_row(vec![
                failure.file.display().to_string(),
                failure.message.clone(),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    if report.total_violations > 0 {
        out.push_str(&format!("{}\n\n", format_section_heading("Violations")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["File", "Line", "Message"]);
        for violation in &report.violations {
            let line = violation
                .line
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                violation.file.display().to_string(),
                line,
                violation.message.clone(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
        out.push_str(&format!(
            "Showing {} of {} violations.\n",
            report.violations.len(),
            report.total_violations
        ));
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobStatus;
    use crate::processor::{ChangeCounts, Violation};
    use crate::run::{RunAction, RunState};
    use chrono::Utc;
    use std::path::PathBuf;

    fn report(total_violations: u64, violations: Vec<Violation>) -> RunReport {
        RunReport {
            action: RunAction::Validate,
            directory: PathBuf::from("/data"),
            status: RunState::Succeeded,
            started_at: Utc::now(),
            finished_at: Some(Utc::now()),
            files_discovered: 1,
            files_processed: 1,
            files_failed: 0,
            counts: ChangeCounts::default(),
            max_violations: 2,
            total_violations,
            violations,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_format_jobs_text() {
        let jobs = vec![JobRecord {
            job_id: "0002".to_string(),
            status: JobStatus::LoadSucceeded,
        }];
        assert_eq!(format_jobs_text(&jobs), "Job id\tStatus\n0002\tLoad succeeded\n");
    }

    #[test]
    fn test_format_report_shows_truncation() {
        let violations = vec![
            Violation::new("/data/a.txt", Some(3), "missing case_id"),
            Violation::new("/data/a.txt", None, "unknown column"),
        ];
        let text = format_run_report_text(&report(15, violations));
        assert!(text.contains("Showing 2 of 15 violations."));
        assert!(text.contains("missing case_id"));
    }

    #[test]
    fn test_format_empty_run() {
        let mut r = report(0, Vec::new());
        r.files_discovered = 0;
        r.files_processed = 0;
        assert!(format_run_report_text(&r).contains("No files to load."));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("load"), "Load");
        assert_eq!(capitalize(""), "");
    }
}
