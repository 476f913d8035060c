use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use colored::*;
use data_scourge_core::{DeletionReport, FileRecord, ScanOutcome};
use std::fmt::Display;
use std::path::Path;

pub const NO_MATCHES: &str = "No large and unused files were found.";

/// `<path> (<MB> MB) last accessed on <MM/DD/YYYY> at <hh:mm AM>`
pub fn format_record_in<Tz>(record: &FileRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let accessed = record.last_accessed.with_timezone(tz);
    format!(
        "{} ({:.2} MB) last accessed on {} at {}",
        record.path.display(),
        record.size_mb(),
        accessed.format("%m/%d/%Y"),
        accessed.format("%I:%M %p"),
    )
}

pub fn format_record(record: &FileRecord) -> String {
    format_record_in(record, &Local)
}

/// The scan report. With `numbered`, each line carries the 1-based number
/// used for selection.
pub fn render_scan(outcome: &ScanOutcome, numbered: bool) -> String {
    let mut out = String::new();

    if outcome.records.is_empty() {
        out.push_str(&format!("{}\n", NO_MATCHES));
    } else {
        out.push_str("Large and unused files:\n\n");
        for (index, record) in outcome.records.iter().enumerate() {
            if numbered {
                out.push_str(&format!("{:>4}. {}\n", index + 1, format_record(record)));
            } else {
                out.push_str(&format!("{}\n", format_record(record)));
            }
        }
        out.push_str(&format!(
            "\nFound {} large and unused files.\n",
            outcome.records.len()
        ));
    }

    if !outcome.complete {
        out.push_str(&format!(
            "{}\n",
            "Scan was cancelled; the list above is incomplete.".yellow()
        ));
    }

    out
}

pub fn render_deletion(report: &DeletionReport) -> String {
    let mut out = format!(
        "Deleted {} of {} files.\n",
        report.success_count().to_string().green(),
        report.outcomes.len()
    );

    if !report.is_complete_success() {
        out.push_str(&format!(
            "{} files could not be deleted:\n",
            report.failure_count().to_string().red()
        ));
        for (path, failure) in report.failed() {
            out.push_str(&format!("  {}: {}\n", path.display(), failure));
        }
    }

    out
}

pub fn write_csv(path: &Path, records: &[FileRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use data_scourge_core::deletion::delete_files;
    use data_scourge_core::ScanStats;
    use std::path::PathBuf;

    fn record() -> FileRecord {
        FileRecord {
            name: "big.log".to_string(),
            path: PathBuf::from("/data/big.log"),
            size_bytes: 150 * 1024 * 1024 + 512 * 1024,
            last_accessed: Utc.with_ymd_and_hms(2024, 3, 7, 15, 4, 0).unwrap(),
        }
    }

    fn outcome(records: Vec<FileRecord>, complete: bool) -> ScanOutcome {
        ScanOutcome {
            records,
            complete,
            stats: ScanStats::default(),
        }
    }

    #[test]
    fn test_format_record_matches_report_line() {
        assert_eq!(
            format_record_in(&record(), &Utc),
            "/data/big.log (150.50 MB) last accessed on 03/07/2024 at 03:04 PM"
        );
    }

    #[test]
    fn test_render_empty_scan() {
        let text = render_scan(&outcome(vec![], true), false);
        assert_eq!(text.trim(), NO_MATCHES);
    }

    #[test]
    fn test_render_scan_lists_and_counts() {
        let text = render_scan(&outcome(vec![record(), record()], true), true);
        assert!(text.starts_with("Large and unused files:"));
        assert!(text.contains("   1. /data/big.log"));
        assert!(text.contains("   2. /data/big.log"));
        assert!(text.contains("Found 2 large and unused files."));
        assert!(!text.contains("incomplete"));
    }

    #[test]
    fn test_render_scan_exact_layout() {
        colored::control::set_override(false);
        let text = render_scan(&outcome(vec![record()], false), false);
        let line = format_record(&record());
        assert_eq!(
            text,
            format!(
                "Large and unused files:\n\n{}\n\nFound 1 large and unused files.\n\
                 Scan was cancelled; the list above is incomplete.\n",
                line
            )
        );
    }

    #[test]
    fn test_render_deletion_exact_layout() {
        colored::control::set_override(false);
        let tmp = tempfile::tempdir().unwrap();
        let kept = tmp.path().join("kept.bin");
        std::fs::write(&kept, b"x").unwrap();
        let missing = tmp.path().join("missing.bin");
        let report = delete_files([&kept, &missing]);

        assert_eq!(
            render_deletion(&report),
            format!(
                "Deleted 1 of 2 files.\n1 files could not be deleted:\n  {}: not found\n",
                missing.display()
            )
        );
    }

    #[test]
    fn test_render_cancelled_scan_is_marked() {
        let text = render_scan(&outcome(vec![record()], false), false);
        assert!(text.contains("incomplete"));
    }

    #[test]
    fn test_render_deletion_lists_failures() {
        colored::control::set_override(false);
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.bin");
        let report = delete_files([&missing]);

        let text = render_deletion(&report);
        assert!(text.contains("Deleted 0 of 1 files."));
        assert!(text.contains(&format!("{}: not found", missing.display())));
    }

    #[test]
    fn test_write_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.csv");
        write_csv(&path, &[record()]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("name,path,size_bytes,last_accessed"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("big.log,/data/big.log,157810688,2024-03-07T15:04:00"));
    }
}
