use crate::domain::MemoryConfig;
use crate::usecase::{JanitorOutcome, JanitorReport};
use crate::wiring::{assemble, App};
use chrono::NaiveDate;
use common::adapter::{FixedClock, NoopLog, StdFileSystem};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const SUMMARY: &str = "# MEMORY\n\
    \n\
    ## Rules\n\
    - [P0][2019-06-01] always run the janitor in dry-run first\n\
    - [P2][2020-01-01] old note\n\
    - [P2][2020-01-16] thirty days exactly\n\
    - [P2][2020-01-15] thirty one days\n\
    - [P1][2019-12-01] seventy-six days ago\n\
    - [P7][2019-10-01] unknown tag uses the longest ttl\n\
    notes without a tag stay as they are\n";

fn app_at(home: &Path, today: &str) -> App {
    let config = MemoryConfig::new(
        home.join("memory"),
        home.join("MEMORY.md"),
        home.join("memory").join("archive"),
    );
    let clock = FixedClock::at_noon(NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap());
    assemble(config, Arc::new(StdFileSystem), Arc::new(clock), Arc::new(NoopLog))
}

fn scanned(outcome: JanitorOutcome) -> JanitorReport {
    match outcome {
        JanitorOutcome::Scanned(r) => r,
        other => panic!("expected report, got {:?}", other),
    }
}

#[test]
fn test_expired_entry_moves_to_monthly_archive() {
    let home = TempDir::new().unwrap();
    let summary = home.path().join("MEMORY.md");
    fs::write(&summary, "# MEMORY\n- [P2][2020-01-01] old note\n").unwrap();
    let app = app_at(home.path(), "2020-02-15");

    let report = scanned(app.janitor.run(false).unwrap());
    assert_eq!(report.scan.expired.len(), 1);
    assert_eq!(report.scan.expired[0].age_days, 45);

    let archive = home.path().join("memory/archive/expired-2020-02.md");
    let archived = fs::read_to_string(&archive).unwrap();
    assert!(archived.contains("## Archived 2020-02-15 by memlife janitor"));
    assert!(archived.contains("- [P2][2020-01-01] old note\n"));

    assert_eq!(fs::read_to_string(&summary).unwrap(), "# MEMORY\n");
    assert_eq!(
        fs::read_to_string(home.path().join("MEMORY.md.bak")).unwrap(),
        "# MEMORY\n- [P2][2020-01-01] old note\n"
    );
    let applied = report.applied.unwrap();
    assert_eq!(applied.archive, archive);
    assert_eq!(applied.lines_before, 2);
    assert_eq!(applied.lines_after, 1);
}

#[test]
fn test_ttl_boundary_and_priorities() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("MEMORY.md"), SUMMARY).unwrap();
    let app = app_at(home.path(), "2020-02-15");

    let report = scanned(app.janitor.run(true).unwrap());
    let expired: Vec<String> = report
        .scan
        .expired
        .iter()
        .map(|e| e.entry.text.clone())
        .collect();
    assert_eq!(
        expired,
        vec![
            "old note".to_string(),
            "thirty one days".to_string(),
            "unknown tag uses the longest ttl".to_string(),
        ]
    );
    assert!(report
        .scan
        .kept
        .iter()
        .any(|l| l.contains("thirty days exactly")));
    assert!(report
        .scan
        .kept
        .iter()
        .any(|l| l.contains("seventy-six days")));
    assert!(report.scan.kept.iter().any(|l| l.contains("[P0]")));
}

#[test]
fn test_report_only_runs_are_repeatable_and_write_nothing() {
    let home = TempDir::new().unwrap();
    let summary = home.path().join("MEMORY.md");
    fs::write(&summary, SUMMARY).unwrap();
    let app = app_at(home.path(), "2020-02-15");

    let first = scanned(app.janitor.run(true).unwrap());
    let second = scanned(app.janitor.run(true).unwrap());
    assert_eq!(first.scan, second.scan);
    assert!(first.applied.is_none());

    assert_eq!(fs::read_to_string(&summary).unwrap(), SUMMARY);
    assert!(!home.path().join("MEMORY.md.bak").exists());
    assert!(!home.path().join("memory/archive").exists());
}

#[test]
fn test_mutating_run_conserves_lines() {
    let home = TempDir::new().unwrap();
    let summary = home.path().join("MEMORY.md");
    fs::write(&summary, SUMMARY).unwrap();
    let app = app_at(home.path(), "2020-02-15");

    let report = scanned(app.janitor.run(false).unwrap());
    assert_eq!(
        report.scan.kept.len() + report.scan.expired.len(),
        report.scan.total_lines
    );

    let after = fs::read_to_string(&summary).unwrap();
    for line in SUMMARY.lines().filter(|l| !l.trim_start().starts_with("- [P")) {
        assert!(after.lines().any(|l| l == line), "lost line: {:?}", line);
    }

    let second = scanned(app.janitor.run(false).unwrap());
    assert!(second.scan.expired.is_empty());
    assert!(second.applied.is_none());
    assert_eq!(fs::read_to_string(&summary).unwrap(), after);
}

#[test]
fn test_missing_summary_is_not_an_error() {
    let home = TempDir::new().unwrap();
    let app = app_at(home.path(), "2020-02-15");

    match app.janitor.run(false).unwrap() {
        JanitorOutcome::SummaryMissing { path } => {
            assert_eq!(path, home.path().join("MEMORY.md"))
        }
        other => panic!("expected missing summary, got {:?}", other),
    }
}
