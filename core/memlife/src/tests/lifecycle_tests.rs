use crate::domain::{DateKey, MarkOutcome, MemoryConfig, SkipReason};
use crate::usecase::CompletionOutcome;
use crate::wiring::{assemble, App};
use chrono::NaiveDate;
use common::adapter::{FileJsonLog, FixedClock, NoopLog, StdFileSystem};
use common::ports::outbound::Log;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const LONG_LOG: &str = "## Session\n\
    Moved the pending queue to an explicit index, wrote tests for the janitor,\n\
    and fixed a date parsing bug where 2026-2-5 was accepted as a valid key.\n";

fn d(s: &str) -> DateKey {
    DateKey::parse(s).unwrap()
}

fn app_at(home: &Path, today: &str, log: Arc<dyn Log>) -> App {
    let config = MemoryConfig::new(
        home.join("memory"),
        home.join("MEMORY.md"),
        home.join("memory").join("archive"),
    );
    let clock = FixedClock::at_noon(NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap());
    assemble(config, Arc::new(StdFileSystem), Arc::new(clock), log)
}

fn write_log(home: &Path, date: &str, content: &str) {
    let dir = home.join("memory");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.md", date)), content).unwrap();
}

#[test]
fn test_short_log_is_skipped_as_too_short() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", &"x".repeat(50));
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));

    let (_, outcome) = app.pending.mark(Some(d("2026-02-05"))).unwrap();
    assert_eq!(
        outcome,
        MarkOutcome::Skipped(SkipReason::ContentTooShort { chars: 50 })
    );
    assert!(outcome_reason(&outcome).starts_with("content too short"));
    assert!(!home.path().join("memory/.pending/2026-02-05.pending").exists());
}

fn outcome_reason(outcome: &MarkOutcome) -> String {
    match outcome {
        MarkOutcome::Skipped(reason) => reason.to_string(),
        MarkOutcome::Marked(_) => String::new(),
    }
}

#[test]
fn test_marking_twice_yields_one_marker() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));

    let (date, first) = app.pending.mark(None).unwrap();
    assert_eq!(date, d("2026-02-05"));
    assert!(first.is_marked());
    let (_, second) = app.pending.mark(None).unwrap();
    assert_eq!(second, MarkOutcome::Skipped(SkipReason::AlreadyPending));

    let markers: Vec<_> = fs::read_dir(home.path().join("memory/.pending"))
        .unwrap()
        .collect();
    assert_eq!(markers.len(), 1);

    let body =
        fs::read_to_string(home.path().join("memory/.pending/2026-02-05.pending")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["date"], "2026-02-05");
    assert_eq!(json["chars"], LONG_LOG.chars().count());
}

#[test]
fn test_complete_then_list_excludes_date_and_mark_reports_processed() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-04", LONG_LOG);
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));

    let report = app.pending.batch_mark(3).unwrap();
    assert_eq!(report.marked(), 2);
    assert_eq!(app.pending.list().unwrap(), vec![d("2026-02-04"), d("2026-02-05")]);

    let outcome = app.completion.mark_complete(d("2026-02-05")).unwrap();
    assert_eq!(
        outcome,
        CompletionOutcome::Completed {
            annotated: true,
            marker_removed: true
        }
    );
    assert_eq!(app.pending.list().unwrap(), vec![d("2026-02-04")]);

    let content = fs::read_to_string(home.path().join("memory/2026-02-05.md")).unwrap();
    assert!(content.starts_with("<!-- compounded: 2026-02-06 -->\n"));
    assert!(content.ends_with(LONG_LOG));

    let (_, again) = app.pending.mark(Some(d("2026-02-05"))).unwrap();
    assert_eq!(again, MarkOutcome::Skipped(SkipReason::AlreadyCompleted));
    assert!(!home.path().join("memory/.pending/2026-02-05.pending").exists());
}

#[test]
fn test_complete_twice_does_not_double_annotate() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));

    app.completion.mark_complete(d("2026-02-05")).unwrap();
    let second = app.completion.mark_complete(d("2026-02-05")).unwrap();
    assert_eq!(
        second,
        CompletionOutcome::Completed {
            annotated: false,
            marker_removed: false
        }
    );
    let content = fs::read_to_string(home.path().join("memory/2026-02-05.md")).unwrap();
    assert_eq!(content.matches("<!-- compounded").count(), 1);
}

#[test]
fn test_extract_save_and_process_round() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));
    app.pending.mark(None).unwrap();

    let task = app
        .completion
        .batch_instructions()
        .unwrap()
        .render()
        .unwrap();
    assert!(task.contains("memlife extract 2026-02-05"));
    assert!(task.contains("memlife done 2026-02-05"));

    let prompt = app.extraction.prepare(d("2026-02-05")).unwrap().unwrap();
    assert!(prompt.contains("2026-02-05"));
    assert!(prompt.contains("explicit index"));

    let path = app
        .completion
        .save_insights(d("2026-02-05"), "- keep date keys strict")
        .unwrap();
    assert_eq!(path, home.path().join("memory/insights/2026-02.md"));
    let digest = fs::read_to_string(&path).unwrap();
    assert!(digest.starts_with("# Insights - February 2026\n\n"));
    assert!(digest.contains("- keep date keys strict"));

    assert!(app.extraction.prepare(d("2026-01-01")).unwrap().is_none());
}

#[test]
fn test_stray_marker_files_are_ignored() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let pending = home.path().join("memory/.pending");
    fs::create_dir_all(&pending).unwrap();
    fs::write(pending.join("notes.pending"), "{}").unwrap();
    fs::write(pending.join("README.txt"), "hello").unwrap();
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));

    app.pending.mark(None).unwrap();
    assert_eq!(app.pending.list().unwrap(), vec![d("2026-02-05")]);
}

#[test]
fn test_mutations_are_logged_as_jsonl() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let log_path = home.path().join("state/memlife.jsonl");
    let log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::new(StdFileSystem), &log_path));
    let app = app_at(home.path(), "2026-02-06", log);

    app.pending.mark(None).unwrap();

    let text = fs::read_to_string(&log_path).unwrap();
    let messages: Vec<String> = text
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["message"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(messages.iter().any(|m| m == "pending marked"));
    assert!(messages.iter().any(|m| m.contains("write")));
}

#[test]
fn test_marker_with_broken_utf8_is_excluded_from_listing() {
    let home = TempDir::new().unwrap();
    write_log(home.path(), "2026-02-05", LONG_LOG);
    let app = app_at(home.path(), "2026-02-06", Arc::new(NoopLog));
    app.pending.mark(None).unwrap();

    let mut cut = br#"{"date":"2026-02-04","file":"/home/"#.to_vec();
    cut.push(0xE7);
    fs::write(home.path().join("memory/.pending/2026-02-04.pending"), cut).unwrap();

    let info = app.pending.info().unwrap();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].date, d("2026-02-05"));

    let task = app
        .completion
        .batch_instructions()
        .unwrap()
        .render()
        .unwrap();
    assert!(task.contains("memlife extract 2026-02-05"));
    assert!(!task.contains("2026-02-04"));
}
