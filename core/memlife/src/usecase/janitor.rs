//! MEMORY.md の期限切れエントリ整理（janitor）
//!
//! 書き換え順序: バックアップ → アーカイブ追記 → MEMORY.md 上書き。
//! バックアップに失敗したら何も変更せずに Err を返す。途中で落ちても元の MEMORY.md は
//! 変わっていないので、最初からやり直せば同じ分割になる。

use crate::domain::{ExpiryScan, MonthKey, TtlTable};
use crate::ports::outbound::{DocKey, MemoryStore};
use chrono::{DateTime, Utc};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::path::PathBuf;
use std::sync::Arc;

/// 実際に書き換えた場合の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedArchive {
    pub backup: PathBuf,
    pub archive: PathBuf,
    pub lines_before: usize,
    pub lines_after: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JanitorReport {
    pub reference: DateTime<Utc>,
    pub dry_run: bool,
    pub scan: ExpiryScan,
    pub max_lines: usize,
    /// 残す行（空行除く）が上限を超えたときの行数
    pub over_capacity: Option<usize>,
    /// dry run・期限切れなしのときは None
    pub applied: Option<AppliedArchive>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JanitorOutcome {
    SummaryMissing { path: PathBuf },
    Scanned(JanitorReport),
}

pub struct JanitorUseCase {
    store: Arc<dyn MemoryStore>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
    ttl: TtlTable,
    max_lines: usize,
}

impl JanitorUseCase {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
        ttl: TtlTable,
        max_lines: usize,
    ) -> Self {
        Self {
            store,
            clock,
            log,
            ttl,
            max_lines,
        }
    }

    pub fn run(&self, dry_run: bool) -> Result<JanitorOutcome, Error> {
        let Some(content) = self.store.read(&DocKey::Summary)? else {
            let path = self.store.locate(&DocKey::Summary);
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "summary not found")
                    .layer("usecase")
                    .kind("janitor")
                    .field("path", path.to_string_lossy().to_string()),
            );
            return Ok(JanitorOutcome::SummaryMissing { path });
        };

        let reference = self.clock.now();
        let today = reference.date_naive();
        let scan = ExpiryScan::scan(&content, today, &self.ttl);
        let over_capacity = scan.over_capacity(self.max_lines);

        let applied = if dry_run || !scan.has_expired() {
            None
        } else {
            Some(self.apply(&scan, MonthKey::of(today), &today.format("%Y-%m-%d").to_string())?)
        };

        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "janitor scanned")
                .layer("usecase")
                .kind("janitor")
                .field("dry_run", dry_run)
                .field("total", scan.total_lines)
                .field("kept", scan.kept.len())
                .field("expired", scan.expired.len())
                .field("applied", applied.is_some()),
        );
        if let Some(n) = over_capacity {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "summary over capacity")
                    .layer("usecase")
                    .kind("janitor")
                    .field("lines", n)
                    .field("limit", self.max_lines),
            );
        }

        Ok(JanitorOutcome::Scanned(JanitorReport {
            reference,
            dry_run,
            scan,
            max_lines: self.max_lines,
            over_capacity,
            applied,
        }))
    }

    fn apply(&self, scan: &ExpiryScan, month: MonthKey, day: &str) -> Result<AppliedArchive, Error> {
        // バックアップが終わるまで MEMORY.md には触れない
        self.store.copy(&DocKey::Summary, &DocKey::SummaryBackup)?;

        let archive_key = DocKey::ExpiredArchive(month);
        let mut section = format!("\n## Archived {} by memlife janitor\n", day);
        for e in &scan.expired {
            section.push_str(&e.archive_line());
        }
        self.store.append(&archive_key, &section)?;

        self.store.write(&DocKey::Summary, &scan.kept_document())?;

        let applied = AppliedArchive {
            backup: self.store.locate(&DocKey::SummaryBackup),
            archive: self.store.locate(&archive_key),
            lines_before: scan.total_lines,
            lines_after: scan.kept.len(),
        };
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "janitor archived")
                .layer("usecase")
                .kind("janitor")
                .field("archive", applied.archive.to_string_lossy().to_string())
                .field("entries", scan.expired.len()),
        );
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryStore;
    use crate::domain::DateKey;
    use chrono::NaiveDate;
    use common::adapter::{FixedClock, NoopLog};

    const DOC: &str = "# MEMORY\n\
                       - [P0][2020-01-01] never expires\n\
                       - [P2][2020-01-01] old note\n\
                       free-form line\n\
                       - [P1][2026-02-01] recent\n";

    fn setup(today: &str, max_lines: usize) -> (Arc<InMemoryStore>, JanitorUseCase) {
        let store = Arc::new(InMemoryStore::new());
        let clock = FixedClock::at_noon(NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap());
        let uc = JanitorUseCase::new(
            store.clone(),
            Arc::new(clock),
            Arc::new(NoopLog),
            TtlTable::default(),
            max_lines,
        );
        (store, uc)
    }

    fn report(outcome: JanitorOutcome) -> JanitorReport {
        match outcome {
            JanitorOutcome::Scanned(r) => r,
            other => panic!("expected report, got {:?}", other),
        }
    }

    fn feb() -> MonthKey {
        DateKey::parse("2020-02-15").unwrap().month()
    }

    #[test]
    fn test_missing_summary_is_reported() {
        let (_, uc) = setup("2020-02-15", 150);
        assert!(matches!(
            uc.run(false).unwrap(),
            JanitorOutcome::SummaryMissing { .. }
        ));
    }

    #[test]
    fn test_dry_run_changes_nothing_and_is_repeatable() {
        let (store, uc) = setup("2020-02-15", 150);
        store.insert(DocKey::Summary, DOC);
        let a = report(uc.run(true).unwrap());
        let b = report(uc.run(true).unwrap());
        assert_eq!(a.scan, b.scan);
        assert_eq!(a.scan.expired.len(), 1);
        assert!(a.applied.is_none());
        assert_eq!(store.get(&DocKey::Summary).unwrap(), DOC);
        assert!(!store.exists(&DocKey::SummaryBackup));
        assert!(!store.exists(&DocKey::ExpiredArchive(feb())));
    }

    #[test]
    fn test_expired_entry_is_archived_and_removed() {
        let (store, uc) = setup("2020-02-15", 150);
        store.insert(DocKey::Summary, DOC);
        let r = report(uc.run(false).unwrap());
        let applied = r.applied.unwrap();
        assert_eq!(applied.lines_before, 5);
        assert_eq!(applied.lines_after, 4);

        assert_eq!(store.get(&DocKey::SummaryBackup).unwrap(), DOC);
        let archive = store.get(&DocKey::ExpiredArchive(feb())).unwrap();
        assert_eq!(
            archive,
            "\n## Archived 2020-02-15 by memlife janitor\n- [P2][2020-01-01] old note\n"
        );
        let summary = store.get(&DocKey::Summary).unwrap();
        assert!(!summary.contains("old note"));
        assert_eq!(
            summary,
            "# MEMORY\n- [P0][2020-01-01] never expires\nfree-form line\n- [P1][2026-02-01] recent\n"
        );
    }

    #[test]
    fn test_nothing_expired_means_no_backup() {
        let (store, uc) = setup("2020-01-10", 150);
        store.insert(DocKey::Summary, DOC);
        let r = report(uc.run(false).unwrap());
        assert!(r.applied.is_none());
        assert!(!store.exists(&DocKey::SummaryBackup));
    }

    #[test]
    fn test_backup_failure_leaves_summary_untouched() {
        let (store, uc) = setup("2020-02-15", 150);
        store.insert(DocKey::Summary, DOC);
        store.fail_writes_to(DocKey::SummaryBackup);
        assert!(uc.run(false).is_err());
        assert_eq!(store.get(&DocKey::Summary).unwrap(), DOC);
        assert!(!store.exists(&DocKey::ExpiredArchive(feb())));
    }

    #[test]
    fn test_archive_failure_leaves_summary_untouched_and_rerun_matches() {
        let (store, uc) = setup("2020-02-15", 150);
        store.insert(DocKey::Summary, DOC);
        store.fail_writes_to(DocKey::ExpiredArchive(feb()));
        assert!(uc.run(false).is_err());
        assert_eq!(store.get(&DocKey::Summary).unwrap(), DOC);
        let rerun = report(uc.run(true).unwrap());
        assert_eq!(rerun.scan.expired.len(), 1);
    }

    #[test]
    fn test_capacity_warning() {
        let (store, uc) = setup("2020-02-15", 2);
        store.insert(DocKey::Summary, DOC);
        let r = report(uc.run(true).unwrap());
        assert_eq!(r.over_capacity, Some(4));
    }
}
