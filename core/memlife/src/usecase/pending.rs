//! pending キューのユースケース（mark / batch-mark / list / info）
//!
//! 重複判定は起動ごとに一度だけ読み込む PendingIndex で行う。
//! 想定内のスキップ（ログなし・処理済み・短すぎ・登録済み）は MarkOutcome で返し、Err は I/O 失敗のみ。

use crate::domain::{
    BatchMarkReport, DailyLog, DateKey, MarkOutcome, PendingIndex, PendingInfo, PendingMarker,
    SkipReason,
};
use crate::ports::outbound::{DocKey, MemoryStore};
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct PendingUseCase {
    store: Arc<dyn MemoryStore>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
    min_log_chars: usize,
}

impl PendingUseCase {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
        min_log_chars: usize,
    ) -> Self {
        Self {
            store,
            clock,
            log,
            min_log_chars,
        }
    }

    /// 昨日（ローカル暦日）
    pub fn yesterday(&self) -> Result<DateKey, Error> {
        self.days_ago(1)
    }

    fn days_ago(&self, n: u64) -> Result<DateKey, Error> {
        DateKey::new(self.clock.today())
            .days_before(n)
            .ok_or_else(|| Error::system(format!("date out of range: {} days ago", n)))
    }

    /// ストア上の pending を一度だけ読んで索引にする
    pub fn load_index(&self) -> Result<PendingIndex, Error> {
        let (index, rejected) = PendingIndex::from_keys(self.store.pending_keys()?);
        for key in rejected {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "pending key ignored")
                    .layer("usecase")
                    .kind("pending")
                    .field("key", key),
            );
        }
        Ok(index)
    }

    /// 1 日分をマークする（date が None なら昨日）
    pub fn mark(&self, date: Option<DateKey>) -> Result<(DateKey, MarkOutcome), Error> {
        let date = match date {
            Some(d) => d,
            None => self.yesterday()?,
        };
        let mut index = self.load_index()?;
        let outcome = self.mark_with_index(&mut index, date)?;
        Ok((date, outcome))
    }

    /// 昨日から days 日前までを順にマークする。個別の I/O 失敗はバッチを止めない。
    pub fn batch_mark(&self, days: u32) -> Result<BatchMarkReport, Error> {
        let mut index = self.load_index()?;
        let mut report = BatchMarkReport::default();
        for n in 1..=u64::from(days) {
            let date = self.days_ago(n)?;
            match self.mark_with_index(&mut index, date) {
                Ok(outcome) => report.outcomes.push((date, outcome)),
                Err(e) => {
                    let _ = self.log.log(
                        &LogRecord::new(LogLevel::Error, "pending mark failed")
                            .layer("usecase")
                            .kind("pending")
                            .field("date", date.to_string())
                            .field("error", e.to_string()),
                    );
                    report.failures.push((date, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// 前提条件を順に確認し、すべて満たせばマーカーを書く
    pub fn mark_with_index(
        &self,
        index: &mut PendingIndex,
        date: DateKey,
    ) -> Result<MarkOutcome, Error> {
        let Some(content) = self.store.read(&DocKey::Log(date))? else {
            return Ok(self.skipped(date, SkipReason::LogMissing));
        };
        let log = DailyLog::new(date, content);
        if log.is_completed() {
            return Ok(self.skipped(date, SkipReason::AlreadyCompleted));
        }
        let chars = log.meaningful_chars();
        if chars < self.min_log_chars {
            return Ok(self.skipped(date, SkipReason::ContentTooShort { chars }));
        }
        if index.contains(&date) {
            return Ok(self.skipped(date, SkipReason::AlreadyPending));
        }

        let marker = PendingMarker {
            date: date.to_string(),
            file: self.store.locate(&DocKey::Log(date)).to_string_lossy().to_string(),
            chars: log.char_count(),
            created: self.clock.now_local().to_rfc3339(),
        };
        let body = serde_json::to_string(&marker)?;
        self.store.write(&DocKey::Pending(date), &body)?;
        index.insert(date);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "pending marked")
                .layer("usecase")
                .kind("pending")
                .field("date", date.to_string())
                .field("chars", marker.chars),
        );
        Ok(MarkOutcome::Marked(marker))
    }

    fn skipped(&self, date: DateKey, reason: SkipReason) -> MarkOutcome {
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "pending skipped")
                .layer("usecase")
                .kind("pending")
                .field("date", date.to_string())
                .field("reason", reason.to_string()),
        );
        MarkOutcome::Skipped(reason)
    }

    /// pending の日付（昇順）
    pub fn list(&self) -> Result<Vec<DateKey>, Error> {
        Ok(self.load_index()?.dates().copied().collect())
    }

    /// pending の日付と文字数（昇順）。読めない・壊れたマーカーは除外し、一覧は止めない。
    pub fn info(&self) -> Result<Vec<PendingInfo>, Error> {
        let mut out = Vec::new();
        for date in self.list()? {
            let record = LogRecord::new(LogLevel::Warn, "pending marker unreadable")
                .layer("usecase")
                .kind("pending")
                .field("date", date.to_string());
            let body = match self.store.read(&DocKey::Pending(date)) {
                Ok(body) => body,
                Err(e) => {
                    let _ = self.log.log(&record.field("error", e.to_string()));
                    continue;
                }
            };
            match body
                .and_then(|b| PendingMarker::parse(&b))
                .and_then(|m| m.info())
            {
                Some(info) => out.push(info),
                None => {
                    let _ = self.log.log(&record);
                }
            }
        }
        Ok(out)
    }
}
