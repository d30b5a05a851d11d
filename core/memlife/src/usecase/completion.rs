//! 抽出結果の保存と完了マークのユースケース
//!
//! - save_insights: 月次 insights へ無条件に追記（重複防止は完了注記の側で行う）
//! - mark_complete: ログ先頭に注記を付け、pending マーカーを消す
//! - batch_instructions: pending 全件の処理手順（読み取りのみ）

use crate::domain::{BatchInstructions, DailyLog, DateKey};
use crate::ports::outbound::{DocKey, MemoryStore};
use crate::usecase::PendingUseCase;
use common::error::Error;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    LogMissing,
    Completed {
        /// 今回注記を付けたか（既に注記済みなら false）
        annotated: bool,
        /// pending マーカーを消したか
        marker_removed: bool,
    },
}

pub struct CompletionUseCase {
    store: Arc<dyn MemoryStore>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
    pending: Arc<PendingUseCase>,
    /// 手順に埋め込む実行ファイル名
    program: String,
}

impl CompletionUseCase {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
        pending: Arc<PendingUseCase>,
        program: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            log,
            pending,
            program: program.into(),
        }
    }

    /// 月次 insights に追記し、書いたファイルのパスを返す
    pub fn save_insights(&self, date: DateKey, text: &str) -> Result<PathBuf, Error> {
        let month = date.month();
        let key = DocKey::Insights(month);
        let mut block = String::new();
        if !self.store.exists(&key) {
            block.push_str(&format!("# Insights - {}\n\n", month.label()));
        }
        let stamp = self.clock.now_local().format("%Y-%m-%d %H:%M");
        block.push_str(&format!(
            "\n{}\n\n*Extracted {}*\n\n---\n",
            text.trim_end_matches(['\n', '\r']),
            stamp
        ));
        self.store.append(&key, &block)?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "insights saved")
                .layer("usecase")
                .kind("completion")
                .field("date", date.to_string())
                .field("month", month.to_string())
                .field("chars", text.chars().count()),
        );
        Ok(self.store.locate(&key))
    }

    /// ログを抽出済みにする
    pub fn mark_complete(&self, date: DateKey) -> Result<CompletionOutcome, Error> {
        let Some(content) = self.store.read(&DocKey::Log(date))? else {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "log not found")
                    .layer("usecase")
                    .kind("completion")
                    .field("date", date.to_string()),
            );
            return Ok(CompletionOutcome::LogMissing);
        };
        let log = DailyLog::new(date, content);
        let annotated = match log.annotated(self.clock.today()) {
            Some(updated) => {
                self.store.write(&DocKey::Log(date), &updated)?;
                true
            }
            None => false,
        };
        let marker_removed = self.store.delete(&DocKey::Pending(date))?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "log completed")
                .layer("usecase")
                .kind("completion")
                .field("date", date.to_string())
                .field("annotated", annotated)
                .field("marker_removed", marker_removed),
        );
        Ok(CompletionOutcome::Completed {
            annotated,
            marker_removed,
        })
    }

    /// pending 全件の処理手順。ストアは変更しない。
    pub fn batch_instructions(&self) -> Result<BatchInstructions, Error> {
        let pending = self.pending.info()?;
        Ok(BatchInstructions::build(&self.program, &pending))
    }
}
