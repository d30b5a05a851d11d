//! 抽出プロンプト生成のユースケース

use crate::domain::reflection::{render_prompt, truncate_recent};
use crate::domain::{DailyLog, DateKey};
use crate::ports::outbound::{DocKey, MemoryStore};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct ExtractionUseCase {
    store: Arc<dyn MemoryStore>,
    log: Arc<dyn Log>,
    max_prompt_chars: usize,
}

impl ExtractionUseCase {
    pub fn new(store: Arc<dyn MemoryStore>, log: Arc<dyn Log>, max_prompt_chars: usize) -> Self {
        Self {
            store,
            log,
            max_prompt_chars,
        }
    }

    /// 指定日のログから抽出プロンプトを作る。ログが無ければ None。
    pub fn prepare(&self, date: DateKey) -> Result<Option<String>, Error> {
        let Some(content) = self.store.read(&DocKey::Log(date))? else {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Warn, "log not found")
                    .layer("usecase")
                    .kind("extraction")
                    .field("date", date.to_string()),
            );
            return Ok(None);
        };
        let log = DailyLog::new(date, content);
        let chars = log.char_count();
        let (excerpt, truncated) = truncate_recent(&log.content, self.max_prompt_chars);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "extraction prompt prepared")
                .layer("usecase")
                .kind("extraction")
                .field("date", date.to_string())
                .field("chars", chars)
                .field("truncated", truncated),
        );
        Ok(Some(render_prompt(&date, &excerpt, chars)))
    }
}
