//! 日次ログと「抽出済み」注記
//!
//! 抽出が終わったログは先頭に `<!-- compounded: YYYY-MM-DD -->` を付ける。
//! 注記があるログは二度と pending にならない。

use crate::domain::DateKey;
use chrono::NaiveDate;

const COMPLETION_TAG: &str = "<!-- compounded";

/// 抽出済み注記の 1 行（改行込み）
pub fn completion_annotation(on: NaiveDate) -> String {
    format!("{}: {} -->\n", COMPLETION_TAG, on.format("%Y-%m-%d"))
}

/// 1 日分のログ（内容は外部＝エージェントが書く）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLog {
    pub date: DateKey,
    pub content: String,
}

impl DailyLog {
    pub fn new(date: DateKey, content: impl Into<String>) -> Self {
        Self {
            date,
            content: content.into(),
        }
    }

    /// 先頭の HTML コメント行のいずれかが抽出済み注記なら true
    pub fn is_completed(&self) -> bool {
        self.content
            .trim_start()
            .lines()
            .map(str::trim_start)
            .take_while(|l| l.starts_with("<!--"))
            .any(|l| l.starts_with(COMPLETION_TAG))
    }

    /// ノイズ判定用の文字数（前後の空白を除く）
    pub fn meaningful_chars(&self) -> usize {
        self.content.trim().chars().count()
    }

    /// 全体の文字数（マーカーに記録する値）
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// 注記を先頭に付けた内容。既に注記済みなら None（二重付与しない）。
    pub fn annotated(&self, on: NaiveDate) -> Option<String> {
        if self.is_completed() {
            return None;
        }
        Some(format!("{}{}", completion_annotation(on), self.content))
    }
}
