//! MEMORY.md の期限判定（文書 + 基準日 → kept / expired の分割）
//!
//! 純粋関数。同じ内容・同じ基準日なら何度走らせても同じ分割になる。

use crate::domain::summary::{parse_document, ParsedLine, SummaryEntry};
use crate::domain::TtlTable;
use chrono::NaiveDate;

const SUMMARY_PREVIEW_CHARS: usize = 60;

/// 期限切れと判定されたエントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredEntry {
    pub entry: SummaryEntry,
    pub age_days: i64,
    pub ttl_days: i64,
    /// 元の行（改行込み、書式そのまま）
    pub raw: String,
}

impl ExpiredEntry {
    /// レポート用 1 行: `[P2][2020-01-01] (45d > 30d TTL) old note`
    pub fn summary_line(&self) -> String {
        let preview: String = self.entry.text.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        format!(
            "[{}][{}] ({}d > {}d TTL) {}",
            self.entry.priority.tag(),
            self.entry.date.format("%Y-%m-%d"),
            self.age_days,
            self.ttl_days,
            preview
        )
    }

    /// アーカイブへ書く行（末尾改行を保証）
    pub fn archive_line(&self) -> String {
        if self.raw.ends_with('\n') {
            self.raw.clone()
        } else {
            format!("{}\n", self.raw)
        }
    }
}

/// 1 回のスキャン結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryScan {
    pub total_lines: usize,
    /// 残す行（元の順序・元の改行のまま）
    pub kept: Vec<String>,
    /// 期限切れ（元の順序）
    pub expired: Vec<ExpiredEntry>,
}

impl ExpiryScan {
    /// `today` を基準に各エントリの経過日数を TTL と比べる（経過日数 > TTL で期限切れ）
    pub fn scan(content: &str, today: NaiveDate, ttl: &TtlTable) -> Self {
        let lines = parse_document(content);
        let total_lines = lines.len();
        let mut kept = Vec::new();
        let mut expired = Vec::new();
        for line in lines {
            match line {
                ParsedLine::Entry { entry, raw } => {
                    let age_days = (today - entry.date).num_days();
                    match ttl.ttl_days(entry.priority) {
                        Some(ttl_days) if age_days > ttl_days => expired.push(ExpiredEntry {
                            entry,
                            age_days,
                            ttl_days,
                            raw: raw.to_string(),
                        }),
                        _ => kept.push(raw.to_string()),
                    }
                }
                ParsedLine::Raw(raw) => kept.push(raw.to_string()),
            }
        }
        Self {
            total_lines,
            kept,
            expired,
        }
    }

    pub fn has_expired(&self) -> bool {
        !self.expired.is_empty()
    }

    /// 残す行のうち空白のみでない行の数
    pub fn kept_nonblank(&self) -> usize {
        self.kept.iter().filter(|l| !l.trim().is_empty()).count()
    }

    /// 上限を超えていれば超えた行数ではなく現在の行数を返す
    pub fn over_capacity(&self, max_lines: usize) -> Option<usize> {
        let n = self.kept_nonblank();
        (n > max_lines).then_some(n)
    }

    /// 書き戻す文書（kept の連結）
    pub fn kept_document(&self) -> String {
        self.kept.concat()
    }
}
