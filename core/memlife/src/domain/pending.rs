//! pending キュー（抽出待ちログ）のドメイン型

use crate::domain::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// `.pending/<date>.pending` の中身（JSON）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMarker {
    pub date: String,
    /// 元ログのパス
    pub file: String,
    /// マーク時点のログ文字数
    pub chars: usize,
    /// 作成時刻（RFC3339）
    pub created: String,
}

impl PendingMarker {
    /// 壊れたマーカー・日付が読めないマーカーは None
    pub fn parse(body: &str) -> Option<Self> {
        let marker: PendingMarker = serde_json::from_str(body).ok()?;
        DateKey::parse(&marker.date)?;
        Some(marker)
    }

    pub fn info(&self) -> Option<PendingInfo> {
        Some(PendingInfo {
            date: DateKey::parse(&self.date)?,
            chars: self.chars,
        })
    }
}

/// 一覧・バッチ指示用の要約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInfo {
    pub date: DateKey,
    pub chars: usize,
}

/// 1 回の起動で一度だけ読み込む pending 日付の集合
///
/// 重複マークの判定はこの集合で行い、マークに成功したら insert する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingIndex {
    dates: BTreeSet<DateKey>,
}

impl PendingIndex {
    /// キー文字列から作る。日付として読めないキーは `rejected` に返す。
    pub fn from_keys<I, S>(keys: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dates = BTreeSet::new();
        let mut rejected = Vec::new();
        for k in keys {
            match DateKey::parse(k.as_ref()) {
                Some(d) => {
                    dates.insert(d);
                }
                None => rejected.push(k.as_ref().to_string()),
            }
        }
        (Self { dates }, rejected)
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.dates.contains(date)
    }

    /// 新規なら true
    pub fn insert(&mut self, date: DateKey) -> bool {
        self.dates.insert(date)
    }

    /// 昇順
    pub fn dates(&self) -> impl Iterator<Item = &DateKey> {
        self.dates.iter()
    }
}

/// マークしなかった理由（判定順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    LogMissing,
    AlreadyCompleted,
    ContentTooShort { chars: usize },
    AlreadyPending,
}

impl SkipReason {
    /// 処理済み系（定常状態で起きる想定内のスキップ）か
    pub fn is_already_processed(&self) -> bool {
        matches!(self, SkipReason::AlreadyCompleted | SkipReason::AlreadyPending)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::LogMissing => write!(f, "log not found"),
            SkipReason::AlreadyCompleted => write!(f, "already processed"),
            SkipReason::ContentTooShort { chars } => {
                write!(f, "content too short ({} chars)", chars)
            }
            SkipReason::AlreadyPending => write!(f, "already pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked(PendingMarker),
    Skipped(SkipReason),
}

impl MarkOutcome {
    pub fn is_marked(&self) -> bool {
        matches!(self, MarkOutcome::Marked(_))
    }
}

/// batch-mark の結果。個別日付の失敗はバッチを止めない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMarkReport {
    pub outcomes: Vec<(DateKey, MarkOutcome)>,
    /// I/O 失敗した日付とメッセージ
    pub failures: Vec<(DateKey, String)>,
}

impl BatchMarkReport {
    pub fn marked(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_marked()).count()
    }
}
