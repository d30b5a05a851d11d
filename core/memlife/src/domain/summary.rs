//! MEMORY.md のエントリ行と優先度ごとの TTL
//!
//! エントリ行の形式: `- [P1][2026-02-05] text`
//! 形式に合わない行（見出し・自由記述・日付が壊れた行）は Raw として常に残す。

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const P1_TTL_DAYS: i64 = 90;
const P2_TTL_DAYS: i64 = 30;

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\s*-\s+)\[([Pp]\d{1,3})\]\[(\d{4}-\d{2}-\d{2})\]\s*(.*)$")
            .expect("entry pattern is valid")
    })
}

/// 優先度（耐久性クラス）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// P0: 期限なし
    Permanent,
    /// P1
    LongLived,
    /// P2
    ShortLived,
    /// P3 以降など未定義の数値
    Other(u16),
}

impl Priority {
    /// `P0` / `p2` などのタグから（数値でなければ None）
    pub fn from_tag(tag: &str) -> Option<Self> {
        let n: u16 = tag.strip_prefix(['P', 'p'])?.parse().ok()?;
        Some(match n {
            0 => Priority::Permanent,
            1 => Priority::LongLived,
            2 => Priority::ShortLived,
            n => Priority::Other(n),
        })
    }

    pub fn tag(&self) -> String {
        match self {
            Priority::Permanent => "P0".to_string(),
            Priority::LongLived => "P1".to_string(),
            Priority::ShortLived => "P2".to_string(),
            Priority::Other(n) => format!("P{}", n),
        }
    }
}

/// 優先度 → TTL（日数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlTable {
    pub long_lived_days: i64,
    pub short_lived_days: i64,
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            long_lived_days: P1_TTL_DAYS,
            short_lived_days: P2_TTL_DAYS,
        }
    }
}

impl TtlTable {
    /// None は期限なし。未定義の優先度は標準 TTL のうち最長を使う（残す側に倒す）。
    pub fn ttl_days(&self, priority: Priority) -> Option<i64> {
        match priority {
            Priority::Permanent => None,
            Priority::LongLived => Some(self.long_lived_days),
            Priority::ShortLived => Some(self.short_lived_days),
            Priority::Other(_) => Some(self.longest()),
        }
    }

    pub fn longest(&self) -> i64 {
        self.long_lived_days.max(self.short_lived_days)
    }
}

/// 構造化エントリ 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub priority: Priority,
    pub date: NaiveDate,
    pub text: String,
}

/// 1 行の解析結果。raw は改行を含む元の行そのもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    Entry { entry: SummaryEntry, raw: &'a str },
    Raw(&'a str),
}

#[cfg(test)]
impl<'a> ParsedLine<'a> {
    pub(crate) fn raw(&self) -> &'a str {
        match self {
            ParsedLine::Entry { raw, .. } | ParsedLine::Raw(raw) => raw,
        }
    }
}

/// 1 行（改行込みでよい）を解析する。I/O なし。
pub fn parse_line(raw: &str) -> ParsedLine<'_> {
    let body = raw.trim_end_matches(['\n', '\r']);
    let Some(caps) = entry_re().captures(body) else {
        return ParsedLine::Raw(raw);
    };
    let Some(priority) = Priority::from_tag(&caps[2]) else {
        return ParsedLine::Raw(raw);
    };
    // 形は合っていても暦として無効な日付（2026-13-40 等）は残す
    let Ok(date) = NaiveDate::parse_from_str(&caps[3], "%Y-%m-%d") else {
        return ParsedLine::Raw(raw);
    };
    ParsedLine::Entry {
        entry: SummaryEntry {
            priority,
            date,
            text: caps[4].to_string(),
        },
        raw,
    }
}

/// 文書を行に分割して解析する（各行は元の改行を保持）
pub fn parse_document(content: &str) -> Vec<ParsedLine<'_>> {
    content.split_inclusive('\n').map(parse_line).collect()
}
