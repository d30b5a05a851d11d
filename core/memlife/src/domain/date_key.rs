//! 暦日キー（YYYY-MM-DD）と年月キー（YYYY-MM）
//!
//! ログ・pending マーカーの識別子は日付文字列そのもの。辞書順がそのまま日付順になる。

use chrono::{Datelike, Days, NaiveDate};
use common::error::Error;
use std::fmt;
use std::str::FromStr;

/// 1 日分のログを識別するキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// `YYYY-MM-DD` 厳密形式のみ受け付ける（`2026-2-5` などは None）
    pub fn parse(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self)
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.0)
    }

    /// n 日前のキー（暦の範囲外なら None）
    pub fn days_before(&self, n: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(n)).map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            Error::invalid_argument(format!("invalid date '{}': expected YYYY-MM-DD", s))
        })
    }
}

/// 月次ファイル（insights / archive）を識別するキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 見出し用の表記（例: "February 2026"）
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
