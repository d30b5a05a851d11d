//! 時刻 Outbound ポート
//!
//! usecase はこの trait 経由で「現在時刻」と「今日の日付」を取得する。

use chrono::{DateTime, Local, NaiveDate, Utc};

/// 時刻取得の抽象
///
/// 実装は `common::adapter::StdClock` やテスト用の `FixedClock`。
pub trait Clock: Send + Sync {
    /// 現在時刻（UTC）
    fn now(&self) -> DateTime<Utc>;

    /// 今日の暦日（ローカルタイムゾーン）
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }

    /// 現在時刻（ローカルタイムゾーン）。表示用タイムスタンプに使う。
    fn now_local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }
}
