//! ドメイン型（Newtype、enum、ルール）
//!
//! I/O を持たない純粋な型と判定ロジック。usecase から呼ばれ、単体でテストできる。

pub mod command;
pub mod config;
pub mod daily_log;
pub mod date_key;
pub mod expiry;
pub mod pending;
pub mod reflection;
pub mod summary;

pub use config::MemoryConfig;
pub use daily_log::DailyLog;
pub use date_key::{DateKey, MonthKey};
pub use expiry::ExpiryScan;
pub use pending::{
    BatchMarkReport, MarkOutcome, PendingIndex, PendingInfo, PendingMarker, SkipReason,
};
pub use reflection::BatchInstructions;
pub use summary::TtlTable;
