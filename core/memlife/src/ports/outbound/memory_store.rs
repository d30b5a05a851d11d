//! メモリ文書ストア Outbound ポート
//!
//! ログ・pending マーカー・insights・MEMORY.md・バックアップ・アーカイブを論理キーで扱う。
//! usecase はファイルパスを知らず、この trait の能力（exists / read / write / append / copy / delete）だけを使う。

use crate::domain::{DateKey, MonthKey};
use common::error::Error;
use std::path::PathBuf;

/// 論理文書キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocKey {
    Log(DateKey),
    Pending(DateKey),
    Insights(MonthKey),
    Summary,
    SummaryBackup,
    ExpiredArchive(MonthKey),
}

/// メモリ文書ストア（Outbound ポート）
///
/// 実装は adapter::FsMemoryStore（ファイル）、adapter::LoggingMemoryStore（ログ付きラッパ）、
/// テスト用の adapter::InMemoryStore。
pub trait MemoryStore: Send + Sync {
    fn exists(&self, key: &DocKey) -> bool;

    /// 存在しなければ Ok(None)
    fn read(&self, key: &DocKey) -> Result<Option<String>, Error>;

    /// 全体を上書き（親ディレクトリは必要なら作る）
    fn write(&self, key: &DocKey, contents: &str) -> Result<(), Error>;

    /// 末尾に追記（無ければ作成）
    fn append(&self, key: &DocKey, text: &str) -> Result<(), Error>;

    /// from の内容で to を上書き
    fn copy(&self, from: &DocKey, to: &DocKey) -> Result<(), Error>;

    /// 削除。無くてもエラーにしない（削除したら true）
    fn delete(&self, key: &DocKey) -> Result<bool, Error>;

    /// pending マーカーの識別子（ファイル名の stem）一覧。順序は保証しない。
    fn pending_keys(&self) -> Result<Vec<String>, Error>;

    /// 表示用の実体パス
    fn locate(&self, key: &DocKey) -> PathBuf;
}
