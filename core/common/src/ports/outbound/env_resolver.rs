//! 環境変数解決 Outbound ポート
//!
//! メモリディレクトリ等の既定値・ログファイルパスを環境変数から解決する。
//! usecase は環境変数に触れず、ここで解決した値を構造体で受け取る。

use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリ（$HOME）
    fn home_dir(&self) -> Result<PathBuf, Error>;

    /// 名前付き環境変数を取得する（空文字列は未設定扱い）
    fn var(&self, name: &str) -> Option<String>;

    /// 構造化ログ（JSONL）の出力先
    ///
    /// 優先順位:
    /// 1. MEMLIFE_LOG
    /// 2. $XDG_STATE_HOME/memlife/logs/memlife.jsonl
    /// 3. $HOME/.local/state/memlife/logs/memlife.jsonl
    fn resolve_log_file_path(&self) -> Result<PathBuf, Error> {
        if let Some(p) = self.var("MEMLIFE_LOG") {
            return Ok(PathBuf::from(p));
        }
        let state = match self.var("XDG_STATE_HOME") {
            Some(s) => PathBuf::from(s),
            None => self.home_dir()?.join(".local").join("state"),
        };
        Ok(state.join("memlife").join("logs").join("memlife.jsonl"))
    }
}
