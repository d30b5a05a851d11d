//! メモリ設定（ルート・MEMORY.md・アーカイブの場所としきい値）
//!
//! 環境変数の解決は adapter（StdConfigResolver）で行い、ここは値を運ぶだけ。

use crate::domain::{DateKey, MonthKey, TtlTable};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const PENDING_SUBDIR: &str = ".pending";
const INSIGHTS_SUBDIR: &str = "insights";
const PENDING_EXT: &str = "pending";
const BACKUP_SUFFIX: &str = ".bak";

/// これ未満の文字数（前後の空白を除く）のログはノイズとして扱う
pub const DEFAULT_MIN_LOG_CHARS: usize = 100;
/// 抽出プロンプトに含めるログの最大文字数（超えた分は古い方から捨てる）
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 15_000;
/// MEMORY.md の空でない行数の目安
pub const DEFAULT_MAX_SUMMARY_LINES: usize = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    /// 日次ログのルート（`<root>/YYYY-MM-DD.md`）
    pub root_dir: PathBuf,
    /// 常時ロードされるサマリ文書（MEMORY.md）
    pub summary_path: PathBuf,
    /// 期限切れエントリの月次アーカイブ置き場
    pub archive_dir: PathBuf,
    pub min_log_chars: usize,
    pub max_prompt_chars: usize,
    pub max_summary_lines: usize,
    pub ttl: TtlTable,
}

impl MemoryConfig {
    /// パスだけ指定し、しきい値は既定値
    pub fn new(
        root_dir: impl Into<PathBuf>,
        summary_path: impl Into<PathBuf>,
        archive_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            summary_path: summary_path.into(),
            archive_dir: archive_dir.into(),
            min_log_chars: DEFAULT_MIN_LOG_CHARS,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            max_summary_lines: DEFAULT_MAX_SUMMARY_LINES,
            ttl: TtlTable::default(),
        }
    }

    pub fn log_path(&self, date: &DateKey) -> PathBuf {
        self.root_dir.join(format!("{}.md", date))
    }

    pub fn pending_dir(&self) -> PathBuf {
        self.root_dir.join(PENDING_SUBDIR)
    }

    pub fn pending_path(&self, date: &DateKey) -> PathBuf {
        self.pending_dir().join(format!("{}.{}", date, PENDING_EXT))
    }

    /// pending ディレクトリ内のパスからキー文字列を取り出す（拡張子が違えば None）
    pub fn pending_key_of(&self, path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(PENDING_EXT) {
            return None;
        }
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
    }

    pub fn insights_dir(&self) -> PathBuf {
        self.root_dir.join(INSIGHTS_SUBDIR)
    }

    pub fn insights_path(&self, month: &MonthKey) -> PathBuf {
        self.insights_dir().join(format!("{}.md", month))
    }

    pub fn archive_path(&self, month: &MonthKey) -> PathBuf {
        self.archive_dir.join(format!("expired-{}.md", month))
    }

    /// MEMORY.md と同じディレクトリの `MEMORY.md.bak`
    pub fn backup_path(&self) -> PathBuf {
        let mut name: OsString = self
            .summary_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("MEMORY.md"));
        name.push(BACKUP_SUFFIX);
        self.summary_path.with_file_name(name)
    }
}
