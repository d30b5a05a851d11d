//! MemoryConfig の解決（CLI オプション → 環境変数 → 既定値）
//!
//! 環境変数を読むのはここだけ。usecase は解決済みの MemoryConfig を受け取る。

use crate::domain::MemoryConfig;
use common::error::Error;
use common::ports::outbound::EnvResolver;
use std::path::PathBuf;
use std::sync::Arc;

const ENV_MEMORY_DIR: &str = "MEMORY_DIR";
const ENV_MEMORY_PATH: &str = "MEMORY_PATH";
const ENV_ARCHIVE_DIR: &str = "ARCHIVE_DIR";

/// CLI で明示されたパス
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub memory_dir: Option<String>,
    pub summary: Option<String>,
    pub archive_dir: Option<String>,
}

pub struct StdConfigResolver {
    env: Arc<dyn EnvResolver>,
}

impl StdConfigResolver {
    pub fn new(env: Arc<dyn EnvResolver>) -> Self {
        Self { env }
    }

    /// 優先順位:
    /// 1. --memory-dir / --summary / --archive-dir
    /// 2. MEMORY_DIR / MEMORY_PATH / ARCHIVE_DIR
    /// 3. ~/memory, ~/MEMORY.md, <memory-dir>/archive
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<MemoryConfig, Error> {
        let root_dir = match self.pick(&overrides.memory_dir, ENV_MEMORY_DIR) {
            Some(p) => self.expand(&p)?,
            None => self.env.home_dir()?.join("memory"),
        };
        let summary_path = match self.pick(&overrides.summary, ENV_MEMORY_PATH) {
            Some(p) => self.expand(&p)?,
            None => self.env.home_dir()?.join("MEMORY.md"),
        };
        let archive_dir = match self.pick(&overrides.archive_dir, ENV_ARCHIVE_DIR) {
            Some(p) => self.expand(&p)?,
            None => root_dir.join("archive"),
        };
        Ok(MemoryConfig::new(root_dir, summary_path, archive_dir))
    }

    fn pick(&self, explicit: &Option<String>, env_name: &str) -> Option<String> {
        explicit
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.env.var(env_name))
    }

    /// 先頭の `~` / `~/` をホームに展開する
    fn expand(&self, p: &str) -> Result<PathBuf, Error> {
        if p == "~" {
            return self.env.home_dir();
        }
        match p.strip_prefix("~/") {
            Some(rest) => Ok(self.env.home_dir()?.join(rest)),
            None => Ok(PathBuf::from(p)),
        }
    }
}
