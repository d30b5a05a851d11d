//! ファイルシステム上の MemoryStore 実装
//!
//! 論理キーを MemoryConfig の規約でパスに変換し、I/O は common の FileSystem に委譲する。

use crate::domain::MemoryConfig;
use crate::ports::outbound::{DocKey, MemoryStore};
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FsMemoryStore {
    fs: Arc<dyn FileSystem>,
    config: MemoryConfig,
}

impl FsMemoryStore {
    pub fn new(fs: Arc<dyn FileSystem>, config: MemoryConfig) -> Self {
        Self { fs, config }
    }

    fn path(&self, key: &DocKey) -> PathBuf {
        match key {
            DocKey::Log(d) => self.config.log_path(d),
            DocKey::Pending(d) => self.config.pending_path(d),
            DocKey::Insights(m) => self.config.insights_path(m),
            DocKey::Summary => self.config.summary_path.clone(),
            DocKey::SummaryBackup => self.config.backup_path(),
            DocKey::ExpiredArchive(m) => self.config.archive_path(m),
        }
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), Error> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.fs.exists(parent) => {
                self.fs.create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

impl MemoryStore for FsMemoryStore {
    fn exists(&self, key: &DocKey) -> bool {
        self.fs
            .metadata(&self.path(key))
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    fn read(&self, key: &DocKey) -> Result<Option<String>, Error> {
        if !self.exists(key) {
            return Ok(None);
        }
        self.fs.read_to_string(&self.path(key)).map(Some)
    }

    fn write(&self, key: &DocKey, contents: &str) -> Result<(), Error> {
        let path = self.path(key);
        self.ensure_parent(&path)?;
        self.fs.write(&path, contents)
    }

    fn append(&self, key: &DocKey, text: &str) -> Result<(), Error> {
        let path = self.path(key);
        self.ensure_parent(&path)?;
        let mut w = self.fs.open_append(&path)?;
        w.write_all(text.as_bytes())
            .and_then(|_| w.flush())
            .map_err(|e| Error::io_msg(format!("Failed to append '{}': {}", path.display(), e)))
    }

    fn copy(&self, from: &DocKey, to: &DocKey) -> Result<(), Error> {
        let to_path = self.path(to);
        self.ensure_parent(&to_path)?;
        self.fs.copy(&self.path(from), &to_path)
    }

    fn delete(&self, key: &DocKey) -> Result<bool, Error> {
        if !self.exists(key) {
            return Ok(false);
        }
        self.fs.remove_file(&self.path(key))?;
        Ok(true)
    }

    fn pending_keys(&self) -> Result<Vec<String>, Error> {
        let dir = self.config.pending_dir();
        if !self.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        Ok(self
            .fs
            .read_dir(&dir)?
            .iter()
            .filter_map(|p| self.config.pending_key_of(p))
            .collect())
    }

    fn locate(&self, key: &DocKey) -> PathBuf {
        self.path(key)
    }
}
