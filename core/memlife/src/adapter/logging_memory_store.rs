//! 書き込み系の操作をログに記録する MemoryStore のラッパ

use crate::ports::outbound::{DocKey, MemoryStore};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::path::PathBuf;
use std::sync::Arc;

pub struct LoggingMemoryStore {
    inner: Arc<dyn MemoryStore>,
    log: Arc<dyn Log>,
}

impl LoggingMemoryStore {
    pub fn new(inner: Arc<dyn MemoryStore>, log: Arc<dyn Log>) -> Self {
        Self { inner, log }
    }

    fn record(&self, operation: &str, key: &DocKey, result: &Result<(), Error>) {
        let rec = match result {
            Ok(()) => LogRecord::new(LogLevel::Info, "memory write"),
            Err(e) => LogRecord::new(LogLevel::Error, "memory write failed")
                .field("error", e.to_string()),
        };
        let rec = rec
            .layer("adapter")
            .kind("store")
            .field("operation", operation)
            .field("path", self.inner.locate(key).to_string_lossy().to_string());
        let _ = self.log.log(&rec);
    }
}

impl MemoryStore for LoggingMemoryStore {
    fn exists(&self, key: &DocKey) -> bool {
        self.inner.exists(key)
    }

    fn read(&self, key: &DocKey) -> Result<Option<String>, Error> {
        self.inner.read(key)
    }

    fn write(&self, key: &DocKey, contents: &str) -> Result<(), Error> {
        let r = self.inner.write(key, contents);
        self.record("write", key, &r);
        r
    }

    fn append(&self, key: &DocKey, text: &str) -> Result<(), Error> {
        let r = self.inner.append(key, text);
        self.record("append", key, &r);
        r
    }

    fn copy(&self, from: &DocKey, to: &DocKey) -> Result<(), Error> {
        let r = self.inner.copy(from, to);
        self.record("copy", to, &r);
        r
    }

    fn delete(&self, key: &DocKey) -> Result<bool, Error> {
        let r = self.inner.delete(key);
        if let Ok(true) = r {
            self.record("delete", key, &Ok(()));
        }
        r
    }

    fn pending_keys(&self) -> Result<Vec<String>, Error> {
        self.inner.pending_keys()
    }

    fn locate(&self, key: &DocKey) -> PathBuf {
        self.inner.locate(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureLog(Mutex<Vec<LogRecord>>);

    impl Log for CaptureLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn test_mutations_are_logged_reads_are_not() {
        let inner = Arc::new(InMemoryStore::new());
        let log = Arc::new(CaptureLog::default());
        let store = LoggingMemoryStore::new(inner.clone(), log.clone());

        store.write(&DocKey::Summary, "x").unwrap();
        let _ = store.read(&DocKey::Summary).unwrap();
        store.copy(&DocKey::Summary, &DocKey::SummaryBackup).unwrap();
        assert!(store.delete(&DocKey::SummaryBackup).unwrap());
        assert!(!store.delete(&DocKey::SummaryBackup).unwrap());

        let recs = log.0.lock().unwrap();
        let ops: Vec<String> = recs
            .iter()
            .map(|r| r.fields.as_ref().unwrap()["operation"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ops, vec!["write", "copy", "delete"]);
    }

    #[test]
    fn test_failed_write_is_logged_as_error() {
        let inner = Arc::new(InMemoryStore::new());
        inner.fail_writes_to(DocKey::Summary);
        let log = Arc::new(CaptureLog::default());
        let store = LoggingMemoryStore::new(inner, log.clone());

        assert!(store.write(&DocKey::Summary, "x").is_err());
        let recs = log.0.lock().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].level, LogLevel::Error);
        assert!(recs[0].fields.as_ref().unwrap().contains_key("error"));
    }
}
