//! テスト用のメモリ上 MemoryStore（キー単位で書き込み失敗を注入できる）

use crate::ports::outbound::{DocKey, MemoryStore};
use common::error::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryStore {
    docs: Mutex<BTreeMap<DocKey, String>>,
    /// 日付として読めない pending キー（壊れたファイル名の再現用）
    stray_pending_keys: Mutex<Vec<String>>,
    failing: Mutex<BTreeSet<DocKey>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: DocKey, contents: &str) {
        self.docs.lock().unwrap().insert(key, contents.to_string());
    }

    pub fn get(&self, key: &DocKey) -> Option<String> {
        self.docs.lock().unwrap().get(key).cloned()
    }

    pub fn insert_stray_pending_key(&self, key: &str) {
        self.stray_pending_keys.lock().unwrap().push(key.to_string());
    }

    /// key への write / append / copy（書き込み先として）を失敗させる
    pub fn fail_writes_to(&self, key: DocKey) {
        self.failing.lock().unwrap().insert(key);
    }

    fn check_writable(&self, key: &DocKey) -> Result<(), Error> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(Error::io_msg(format!("injected write failure: {:?}", key)));
        }
        Ok(())
    }
}

impl MemoryStore for InMemoryStore {
    fn exists(&self, key: &DocKey) -> bool {
        self.docs.lock().unwrap().contains_key(key)
    }

    fn read(&self, key: &DocKey) -> Result<Option<String>, Error> {
        Ok(self.get(key))
    }

    fn write(&self, key: &DocKey, contents: &str) -> Result<(), Error> {
        self.check_writable(key)?;
        self.insert(*key, contents);
        Ok(())
    }

    fn append(&self, key: &DocKey, text: &str) -> Result<(), Error> {
        self.check_writable(key)?;
        self.docs
            .lock()
            .unwrap()
            .entry(*key)
            .or_default()
            .push_str(text);
        Ok(())
    }

    fn copy(&self, from: &DocKey, to: &DocKey) -> Result<(), Error> {
        self.check_writable(to)?;
        let body = self
            .get(from)
            .ok_or_else(|| Error::io_msg(format!("copy source missing: {:?}", from)))?;
        self.insert(*to, &body);
        Ok(())
    }

    fn delete(&self, key: &DocKey) -> Result<bool, Error> {
        Ok(self.docs.lock().unwrap().remove(key).is_some())
    }

    fn pending_keys(&self) -> Result<Vec<String>, Error> {
        let mut keys: Vec<String> = self
            .docs
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| match k {
                DocKey::Pending(d) => Some(d.to_string()),
                _ => None,
            })
            .collect();
        keys.extend(self.stray_pending_keys.lock().unwrap().iter().cloned());
        // 実ファイルシステムと同じく順序に依存させない
        keys.reverse();
        Ok(keys)
    }

    fn locate(&self, key: &DocKey) -> PathBuf {
        PathBuf::from(format!("mem://{:?}", key))
    }
}
