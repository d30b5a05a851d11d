//! アダプター（ports::outbound の実装と設定解決）

pub(crate) mod fs_memory_store;
#[cfg(test)]
pub(crate) mod in_memory_store;
pub(crate) mod logging_memory_store;
pub(crate) mod std_config_resolver;

pub(crate) use fs_memory_store::FsMemoryStore;
#[cfg(test)]
pub(crate) use in_memory_store::InMemoryStore;
pub(crate) use logging_memory_store::LoggingMemoryStore;
pub(crate) use std_config_resolver::{ConfigOverrides, StdConfigResolver};
