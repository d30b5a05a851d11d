//! Outbound ポート: ユースケースがメモリ文書に触れるための trait

pub mod memory_store;

pub use memory_store::{DocKey, MemoryStore};
