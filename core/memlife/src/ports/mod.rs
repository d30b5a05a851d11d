//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: メモリ文書の読み書き（common の FileSystem / Clock / Log も利用）

pub mod inbound;
pub mod outbound;
