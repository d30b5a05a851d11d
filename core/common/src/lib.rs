//! memlife 共通ライブラリ
//!
//! エラー型と、ファイル・時刻・ログ・環境変数へ触れるための Outbound ポートと標準アダプタを提供します。

/// エラーハンドリング
pub mod error;

/// Outbound ポート（trait）
pub mod ports;

/// 標準アダプタ（ports の実装）
pub mod adapter;
