//! 実ファイルシステム（tempfile）を使った結合テスト

mod janitor_tests;
mod lifecycle_tests;
