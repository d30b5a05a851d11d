//! CLI 境界（引数解析のみ。usecase は cli に依存しない）

mod args;

pub use args::{config_to_command, parse_args, print_completion, ParseOutcome, PROGRAM};
