//! memlife コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、main の match でディスパッチする。

use crate::domain::DateKey;
use common::error::Error;
use std::path::PathBuf;

/// janitor の command_args に入る dry run 指定
pub const DRY_RUN_ARG: &str = "dry-run";

fn required_date(command: &str, arg: Option<&str>) -> Result<DateKey, Error> {
    arg.ok_or_else(|| Error::invalid_argument(format!("{} requires a date (YYYY-MM-DD)", command)))?
        .parse()
}

/// memlife のサブコマンド
///
/// コマンドなし = 昨日のログを pending にマーク。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ヘルプ表示
    Help,

    /// 指定日（None なら昨日）を pending にマーク
    Mark { date: Option<DateKey> },

    /// 過去 N 日分（昨日〜N 日前）をまとめてマーク
    BatchMark { days: u32 },

    /// pending 一覧
    List,

    /// pending 全件の処理指示を出力
    Process,

    /// 指定日の抽出プロンプトを出力
    Extract { date: DateKey },

    /// 抽出結果を月次 insights に追記（file が None なら stdin）
    Save { date: DateKey, file: Option<PathBuf> },

    /// 指定日を抽出済みにする
    Done { date: DateKey },

    /// MEMORY.md の期限切れエントリをアーカイブ
    Janitor { dry_run: bool },
}

impl Command {
    /// コマンド名と引数から Command に解析する（None はコマンドなし＝昨日をマーク）
    pub fn parse_with_args(name: Option<&str>, args: &[String]) -> Result<Self, Error> {
        let first = args.first().map(|s| s.as_str());
        match name {
            None => Ok(Command::Mark { date: None }),
            Some("help") => Ok(Command::Help),
            Some("mark") => Ok(Command::Mark {
                date: first.map(str::parse::<DateKey>).transpose()?,
            }),
            Some("batch-mark") => {
                let raw = first.ok_or_else(|| {
                    Error::invalid_argument("batch-mark requires the number of days")
                })?;
                let days = raw.parse::<u32>().map_err(|_| {
                    Error::invalid_argument(format!("invalid number of days: '{}'", raw))
                })?;
                Ok(Command::BatchMark { days })
            }
            Some("list") => Ok(Command::List),
            Some("process") => Ok(Command::Process),
            Some("extract") => Ok(Command::Extract {
                date: required_date("extract", first)?,
            }),
            Some("save") => Ok(Command::Save {
                date: required_date("save", first)?,
                file: args.get(1).map(PathBuf::from),
            }),
            Some("done") => Ok(Command::Done {
                date: required_date("done", first)?,
            }),
            Some("janitor") => Ok(Command::Janitor {
                dry_run: args.iter().any(|a| a == DRY_RUN_ARG),
            }),
            Some(other) => Err(Error::invalid_argument(format!(
                "Command '{}' is not implemented.",
                other
            ))),
        }
    }

    /// ログ用の短い名前
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Mark { .. } => "mark",
            Command::BatchMark { .. } => "batch-mark",
            Command::List => "list",
            Command::Process => "process",
            Command::Extract { .. } => "extract",
            Command::Save { .. } => "save",
            Command::Done { .. } => "done",
            Command::Janitor { .. } => "janitor",
        }
    }

    /// 保存データを書き換えうるコマンドか
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::Mark { .. }
            | Command::BatchMark { .. }
            | Command::Save { .. }
            | Command::Done { .. } => true,
            Command::Janitor { dry_run } => !dry_run,
            Command::Help | Command::List | Command::Process | Command::Extract { .. } => false,
        }
    }
}
