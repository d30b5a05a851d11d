use crate::adapter::ConfigOverrides;
use crate::domain::command::{Command, DRY_RUN_ARG};
use clap::builder::ArgAction;
use clap::error::ErrorKind;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;

pub const PROGRAM: &str = "memlife";

/// CLI から受け取った生の設定（command は文字列のまま保持）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    pub memory_dir: Option<String>,
    pub summary: Option<String>,
    pub archive_dir: Option<String>,
    /// コマンド名（None の場合は昨日をマーク）
    pub command_name: Option<String>,
    pub command_args: Vec<String>,
}

impl Config {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            memory_dir: self.memory_dir.clone(),
            summary: self.summary.clone(),
            archive_dir: self.archive_dir.clone(),
        }
    }
}

/// 解析結果: 通常の Config、補完スクリプト生成、またはサブコマンドのヘルプ表示済み
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
    HelpDisplayed,
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .disable_help_subcommand(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("memory-dir")
                .short('m')
                .long("memory-dir")
                .value_name("directory")
                .help("Daily log root (default: $MEMORY_DIR or ~/memory)")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("summary")
                .long("summary")
                .value_name("file")
                .help("Always-loaded summary document (default: $MEMORY_PATH or ~/MEMORY.md)")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("archive-dir")
                .long("archive-dir")
                .value_name("directory")
                .help("Expired entry archive (default: $ARCHIVE_DIR or <memory-dir>/archive)")
                .global(true)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn date_arg(required: bool) -> clap::Arg {
    clap::Arg::new("date")
        .value_name("YYYY-MM-DD")
        .required(required)
        .num_args(1)
}

pub(crate) fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new(PROGRAM)
            .about("Daily memory log reflection queue and MEMORY.md expiry")
            .subcommand_required(false)
            .subcommand(clap::Command::new("help").about("Display this help message"))
            .subcommand(
                clap::Command::new("mark")
                    .about("Mark a daily log as pending reflection (default: yesterday)")
                    .arg(date_arg(false)),
            )
            .subcommand(
                clap::Command::new("batch-mark")
                    .about("Mark the past N days (yesterday back to N days ago)")
                    .arg(clap::Arg::new("days").value_name("N").required(true).num_args(1)),
            )
            .subcommand(clap::Command::new("list").about("List pending logs"))
            .subcommand(
                clap::Command::new("process")
                    .about("Print processing instructions for all pending logs"),
            )
            .subcommand(
                clap::Command::new("extract")
                    .about("Print the extraction prompt for a date")
                    .arg(date_arg(true)),
            )
            .subcommand(
                clap::Command::new("save")
                    .about("Append extracted insights to the monthly digest")
                    .arg(date_arg(true))
                    .arg(
                        clap::Arg::new("file")
                            .short('f')
                            .long("file")
                            .value_name("path")
                            .help("Read insights from a file instead of stdin")
                            .num_args(1),
                    ),
            )
            .subcommand(
                clap::Command::new("done")
                    .about("Mark a daily log as processed and remove it from the queue")
                    .arg(date_arg(true)),
            )
            .subcommand(
                clap::Command::new("janitor")
                    .about("Archive expired P1/P2 entries from the summary document")
                    .arg(
                        clap::Arg::new("dry-run")
                            .long("dry-run")
                            .help("Report only, no changes")
                            .action(ArgAction::SetTrue),
                    ),
            ),
    )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let mut help = matches.get_flag("help");
    let memory_dir = matches.get_one::<String>("memory-dir").cloned();
    let summary = matches.get_one::<String>("summary").cloned();
    let archive_dir = matches.get_one::<String>("archive-dir").cloned();

    let (command_name, command_args) = match matches.subcommand() {
        None => (None, Vec::new()),
        Some(("help", _)) => {
            help = true;
            (None, Vec::new())
        }
        Some(("batch-mark", m)) => (
            Some("batch-mark".to_string()),
            m.get_one::<String>("days").cloned().into_iter().collect(),
        ),
        Some(("save", m)) => {
            let mut args: Vec<String> = m.get_one::<String>("date").cloned().into_iter().collect();
            args.extend(m.get_one::<String>("file").cloned());
            (Some("save".to_string()), args)
        }
        Some(("janitor", m)) => {
            let args = if m.get_flag("dry-run") {
                vec![DRY_RUN_ARG.to_string()]
            } else {
                vec![]
            };
            (Some("janitor".to_string()), args)
        }
        Some((name, m)) => {
            let args = if m.try_contains_id("date").unwrap_or(false) {
                m.get_one::<String>("date").cloned().into_iter().collect()
            } else {
                vec![]
            };
            (Some(name.to_string()), args)
        }
    };
    // サブコマンドの後ろに置かれた global 引数も拾う
    let pick = |own: Option<String>, id: &str| {
        own.or_else(|| {
            matches
                .subcommand()
                .and_then(|(_, m)| m.get_one::<String>(id).cloned())
        })
    };

    Config {
        help,
        memory_dir: pick(memory_dir, "memory-dir"),
        summary: pick(summary, "summary"),
        archive_dir: pick(archive_dir, "archive-dir"),
        command_name,
        command_args,
    }
}

fn parse_from<I, T>(argv: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = match build_clap_command().try_get_matches_from(argv) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            e.print()
                .map_err(|io| Error::io_msg(format!("stdout: {}", io)))?;
            return Ok(ParseOutcome::HelpDisplayed);
        }
        Err(e) => return Err(Error::invalid_argument(e.to_string())),
    };

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_from(std::env::args_os())
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, PROGRAM, &mut std::io::stdout());
}

/// Config を Command に変換する
pub fn config_to_command(config: &Config) -> Result<Command, Error> {
    if config.help {
        return Ok(Command::Help);
    }
    Command::parse_with_args(config.command_name.as_deref(), &config.command_args)
}
