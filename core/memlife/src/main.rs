mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::Read;
use std::path::Path;
use std::process;

use cli::{config_to_command, parse_args, print_completion, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use domain::command::Command;
use domain::{BatchInstructions, BatchMarkReport, DateKey, MarkOutcome};
use ports::inbound::UseCaseRunner;
use usecase::{CompletionOutcome, JanitorOutcome, JanitorReport};
use wiring::{wire_memlife, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, command: Command) -> Result<i32, Error> {
        match command {
            Command::Help => {
                print_help();
                Ok(0)
            }
            Command::Mark { date } => {
                let (date, outcome) = self.app.pending.mark(date)?;
                print_mark(date, &outcome);
                Ok(0)
            }
            Command::BatchMark { days } => {
                println!("Marking the past {} day(s)...", days);
                let report = self.app.pending.batch_mark(days)?;
                print_batch_mark(&report);
                Ok(if report.failures.is_empty() { 0 } else { 1 })
            }
            Command::List => {
                let pending = self.app.pending.info()?;
                if pending.is_empty() {
                    println!("(no pending)");
                } else {
                    for p in &pending {
                        println!("{} ({} chars)", p.date, p.chars);
                    }
                }
                Ok(0)
            }
            Command::Process => {
                let instructions = self.app.completion.batch_instructions()?;
                match &instructions {
                    BatchInstructions::Empty => println!("(no pending)"),
                    BatchInstructions::Ready { steps } => {
                        println!("Found {} pending log(s):", steps.len());
                        for s in steps {
                            println!("  - {} ({} chars)", s.date, s.chars);
                        }
                        println!();
                    }
                }
                if let Some(task) = instructions.render() {
                    print!("{}", task);
                }
                Ok(0)
            }
            Command::Extract { date } => match self.app.extraction.prepare(date)? {
                Some(prompt) => {
                    println!("{}", prompt);
                    Ok(0)
                }
                None => {
                    eprintln!("memlife: log not found: {}", self.app.config.log_path(&date).display());
                    Ok(1)
                }
            },
            Command::Save { date, file } => {
                let text = match file {
                    Some(path) => self.read_insights_file(&path)?,
                    None => read_stdin()?,
                };
                if text.trim().is_empty() {
                    return Err(Error::invalid_argument("no insights text given"));
                }
                let path = self.app.completion.save_insights(date, &text)?;
                println!("Insights saved to {}", path.display());
                Ok(0)
            }
            Command::Done { date } => match self.app.completion.mark_complete(date)? {
                CompletionOutcome::LogMissing => {
                    eprintln!("memlife: log not found: {}", self.app.config.log_path(&date).display());
                    Ok(1)
                }
                CompletionOutcome::Completed {
                    annotated,
                    marker_removed,
                } => {
                    if annotated {
                        println!("Marked {} as processed", date);
                    } else {
                        println!("{} was already marked as processed", date);
                    }
                    if !marker_removed {
                        println!("  (no pending marker to remove)");
                    }
                    Ok(0)
                }
            },
            Command::Janitor { dry_run } => match self.app.janitor.run(dry_run)? {
                JanitorOutcome::SummaryMissing { path } => {
                    println!("Summary not found: {}", path.display());
                    Ok(0)
                }
                JanitorOutcome::Scanned(report) => {
                    print_janitor_report(&report, &self.app.config.summary_path);
                    Ok(0)
                }
            },
        }
    }
}

impl Runner {
    fn read_insights_file(&self, path: &Path) -> Result<String, Error> {
        self.app.fs.read_to_string(path)
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| Error::io_msg(format!("stdin: {}", e)))?;
    Ok(buf)
}

fn print_mark(date: DateKey, outcome: &MarkOutcome) {
    match outcome {
        MarkOutcome::Marked(marker) => {
            println!("{}: marked pending ({} chars)", date, marker.chars)
        }
        MarkOutcome::Skipped(reason) if reason.is_already_processed() => {
            println!("{}: nothing to do, {}", date, reason)
        }
        MarkOutcome::Skipped(reason) => println!("{}: skipped, {}", date, reason),
    }
}

fn print_batch_mark(report: &BatchMarkReport) {
    for (date, outcome) in &report.outcomes {
        print_mark(*date, outcome);
    }
    for (date, err) in &report.failures {
        eprintln!("memlife: {}: {}", date, err);
    }
    println!();
    println!("Marked {} log(s)", report.marked());
}

fn print_janitor_report(report: &JanitorReport, summary_path: &Path) {
    let scan = &report.scan;
    println!("Memory janitor{}", if report.dry_run { " (dry run)" } else { "" });
    println!("  Reference: {}", report.reference.format("%Y-%m-%d %H:%M UTC"));
    println!("  Summary:   {}", summary_path.display());
    println!("  Lines:     {}", scan.total_lines);
    println!("  Expired:   {}", scan.expired.len());
    println!("  Kept:      {}", scan.kept.len());

    if scan.expired.is_empty() {
        println!();
        println!("No expired entries.");
    } else {
        println!();
        println!("Expired entries:");
        for e in &scan.expired {
            println!("  - {}", e.summary_line());
        }
    }

    if let Some(n) = report.over_capacity {
        println!();
        println!(
            "Warning: {} non-blank lines exceed the {} line budget; consider condensing.",
            n, report.max_lines
        );
    }

    if let Some(applied) = &report.applied {
        println!();
        println!("Backup:   {}", applied.backup.display());
        println!("Archived: {}", applied.archive.display());
        println!("Lines:    {} -> {}", applied.lines_before, applied.lines_after);
    } else if report.dry_run && scan.has_expired() {
        println!();
        println!("Dry run: no files changed.");
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("memlife: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: memlife [-h] [-m|--memory-dir directory] [--summary file] [--archive-dir directory] [<command> [args...]]");
}

fn print_help() {
    println!("Usage: memlife [-h] [-m|--memory-dir directory] [--summary file] [--archive-dir directory] [<command> [args...]]");
    println!("  -h, --help              Display this help message.");
    println!("  -m, --memory-dir        Daily log root. Default: $MEMORY_DIR or ~/memory.");
    println!("  --summary               Always-loaded summary document. Default: $MEMORY_PATH or ~/MEMORY.md.");
    println!("  --archive-dir           Archive for expired entries. Default: $ARCHIVE_DIR or <memory-dir>/archive.");
    println!("  --generate <shell>      Generate shell completion script (bash, zsh, fish, elvish, powershell).");
    println!("  <command>               Command to execute. Omit to mark yesterday's log as pending.");
    println!();
    println!("Environment:");
    println!("  MEMLIFE_LOG     Structured log file. Default: $XDG_STATE_HOME/memlife/logs/memlife.jsonl.");
    println!();
    println!("Commands:");
    println!("  mark [YYYY-MM-DD]          Queue a daily log for reflection (default: yesterday).");
    println!("  batch-mark <N>             Queue the logs of the past N days.");
    println!("  list                       List pending logs with their size.");
    println!("  process                    Print reflection instructions for all pending logs.");
    println!("  extract <YYYY-MM-DD>       Print the extraction prompt for a log.");
    println!("  save <YYYY-MM-DD> [-f F]   Append insights (from F or stdin) to the monthly digest.");
    println!("  done <YYYY-MM-DD>          Mark a log as processed and drop it from the queue.");
    println!("  janitor [--dry-run]        Archive expired [P1]/[P2] entries from the summary document.");
}

pub fn run() -> Result<i32, Error> {
    let outcome = parse_args()?;
    let config = match &outcome {
        ParseOutcome::Config(c) => c.clone(),
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(*shell);
            return Ok(0);
        }
        ParseOutcome::HelpDisplayed => return Ok(0),
    };
    let command = config_to_command(&config)?;
    if command == Command::Help {
        print_help();
        return Ok(0);
    }

    let app = wire_memlife(&config.overrides())?;
    let logger = std::sync::Arc::clone(&app.logger);
    let _ = logger.log(
        &LogRecord::new(LogLevel::Info, "command started")
            .layer("main")
            .kind("lifecycle")
            .field("command", command.name())
            .field("mutating", command.is_mutating()),
    );
    let name = command.name();
    let runner = Runner { app };
    let result = runner.run(command);
    let record = match &result {
        Ok(code) => LogRecord::new(LogLevel::Info, "command finished").field("exit_code", *code),
        Err(e) => LogRecord::new(LogLevel::Error, "command failed")
            .field("exit_code", e.exit_code())
            .field("error", e.to_string()),
    };
    let _ = logger.log(&record.layer("main").kind("lifecycle").field("command", name));
    result
}
