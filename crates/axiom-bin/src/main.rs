//! Axiom entrypoint: headless command runner over the editing core.
//!
//! Opens an optional file, runs each `-c` command through the command
//! layer in order, reports status messages on stderr and, with
//! `--highlight`, prints the highlighted document on stdout.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{MessageKind, ParsedCommand, Session, dispatch, execute};
use core_config::load_from;
use core_syntax::Segment;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "axiom.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "axiom", version, about = "Axiom editing core")]
struct Args {
    /// File to open at startup. A missing file starts empty and is created on save.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `axiom.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(long)]
    pub debug: bool,
    /// Command to execute, e.g. `-c ":fs foo -i"`. Repeatable; runs in order.
    #[arg(short = 'c', long = "command", value_name = "CMD", allow_hyphen_values = true)]
    pub commands: Vec<String>,
    /// Print every document line as `class:"text"` segments after the commands ran.
    #[arg(long)]
    pub highlight: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, debug: bool) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let filter = if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global subscriber already installed; dropping the guard shuts the writer down.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Print the pending status message, returning whether it was an error.
fn report(session: &mut Session, err: &mut impl Write) -> Result<bool> {
    let Some(msg) = session.take_message() else {
        return Ok(false);
    };
    writeln!(err, "{}: {}", msg.kind.label(), msg.text).context("writing status message")?;
    Ok(msg.kind == MessageKind::Error)
}

fn format_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("{}:{:?}", s.class.name(), s.text))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_highlighted(session: &Session, out: &mut impl Write) -> Result<()> {
    for idx in 0..session.document.line_count() {
        let segments = session.highlight_line(idx);
        writeln!(out, "{}", format_segments(&segments)).context("writing highlighted line")?;
    }
    Ok(())
}

/// Run the session; returns whether any command produced an error message.
fn run(args: &Args) -> Result<bool> {
    let config = load_from(args.config.clone())?;
    let mut session = Session::new(config);
    let mut stderr = io::stderr().lock();
    let mut failed = false;

    if let Some(path) = args.path.as_ref() {
        execute(&mut session, ParsedCommand::Open(path.clone()));
        failed |= report(&mut session, &mut stderr)?;
    }
    let path_str = args.path.as_ref().map(|p| p.display().to_string());
    info!(
        target: "runtime.startup",
        path = path_str.as_deref(),
        commands = args.commands.len(),
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    for (idx, cmd) in args.commands.iter().enumerate() {
        if !session.running {
            warn!(target: "runtime.command", skipped = args.commands.len() - idx, "commands_after_quit");
            break;
        }
        dispatch(&mut session, cmd);
        failed |= report(&mut session, &mut stderr)?;
    }

    if args.highlight {
        let mut stdout = io::stdout().lock();
        print_highlighted(&session, &mut stdout)?;
        stdout.flush().context("flushing stdout")?;
    }
    Ok(failed)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging(args.debug)?;
    AppStartup::install_panic_hook();
    info!(target: "runtime.startup", "startup");

    let failed = run(&args)?;
    info!(target: "runtime.startup", failed, "shutdown");
    // Flush the log writer before a non-zero exit skips destructors.
    drop(startup);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_syntax::ColorClass;

    #[test]
    fn args_collect_repeated_commands() {
        let args = Args::parse_from([
            "axiom",
            "file.txt",
            "-c",
            ":fs foo -i",
            "--command",
            ":w",
            "--highlight",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("file.txt")));
        assert_eq!(args.commands, vec![":fs foo -i", ":w"]);
        assert!(args.highlight);
        assert!(!args.debug);
    }

    #[test]
    fn segments_format_as_class_and_quoted_text() {
        let line = format_segments(&[
            Segment::new("fn", ColorClass::Keyword),
            Segment::new(" \"x\"", ColorClass::Normal),
        ]);
        assert_eq!(line, r#"keyword:"fn" normal:" \"x\"""#);
    }

    #[test]
    fn report_flags_errors_only() {
        let mut session = Session::new(core_config::Config::default());
        let mut sink = Vec::new();
        session.warning("w");
        assert!(!report(&mut session, &mut sink).unwrap());
        session.error("boom");
        assert!(report(&mut session, &mut sink).unwrap());
        assert!(!report(&mut session, &mut sink).unwrap());
        assert_eq!(String::from_utf8(sink).unwrap(), "warning: w\nerror: boom\n");
    }
}
