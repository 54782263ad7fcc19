//! CLI tool to tokenize, check, and run GenomeScript files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use genomescript::{
    LocalProvider, RunError, RunOptions, TokenKind, has_errors, parse, render_diagnostics,
    run_script, tokenize, tokenize_report,
};
use log::{LevelFilter, info};

#[derive(Parser)]
#[command(name = "genomescript", version, about = "Run GenomeScript workflow scripts")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token table of a script.
    Tokens {
        file: PathBuf,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Lex and parse scripts, reporting diagnostics.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Execute a script against files on disk.
    Run {
        file: PathBuf,
        /// Directory data paths are resolved against (default: the
        /// script's directory).
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Emit the run report as JSON.
        #[arg(long)]
        json: bool,
        /// Include the token table in the JSON report.
        #[arg(long, requires = "json")]
        tokens: bool,
    },
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .format_timestamp(None)
        .parse_env("GENOMESCRIPT_LOG");
    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Tokens { file, json } => print_tokens(&file, json),
        Command::Check { files } => check(&files),
        Command::Run {
            file,
            base_dir,
            json,
            tokens,
        } => run(&file, base_dir, json, tokens),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

fn print_tokens(file: &Path, json: bool) -> Result<bool, String> {
    let source = read(file)?;
    let report = tokenize_report(&source);

    if json {
        println!("{}", to_json(&report)?);
    } else {
        println!("{:>5} {:>6}  {:<10} VALUE", "LINE", "COLUMN", "TYPE");
        for row in report.tokens.iter().filter(|r| r.kind != TokenKind::Newline) {
            println!(
                "{:>5} {:>6}  {:<10} {}",
                row.line,
                row.column,
                row.kind.to_string(),
                row.value
            );
        }
        if !report.diagnostics.is_empty() {
            eprint!("{}", render_diagnostics(&source, &report.diagnostics));
        }
    }

    Ok(!has_errors(&report.diagnostics))
}

fn check(files: &[PathBuf]) -> Result<bool, String> {
    let mut ok = true;

    for path in files {
        let source = match read(path) {
            Ok(s) => s,
            Err(msg) => {
                eprintln!("{msg}");
                ok = false;
                continue;
            }
        };

        let parsed = parse(&tokenize(&source));
        if parsed.diagnostics.is_empty() {
            eprintln!(
                "{}: valid ({} statement(s))",
                path.display(),
                parsed.statements.len()
            );
        } else {
            eprintln!("{}:", path.display());
            eprint!("{}", render_diagnostics(&source, &parsed.diagnostics));
            ok = false;
        }
    }

    Ok(ok)
}

fn run(file: &Path, base_dir: Option<PathBuf>, json: bool, tokens: bool) -> Result<bool, String> {
    let source = read(file)?;
    let base_dir = base_dir.unwrap_or_else(|| {
        file.parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    });
    let provider = LocalProvider::new(base_dir);
    info!("resolving data paths against {}", provider.base_dir().display());
    let options = RunOptions {
        include_tokens: tokens,
        cancel: None,
    };

    let (report, fault) = match run_script(&source, &provider, &options) {
        Ok(report) => (report, None),
        Err(err) => {
            let message = err.to_string();
            let RunError::ProviderFault { partial, .. } = err;
            (*partial, Some(message))
        }
    };

    if json {
        println!("{}", to_json(&report)?);
    } else {
        for binding in &report.bindings {
            println!("{} = {}", binding.name, binding.summary);
        }
        eprintln!("{} statement(s) run", report.statements_run);
        if !report.diagnostics.is_empty() {
            eprint!("{}", render_diagnostics(&source, &report.diagnostics));
        }
    }
    if let Some(message) = &fault {
        eprintln!("run aborted: {message}");
    }

    Ok(fault.is_none() && !has_errors(&report.diagnostics))
}
