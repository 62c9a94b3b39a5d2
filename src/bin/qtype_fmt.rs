//! Format quantized type descriptor files: one descriptor per line, canonical spelling.
//!
//! Usage:
//!   qtype_fmt [OPTIONS] [FILE ...]
//!   qtype_fmt < types.qt
//!
//! Given file(s), rewrites each in canonical form, then reports remaining
//! parse errors. With no files, reads stdin and prints the canonical text.
//!
//! Options:
//!   --check, -c  Do not rewrite; report non-canonical lines and parse errors.
//!   --human, -H  Human-readable output
//!
//! Logging goes to stderr; set `RUST_LOG=quantdsl=debug` to trace parse failures.

use quantdsl::format::{check, format_path, format_source, FormatMessage, FormatMode, Severity};
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(Clone, Copy)]
enum OutputStyle {
    Compact,
    Human,
}

fn print_message(path: &str, m: &FormatMessage, style: OutputStyle) {
    let severity_str = match m.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    match style {
        OutputStyle::Compact => {
            println!(
                "{}:{}:{}: {}: {} [{}]",
                path,
                m.line,
                m.column,
                severity_str,
                m.message,
                m.rule.id()
            );
        }
        OutputStyle::Human => {
            println!("  {} {}:{}: {}", path, m.line, m.column, m.message);
            println!("    rule: {}", m.rule.id());
        }
    }
}

fn take_flag(args: &mut Vec<String>, long: &str, short: &str) -> bool {
    match args.iter().position(|a| a == long || a == short) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mode = if take_flag(&mut args, "--check", "-c") {
        FormatMode::Check
    } else {
        FormatMode::Fix
    };
    let style = if take_flag(&mut args, "--human", "-H") {
        OutputStyle::Human
    } else {
        OutputStyle::Compact
    };

    let mut has_error = false;
    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    let mut tally = |messages: &[FormatMessage], path: &str| {
        for m in messages {
            match m.severity {
                Severity::Error => total_errors += 1,
                Severity::Warning => total_warnings += 1,
            }
            print_message(path, m, style);
        }
        messages.iter().any(|m| m.severity == Severity::Error)
    };

    if args.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        match mode {
            FormatMode::Fix => {
                io::stdout().write_all(format_source(&src).as_bytes())?;
                return Ok(());
            }
            FormatMode::Check => has_error |= tally(&check(&src), "<stdin>"),
        }
    } else {
        for path in &args {
            let path = Path::new(path);
            let report = match format_path(path, mode) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    has_error = true;
                    continue;
                }
            };
            let display_path = path.display().to_string();
            if mode == FormatMode::Fix && report.changed && report.messages.is_empty() {
                eprintln!("{}: formatted", display_path);
            }
            has_error |= tally(&report.messages, &display_path);
        }
    }

    if total_errors > 0 || total_warnings > 0 {
        eprintln!(
            "qtype_fmt: {} error(s), {} warning(s)",
            total_errors, total_warnings
        );
    }
    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
