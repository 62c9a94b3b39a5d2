//! Canonical formatting of descriptor files.
//!
//! A descriptor file holds one quantized type per line. Blank lines and `//`
//! comments pass through untouched; a trailing `// comment` after a descriptor
//! is kept.
//!
//! ## Findings
//!
//! - **parse-error** (error): the line does not hold a valid descriptor.
//! - **non-canonical** (warning): the descriptor parses but is not spelled the
//!   way the printer spells it (explicit default range, `:0` zero point, ...).
//!
//! Run via the `qtype_fmt` binary: `qtype_fmt types.qt` rewrites in place,
//! `qtype_fmt --check types.qt` only reports.

use crate::parser::parse;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    ParseError,
    NonCanonical,
}

impl FormatRule {
    pub fn id(self) -> &'static str {
        match self {
            FormatRule::ParseError => "parse-error",
            FormatRule::NonCanonical => "non-canonical",
        }
    }
}

/// A single finding with 1-based line and column.
#[derive(Debug, Clone)]
pub struct FormatMessage {
    pub line: usize,
    pub column: usize,
    pub rule: FormatRule,
    pub severity: Severity,
    pub message: String,
}

/// Whether [`format_path`] writes the canonical text back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Fix,
    Check,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    /// Canonical text differs from the file contents.
    pub changed: bool,
    /// Findings on the file as it stands after this run.
    pub messages: Vec<FormatMessage>,
}

/// `(leading whitespace, descriptor, remainder)` of one line.
fn split_line(line: &str) -> (&str, &str, &str) {
    let content = line.trim_start();
    let lead = &line[..line.len() - content.len()];
    let code_end = content.find("//").unwrap_or(content.len());
    let body = content[..code_end].trim_end();
    (lead, body, &content[body.len()..])
}

/// Report parse errors and non-canonical spellings, in line order.
pub fn check(source: &str) -> Vec<FormatMessage> {
    let mut out = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let (lead, body, _) = split_line(line);
        if body.is_empty() {
            continue;
        }
        match parse(body) {
            Err(e) => out.push(FormatMessage {
                line: i + 1,
                column: lead.chars().count() + e.location.column,
                rule: FormatRule::ParseError,
                severity: Severity::Error,
                message: e.kind.to_string(),
            }),
            Ok(ty) => {
                let canonical = ty.to_string();
                if canonical != body {
                    out.push(FormatMessage {
                        line: i + 1,
                        column: lead.chars().count() + 1,
                        rule: FormatRule::NonCanonical,
                        severity: Severity::Warning,
                        message: format!("non-canonical spelling, expected `{}`", canonical),
                    });
                }
            }
        }
    }
    out
}

/// Rewrite every parseable descriptor to its canonical spelling and strip
/// trailing whitespace. Lines that fail to parse are kept as they are.
pub fn format_source(source: &str) -> String {
    if source.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = source
        .lines()
        .map(|line| {
            let (lead, body, rest) = split_line(line);
            let body = match parse(body) {
                Ok(ty) if !body.is_empty() => ty.to_string(),
                _ => body.to_string(),
            };
            format!("{}{}{}", lead, body, rest).trim_end().to_string()
        })
        .collect();
    lines.join("\n") + "\n"
}

/// Format a file: in [`FormatMode::Fix`] the canonical text is written back when it differs.
pub fn format_path(path: &Path, mode: FormatMode) -> io::Result<FileReport> {
    let source = std::fs::read_to_string(path)?;
    let fixed = format_source(&source);
    let changed = fixed != source;
    let messages = match mode {
        FormatMode::Fix => {
            if changed {
                std::fs::write(path, &fixed)?;
                tracing::info!(path = %path.display(), "rewrote descriptors in canonical form");
            }
            check(&fixed)
        }
        FormatMode::Check => check(&source),
    };
    Ok(FileReport { changed, messages })
}
