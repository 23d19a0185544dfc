//! Error reporting for the Peregrine compiler
//!
//! Provides the structured error record produced by the parser and a
//! pretty-printed terminal rendering. Errors are accumulated during parsing
//! and reported in one batch by the driver; a non-empty batch aborts the
//! pipeline before code generation.

use colored::Colorize;
use std::fmt;

/// Where in the source an error was detected.
///
/// `statement` carries the trimmed text of the offending source line so the
/// report can quote it without re-reading the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub filename: String,
    pub statement: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A structured compile error with location information
#[derive(Debug, Clone)]
pub struct CompileError {
    pub location: Location,
    pub message: String,
    pub hint: Option<String>,
}

impl CompileError {
    pub fn parse_error(message: impl Into<String>, location: Location) -> Self {
        Self {
            location,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}",
            "Parse Error".red().bold(),
            self.message.bold()
        )?;

        let arrow = format!("  --> {}", self.location);
        writeln!(f, "{}", arrow.bright_blue())?;

        if !self.location.statement.is_empty() {
            writeln!(f, "    {}", "|".bright_blue())?;
            writeln!(
                f,
                "{} {} {}",
                format!("{:3}", self.location.line).bright_blue(),
                "|".bright_blue(),
                self.location.statement
            )?;
            writeln!(f, "    {}", "|".bright_blue())?;
        }

        if let Some(ref hint) = self.hint {
            writeln!(f, "{}: {}", "hint".yellow(), hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for CompileError {}
