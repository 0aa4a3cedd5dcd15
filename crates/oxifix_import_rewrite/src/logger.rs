//! User-facing progress output.
//!
//! The logger is an explicit value: `main` constructs one and hands it by
//! `&mut` reference to everything that reports progress. Internal tracing
//! goes through the `log` facade instead.

use colored::{ColoredString, Colorize};
use std::{fmt::Display, io::Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    fn icon(self) -> ColoredString {
        match self {
            Level::Debug => "·".magenta(),
            Level::Info => "●".cyan(),
            Level::Success => "✓".green().bold(),
            Level::Warn => "⚠".yellow().bold(),
            Level::Error => "✗".red().bold(),
        }
    }

    fn label(self) -> ColoredString {
        match self {
            Level::Debug => "DEBUG".magenta(),
            Level::Info => "INFO".cyan(),
            Level::Success => "SUCCESS".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red(),
        }
    }
}

pub struct Logger<W: Write> {
    writer: W,
    debug: bool,
    warnings: usize,
    errors: usize,
}

impl<W: Write> Logger<W> {
    pub fn new(writer: W, debug: bool) -> Self {
        Self { writer, debug, warnings: 0, errors: 0 }
    }

    pub fn debug(&mut self, message: impl Display) {
        if self.debug {
            self.log(Level::Debug, message);
        }
    }

    pub fn info(&mut self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Display) {
        self.log(Level::Success, message);
    }

    pub fn warn(&mut self, message: impl Display) {
        self.warnings += 1;
        self.log(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Display) {
        self.errors += 1;
        self.log(Level::Error, message);
    }

    pub fn log(&mut self, level: Level, message: impl Display) {
        if let Err(e) = writeln!(self.writer, "{} {} | {}", level.icon(), level.label(), message)
        {
            log::debug!("Failed to write log line: {}", e);
        }
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
