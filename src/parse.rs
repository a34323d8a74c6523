//! Turning one input line into a `Command`.
//!
//! - `tokenizer` scans one word at a time (quotes, escapes, `$NAME`, `<`/`>`).
//! - `command_parser` drives the scanner over the line and assembles the result.
//! - `redirection_parser` classifies `<path` / `>path` words and records them.
use std::fmt;

use crate::error::{ErrorKind, ParseError, ParseResult};

mod command_parser;
mod redirection_parser;
mod tokenizer;

pub use command_parser::{parse_line, parse_line_with};
pub use tokenizer::{scan_word, scan_word_env, Word};

/// A fully parsed command line, ready for execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    input_redirect: Option<String>,
    output_redirect: Option<String>,
    args: Vec<String>,
}

impl Command {
    pub fn new() -> Self {
        Self::default()
    }

    /// File to read standard input from; `None` means the terminal.
    pub fn input_redirect(&self) -> Option<&str> {
        self.input_redirect.as_deref()
    }

    /// File to write standard output to; `None` means the terminal.
    pub fn output_redirect(&self) -> Option<&str> {
        self.output_redirect.as_deref()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// The program or builtin name, `args()[0]`.
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// True for the result of a blank line: no arguments and no redirects.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.input_redirect.is_none() && self.output_redirect.is_none()
    }

    /// Record the input redirect. Fails if one was already recorded.
    pub fn set_input(&mut self, path: impl Into<String>) -> ParseResult<()> {
        if self.input_redirect.is_some() {
            return Err(ParseError::new(ErrorKind::MultipleRedirections)
                .with_context("Only one < redirection is allowed per command"));
        }
        self.input_redirect = Some(path.into());
        Ok(())
    }

    /// Record the output redirect. Fails if one was already recorded.
    pub fn set_output(&mut self, path: impl Into<String>) -> ParseResult<()> {
        if self.output_redirect.is_some() {
            return Err(ParseError::new(ErrorKind::MultipleRedirections)
                .with_context("Only one > redirection is allowed per command"));
        }
        self.output_redirect = Some(path.into());
        Ok(())
    }

    pub fn append_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  < {}", self.input_redirect().unwrap_or("stdin"))?;
        writeln!(f, "  > {}", self.output_redirect().unwrap_or("stdout"))?;
        write!(f, "  argc={}", self.argc())?;
        for (idx, arg) in self.args.iter().enumerate() {
            write!(f, "\n    argv[{idx}] = {arg}")?;
        }
        Ok(())
    }
}
