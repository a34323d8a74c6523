//! Error types and reporting for the parser.
//!
//! Every failure the scanner or the command builder can produce is a user
//! input error. Instead of bare strings, functions return `ParseError`, which
//! carries:
//! - the error kind (with the offending character or variable name where one exists)
//! - a pre-rendered human-readable message
//! - an optional hint
//! - an optional byte position in the input line

use std::fmt;

/// Categorized parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An odd number of unescaped `"` in the remaining line
    UnterminatedQuote,
    /// A backslash followed by a character outside the escape table
    IllegalEscapeCharacter(char),
    /// `$name` where `name` has no binding
    UndefinedVariable(String),
    /// A word grew past the configured maximum length
    WordTooLong,
    /// `<` or `>` with nothing after it on the line
    RedirectionWithoutFilename,
    /// A second `<` (or a second `>`) on one line
    MultipleRedirections,
    /// A redirection appeared before any program name
    MissingCommand,
    /// The argument vector grew past the configured maximum
    TooManyArguments,
}

impl ErrorKind {
    /// The message the shell prints for this kind of failure.
    pub fn message(&self) -> String {
        match self {
            ErrorKind::UnterminatedQuote => "Unterminated quote".to_string(),
            ErrorKind::IllegalEscapeCharacter('\0') => {
                "Illegal escape character at end of line".to_string()
            }
            ErrorKind::IllegalEscapeCharacter(ch) => format!("Illegal escape character: {ch}"),
            ErrorKind::UndefinedVariable(name) => format!("Undefined variable: '{name}'"),
            ErrorKind::WordTooLong => "Word too long".to_string(),
            ErrorKind::RedirectionWithoutFilename => "Redirection without filename".to_string(),
            ErrorKind::MultipleRedirections => "Multiple redirections not allowed".to_string(),
            ErrorKind::MissingCommand => "Missing command".to_string(),
            ErrorKind::TooManyArguments => "Too many arguments".to_string(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Rich error type with context information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was being processed
    pub context: Option<String>,
    /// Byte offset in the input line where the error was detected
    pub position: Option<usize>,
}

impl ParseError {
    /// Create a new error whose message is rendered from the kind.
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.message();
        ParseError {
            kind,
            message,
            context: None,
            position: None,
        }
    }

    /// Add context string (e.g., "Expected: cmd < filename")
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add byte position in input where error occurred
    pub fn with_position(mut self, pos: usize) -> Self {
        self.position = Some(pos);
        self
    }

    /// Shift the recorded position by `offset` bytes.
    ///
    /// The scanner reports positions relative to the slice it was handed;
    /// the builder rebases them onto the whole line.
    pub(crate) fn offset_by(mut self, offset: usize) -> Self {
        if let Some(pos) = self.position.as_mut() {
            *pos += offset;
        }
        self
    }

    /// Format error with a snippet of the input showing where the problem is
    pub fn display_with_input(&self, input: &str) -> String {
        let mut msg = format!("error: {}", self.message);

        if let Some(pos) = self.position {
            if pos < input.len() && input.is_char_boundary(pos) {
                let start = floor_char_boundary(input, pos.saturating_sub(15));
                let end = ceil_char_boundary(input, (pos + 15).min(input.len()));
                let snippet = &input[start..end];

                msg.push_str(&format!("\n  near: '{}'", snippet.replace('\n', "↵")));
                msg.push('\n');

                let offset = input[start..pos].chars().count();
                msg.push_str(&format!("  {}{}", " ".repeat(offset + 7), "^"));
            } else {
                msg.push_str(&format!("\n  at position {} (end of input)", pos));
            }
        }
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }

        msg
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Convenience type alias for Results with ParseError
pub type ParseResult<T> = Result<T, ParseError>;

fn floor_char_boundary(input: &str, mut idx: usize) -> usize {
    while idx > 0 && !input.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(input: &str, mut idx: usize) -> usize {
    while idx < input.len() && !input.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
