//! Word scanner for shell input.
//!
//! One call consumes exactly one whitespace-delimited word from the remaining
//! line. Quoting, backslash escapes, `$NAME` substitution and the `<` / `>`
//! operators are all resolved in a single forward pass; the caller advances
//! its cursor by `Word::consumed` and calls again.
use log::trace;

use crate::config::ParserConfig;
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::expansion::ExpansionContext;
use crate::utils::is_var_char;

/// One scanned word and the number of input bytes it took to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// Bytes consumed from the cursor, including skipped leading whitespace.
    pub consumed: usize,
    blank: bool,
}

impl Word {
    /// True when the scanner only skipped whitespace and hit end of input.
    ///
    /// A quoted empty string (`""`) is not blank.
    pub fn is_blank(&self) -> bool {
        self.blank
    }
}

/// Scan the next word of `input` starting at byte offset `cursor`.
///
/// Returns `Ok(None)` when nothing at all remains (zero bytes consumed).
/// Positions in returned errors are byte offsets into the whole `input`.
pub fn scan_word(
    input: &str,
    cursor: usize,
    config: &ParserConfig,
    ctx: &ExpansionContext<'_>,
) -> ParseResult<Option<Word>> {
    let rest = input.get(cursor..).unwrap_or("");
    Scanner::new(rest, config, ctx)
        .scan()
        .map_err(|err| err.offset_by(cursor))
}

/// `scan_word` against the process environment with default limits.
pub fn scan_word_env(input: &str, cursor: usize) -> ParseResult<Option<Word>> {
    let ctx = ExpansionContext::from_env();
    scan_word(input, cursor, &ParserConfig::default(), &ctx)
}

struct Scanner<'s, 'c, 'a> {
    input: &'s str,
    pos: usize,
    word_start: usize,
    word: String,
    word_len: usize,
    in_quotes: bool,
    // Lazily computed once per call; the slice never changes under us.
    quotes_balanced: Option<bool>,
    config: &'c ParserConfig,
    ctx: &'c ExpansionContext<'a>,
}

impl<'s, 'c, 'a> Scanner<'s, 'c, 'a> {
    fn new(input: &'s str, config: &'c ParserConfig, ctx: &'c ExpansionContext<'a>) -> Self {
        Self {
            input,
            pos: 0,
            word_start: 0,
            word: String::new(),
            word_len: 0,
            in_quotes: false,
            quotes_balanced: None,
            config,
            ctx,
        }
    }

    fn scan(mut self) -> ParseResult<Option<Word>> {
        self.skip_whitespace();
        if self.pos == self.input.len() {
            if self.pos == 0 {
                return Ok(None);
            }
            return Ok(Some(Word {
                text: String::new(),
                consumed: self.pos,
                blank: true,
            }));
        }
        self.word_start = self.pos;

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.check_quote_parity()?;
            }
            if ch.is_whitespace() && !self.in_quotes {
                break;
            }
            match ch {
                '"' => {
                    self.in_quotes = !self.in_quotes;
                    self.bump(ch);
                }
                '\\' => self.scan_escape()?,
                '$' => self.substitute_variable()?,
                '<' | '>' if !self.in_quotes => {
                    if !self.scan_redirection(ch)? {
                        break;
                    }
                }
                _ => {
                    self.push(ch)?;
                    self.bump(ch);
                }
            }
        }

        trace!("scanned word {:?} ({} bytes)", self.word, self.pos);
        Ok(Some(Word {
            text: self.word,
            consumed: self.pos,
            blank: false,
        }))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.bump(ch);
        }
    }

    fn push(&mut self, ch: char) -> ParseResult<()> {
        self.word.push(ch);
        self.word_len += 1;
        if self.word_len > self.config.max_word_len {
            return Err(ParseError::new(ErrorKind::WordTooLong)
                .with_position(self.pos)
                .with_context(format!(
                    "Words are limited to {} characters",
                    self.config.max_word_len
                )));
        }
        Ok(())
    }

    fn check_quote_parity(&mut self) -> ParseResult<()> {
        let balanced = match self.quotes_balanced {
            Some(balanced) => balanced,
            None => {
                let balanced = unescaped_quote_count(self.input) % 2 == 0;
                self.quotes_balanced = Some(balanced);
                balanced
            }
        };
        if balanced {
            Ok(())
        } else {
            Err(ParseError::new(ErrorKind::UnterminatedQuote)
                .with_position(self.pos)
                .with_context("Every \" needs a matching closing \""))
        }
    }

    fn scan_escape(&mut self) -> ParseResult<()> {
        let escape_pos = self.pos;
        self.bump('\\');
        let Some(next) = self.peek() else {
            return Err(ParseError::new(ErrorKind::IllegalEscapeCharacter('\0'))
                .with_position(escape_pos)
                .with_context("Valid escapes: \\n \\r \\t \\\\ \\<space> \\$ \\\" \\< \\>"));
        };
        let Some(resolved) = resolve_escape(next) else {
            return Err(ParseError::new(ErrorKind::IllegalEscapeCharacter(next))
                .with_position(self.pos)
                .with_context("Valid escapes: \\n \\r \\t \\\\ \\<space> \\$ \\\" \\< \\>"));
        };
        self.push(resolved)?;
        self.bump(next);
        Ok(())
    }

    fn substitute_variable(&mut self) -> ParseResult<()> {
        let dollar_pos = self.pos;
        self.bump('$');
        let name_start = self.pos;
        while let Some(ch) = self.peek() {
            if !is_var_char(ch) {
                break;
            }
            self.bump(ch);
        }
        let name = &self.input[name_start..self.pos];
        let Some(value) = (self.ctx.lookup_var)(name) else {
            return Err(
                ParseError::new(ErrorKind::UndefinedVariable(name.to_string()))
                    .with_position(dollar_pos),
            );
        };
        // Substituted text is copied verbatim and never re-scanned.
        for ch in value.chars() {
            self.push(ch)?;
        }
        Ok(())
    }

    /// Handle an unquoted `<` or `>`.
    ///
    /// Returns `Ok(false)` when the current word must end before the
    /// operator so that it starts the next word.
    fn scan_redirection(&mut self, op: char) -> ParseResult<bool> {
        let op_pos = self.pos;
        if self.pos == self.word_start {
            self.push(op)?;
            self.bump(op);
            self.skip_whitespace();
            if self.at_end() {
                return Err(ParseError::new(ErrorKind::RedirectionWithoutFilename)
                    .with_position(op_pos)
                    .with_context("Expected: cmd < filename or cmd > filename"));
            }
            return Ok(true);
        }
        if op_pos + op.len_utf8() == self.input.len() {
            return Err(ParseError::new(ErrorKind::RedirectionWithoutFilename)
                .with_position(op_pos)
                .with_context("Expected: cmd < filename or cmd > filename"));
        }
        Ok(false)
    }
}

/// Map the character after a backslash to the character it stands for.
fn resolve_escape(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        ' ' => Some(' '),
        '$' => Some('$'),
        '"' => Some('"'),
        '<' => Some('<'),
        '>' => Some('>'),
        _ => None,
    }
}

/// Count `"` characters that are not the second half of a `\x` pair.
pub(crate) fn unescaped_quote_count(input: &str) -> usize {
    let mut count = 0;
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '"' => count += 1,
            _ => {}
        }
    }
    count
}
