use std::borrow::Cow;
use std::env;

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::Hinter;
use rustyline::history::SearchDirection;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::builtins::BUILTIN_NAMES;

/// Editor helper: filename completion, `$NAME` completion, history hints.
pub struct LineHelper {
    completer: FilenameCompleter,
    hinter: HistoryAutosuggest,
    highlighter: MatchingBracketHighlighter,
}

impl LineHelper {
    pub fn new() -> Self {
        Self {
            completer: FilenameCompleter::new(),
            hinter: HistoryAutosuggest,
            highlighter: MatchingBracketHighlighter::new(),
        }
    }
}

struct HistoryAutosuggest;

impl Hinter for HistoryAutosuggest {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if line.is_empty() || pos < line.len() {
            return None;
        }
        let history = ctx.history();
        let start = if ctx.history_index() == history.len() {
            ctx.history_index().saturating_sub(1)
        } else {
            ctx.history_index()
        };
        let result = history
            .starts_with(line, start, SearchDirection::Reverse)
            .ok()
            .flatten()?;
        if result.entry == line {
            return None;
        }
        let remainder = result.entry[pos..].to_string();
        if remainder.is_empty() {
            return None;
        }
        Some(remainder)
    }
}

/// Start offset and text of the word under the cursor.
fn current_token(line: &str, pos: usize) -> (usize, &str) {
    let start = line[..pos]
        .rfind(|ch: char| ch.is_whitespace() || ch == '<' || ch == '>')
        .map_or(0, |idx| idx + 1);
    (start, &line[start..pos])
}

fn is_command_position(line: &str, start: usize) -> bool {
    line[..start].trim().is_empty()
}

fn variable_pairs(prefix: &str) -> Vec<Pair> {
    let mut names: Vec<String> = env::vars()
        .map(|(name, _)| name)
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    names
        .into_iter()
        .map(|name| Pair {
            display: format!("${name}"),
            replacement: format!("${name}"),
        })
        .collect()
}

fn builtin_pairs(prefix: &str) -> Vec<Pair> {
    BUILTIN_NAMES
        .iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| Pair {
            display: name.to_string(),
            replacement: format!("{name} "),
        })
        .collect()
}

impl Helper for LineHelper {}

impl Completer for LineHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, token) = current_token(line, pos);
        if let Some(prefix) = token.strip_prefix('$') {
            return Ok((start, variable_pairs(prefix)));
        }
        if is_command_position(line, start) && !token.is_empty() && !token.contains('/') {
            let pairs = builtin_pairs(token);
            if !pairs.is_empty() {
                return Ok((start, pairs));
            }
        }
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for LineHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for LineHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if hint.is_empty() {
            return Cow::Borrowed(hint);
        }
        Cow::Owned(format!("\x1b[90m{hint}\x1b[0m"))
    }

    fn highlight_char(&self, line: &str, pos: usize) -> bool {
        self.highlighter.highlight_char(line, pos)
    }
}

// Unbalanced quotes are reported by the scanner, not held open by the editor.
impl Validator for LineHelper {}
