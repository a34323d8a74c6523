//! Filename expansion for ordinary words: tilde, then braces, then globbing.
//! Variable substitution already happened in the scanner, so values that
//! contain pattern characters are globbed like literal text.
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use log::debug;

use crate::error::{ErrorKind, ParseError, ParseResult};

mod brace;
mod glob;
mod tilde;

pub use brace::expand_braces;
pub use glob::{expand_glob, glob_pattern};
pub use tilde::{expand_tilde, home_from_system};

type LookupVar<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;
type LookupHome<'a> = Box<dyn Fn(Option<&str>) -> Option<PathBuf> + 'a>;

/// The environment a parse runs against.
///
/// The process environment must not be mutated while a parse that reads it
/// is running; that is the caller's responsibility.
pub struct ExpansionContext<'a> {
    /// `$NAME` lookups; `None` means unbound.
    pub lookup_var: LookupVar<'a>,
    /// Home directory of a named user, or of the current user for `None`.
    pub lookup_home: LookupHome<'a>,
}

impl ExpansionContext<'static> {
    /// Variables from the process environment, homes from the user database.
    pub fn from_env() -> Self {
        ExpansionContext {
            lookup_var: Box::new(|name| env::var(name).ok()),
            lookup_home: Box::new(home_from_system),
        }
    }

    /// A fixed variable table instead of the process environment.
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let table: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        ExpansionContext {
            lookup_var: Box::new(move |name| table.get(name).cloned()),
            lookup_home: Box::new(home_from_system),
        }
    }
}

/// True when `word` needs any filename expansion at all.
pub fn has_pattern(word: &str) -> bool {
    word.starts_with('~') || word.contains(['{', '}']) || glob_pattern(word)
}

/// Expand one ordinary word into at most `limit` arguments.
///
/// Never returns an empty list: a pattern with no matches stays literal.
pub fn expand_word(
    word: &str,
    ctx: &ExpansionContext<'_>,
    limit: usize,
) -> ParseResult<Vec<String>> {
    if !has_pattern(word) {
        return Ok(vec![word.to_string()]);
    }
    let word = expand_tilde(word, ctx);
    let mut expanded = Vec::new();
    for alternative in expand_braces(&word, limit)? {
        expanded.extend(expand_glob(&alternative));
        if expanded.len() > limit {
            return Err(ParseError::new(ErrorKind::TooManyArguments)
                .with_context(format!("A word may expand to at most {limit} arguments")));
        }
    }
    debug!("expanded {word:?} -> {expanded:?}");
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    fn expand_word(word: &str, ctx: &ExpansionContext<'_>) -> Vec<String> {
        super::expand_word(word, ctx, 64).unwrap()
    }

    fn ctx_with_home(home: &str) -> ExpansionContext<'static> {
        let home = home.to_string();
        ExpansionContext {
            lookup_var: Box::new(move |name| (name == "HOME").then(|| home.clone())),
            lookup_home: Box::new(|user| match user {
                Some("plaid") => Some(PathBuf::from("/home/plaid")),
                _ => None,
            }),
        }
    }

    #[test]
    fn plain_words_pass_through() {
        let ctx = ctx_with_home("/home/me");
        assert_eq!(expand_word("s/foo/bar/", &ctx), vec!["s/foo/bar/"]);
        assert_eq!(expand_word("/foo/~/bar/", &ctx), vec!["/foo/~/bar/"]);
        assert_eq!(expand_word("", &ctx), vec![""]);
    }

    #[test]
    fn tilde_then_literal() {
        let ctx = ctx_with_home("/home/me");
        assert_eq!(expand_word("~", &ctx), vec!["/home/me"]);
        assert_eq!(expand_word("~plaid/tmp", &ctx), vec!["/home/plaid/tmp"]);
        assert_eq!(expand_word("~nobody_here/x", &ctx), vec!["~nobody_here/x"]);
    }

    #[test]
    fn braces_without_matches_stay_literal_per_alternative() {
        let ctx = ctx_with_home("/home/me");
        assert_eq!(
            expand_word("plaid_no_such_{one,two}.c", &ctx),
            vec!["plaid_no_such_one.c", "plaid_no_such_two.c"]
        );
    }

    #[test]
    #[serial]
    fn globbing_in_current_directory() {
        let dir = tempdir().unwrap();
        for name in [
            "one.c", "one.h", "one.o", "two.c", "three.c", "three.h", "three.o",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let old_cwd = env::current_dir().unwrap();
        env::set_current_dir(dir.path()).unwrap();
        let ctx = ctx_with_home("/home/me");

        let results = [
            (
                "*",
                vec!["one.c", "one.h", "one.o", "three.c", "three.h", "three.o", "two.c"],
            ),
            ("*.c", vec!["one.c", "three.c", "two.c"]),
            ("*.g", vec!["*.g"]),
            ("one.*", vec!["one.c", "one.h", "one.o"]),
            ("one.[ch]", vec!["one.c", "one.h"]),
            ("*.[chg]", vec!["one.c", "one.h", "three.c", "three.h", "two.c"]),
            ("{one,two}.c", vec!["one.c", "two.c"]),
            ("{one,three}.[ch]", vec!["one.c", "one.h", "three.c", "three.h"]),
        ]
        .map(|(pattern, expected)| (pattern, expand_word(pattern, &ctx), expected));

        env::set_current_dir(old_cwd).unwrap();
        for (pattern, actual, expected) in results {
            assert_eq!(actual, expected, "pattern {pattern}");
        }
    }

    #[test]
    fn expansion_respects_the_limit() {
        let ctx = ctx_with_home("/home/me");
        let words = super::expand_word("plaid_no_such_{a,b,c}", &ctx, 3).unwrap();
        assert_eq!(words.len(), 3);
        let err = super::expand_word("plaid_no_such_{a,b,c}", &ctx, 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooManyArguments);
    }
}
