//! Parser and expansion core of Plaid Shell.
//!
//! This crate exposes the word scanner and the command builder so the shell
//! binary, fuzz targets and tests can link them without the interactive deps.
//!
//! ```no_run
//! let cmd = plaid_shell::parse_line("cat < /etc/passwd > /tmp/out").unwrap();
//! assert_eq!(cmd.args(), ["cat"]);
//! assert_eq!(cmd.input_redirect(), Some("/etc/passwd"));
//! ```

pub mod config;
pub mod error;
mod expansion;
mod parse;
mod utils;

pub use config::{EmptyRedirect, ParserConfig, ShellConfig};
pub use error::{ErrorKind, ParseError, ParseResult};
pub use expansion::{
    expand_braces, expand_glob, expand_tilde, expand_word, glob_pattern, has_pattern,
    home_from_system, ExpansionContext,
};
pub use parse::{parse_line, parse_line_with, scan_word, scan_word_env, Command, Word};
pub use utils::is_valid_var_name;

/// Fuzz helper for scanner-only targets.
pub fn fuzz_scan_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let ctx = ExpansionContext {
        lookup_var: Box::new(|name| (!name.is_empty()).then(|| name.to_lowercase())),
        lookup_home: Box::new(|_| None),
    };
    let config = ParserConfig::default();
    let mut cursor = 0;
    while let Ok(Some(word)) = scan_word(&input, cursor, &config, &ctx) {
        assert!(word.consumed > 0, "scanner made no progress at {cursor}");
        cursor += word.consumed;
        assert!(cursor <= input.len());
    }
}

/// Fuzz helper for scanner+builder+expansion targets.
pub fn fuzz_parse_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    let ctx = ExpansionContext {
        lookup_var: Box::new(|_| Some(String::new())),
        lookup_home: Box::new(|_| None),
    };
    if let Ok(cmd) = parse_line_with(&input, &ParserConfig::default(), &ctx) {
        assert!(cmd.argc() > 0 || cmd.is_empty());
    }
}
