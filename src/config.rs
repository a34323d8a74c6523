//! Parser limits and shell settings.
//!
//! `ParserConfig` is what the library needs; `ShellConfig` wraps it with the
//! interactive settings read from `~/.plaidshrc`.
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::utils::is_valid_var_name;

pub const DEFAULT_MAX_WORD_LEN: usize = 512;
pub const DEFAULT_MAX_EXPANSIONS: usize = 4096;
pub const DEFAULT_PROMPT: &str = "#> ";

/// What to do with a redirection whose path is the empty string
/// (for example `cat < ""`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyRedirect {
    /// Record the empty path; opening it fails later at execution time.
    #[default]
    Accept,
    /// Fail the parse with `RedirectionWithoutFilename`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Longest word the scanner will build, in characters.
    pub max_word_len: usize,
    /// Longest argument vector the builder will build; `None` is unbounded.
    pub max_args: Option<usize>,
    /// Most arguments a single word may expand into.
    pub max_expansions: usize,
    pub empty_redirect: EmptyRedirect,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_word_len: DEFAULT_MAX_WORD_LEN,
            max_args: None,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            empty_redirect: EmptyRedirect::Accept,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub parser: ParserConfig,
    pub history_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            parser: ParserConfig::default(),
            history_file: env::var_os("HOME").map(|home| PathBuf::from(home).join(".plaidsh_history")),
        }
    }
}

/// Load `~/.plaidshrc` on top of the defaults. A missing file is not an error.
pub fn load_config() -> io::Result<ShellConfig> {
    let mut config = ShellConfig::default();
    let Some(home) = env::var_os("HOME") else {
        return Ok(config);
    };
    let path = Path::new(&home).join(".plaidshrc");
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(config),
        Err(err) => return Err(err),
    };
    debug!("loading config from {}", path.display());
    apply_config_text(&mut config, &content);
    Ok(config)
}

/// Apply rc-file directives line by line; bad lines are reported and skipped.
pub fn apply_config_text(config: &mut ShellConfig, content: &str) {
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = apply_directive(config, line, idx + 1) {
            warn!("config:{}: {err}", idx + 1);
            eprintln!("config:{}: {err}", idx + 1);
        }
    }
}

fn apply_directive(config: &mut ShellConfig, line: &str, lineno: usize) -> Result<(), String> {
    if let Some(rest) = line.strip_prefix("export ") {
        return parse_assignment(rest, lineno);
    }
    let Some((key, value)) = line.split_once('=') else {
        return Err("unrecognized directive".to_string());
    };
    let key = key.trim();
    let value = strip_quotes(value.trim());
    match key {
        "prompt" | "PROMPT" => config.prompt = value.to_string(),
        "max_word_len" => {
            let limit = parse_limit(value, lineno)?;
            config.parser.max_word_len = limit;
        }
        "max_args" => {
            let limit = parse_limit(value, lineno)?;
            config.parser.max_args = Some(limit);
        }
        "max_expansions" => {
            config.parser.max_expansions = parse_limit(value, lineno)?;
        }
        "empty_redirect" => {
            config.parser.empty_redirect = match value.to_ascii_lowercase().as_str() {
                "accept" => EmptyRedirect::Accept,
                "reject" => EmptyRedirect::Reject,
                _ => {
                    return Err(format!(
                        "invalid empty_redirect '{value}' on line {lineno} (accept or reject)"
                    ))
                }
            };
        }
        "history" => {
            config.history_file = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        _ => return Err(format!("unknown setting '{key}' on line {lineno}")),
    }
    Ok(())
}

fn parse_limit(value: &str, lineno: usize) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("invalid limit '{value}' on line {lineno}")),
        Ok(limit) => Ok(limit),
    }
}

fn parse_assignment(input: &str, lineno: usize) -> Result<(), String> {
    let (name, value) = input
        .trim()
        .split_once('=')
        .ok_or_else(|| format!("assignment missing '=' on line {lineno}"))?;
    let name = name.trim();
    if !is_valid_var_name(name) {
        return Err(format!("invalid variable name '{name}' on line {lineno}"));
    }
    env::set_var(name, strip_quotes(value.trim()));
    Ok(())
}

fn strip_quotes(input: &str) -> &str {
    let bytes = input.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &input[1..bytes.len() - 1];
        }
    }
    input
}
