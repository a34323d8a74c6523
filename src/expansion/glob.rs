use glob::{glob_with, MatchOptions};
use log::{debug, warn};

/// True when `token` contains a wildcard the glob matcher understands.
pub fn glob_pattern(token: &str) -> bool {
    token.contains(['*', '?', '['])
}

/// Match `pattern` against the filesystem.
///
/// Matches come back sorted. No match, or a malformed pattern, yields the
/// pattern itself as the only result.
pub fn expand_glob(pattern: &str) -> Vec<String> {
    if !glob_pattern(pattern) {
        return vec![pattern.to_string()];
    }
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = match glob_with(pattern, options) {
        Ok(paths) => paths,
        Err(err) => {
            debug!("glob pattern {pattern:?} rejected: {err}");
            return vec![pattern.to_string()];
        }
    };

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path.display().to_string()),
            Err(err) => warn!("glob: skipping unreadable entry: {err}"),
        }
    }
    if matches.is_empty() {
        vec![pattern.to_string()]
    } else {
        matches.sort();
        matches
    }
}
