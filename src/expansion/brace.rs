use crate::error::{ErrorKind, ParseError, ParseResult};

/// Expand `{a,b,c}` groups into their alternatives, in written order.
///
/// Several groups produce their cross product and groups may nest. A group
/// without a top-level comma, or a `{` with no matching `}`, is literal text.
/// Generation stops with `TooManyArguments` as soon as more than `limit`
/// words would be produced.
pub fn expand_braces(word: &str, limit: usize) -> ParseResult<Vec<String>> {
    let mut out = Vec::new();
    expand_from(word, 0, limit, &mut out)?;
    Ok(out)
}

fn expand_from(word: &str, start: usize, limit: usize, out: &mut Vec<String>) -> ParseResult<()> {
    let Some((open, close)) = find_group(word, start) else {
        if out.len() >= limit {
            return Err(ParseError::new(ErrorKind::TooManyArguments)
                .with_context(format!("Brace expansion is limited to {limit} words")));
        }
        out.push(word.to_string());
        return Ok(());
    };
    let prefix = &word[..open];
    let suffix = &word[close + 1..];
    for alternative in split_alternatives(&word[open + 1..close]) {
        let combined = format!("{prefix}{alternative}{suffix}");
        // Nothing before `open` can form a group, so resume the search there.
        expand_from(&combined, open, limit, out)?;
    }
    Ok(())
}

/// Byte offsets of the first expandable `{` ... `}` at or after `start`.
fn find_group(word: &str, start: usize) -> Option<(usize, usize)> {
    let bytes = word.as_bytes();
    let mut open = start;
    while open < bytes.len() {
        if bytes[open] == b'{' {
            if let Some(close) = matching_close(bytes, open) {
                if has_top_level_comma(&bytes[open + 1..close]) {
                    return Some((open, close));
                }
            }
        }
        open += 1;
    }
    None
}

fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn has_top_level_comma(body: &[u8]) -> bool {
    let mut depth = 0usize;
    for &byte in body {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;
    for (idx, byte) in body.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[last..idx]);
                last = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[last..]);
    parts
}
