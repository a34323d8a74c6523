/// Characters allowed in a `$NAME` reference.
pub(crate) fn is_var_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// Names accepted by `setenv` and `export`: letter or underscore first,
/// then letters, digits, or underscores.
pub fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_names() {
        assert!(is_valid_var_name("FOO"));
        assert!(is_valid_var_name("_foo9"));
        assert!(!is_valid_var_name("9foo"));
        assert!(!is_valid_var_name(""));
        assert!(!is_valid_var_name("a-b"));
    }

    #[test]
    fn reference_chars_exclude_underscore() {
        assert!(is_var_char('a'));
        assert!(is_var_char('7'));
        assert!(!is_var_char('_'));
        assert!(!is_var_char('-'));
    }
}
