use log::debug;

use crate::config::{EmptyRedirect, ParserConfig};
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::parse::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Redirection<'w> {
    Input(&'w str),
    Output(&'w str),
}

/// A word starting with `<` or `>` is a redirection; the rest of the word is
/// the path, taken literally.
pub(crate) fn classify_redirection(word: &str) -> Option<Redirection<'_>> {
    if let Some(path) = word.strip_prefix('<') {
        return Some(Redirection::Input(path));
    }
    word.strip_prefix('>').map(Redirection::Output)
}

pub(crate) fn apply_redirection(
    current: &mut Command,
    redirection: Redirection<'_>,
    config: &ParserConfig,
) -> ParseResult<()> {
    let path = match redirection {
        Redirection::Input(path) | Redirection::Output(path) => path,
    };
    if path.is_empty() && config.empty_redirect == EmptyRedirect::Reject {
        return Err(ParseError::new(ErrorKind::RedirectionWithoutFilename)
            .with_context("The redirection target is an empty string"));
    }
    debug!("redirect {redirection:?}");
    match redirection {
        Redirection::Input(path) => current.set_input(path),
        Redirection::Output(path) => current.set_output(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_first_char() {
        assert_eq!(classify_redirection("</etc/passwd"), Some(Redirection::Input("/etc/passwd")));
        assert_eq!(classify_redirection(">out"), Some(Redirection::Output("out")));
        assert_eq!(classify_redirection(">"), Some(Redirection::Output("")));
        assert_eq!(classify_redirection("a<b"), None);
        assert_eq!(classify_redirection("cat"), None);
    }

    #[test]
    fn second_redirect_of_same_direction_fails() {
        let config = ParserConfig::default();
        let mut cmd = Command::new();
        apply_redirection(&mut cmd, Redirection::Input("a"), &config).unwrap();
        apply_redirection(&mut cmd, Redirection::Output("b"), &config).unwrap();
        let err = apply_redirection(&mut cmd, Redirection::Output("c"), &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleRedirections);
    }

    #[test]
    fn empty_path_policy() {
        let mut cmd = Command::new();
        apply_redirection(&mut cmd, Redirection::Input(""), &ParserConfig::default()).unwrap();
        assert_eq!(cmd.input_redirect(), Some(""));

        let strict = ParserConfig {
            empty_redirect: EmptyRedirect::Reject,
            ..ParserConfig::default()
        };
        let mut cmd = Command::new();
        let err = apply_redirection(&mut cmd, Redirection::Output(""), &strict).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RedirectionWithoutFilename);
        assert_eq!(cmd.output_redirect(), None);
    }
}
