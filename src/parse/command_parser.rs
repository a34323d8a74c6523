use log::debug;

use crate::config::ParserConfig;
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::expansion::{expand_word, ExpansionContext};
use crate::parse::redirection_parser::{apply_redirection, classify_redirection};
use crate::parse::tokenizer::scan_word;
use crate::parse::Command;

/// Parse one line against the process environment with default limits.
pub fn parse_line(input: &str) -> ParseResult<Command> {
    let ctx = ExpansionContext::from_env();
    parse_line_with(input, &ParserConfig::default(), &ctx)
}

/// Parse one line into a `Command`.
///
/// A blank line yields an empty `Command`. Any error aborts the whole line;
/// the partially built command is dropped.
pub fn parse_line_with(
    input: &str,
    config: &ParserConfig,
    ctx: &ExpansionContext<'_>,
) -> ParseResult<Command> {
    let mut cmd = Command::new();
    let mut cursor = 0;

    while let Some(word) = scan_word(input, cursor, config, ctx)? {
        let word_pos = cursor + leading_whitespace(&input[cursor..]);
        cursor += word.consumed;
        if word.is_blank() {
            continue;
        }

        if let Some(redirection) = classify_redirection(&word.text) {
            apply_redirection(&mut cmd, redirection, config)
                .map_err(|err| err.with_position(word_pos))?;
        } else {
            let budget = match config.max_args {
                Some(max) => max.saturating_sub(cmd.argc()).min(config.max_expansions),
                None => config.max_expansions,
            };
            let expanded = expand_word(&word.text, ctx, budget)
                .map_err(|err| err.with_position(word_pos))?;
            for arg in expanded {
                if config.max_args.is_some_and(|max| cmd.argc() >= max) {
                    return Err(ParseError::new(ErrorKind::TooManyArguments)
                        .with_position(word_pos));
                }
                cmd.append_arg(arg);
            }
        }

        // A redirection may never come before the program name.
        if cmd.argc() == 0 {
            return Err(ParseError::new(ErrorKind::MissingCommand)
                .with_position(word_pos)
                .with_context("Put the program name before any < or > redirection"));
        }
    }

    debug!(
        "parsed argv={:?} stdin={:?} stdout={:?}",
        cmd.args(),
        cmd.input_redirect(),
        cmd.output_redirect()
    );
    Ok(cmd)
}

fn leading_whitespace(input: &str) -> usize {
    input.len() - input.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmptyRedirect;
    use proptest::prelude::*;

    fn foo_ctx() -> ExpansionContext<'static> {
        ExpansionContext::with_vars(&[("FOO", "Carnegie Mellon")])
    }

    fn parse(input: &str) -> ParseResult<Command> {
        parse_line_with(input, &ParserConfig::default(), &foo_ctx())
    }

    fn expect(input: &str, stdin: Option<&str>, stdout: Option<&str>, argv: &[&str]) {
        let cmd = parse(input).unwrap_or_else(|err| panic!("[{input}] failed: {err}"));
        assert_eq!(cmd.input_redirect(), stdin, "[{input}] stdin");
        assert_eq!(cmd.output_redirect(), stdout, "[{input}] stdout");
        assert_eq!(cmd.args(), argv, "[{input}] argv");
    }

    fn expect_err(input: &str, message: &str) {
        match parse(input) {
            Ok(cmd) => panic!("[{input}] expected error, got\n{cmd}"),
            Err(err) => assert_eq!(err.message, message, "[{input}]"),
        }
    }

    #[test]
    fn blank_lines_give_empty_command() {
        for input in ["", "   ", "   \n"] {
            let cmd = parse(input).unwrap();
            assert!(cmd.is_empty(), "[{input:?}]");
        }
    }

    #[test]
    fn basic_commands() {
        let argv = ["echo", "this", "is", "a", "test"];
        expect("echo this is a test", None, None, &argv);
        expect("echo  this is  a test   ", None, None, &argv);
        expect("echo \tthis  is\ta\ntest   \n", None, None, &argv);
        expect("echo one\\n two\\r", None, None, &["echo", "one\n", "two\r"]);
        expect("echo \"one two\"", None, None, &["echo", "one two"]);
        expect("echo one\\ two", None, None, &["echo", "one two"]);
        expect("echo \\\"one   two", None, None, &["echo", "\"one", "two"]);
        expect("echo one \"# no comment\"", None, None, &["echo", "one", "# no comment"]);
        expect("one \"two three\" four", None, None, &["one", "two three", "four"]);
        expect("\\n\\t\\r\\\\\\ \\\"   ", None, None, &["\n\t\r\\ \""]);
    }

    #[test]
    fn variable_substitution() {
        expect("echo $FOO", None, None, &["echo", "Carnegie Mellon"]);
        expect("echo -$FOO-", None, None, &["echo", "-Carnegie Mellon-"]);
        expect("echo \"$FOO\"", None, None, &["echo", "Carnegie Mellon"]);
        expect("echo \"-$FOO-\"", None, None, &["echo", "-Carnegie Mellon-"]);
    }

    #[test]
    fn redirections() {
        expect("cat < /etc/passwd > /tmp/a_file", Some("/etc/passwd"), Some("/tmp/a_file"), &["cat"]);
        expect("cat </etc/passwd >/tmp/a_file", Some("/etc/passwd"), Some("/tmp/a_file"), &["cat"]);
        expect("cat </etc/passwd ", Some("/etc/passwd"), None, &["cat"]);
        expect("cat \"</etc/passwd\" ", Some("/etc/passwd"), None, &["cat"]);
        expect("cat >/tmp/afile   ", None, Some("/tmp/afile"), &["cat"]);
        expect("cat \">/tmp/afile \"   ", None, Some("/tmp/afile "), &["cat"]);
        expect("grep foobar < /tmp/afile   ", Some("/tmp/afile"), None, &["grep", "foobar"]);
        expect("grep $FOO < /tmp/afile   ", Some("/tmp/afile"), None, &["grep", "Carnegie Mellon"]);
        expect("grep $FOO</tmp/afile   ", Some("/tmp/afile"), None, &["grep", "Carnegie Mellon"]);
        expect("grep $FOO\\> ", None, None, &["grep", "Carnegie Mellon>"]);
        expect("echo $FOO\\< ", None, None, &["echo", "Carnegie Mellon<"]);
    }

    #[test]
    fn redirect_targets_are_not_expanded() {
        expect("cat < *.rs", Some("*.rs"), None, &["cat"]);
        expect("cat > {a,b}", None, Some("{a,b}"), &["cat"]);
    }

    #[test]
    fn error_cases() {
        expect_err("grep $FOO <    ", "Redirection without filename");
        expect_err("grep $FOO <", "Redirection without filename");
        expect_err("grep $FOO >", "Redirection without filename");
        expect_err("grep $FOO > ", "Redirection without filename");
        expect_err("grep $FOO> ", "Redirection without filename");
        expect_err("cat < /a/file </a/different/file", "Multiple redirections not allowed");
        expect_err("cat > /a/file >/a/different/file", "Multiple redirections not allowed");
        expect_err("<foo", "Missing command");
        expect_err("  < foo", "Missing command");
        expect_err(">  foo", "Missing command");
        expect_err("echo \"oops", "Unterminated quote");
        expect_err("echo $NOPE_NOT_SET", "Undefined variable: 'NOPE'");
    }

    #[test]
    fn many_arguments_are_fine_by_default() {
        let input = format!("grep {}", (1..=21).map(|n| n.to_string()).collect::<Vec<_>>().join(" "));
        let cmd = parse(&input).unwrap();
        assert_eq!(cmd.argc(), 22);
        assert_eq!(cmd.args()[21], "21");
    }

    #[test]
    fn argument_limit() {
        let config = ParserConfig {
            max_args: Some(3),
            ..ParserConfig::default()
        };
        assert!(parse_line_with("a b c", &config, &foo_ctx()).is_ok());
        let err = parse_line_with("a b c d", &config, &foo_ctx()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooManyArguments);
        assert_eq!(err.position, Some(6));
    }

    #[test]
    fn brace_blowup_is_cut_off_early() {
        let line = format!("echo {}", "{a,b}".repeat(30));
        let err = parse(&line).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooManyArguments);
        assert_eq!(err.position, Some(5));

        let limited = ParserConfig {
            max_args: Some(20),
            ..ParserConfig::default()
        };
        let err = parse_line_with(&line, &limited, &foo_ctx()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooManyArguments);

        let small = ParserConfig {
            max_expansions: 4,
            ..ParserConfig::default()
        };
        let cmd = parse_line_with("echo x{a,b}{1,2}", &small, &foo_ctx()).unwrap();
        assert_eq!(cmd.args(), ["echo", "xa1", "xa2", "xb1", "xb2"]);
        assert!(parse_line_with("echo x{a,b,c}{1,2}", &small, &foo_ctx()).is_err());
    }

    #[test]
    fn empty_redirect_path_policy() {
        expect("cat < \"\"", Some(""), None, &["cat"]);
        let strict = ParserConfig {
            empty_redirect: EmptyRedirect::Reject,
            ..ParserConfig::default()
        };
        let err = parse_line_with("cat < \"\"", &strict, &foo_ctx()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RedirectionWithoutFilename);
    }

    #[test]
    fn quoted_empty_string_is_an_argument() {
        expect("echo \"\" x", None, None, &["echo", "", "x"]);
    }

    #[test]
    fn error_positions_are_line_relative() {
        let err = parse("echo ok \\q").unwrap_err();
        assert_eq!(err.position, Some(9));
        let err = parse("cat <a   <b").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MultipleRedirections);
        assert_eq!(err.position, Some(9));
    }

    proptest! {
        #[test]
        fn whitespace_never_makes_empty_arguments(
            words in prop::collection::vec("[a-z0-9]{1,8}", 1..6),
            gaps in prop::collection::vec("[ \t]{1,4}", 7),
        ) {
            let mut line = gaps[0].clone();
            for (idx, word) in words.iter().enumerate() {
                line.push_str(word);
                line.push_str(&gaps[idx + 1]);
            }
            let cmd = parse(&line).unwrap();
            prop_assert_eq!(cmd.args(), words.as_slice());
        }
    }
}
