use crate::cmdline::ast::{Output, ParsedCommand, RedirectMode};
use crate::cmdline::parser::{parse_command, tokenize};
use proptest::prelude::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_parser_basic() {
    let parsed = parse_command("shell ps -A");
    assert_eq!(parsed, ParsedCommand::simple(args(&["shell", "ps", "-A"])));
}

#[test]
fn test_parser_collapses_whitespace() {
    let parsed = parse_command("   logcat\t -d   ");
    assert_eq!(parsed.args, args(&["logcat", "-d"]));
    assert_eq!(parsed.output, Output::Terminal);
}

#[test]
fn test_parser_empty_line() {
    let parsed = parse_command("");
    assert!(parsed.args.is_empty());
    assert_eq!(parsed.output, Output::Terminal);
}

#[test]
fn test_parser_overwrite() {
    let parsed = parse_command("logcat -d > out.txt");
    assert_eq!(parsed.args, args(&["logcat", "-d"]));
    assert_eq!(
        parsed.output,
        Output::File {
            target: "out.txt".to_string(),
            mode: RedirectMode::Overwrite
        }
    );
}

#[test]
fn test_parser_overwrite_without_spaces() {
    let parsed = parse_command("logcat -d>out.txt");
    assert_eq!(parsed.args, args(&["logcat", "-d"]));
    assert_eq!(parsed.redirect_mode(), Some(RedirectMode::Overwrite));
}

#[test]
fn test_parser_append() {
    let parsed = parse_command("shell dumpsys battery >> battery.log ");
    assert_eq!(parsed.args, args(&["shell", "dumpsys", "battery"]));
    assert_eq!(
        parsed.output,
        Output::File {
            target: "battery.log".to_string(),
            mode: RedirectMode::Append
        }
    );
}

#[test]
fn test_parser_append_takes_precedence_over_earlier_overwrite() {
    let parsed = parse_command("shell echo a > b >> c");
    assert_eq!(parsed.args, args(&["shell", "echo", "a", ">", "b"]));
    assert_eq!(parsed.redirect_mode(), Some(RedirectMode::Append));
    assert!(matches!(parsed.output, Output::File { ref target, .. } if target == "c"));
}

#[test]
fn test_parser_target_keeps_inner_spaces() {
    let parsed = parse_command("bugreport >   my report.zip  ");
    assert!(matches!(parsed.output, Output::File { ref target, .. } if target == "my report.zip"));
}

#[test]
fn test_parser_pipe() {
    let parsed = parse_command("shell ps | grep foo");
    assert_eq!(parsed.args, args(&["shell", "ps"]));
    assert_eq!(parsed.continuation(), Some(&args(&["grep", "foo"])[..]));
    assert_eq!(parsed.redirect_mode(), None);
}

#[test]
fn test_parser_pipe_beats_redirect() {
    let parsed = parse_command("logcat -d > out.txt | grep foo");
    assert_eq!(parsed.args, args(&["logcat", "-d", ">", "out.txt"]));
    assert_eq!(parsed.continuation(), Some(&args(&["grep", "foo"])[..]));
}

#[test]
fn test_parser_only_first_pipe_splits() {
    let parsed = parse_command("shell ps | grep foo | wc -l");
    assert_eq!(parsed.continuation(), Some(&args(&["grep", "foo", "|", "wc", "-l"])[..]));
}

#[test]
fn test_parser_quoted_redirect_ignored() {
    let parsed = parse_command(r#"echo "a > b""#);
    assert_eq!(parsed.output, Output::Terminal);
    // Quotes are not honoured by tokenizing, only by operator search
    assert_eq!(parsed.args, args(&["echo", "\"a", ">", "b\""]));
}

#[test]
fn test_parser_single_quoted_pipe_ignored() {
    let parsed = parse_command("shell 'ps | grep x'");
    assert_eq!(parsed.output, Output::Terminal);
}

#[test]
fn test_parser_double_quote_inside_single() {
    // The double quote is literal inside single quotes, so the pipe after it is live
    let parsed = parse_command(r#"shell 'say "hi' | cat"#);
    assert_eq!(parsed.continuation(), Some(&args(&["cat"])[..]));
}

#[test]
fn test_parser_operator_after_quoted_span() {
    let parsed = parse_command(r#"shell echo "x>y" > out.txt"#);
    assert!(matches!(parsed.output, Output::File { ref target, mode: RedirectMode::Overwrite } if target == "out.txt"));
}

#[test]
fn test_parser_unbalanced_quote_hides_rest() {
    let parsed = parse_command(r#"shell echo "oops > out.txt"#);
    assert_eq!(parsed.output, Output::Terminal);
}

#[test]
fn test_parser_trailing_pipe_has_empty_continuation() {
    let parsed = parse_command("shell ps |");
    assert_eq!(parsed.continuation(), Some(&[] as &[String]));
}

#[test]
fn test_tokenize() {
    assert_eq!(tokenize(" a  b\tc\n"), args(&["a", "b", "c"]));
    assert!(tokenize("   ").is_empty());
}

fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._/-]{1,8}"
}

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word(), 1..5)
}

proptest! {
    #[test]
    fn prop_pipe_always_wins(left in words(), right in words(), redirect in prop::bool::ANY, file in word()) {
        let line = if redirect {
            format!("{} > {} | {}", left.join(" "), file, right.join(" "))
        } else {
            format!("{} | {} >> {}", left.join(" "), right.join(" "), file)
        };
        let parsed = parse_command(&line);
        prop_assert_eq!(parsed.redirect_mode(), None);
        let continuation = parsed.continuation().unwrap_or_default();
        prop_assert!(!continuation.is_empty());
    }

    #[test]
    fn prop_append_target_is_trimmed_tail(left in words(), file in word(), pad in " {0,3}") {
        let line = format!("{} >>{}{}{}", left.join(" "), pad, file, pad);
        let parsed = parse_command(&line);
        prop_assert_eq!(parsed.args, left);
        prop_assert_eq!(parsed.output, Output::File { target: file, mode: RedirectMode::Append });
    }

    #[test]
    fn prop_single_gt_is_overwrite(left in words(), file in word()) {
        let line = format!("{} > {}", left.join(" "), file);
        let parsed = parse_command(&line);
        prop_assert_eq!(parsed.redirect_mode(), Some(RedirectMode::Overwrite));
        prop_assert_eq!(parsed.args, left);
    }

    #[test]
    fn prop_quoted_operators_are_ignored(left in words(), inner in words(), op in prop::sample::select(vec!["|", ">", ">>"])) {
        let line = format!("{} \"{} {} x\"", left.join(" "), inner.join(" "), op);
        let parsed = parse_command(&line);
        prop_assert_eq!(parsed.output, Output::Terminal);
    }

    #[test]
    fn prop_parse_is_idempotent(line in ".{0,40}") {
        prop_assert_eq!(parse_command(&line), parse_command(&line));
    }
}
