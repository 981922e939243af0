//! Property-based tests for the formatter
//!
//! Templates are generated from a small grammar of valid constructs with random whitespace
//! between the pieces. For every generated template:
//!   - formatting succeeds
//!   - formatting the output again changes nothing
//!   - apart from whitespace inside actions, the output lexes to the same tokens as the input

use proptest::prelude::*;
use tmplfmt::format;
use tmplfmt::tmpl::lexing::{tokenize, TokenKind};

fn gap() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(" ".to_string()),
        Just("  ".to_string()),
        Just("\n".to_string()),
        Just("\n\t".to_string()),
        Just(" \n  ".to_string()),
    ]
}

fn optional_gap() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), gap()]
}

fn callable() -> impl Strategy<Value = String> {
    prop_oneof![
        "fn[a-z]{0,3}".prop_map(String::from),
        "\\.[A-Z][a-z]{0,3}".prop_map(String::from),
    ]
}

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[1-9][0-9]{0,3}".prop_map(String::from),
        "\"[a-z ]{0,4}\"".prop_map(String::from),
        "\\$[a-z]{1,3}".prop_map(String::from),
        Just(".".to_string()),
        Just("true".to_string()),
    ]
}

fn operand() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![callable(), literal()];
    leaf.prop_recursive(2, 8, 3, |inner| {
        (
            optional_gap(),
            callable(),
            prop::collection::vec((gap(), inner), 0..3),
            optional_gap(),
        )
            .prop_map(|(before, head, rest, after)| {
                let args: String = rest.into_iter().map(|(g, arg)| g + &arg).collect();
                format!("({}{}{}{})", before, head, args, after)
            })
    })
}

fn command(first: BoxedStrategy<String>) -> impl Strategy<Value = String> {
    (first, prop::collection::vec((gap(), operand()), 0..3)).prop_map(|(head, rest)| {
        let args: String = rest.into_iter().map(|(g, arg)| g + &arg).collect();
        head + &args
    })
}

fn pipeline() -> impl Strategy<Value = String> {
    let separator = prop_oneof![
        Just("|".to_string()),
        Just(" | ".to_string()),
        Just("\n| ".to_string()),
        Just(" |\n".to_string()),
    ];
    (
        command(operand().boxed()),
        prop::collection::vec((separator, command(callable().boxed())), 0..3),
    )
        .prop_map(|(first, rest)| {
            let stages: String = rest.into_iter().map(|(sep, cmd)| sep + &cmd).collect();
            first + &stages
        })
}

fn left_delim() -> impl Strategy<Value = String> {
    prop_oneof![Just("{{".to_string()), Just("{{- ".to_string())]
}

fn right_delim() -> impl Strategy<Value = String> {
    prop_oneof![Just("}}".to_string()), Just(" -}}".to_string())]
}

fn action() -> impl Strategy<Value = String> {
    (left_delim(), optional_gap(), pipeline(), optional_gap(), right_delim())
        .prop_map(|(open, before, pipe, after, close)| open + &before + &pipe + &after + &close)
}

fn text() -> impl Strategy<Value = String> {
    "[a-z<>/ \n\t]{0,8}".prop_map(String::from)
}

fn comment() -> impl Strategy<Value = String> {
    "[a-z ]{0,5}".prop_map(|body| format!("{{{{/* {} */}}}}", body))
}

fn template() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![text(), action(), comment()];
    let items = leaf.prop_recursive(3, 24, 4, |inner| {
        let body = prop::collection::vec(inner, 0..4).prop_map(|parts| parts.concat());
        let keyword = prop_oneof![
            Just("if ".to_string()),
            Just("with ".to_string()),
            Just("range ".to_string()),
            Just("range $k, $v := ".to_string()),
        ];
        (
            left_delim(),
            keyword,
            pipeline(),
            right_delim(),
            body.clone(),
            prop::option::of(body),
        )
            .prop_map(|(open, keyword, pipe, close, list, alternative)| {
                let alternative = alternative
                    .map(|list| format!("{{{{else}}}}{}", list))
                    .unwrap_or_default();
                format!("{}{}{}{}{}{}{{{{end}}}}", open, keyword, pipe, close, list, alternative)
            })
    });
    prop::collection::vec(items, 0..5).prop_map(|parts| parts.concat())
}

/// Tokens with whitespace inside actions removed.
fn significant_tokens(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .into_iter()
        .filter(|token| token.kind != TokenKind::Space)
        .map(|token| (token.kind, token.value))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generated_templates_format(source in template()) {
        let formatted = format(&source);
        prop_assert!(formatted.is_ok(), "{:?} failed: {:?}", source, formatted);
    }

    #[test]
    fn formatting_is_idempotent(source in template()) {
        let once = format(&source).unwrap();
        let twice = format(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn only_whitespace_inside_actions_changes(source in template()) {
        let formatted = format(&source).unwrap();
        prop_assert_eq!(significant_tokens(&source), significant_tokens(&formatted));
    }
}
