//! Failures through the public API: messages, positions and terminal reports.

use rstest::rstest;
use tmplfmt::format;
use tmplfmt::tmpl::config::DiagnosticsConfig;

#[rstest(
    input,
    message,
    case("{{if .X}}a", "template: 1:11: unexpected EOF"),
    case("{{|}}", "template: 1:3: missing value for command"),
    case("{{end}}", "template: 1:1: unexpected {{ end }}"),
    case("a\n{{else}}", "template: 2:1: unexpected {{ else }}"),
    case("{{ 1 | 2 }}", "template: 1:8: non executable command in pipeline stage 2"),
    case(
        "{{range $a, 1}}{{end}}",
        "template: 1:13: range can only initialize variables"
    ),
    case(
        "{{with $a, $b := .}}{{end}}",
        "template: 1:10: too many declarations in with"
    ),
    case(
        "{{ .X\n (.Y }}",
        "template: 2:6: unclosed left paren in action started at line 1"
    ),
    case("{{ 0x }}", "template: 1:4: illegal number syntax: \"0x\"")
)]
fn reports(input: &str, message: &str) {
    let error = format(input).unwrap_err();
    assert_eq!(error.to_string(), message);
}

#[test]
fn report_shows_snippet_and_context() {
    let source = "<ul>\n  {{ .X | 1 }}\n</ul>";
    let error = format(source).unwrap_err();
    let report = error.render(source, &DiagnosticsConfig::default());

    assert!(report.starts_with("template: 2:11: non executable command in pipeline stage 2"));
    assert!(report.contains("\n  near: 1\n"));
    assert!(report.contains(">>   2 |   {{ .X | 1 }}"));
    assert!(report.contains("     1 | <ul>"));
}

#[test]
fn quoted_snippets_show_whitespace() {
    let source = "{{ .X }}{{end}}";
    let error = format(source).unwrap_err();
    let diagnostics = DiagnosticsConfig {
        quote_text: true,
        source_context: false,
    };
    assert_eq!(
        error.render(source, &diagnostics),
        "template: 1:9: unexpected {{ end }}\n  near: \"end\""
    );
}

#[test]
fn eof_errors_have_no_snippet() {
    let source = "{{ with .X }}";
    let error = format(source).unwrap_err();
    let diagnostics = DiagnosticsConfig {
        quote_text: false,
        source_context: false,
    };
    assert_eq!(
        error.render(source, &diagnostics),
        "template: 1:14: unexpected EOF"
    );
}

#[test]
fn deep_nesting_fails_cleanly() {
    let depth = 100_000;
    let branches = "{{if .}}".repeat(depth) + &"{{end}}".repeat(depth);
    let error = format(&branches).unwrap_err();
    // The 101st `{{if .}}` starts at byte 800.
    assert_eq!(
        error.to_string(),
        "template: 1:801: max nesting depth of 100 exceeded"
    );

    let parens = format!("{{{{ {}.{} }}}}", "(".repeat(depth), ")".repeat(depth));
    let error = format(&parens).unwrap_err();
    assert_eq!(
        error.to_string(),
        "template: 1:104: max nesting depth of 100 exceeded"
    );
}
