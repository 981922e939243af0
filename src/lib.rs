//! # tmplfmt
//!
//! A whitespace formatter for `text/template` style templates.
//!
//! Text outside of `{{ … }}` is left exactly as written. Inside delimiters the formatter
//! normalizes spacing: one space after `{{` and before `}}`, single spaces between operands,
//! ` | ` between pipeline stages, ` := ` in declarations. Line breaks between operands are kept
//! and re-indented. Trim markers (`{{-`, `-}}`) are preserved.
//!
//! ```text
//! {{range $k,$v:=.M}}{{$k}}{{end}}   →   {{ range $k, $v := .M }}{{ $k }}{{ end }}
//! ```
//!
//! Formatting is idempotent and never changes anything but whitespace inside delimiters.

pub mod tmpl;

pub use tmpl::ast::{ParseError, ParseResult, Template};
pub use tmpl::config::FormatConfig;

/// Formats a template with the default configuration.
pub fn format(source: &str) -> ParseResult<String> {
    format_with(source, &FormatConfig::default())
}

/// Formats a template with an explicit configuration.
pub fn format_with(source: &str, config: &FormatConfig) -> ParseResult<String> {
    let template = tmpl::parsing::parse(source)?;
    Ok(tmpl::printing::print(&template, &config.formatting.indent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_defaults() {
        assert_eq!(format("{{.X}}").unwrap(), "{{ .X }}");
    }

    #[test]
    fn failure_produces_no_output() {
        let err = format("ok {{ if .X }}").unwrap_err();
        assert_eq!(err.kind, tmpl::ast::ErrorKind::UnexpectedEof);
    }
}
