//! Format registry for template output
//!
//! Each view of a parsed template (the formatted source, the AST as JSON or YAML, a tree view)
//! implements [`Formatter`]. The CLI picks one by name from a [`FormatRegistry`] built from the
//! active configuration.

use crate::tmpl::ast::Template;
use crate::tmpl::config::FormatConfig;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    FormatNotFound(String),
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// A named rendering of a [`Template`].
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn serialize(&self, template: &Template) -> Result<String, FormatError>;

    /// One line shown next to the name in help output.
    fn description(&self) -> &str;
}

/// Formatters in the order they were registered.
pub struct FormatRegistry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// The built-in views, configured from `config`.
    pub fn with_config(config: &FormatConfig) -> Self {
        let mut registry = FormatRegistry {
            formatters: Vec::new(),
        };
        registry.register(super::TemplateFormatter::new(&config.formatting.indent));
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry.register(super::TreevizFormatter::new(
            config.inspect.show_line_numbers,
        ));
        registry
    }

    fn register(&mut self, formatter: impl Formatter + 'static) {
        self.formatters.retain(|known| known.name() != formatter.name());
        self.formatters.push(Box::new(formatter));
    }

    fn find(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters
            .iter()
            .find(|formatter| formatter.name() == name)
            .map(|formatter| formatter.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn serialize(&self, template: &Template, format: &str) -> Result<String, FormatError> {
        self.find(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?
            .serialize(template)
    }

    /// `(name, description)` of every view.
    pub fn describe(&self) -> Vec<(&str, &str)> {
        self.formatters
            .iter()
            .map(|formatter| (formatter.name(), formatter.description()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmpl::parsing::parse;

    struct CountingFormatter;

    impl Formatter for CountingFormatter {
        fn name(&self) -> &str {
            "template"
        }
        fn serialize(&self, template: &Template) -> Result<String, FormatError> {
            Ok(template.root().nodes.len().to_string())
        }
        fn description(&self) -> &str {
            "Node count"
        }
    }

    fn registry() -> FormatRegistry {
        FormatRegistry::with_config(&FormatConfig::default())
    }

    #[test]
    fn later_registration_replaces_by_name() {
        let mut registry = registry();
        registry.register(CountingFormatter);

        let template = parse("a{{ .B }}c").unwrap();
        assert_eq!(registry.serialize(&template, "template").unwrap(), "3");
        assert_eq!(registry.describe().len(), 4);
    }

    #[test]
    fn unknown_format() {
        let template = parse("").unwrap();
        assert!(!registry().has("nope"));
        assert_eq!(
            registry().serialize(&template, "nope"),
            Err(FormatError::FormatNotFound("nope".into()))
        );
    }

    #[test]
    fn built_in_views_in_order() {
        let binding = registry();
        let names: Vec<&str> = binding.describe().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["template", "ast-json", "ast-yaml", "ast-treeviz"]);
    }
}
