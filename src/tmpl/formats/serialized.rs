//! Formatters backed by the printer and by serde.

use super::registry::{FormatError, Formatter};
use crate::tmpl::ast::Template;
use crate::tmpl::printing;

/// The whitespace-normalized template itself.
pub struct TemplateFormatter {
    indent: String,
}

impl TemplateFormatter {
    pub fn new(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
        }
    }
}

impl Formatter for TemplateFormatter {
    fn name(&self) -> &str {
        "template"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        Ok(printing::print(template, &self.indent))
    }

    fn description(&self) -> &str {
        "Formatted template source"
    }
}

/// The AST as pretty-printed JSON.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "ast-json"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        serde_json::to_string_pretty(template.root())
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "AST as JSON"
    }
}

/// The AST as YAML.
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "ast-yaml"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        serde_yaml::to_string(template.root())
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "AST as YAML"
    }
}
