//! Configuration loading.
//!
//! `defaults/tmplfmt.default.toml` is embedded so the documented defaults and runtime behavior
//! stay in sync. Callers layer their own files and overrides on top with [`Loader`] before the
//! result is deserialized into [`FormatConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/tmplfmt.default.toml");

/// Everything the formatter and its command line read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormatConfig {
    pub formatting: FormattingConfig,
    pub diagnostics: DiagnosticsConfig,
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormattingConfig {
    /// One indentation unit.
    pub indent: String,
}

/// How parse errors are rendered for people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiagnosticsConfig {
    pub quote_text: bool,
    pub source_context: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct InspectConfig {
    pub show_line_numbers: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            quote_text: false,
            source_context: true,
        }
    }
}

/// Layers configuration sources over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file. A missing file is an error at build time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set a single key, e.g. `formatting.indent`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<FormatConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
