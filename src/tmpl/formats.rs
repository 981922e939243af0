//! Output formats
//!
//!     Named views of a parsed template, looked up through a [`FormatRegistry`]:
//!
//!     - `template`: the formatted source
//!     - `ast-json` / `ast-yaml`: the node tree through serde
//!     - `ast-treeviz`: a one line per node tree view

pub mod registry;
pub mod serialized;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use serialized::{JsonFormatter, TemplateFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
