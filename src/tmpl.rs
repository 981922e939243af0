//! Template formatting
//!
//!     The pipeline is lexing, parsing, then printing:
//!
//!         source ──lexing──▶ tokens ──parsing──▶ Template (AST) ──printing──▶ formatted source
//!
//!     - lexing: two-mode lexer (text outside delimiters, actions inside) built on logos
//!     - parsing: recursive descent with bounded look-ahead, literal typing and unquoting
//!     - ast: node types, positions, errors, snapshots
//!     - printing: the whitespace-normalizing printer
//!     - formats: named output views (formatted template, JSON, YAML, tree view)
//!     - config: layered TOML configuration
//!     - files: reading input and atomically writing output
//!
//!     Formatting is all or nothing: any lexical or syntax error fails the whole call and no
//!     partial output is produced.

pub mod ast;
pub mod config;
pub mod files;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod printing;
