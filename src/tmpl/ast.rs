//! Template AST
//!
//!     A parsed template is a [`Template`]: the source text, a line index and a root
//!     [`ListNode`]. Lists hold [`Node`]s (text, comments, actions, branches); actions and
//!     branches hold [`PipeNode`]s made of commands whose operands are [`Arg`]s.
//!
//!     - nodes: node definitions and their canonical one-line `Display`
//!     - range: byte offset to line/column conversion
//!     - template: the document wrapper, indentation prefixes and named definitions
//!     - error: parse errors and their rendering
//!     - snapshot: normalized tree used by the inspection views

pub mod error;
pub mod nodes;
pub mod range;
pub mod snapshot;
pub mod template;

pub use error::{format_source_context, ErrorKind, ParseError, ParseResult};
pub use nodes::{
    ActionNode, Arg, BoolNode, BranchKeyword, BranchNode, ChainNode, CommandNode, CommentNode,
    DotNode, ElseNode, EndNode, FieldNode, IdentifierNode, ListNode, NilNode, Node, NumberNode,
    PipeNode, StringNode, TextNode, VariableNode,
};
pub use range::{Position, SourceLocation};
pub use snapshot::{snapshot_from_template, AstSnapshot};
pub use template::{Definition, Template};
