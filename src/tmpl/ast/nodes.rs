//! Template AST node types
//!
//!     The tree is deliberately close to the surface syntax: the printer must reproduce every
//!     non-whitespace token, so nothing is desugared. `else if` stays an Else with a guard, numbers
//!     and strings keep their original text, and each delimited construct keeps its trim markers.
//!
//!     Nodes store byte offsets into the source (`pos`). Line numbers and indentation prefixes are
//!     recovered through the owning [`Template`](super::template::Template).
//!
//!     The `Display` impls render a node on a single line with canonical spacing. They are used
//!     for diagnostics and tree views; whitespace-aware output is the printer's job.

use crate::tmpl::lexing::Trim;
use serde::Serialize;
use std::fmt;

/// Top-level item of a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Text(TextNode),
    Comment(CommentNode),
    Action(ActionNode),
    Branch(Box<BranchNode>),
}

impl Node {
    pub fn pos(&self) -> usize {
        match self {
            Node::Text(node) => node.pos,
            Node::Comment(node) => node.pos,
            Node::Action(node) => node.pos,
            Node::Branch(node) => node.pos,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Text(_) => "Text",
            Node::Comment(_) => "Comment",
            Node::Action(_) => "Action",
            Node::Branch(_) => "Branch",
        }
    }
}

/// A sequence of nodes: the document root or the body of a branch or else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListNode {
    pub pos: usize,
    pub nodes: Vec<Node>,
}

impl ListNode {
    pub fn new(pos: usize) -> Self {
        Self {
            pos,
            nodes: Vec::new(),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }
}

/// Literal text outside of any delimiter. Emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub pos: usize,
    pub text: String,
}

/// `{{/* … */}}`. `text` is everything between the braces, trim markers included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub pos: usize,
    pub text: String,
    pub trim: Trim,
}

/// A bare pipeline between delimiters, such as `{{ .Name | printf "%q" }}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionNode {
    /// Offset of the opening `{{`.
    pub pos: usize,
    pub line: usize,
    pub pipe: PipeNode,
    pub trim: Trim,
}

/// Optional declaration followed by `|`-separated commands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeNode {
    pub pos: usize,
    pub line: usize,
    /// `=` rather than `:=`.
    pub is_assign: bool,
    pub decl: Vec<VariableNode>,
    pub cmds: Vec<CommandNode>,
}

impl PipeNode {
    pub fn new(pos: usize, line: usize) -> Self {
        Self {
            pos,
            line,
            is_assign: false,
            decl: Vec::new(),
            cmds: Vec::new(),
        }
    }

    pub fn declaration_operator(&self) -> &'static str {
        if self.is_assign {
            " = "
        } else {
            " := "
        }
    }
}

impl fmt::Display for PipeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.decl.is_empty() {
            for (i, variable) in self.decl.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", variable)?;
            }
            f.write_str(self.declaration_operator())?;
        }
        for (i, command) in self.cmds.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

/// One stage of a pipeline: an operation and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandNode {
    pub pos: usize,
    pub args: Vec<Arg>,
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match arg {
                Arg::Pipe(pipe) => write!(f, "({})", pipe)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

/// An operand of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Arg {
    Identifier(IdentifierNode),
    Variable(VariableNode),
    Dot(DotNode),
    Nil(NilNode),
    Field(FieldNode),
    Chain(ChainNode),
    Bool(BoolNode),
    Number(NumberNode),
    String(StringNode),
    Pipe(PipeNode),
}

impl Arg {
    pub fn pos(&self) -> usize {
        match self {
            Arg::Identifier(node) => node.pos,
            Arg::Variable(node) => node.pos,
            Arg::Dot(node) => node.pos,
            Arg::Nil(node) => node.pos,
            Arg::Field(node) => node.pos,
            Arg::Chain(node) => node.pos,
            Arg::Bool(node) => node.pos,
            Arg::Number(node) => node.pos,
            Arg::String(node) => node.pos,
            Arg::Pipe(node) => node.pos,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Arg::Identifier(_) => "Identifier",
            Arg::Variable(_) => "Variable",
            Arg::Dot(_) => "Dot",
            Arg::Nil(_) => "Nil",
            Arg::Field(_) => "Field",
            Arg::Chain(_) => "Chain",
            Arg::Bool(_) => "Bool",
            Arg::Number(_) => "Number",
            Arg::String(_) => "String",
            Arg::Pipe(_) => "Pipe",
        }
    }

    /// Constants cannot be invoked, so they may not start a later pipeline stage.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Arg::Bool(_) | Arg::Dot(_) | Arg::Nil(_) | Arg::Number(_) | Arg::String(_)
        )
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Identifier(node) => f.write_str(&node.ident),
            Arg::Variable(node) => write!(f, "{}", node),
            Arg::Dot(_) => f.write_str("."),
            Arg::Nil(_) => f.write_str("nil"),
            Arg::Field(node) => write!(f, "{}", node),
            Arg::Chain(node) => write!(f, "{}", node),
            Arg::Bool(node) => write!(f, "{}", node.value),
            Arg::Number(node) => f.write_str(&node.text),
            Arg::String(node) => f.write_str(&node.quoted),
            Arg::Pipe(node) => write!(f, "{}", node),
        }
    }
}

/// A function name such as `printf` or `len`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierNode {
    pub pos: usize,
    pub ident: String,
}

/// `$x` or `$x.Field.Other`. The first ident keeps its `$`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableNode {
    pub pos: usize,
    pub ident: Vec<String>,
}

impl VariableNode {
    pub fn new(pos: usize, name: &str) -> Self {
        Self {
            pos,
            ident: name.split('.').map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for VariableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ident.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotNode {
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NilNode {
    pub pos: usize,
}

/// `.Field.Other`, stored without the dots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub pos: usize,
    pub ident: Vec<String>,
}

impl FieldNode {
    pub fn new(pos: usize, field: &str) -> Self {
        Self {
            pos,
            ident: field[1..].split('.').map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ident in &self.ident {
            write!(f, ".{}", ident)?;
        }
        Ok(())
    }
}

/// Field accesses applied to something that is not a field or variable, e.g. `(f x).Y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainNode {
    pub pos: usize,
    pub node: Box<Arg>,
    pub field: Vec<String>,
}

impl fmt::Display for ChainNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node.as_ref() {
            Arg::Pipe(pipe) => write!(f, "({})", pipe)?,
            other => write!(f, "{}", other)?,
        }
        for field in &self.field {
            write!(f, ".{}", field)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolNode {
    pub pos: usize,
    pub value: bool,
}

/// A numeric literal with every interpretation that fits its text.
///
/// `1` is an int, a uint and a float at once; `1.5` only a float; `'a'` an int of 97. The
/// original spelling is kept in `text` and is what the printer emits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberNode {
    pub pos: usize,
    pub is_int: bool,
    pub is_uint: bool,
    pub is_float: bool,
    pub is_complex: bool,
    pub int64: i64,
    pub uint64: u64,
    pub float64: f64,
    /// Real and imaginary parts.
    pub complex128: (f64, f64),
    pub text: String,
}

impl NumberNode {
    pub fn new(pos: usize, text: &str) -> Self {
        Self {
            pos,
            is_int: false,
            is_uint: false,
            is_float: false,
            is_complex: false,
            int64: 0,
            uint64: 0,
            float64: 0.0,
            complex128: (0.0, 0.0),
            text: text.to_string(),
        }
    }
}

/// A quoted or raw string. `quoted` is the source spelling, `text` the unquoted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringNode {
    pub pos: usize,
    pub quoted: String,
    pub text: String,
}

/// The keyword that opens a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKeyword {
    If,
    Range,
    With,
    Define,
    Block,
}

impl BranchKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchKeyword::If => "if",
            BranchKeyword::Range => "range",
            BranchKeyword::With => "with",
            BranchKeyword::Define => "define",
            BranchKeyword::Block => "block",
        }
    }

    /// `define` and `block` introduce a named sub-template.
    pub fn is_definition(self) -> bool {
        matches!(self, BranchKeyword::Define | BranchKeyword::Block)
    }
}

impl fmt::Display for BranchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{{ keyword pipe }} list {{ else … }}… {{ end }}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchNode {
    /// Offset of the opening `{{`.
    pub pos: usize,
    pub line: usize,
    pub keyword: BranchKeyword,
    pub pipe: PipeNode,
    pub list: ListNode,
    pub elses: Vec<ElseNode>,
    pub end: EndNode,
    pub trim: Trim,
}

/// `{{ else }}` or `{{ else if pipe }}` together with the list that follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseNode {
    pub pos: usize,
    pub line: usize,
    pub pipe: Option<PipeNode>,
    pub list: ListNode,
    pub trim: Trim,
}

/// `{{ end }}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndNode {
    pub pos: usize,
    pub trim: Trim,
}
