//! Whitespace-normalizing printer
//!
//!     Re-emits a parsed template with canonical spacing inside delimiters. Text, comments,
//!     literals and trim markers are written back exactly; only whitespace inside `{{ … }}`
//!     changes.
//!
//!     Line structure inside an action is kept: an operand that started on a later source line
//!     than the previous operand starts a new output line. That line is indented with the
//!     whitespace that precedes the enclosing `{{` on its own line (the prefix) plus one indent
//!     unit per nesting level. When a bare action spans lines and has a prefix, its closing `}}`
//!     moves to its own line at the prefix.
//!
//!     Output only depends on the relative line positions of operands and the prefix of each
//!     delimiter, and both survive formatting, so formatting is idempotent.

use crate::tmpl::ast::{
    ActionNode, Arg, BranchNode, CommandNode, ElseNode, EndNode, ListNode, Node, PipeNode,
    Template,
};

/// Renders a template with the given indent unit.
pub fn print(template: &Template, indent: &str) -> String {
    let mut printer = Printer::new(template, indent);
    printer.list(template.root());
    printer.finish()
}

pub struct Printer<'t> {
    template: &'t Template,
    indent: &'t str,
    out: String,
    /// Whitespace before the `{{` of the construct being printed.
    prefix: &'t str,
    depth: usize,
    /// Newlines written so far.
    newlines: usize,
}

impl<'t> Printer<'t> {
    pub fn new(template: &'t Template, indent: &'t str) -> Self {
        Self {
            template,
            indent,
            out: String::with_capacity(template.source().len()),
            prefix: "",
            depth: 0,
            newlines: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        self.newlines += text.matches('\n').count();
        self.out.push_str(text);
    }

    fn write_prefix(&mut self) {
        self.write(self.prefix);
        for _ in 0..self.depth {
            self.write(self.indent);
        }
    }

    fn newline(&mut self) {
        self.write("\n");
        self.write_prefix();
    }

    /// Points the prefix at the whitespace before the `{{` at `pos`, if any.
    fn capture_prefix(&mut self, pos: usize) -> bool {
        match self.template.whitespace_prefix(pos) {
            Some(prefix) => {
                self.prefix = prefix;
                true
            }
            None => {
                self.prefix = "";
                false
            }
        }
    }

    pub fn list(&mut self, list: &ListNode) {
        for node in &list.nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Text(text) => self.write(&text.text),
            Node::Comment(comment) => {
                self.write("{{");
                self.write(&comment.text);
                self.write("}}");
            }
            Node::Action(action) => self.action(action),
            Node::Branch(branch) => self.branch(branch),
        }
    }

    fn action(&mut self, action: &ActionNode) {
        let has_prefix = self.capture_prefix(action.pos);
        let before = self.newlines;

        self.write(action.trim.left_delim());
        self.depth = 1;
        self.pipe(&action.pipe);
        self.depth = 0;

        if has_prefix && self.newlines != before {
            self.newline();
            self.write(action.trim.right_delim_no_space());
        } else {
            self.write(action.trim.right_delim());
        }
    }

    fn branch(&mut self, branch: &BranchNode) {
        self.capture_prefix(branch.pos);
        self.write(branch.trim.left_delim());
        self.write(branch.keyword.as_str());
        self.write(" ");
        self.pipe(&branch.pipe);
        self.write(branch.trim.right_delim());

        self.list(&branch.list);
        for alternative in &branch.elses {
            self.else_node(alternative);
        }
        self.end(&branch.end);
    }

    fn else_node(&mut self, node: &ElseNode) {
        self.write(node.trim.left_delim());
        self.write("else");
        if let Some(pipe) = &node.pipe {
            self.capture_prefix(node.pos);
            self.write(" if ");
            self.pipe(pipe);
        }
        self.write(node.trim.right_delim());
        self.list(&node.list);
    }

    fn end(&mut self, node: &EndNode) {
        self.write(node.trim.left_delim());
        self.write("end");
        self.write(node.trim.right_delim());
    }

    fn pipe(&mut self, pipe: &PipeNode) {
        if !pipe.decl.is_empty() {
            for (i, variable) in pipe.decl.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(&variable.to_string());
            }
            self.write(pipe.declaration_operator());
        }
        for (i, command) in pipe.cmds.iter().enumerate() {
            if i > 0 {
                self.write(" | ");
            }
            self.command(command);
        }
    }

    fn command(&mut self, command: &CommandNode) {
        let mut previous_line = 0;
        for (i, arg) in command.args.iter().enumerate() {
            let line = self.template.line_of(arg.pos());
            if i > 0 {
                if line > previous_line {
                    self.newline();
                } else {
                    self.write(" ");
                }
            }
            previous_line = line;
            self.arg(arg);
        }
    }

    /// A parenthesized pipeline used as an operand, printed one level deeper.
    fn sub_pipe(&mut self, pipe: &PipeNode) {
        self.write("(");
        let before = self.newlines;
        self.depth += 1;
        self.pipe(pipe);
        self.depth -= 1;
        if self.newlines != before {
            self.newline();
        }
        self.write(")");
    }

    fn arg(&mut self, arg: &Arg) {
        match arg {
            Arg::Pipe(pipe) => self.sub_pipe(pipe),
            Arg::Chain(chain) => {
                self.arg(&chain.node);
                for field in &chain.field {
                    self.write(".");
                    self.write(field);
                }
            }
            other => self.write(&other.to_string()),
        }
    }
}
