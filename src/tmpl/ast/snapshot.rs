//! AST Snapshot - a normalized, presentation-neutral view of a parsed template
//!
//! Views such as the tree visualisation consume a snapshot instead of walking the node enums
//! themselves. Each snapshot node has a type name, a one-line label, the 1-based source line,
//! a few string attributes and its children.

use super::nodes::{Arg, BranchNode, CommandNode, ElseNode, ListNode, Node, PipeNode};
use super::template::Template;
use crate::tmpl::lexing::Trim;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstSnapshot {
    pub node_type: String,
    pub label: String,
    pub line: usize,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>, line: usize) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            line,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: AstSnapshot) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }

    fn with_trim(self, trim: Trim) -> Self {
        let value = match (trim.left, trim.right) {
            (false, false) => return self,
            (true, false) => "left",
            (false, true) => "right",
            (true, true) => "both",
        };
        self.with_attribute("trim", value)
    }
}

/// Snapshot of a whole template. The root is a `Template` node holding the top-level items.
pub fn snapshot_from_template(template: &Template) -> AstSnapshot {
    let builder = SnapshotBuilder { template };
    let root = template.root();
    AstSnapshot::new("Template", item_count(root.nodes.len()), 1)
        .with_children(root.nodes.iter().map(|node| builder.node(node)))
}

fn item_count(count: usize) -> String {
    match count {
        1 => "1 item".to_string(),
        n => format!("{} items", n),
    }
}

struct SnapshotBuilder<'t> {
    template: &'t Template,
}

impl SnapshotBuilder<'_> {
    fn line(&self, pos: usize) -> usize {
        self.template.line_of(pos)
    }

    fn node(&self, node: &Node) -> AstSnapshot {
        match node {
            Node::Text(text) => {
                AstSnapshot::new("Text", format!("{:?}", text.text), self.line(text.pos))
            }
            Node::Comment(comment) => {
                AstSnapshot::new("Comment", comment.text.trim(), self.line(comment.pos))
                    .with_trim(comment.trim)
            }
            Node::Action(action) => {
                AstSnapshot::new("Action", action.pipe.to_string(), action.line)
                    .with_trim(action.trim)
                    .with_child(self.pipe(&action.pipe))
            }
            Node::Branch(branch) => self.branch(branch),
        }
    }

    fn branch(&self, branch: &BranchNode) -> AstSnapshot {
        let label = format!("{} {}", branch.keyword, branch.pipe);
        AstSnapshot::new("Branch", label, branch.line)
            .with_attribute("keyword", branch.keyword.as_str())
            .with_trim(branch.trim)
            .with_child(self.pipe(&branch.pipe))
            .with_child(self.list(&branch.list))
            .with_children(branch.elses.iter().map(|e| self.else_node(e)))
            .with_child(
                AstSnapshot::new("End", "end", self.line(branch.end.pos)).with_trim(branch.end.trim),
            )
    }

    fn else_node(&self, node: &ElseNode) -> AstSnapshot {
        let snapshot = match &node.pipe {
            Some(pipe) => AstSnapshot::new("Else", format!("else if {}", pipe), node.line)
                .with_child(self.pipe(pipe)),
            None => AstSnapshot::new("Else", "else", node.line),
        };
        snapshot.with_trim(node.trim).with_child(self.list(&node.list))
    }

    fn list(&self, list: &ListNode) -> AstSnapshot {
        AstSnapshot::new("List", item_count(list.nodes.len()), self.line(list.pos))
            .with_children(list.nodes.iter().map(|node| self.node(node)))
    }

    fn pipe(&self, pipe: &PipeNode) -> AstSnapshot {
        let mut snapshot = AstSnapshot::new("Pipe", pipe.to_string(), pipe.line);
        if !pipe.decl.is_empty() {
            let names: Vec<String> = pipe.decl.iter().map(|v| v.to_string()).collect();
            snapshot = snapshot
                .with_attribute("declare", names.join(", "))
                .with_attribute("assign", pipe.is_assign.to_string());
        }
        snapshot.with_children(pipe.cmds.iter().map(|cmd| self.command(cmd)))
    }

    fn command(&self, command: &CommandNode) -> AstSnapshot {
        AstSnapshot::new("Command", command.to_string(), self.line(command.pos))
            .with_children(command.args.iter().map(|arg| self.arg(arg)))
    }

    fn arg(&self, arg: &Arg) -> AstSnapshot {
        let snapshot = AstSnapshot::new(arg.node_type(), arg.to_string(), self.line(arg.pos()));
        match arg {
            Arg::Pipe(pipe) => snapshot.with_children(pipe.cmds.iter().map(|c| self.command(c))),
            Arg::Chain(chain) => snapshot.with_child(self.arg(&chain.node)),
            _ => snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmpl::parsing::parse;

    #[test]
    fn snapshot_of_branch() {
        let template = parse("{{- if .X }}\n  {{ .Y }}\n{{ else }}z{{ end -}}").unwrap();
        let snapshot = snapshot_from_template(&template);
        assert_eq!(snapshot.node_type, "Template");
        assert_eq!(snapshot.label, "1 item");

        let branch = &snapshot.children[0];
        assert_eq!(branch.node_type, "Branch");
        assert_eq!(branch.label, "if .X");
        assert_eq!(branch.attributes.get("trim").map(String::as_str), Some("left"));

        let types: Vec<&str> = branch.children.iter().map(|c| c.node_type.as_str()).collect();
        assert_eq!(types, vec!["Pipe", "List", "Else", "End"]);

        let end = &branch.children[3];
        assert_eq!(end.line, 3);
        assert_eq!(end.attributes.get("trim").map(String::as_str), Some("right"));

        let body = &branch.children[1];
        assert_eq!(body.children[1].node_type, "Action");
        assert_eq!(body.children[1].line, 2);
    }

    #[test]
    fn snapshot_of_declaration() {
        let template = parse("{{ $x := .A | len }}").unwrap();
        let snapshot = snapshot_from_template(&template);
        let pipe = &snapshot.children[0].children[0];
        assert_eq!(pipe.label, "$x := .A | len");
        assert_eq!(pipe.attributes.get("declare").map(String::as_str), Some("$x"));
        assert_eq!(pipe.children.len(), 2);
    }
}
