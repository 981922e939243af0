//! The parsed document.

use super::nodes::{Arg, BranchNode, ListNode, Node};
use super::range::SourceLocation;
use serde::Serialize;

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Root of a parsed template, together with the source it was parsed from.
///
/// Nodes only carry byte offsets, so anything that needs lines or indentation (the printer,
/// diagnostics) goes through the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(skip)]
    source: String,
    #[serde(skip)]
    location: SourceLocation,
    root: ListNode,
}

/// A named sub-template introduced by `define` or `block`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Definition<'a> {
    pub name: &'a str,
    pub branch: &'a BranchNode,
}

impl Template {
    pub fn new(source: impl Into<String>, root: ListNode) -> Self {
        let source = source.into();
        let location = SourceLocation::new(&source);
        Self {
            source,
            location,
            root,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &ListNode {
        &self.root
    }

    pub fn line_of(&self, pos: usize) -> usize {
        self.location.line_of(pos)
    }

    /// The text between the start of `pos`'s line and `pos`, if it is all whitespace.
    ///
    /// Called with the offset of a construct's opening `{{`, this is the indentation that
    /// continuation lines of that construct are aligned to.
    pub fn whitespace_prefix(&self, pos: usize) -> Option<&str> {
        let head = &self.source[self.location.line_start_of(pos)..pos];
        head.chars().all(is_space).then_some(head)
    }

    /// Every `define` and `block` in document order, nested ones included.
    ///
    /// The name is the unquoted string that starts the branch's pipeline; branches without a
    /// string name are skipped.
    pub fn definitions(&self) -> Vec<Definition<'_>> {
        let mut found = Vec::new();
        collect_definitions(&self.root, &mut found);
        found
    }
}

fn collect_definitions<'a>(list: &'a ListNode, found: &mut Vec<Definition<'a>>) {
    for node in &list.nodes {
        let Node::Branch(branch) = node else {
            continue;
        };
        if branch.keyword.is_definition() {
            let name = branch
                .pipe
                .cmds
                .first()
                .and_then(|cmd| cmd.args.first())
                .and_then(|arg| match arg {
                    Arg::String(string) => Some(string.text.as_str()),
                    _ => None,
                });
            if let Some(name) = name {
                found.push(Definition { name, branch });
            }
        }
        collect_definitions(&branch.list, found);
        for alternative in &branch.elses {
            collect_definitions(&alternative.list, found);
        }
    }
}
