//! Treeviz: one line per AST node
//!
//! Nesting is drawn with box connectors, each line shows an icon for the node type and the
//! node's label cut to 30 characters:
//!
//!     ⧉ 3 items
//!     ├─ ¶ "<ul>\n  "
//!     ├─ ⑂ range .Items
//!     │ ├─ ǀ .Items
//!     │ │ └─ ▹ .Items
//!     ...
//!
//! Icons
//!     Template: ⧉   List: ☰
//!     Text: ¶   Comment: ※   Action: ⚡   Branch: ⑂   Else: ↳   End: ∎
//!     Pipe: ǀ   Command: ▹
//!     Operands: ◦

use super::registry::{FormatError, Formatter};
use crate::tmpl::ast::{snapshot_from_template, AstSnapshot, Template};

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn icon(node_type: &str) -> &'static str {
    match node_type {
        "Template" => "⧉",
        "List" => "☰",
        "Text" => "¶",
        "Comment" => "※",
        "Action" => "⚡",
        "Branch" => "⑂",
        "Else" => "↳",
        "End" => "∎",
        "Pipe" => "ǀ",
        "Command" => "▹",
        _ => "◦",
    }
}

fn format_snapshot(
    snapshot: &AstSnapshot,
    prefix: &str,
    is_last: bool,
    show_line_numbers: bool,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    if show_line_numbers {
        output.push_str(&format!("{:02} ", snapshot.line));
    }
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon(&snapshot.node_type),
        truncate(&snapshot.label, 30)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, &child_prefix, i + 1 == count, show_line_numbers, output);
    }
}

pub fn to_treeviz_str(template: &Template, show_line_numbers: bool) -> String {
    let snapshot = snapshot_from_template(template);
    let mut output = format!("{} {}\n", icon(&snapshot.node_type), snapshot.label);
    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, "", i + 1 == count, show_line_numbers, &mut output);
    }
    output
}

pub struct TreevizFormatter {
    show_line_numbers: bool,
}

impl TreevizFormatter {
    pub fn new(show_line_numbers: bool) -> Self {
        Self { show_line_numbers }
    }
}

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "ast-treeviz"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        Ok(to_treeviz_str(template, self.show_line_numbers))
    }

    fn description(&self) -> &str {
        "One line per node tree view"
    }
}
