//! Recursive-descent template parser
//!
//!     Grammar, top down:
//!
//!         template  := item* EOF
//!         item      := TEXT | COMMENT | '{{' action
//!         action    := 'else' ('if' pipeline)? '}}'
//!                    | 'end' '}}'
//!                    | ('if' | 'range' | 'with' | 'define' | 'block') pipeline '}}' item* else* end
//!                    | pipeline '}}'
//!         pipeline  := declaration? command ('|' command)*
//!         command   := operand (SPACE operand)*
//!         operand   := term FIELD*
//!         term      := IDENT | '.' | 'nil' | VAR | FIELD | BOOL | NUMBER | STRING | '(' pipeline ')'
//!
//!     `else` and `end` are not nodes of their own: they come back from [`Parser::item`] as
//!     [`Item`] variants and the branch that is being parsed consumes them. At top level they are
//!     errors.
//!
//!     Every error carries the position of the token the parser stopped at. There is no
//!     recovery: the first error ends the parse.

use super::number::new_number;
use super::token_stream::TokenStream;
use super::unquote::unquote;
use crate::tmpl::ast::{
    ActionNode, Arg, BoolNode, BranchKeyword, BranchNode, ChainNode, CommandNode, CommentNode,
    DotNode, ElseNode, EndNode, ErrorKind, FieldNode, IdentifierNode, ListNode, NilNode, Node,
    ParseError, ParseResult, PipeNode, SourceLocation, StringNode, Template, TextNode,
    VariableNode,
};
use crate::tmpl::lexing::{Token, TokenKind, Trim};

/// Deepest nesting of branches and parenthesized pipelines, counted together.
///
/// Parsing, printing and dropping a tree all recurse once per level; this keeps them well
/// inside a 2 MiB thread stack.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Result of parsing one item of a list.
#[derive(Debug)]
pub enum Item {
    Node(Node),
    Else(ElseNode),
    End(EndNode),
}

/// How an item list ended.
#[derive(Debug)]
enum Terminator {
    Else(ElseNode),
    End(EndNode),
}

pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    location: SourceLocation,
    /// Line of the `{{` of the action being parsed, for lexical error messages.
    action_line: Option<usize>,
    /// Open branches and parentheses around the current token.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            tokens: TokenStream::new(source),
            location: SourceLocation::new(source),
            action_line: None,
            depth: 0,
        }
    }

    /// Parses the whole input.
    pub fn parse(mut self) -> ParseResult<Template> {
        let mut root = ListNode::new(self.tokens.peek(0).pos);
        while self.tokens.peek_kind(0) != TokenKind::Eof {
            match self.item()? {
                Item::Node(node) => root.push(node),
                Item::Else(node) => return Err(self.unexpected_control(node.pos, "else")),
                Item::End(node) => return Err(self.unexpected_control(node.pos, "end")),
            }
        }
        Ok(Template::new(self.tokens.source(), root))
    }

    fn error_at(&self, pos: usize, kind: ErrorKind, snippet: &str) -> ParseError {
        ParseError::new(self.location.position(pos), kind, snippet)
    }

    fn error(&self, token: &Token, kind: ErrorKind) -> ParseError {
        let snippet = match token.kind {
            TokenKind::Eof | TokenKind::Error => "",
            _ => token.value.as_str(),
        };
        self.error_at(token.pos, kind, snippet)
    }

    /// Error for a token that does not fit here. Lexer errors are reported as such.
    fn unexpected(&self, token: &Token, context: &str) -> ParseError {
        if token.kind == TokenKind::Error {
            let action_line = self.action_line.filter(|line| *line != token.line);
            return self.error(
                token,
                ErrorKind::Lexical {
                    message: token.value.clone(),
                    action_line,
                },
            );
        }
        self.error(
            token,
            ErrorKind::UnexpectedToken {
                found: token.to_string(),
                context: context.to_string(),
            },
        )
    }

    /// Steps one branch or parenthesis deeper, failing at [`MAX_NESTING_DEPTH`].
    fn enter(&mut self, token: &Token) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(token, ErrorKind::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            }));
        }
        self.depth += 1;
        Ok(())
    }

    fn unexpected_control(&self, pos: usize, keyword: &str) -> ParseError {
        let kind = ErrorKind::UnexpectedControl {
            keyword: keyword.to_string(),
        };
        self.error_at(pos, kind, keyword)
    }

    /// Consumes the next non-space token, which must be of `kind`.
    fn expect(&mut self, kind: TokenKind, context: &str) -> ParseResult<Token> {
        let token = self.tokens.next_non_space();
        if token.kind != kind {
            return Err(self.unexpected(&token, context));
        }
        Ok(token)
    }

    /// Items until an `{{ else }}` or `{{ end }}`. Running out of input is an error.
    fn item_list(&mut self) -> ParseResult<(ListNode, Terminator)> {
        let mut list = ListNode::new(self.tokens.peek(0).pos);
        while self.tokens.peek_kind(0) != TokenKind::Eof {
            match self.item()? {
                Item::Node(node) => list.push(node),
                Item::Else(node) => return Ok((list, Terminator::Else(node))),
                Item::End(node) => return Ok((list, Terminator::End(node))),
            }
        }
        let eof = self.tokens.next();
        Err(self.error(&eof, ErrorKind::UnexpectedEof))
    }

    /// Text, a comment, or a delimited action.
    pub fn item(&mut self) -> ParseResult<Item> {
        let token = self.tokens.next();
        match token.kind {
            TokenKind::Text => Ok(Item::Node(Node::Text(TextNode {
                pos: token.pos,
                text: token.value,
            }))),
            TokenKind::Comment => Ok(Item::Node(Node::Comment(CommentNode {
                pos: token.pos,
                text: token.value,
                trim: token.trim,
            }))),
            TokenKind::LeftDelim => {
                self.action_line = Some(token.line);
                let item = self.action(&token);
                self.action_line = None;
                item
            }
            _ => Err(self.unexpected(&token, "input")),
        }
    }

    /// Everything after an opening `{{`.
    fn action(&mut self, open: &Token) -> ParseResult<Item> {
        let kind = self.tokens.peek_non_space().kind;
        match kind {
            TokenKind::Else => {
                self.tokens.next();
                self.else_control(open).map(Item::Else)
            }
            TokenKind::End => {
                self.tokens.next();
                self.end_control(open).map(Item::End)
            }
            TokenKind::If => self.branch(open, BranchKeyword::If),
            TokenKind::Range => self.branch(open, BranchKeyword::Range),
            TokenKind::With => self.branch(open, BranchKeyword::With),
            TokenKind::Define => self.branch(open, BranchKeyword::Define),
            TokenKind::Block => self.branch(open, BranchKeyword::Block),
            _ => {
                let (pipe, close) = self.pipeline("command", TokenKind::RightDelim)?;
                Ok(Item::Node(Node::Action(ActionNode {
                    pos: open.pos,
                    line: open.line,
                    pipe,
                    trim: Trim::new(open.trim.left, close.trim.right),
                })))
            }
        }
    }

    /// Consumes the keyword and parses the rest of the branch one nesting level deeper.
    fn branch(&mut self, open: &Token, keyword: BranchKeyword) -> ParseResult<Item> {
        self.tokens.next();
        self.enter(open)?;
        let branch = self.branch_control(open, keyword);
        self.depth -= 1;
        Ok(Item::Node(Node::Branch(Box::new(branch?))))
    }

    fn branch_control(&mut self, open: &Token, keyword: BranchKeyword) -> ParseResult<BranchNode> {
        let (pipe, close) = self.pipeline(keyword.as_str(), TokenKind::RightDelim)?;
        let (list, mut terminator) = self.item_list()?;

        let mut elses = Vec::new();
        let end = loop {
            match terminator {
                Terminator::Else(mut alternative) => {
                    let (list, next) = self.item_list()?;
                    alternative.list = list;
                    elses.push(alternative);
                    terminator = next;
                }
                Terminator::End(end) => break end,
            }
        };

        Ok(BranchNode {
            pos: open.pos,
            line: open.line,
            keyword,
            pipe,
            list,
            elses,
            end,
            trim: Trim::new(open.trim.left, close.trim.right),
        })
    }

    /// `{{ else }}` or `{{ else if pipeline }}`. The list is filled in by the branch.
    fn else_control(&mut self, open: &Token) -> ParseResult<ElseNode> {
        let (pipe, close) = if self.tokens.peek_non_space().kind == TokenKind::If {
            self.tokens.next();
            let (pipe, close) = self.pipeline("else if", TokenKind::RightDelim)?;
            (Some(pipe), close)
        } else {
            (None, self.expect(TokenKind::RightDelim, "else")?)
        };
        Ok(ElseNode {
            pos: open.pos,
            line: open.line,
            pipe,
            list: ListNode::default(),
            trim: Trim::new(open.trim.left, close.trim.right),
        })
    }

    fn end_control(&mut self, open: &Token) -> ParseResult<EndNode> {
        let close = self.expect(TokenKind::RightDelim, "end")?;
        Ok(EndNode {
            pos: open.pos,
            trim: Trim::new(open.trim.left, close.trim.right),
        })
    }

    /// A pipeline up to and including its terminator (`}}` or `)`), which is returned too.
    fn pipeline(&mut self, context: &str, end: TokenKind) -> ParseResult<(PipeNode, Token)> {
        let first = self.tokens.peek_non_space();
        let mut pipe = PipeNode::new(first.pos, first.line);

        self.declarations(&mut pipe, context)?;

        let mut awaiting_command = false;
        loop {
            let kind = self.tokens.peek_non_space().kind;
            match kind {
                _ if kind == end => {
                    let close = self.tokens.next();
                    if awaiting_command {
                        return Err(self.error(&close, ErrorKind::MissingValue {
                            context: context.to_string(),
                        }));
                    }
                    self.check_pipeline(&pipe, &close, context)?;
                    return Ok((pipe, close));
                }
                _ if kind.starts_operand() => {
                    let (command, piped) = self.command()?;
                    pipe.cmds.push(command);
                    awaiting_command = piped;
                }
                TokenKind::Pipe => {
                    let token = self.tokens.next();
                    return Err(self.error(&token, ErrorKind::MissingValue {
                        context: context.to_string(),
                    }));
                }
                _ => {
                    let token = self.tokens.next();
                    return Err(self.unexpected(&token, context));
                }
            }
        }
    }

    /// `$x :=`, `$x =`, and in `range` also `$k, $v :=`.
    ///
    /// A variable not followed by a declaration operator or comma is left in place as the first
    /// operand of the pipeline.
    fn declarations(&mut self, pipe: &mut PipeNode, context: &str) -> ParseResult<()> {
        loop {
            if self.tokens.peek_non_space().kind != TokenKind::Variable {
                return Ok(());
            }
            let operator = match self.tokens.peek_kind(1) {
                TokenKind::Space => 2,
                _ => 1,
            };
            let operator_kind = self.tokens.peek_kind(operator);
            if !matches!(
                operator_kind,
                TokenKind::Declare | TokenKind::Assign | TokenKind::Comma
            ) {
                return Ok(());
            }

            let variable = self.tokens.next();
            let operator = self.tokens.next_non_space();
            pipe.decl.push(VariableNode::new(variable.pos, &variable.value));

            match operator.kind {
                TokenKind::Declare | TokenKind::Assign => {
                    pipe.is_assign = operator.kind == TokenKind::Assign;
                    return Ok(());
                }
                _ if context == "range" && pipe.decl.len() < 2 => {
                    match self.tokens.peek_non_space().kind {
                        TokenKind::Variable | TokenKind::RightDelim | TokenKind::RightParen => {
                            continue
                        }
                        _ => {
                            let token = self.tokens.peek(0).clone();
                            return Err(
                                self.error(&token, ErrorKind::RangeCanOnlyInitializeVariables)
                            );
                        }
                    }
                }
                _ => {
                    return Err(self.error(&operator, ErrorKind::TooManyDeclarations {
                        context: context.to_string(),
                    }))
                }
            }
        }
    }

    fn check_pipeline(&self, pipe: &PipeNode, close: &Token, context: &str) -> ParseResult<()> {
        if pipe.cmds.is_empty() {
            return Err(self.error(close, ErrorKind::MissingValue {
                context: context.to_string(),
            }));
        }
        for (index, command) in pipe.cmds.iter().enumerate().skip(1) {
            if let Some(first) = command.args.first().filter(|arg| arg.is_literal()) {
                return Err(self.error_at(
                    first.pos(),
                    ErrorKind::NonExecutableCommand { stage: index + 1 },
                    &first.to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Operands up to `|` or the enclosing terminator. Returns whether a `|` was consumed.
    fn command(&mut self) -> ParseResult<(CommandNode, bool)> {
        let mut command = CommandNode {
            pos: self.tokens.peek_non_space().pos,
            args: Vec::new(),
        };
        let piped = loop {
            self.tokens.peek_non_space();
            if let Some(operand) = self.operand()? {
                command.args.push(operand);
            }
            match self.tokens.peek_kind(0) {
                TokenKind::Space => {
                    self.tokens.next();
                }
                TokenKind::RightDelim | TokenKind::RightParen => break false,
                TokenKind::Pipe => {
                    self.tokens.next();
                    break true;
                }
                _ => {
                    let token = self.tokens.next();
                    return Err(self.unexpected(&token, "operand"));
                }
            }
        };
        if command.args.is_empty() {
            let token = self.tokens.peek(0).clone();
            return Err(self.error(&token, ErrorKind::EmptyCommand));
        }
        Ok((command, piped))
    }

    /// A term followed by any number of `.Field` accesses.
    fn operand(&mut self) -> ParseResult<Option<Arg>> {
        let Some(term) = self.term()? else {
            return Ok(None);
        };
        if self.tokens.peek_kind(0) != TokenKind::Field {
            return Ok(Some(term));
        }

        let chain_pos = self.tokens.peek(0).pos;
        let mut fields = Vec::new();
        while self.tokens.peek_kind(0) == TokenKind::Field {
            let field = self.tokens.next();
            fields.push(field.value[1..].to_string());
        }

        let operand = match term {
            Arg::Field(mut field) => {
                field.ident.extend(fields);
                field.pos = chain_pos;
                Arg::Field(field)
            }
            Arg::Variable(mut variable) => {
                variable.ident.extend(fields);
                variable.pos = chain_pos;
                Arg::Variable(variable)
            }
            literal if literal.is_literal() => {
                return Err(self.error_at(
                    literal.pos(),
                    ErrorKind::FieldOnLiteral {
                        term: literal.to_string(),
                    },
                    &literal.to_string(),
                ))
            }
            other => Arg::Chain(ChainNode {
                pos: chain_pos,
                node: Box::new(other),
                field: fields,
            }),
        };
        Ok(Some(operand))
    }

    /// A single term, or `None` if the next token cannot start one (nothing is consumed then).
    fn term(&mut self) -> ParseResult<Option<Arg>> {
        let kind = self.tokens.peek_non_space().kind;
        if !kind.starts_operand() {
            return Ok(None);
        }
        let token = self.tokens.next();
        let pos = token.pos;
        let arg = match token.kind {
            TokenKind::Identifier => Arg::Identifier(IdentifierNode {
                pos,
                ident: token.value,
            }),
            TokenKind::Dot => Arg::Dot(DotNode { pos }),
            TokenKind::Nil => Arg::Nil(NilNode { pos }),
            TokenKind::Variable => Arg::Variable(VariableNode::new(pos, &token.value)),
            TokenKind::Field => Arg::Field(FieldNode::new(pos, &token.value)),
            TokenKind::Bool => Arg::Bool(BoolNode {
                pos,
                value: token.value == "true",
            }),
            TokenKind::CharConstant | TokenKind::Complex | TokenKind::Number => {
                let number = new_number(pos, &token.value, token.kind)
                    .map_err(|kind| self.error(&token, kind))?;
                Arg::Number(number)
            }
            TokenKind::LeftParen => {
                self.enter(&token)?;
                let pipe = self.pipeline("parenthesized pipeline", TokenKind::RightParen);
                self.depth -= 1;
                Arg::Pipe(pipe?.0)
            }
            TokenKind::String | TokenKind::RawString => {
                let text = unquote(&token.value).map_err(|_| {
                    self.error(
                        &token,
                        ErrorKind::InvalidSyntax {
                            text: token.value.clone(),
                        },
                    )
                })?;
                Arg::String(StringNode {
                    pos,
                    quoted: token.value,
                    text,
                })
            }
            _ => return Err(self.unexpected(&token, "operand")),
        };
        Ok(Some(arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult<Template> {
        Parser::new(source).parse()
    }

    fn first_pipe(template: &Template) -> &PipeNode {
        match &template.root().nodes[0] {
            Node::Action(action) => &action.pipe,
            Node::Branch(branch) => &branch.pipe,
            other => panic!("no pipe in {other:?}"),
        }
    }

    fn error_kind(source: &str) -> ErrorKind {
        parse(source).expect_err("parse should fail").kind
    }

    #[test]
    fn text_and_actions() {
        let template = parse("Hello, {{ .Name }}!").unwrap();
        let types: Vec<&str> = template.root().nodes.iter().map(Node::node_type).collect();
        assert_eq!(types, vec!["Text", "Action", "Text"]);
    }

    #[test]
    fn action_position_is_the_opening_delimiter() {
        let template = parse("ab{{  .X }}").unwrap();
        assert_eq!(template.root().nodes[1].pos(), 2);
    }

    #[test]
    fn declarations() {
        let template = parse("{{ $x := 1 }}").unwrap();
        let pipe = first_pipe(&template);
        assert_eq!(pipe.decl.len(), 1);
        assert!(!pipe.is_assign);

        let template = parse("{{$x=2}}").unwrap();
        assert!(first_pipe(&template).is_assign);

        let template = parse("{{range $k, $v := .M}}{{end}}").unwrap();
        let pipe = first_pipe(&template);
        assert_eq!(pipe.decl[0].ident, vec!["$k"]);
        assert_eq!(pipe.decl[1].ident, vec!["$v"]);
    }

    #[test]
    fn variable_without_operator_is_an_operand() {
        let template = parse("{{ $x 1 }}").unwrap();
        let pipe = first_pipe(&template);
        assert!(pipe.decl.is_empty());
        assert_eq!(pipe.cmds[0].args.len(), 2);
    }

    #[test]
    fn fields_merge_into_their_base() {
        let template = parse("{{ $x.A.B }}{{ (f).C }}{{ .D.E }}{{ f.X.Y }}").unwrap();
        let args: Vec<&Arg> = template
            .root()
            .nodes
            .iter()
            .map(|node| match node {
                Node::Action(action) => &action.pipe.cmds[0].args[0],
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert!(matches!(args[0], Arg::Variable(v) if v.ident == ["$x", "A", "B"]));
        assert!(matches!(args[1], Arg::Chain(c) if c.field == ["C"]));
        assert!(matches!(args[2], Arg::Field(f) if f.ident == ["D", "E"]));
        let Arg::Chain(chain) = args[3] else {
            panic!("expected a chain, got {:?}", args[3]);
        };
        assert!(matches!(&*chain.node, Arg::Identifier(id) if id.ident == "f"));
        assert_eq!(chain.field, ["X", "Y"]);
    }

    #[test]
    fn branch_with_else_if() {
        let template = parse("{{if .X}}a{{else if .Y}}b{{else}}c{{end}}").unwrap();
        assert_eq!(template.root().nodes.len(), 1);
        let Node::Branch(branch) = &template.root().nodes[0] else {
            panic!("expected a branch");
        };
        assert_eq!(branch.keyword, BranchKeyword::If);
        assert_eq!(branch.elses.len(), 2);
        assert!(branch.elses[0].pipe.is_some());
        assert!(branch.elses[1].pipe.is_none());
        assert_eq!(branch.elses[1].list.nodes.len(), 1);
    }

    #[test]
    fn nested_branches() {
        let template = parse("{{with .A}}{{range .}}{{.}}{{end}}{{end}}").unwrap();
        let Node::Branch(outer) = &template.root().nodes[0] else {
            panic!("expected a branch");
        };
        assert_eq!(outer.keyword, BranchKeyword::With);
        assert!(matches!(&outer.list.nodes[0], Node::Branch(inner) if inner.keyword == BranchKeyword::Range));
    }

    #[test]
    fn trim_flags_come_from_the_delimiters() {
        let template = parse("{{- if .X -}}a{{- end }}").unwrap();
        let Node::Branch(branch) = &template.root().nodes[0] else {
            panic!("expected a branch");
        };
        assert_eq!(branch.trim, Trim::new(true, true));
        assert_eq!(branch.end.trim, Trim::new(true, false));
    }

    #[test]
    fn structural_errors() {
        assert_eq!(error_kind("{{if .X}}a"), ErrorKind::UnexpectedEof);
        assert_eq!(
            error_kind("{{end}}"),
            ErrorKind::UnexpectedControl {
                keyword: "end".into()
            }
        );
        assert_eq!(
            error_kind("a{{else}}b"),
            ErrorKind::UnexpectedControl {
                keyword: "else".into()
            }
        );
        assert_eq!(
            error_kind("{{if .X}}{{end .Y}}"),
            ErrorKind::UnexpectedToken {
                found: "\".Y\"".into(),
                context: "end".into()
            }
        );
    }

    #[test]
    fn pipeline_errors() {
        assert_eq!(
            error_kind("{{|}}"),
            ErrorKind::MissingValue {
                context: "command".into()
            }
        );
        assert_eq!(
            error_kind("{{ .X | }}"),
            ErrorKind::MissingValue {
                context: "command".into()
            }
        );
        assert_eq!(
            error_kind("{{ }}"),
            ErrorKind::MissingValue {
                context: "command".into()
            }
        );
        assert_eq!(
            error_kind("{{if}}{{end}}"),
            ErrorKind::MissingValue {
                context: "if".into()
            }
        );
        assert_eq!(
            error_kind("{{ 1 | 2 }}"),
            ErrorKind::NonExecutableCommand { stage: 2 }
        );
        assert_eq!(
            error_kind("{{ \"x\".Y }}"),
            ErrorKind::FieldOnLiteral {
                term: "\"x\"".into()
            }
        );
    }

    #[test]
    fn declaration_errors() {
        assert_eq!(
            error_kind("{{with $a, $b := .}}{{end}}"),
            ErrorKind::TooManyDeclarations {
                context: "with".into()
            }
        );
        assert_eq!(
            error_kind("{{range $a, $b, $c := .}}{{end}}"),
            ErrorKind::TooManyDeclarations {
                context: "range".into()
            }
        );
        assert_eq!(
            error_kind("{{range $a, 1}}{{end}}"),
            ErrorKind::RangeCanOnlyInitializeVariables
        );
    }

    #[test]
    fn literal_errors() {
        assert_eq!(
            error_kind("{{ 99999999999999999999 }}"),
            ErrorKind::IntegerOverflow {
                text: "99999999999999999999".into()
            }
        );
        assert_eq!(
            error_kind(r#"{{ "\q" }}"#),
            ErrorKind::InvalidSyntax {
                text: r#""\q""#.into()
            }
        );
    }

    #[test]
    fn lexical_errors_mention_the_action_line() {
        assert_eq!(
            error_kind("{{ .X\n (.Y }}"),
            ErrorKind::Lexical {
                message: "unclosed left paren".into(),
                action_line: Some(1)
            }
        );
        assert_eq!(
            error_kind("{{ .X"),
            ErrorKind::Lexical {
                message: "unclosed action".into(),
                action_line: None
            }
        );
    }

    #[test]
    fn deeply_nested_branches_are_an_error() {
        let depth = 100_000;
        let source = "{{if .}}".repeat(depth) + "x" + &"{{end}}".repeat(depth);
        assert_eq!(
            error_kind(&source),
            ErrorKind::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            }
        );
    }

    #[test]
    fn deeply_nested_parentheses_are_an_error() {
        let depth = 100_000;
        let source = format!("{{{{ {}1{} }}}}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            error_kind(&source),
            ErrorKind::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            }
        );
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let depth = MAX_NESTING_DEPTH;
        let branches = "{{with .}}".repeat(depth) + &"{{end}}".repeat(depth);
        assert!(parse(&branches).is_ok());

        let parens = format!("{{{{ {}1{} }}}}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&parens).is_ok());

        // Branches and parentheses share one budget.
        let mixed = "{{if .}}".repeat(depth - 1) + "{{ ((1)) }}" + &"{{end}}".repeat(depth - 1);
        assert_eq!(
            error_kind(&mixed),
            ErrorKind::NestingTooDeep {
                limit: MAX_NESTING_DEPTH
            }
        );
    }

    #[test]
    fn error_positions_are_line_and_column() {
        let error = parse("a\n  {{ end }}").unwrap_err();
        assert_eq!(error.position.to_string(), "2:3");
        assert_eq!(
            error.to_string(),
            "template: 2:3: unexpected {{ end }}"
        );
    }
}
