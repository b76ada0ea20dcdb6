//! Parse Module for Emadocs Compiler
//!
//! Recursive-descent parser over the token stream. The parser never fails:
//! tokens that start no construct are skipped, and missing closing
//! delimiters are tolerated.

use std::collections::BTreeMap;

use crate::ast::{
    ComponentNode, Construct, EventNode, ExportNode, HookNode, ImportNode, Node, Program,
    RouteNode, SourceLocation, TypeNode,
};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Deepest block nesting the parser descends into. Construct keywords below
/// this depth are skipped like any other unknown token, which also bounds
/// the recursion of every stage that walks the tree.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a token stream into a program. Trivia tokens are ignored.
pub fn parse(tokens: &[Token]) -> Program {
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

/// Tokenize and parse in one step.
pub fn parse_source(source: &str) -> Program {
    parse(&tokenize(source))
}

pub struct Parser<'a> {
    tokens: Vec<&'a Token>,
    current: usize,
    depth: usize,
    depth_limited: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens: tokens.iter().filter(|t| !t.kind.is_trivia()).collect(),
            current: 0,
            depth: 0,
            depth_limited: false,
        }
    }

    /// True if some construct sat deeper than `MAX_NESTING_DEPTH` and was dropped.
    pub fn depth_limited(&self) -> bool {
        self.depth_limited
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(node) = self.parse_statement() {
                statements.push(node);
            }
        }
        Program { statements }
    }

    /// True once the cursor reaches `Eof` or runs off the stream.
    pub fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CURSOR HELPERS
    // ═══════════════════════════════════════════════════════════════════════════════

    fn peek(&self) -> Option<&'a Token> {
        self.tokens
            .get(self.current)
            .copied()
            .filter(|t| t.kind != TokenKind::Eof)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.current += 1;
        Some(token)
    }

    /// Consume the current token if it is one of `kinds`.
    fn match_kinds(&mut self, kinds: &[TokenKind]) -> Option<&'a Token> {
        if kinds.contains(&self.peek_kind()) {
            self.advance()
        } else {
            None
        }
    }

    fn take_identifier(&mut self) -> Option<String> {
        self.match_kinds(&[TokenKind::Identifier])
            .map(|t| t.text.clone())
    }

    fn take_string(&mut self) -> Option<String> {
        self.match_kinds(&[TokenKind::String])
            .map(|t| t.value().to_string())
    }

    fn check_identifier(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier && t.text == text)
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // STATEMENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    /// Dispatch on the current keyword. Any other token is consumed and dropped.
    fn parse_statement(&mut self) -> Option<Node> {
        let keyword = self.advance()?;
        if self.depth >= MAX_NESTING_DEPTH && keyword.kind.starts_construct() {
            self.depth_limited = true;
            return None;
        }
        let location = SourceLocation {
            line: keyword.line,
            column: keyword.column,
        };

        let node = match keyword.kind {
            TokenKind::Page => Node::Page(self.parse_construct(location)),
            TokenKind::Component => Node::Component(self.parse_component(location)),
            TokenKind::Style => Node::Style(self.parse_construct(location)),
            TokenKind::Event => Node::Event(self.parse_event(location)),
            TokenKind::State => Node::State(self.parse_construct(location)),
            TokenKind::Api => Node::Api(self.parse_construct(location)),
            TokenKind::Router => Node::Router(self.parse_construct(location)),
            TokenKind::Route => Node::Route(self.parse_route(location)),
            TokenKind::Layout => Node::Layout(self.parse_construct(location)),
            TokenKind::Animation => Node::Animation(self.parse_construct(location)),
            TokenKind::Type => Node::Type(self.parse_type(location)),
            TokenKind::Hook => Node::Hook(self.parse_hook(location)),
            TokenKind::Plugin => Node::Plugin(self.parse_construct(location)),
            TokenKind::Config => Node::Config(self.parse_construct(location)),
            TokenKind::Import => Node::Import(self.parse_import(location)),
            TokenKind::Export => Node::Export(self.parse_export(location)),
            _ => return None,
        };
        Some(node)
    }

    /// `[name] [key="value"...] [{ ... }]`
    fn parse_construct(&mut self, location: SourceLocation) -> Construct {
        let name = self.take_identifier().unwrap_or_default();
        self.finish_construct(name, location)
    }

    /// Attribute list and optional block following whatever header a construct has.
    fn finish_construct(&mut self, name: String, location: SourceLocation) -> Construct {
        let attributes = self.parse_attributes();
        let children = self.parse_optional_block();
        Construct {
            name,
            attributes,
            children,
            location,
        }
    }

    /// `key="value"` pairs up to `{`, `}`, `;`, a construct keyword or end of input.
    /// Bare keys and anything else in between are skipped.
    fn parse_attributes(&mut self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        loop {
            match self.peek_kind() {
                TokenKind::LeftBrace
                | TokenKind::RightBrace
                | TokenKind::Semicolon
                | TokenKind::Eof => break,
                kind if kind.starts_construct() => break,
                TokenKind::Identifier => {
                    let Some(key) = self.take_identifier() else {
                        break;
                    };
                    if self.match_kinds(&[TokenKind::Assign]).is_some() {
                        if let Some(value) = self.take_string() {
                            attributes.insert(key, value);
                        }
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        attributes
    }

    fn parse_optional_block(&mut self) -> Vec<Node> {
        if self.match_kinds(&[TokenKind::LeftBrace]).is_none() {
            return Vec::new();
        }
        self.depth += 1;
        let children = self.parse_block();
        self.depth -= 1;
        self.match_kinds(&[TokenKind::RightBrace]);
        children
    }

    /// Statements up to `}` or end of input. The `}` itself is left for the caller.
    fn parse_block(&mut self) -> Vec<Node> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(node) = self.parse_statement() {
                statements.push(node);
            }
        }
        statements
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CONSTRUCT-SPECIFIC HEADERS
    // ═══════════════════════════════════════════════════════════════════════════════

    fn parse_component(&mut self, location: SourceLocation) -> ComponentNode {
        let name = self.take_identifier().unwrap_or_default();

        let mut type_params = Vec::new();
        if self.match_kinds(&[TokenKind::OpeningTagStart]).is_some() {
            type_params = self.parse_name_list(TokenKind::TagEnd);
            self.match_kinds(&[TokenKind::TagEnd]);
        }

        ComponentNode {
            construct: self.finish_construct(name, location),
            type_params,
        }
    }

    fn parse_event(&mut self, location: SourceLocation) -> EventNode {
        let event_type = self.take_identifier().unwrap_or_default();

        let mut target = None;
        if self.check_identifier("on") {
            self.advance();
            target = self.take_identifier();
        }

        EventNode {
            construct: self.finish_construct(event_type, location),
            target,
        }
    }

    fn parse_hook(&mut self, location: SourceLocation) -> HookNode {
        let name = self.take_identifier().unwrap_or_default();

        let mut parameters = Vec::new();
        if self.match_kinds(&[TokenKind::LeftParen]).is_some() {
            parameters = self.parse_name_list(TokenKind::RightParen);
            self.match_kinds(&[TokenKind::RightParen]);
        }

        HookNode {
            construct: self.finish_construct(name, location),
            parameters,
        }
    }

    fn parse_route(&mut self, location: SourceLocation) -> RouteNode {
        let path = self.take_string();
        self.match_kinds(&[TokenKind::Arrow]);
        let component = self.take_identifier();

        RouteNode {
            construct: self.finish_construct(String::new(), location),
            path,
            component,
        }
    }

    /// `type Name = <definition>;` or `type Name { ... }`
    fn parse_type(&mut self, location: SourceLocation) -> TypeNode {
        let name = self.take_identifier().unwrap_or_default();

        let mut definition = None;
        let mut children = Vec::new();
        if self.match_kinds(&[TokenKind::Assign]).is_some() {
            definition = Some(self.parse_type_definition());
        } else {
            children = self.parse_optional_block();
        }
        self.match_kinds(&[TokenKind::Semicolon]);

        TypeNode {
            construct: Construct {
                name,
                attributes: BTreeMap::new(),
                children,
                location,
            },
            definition,
        }
    }

    /// Raw token texts up to `;`, end of input, or a construct keyword outside braces.
    fn parse_type_definition(&mut self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace if depth == 0 => break,
                TokenKind::RightBrace => depth -= 1,
                TokenKind::Semicolon if depth == 0 => break,
                kind if depth == 0 && kind.starts_construct() => break,
                _ => {}
            }
            parts.push(&token.text);
            self.advance();
        }
        parts.join(" ")
    }

    /// Comma-separated identifiers up to `close`, `{` or end of input.
    fn parse_name_list(&mut self, close: TokenKind) -> Vec<String> {
        let mut names = Vec::new();
        loop {
            match self.peek_kind() {
                kind if kind == close => break,
                TokenKind::LeftBrace | TokenKind::Eof => break,
                TokenKind::Identifier => names.extend(self.take_identifier()),
                _ => {
                    self.advance();
                }
            }
        }
        names
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // MODULE STATEMENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    fn parse_import(&mut self, location: SourceLocation) -> ImportNode {
        let specifiers = self.parse_specifiers();
        // `import "./side-effect"` names its source without `from`.
        let source = if specifiers.is_empty() && self.check(TokenKind::String) {
            self.take_string()
        } else {
            self.parse_from_clause()
        };
        self.match_kinds(&[TokenKind::Semicolon]);
        ImportNode {
            specifiers,
            source,
            location,
        }
    }

    fn parse_export(&mut self, location: SourceLocation) -> ExportNode {
        let is_default = self.check_identifier("default");
        if is_default {
            self.advance();
        }
        let specifiers = self.parse_specifiers();
        let source = self.parse_from_clause();
        self.match_kinds(&[TokenKind::Semicolon]);
        ExportNode {
            specifiers,
            source,
            is_default,
            location,
        }
    }

    /// `A, B as C, * as ns`, optionally wrapped in one pair of braces.
    /// Stops at the first token that cannot continue the list.
    fn parse_specifiers(&mut self) -> Vec<String> {
        let braced = self.match_kinds(&[TokenKind::LeftBrace]).is_some();
        let mut specifiers = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Identifier | TokenKind::Multiply => {
                    let Some(name) = self.advance().map(|t| t.text.clone()) else {
                        break;
                    };
                    specifiers.push(self.parse_alias(name));
                }
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RightBrace if braced => {
                    self.advance();
                    break;
                }
                _ => break,
            }
        }
        specifiers
    }

    fn parse_alias(&mut self, name: String) -> String {
        if self.match_kinds(&[TokenKind::As]).is_none() {
            return name;
        }
        match self.take_identifier() {
            Some(alias) => format!("{} as {}", name, alias),
            None => name,
        }
    }

    fn parse_from_clause(&mut self) -> Option<String> {
        self.match_kinds(&[TokenKind::From])?;
        self.take_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_page_consumes_both_braces() {
        let tokens = tokenize("page X { }");
        let mut parser = Parser::new(&tokens);
        let program = parser.parse_program();
        assert!(parser.is_at_end());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn nesting_is_capped() {
        let source = "page{".repeat(MAX_NESTING_DEPTH + 50);
        let tokens = tokenize(&source);
        let mut parser = Parser::new(&tokens);
        let program = parser.parse_program();
        assert!(parser.depth_limited());

        let mut depth = 0;
        let mut node = program.statements.first();
        while let Some(n) = node {
            depth += 1;
            node = n.children().first();
        }
        assert_eq!(depth, MAX_NESTING_DEPTH);
    }

    #[test]
    fn shallow_input_is_not_depth_limited() {
        let tokens = tokenize("page A { component B { state s { } } }");
        let mut parser = Parser::new(&tokens);
        parser.parse_program();
        assert!(!parser.depth_limited());
    }

    #[test]
    fn parser_without_eof_token_terminates() {
        let tokens = vec![Token::new(TokenKind::Page, "page", 1, 1)];
        let program = parse(&tokens);
        assert_eq!(program.statements.len(), 1);
    }
}
