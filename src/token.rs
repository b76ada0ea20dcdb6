//! Token types for the Emadocs tokenizer
//!
//! A token keeps the exact source lexeme so the token stream can always be
//! turned back into the text it came from.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Construct keywords
    Page,
    Component,
    Style,
    Event,
    State,
    Api,
    Router,
    Route,
    Layout,
    Animation,
    Type,
    Hook,
    Plugin,
    Config,
    Import,
    Export,
    From,
    As,

    // Control and declaration keywords
    If,
    Else,
    For,
    While,
    Function,
    Async,
    Await,
    Return,
    Const,
    Let,
    Var,
    True,
    False,
    Null,
    Undefined,
    Class,
    Extends,
    Implements,
    Interface,
    Enum,
    Namespace,

    // Lifecycle keywords
    Render,
    Computed,
    Watch,
    Mounted,
    Unmounted,

    // Operators
    Assign,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    And,
    Ampersand,
    Or,
    Pipe,
    Not,
    Arrow,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,

    // Markup delimiters
    OpeningTagStart,
    ClosingTagStart,
    TagEnd,

    // Literals
    Identifier,
    String,
    Number,
    TemplateLiteral,

    // Structure
    Comment,
    Whitespace,
    Newline,
    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        use TokenKind::*;
        let mut m = HashMap::new();
        for (word, kind) in [
            ("page", Page),
            ("component", Component),
            ("style", Style),
            ("event", Event),
            ("state", State),
            ("api", Api),
            ("router", Router),
            ("route", Route),
            ("layout", Layout),
            ("animation", Animation),
            ("type", Type),
            ("hook", Hook),
            ("plugin", Plugin),
            ("config", Config),
            ("import", Import),
            ("export", Export),
            ("from", From),
            ("as", As),
            ("if", If),
            ("else", Else),
            ("for", For),
            ("while", While),
            ("function", Function),
            ("async", Async),
            ("await", Await),
            ("return", Return),
            ("const", Const),
            ("let", Let),
            ("var", Var),
            ("true", True),
            ("false", False),
            ("null", Null),
            ("undefined", Undefined),
            ("class", Class),
            ("extends", Extends),
            ("implements", Implements),
            ("interface", Interface),
            ("enum", Enum),
            ("namespace", Namespace),
            ("render", Render),
            ("computed", Computed),
            ("watch", Watch),
            ("mounted", Mounted),
            ("unmounted", Unmounted),
        ] {
            m.insert(word, kind);
        }
        m
    };
}

/// Look up a reserved word. Returns `None` for plain identifiers.
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

/// Number of reserved words in the keyword table.
pub fn keyword_count() -> usize {
    KEYWORDS.len()
}

impl TokenKind {
    /// Whitespace, newlines and comments. Kept in the stream, skipped by the parser.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment
        )
    }

    /// Keywords that open a top-level construct.
    pub fn starts_construct(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Page | Component
                | Style
                | Event
                | State
                | Api
                | Router
                | Route
                | Layout
                | Animation
                | Type
                | Hook
                | Plugin
                | Config
                | Import
                | Export
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source lexeme, delimiters included.
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Literal content with quote or backtick delimiters removed.
    /// Escape sequences are left as written.
    pub fn value(&self) -> &str {
        match self.kind {
            TokenKind::String | TokenKind::TemplateLiteral => strip_delimiters(&self.text),
            _ => &self.text,
        }
    }
}

fn strip_delimiters(text: &str) -> &str {
    let mut chars = text.chars();
    let Some(open) = chars.next() else {
        return text;
    };
    let inner = &text[open.len_utf8()..];
    // An unterminated literal has no closing delimiter to strip.
    match inner.strip_suffix(open) {
        Some(body) if !ends_with_escape(body) => body,
        _ => inner,
    }
}

/// True when the final character of `body` is escaped by an odd run of backslashes.
fn ends_with_escape(body: &str) -> bool {
    body.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) at {}:{}", self.kind, self.text, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_has_every_reserved_word() {
        assert_eq!(keyword_count(), 44);
        assert_eq!(keyword_kind("page"), Some(TokenKind::Page));
        assert_eq!(keyword_kind("unmounted"), Some(TokenKind::Unmounted));
        assert_eq!(keyword_kind("Page"), None);
        assert_eq!(keyword_kind("pages"), None);
    }

    #[test]
    fn value_strips_quotes() {
        let t = Token::new(TokenKind::String, "\"Hi\"", 1, 1);
        assert_eq!(t.value(), "Hi");
        let t = Token::new(TokenKind::String, "'a\\'b'", 1, 1);
        assert_eq!(t.value(), "a\\'b");
        let t = Token::new(TokenKind::TemplateLiteral, "`x ${y}`", 1, 1);
        assert_eq!(t.value(), "x ${y}");
    }

    #[test]
    fn value_of_unterminated_literal_keeps_tail() {
        let t = Token::new(TokenKind::String, "\"abc", 1, 1);
        assert_eq!(t.value(), "abc");
        let t = Token::new(TokenKind::String, "\"ab\\\"", 1, 1);
        assert_eq!(t.value(), "ab\\\"");
        let t = Token::new(TokenKind::String, "\"", 1, 1);
        assert_eq!(t.value(), "");
    }

    #[test]
    fn value_of_non_literal_is_text() {
        let t = Token::new(TokenKind::Identifier, "title", 1, 1);
        assert_eq!(t.value(), "title");
    }
}
