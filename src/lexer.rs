//! Tokenizer for Emadocs source text
//!
//! Every recognized character lands in exactly one token. Trivia (whitespace,
//! newlines, comments) stays in the stream; characters matching no rule are
//! dropped without a diagnostic.

use crate::token::{keyword_kind, Token, TokenKind};

/// Tokenize a whole document. Never fails; the last token is always `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    lexer.run();
    lexer.tokens
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Consume one character, keeping line and column in step.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek(0) {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn run(&mut self) {
        while let Some(c) = self.peek(0) {
            let start = self.pos;
            let (line, column) = (self.line, self.column);

            let kind = match c {
                '\n' => {
                    self.bump();
                    Some(TokenKind::Newline)
                }
                c if c.is_whitespace() => {
                    self.bump_while(|c| c.is_whitespace() && c != '\n');
                    Some(TokenKind::Whitespace)
                }
                '/' if self.peek(1) == Some('/') => {
                    self.bump_while(|c| c != '\n');
                    Some(TokenKind::Comment)
                }
                '/' if self.peek(1) == Some('*') => {
                    self.read_block_comment();
                    Some(TokenKind::Comment)
                }
                '"' | '\'' => {
                    self.read_quoted(c);
                    Some(TokenKind::String)
                }
                '`' => {
                    self.read_quoted('`');
                    Some(TokenKind::TemplateLiteral)
                }
                c if c.is_ascii_digit() => {
                    self.bump_while(|c| c.is_ascii_digit() || c == '.');
                    Some(TokenKind::Number)
                }
                c if c.is_alphabetic() || c == '_' => {
                    self.bump_while(|c| c.is_alphanumeric() || c == '_');
                    let word: String = self.chars[start..self.pos].iter().collect();
                    Some(keyword_kind(&word).unwrap_or(TokenKind::Identifier))
                }
                _ => self.read_operator(c),
            };

            match kind {
                Some(kind) => {
                    let text: String = self.chars[start..self.pos].iter().collect();
                    self.tokens.push(Token::new(kind, text, line, column));
                }
                None => {
                    // Lexical noise.
                    self.bump();
                }
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.line, self.column));
    }

    /// `/* ... */`; an unterminated comment runs to end of input.
    fn read_block_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(c) = self.peek(0) {
            if c == '*' && self.peek(1) == Some('/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
    }

    /// Quoted string or template literal. A backslash skips the next character.
    fn read_quoted(&mut self, quote: char) {
        self.bump();
        while let Some(c) = self.bump() {
            if c == quote {
                return;
            }
            if c == '\\' {
                self.bump();
            }
        }
    }

    /// Operators and punctuation. Two-character forms win over their prefix.
    fn read_operator(&mut self, c: char) -> Option<TokenKind> {
        use TokenKind::*;
        let next = self.peek(1);
        let (kind, width) = match (c, next) {
            ('=', Some('=')) => (Equal, 2),
            ('=', Some('>')) => (Arrow, 2),
            ('=', _) => (Assign, 1),
            ('!', Some('=')) => (NotEqual, 2),
            ('!', _) => (Not, 1),
            ('<', Some('/')) => (ClosingTagStart, 2),
            ('<', Some('=')) => (LessEqual, 2),
            ('<', _) => (OpeningTagStart, 1),
            ('>', Some('=')) => (GreaterEqual, 2),
            ('>', _) => (TagEnd, 1),
            ('&', Some('&')) => (And, 2),
            ('&', _) => (Ampersand, 1),
            ('|', Some('|')) => (Or, 2),
            ('|', _) => (Pipe, 1),
            ('+', _) => (Plus, 1),
            ('-', _) => (Minus, 1),
            ('*', _) => (Multiply, 1),
            ('/', _) => (Divide, 1),
            ('%', _) => (Modulo, 1),
            ('(', _) => (LeftParen, 1),
            (')', _) => (RightParen, 1),
            ('{', _) => (LeftBrace, 1),
            ('}', _) => (RightBrace, 1),
            ('[', _) => (LeftBracket, 1),
            (']', _) => (RightBracket, 1),
            (';', _) => (Semicolon, 1),
            (',', _) => (Comma, 1),
            ('.', _) => (Dot, 1),
            (':', _) => (Colon, 1),
            ('?', _) => (Question, 1),
            _ => return None,
        };
        for _ in 0..width {
            self.bump();
        }
        Some(kind)
    }
}
