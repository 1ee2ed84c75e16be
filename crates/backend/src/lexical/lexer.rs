//! Tokenizer for the host language.
//!
//! The lexer never fails: malformed input produces a token covering the
//! offending text plus a [`LexError`].

use snippet_types::OffsetRange;

use super::keywords;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Keyword,
    /// `bool`, `int`, `string`, ...
    PredefinedType,
    Number,
    String,
    Char,
    LineComment,
    BlockComment,
    Punct,
    Whitespace,
}

impl TokenKind {
    pub(crate) const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub range: OffsetRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LexError {
    pub message: &'static str,
    pub range: OffsetRange,
}

#[derive(Debug, Default)]
pub(crate) struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Two-character operators, longest match first
const DOUBLE_PUNCT: &[&str] = &[
    "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=",
    "::",
];

pub(crate) fn lex(text: &str) -> Lexed {
    let mut lexer = Lexer {
        text,
        pos: 0,
        out: Lexed::default(),
    };
    while let Some(c) = lexer.peek() {
        lexer.step(c);
    }
    lexer.out
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    out: Lexed,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.out.tokens.push(Token {
            kind,
            range: OffsetRange::new(start, self.pos),
        });
    }

    fn error(&mut self, message: &'static str, start: usize) {
        self.out.errors.push(LexError {
            message,
            range: OffsetRange::new(start, self.pos),
        });
    }

    fn step(&mut self, c: char) {
        let start = self.pos;
        match c {
            c if c.is_whitespace() => {
                self.bump_while(char::is_whitespace);
                self.push(TokenKind::Whitespace, start);
            }
            '/' if self.peek_nth(1) == Some('/') => {
                self.bump_while(|c| c != '\n');
                self.push(TokenKind::LineComment, start);
            }
            '/' if self.peek_nth(1) == Some('*') => self.block_comment(start),
            '@' if self.peek_nth(1) == Some('"') => {
                self.bump();
                self.verbatim_string(start);
            }
            '$' if self.peek_nth(1) == Some('@') && self.peek_nth(2) == Some('"') => {
                self.bump();
                self.bump();
                self.verbatim_string(start);
            }
            '@' if self.peek_nth(1) == Some('$') && self.peek_nth(2) == Some('"') => {
                self.bump();
                self.bump();
                self.verbatim_string(start);
            }
            '$' if self.peek_nth(1) == Some('"') => {
                self.bump();
                self.quoted('"', TokenKind::String, start);
            }
            '"' => self.quoted('"', TokenKind::String, start),
            '\'' => self.quoted('\'', TokenKind::Char, start),
            '@' if self.peek_nth(1).is_some_and(is_ident_start) => {
                // Verbatim identifiers are never keywords
                self.bump();
                self.bump_while(is_ident_continue);
                self.push(TokenKind::Ident, start);
            }
            c if is_ident_start(c) => {
                self.bump_while(is_ident_continue);
                let word = &self.text[start..self.pos];
                let kind = if keywords::is_predefined_type(word) {
                    TokenKind::PredefinedType
                } else if keywords::is_keyword(word) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Ident
                };
                self.push(kind, start);
            }
            c if c.is_ascii_digit() => self.number(start),
            _ => {
                let rest = &self.text[self.pos..];
                if let Some(op) = DOUBLE_PUNCT.iter().find(|op| rest.starts_with(**op)) {
                    self.pos += op.len();
                } else {
                    self.bump();
                }
                self.push(TokenKind::Punct, start);
            }
        }
    }

    fn block_comment(&mut self, start: usize) {
        self.pos += 2;
        match self.text[self.pos..].find("*/") {
            Some(end) => {
                self.pos += end + 2;
                self.push(TokenKind::BlockComment, start);
            }
            None => {
                self.pos = self.text.len();
                self.push(TokenKind::BlockComment, start);
                self.error("unterminated block comment", start);
            }
        }
    }

    /// `@"..."` with `""` as the only escape; may span lines.
    fn verbatim_string(&mut self, start: usize) {
        // opening quote
        self.bump();
        loop {
            match self.bump() {
                Some('"') if self.peek() == Some('"') => {
                    self.bump();
                }
                Some('"') => {
                    self.push(TokenKind::String, start);
                    return;
                }
                Some(_) => {}
                None => {
                    self.push(TokenKind::String, start);
                    self.error("unterminated string literal", start);
                    return;
                }
            }
        }
    }

    /// Regular string or char literal; ends at the closing quote or the line.
    fn quoted(&mut self, quote: char, kind: TokenKind, start: usize) {
        // opening quote
        self.bump();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some(c) if c == quote => {
                    self.bump();
                    self.push(kind, start);
                    return;
                }
                Some('\n') | None => {
                    self.push(kind, start);
                    let message = if kind == TokenKind::Char {
                        "unterminated character literal"
                    } else {
                        "unterminated string literal"
                    };
                    self.error(message, start);
                    return;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn number(&mut self, start: usize) {
        loop {
            self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            } else {
                break;
            }
        }
        self.push(TokenKind::Number, start);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
