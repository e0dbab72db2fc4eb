use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Diagnostics, ScanError};
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Converts source text into an ordered token stream.
///
/// Implemented as a small state machine driven by a [`PeekMoreIterator`] so
/// two-character lookahead (needed for number literals and `//`/`/* */`
/// comments) does not require buffering the whole source up front.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    start_line: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            start_line: 1,
            line: 1,
        }
    }

    /// Scans the whole source and returns its tokens, terminated by a single
    /// EOF token. Never aborts early: unexpected characters are reported and
    /// scanning continues so later tokens can still be produced.
    pub fn scan_tokens(&mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.start_line = self.line;
            if let Some(token) = self.scan_token(diagnostics) {
                tokens.push(token);
            }
        }

        tokens.push(Token::new(Type::EOF, String::new(), None, self.line));
        tokens
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn advance(&mut self) -> Option<char> {
        self.source.next()
    }

    fn peek(&mut self) -> Option<char> {
        self.source.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.source.peek_next().copied()
    }

    fn r#match(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn token(&self, r#type: Type, lexeme: impl Into<String>, literal: Option<Literal>) -> Token {
        Token::new(r#type, lexeme.into(), literal, self.start_line)
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) -> Option<Token> {
        let c = self.advance()?;

        match c {
            '(' => Some(self.token(Type::LeftParen, "(", None)),
            ')' => Some(self.token(Type::RightParen, ")", None)),
            '{' => Some(self.token(Type::LeftBrace, "{", None)),
            '}' => Some(self.token(Type::RightBrace, "}", None)),
            ',' => Some(self.token(Type::Comma, ",", None)),
            '.' => Some(self.token(Type::Dot, ".", None)),
            '-' => Some(self.token(Type::Minus, "-", None)),
            '+' => Some(self.token(Type::Plus, "+", None)),
            ';' => Some(self.token(Type::Semicolon, ";", None)),
            '*' => Some(self.token(Type::Star, "*", None)),

            '!' => Some(if self.r#match('=') {
                self.token(Type::BangEqual, "!=", None)
            } else {
                self.token(Type::Bang, "!", None)
            }),
            '=' => Some(if self.r#match('=') {
                self.token(Type::EqualEqual, "==", None)
            } else {
                self.token(Type::Equal, "=", None)
            }),
            '<' => Some(if self.r#match('=') {
                self.token(Type::LessEqual, "<=", None)
            } else {
                self.token(Type::Less, "<", None)
            }),
            '>' => Some(if self.r#match('=') {
                self.token(Type::GreaterEqual, ">=", None)
            } else {
                self.token(Type::Greater, ">", None)
            }),

            '/' => {
                if self.r#match('/') {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                    None
                } else if self.r#match('*') {
                    self.block_comment(diagnostics);
                    None
                } else {
                    Some(self.token(Type::Slash, "/", None))
                }
            },

            ' ' | '\r' | '\t' => None,
            '\n' => {
                self.line += 1;
                None
            },

            '"' => self.string(diagnostics),
            c if c.is_ascii_digit() => Some(self.number(c)),
            c if c.is_alphabetic() || c == '_' => Some(self.identifier(c)),

            c => {
                diagnostics.report(&ScanError {
                    line: self.line,
                    message: format!("Unexpected character '{c}'"),
                });
                None
            },
        }
    }

    /// Non-nesting block comment. An unterminated comment reports an error
    /// and simply stops the comment body at end-of-stream.
    fn block_comment(&mut self, diagnostics: &mut Diagnostics) {
        loop {
            match self.peek() {
                None => {
                    diagnostics.report(&ScanError {
                        line: self.start_line,
                        message: "Unterminated block comment.".to_string(),
                    });
                    return;
                },
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                },
                Some('*') => {
                    self.advance();
                    if self.r#match('/') {
                        return;
                    }
                },
                Some(_) => {
                    self.advance();
                },
            }
        }
    }

    fn string(&mut self, diagnostics: &mut Diagnostics) -> Option<Token> {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                break;
            }
            value.push(c);
            self.advance();
        }

        if self.peek() != Some('"') {
            diagnostics.report(&ScanError {
                line: self.start_line,
                message: "Unterminated string.".to_string(),
            });
            return None;
        }

        self.advance(); // closing quote

        Some(self.token(Type::String, value.clone(), Some(Literal::String(value))))
    }

    fn number(&mut self, first: char) -> Token {
        let mut value = String::from(first);

        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            value.push(c);
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            value.push('.');
            self.advance();

            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                value.push(c);
                self.advance();
            }
        }

        let parsed: f64 = value.parse().expect("scanned number lexeme to be valid");
        self.token(Type::Number, value, Some(Literal::Number(parsed)))
    }

    fn identifier(&mut self, first: char) -> Token {
        let mut value = String::from(first);

        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            value.push(c);
            self.advance();
        }

        let r#type = match value.as_str() {
            "and" => Type::And,
            "break" => Type::Break,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.token(r#type, value, None)
    }
}
