use log::{debug, trace};

use crate::error::ScanError;
use crate::token::{LiteralValue, Token, TokenType};

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    line: usize,
    start: usize,
    current: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            bytes: source.as_bytes(),
            line: 1,
            start: 0,
            current: 0,
            tokens: Vec::new(),
        }
    }

    /// Scans the whole source, stopping at the first lexical error. A
    /// successful scan always ends with exactly one `Eof` token.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>, ScanError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.start = self.current;
        self.tokens.push(Token::new(TokenType::Eof, "", self.line));

        debug!("scanned {} tokens over {} lines", self.tokens.len(), self.line);
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), ScanError> {
        let character = self.advance();

        match character {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '.' => self.add_token(TokenType::Dot),
            ',' => self.add_token(TokenType::Comma),
            ';' => self.add_token(TokenType::Semicolon),
            '+' => self.add_token(TokenType::Plus),
            '-' => self.add_token(TokenType::Minus),
            '*' => self.add_token(TokenType::Star),
            '?' => self.add_token(TokenType::Question),
            ':' => self.add_token(TokenType::Colon),
            '/' => {
                if self.match_char('/') {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash)
                }
            }
            '!' => {
                let token_type = match self.match_char('=') {
                    true => TokenType::BangEqual,
                    false => TokenType::Bang,
                };
                self.add_token(token_type)
            }
            '=' => {
                let token_type = match self.match_char('=') {
                    true => TokenType::EqualEqual,
                    false => TokenType::Equal,
                };
                self.add_token(token_type)
            }
            '<' => {
                let token_type = match self.match_char('=') {
                    true => TokenType::LessEqual,
                    false => TokenType::Less,
                };
                self.add_token(token_type)
            }
            '>' => {
                let token_type = match self.match_char('=') {
                    true => TokenType::GreaterEqual,
                    false => TokenType::Greater,
                };
                self.add_token(token_type)
            }
            '"' => return self.string(),
            ' ' | '\t' | '\r' => {}
            '\n' => {
                self.line += 1;
            }
            _ => {
                if is_digit(character) {
                    return self.number();
                } else if is_alpha(character) {
                    self.identifier();
                } else {
                    // The byte may start a multi-byte character, so decode it
                    // from the source for the message.
                    let character = self.source[self.start..]
                        .chars()
                        .next()
                        .unwrap_or(character);
                    return Err(ScanError::UnexpectedCharacter {
                        character,
                        line: self.line,
                    });
                }
            }
        }

        Ok(())
    }

    fn string(&mut self) -> Result<(), ScanError> {
        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if !self.match_char('"') {
            return Err(ScanError::UnterminatedString { line: self.line });
        }

        let lexeme = self.lexeme();
        let value = lexeme[1..(lexeme.len() - 1)].to_string();
        self.add_full_token(TokenType::String, Some(LiteralValue::String(value)));
        Ok(())
    }

    fn number(&mut self) -> Result<(), ScanError> {
        while !self.is_at_end() && is_digit(self.peek()) {
            self.advance();
        }

        if self.peek() == '.' && is_digit(self.peek_next()) {
            self.advance();
            while !self.is_at_end() && is_digit(self.peek()) {
                self.advance();
            }
        }

        let lexeme = self.lexeme();
        let value = lexeme
            .parse::<f64>()
            .map_err(|_| ScanError::MalformedNumber {
                lexeme: lexeme.to_string(),
                line: self.line,
            })?;
        self.add_full_token(TokenType::Number, Some(LiteralValue::Number(value)));
        Ok(())
    }

    fn identifier(&mut self) {
        while !self.is_at_end() && is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let type_ = resolve_keyword_type(self.lexeme()).unwrap_or(TokenType::Identifier);
        self.add_token(type_)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.bytes.len()
    }

    fn peek(&self) -> char {
        match self.bytes.get(self.current) {
            Some(byte) => *byte as char,
            None => '\0',
        }
    }

    fn peek_next(&self) -> char {
        match self.bytes.get(self.current + 1) {
            Some(byte) => *byte as char,
            None => '\0',
        }
    }

    fn advance(&mut self) -> char {
        let current = self.peek();
        self.current += 1;
        current
    }

    fn match_char(&mut self, character: char) -> bool {
        if !self.is_at_end() && self.peek() == character {
            self.advance();
            return true;
        }

        false
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_full_token(token_type, None)
    }

    fn add_full_token(&mut self, token_type: TokenType, literal: Option<LiteralValue>) {
        let token = Token {
            token_type,
            line: self.line,
            literal,
            lexeme: self.lexeme().to_string(),
        };
        trace!("token {}", token);
        self.tokens.push(token)
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }
}

fn is_digit(character: char) -> bool {
    character.is_ascii_digit()
}

fn is_alpha(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

fn is_alpha_numeric(character: char) -> bool {
    is_digit(character) || is_alpha(character)
}

fn resolve_keyword_type(lexeme: &str) -> Option<TokenType> {
    match lexeme {
        "and" => Some(TokenType::And),
        "class" => Some(TokenType::Class),
        "else" => Some(TokenType::Else),
        "false" => Some(TokenType::False),
        "for" => Some(TokenType::For),
        "fun" => Some(TokenType::Fun),
        "if" => Some(TokenType::If),
        "nil" => Some(TokenType::Nil),
        "or" => Some(TokenType::Or),
        "print" => Some(TokenType::Print),
        "return" => Some(TokenType::Return),
        "super" => Some(TokenType::Super),
        "this" => Some(TokenType::This),
        "true" => Some(TokenType::True),
        "var" => Some(TokenType::Var),
        "while" => Some(TokenType::While),
        _ => None,
    }
}
