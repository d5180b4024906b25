use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Single character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Dot,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Slash,
    Star,
    Question,
    Colon,

    // One or two-character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Keywords.
    Var,
    Fun,
    Class,
    This,
    Super,
    If,
    Else,
    For,
    While,
    Return,
    Print,
    And,
    Or,
    True,
    False,
    Nil,

    // Literals.
    Number,
    String,
    Identifier,

    // End of file.
    Eof,
}

impl TokenType {
    /// The name used when tokens are listed by the `tokenize` command.
    pub fn name(self) -> &'static str {
        use TokenType::*;
        match self {
            LeftParen => "LEFT_PAREN",
            RightParen => "RIGHT_PAREN",
            LeftBrace => "LEFT_BRACE",
            RightBrace => "RIGHT_BRACE",
            Dot => "DOT",
            Comma => "COMMA",
            Semicolon => "SEMICOLON",
            Plus => "PLUS",
            Minus => "MINUS",
            Slash => "SLASH",
            Star => "STAR",
            Question => "QUESTION_MARK",
            Colon => "COLON",
            Bang => "BANG",
            BangEqual => "BANG_EQUAL",
            Equal => "EQUAL",
            EqualEqual => "EQUAL_EQUAL",
            Less => "LESS",
            LessEqual => "LESS_EQUAL",
            Greater => "GREATER",
            GreaterEqual => "GREATER_EQUAL",
            Var => "VAR",
            Fun => "FUN",
            Class => "CLASS",
            This => "THIS",
            Super => "SUPER",
            If => "IF",
            Else => "ELSE",
            For => "FOR",
            While => "WHILE",
            Return => "RETURN",
            Print => "PRINT",
            And => "AND",
            Or => "OR",
            True => "TRUE",
            False => "FALSE",
            Nil => "NIL",
            Number => "NUMBER",
            String => "STRING",
            Identifier => "IDENTIFIER",
            Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LiteralValue::*;
        match self {
            Nil => write!(f, "nil"),
            Bool(value) => write!(f, "{}", value),
            Number(value) => write!(f, "{}", value),
            String(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub line: usize,
    pub literal: Option<LiteralValue>,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, line: usize) -> Token {
        Token {
            token_type,
            lexeme: lexeme.to_string(),
            line,
            literal: None,
        }
    }
}

/// Renders `<KIND> <lexeme> <literal>`, with `null` standing in for a missing
/// literal and numbers always carrying a fractional part.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.token_type, self.lexeme)?;
        match &self.literal {
            None => write!(f, "null"),
            Some(LiteralValue::Number(value)) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{:.1}", value)
            }
            Some(literal) => write!(f, "{}", literal),
        }
    }
}
