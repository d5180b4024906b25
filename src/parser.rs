use log::debug;

use crate::{
    ast::{
        AssignExpr, BinaryExpr, BlockStmt, Expr, ExpressionStmt, GroupingExpr, IfStmt,
        LiteralExpr, LogicalExpr, PrintStmt, Stmt, TernaryExpr, UnaryExpr, VarStmt,
        VariableExpr, WhileStmt,
    },
    error::{ParseError, ParseErrors},
    token::{LiteralValue, Token, TokenType},
};

/// Deepest nesting of statements and expressions the parser accepts, so
/// pathological input fails with a diagnostic instead of exhausting the stack.
pub const MAX_NESTING: usize = 64;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    /// `tokens` must end with an `Eof` token, as produced by the scanner.
    pub fn new(mut tokens: Vec<Token>) -> Parser {
        let line = tokens.last().map_or(1, |token| token.line);
        if tokens.last().map(|token| token.token_type) != Some(TokenType::Eof) {
            tokens.push(Token::new(TokenType::Eof, "", line));
        }

        Parser {
            tokens,
            current: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    /// Parses a whole program. A syntax error inside one declaration is
    /// recorded and parsing resumes at the next statement boundary, so every
    /// independent error is reported together.
    pub fn parse(mut self) -> Result<Vec<Stmt>, ParseErrors> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = self.declaration_with_sync() {
                statements.push(statement);
            }
        }

        debug!(
            "parsed {} statements with {} errors",
            statements.len(),
            self.errors.len()
        );

        if self.errors.is_empty() {
            Ok(statements)
        } else {
            Err(ParseErrors(self.errors))
        }
    }

    /// Parses exactly one expression followed by end of input.
    pub fn parse_expression(mut self) -> Result<Expr, ParseError> {
        let expression = self.expression()?;

        if !self.is_at_end() {
            return Err(ParseError::Expected {
                token: self.peek().clone(),
                message: "Expect end of expression.",
            });
        }

        Ok(expression)
    }

    fn declaration_with_sync(&mut self) -> Option<Stmt> {
        match self.declaration() {
            Ok(statement) => Some(statement),
            Err(error) => {
                debug!("recovering from: {}", error);
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }

            use TokenType::*;
            if let Class | Fun | Var | If | While | Print | Return = self.peek().token_type {
                return;
            }

            self.advance();
        }
    }

    fn declaration(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(TokenType::Var) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(TokenType::Identifier, "Expect variable name.")?;

        let initializer = match self.match_token(TokenType::Equal) {
            true => Some(self.expression()?),
            false => None,
        };

        self.consume(
            TokenType::Semicolon,
            "Expect ';' after variable declaration.",
        )?;

        Ok(Stmt::Var(Box::new(VarStmt { name, initializer })))
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        self.nested(Self::statement_at_depth)
    }

    fn statement_at_depth(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(TokenType::If) {
            self.if_stmt()
        } else if self.match_token(TokenType::While) {
            self.while_stmt()
        } else if self.match_token(TokenType::For) {
            self.for_stmt()
        } else if self.match_token(TokenType::Print) {
            self.print_stmt()
        } else if self.match_token(TokenType::LeftBrace) {
            Ok(Stmt::Block(Box::new(BlockStmt {
                statements: self.block()?,
            })))
        } else {
            self.expression_stmt()
        }
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while self.peek().token_type != TokenType::RightBrace && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn print_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expression = self.expression()?;

        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;

        Ok(Stmt::Print(Box::new(PrintStmt { expression })))
    }

    fn if_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'if'.")?;

        let condition = self.expression()?;

        self.consume(TokenType::RightParen, "Expect ')' after if condition.")?;

        let then_statement = self.statement()?;

        let else_statement = match self.match_token(TokenType::Else) {
            true => Some(self.statement()?),
            false => None,
        };

        Ok(Stmt::If(Box::new(IfStmt {
            condition,
            then_statement,
            else_statement,
        })))
    }

    fn while_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;

        let condition = self.expression()?;

        self.consume(TokenType::RightParen, "Expect ')' after while condition.")?;

        let body = self.statement()?;

        Ok(Stmt::While(Box::new(WhileStmt { condition, body })))
    }

    /// Desugars `for (init; cond; incr) body` into
    /// `{ init; while (cond) { body; incr; } }`.
    fn for_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_token(TokenType::Semicolon) {
            None
        } else if self.match_token(TokenType::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_stmt()?)
        };

        let condition = if self.match_token(TokenType::Semicolon) {
            Expr::literal(LiteralValue::Bool(true))
        } else {
            let expr = self.expression()?;
            self.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;
            expr
        };

        let increment = if self.match_token(TokenType::RightParen) {
            None
        } else {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expect ')' after for clauses.")?;
            Some(expr)
        };

        let mut body = self.statement()?;

        if let Some(expression) = increment {
            body = Stmt::Block(Box::new(BlockStmt {
                statements: vec![
                    body,
                    Stmt::Expression(Box::new(ExpressionStmt { expression })),
                ],
            }))
        };

        body = Stmt::While(Box::new(WhileStmt { condition, body }));

        if let Some(statement) = initializer {
            body = Stmt::Block(Box::new(BlockStmt {
                statements: vec![statement, body],
            }))
        }

        Ok(body)
    }

    fn expression_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expression = self.expression()?;

        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;

        Ok(Stmt::Expression(Box::new(ExpressionStmt { expression })))
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::assign_expr)
    }

    /// Runs `parse` one nesting level deeper, failing once `MAX_NESTING` is
    /// reached.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::Expected {
                token: self.peek().clone(),
                message: "Too much nesting.",
            });
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Lowest precedence level: comma chains, then the ternary, then
    /// right-associative assignment.
    fn assign_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.or_expr()?;

        while self.match_token(TokenType::Comma) {
            let operator = self.previous();
            let right = self.or_expr()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right,
            }));
        }

        if self.match_token(TokenType::Question) {
            let then_expression = self.expression()?;
            self.consume(TokenType::Colon, "Expect ':' in ternary expression.")?;
            let else_expression = self.expression()?;
            expr = Expr::Ternary(Box::new(TernaryExpr {
                condition: expr,
                then_expression,
                else_expression,
            }));
        }

        if self.match_token(TokenType::Equal) {
            let equals = self.previous();
            let value = self.nested(Self::assign_expr)?;
            return match expr {
                Expr::Variable(variable) => Ok(Expr::Assign(Box::new(AssignExpr {
                    name: variable.name,
                    value,
                }))),
                _ => Err(ParseError::InvalidAssignmentTarget { equals }),
            };
        }

        Ok(expr)
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.and_expr()?;

        while self.match_token(TokenType::Or) {
            let operator = self.previous();
            let right = self.and_expr()?;
            expr = Expr::Logical(Box::new(LogicalExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality_expr()?;

        while self.match_token(TokenType::And) {
            let operator = self.previous();
            let right = self.equality_expr()?;
            expr = Expr::Logical(Box::new(LogicalExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn equality_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison_expr()?;

        while self.match_any(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let operator = self.previous();
            let right = self.comparison_expr()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term_expr()?;

        while self.match_any(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = self.previous();
            let right = self.term_expr()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn term_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor_expr()?;

        while self.match_any(&[TokenType::Plus, TokenType::Minus]) {
            let operator = self.previous();
            let right = self.factor_expr()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn factor_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary_expr()?;

        while self.match_any(&[TokenType::Star, TokenType::Slash]) {
            let operator = self.previous();
            let right = self.unary_expr()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.match_any(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous();
            let expression = self.nested(Self::unary_expr)?;
            Ok(Expr::Unary(Box::new(UnaryExpr {
                operator,
                expression,
            })))
        } else {
            self.primary_expr()
        }
    }

    fn primary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(TokenType::False) {
            Ok(Expr::literal(LiteralValue::Bool(false)))
        } else if self.match_token(TokenType::True) {
            Ok(Expr::literal(LiteralValue::Bool(true)))
        } else if self.match_token(TokenType::Nil) {
            Ok(Expr::literal(LiteralValue::Nil))
        } else if self.match_any(&[TokenType::Number, TokenType::String]) {
            let token = self.previous();
            let value = token.literal.unwrap_or(LiteralValue::Nil);
            Ok(Expr::Literal(Box::new(LiteralExpr { value })))
        } else if self.match_token(TokenType::Identifier) {
            Ok(Expr::Variable(Box::new(VariableExpr {
                name: self.previous(),
            })))
        } else if self.match_token(TokenType::LeftParen) {
            let expression = self.expression()?;
            self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
            Ok(Expr::Grouping(Box::new(GroupingExpr { expression })))
        } else {
            Err(ParseError::UnexpectedToken {
                token: self.peek().clone(),
            })
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> Token {
        self.tokens[self.current.saturating_sub(1)].clone()
    }

    /// Never moves past the trailing `Eof`.
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.peek().token_type == token_type && !self.is_at_end() {
            self.advance();
            return true;
        }

        false
    }

    fn match_any(&mut self, token_types: &[TokenType]) -> bool {
        token_types
            .iter()
            .any(|token_type| self.match_token(*token_type))
    }

    fn consume(
        &mut self,
        token_type: TokenType,
        message: &'static str,
    ) -> Result<Token, ParseError> {
        let token = self.peek().clone();
        if token.token_type == token_type {
            self.advance();
            return Ok(token);
        }

        Err(ParseError::Expected { token, message })
    }
}

fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Binary(Box::new(BinaryExpr {
        left,
        operator,
        right,
    }))
}
