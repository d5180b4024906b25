use std::{
    fmt,
    io::{self, Stdout, Write},
    mem,
    rc::Rc,
};

use log::{debug, trace};

use crate::{
    ast::{
        AssignExpr, BinaryExpr, BlockStmt, Expr, IfStmt, LiteralExpr, LogicalExpr, Stmt,
        TernaryExpr, UnaryExpr, VarStmt, WhileStmt,
    },
    environment::Environment,
    error::RuntimeError,
    token::{LiteralValue, Token, TokenType},
};

/// Tree-walking evaluator. `print` output goes to `W`, which is standard
/// output unless another sink is supplied.
pub struct Interpreter<W: Write = Stdout> {
    environment: Box<Environment>,
    output: W,
}

impl Interpreter<Stdout> {
    pub fn new() -> Interpreter<Stdout> {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Interpreter<W> {
        Interpreter {
            environment: Box::new(Environment::new()),
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs `statements` in order. The first runtime error aborts the rest of
    /// the program; bindings made before it stay in the global scope.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        debug!("interpreting {} statements", statements.len());

        for statement in statements {
            self.execute(statement)?;
        }

        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(stmt) => self.evaluate(&stmt.expression).map(|_| ()),
            Stmt::Print(stmt) => {
                let value = self.evaluate(&stmt.expression)?;
                writeln!(self.output, "{}", value)?;
                Ok(())
            }
            Stmt::Var(stmt) => self.visit_var_stmt(stmt),
            Stmt::Block(stmt) => self.visit_block_stmt(stmt),
            Stmt::If(stmt) => self.visit_if_stmt(stmt),
            Stmt::While(stmt) => self.visit_while_stmt(stmt),
        }
    }

    fn visit_var_stmt(&mut self, stmt: &VarStmt) -> Result<(), RuntimeError> {
        let value = match &stmt.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => RuntimeValue::Nil,
        };
        self.environment.define(&stmt.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &BlockStmt) -> Result<(), RuntimeError> {
        self.execute_block(&stmt.statements)
    }

    /// Runs `statements` in a fresh child scope. The enclosing scope is put
    /// back as current before returning, whether or not a statement failed.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let enclosing = mem::take(&mut self.environment);
        self.environment = Box::new(Environment::with_enclosing(enclosing));
        trace!("entered block of {} statements", statements.len());

        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        let scope = mem::take(&mut self.environment);
        if let Some(enclosing) = scope.into_enclosing() {
            self.environment = enclosing;
        }
        trace!("left block");

        result
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt) -> Result<(), RuntimeError> {
        if self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_statement)
        } else {
            match &stmt.else_statement {
                Some(else_statement) => self.execute(else_statement),
                None => Ok(()),
            }
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileStmt) -> Result<(), RuntimeError> {
        while self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.body)?;
        }
        Ok(())
    }

    /// Evaluates a single expression against the current scope.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<RuntimeValue, RuntimeError> {
        match expr {
            Expr::Literal(expr) => Ok(self.visit_literal_expr(expr)),
            Expr::Grouping(expr) => self.evaluate(&expr.expression),
            Expr::Unary(expr) => self.visit_unary_expr(expr),
            Expr::Binary(expr) => self.visit_binary_expr(expr),
            Expr::Logical(expr) => self.visit_logical_expr(expr),
            Expr::Ternary(expr) => self.visit_ternary_expr(expr),
            Expr::Variable(expr) => self.environment.get(&expr.name),
            Expr::Assign(expr) => self.visit_assign_expr(expr),
        }
    }

    fn visit_literal_expr(&self, expr: &LiteralExpr) -> RuntimeValue {
        use LiteralValue::*;
        match &expr.value {
            Nil => RuntimeValue::Nil,
            Bool(value) => RuntimeValue::Bool(*value),
            Number(value) => RuntimeValue::Number(*value),
            String(value) => RuntimeValue::String(Rc::from(value.as_str())),
        }
    }

    fn visit_assign_expr(&mut self, expr: &AssignExpr) -> Result<RuntimeValue, RuntimeError> {
        let value = self.evaluate(&expr.value)?;
        self.environment.assign(&expr.name, value.clone())?;
        Ok(value)
    }

    fn visit_unary_expr(&mut self, expr: &UnaryExpr) -> Result<RuntimeValue, RuntimeError> {
        let operand = self.evaluate(&expr.expression)?;
        match expr.operator.token_type {
            TokenType::Bang => Ok(RuntimeValue::Bool(!operand.is_truthy())),
            TokenType::Minus => {
                let operand = check_numeric_operand(&expr.operator, &operand)?;
                Ok(RuntimeValue::Number(-operand))
            }
            _ => Err(RuntimeError::type_mismatch(
                &expr.operator,
                "Unknown unary operator.",
            )),
        }
    }

    fn visit_logical_expr(&mut self, expr: &LogicalExpr) -> Result<RuntimeValue, RuntimeError> {
        let left = self.evaluate(&expr.left)?;

        let short_circuits = match expr.operator.token_type {
            TokenType::Or => left.is_truthy(),
            TokenType::And => !left.is_truthy(),
            _ => {
                return Err(RuntimeError::type_mismatch(
                    &expr.operator,
                    "Unknown logical operator.",
                ));
            }
        };

        if short_circuits {
            Ok(left)
        } else {
            self.evaluate(&expr.right)
        }
    }

    fn visit_ternary_expr(&mut self, expr: &TernaryExpr) -> Result<RuntimeValue, RuntimeError> {
        if self.evaluate(&expr.condition)?.is_truthy() {
            self.evaluate(&expr.then_expression)
        } else {
            self.evaluate(&expr.else_expression)
        }
    }

    fn visit_binary_expr(&mut self, expr: &BinaryExpr) -> Result<RuntimeValue, RuntimeError> {
        let left = self.evaluate(&expr.left)?;
        let right = self.evaluate(&expr.right)?;
        let operator = &expr.operator;

        Ok(match operator.token_type {
            TokenType::Comma => right,
            TokenType::Plus => match (left, right) {
                (RuntimeValue::Number(left), RuntimeValue::Number(right)) => {
                    RuntimeValue::Number(left + right)
                }
                (RuntimeValue::String(left), RuntimeValue::String(right)) => {
                    RuntimeValue::String(Rc::from(format!("{}{}", left, right)))
                }
                _ => {
                    return Err(RuntimeError::type_mismatch(
                        operator,
                        "Operands must be two numbers or two strings.",
                    ));
                }
            },
            TokenType::Minus => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Number(left - right)
            }
            TokenType::Slash => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Number(left / right)
            }
            TokenType::Star => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Number(left * right)
            }
            TokenType::EqualEqual => RuntimeValue::Bool(left == right),
            TokenType::BangEqual => RuntimeValue::Bool(left != right),
            TokenType::Less => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Bool(left < right)
            }
            TokenType::LessEqual => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Bool(left <= right)
            }
            TokenType::Greater => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Bool(left > right)
            }
            TokenType::GreaterEqual => {
                let (left, right) = check_numeric_operands(operator, &left, &right)?;
                RuntimeValue::Bool(left >= right)
            }
            _ => {
                return Err(RuntimeError::type_mismatch(
                    operator,
                    "Unknown binary operator.",
                ));
            }
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum RuntimeValue {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
}

impl RuntimeValue {
    /// `nil` and `false` are falsy; everything else, `0` and `""` included,
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            RuntimeValue::Nil => false,
            RuntimeValue::Bool(value) => *value,
            RuntimeValue::Number(_) | RuntimeValue::String(_) => true,
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RuntimeValue::*;
        match self {
            Nil => write!(f, "nil"),
            Bool(value) => write!(f, "{}", value),
            // Whole numbers already print without a decimal point.
            Number(value) => write!(f, "{}", value),
            String(value) => write!(f, "{}", value),
        }
    }
}

fn check_numeric_operand(operator: &Token, operand: &RuntimeValue) -> Result<f64, RuntimeError> {
    if let RuntimeValue::Number(value) = *operand {
        return Ok(value);
    }

    Err(RuntimeError::type_mismatch(
        operator,
        "Operand must be a number.",
    ))
}

fn check_numeric_operands(
    operator: &Token,
    left_operand: &RuntimeValue,
    right_operand: &RuntimeValue,
) -> Result<(f64, f64), RuntimeError> {
    if let (RuntimeValue::Number(left), RuntimeValue::Number(right)) = (left_operand, right_operand)
    {
        return Ok((*left, *right));
    }

    Err(RuntimeError::type_mismatch(
        operator,
        "Operands must be numbers.",
    ))
}
