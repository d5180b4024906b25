use crate::{
    ast::{Expr, Stmt},
    token::LiteralValue,
};

/// Renders syntax trees in parenthesized prefix form, e.g.
/// `(* (- 123) (group 45.67))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(stmt) => self.parenthesize(";", &[&stmt.expression]),
            Stmt::Print(stmt) => self.parenthesize("print", &[&stmt.expression]),
            Stmt::Var(stmt) => {
                let name = format!("var {}", stmt.name.lexeme);
                match &stmt.initializer {
                    Some(initializer) => self.parenthesize(&name, &[initializer]),
                    None => format!("({})", name),
                }
            }
            Stmt::Block(stmt) => {
                let mut out = String::from("(block");
                for statement in &stmt.statements {
                    out.push(' ');
                    out.push_str(&self.print_stmt(statement));
                }
                out.push(')');
                out
            }
            Stmt::If(stmt) => {
                let mut out = format!(
                    "(if {} {}",
                    self.print_expr(&stmt.condition),
                    self.print_stmt(&stmt.then_statement)
                );
                if let Some(else_statement) = &stmt.else_statement {
                    out.push(' ');
                    out.push_str(&self.print_stmt(else_statement));
                }
                out.push(')');
                out
            }
            Stmt::While(stmt) => format!(
                "(while {} {})",
                self.print_expr(&stmt.condition),
                self.print_stmt(&stmt.body)
            ),
        }
    }

    pub fn print_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(expr) => expr.value.to_string(),
            Expr::Grouping(expr) => self.parenthesize("group", &[&expr.expression]),
            Expr::Unary(expr) => self.parenthesize(&expr.operator.lexeme, &[&expr.expression]),
            Expr::Binary(expr) => {
                self.parenthesize(&expr.operator.lexeme, &[&expr.left, &expr.right])
            }
            Expr::Logical(expr) => {
                self.parenthesize(&expr.operator.lexeme, &[&expr.left, &expr.right])
            }
            Expr::Ternary(expr) => self.parenthesize(
                "?:",
                &[&expr.condition, &expr.then_expression, &expr.else_expression],
            ),
            Expr::Variable(expr) => expr.name.lexeme.clone(),
            Expr::Assign(expr) => {
                self.parenthesize(&format!("= {}", expr.name.lexeme), &[&expr.value])
            }
        }
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print_expr(expr));
        }
        out.push(')');
        out
    }
}

/// Renders an expression back to source text that parses to the same tree.
/// Only groupings produce parentheses, so the output follows the token order
/// the parser saw.
pub fn to_source(expr: &Expr) -> String {
    match expr {
        Expr::Literal(expr) => match &expr.value {
            LiteralValue::String(value) => format!("\"{}\"", value),
            value => value.to_string(),
        },
        Expr::Grouping(expr) => format!("({})", to_source(&expr.expression)),
        Expr::Unary(expr) => format!("{}{}", expr.operator.lexeme, to_source(&expr.expression)),
        Expr::Binary(expr) => format!(
            "{} {} {}",
            to_source(&expr.left),
            expr.operator.lexeme,
            to_source(&expr.right)
        ),
        Expr::Logical(expr) => format!(
            "{} {} {}",
            to_source(&expr.left),
            expr.operator.lexeme,
            to_source(&expr.right)
        ),
        Expr::Ternary(expr) => format!(
            "{} ? {} : {}",
            to_source(&expr.condition),
            to_source(&expr.then_expression),
            to_source(&expr.else_expression)
        ),
        Expr::Variable(expr) => expr.name.lexeme.clone(),
        Expr::Assign(expr) => format!("{} = {}", expr.name.lexeme, to_source(&expr.value)),
    }
}
