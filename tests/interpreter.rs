use std::io::Cursor;

use tree_lox::{
    ast::{Expr, LogicalExpr},
    parser::Parser,
    token::{LiteralValue, Token, TokenType},
    tokenize, Interpreter, Lox, LoxError, RuntimeError, RuntimeValue,
};

/// Runs `source` as a program and returns everything it printed along with
/// the run's outcome.
fn run(source: &str) -> (String, Result<(), LoxError>) {
    let mut lox = Lox::with_output(Vec::new());
    let result = lox.run(source);
    let output = String::from_utf8(lox.into_output()).unwrap();
    (output, result)
}

fn output_of(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(error) = result {
        panic!("program failed: {}", error);
    }
    output
}

fn runtime_error(source: &str) -> (String, RuntimeError) {
    match run(source) {
        (output, Err(LoxError::Runtime(error))) => (output, error),
        (_, other) => panic!("expected a runtime error, got {:?}", other),
    }
}

fn evaluate(source: &str) -> RuntimeValue {
    let expr = Parser::new(tokenize(source).unwrap())
        .parse_expression()
        .unwrap();
    Interpreter::with_output(Vec::new()).evaluate(&expr).unwrap()
}

#[test]
fn grouping_overrides_precedence() {
    assert_eq!(evaluate("(1+2)*3"), RuntimeValue::Number(9.0));
    assert_eq!(evaluate("1+2*3"), RuntimeValue::Number(7.0));
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(evaluate("true and false or true"), RuntimeValue::Bool(true));
    assert_eq!(
        output_of("var a = 0; false and (a = 1); true or (a = 2); print a;"),
        "0\n"
    );
}

#[test]
fn logical_operators_return_operands_unconverted() {
    assert_eq!(
        output_of("print nil or \"default\"; print 1 and 2; print nil and 1; print 0 or 1;"),
        "default\n2\nnil\n0\n"
    );
}

#[test]
fn truthiness() {
    let source = r#"
        if (0) print "zero"; else print "not zero";
        if ("") print "empty";
        if (nil) print "nil"; else print "nil is falsy";
        if (false) print "false"; else print "false is falsy";
        print !nil;
        print !0;
    "#;

    assert_eq!(
        output_of(source),
        "zero\nempty\nnil is falsy\nfalse is falsy\ntrue\nfalse\n"
    );
}

#[test]
fn equality_never_crosses_types() {
    assert_eq!(evaluate("nil == nil"), RuntimeValue::Bool(true));
    assert_eq!(evaluate("nil == false"), RuntimeValue::Bool(false));
    assert_eq!(evaluate("1 == \"1\""), RuntimeValue::Bool(false));
    assert_eq!(evaluate("\"a\" == \"a\""), RuntimeValue::Bool(true));
    assert_eq!(evaluate("1 != 2"), RuntimeValue::Bool(true));
    assert_eq!(evaluate("0/0 == 0/0"), RuntimeValue::Bool(false));
}

#[test]
fn arithmetic_and_concatenation() {
    assert_eq!(
        output_of("print 10 / 4; print 3 * 2 - 1; print -(2 + 1); print \"foo\" + \"bar\";"),
        "2.5\n5\n-3\nfoobar\n"
    );
}

#[test]
fn division_by_zero_follows_floating_point() {
    assert_eq!(output_of("print 1 / 0; print -1 / 0;"), "inf\n-inf\n");
}

#[test]
fn comparisons() {
    assert_eq!(
        output_of("print 1 < 2; print 2 <= 2; print 1 > 2; print 3 >= 4;"),
        "true\ntrue\nfalse\nfalse\n"
    );
}

#[test]
fn plus_rejects_mixed_operands() {
    let (_, error) = runtime_error("print \"a\" + 1;");

    assert_eq!(
        error.to_string(),
        "Operands must be two numbers or two strings.\n[line 1]"
    );
}

#[test]
fn arithmetic_requires_numbers() {
    let (_, error) = runtime_error("print 1 -\n\"b\";");
    assert_eq!(error.to_string(), "Operands must be numbers.\n[line 1]");

    let (_, error) = runtime_error("print true < 1;");
    assert_eq!(error.to_string(), "Operands must be numbers.\n[line 1]");

    let (_, error) = runtime_error("\n\nprint -\"a\";");
    assert_eq!(error.to_string(), "Operand must be a number.\n[line 3]");
}

#[test]
fn block_variables_are_invisible_afterwards() {
    let (_, error) = runtime_error("{ var x = 1; } print x;");

    assert!(matches!(error, RuntimeError::UndefinedVariable { .. }));
    assert_eq!(error.to_string(), "Undefined variable 'x'.\n[line 1]");
}

#[test]
fn for_loop_counts_and_scopes_its_variable() {
    assert_eq!(
        output_of("for (var i = 0; i < 3; i = i + 1) print i;"),
        "0\n1\n2\n"
    );

    let (output, error) = runtime_error("for (var i = 0; i < 3; i = i + 1) print i;\nprint i;");
    assert_eq!(output, "0\n1\n2\n");
    assert_eq!(error.token().unwrap().line, 2);
}

#[test]
fn while_loop() {
    assert_eq!(
        output_of("var i = 0; while (i < 3) i = i + 1; print i;"),
        "3\n"
    );
}

#[test]
fn assigning_an_undeclared_name_fails_without_defining_it() {
    let mut lox = Lox::with_output(Vec::new());

    let error = lox.run("y = 5;").unwrap_err();
    assert!(matches!(
        error,
        LoxError::Runtime(RuntimeError::UndefinedVariable { .. })
    ));
    assert_eq!(error.exit_code(), 70);

    assert!(lox.run("print y;").is_err());
}

#[test]
fn uninitialized_variables_are_nil() {
    assert_eq!(output_of("var a; print a;"), "nil\n");
}

#[test]
fn redeclaring_in_the_same_scope_overwrites() {
    assert_eq!(output_of("var a = 1; var a = a + 1; print a;"), "2\n");
}

#[test]
fn assignment_reaches_the_nearest_enclosing_binding() {
    let source = "var a = 1; { a = 2; var a = 3; print a; a = 4; } print a;";

    assert_eq!(output_of(source), "3\n2\n");
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(output_of("var a; var b; a = b = 3; print a; print b;"), "3\n3\n");
    assert_eq!(output_of("var a; print a = \"x\";"), "x\n");
}

#[test]
fn failure_inside_a_block_restores_the_outer_scope() {
    let mut lox = Lox::with_output(Vec::new());

    assert!(lox
        .run("var a = \"outer\"; { var a = \"inner\"; { print missing; } }")
        .is_err());
    lox.run("print a;").unwrap();

    assert_eq!(String::from_utf8(lox.into_output()).unwrap(), "outer\n");
}

#[test]
fn runtime_error_aborts_the_rest_of_the_program() {
    let (output, _) = runtime_error("print 1; print nope; print 2;");

    assert_eq!(output, "1\n");
}

#[test]
fn globals_persist_between_runs() {
    let mut lox = Lox::with_output(Vec::new());
    lox.run("var greeting = \"hi\";").unwrap();
    lox.run("print greeting;").unwrap();

    assert_eq!(lox.interpreter().output().as_slice(), b"hi\n");
}

#[test]
fn ternary_evaluates_one_branch() {
    assert_eq!(
        output_of("var a = 0; print a == 0 ? \"zero\" : \"other\"; true ? a = 1 : (a = 2); print a;"),
        "zero\n1\n"
    );
    assert_eq!(evaluate("false ? 1 : true ? 2 : 3"), RuntimeValue::Number(2.0));
}

#[test]
fn comma_yields_its_right_operand() {
    assert_eq!(
        output_of("var a = 1; print (a + 1, a + 2); print 1, \"last\";"),
        "3\nlast\n"
    );
}

#[test]
fn scan_and_parse_failures_never_run_anything() {
    let (output, result) = run("print 1;\nprint @;");
    assert_eq!(output, "");
    assert_eq!(result.unwrap_err().exit_code(), 65);

    let (output, result) = run("print 1;\nprint ;");
    assert_eq!(output, "");
    assert_eq!(result.unwrap_err().exit_code(), 65);
}

#[test]
fn value_rendering() {
    assert_eq!(RuntimeValue::Number(3.0).to_string(), "3");
    assert_eq!(RuntimeValue::Number(0.5).to_string(), "0.5");
    assert_eq!(RuntimeValue::Nil.to_string(), "nil");
    assert_eq!(RuntimeValue::Bool(false).to_string(), "false");
    assert_eq!(RuntimeValue::String("text".into()).to_string(), "text");
}

#[test]
fn logical_expression_rejects_other_operators() {
    let expr = Expr::Logical(Box::new(LogicalExpr {
        left: Expr::literal(LiteralValue::Bool(false)),
        operator: Token::new(TokenType::Plus, "+", 1),
        right: Expr::literal(LiteralValue::Bool(true)),
    }));

    let error = Interpreter::with_output(Vec::new())
        .evaluate(&expr)
        .unwrap_err();

    assert_eq!(error.to_string(), "Unknown logical operator.\n[line 1]");
}

#[test]
fn prompt_is_written_to_the_output_sink() {
    let mut lox = Lox::with_output(Vec::new());
    lox.run_prompt(Cursor::new("var a = 1;\nprint a;\n")).unwrap();

    let output = String::from_utf8(lox.into_output()).unwrap();
    assert_eq!(output, "> > 1\n> \n");
}
