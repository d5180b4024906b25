use tree_lox::{
    ast::{BinaryExpr, Expr, GroupingExpr, UnaryExpr},
    parse,
    parser::Parser,
    printer::{to_source, AstPrinter},
    token::{LiteralValue, Token, TokenType},
    tokenize,
};

fn parse_expression(source: &str) -> Expr {
    Parser::new(tokenize(source).unwrap())
        .parse_expression()
        .unwrap()
}

#[test]
fn prints_hand_built_tree_in_prefix_form() {
    let expr = Expr::Binary(Box::new(BinaryExpr {
        left: Expr::Unary(Box::new(UnaryExpr {
            operator: Token::new(TokenType::Minus, "-", 1),
            expression: Expr::literal(LiteralValue::Number(123.0)),
        })),
        operator: Token::new(TokenType::Star, "*", 1),
        right: Expr::Grouping(Box::new(GroupingExpr {
            expression: Expr::literal(LiteralValue::Number(45.67)),
        })),
    }));

    assert_eq!(AstPrinter.print_expr(&expr), "(* (- 123) (group 45.67))");
}

#[test]
fn prints_every_expression_kind() {
    let cases = [
        ("\"hello\"", "hello"),
        ("nil", "nil"),
        ("!true", "(! true)"),
        ("a or b and c", "(or a (and b c))"),
        ("x = 1, 2", "(= x (, 1 2))"),
        ("c ? 1 : 2", "(?: c 1 2)"),
        ("1 <= 2 == true", "(== (<= 1 2) true)"),
    ];

    for (source, expected) in cases {
        assert_eq!(AstPrinter.print_expr(&parse_expression(source)), expected);
    }
}

#[test]
fn prints_statements() {
    let statements =
        parse("var a = 1; var b; if (a) print a; else { a = 2; } while (a < 3) a = a + 1;")
            .unwrap();
    let printed: Vec<String> = statements
        .iter()
        .map(|statement| AstPrinter.print_stmt(statement))
        .collect();

    assert_eq!(
        printed,
        vec![
            "(var a 1)",
            "(var b)",
            "(if a (print a) (block (; (= a 2))))",
            "(while (< a 3) (; (= a (+ a 1))))",
        ]
    );
}

#[test]
fn source_printer_round_trips() {
    let sources = [
        "1 + 2 * 3",
        "(1 + 2) * 3",
        "-(-x) - --y",
        "!!(a == b) != c",
        "\"str\" + \"ing\"",
        "a = b = c or d and !e",
        "1, 2, (3, 4)",
        "a ? b ? 1 : 2 : c = 4",
        "0.125 / 1000000 >= 12.5",
        "nil == false",
    ];

    for source in sources {
        let original = parse_expression(source);
        let printed = to_source(&original);
        let reparsed = parse_expression(&printed);

        assert_eq!(reparsed, original, "{} printed as {}", source, printed);
        assert_eq!(to_source(&reparsed), printed);
    }
}
