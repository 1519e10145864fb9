use monkey_interpreter::ast::Statement;
use monkey_interpreter::lexer::Lexer;
use monkey_interpreter::object::object::{Object, FALSE, NULL, TRUE};
use monkey_interpreter::parser::{Parser, MAX_NESTING_DEPTH};
use monkey_interpreter::token::{Token, TokenKind};
use monkey_interpreter::{parse, run, Error, EvalError, ParseError, Session};

const PROGRAMS: &[&str] = &[
    "1 + 2 * 3",
    "if (1 < 2) { 10 } else { 20 }",
    "if (2 < 1) { 10 } else { 20 }",
    "if (false) { 10 }",
    "!true; -5; 3 >= 2",
    "(1 + 2) * -(3 - 4) / 2",
    "1 <= 2 == 3 >= 4",
    "return 5; 10",
    "variable a = 5; variable b = a * 2; if (b > a) { b - a } else { a - b }",
    "variable add = function(x, y) { x + y }; add(1, add(2, 3))",
    "function(x) { x }(5)",
    "variable f = function(n) { if (n < 2) { return n; } f(n - 1) + f(n - 2) }; f(10)",
    "variable adder = function(x) { function(y) { x + y } }; adder(3)(4)",
    "variable x = 1; variable y = x == 1; !y",
    "1 == true",
];

fn assert_success(src: &str) -> Option<Object> {
    match run(src) {
        Ok(value) => value,
        Err(e) => panic!("program failed:\n{}\nError: {}", src, e),
    }
}

#[test]
fn let_statement_tokens() {
    let mut lexer = Lexer::new("variable x = 10;");
    let expected = vec![
        Token::new(TokenKind::Let, "variable"),
        Token::new(TokenKind::Ident, "x"),
        Token::new(TokenKind::Assign, "="),
        Token::new(TokenKind::Int, "10"),
        Token::new(TokenKind::Semicolon, ";"),
        Token::new(TokenKind::Eof, ""),
        Token::new(TokenKind::Eof, ""),
    ];

    for token in expected {
        assert_eq!(lexer.next_token(), token);
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let program = parse("1 + 2 * 3").unwrap();

    assert_eq!(program.to_string(), "(1 + (2 * 3))");
    assert_eq!(assert_success("1 + 2 * 3"), Some(Object::Integer(7)));
}

#[test]
fn conditionals_pick_a_branch() {
    assert_eq!(
        assert_success("if (1 < 2) { 10 } else { 20 }"),
        Some(Object::Integer(10))
    );
    assert_eq!(
        assert_success("if (2 < 1) { 10 } else { 20 }"),
        Some(Object::Integer(20))
    );
    assert_eq!(assert_success("if (2 < 1) { 10 }"), Some(NULL));
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(
        run("10 / 0"),
        Err(Error::Eval(EvalError::DivisionByZero(10)))
    );
}

#[test]
fn less_equal_and_greater_equal_are_infix_operators() {
    assert_eq!(
        parse("a <= b >= c").unwrap().to_string(),
        "((a <= b) >= c)"
    );
    assert_eq!(assert_success("3 <= 3"), Some(TRUE));
    assert_eq!(assert_success("3 >= 4"), Some(FALSE));
    assert_eq!(assert_success("1 + 1 <= 2 * 1"), Some(TRUE));
}

#[test]
fn rendering_round_trips_through_the_parser() {
    for src in PROGRAMS {
        let expected = assert_success(src);
        let rendered = parse(src).unwrap().to_string();

        let reparsed = parse(&rendered)
            .unwrap_or_else(|e| panic!("rendering {:?} of {:?} does not parse: {}", rendered, src, e));
        assert_eq!(reparsed.to_string(), rendered, "rendering of {:?}", src);
        assert_eq!(run(&rendered), Ok(expected), "evaluating {:?}", rendered);
    }
}

#[test]
fn missing_prefix_rule_keeps_parsing() {
    let mut parser = Parser::new(Lexer::new(", variable x = 1; x + 1; return x"));
    let program = parser.parse_program();

    assert_eq!(
        parser.errors().to_vec(),
        vec![ParseError::NoPrefixRule(TokenKind::Comma)]
    );
    assert_eq!(program.statements.len(), 4);
    assert_eq!(program.statements[0], Statement::ExpressionStmt(None));
    assert_eq!(program.to_string(), "; variable x = 1; (x + 1); return x;");
}

#[test]
fn parse_errors_stop_evaluation() {
    assert_eq!(
        run("variable = 1; 2"),
        Err(Error::Parse(vec![
            ParseError::UnexpectedToken {
                expected: TokenKind::Ident,
                found: TokenKind::Assign,
            },
            ParseError::NoPrefixRule(TokenKind::Assign),
        ]))
    );
}

#[test]
fn deep_nesting_fails_predictably() {
    let src = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(
        run(&src),
        Err(Error::Parse(vec![ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        }]))
    );

    let src = format!("{}1", "-".repeat(100_000));
    assert!(matches!(run(&src), Err(Error::Parse(_))));

    let src = format!("{}1", "1 + ".repeat(50_000));
    assert_eq!(
        run(&src),
        Err(Error::Parse(vec![ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        }]))
    );

    let src = format!("variable f = function() {{ f }}; f{}", "()".repeat(100_000));
    assert_eq!(
        run(&src),
        Err(Error::Parse(vec![ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        }]))
    );

    let mut parser = Parser::new(Lexer::new(&format!("{}1; 7", "2 * ".repeat(10_000))));
    let program = parser.parse_program();
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.to_string(), "; 7");

    assert!(matches!(
        run("variable loop = function(n) { loop(n + 1) }; loop(0)"),
        Err(Error::Eval(EvalError::RecursionLimit(_)))
    ));
}

#[test]
fn session_keeps_bindings_until_reset() {
    let mut session = Session::new();

    assert_eq!(session.eval("variable x = 2;"), Ok(None));
    assert_eq!(
        session.eval("variable square = function(n) { n * n };"),
        Ok(None)
    );
    assert_eq!(session.eval("square(x) + 1"), Ok(Some(Object::Integer(5))));
    assert_eq!(
        session.eval("x / 0"),
        Err(Error::Eval(EvalError::DivisionByZero(2)))
    );
    assert_eq!(session.eval("x"), Ok(Some(Object::Integer(2))));

    session.reset();
    assert_eq!(
        session.eval("x"),
        Err(Error::Eval(EvalError::UnboundIdentifier(String::from("x"))))
    );
}

#[test]
fn values_render_for_display() {
    let tests = vec![
        ("5 * -2", "-10"),
        ("1 < 2", "true"),
        ("if (false) { 1 }", "null"),
        ("function(a, b) { a + b }", "function(a, b) { (a + b) }"),
    ];

    for (src, expected) in tests {
        match assert_success(src) {
            Some(value) => assert_eq!(value.to_string(), expected),
            None => panic!("{:?} produced no value", src),
        }
    }
}
