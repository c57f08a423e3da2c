use reckon_core::expr::{self, Engine, Error, Function, FunctionSet, SymbolTable, error};
use tracing_test::traced_test;

struct MyFunctions;
impl MyFunctions {
    fn times_five(a: f64) -> f64 {
        5.0 * a
    }

    fn add(a: f64, b: f64) -> f64 {
        a + b
    }
}

impl FunctionSet for MyFunctions {
    fn functions() -> Vec<(&'static str, Function)> {
        vec![
            ("Good_Func_1", Function::new(Self::times_five)),
            ("Good_Func_2", Function::new(Self::add)),
        ]
    }
}

#[test]
fn evaluate_is_repeatable() {
    let engine = Engine::new();
    for src in ["1 + 2 - 3 * 4 / 5", "2^3^2", "-(2 + 3)!", "1.5e-3 * 2"] {
        let first = engine.evaluate(src).unwrap();
        assert_eq!(engine.evaluate(src).unwrap(), first);
        assert_eq!(expr::eval(src).unwrap(), first);
    }
}

#[test]
fn exponent_precedence() {
    assert_eq!(expr::eval("2^3^2").unwrap(), 512.0);
    assert_eq!(expr::eval("2^(3^2)").unwrap(), 512.0);
    assert_eq!(expr::eval("2^3!^2").unwrap(), 68719476736.0);
    assert_eq!(expr::eval("(2^3!)^2").unwrap(), 4096.0);
}

#[test]
fn unary_minus_scope() {
    assert_eq!(expr::eval("-5!").unwrap(), -120.0);
    assert_eq!(expr::eval("-(2+3)!").unwrap(), -120.0);
    assert_eq!(expr::eval("3 - -2").unwrap(), 5.0);
    assert_eq!(expr::eval("-2^2").unwrap(), -4.0);
}

#[test]
#[traced_test]
fn implicit_multiplication() {
    let mut engine = Engine::new();
    assert_eq!(engine.evaluate_with("2x", [("x", 5)]).unwrap(), 10.0);
    assert_eq!(
        engine.evaluate_with("2x + y", [("x", 5), ("y", 10)]).unwrap(),
        20.0
    );
    assert_eq!(engine.evaluate("x + y").unwrap(), 15.0);
    assert_eq!(engine.evaluate("2x(1 + 2)").unwrap(), 30.0);
    assert_eq!(engine.evaluate("(x)(y)").unwrap(), 50.0);
}

#[test]
#[traced_test]
fn function_dispatch() {
    let mut engine = Engine::new();
    engine.register_set::<MyFunctions>().unwrap();
    assert_eq!(engine.evaluate("Good_Func_1( 5 )").unwrap(), 25.0);
    assert_eq!(engine.evaluate("Good_Func_2( 5, 5 )").unwrap(), 10.0);
    assert_eq!(engine.evaluate("good_func_2(good_func_1(1), 1)").unwrap(), 6.0);

    engine
        .register_functions([
            ("f", Function::new(|a: f64| 5.0 * a)),
            ("g", Function::new(|a: f64, b: f64| a + b)),
        ])
        .unwrap();
    assert_eq!(engine.evaluate("f(5)").unwrap(), 25.0);
    assert_eq!(engine.evaluate("g(5,5)").unwrap(), 10.0);
}

#[test]
fn variables_update_between_evaluations() {
    let mut engine = Engine::new();
    engine.bind_variable("rate", 2).unwrap();
    assert_eq!(engine.evaluate("3 RATE").unwrap(), 6.0);

    engine.bind_variable("Rate", 0.5).unwrap();
    assert_eq!(engine.evaluate("3 rate").unwrap(), 1.5);
    assert_eq!(engine.symbols().len(), 1);
}

#[test]
fn malformed_input() {
    let engine = Engine::new();
    let err = engine.evaluate("1 +").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(expr::WithSpan {
            value: error::Parse::MissingOperand { .. },
            ..
        })
    ));

    let err = engine.evaluate("1 2e").unwrap_err();
    assert!(matches!(
        err,
        Error::Tokenize(expr::WithSpan {
            value: error::Tokenize::MalformedNumber { .. },
            ..
        })
    ));

    let err = engine.evaluate("(1 + 2)) * 3").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(expr::WithSpan {
            value: error::Parse::TrailingInput { .. },
            ..
        })
    ));
}

#[test]
fn negative_factorial() {
    let err = expr::eval("(-5)!").unwrap_err();
    assert_eq!(
        err,
        Error::Eval(error::Eval::NegativeFactorial { value: -5.0 })
    );
}

#[test]
fn parse_then_evaluate_separately() {
    let mut symbols = SymbolTable::new();
    symbols.bind_variable("x", 3).unwrap();
    let ast = expr::parse("x!", &symbols).unwrap();
    assert_eq!(expr::eval_ast(&ast, &symbols), Ok(6.0));

    symbols.bind_variable("x", 4).unwrap();
    assert_eq!(expr::eval_ast(&ast, &symbols), Ok(24.0));

    symbols.bind_variable("x", -1).unwrap();
    assert_eq!(
        expr::eval_ast(&ast, &symbols),
        Err(error::Eval::NegativeFactorial { value: -1.0 })
    );
}

#[test]
fn custom_context() {
    struct Constants(expr::Entry);
    impl expr::Context for Constants {
        fn lookup(&self, name: &str) -> Option<&expr::Entry> {
            name.eq_ignore_ascii_case("tau").then_some(&self.0)
        }
    }

    let ctx = Constants(expr::Entry::Variable(std::f64::consts::TAU));
    let ast = expr::parse("tau / 2", &ctx).unwrap();
    assert_eq!(expr::eval_ast(&ast, &ctx), Ok(std::f64::consts::PI));
}
