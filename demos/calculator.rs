//! Calculator Example - Precedence by Layered Delimited Lists
//!
//! Each precedence level is a `delimited` list whose head seeds a left fold,
//! so `1 - 2 - 3` evaluates as `(1 - 2) - 3` without any left recursion.
//! Parenthesized sub-expressions close the loop through a `Forward`
//! declaration, and the primary rule is memoized so backtracking over a
//! failed alternative never re-derives it.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := '-' factor | primary
//! primary := '(' expr ')' | number
//! ```
//!
//! Run with: cargo run --example calculator -- "2 * (3 + 4)" "10 / 4 - 1"

use parsekit::prelude::*;
use parsekit::text::{decimal, is, one_of, spaces};
use std::rc::Rc;

type Calc = BoxedParser<'static, char, f64>;

/// Wrap a parser so it also skips trailing whitespace
fn token<P>(parser: P) -> impl Parser<char, Output = P::Output> + Clone
where
    P: Parser<char> + Clone,
{
    parser.discard_right(spaces())
}

fn apply(lhs: f64, (op, rhs): (char, f64)) -> f64 {
    match op {
        '+' => lhs + rhs,
        '-' => lhs - rhs,
        '*' => lhs * rhs,
        _ => lhs / rhs,
    }
}

/// One precedence level: `operand (op operand)*`, folded left to right
fn level(operand: Calc, operators: &str) -> Calc {
    operand
        .delimited(
            token(one_of(operators)),
            |op, rhs| (op, rhs),
            |head| Aggregate::new(head, apply),
        )
        .boxed()
}

fn build_calculator() -> (Forward<'static, char, f64>, Rc<Packrat<Calc, f64>>) {
    let expr: Forward<'static, char, f64> = Forward::new();

    let primary = token(is('('))
        .discard_left(expr.clone())
        .discard_right(token(is(')')))
        .or(token(decimal()))
        .boxed();
    let primary = Rc::new(primary.packrat());

    let factor = recursive({
        let primary = Rc::clone(&primary);
        move |factor| {
            token(is('-'))
                .discard_left(factor)
                .map(|value: f64| -value)
                .or(Rc::clone(&primary))
        }
    })
    .boxed();

    let term = level(factor, "*/");
    let sum = level(term, "+-");

    expr.define(sum.traced("expr"))
        .expect("fresh forward declaration");
    (expr, primary)
}

fn main() {
    let inputs: Vec<String> = std::env::args().skip(1).collect();
    let inputs = if inputs.is_empty() {
        vec![
            "1 + 2 * 3".to_string(),
            "(1 + 2) * 3".to_string(),
            "10 - 4 - 3".to_string(),
            "-(2.5 * 4) / 5".to_string(),
            "1e3 / (2 + 3) - -1".to_string(),
            "2 * (3 + ".to_string(),
        ]
    } else {
        inputs
    };

    let (calculator, primary) = build_calculator();
    let whole = spaces().discard_left(&calculator);

    for input in &inputs {
        primary.clear();
        let source: Vec<char> = input.chars().collect();
        match whole.parse_complete(&source) {
            Some(value) => println!("{:<24} = {}", input, value),
            None => println!("{:<24} : syntax error", input),
        }
        println!("{:<24}   primary cache: {}", "", primary.stats());
    }
}
