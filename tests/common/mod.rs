//! # Example grammars
//!
//! Small consumers of the public API shared by the integration tests: a
//! bracketed list of signed decimals, a four-operation calculator and a JSON
//! parser.

#![allow(dead_code)]

use ravel::{Folded, Lexer, ParseOptions, Parser, PathSegment, Reduction, Reject, Transformer};
use serde_json::{json, Value};

// ============================================================================
// NUMBER LISTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Num {
    LBracket,
    RBracket,
    Comma,
    Number,
    Word,
    Space,
}

pub fn number_list_lexer() -> Lexer<Num> {
    Lexer::builder()
        .token(Num::LBracket, r"\[")
        .token(Num::RBracket, r"\]")
        .token(Num::Comma, ",")
        .token(Num::Number, r"-?\d+(?:\.\d+)?")
        .token(Num::Word, r"[A-Za-z]+")
        .skip(Num::Space, r"\s+")
        .build()
        .expect("number list lexer builds")
}

/// `[` signed decimals separated by commas `]`, possibly empty.
pub fn number_list_parser() -> Parser<Num, Vec<f64>> {
    Parser::new(number_list_lexer(), |g| {
        let number = g
            .from_tokens([Num::Number], |run| run[0].value.parse::<f64>().map_err(Reject::new))
            .named("number");
        g.rule(
            |_| {
                (
                    g.token(Num::LBracket),
                    g.optional(g.list(number, Num::Comma)),
                    g.token(Num::RBracket),
                )
            },
            |(_, items, _)| Ok(items.unwrap_or_default()),
        )
    })
}

// ============================================================================
// CALCULATOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calc {
    Plus,
    Minus,
    Multiply,
    Divide,
    Number,
    Space,
}

pub fn calc_lexer() -> Lexer<Calc> {
    Lexer::builder()
        .token(Calc::Plus, r"\+")
        .token(Calc::Minus, "-")
        .token(Calc::Multiply, r"\*")
        .token(Calc::Divide, "/")
        .token(Calc::Number, r"\d+(?:\.\d+)?")
        .skip(Calc::Space, r"\s+")
        .build()
        .expect("calculator lexer builds")
}

/// `number (operator expression | operator number)`: recursion sits on the
/// right, and the transform rotates the tree so that it reads left to right
/// with `*` and `/` binding tighter than `+` and `-`.
pub fn calc_parser() -> Parser<Calc, Value> {
    Parser::new(calc_lexer(), |g| {
        let number = g
            .from_tokens([Calc::Number], |run| Ok(Value::String(run[0].value.clone())))
            .named("number");
        let operator = g
            .or(|_| {
                [Calc::Plus, Calc::Minus, Calc::Multiply, Calc::Divide]
                    .into_iter()
                    .map(|kind| g.from_tokens([kind], |run| Ok(run[0].value.clone())))
                    .collect()
            })
            .named("operator");

        g.rule(
            |expression| {
                (
                    number.clone(),
                    operator,
                    g.or(|_| vec![expression.clone(), number]),
                )
            },
            |(left, op, right)| Ok(rebalance(left, &op, right)),
        )
        .named("expression")
    })
}

fn precedence(op: &str) -> u8 {
    match op {
        "*" | "/" => 2,
        _ => 1,
    }
}

fn rebalance(left: Value, op: &str, right: Value) -> Value {
    let inner_op = right.get("op").and_then(Value::as_str).map(str::to_owned);
    match inner_op {
        Some(inner_op) if precedence(op) >= precedence(&inner_op) => {
            let inner_left = right.get("left").cloned().unwrap_or(Value::Null);
            let inner_right = right.get("right").cloned().unwrap_or(Value::Null);
            json!({
                "op": inner_op,
                "left": rebalance(left, op, inner_left),
                "right": inner_right,
            })
        }
        _ => json!({ "op": op, "left": left, "right": right }),
    }
}

/// Reduces only operands: the root and anything under `left` or `right`.
pub fn evaluate(children: &Folded<Value>, node: &Value, path: &[PathSegment], _parent: Option<&Value>) -> Reduction<Value> {
    let is_operand = path
        .last()
        .map_or(true, |segment| matches!(segment.as_key(), Some("left" | "right")));
    if !is_operand {
        return Reduction::Keep;
    }

    match node {
        Value::String(text) => text
            .parse::<f64>()
            .map_or(Reduction::Keep, |number| Reduction::Replace(json!(number))),
        Value::Object(_) => {
            let op = children.get("op").and_then(Value::as_str);
            let left = children.get("left").and_then(Value::as_f64);
            let right = children.get("right").and_then(Value::as_f64);
            let (Some(op), Some(left), Some(right)) = (op, left, right) else {
                return Reduction::Keep;
            };
            let result = match op {
                "+" => left + right,
                "-" => left - right,
                "*" => left * right,
                "/" => left / right,
                _ => return Reduction::Keep,
            };
            Reduction::Replace(json!(result))
        }
        _ => Reduction::Keep,
    }
}

pub fn calculator() -> Transformer<Value, ravel::Error> {
    calc_parser().into_transformer(evaluate)
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Json {
    True,
    False,
    Null,
    LCurly,
    RCurly,
    LSquare,
    RSquare,
    Comma,
    Colon,
    String,
    Number,
    Space,
}

pub fn json_lexer() -> Lexer<Json> {
    Lexer::builder()
        .token(Json::True, "true")
        .token(Json::False, "false")
        .token(Json::Null, "null")
        .token(Json::LCurly, r"\{")
        .token(Json::RCurly, r"\}")
        .token(Json::LSquare, r"\[")
        .token(Json::RSquare, r"\]")
        .token(Json::Comma, ",")
        .token(Json::Colon, ":")
        .token(Json::String, r#""(?:[^\\"]|\\(?:[bfnrtv"\\/]|u[0-9a-fA-F]{4}))*""#)
        .token(Json::Number, r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?")
        .skip(Json::Space, r"\s+")
        .build()
        .expect("json lexer builds")
}

/// A JSON document whose root is an object or an array.
pub fn json_parser() -> Parser<Json, Value> {
    json_parser_with(ParseOptions::default())
}

pub fn json_parser_with(options: ParseOptions) -> Parser<Json, Value> {
    Parser::with_options(json_lexer(), options, |g| {
        let value = g.declare::<Value>();

        let string = g.from_tokens([Json::String], |run| {
            serde_json::from_str::<String>(&run[0].value).map_err(Reject::new)
        });

        let entry = g.rule(
            |_| (string.clone(), g.token(Json::Colon), value.rule()),
            |(key, _, value)| Ok((key, value)),
        );

        let object = g
            .rule(
                |_| {
                    (
                        g.token(Json::LCurly),
                        g.optional(g.list(entry, Json::Comma)),
                        g.token(Json::RCurly),
                    )
                },
                |(_, entries, _)| Ok(Value::Object(entries.unwrap_or_default().into_iter().collect())),
            )
            .named("object");

        let array = g
            .rule(
                |_| {
                    (
                        g.token(Json::LSquare),
                        g.optional(g.list(value.rule(), Json::Comma)),
                        g.token(Json::RSquare),
                    )
                },
                |(_, items, _)| Ok(Value::Array(items.unwrap_or_default())),
            )
            .named("array");

        let number = g.from_tokens([Json::Number], |run| {
            serde_json::from_str::<Value>(&run[0].value).map_err(Reject::new)
        });

        value.define(
            g.or(|_| {
                vec![
                    string.map(Value::String),
                    number,
                    g.from_tokens([Json::True], |_| Ok(Value::Bool(true))),
                    g.from_tokens([Json::False], |_| Ok(Value::Bool(false))),
                    g.from_tokens([Json::Null], |_| Ok(Value::Null)),
                    object.clone(),
                    array.clone(),
                ]
            })
            .named("value"),
        );

        g.or(|_| vec![object, array]).named("object or array")
    })
}
