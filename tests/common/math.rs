//! A five level arithmetic grammar built from operator tables.
//!
//! From tightest to loosest: postfix `!`, right associative `^`, prefix `-`,
//! left associative `*` `/`, left associative `+` `-`.

use braid::{choice, optional_whitespace, recursive, regexp, sequence, string, succeed, Parser};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    Negate(Box<Expr>),
    Factorial(Box<Expr>),
    Exponentiate(Box<Expr>, Box<Expr>),
    Multiply(Box<Expr>, Box<Expr>),
    Divide(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Subtract(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Negate,
    Factorial,
    Exponentiate,
    Multiply,
    Divide,
    Add,
    Subtract,
}

fn unary(op: Op, operand: Expr) -> Expr {
    let operand = Box::new(operand);
    match op {
        Op::Factorial => Expr::Factorial(operand),
        _ => Expr::Negate(operand),
    }
}

fn binary(op: Op, left: Expr, right: Expr) -> Expr {
    let (left, right) = (Box::new(left), Box::new(right));
    match op {
        Op::Exponentiate => Expr::Exponentiate(left, right),
        Op::Multiply => Expr::Multiply(left, right),
        Op::Divide => Expr::Divide(left, right),
        Op::Add => Expr::Add(left, right),
        _ => Expr::Subtract(left, right),
    }
}

fn operators(table: &[(&str, Op)]) -> Parser<Op> {
    choice(
        table
            .iter()
            .map(|&(symbol, op)| string(symbol).trim(optional_whitespace()).result(op)),
    )
}

fn prefix(ops: Parser<Op>, next: Parser<Expr>) -> Parser<Expr> {
    recursive(|this| {
        sequence((ops, this))
            .map(|(op, operand)| unary(op, operand))
            .or(next)
    })
}

fn postfix(ops: Parser<Op>, next: Parser<Expr>) -> Parser<Expr> {
    sequence((next, ops.many()))
        .map(|(operand, suffixes)| suffixes.into_iter().fold(operand, |acc, op| unary(op, acc)))
}

fn binary_right(ops: Parser<Op>, next: Parser<Expr>) -> Parser<Expr> {
    recursive(|this| {
        next.chain(move |left: Expr| {
            let rest = left.clone();
            sequence((ops.clone(), this.clone()))
                .map(move |(op, right)| binary(op, rest.clone(), right))
                .or(succeed(left))
        })
    })
}

fn binary_left(ops: Parser<Op>, next: Parser<Expr>) -> Parser<Expr> {
    sequence((next.clone(), sequence((ops, next)).many())).map(|(first, rest)| {
        rest.into_iter()
            .fold(first, |acc, (op, right)| binary(op, acc, right))
    })
}

/// Decimal integer literal, reported as `number` on failure.
pub fn number() -> Parser<Expr> {
    regexp("[0-9]+")
        .expect("literal pattern compiles")
        .map(|digits| Expr::Number(digits.parse().unwrap_or(i64::MAX)))
        .describe("number")
}

/// The whole grammar, surrounding whitespace included.
pub fn math() -> Parser<Expr> {
    recursive(|math| {
        let basic = string("(").then(math).skip(string(")")).or(number());
        let table = postfix(operators(&[("!", Op::Factorial)]), basic);
        let table = binary_right(operators(&[("^", Op::Exponentiate)]), table);
        let table = prefix(operators(&[("-", Op::Negate)]), table);
        let table = binary_left(
            operators(&[("*", Op::Multiply), ("/", Op::Divide)]),
            table,
        );
        let table = binary_left(operators(&[("+", Op::Add), ("-", Op::Subtract)]), table);
        table.trim(optional_whitespace())
    })
}

pub fn num(n: i64) -> Expr {
    Expr::Number(n)
}

pub fn add(l: Expr, r: Expr) -> Expr {
    Expr::Add(Box::new(l), Box::new(r))
}

pub fn sub(l: Expr, r: Expr) -> Expr {
    Expr::Subtract(Box::new(l), Box::new(r))
}

pub fn mul(l: Expr, r: Expr) -> Expr {
    Expr::Multiply(Box::new(l), Box::new(r))
}

pub fn div(l: Expr, r: Expr) -> Expr {
    Expr::Divide(Box::new(l), Box::new(r))
}

pub fn pow(l: Expr, r: Expr) -> Expr {
    Expr::Exponentiate(Box::new(l), Box::new(r))
}

pub fn neg(e: Expr) -> Expr {
    Expr::Negate(Box::new(e))
}

pub fn fact(e: Expr) -> Expr {
    Expr::Factorial(Box::new(e))
}
