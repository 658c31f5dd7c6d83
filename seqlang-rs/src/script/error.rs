//! Error taxonomy for the language pipeline.
//!
//! Every phase fails fast with the first error it meets.  Errors are plain
//! values; the [`Interpreter`](super::interp::Interpreter) turns them into
//! `error()` lines on the output sink instead of propagating them to the host.

use thiserror::Error;

use super::ast::Pos;
use super::types::Type;

/// The tokenizer hit a character no rule accepts.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unexpected character {ch:?} at {pos}")]
pub struct LexError {
    pub ch: char,
    pub pos: Pos,
}

/// The grammar could not consume the remaining tokens.
///
/// `pos` is the furthest position any alternative reached before failing.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at {pos}: unexpected {found}, expected {}", .expected.join(" or "))]
pub struct ParseError {
    pub pos: Pos,
    pub found: String,
    pub expected: Vec<&'static str>,
}

/// Static (and dispatch-time) type errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("use of undeclared variable {name} at {pos}")]
    Undeclared { name: String, pos: Pos },

    #[error("variable {name} is already declared: at {pos}")]
    Redeclared { name: String, pos: Pos },

    #[error("invalid operator {op} at {pos}")]
    UnknownOperator { op: String, pos: Pos },

    #[error("wrong types, expected Int or Real, got ({left}, {right})")]
    OperandTypes { left: Type, right: Type },

    #[error("{source}\nfor {op} at {pos}")]
    AtOperator {
        op: String,
        pos: Pos,
        source: Box<TypeError>,
    },

    #[error("no such function: {name} at {pos}")]
    UnknownFunction { name: String, pos: Pos },

    #[error("function {name} expects {expected} arguments, got {found}")]
    ArgCount {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} should be a sequence, got {found}")]
    ExpectedSequence { index: usize, found: Type },

    #[error("argument {index} should be a lambda, got {found}")]
    ExpectedLambda { index: usize, found: Type },

    #[error("argument {index} should be a lambda of {expected} parameters, got {found}")]
    LambdaArity {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} should be an expression, not a lambda")]
    LambdaInitial { index: usize },

    #[error("reduction result {found}, but expected {expected}")]
    ReduceResult { expected: Type, found: Type },

    #[error("lambda parameter {name} declared twice at {pos}")]
    DuplicateParam { name: String, pos: Pos },

    #[error("\"{text}\" at {pos} isn't a valid {kind} value")]
    InvalidLiteral {
        text: String,
        kind: &'static str,
        pos: Pos,
    },

    #[error("expected Int range bound at {pos}, got {found}")]
    RangeBound { pos: Pos, found: Type },

    #[error("value of type {found} at {pos} can't be printed")]
    NotPrintable { found: Type, pos: Pos },

    #[error("{source}\nfor function {name} at {pos}")]
    InFunction {
        name: String,
        pos: Pos,
        source: Box<TypeError>,
    },
}

/// Failures that a checked program should never reach, plus arithmetic faults
/// that depend on concrete values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("variable {name} wasn't declared at {pos}")]
    Unbound { name: String, pos: Pos },

    #[error("variable {name} is already declared: at {pos}")]
    Redeclared { name: String, pos: Pos },

    #[error("expected Int in sequence at {pos}, got {found}")]
    RangeBound { pos: Pos, found: Type },

    #[error("sequence at {pos} has {len} elements, too many to allocate")]
    RangeTooLarge { pos: Pos, len: u128 },

    #[error("lambda can't be converted to output")]
    LambdaOutput,

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    #[error("{source}\nfor {op} at {pos}")]
    AtOperator {
        op: String,
        pos: Pos,
        source: Box<Error>,
    },

    #[error("{source}\nfor function {name} at {pos}")]
    InFunction {
        name: String,
        pos: Pos,
        source: Box<Error>,
    },
}

/// Any failure of the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Short phase label, used by hosts that group diagnostics.
    pub fn phase(&self) -> &'static str {
        match self {
            Error::Lex(_) => "lex",
            Error::Parse(_) => "parse",
            Error::Type(_) => "type",
            Error::Runtime(_) => "runtime",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
