//! Static types computed by the checker.

use std::fmt;
use std::rc::Rc;

use super::error::TypeError;

type InferFn = dyn Fn(Vec<Type>) -> Result<Type, TypeError>;

/// A static type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Placeholder for "no element seen" / unresolved.
    Nothing,
    Int,
    Real,
    Seq(Box<Type>),
    Lambda(LambdaType),
}

impl Type {
    pub fn seq(elem: Type) -> Self {
        Type::Seq(Box::new(elem))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Real)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Nothing => f.write_str("Nothing"),
            Type::Int => f.write_str("Int"),
            Type::Real => f.write_str("Real"),
            Type::Seq(elem) => write!(f, "Seq<{elem}>"),
            Type::Lambda(_) => f.write_str("Lambda"),
        }
    }
}

/// The type of a lambda whose body has not been checked yet.
///
/// Lambdas are checked when applied, against the argument types of that
/// particular application, mirroring evaluation which also runs the body only
/// on call.  Two lambda types are equal when their arities match.
#[derive(Clone)]
pub struct LambdaType {
    arity: usize,
    infer: Option<Rc<InferFn>>,
}

impl LambdaType {
    pub fn new<F>(arity: usize, infer: F) -> Self
    where
        F: Fn(Vec<Type>) -> Result<Type, TypeError> + 'static,
    {
        LambdaType {
            arity,
            infer: Some(Rc::new(infer)),
        }
    }

    /// Type of a lambda known only by arity, e.g. one read off a runtime value.
    /// Applying it infers [`Type::Nothing`].
    pub fn opaque(arity: usize) -> Self {
        LambdaType { arity, infer: None }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Check the body against `args` and return its type.
    pub fn apply(&self, args: Vec<Type>) -> Result<Type, TypeError> {
        match &self.infer {
            Some(infer) => infer(args),
            None => Ok(Type::Nothing),
        }
    }
}

impl PartialEq for LambdaType {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity
    }
}

impl fmt::Debug for LambdaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LambdaType/{}", self.arity)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
