//! Built-in functions.
//!
//! Each function carries a type rule and an implementation.  Both validate
//! the argument count and the kind of every argument before doing any work,
//! and report the offending argument by its 1-based position.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{Error, TypeError};
use super::types::{LambdaType, Type};
use super::value::{Lambda, Value};

/// A typed built-in function.
pub trait Function: Send + Sync {
    fn name(&self) -> &'static str;

    /// Static rule over the argument types.
    fn result_type(&self, args: Vec<Type>) -> Result<Type, TypeError>;

    /// Invoke on already-evaluated arguments.
    fn call(&self, args: Vec<Value>) -> Result<Value, Error>;
}

// ── Argument helpers ──────────────────────────────────────────────────────────

fn check_count<T>(name: &'static str, args: &[T], expected: usize) -> Result<(), TypeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(TypeError::ArgCount {
            name,
            expected,
            found: args.len(),
        })
    }
}

fn seq_type(args: &[Type], index: usize) -> Result<Type, TypeError> {
    match &args[index - 1] {
        Type::Seq(elem) => Ok((**elem).clone()),
        other => Err(TypeError::ExpectedSequence {
            index,
            found: other.clone(),
        }),
    }
}

fn lambda_type(args: &[Type], index: usize, arity: usize) -> Result<&LambdaType, TypeError> {
    match &args[index - 1] {
        Type::Lambda(l) if l.arity() == arity => Ok(l),
        Type::Lambda(l) => Err(TypeError::LambdaArity {
            index,
            expected: arity,
            found: l.arity(),
        }),
        other => Err(TypeError::ExpectedLambda {
            index,
            found: other.clone(),
        }),
    }
}

fn seq_value(args: &[Value], index: usize) -> Result<&[Value], TypeError> {
    args[index - 1].as_seq().ok_or_else(|| TypeError::ExpectedSequence {
        index,
        found: args[index - 1].type_of(),
    })
}

fn lambda_value(args: &[Value], index: usize, arity: usize) -> Result<&Lambda, TypeError> {
    match &args[index - 1] {
        Value::Lambda(l) if l.arity() == arity => Ok(l),
        Value::Lambda(l) => Err(TypeError::LambdaArity {
            index,
            expected: arity,
            found: l.arity(),
        }),
        other => Err(TypeError::ExpectedLambda {
            index,
            found: other.type_of(),
        }),
    }
}

// ── map ───────────────────────────────────────────────────────────────────────

/// `map(seq, x -> f(x))`: applies the lambda to every element, in order.
pub struct Map;

impl Function for Map {
    fn name(&self) -> &'static str {
        "map"
    }

    fn result_type(&self, args: Vec<Type>) -> Result<Type, TypeError> {
        check_count(self.name(), &args, 2)?;
        let elem = seq_type(&args, 1)?;
        let f = lambda_type(&args, 2, 1)?;
        Ok(Type::seq(f.apply(vec![elem])?))
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        check_count(self.name(), &args, 2)?;
        let elements = seq_value(&args, 1)?;
        let f = lambda_value(&args, 2, 1)?;

        let mapped = elements
            .iter()
            .map(|v| f.call(vec![v.clone()]))
            .collect::<Result<Vec<_>, _>>()?;
        let elem = mapped.first().map_or(Type::Nothing, Value::type_of);
        Ok(Value::seq(mapped, elem))
    }
}

// ── reduce ────────────────────────────────────────────────────────────────────

/// `reduce(seq, initial, acc x -> f(acc, x))`: left fold from `initial`.
pub struct Reduce;

impl Function for Reduce {
    fn name(&self) -> &'static str {
        "reduce"
    }

    fn result_type(&self, args: Vec<Type>) -> Result<Type, TypeError> {
        check_count(self.name(), &args, 3)?;
        let elem = seq_type(&args, 1)?;
        if matches!(args[1], Type::Lambda(_)) {
            return Err(TypeError::LambdaInitial { index: 2 });
        }
        let f = lambda_type(&args, 3, 2)?;
        let initial = args[1].clone();
        let result = f.apply(vec![initial.clone(), elem])?;
        if result != initial {
            return Err(TypeError::ReduceResult {
                expected: initial,
                found: result,
            });
        }
        Ok(initial)
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        check_count(self.name(), &args, 3)?;
        let elements = seq_value(&args, 1)?;
        if matches!(args[1], Value::Lambda(_)) {
            return Err(TypeError::LambdaInitial { index: 2 }.into());
        }
        let f = lambda_value(&args, 3, 2)?;

        elements
            .iter()
            .try_fold(args[1].clone(), |acc, v| f.call(vec![acc, v.clone()]))
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Function name → implementation.
#[derive(Clone, Default)]
pub struct Functions {
    table: HashMap<String, Arc<dyn Function>>,
}

impl Functions {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// `map` and `reduce`.
    pub fn standard() -> Self {
        Functions::new().with(Map).with(Reduce)
    }

    pub fn with(mut self, f: impl Function + 'static) -> Self {
        self.table.insert(f.name().to_owned(), Arc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Function> {
        self.table.get(name).map(|f| f.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Functions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Functions").field("names", &names).finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
