//! The operator and function tables shared by the checker and the evaluator.

use std::sync::Arc;

use super::builtins::Functions;
use super::ops::Operators;

/// Everything a program can call.  Built once and shared behind an [`Arc`]
/// so both phases dispatch through the same implementations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub operators: Operators,
    pub functions: Functions,
}

impl Registry {
    pub fn new(operators: Operators, functions: Functions) -> Self {
        Registry {
            operators,
            functions,
        }
    }

    /// `+ - * / ^` and `map`/`reduce`.
    pub fn standard() -> Arc<Self> {
        Arc::new(Registry::new(Operators::standard(), Functions::standard()))
    }
}
