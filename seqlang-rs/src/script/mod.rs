//! The seqlang language pipeline.
//!
//! Source text flows through [`lexer`] → [`expr`]/[`stmt`] (grammar, with the
//! [`priority`] table folding binary operators) → [`checker`] → [`eval`], and
//! every side effect lands on an [`Output`] sink.  The [`Interpreter`] wires
//! the phases together into a persistent session.
//!
//! The language itself is small:
//!
//! - `var name = expr`, `out expr`, `print "text"`
//! - `+ - * /` over Int and Real (mixed operands promote to Real), `^` always Real
//! - `{a, b}` inclusive Int ranges
//! - `map(seq, x -> ...)` and `reduce(seq, init, acc x -> ...)` with closures
//!
//! # Quick start
//!
//! ```rust
//! use seqlang::script::{CollectOutput, Interpreter};
//!
//! let mut interp = Interpreter::new(CollectOutput::new());
//! interp
//!     .run_source("var n = 4\nout reduce({1, n}, 1, acc x -> acc * x)")
//!     .unwrap();
//! assert_eq!(interp.output().lines, vec!["24"]);
//! ```

pub mod ast;
pub mod builtins;
pub mod checker;
pub mod error;
pub mod eval;
pub mod expr;
pub mod interp;
pub mod lexer;
pub mod ops;
pub mod output;
pub mod priority;
pub mod registry;
pub mod stmt;
pub mod types;
pub mod value;

// Re-exports for convenience.
pub use ast::{Expr, Program, Stmt};
pub use error::Error;
pub use expr::parse_expr;
pub use interp::Interpreter;
pub use output::{CollectOutput, Output, StdOutput};
pub use priority::OperatorsPriority;
pub use registry::Registry;
pub use stmt::{parse_program, parse_program_with};
pub use types::Type;
pub use value::Value;
