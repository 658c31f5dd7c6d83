//! seqlang: a small expression language with Int/Real arithmetic, inclusive
//! integer ranges, closures, `map` and `reduce`.
//!
//! The language lives in [`script`]; [`cli`] holds argument parsing for the
//! `seqlang` binary.

pub mod cli;
pub mod script;
