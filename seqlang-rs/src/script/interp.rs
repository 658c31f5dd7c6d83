//! The interpreter session.
//!
//! An [`Interpreter`] owns the authoritative [`TypeChecker`], the
//! [`Evaluator`] and the output sink, and runs submissions against them:
//!
//! 1. parse the source (no partial program on failure);
//! 2. check the whole program on a copy of the checker, so a rejected
//!    submission produces no output and changes nothing;
//! 3. evaluate statement by statement, committing each one to the real
//!    checker once it has run, so checker and environment agree on what is
//!    declared even when a runtime failure cuts the submission short.
//!
//! Every failure is reported as an `error()` line on the sink as well as
//! returned to the caller.

use std::sync::Arc;

use super::ast::Program;
use super::checker::TypeChecker;
use super::error::Error;
use super::eval::Evaluator;
use super::output::Output;
use super::priority::OperatorsPriority;
use super::registry::Registry;
use super::stmt::parse_program_with;

pub struct Interpreter<O: Output> {
    checker: TypeChecker,
    evaluator: Evaluator,
    priority: OperatorsPriority,
    output: O,
}

impl<O: Output> Interpreter<O> {
    /// A session with the standard operators, functions and priorities.
    pub fn new(output: O) -> Self {
        Self::with_config(Registry::standard(), OperatorsPriority::default(), output)
    }

    pub fn with_config(registry: Arc<Registry>, priority: OperatorsPriority, output: O) -> Self {
        Interpreter {
            checker: TypeChecker::new(Arc::clone(&registry)),
            evaluator: Evaluator::new(registry),
            priority,
            output,
        }
    }

    // ── Phases ────────────────────────────────────────────────────────────────

    pub fn parse(&self, src: &str) -> Result<Program, Error> {
        parse_program_with(src, &self.priority)
    }

    /// Check `program` against the current declarations without recording
    /// anything.
    pub fn check(&self, program: &Program) -> Result<(), Error> {
        self.checker.copy().check_program(program)?;
        Ok(())
    }

    /// Check then evaluate `program`.
    pub fn run(&mut self, program: &Program) -> Result<(), Error> {
        let result = self.execute(program);
        if let Err(e) = &result {
            self.output.error(&e.to_string());
        }
        result
    }

    /// Parse, check and evaluate `src`.
    pub fn run_source(&mut self, src: &str) -> Result<(), Error> {
        match self.parse(src) {
            Ok(program) => self.run(&program),
            Err(e) => {
                self.output.error(&e.to_string());
                Err(e)
            }
        }
    }

    fn execute(&mut self, program: &Program) -> Result<(), Error> {
        self.check(program)?;
        for stmt in &program.statements {
            self.evaluator.run(stmt, &mut self.output)?;
            self.checker.check(stmt)?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn checker(&self) -> &TypeChecker {
        &self.checker
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
