//! Lexer, Pratt parser and tree-walking evaluator for a small
//! expression-oriented language with integers, booleans, `variable`
//! bindings, `if`/`else`, first-class functions and closures.
//!
//! ```
//! use monkey_interpreter::{object::object::Object, run};
//!
//! let value = run("variable double = function(x) { x * 2 }; double(21)").unwrap();
//! assert_eq!(value, Some(Object::Integer(42)));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use std::cell::RefCell;
use std::rc::Rc;

pub use crate::error::{Error, EvalError, ParseError};

use crate::ast::Program;
use crate::evaluator::eval::{Evaluator, MAX_EVAL_DEPTH};
use crate::lexer::Lexer;
use crate::object::environment::Environment;
use crate::object::object::Object;
use crate::parser::Parser;

/// Parses `source`, failing with every parser error if there were any.
pub fn parse(source: &str) -> Result<Program, Error> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(Error::Parse(parser.into_errors()))
    }
}

/// Runs `source` in a fresh environment.
pub fn run(source: &str) -> Result<Option<Object>, Error> {
    Session::new().eval(source)
}

/// An environment that outlives single evaluations, so bindings made by one
/// call to [`Session::eval`] are visible to the next.
pub struct Session {
    environment: Rc<RefCell<Environment>>,
    evaluator: Evaluator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_EVAL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        let environment = Rc::new(RefCell::new(Environment::new()));
        Self {
            evaluator: Evaluator::new_with_env(Rc::clone(&environment)).with_max_depth(max_depth),
            environment,
        }
    }

    pub fn eval(&mut self, source: &str) -> Result<Option<Object>, Error> {
        let program = parse(source)?;
        Ok(self.evaluator.eval_program(&program)?)
    }

    /// Drops every binding made so far. The session scope is emptied in
    /// place, which also frees closures bound at the top level.
    pub fn reset(&mut self) {
        self.environment.borrow_mut().clear();
    }
}
