use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::{Block, Identifier};

use super::environment::Environment;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    Function(Rc<Function>),
    // Reserved kinds; nothing in the evaluator produces them yet.
    Float(f64),
    String(String),
}

/// A function literal closed over the environment it was evaluated in.
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: Rc<Block>,
    pub env: Rc<RefCell<Environment>>,
}

// The captured environment usually holds the function itself, so it is left
// out to keep formatting finite.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Object {
    pub fn from_native_bool(value: bool) -> Self {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn obj_type(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Boolean(_) => "BOOLEAN",
            Self::Null => "NULL",
            Self::Function(_) => "FUNCTION",
            Self::Float(_) => "FLOAT",
            Self::String(_) => "STRING",
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Boolean(false))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(l), Self::Integer(r)) => l == r,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Null, Self::Null) => true,
            (Self::Function(l), Self::Function(r)) => Rc::ptr_eq(l, r),
            (Self::Float(l), Self::Float(r)) => l == r,
            (Self::String(l), Self::String(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Null => write!(f, "null"),
            Self::Function(function) => {
                write!(f, "function({}) {}", function.parameters.join(", "), function.body)
            }
            Self::Float(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function() -> Object {
        Object::Function(Rc::new(Function {
            parameters: vec![String::from("x")],
            body: Rc::new(Block::default()),
            env: Rc::new(RefCell::new(Environment::new())),
        }))
    }

    #[test]
    fn test_inspect() {
        let tests = vec![
            (Object::Integer(-3), "-3"),
            (TRUE, "true"),
            (FALSE, "false"),
            (NULL, "null"),
            (function(), "function(x) { }"),
            (Object::Float(1.5), "1.5"),
            (Object::String(String::from("hi")), "hi"),
        ];

        for (object, expected) in tests {
            assert_eq!(object.to_string(), expected);
        }
    }

    #[test]
    fn test_truthiness() {
        let tests = vec![
            (TRUE, true),
            (FALSE, false),
            (NULL, false),
            (Object::Integer(0), true),
            (Object::Integer(-1), true),
            (function(), true),
        ];

        for (object, expected) in tests {
            assert_eq!(object.is_truthy(), expected, "truthiness of {}", object);
        }
    }

    #[test]
    fn test_canonical_values_compare_by_tag() {
        assert_eq!(Object::from_native_bool(true), TRUE);
        assert_eq!(Object::from_native_bool(false), FALSE);
        assert_ne!(TRUE, FALSE);
        assert_ne!(NULL, FALSE);
        assert_ne!(Object::Integer(1), TRUE);
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = function();
        let g = function();

        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }
}
