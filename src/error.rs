use thiserror::Error;

use crate::token::TokenKind;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected next token to be {expected:?}, got {found:?} instead")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },

    #[error("no prefix parse function for {0:?} found")]
    NoPrefixRule(TokenKind),

    #[error("could not parse {0} as integer")]
    InvalidInteger(String),

    /// Counts both nested sub-expressions and operators chained onto the
    /// left. The statement it occurs in is dropped up to its closing `;`.
    #[error("expression nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    UnboundIdentifier(String),

    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: String,
        right: &'static str,
    },

    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: String,
        operand: &'static str,
    },

    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: String,
        right: &'static str,
    },

    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),

    #[error("integer overflow: {0}")]
    IntegerOverflow(String),

    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    #[error("wrong number of arguments: got {got}, want {want}")]
    WrongArgumentCount { got: usize, want: usize },

    #[error("cannot evaluate an expression that failed to parse")]
    MissingExpression,

    #[error("maximum evaluation depth of {0} exceeded")]
    RecursionLimit(usize),
}

/// Failure of a whole lex-parse-evaluate run.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("{} parser error(s): {}", .0.len(), join(.0))]
    Parse(Vec<ParseError>),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

fn join(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let tests = vec![
            (
                ParseError::UnexpectedToken {
                    expected: TokenKind::Rparen,
                    found: TokenKind::Eof,
                }
                .to_string(),
                "expected next token to be Rparen, got Eof instead",
            ),
            (
                ParseError::NoPrefixRule(TokenKind::Comma).to_string(),
                "no prefix parse function for Comma found",
            ),
            (
                EvalError::TypeMismatch {
                    left: "INTEGER",
                    operator: String::from("+"),
                    right: "BOOLEAN",
                }
                .to_string(),
                "type mismatch: INTEGER + BOOLEAN",
            ),
            (
                EvalError::UnknownPrefixOperator {
                    operator: String::from("-"),
                    operand: "BOOLEAN",
                }
                .to_string(),
                "unknown operator: -BOOLEAN",
            ),
            (
                Error::Parse(vec![
                    ParseError::NoPrefixRule(TokenKind::Comma),
                    ParseError::InvalidInteger(String::from("99999999999999999999")),
                ])
                .to_string(),
                "2 parser error(s): no prefix parse function for Comma found; \
                 could not parse 99999999999999999999 as integer",
            ),
            (
                Error::from(EvalError::DivisionByZero(10)).to_string(),
                "division by zero: 10 / 0",
            ),
        ];

        for (message, expected) in tests {
            assert_eq!(message, expected);
        }
    }
}
