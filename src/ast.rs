use std::fmt;
use std::rc::Rc;

use crate::token::LET_KEYWORD;

pub type Identifier = String;

/// Root of a parsed source text. Statements keep their source order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

// `None` in any expression slot marks a sub-tree that failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Let(Identifier, Option<Expression>),
    Return(Option<Expression>),
    ExpressionStmt(Option<Expression>),
    Block(Block),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Ident(Identifier),
    IntLiteral(i64),
    Boolean(bool),
    PrefixExpr(Prefix, Option<Box<Expression>>),
    InfixExpr(Infix, Box<Expression>, Option<Box<Expression>>),
    IfExpr {
        condition: Option<Box<Expression>>,
        consequence: Block,
        alternative: Option<Block>,
    },
    FnLiteral {
        parameters: Vec<Identifier>,
        body: Rc<Block>,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prefix {
    Minus,
    Bang,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Infix {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Slash,
    Asterisk,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minus => write!(f, "-"),
            Self::Bang => write!(f, "!"),
        }
    }
}

impl fmt::Display for Infix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Slash => "/",
            Self::Asterisk => "*",
        };
        write!(f, "{}", op)
    }
}

struct Maybe<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Maybe<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => write!(f, "{}", node),
            None => Ok(()),
        }
    }
}

// Expression statements that are followed by another statement get a `;` so
// the rendered text splits into the same statements when parsed again.
fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", statement)?;
        if matches!(statement, Statement::ExpressionStmt(_)) && i + 1 < statements.len() {
            write!(f, ";")?;
        }
    }
    Ok(())
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        write_statements(f, &self.statements)?;
        write!(f, " }}")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let(name, value) => write!(f, "{} {} = {};", LET_KEYWORD, name, Maybe(value)),
            Self::Return(value) => write!(f, "return {};", Maybe(value)),
            Self::ExpressionStmt(value) => write!(f, "{}", Maybe(value)),
            Self::Block(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "{}", name),
            Self::IntLiteral(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::PrefixExpr(op, right) => write!(f, "({}{})", op, Maybe(right)),
            Self::InfixExpr(op, left, right) => write!(f, "({} {} {})", left, op, Maybe(right)),
            Self::IfExpr {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {}", Maybe(condition), consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Self::FnLiteral { parameters, body } => {
                write!(f, "function(")?;
                write_list(f, parameters)?;
                write!(f, ") {}", body)
            }
            Self::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
        }
    }
}
