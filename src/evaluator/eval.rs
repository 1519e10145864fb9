use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Block, Expression, Infix, Prefix, Program, Statement};
use crate::error::EvalError;
use crate::object::environment::Environment;
use crate::object::object::{Function, Object, FALSE, NULL, TRUE};

/// Default bound on nested expression evaluation, calls included.
pub const MAX_EVAL_DEPTH: usize = 256;

// Non-local exits: a `return` travelling up to the nearest call boundary, or
// an evaluation failure travelling up to the caller of `eval_program`.
enum Unwind {
    Return(Object),
    Error(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(error: EvalError) -> Self {
        Unwind::Error(error)
    }
}

type Eval<T> = Result<T, Unwind>;

pub struct Evaluator {
    environment: Rc<RefCell<Environment>>,
    max_depth: usize,
    depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::new_with_env(Rc::new(RefCell::new(Environment::new())))
    }

    pub fn new_with_env(environment: Rc<RefCell<Environment>>) -> Self {
        Self {
            environment,
            max_depth: MAX_EVAL_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluates every statement in order and returns the value of the last
    /// one, or of the first top-level `return`. `None` means the last
    /// statement produced no value (a binding, or a statement that failed to
    /// parse).
    pub fn eval_program(&mut self, program: &Program) -> Result<Option<Object>, EvalError> {
        match self.eval_statements(&program.statements) {
            Ok(value) => Ok(value),
            Err(Unwind::Return(value)) => Ok(Some(value)),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn eval_statements(&mut self, statements: &[Statement]) -> Eval<Option<Object>> {
        let mut result = None;
        for statement in statements {
            result = self.eval_statement(statement)?;
        }

        Ok(result)
    }

    fn eval_block(&mut self, block: &Block) -> Eval<Object> {
        Ok(self.eval_statements(&block.statements)?.unwrap_or(NULL))
    }

    fn eval_statement(&mut self, statement: &Statement) -> Eval<Option<Object>> {
        match statement {
            Statement::ExpressionStmt(Some(expr)) => Ok(Some(self.eval_expr(expr)?)),
            Statement::Let(ident, Some(expr)) => {
                let val = self.eval_expr(expr)?;
                self.environment.borrow_mut().set(ident.clone(), val);
                Ok(None)
            }
            Statement::Return(Some(expr)) => {
                let val = self.eval_expr(expr)?;
                Err(Unwind::Return(val))
            }
            Statement::Block(block) => self.eval_statements(&block.statements),
            // Statements whose expression failed to parse are skipped.
            Statement::ExpressionStmt(None) | Statement::Let(_, None) | Statement::Return(None) => {
                Ok(None)
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expression) -> Eval<Object> {
        if self.depth >= self.max_depth {
            return Err(EvalError::RecursionLimit(self.max_depth).into());
        }

        self.depth += 1;
        let result = self.eval_expr_at(expr);
        self.depth -= 1;
        result
    }

    fn eval_operand(&mut self, expr: &Option<Box<Expression>>) -> Eval<Object> {
        match expr {
            Some(expr) => self.eval_expr(expr),
            None => Err(EvalError::MissingExpression.into()),
        }
    }

    fn eval_expr_at(&mut self, expr: &Expression) -> Eval<Object> {
        match expr {
            Expression::IntLiteral(num) => Ok(Object::Integer(*num)),
            Expression::Boolean(value) => Ok(Object::from_native_bool(*value)),
            Expression::Ident(ident) => self.eval_ident(ident),
            Expression::PrefixExpr(op, right) => {
                let right = self.eval_operand(right)?;
                Ok(self.eval_prefix_expression(*op, right)?)
            }
            Expression::InfixExpr(op, left, right) => {
                let left = self.eval_expr(left)?;
                let right = self.eval_operand(right)?;
                Ok(self.eval_infix_expression(*op, left, right)?)
            }
            Expression::IfExpr {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_operand(condition)?;
                if condition.is_truthy() {
                    self.eval_block(consequence)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative)
                } else {
                    Ok(NULL)
                }
            }
            Expression::FnLiteral { parameters, body } => Ok(Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: Rc::clone(body),
                env: Rc::clone(&self.environment),
            }))),
            Expression::Call {
                function,
                arguments,
            } => {
                let function = self.eval_expr(function)?;
                let args = self.eval_expressions(arguments)?;
                self.apply_function(function, args)
            }
        }
    }

    fn eval_ident(&self, ident: &str) -> Eval<Object> {
        match self.environment.borrow().get(ident) {
            Some(obj) => Ok(obj),
            None => Err(EvalError::UnboundIdentifier(ident.to_string()).into()),
        }
    }

    fn eval_expressions(&mut self, exprs: &[Expression]) -> Eval<Vec<Object>> {
        let mut result = Vec::with_capacity(exprs.len());

        for expr in exprs {
            result.push(self.eval_expr(expr)?);
        }

        Ok(result)
    }

    fn eval_prefix_expression(&self, op: Prefix, right: Object) -> Result<Object, EvalError> {
        match op {
            Prefix::Bang => Ok(match right {
                Object::Boolean(true) => FALSE,
                Object::Boolean(false) | Object::Null => TRUE,
                _ => FALSE,
            }),
            Prefix::Minus => match right {
                Object::Integer(num) => num
                    .checked_neg()
                    .map(Object::Integer)
                    .ok_or_else(|| EvalError::IntegerOverflow(format!("-{}", num))),
                obj => Err(EvalError::UnknownPrefixOperator {
                    operator: op.to_string(),
                    operand: obj.obj_type(),
                }),
            },
        }
    }

    fn eval_infix_expression(
        &self,
        op: Infix,
        left: Object,
        right: Object,
    ) -> Result<Object, EvalError> {
        match (&left, &right) {
            (Object::Integer(l), Object::Integer(r)) => {
                self.eval_integer_infix_expression(op, *l, *r)
            }
            _ => match op {
                Infix::Eq => Ok(Object::from_native_bool(left == right)),
                Infix::NotEq => Ok(Object::from_native_bool(left != right)),
                _ if left.obj_type() != right.obj_type() => Err(EvalError::TypeMismatch {
                    left: left.obj_type(),
                    operator: op.to_string(),
                    right: right.obj_type(),
                }),
                _ => Err(EvalError::UnknownInfixOperator {
                    left: left.obj_type(),
                    operator: op.to_string(),
                    right: right.obj_type(),
                }),
            },
        }
    }

    fn eval_integer_infix_expression(
        &self,
        op: Infix,
        left: i64,
        right: i64,
    ) -> Result<Object, EvalError> {
        let checked = match op {
            Infix::Eq => return Ok(Object::from_native_bool(left == right)),
            Infix::NotEq => return Ok(Object::from_native_bool(left != right)),
            Infix::Lt => return Ok(Object::from_native_bool(left < right)),
            Infix::LtEq => return Ok(Object::from_native_bool(left <= right)),
            Infix::Gt => return Ok(Object::from_native_bool(left > right)),
            Infix::GtEq => return Ok(Object::from_native_bool(left >= right)),
            Infix::Plus => left.checked_add(right),
            Infix::Minus => left.checked_sub(right),
            Infix::Asterisk => left.checked_mul(right),
            Infix::Slash if right == 0 => return Err(EvalError::DivisionByZero(left)),
            Infix::Slash => left.checked_div(right),
        };

        checked
            .map(Object::Integer)
            .ok_or_else(|| EvalError::IntegerOverflow(format!("{} {} {}", left, op, right)))
    }

    fn apply_function(&mut self, function: Object, args: Vec<Object>) -> Eval<Object> {
        let function = match function {
            Object::Function(function) => function,
            obj => return Err(EvalError::NotAFunction(obj.obj_type()).into()),
        };

        if function.parameters.len() != args.len() {
            return Err(EvalError::WrongArgumentCount {
                got: args.len(),
                want: function.parameters.len(),
            }
            .into());
        }

        let extended_env = self.extend_function_env(&function, args);
        let outer = std::mem::replace(&mut self.environment, Rc::new(RefCell::new(extended_env)));
        let evaluated = self.eval_statements(&function.body.statements);
        self.environment = outer;

        self.unwrap_return_value(evaluated)
    }

    fn extend_function_env(&self, function: &Function, args: Vec<Object>) -> Environment {
        let mut environment = Environment::new_enclosed_environment(function.env.clone());

        for (param, arg) in function.parameters.iter().zip(args) {
            environment.set(param.clone(), arg);
        }

        environment
    }

    // A `return` stops at the call it was raised in.
    fn unwrap_return_value(&self, evaluated: Eval<Option<Object>>) -> Eval<Object> {
        match evaluated {
            Ok(value) => Ok(value.unwrap_or(NULL)),
            Err(Unwind::Return(value)) => Ok(value),
            Err(error) => Err(error),
        }
    }
}
