use std::rc::Rc;

use crate::ast::{Block, Expression, Identifier, Infix, Prefix, Program, Statement};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Deepest expression nesting the parser descends into before giving up.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // ==
    LessGreater, // > or <
    Sum,         // +
    Product,     // *
    Prefix,      // -X or !X
    Call,        // myFunction(X)
}

enum PrefixRule {
    Ident,
    Integer,
    Boolean,
    Grouped,
    Operator(Prefix),
    If,
    Function,
}

enum InfixRule {
    Operator(Infix),
    Call,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    use TokenKind::*;

    match kind {
        Eq | NotEq => Precedence::Equals,
        Lt | LtEq | Gt | GtEq => Precedence::LessGreater,
        Plus | Minus => Precedence::Sum,
        Slash | Asterisk => Precedence::Product,
        Lparen => Precedence::Call,
        Illegal | Eof | Ident | Int | Assign | Bang | Comma | Semicolon | Rparen | Lbrace
        | Rbrace | Function | Let | True | False | If | Else | Return => Precedence::Lowest,
    }
}

fn prefix_rule(kind: TokenKind) -> Option<PrefixRule> {
    use TokenKind::*;

    match kind {
        Ident => Some(PrefixRule::Ident),
        Int => Some(PrefixRule::Integer),
        True | False => Some(PrefixRule::Boolean),
        Lparen => Some(PrefixRule::Grouped),
        Minus => Some(PrefixRule::Operator(Prefix::Minus)),
        Bang => Some(PrefixRule::Operator(Prefix::Bang)),
        If => Some(PrefixRule::If),
        Function => Some(PrefixRule::Function),
        Illegal | Eof | Assign | Plus | Asterisk | Slash | Lt | LtEq | Gt | GtEq | Eq | NotEq
        | Comma | Semicolon | Rparen | Lbrace | Rbrace | Let | Else | Return => None,
    }
}

fn infix_rule(kind: TokenKind) -> Option<InfixRule> {
    use TokenKind::*;

    let op = match kind {
        Plus => Infix::Plus,
        Minus => Infix::Minus,
        Asterisk => Infix::Asterisk,
        Slash => Infix::Slash,
        Eq => Infix::Eq,
        NotEq => Infix::NotEq,
        Lt => Infix::Lt,
        LtEq => Infix::LtEq,
        Gt => Infix::Gt,
        GtEq => Infix::GtEq,
        Lparen => return Some(InfixRule::Call),
        Illegal | Eof | Ident | Int | Assign | Bang | Comma | Semicolon | Rparen | Lbrace
        | Rbrace | Function | Let | True | False | If | Else | Return => return None,
    };
    Some(InfixRule::Operator(op))
}

pub struct Parser {
    lexer: Lexer,
    curr_token: Token,
    peek_token: Token,
    errors: Vec<ParseError>,
    depth: usize,
    delimiters: usize,
    aborted: bool,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let mut parser = Parser {
            lexer,
            curr_token: Token::eof(),
            peek_token: Token::eof(),
            errors: vec![],
            depth: 0,
            delimiters: 0,
            aborted: false,
        };

        parser.next_token();
        parser.next_token();

        parser
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn next_token(&mut self) {
        self.curr_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
        match self.curr_token.kind {
            TokenKind::Lparen | TokenKind::Lbrace => self.delimiters += 1,
            TokenKind::Rparen | TokenKind::Rbrace => {
                self.delimiters = self.delimiters.saturating_sub(1)
            }
            _ => {}
        }
    }

    fn curr_token_is(&self, kind: TokenKind) -> bool {
        self.curr_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_token_is(kind) {
            self.next_token();
            return Some(());
        }
        if !self.aborted {
            self.errors.push(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek_token.kind,
            });
        }
        None
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }

    fn curr_precedence(&self) -> Precedence {
        precedence_of(self.curr_token.kind)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.curr_token_is(TokenKind::Eof) {
            self.delimiters = usize::from(matches!(
                self.curr_token.kind,
                TokenKind::Lparen | TokenKind::Lbrace
            ));

            let statement = self.parse_statement();
            if self.aborted {
                program.statements.push(Statement::ExpressionStmt(None));
                self.aborted = false;
            } else if let Some(statement) = statement {
                program.statements.push(statement);
            }
            self.next_token();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.curr_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => Some(self.parse_return_statement()),
            _ => Some(self.parse_expression_statement()),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.curr_token.literal.clone();

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let(name, value))
    }

    fn parse_return_statement(&mut self) -> Statement {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Statement::Return(value)
    }

    fn parse_expression_statement(&mut self) -> Statement {
        let value = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Statement::ExpressionStmt(value)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.abort();
            return None;
        }

        self.depth += 1;
        let expression = self.parse_expression_at(precedence);
        self.depth -= 1;
        expression
    }

    // Records the nesting error once and skips to the `;` that ends the
    // current top-level statement, so the unwinding callers do not pile up
    // follow-up errors. Without such a `;` the rest of the input is skipped.
    fn abort(&mut self) {
        if !self.aborted {
            self.errors.push(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
            self.aborted = true;
        }
        while !self.peek_token_is(TokenKind::Eof)
            && !(self.peek_token_is(TokenKind::Semicolon) && self.delimiters == 0)
        {
            self.next_token();
        }
    }

    fn parse_expression_at(&mut self, precedence: Precedence) -> Option<Expression> {
        let left = match prefix_rule(self.curr_token.kind) {
            Some(rule) => self.parse_prefix(rule)?,
            None => {
                if !self.aborted {
                    self.errors
                        .push(ParseError::NoPrefixRule(self.curr_token.kind));
                }
                return None;
            }
        };

        let depth = self.depth;
        let expression = self.parse_infix_chain(precedence, left);
        self.depth = depth;
        expression
    }

    // Every operator or call folded into `left` makes the tree one level
    // deeper, so each one counts toward the nesting limit.
    fn parse_infix_chain(
        &mut self,
        precedence: Precedence,
        mut left: Expression,
    ) -> Option<Expression> {
        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let rule = match infix_rule(self.peek_token.kind) {
                Some(rule) => rule,
                None => break,
            };
            if self.depth >= MAX_NESTING_DEPTH {
                self.abort();
                return None;
            }

            self.depth += 1;
            self.next_token();
            left = self.parse_infix(rule, left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self, rule: PrefixRule) -> Option<Expression> {
        match rule {
            PrefixRule::Ident => Some(Expression::Ident(self.curr_token.literal.clone())),
            PrefixRule::Integer => self.parse_integer_literal(),
            PrefixRule::Boolean => Some(Expression::Boolean(self.curr_token_is(TokenKind::True))),
            PrefixRule::Grouped => self.parse_grouped_expression(),
            PrefixRule::Operator(op) => {
                self.next_token();
                let right = self.parse_expression(Precedence::Prefix);
                Some(Expression::PrefixExpr(op, right.map(Box::from)))
            }
            PrefixRule::If => self.parse_if_expression(),
            PrefixRule::Function => self.parse_function_literal(),
        }
    }

    fn parse_infix(&mut self, rule: InfixRule, left: Expression) -> Option<Expression> {
        match rule {
            InfixRule::Operator(op) => {
                let precedence = self.curr_precedence();
                self.next_token();
                let right = self.parse_expression(precedence);
                Some(Expression::InfixExpr(
                    op,
                    Box::from(left),
                    right.map(Box::from),
                ))
            }
            InfixRule::Call => {
                let arguments = self.parse_call_arguments()?;
                Some(Expression::Call {
                    function: Box::from(left),
                    arguments,
                })
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.curr_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntLiteral(value)),
            Err(_) => {
                self.errors
                    .push(ParseError::InvalidInteger(self.curr_token.literal.clone()));
                None
            }
        }
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest);
        self.expect_peek(TokenKind::Rparen)?;

        expression
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        self.expect_peek(TokenKind::Lparen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest);

        self.expect_peek(TokenKind::Rparen)?;
        self.expect_peek(TokenKind::Lbrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::Lbrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::IfExpr {
            condition: condition.map(Box::from),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> Block {
        let mut block = Block::default();
        self.next_token();

        while !self.curr_token_is(TokenKind::Rbrace) && !self.curr_token_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                block.statements.push(statement);
            }
            if self.aborted {
                return block;
            }
            self.next_token();
        }

        if self.curr_token_is(TokenKind::Eof) {
            self.errors.push(ParseError::UnexpectedToken {
                expected: TokenKind::Rbrace,
                found: TokenKind::Eof,
            });
        }

        block
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        self.expect_peek(TokenKind::Lparen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::Lbrace)?;
        let body = self.parse_block_statement();

        Some(Expression::FnLiteral {
            parameters,
            body: Rc::new(body),
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut identifiers = vec![];

        if self.peek_token_is(TokenKind::Rparen) {
            self.next_token();
            return Some(identifiers);
        }

        self.expect_peek(TokenKind::Ident)?;
        identifiers.push(self.curr_token.literal.clone());

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            identifiers.push(self.curr_token.literal.clone());
        }

        self.expect_peek(TokenKind::Rparen)?;

        Some(identifiers)
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = vec![];

        if self.peek_token_is(TokenKind::Rparen) {
            self.next_token();
            return Some(arguments);
        }

        self.next_token();
        let mut complete = true;
        match self.parse_expression(Precedence::Lowest) {
            Some(argument) => arguments.push(argument),
            None => complete = false,
        }

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            match self.parse_expression(Precedence::Lowest) {
                Some(argument) => arguments.push(argument),
                None => complete = false,
            }
        }

        self.expect_peek(TokenKind::Rparen)?;

        if complete {
            Some(arguments)
        } else {
            None
        }
    }
}
