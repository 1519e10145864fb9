use crate::token::{self, Token, TokenKind};

#[derive(Debug)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,      // current position in input (point to current char)
    read_position: usize, // current reading position in input (after current char)
    ch: Option<char>,     // current char under examination
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut l = Lexer {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
        };

        l.read_char();
        l
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position;
        if self.read_position <= self.input.len() {
            self.read_position += 1;
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    /// Returns the next token and advances past it. Once the input is
    /// exhausted every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let token = match self.ch {
            Some('=') => self.either('=', TokenKind::Eq, TokenKind::Assign),
            Some('!') => self.either('=', TokenKind::NotEq, TokenKind::Bang),
            Some('<') => self.either('=', TokenKind::LtEq, TokenKind::Lt),
            Some('>') => self.either('=', TokenKind::GtEq, TokenKind::Gt),
            Some(';') => Token::new(TokenKind::Semicolon, ";"),
            Some('(') => Token::new(TokenKind::Lparen, "("),
            Some(')') => Token::new(TokenKind::Rparen, ")"),
            Some(',') => Token::new(TokenKind::Comma, ","),
            Some('+') => Token::new(TokenKind::Plus, "+"),
            Some('{') => Token::new(TokenKind::Lbrace, "{"),
            Some('}') => Token::new(TokenKind::Rbrace, "}"),
            Some('-') => Token::new(TokenKind::Minus, "-"),
            Some('*') => Token::new(TokenKind::Asterisk, "*"),
            Some('/') => Token::new(TokenKind::Slash, "/"),
            None => return Token::eof(),
            Some(c) => {
                if is_letter(Some(c)) {
                    let ident = self.read_identifier();
                    Token::new(token::lookup_ident(&ident), ident)
                } else if is_digit(Some(c)) {
                    Token::new(TokenKind::Int, self.read_number())
                } else {
                    Token::new(TokenKind::Illegal, c.to_string())
                }
            }
        };

        self.read_char();
        token
    }

    // Two-character operator when the next char is `second`, otherwise the
    // single-character token.
    fn either(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        let first = self.ch.unwrap_or_default();
        if self.peek_char() == Some(second) {
            self.read_char();
            Token::new(double, format!("{}{}", first, second))
        } else {
            Token::new(single, first.to_string())
        }
    }

    fn read_identifier(&mut self) -> String {
        let position = self.position;
        while is_letter(self.peek_char()) {
            self.read_char();
        }
        self.input[position..=self.position].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while self.ch == Some(' ')
            || self.ch == Some('\t')
            || self.ch == Some('\n')
            || self.ch == Some('\r')
        {
            self.read_char()
        }
    }

    fn read_number(&mut self) -> String {
        let position = self.position;
        while is_digit(self.peek_char()) {
            self.read_char();
        }
        self.input[position..=self.position].iter().collect()
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => None,
            _ => Some(token),
        }
    }
}

fn is_letter(ch: Option<char>) -> bool {
    ch.map(char::is_alphabetic).unwrap_or(false)
}

fn is_digit(ch: Option<char>) -> bool {
    ch.map(|c| c.is_ascii_digit()).unwrap_or(false)
}
