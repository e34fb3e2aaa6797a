//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Scans a raw formula string and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. It handles
//! whitespace skipping, number literals, and cell references (a letter
//! run immediately followed by a digit run, with no separator).
//!
//! SUPPORTED TOKENS:
//! - Single char: + - * / ( )
//! - Numbers: 3, 3.5, .5
//! - Cell references: A1, AA100 (letters then digits, no gap between them)

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,

            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),
            Some(ch) if ch.is_ascii_alphabetic() => self.read_cell_ref(ch),

            None => Token::EOF,
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut number_str = String::from(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.input.next();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                number_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        match number_str.parse::<f64>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Illegal(first_char),
        }
    }

    /// Reads a letter run followed immediately by a digit run. There is no
    /// notion of a bare identifier in this grammar (no named ranges, no
    /// function calls), so a letter run with nothing but non-digits after
    /// it is simply illegal.
    fn read_cell_ref(&mut self, first_char: char) -> Token {
        let mut col = String::new();
        col.push(first_char.to_ascii_uppercase());

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_alphabetic() {
                col.push(ch.to_ascii_uppercase());
                self.input.next();
            } else {
                break;
            }
        }

        let mut row_str = String::new();
        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                row_str.push(ch);
                self.input.next();
            } else {
                break;
            }
        }

        if row_str.is_empty() {
            return Token::Illegal(first_char);
        }

        match row_str.parse::<u32>() {
            Ok(row) => Token::CellRef(col, row),
            Err(_) => Token::Illegal(first_char),
        }
    }
}
