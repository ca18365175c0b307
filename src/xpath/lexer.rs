//! XPath Lexer
//!
//! Tokenizes XPath expressions. `*` and the operator names (`and`, `or`,
//! `div`, `mod`) are only operators when they follow an operand, so
//! `/t1:div/*` stays a path.

use crate::error::{Error, Result};

/// XPath token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Operators
    Slash,       // /
    DoubleSlash, // //
    Dot,         // .
    DoubleDot,   // ..
    At,          // @
    Pipe,        // |
    Plus,        // +
    Minus,       // -
    Star,        // * as a name test
    Multiply,    // * after an operand
    Eq,          // =
    NotEq,       // !=
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    And,         // and
    Or,          // or
    Mod,         // mod
    Div,         // div

    // Brackets
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]

    // Literals
    Number(f64),
    String(String),

    // Names
    Name(String),     // NCName
    NameTest(String), // prefix:* or prefix:local
    NodeType(String), // node(), text(), comment(), processing-instruction()

    // Axis
    Axis(String), // child::, descendant::, etc.

    // Special
    DoubleColon, // ::
    Comma,       // ,
    Dollar,      // $

    // End of input
    Eof,
}

impl Token {
    /// Whether an operand may end with this token
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Name(_)
                | Token::NameTest(_)
                | Token::Number(_)
                | Token::String(_)
                | Token::Star
                | Token::Dot
                | Token::DoubleDot
                | Token::RightParen
                | Token::RightBracket
        )
    }
}

/// XPath lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    after_operand: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            after_operand: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Consume `c`, yielding `then` or else `otherwise`.
    fn pair(&mut self, c: char, then: Token, otherwise: Token) -> Token {
        self.advance(1);
        if self.peek() == Some(c) {
            self.advance(1);
            then
        } else {
            otherwise
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance(1);
        token
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        let token = self.scan()?;
        self.after_operand = token.ends_operand();
        Ok(token)
    }

    fn scan(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let token = match c {
            '/' => self.pair('/', Token::DoubleSlash, Token::Slash),
            '.' => {
                if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()
                } else {
                    self.pair('.', Token::DoubleDot, Token::Dot)
                }
            }
            '@' => self.single(Token::At),
            '|' => self.single(Token::Pipe),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' if self.after_operand => self.single(Token::Multiply),
            '*' => self.single(Token::Star),
            '=' => self.single(Token::Eq),
            '!' => {
                if self.peek_at(1) != Some('=') {
                    return Err(Error::Syntax(format!("unexpected '!' at offset {}", self.pos)));
                }
                self.advance(2);
                Token::NotEq
            }
            '<' => self.pair('=', Token::LtEq, Token::Lt),
            '>' => self.pair('=', Token::GtEq, Token::Gt),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            '[' => self.single(Token::LeftBracket),
            ']' => self.single(Token::RightBracket),
            ',' => self.single(Token::Comma),
            '$' => self.single(Token::Dollar),
            ':' => {
                if self.peek_at(1) != Some(':') {
                    return Err(Error::Syntax(format!("unexpected ':' at offset {}", self.pos)));
                }
                self.advance(2);
                Token::DoubleColon
            }
            '"' | '\'' => self.read_string(c)?,
            '0'..='9' => self.read_number(),
            _ if is_name_start_char(c) => self.read_name_or_keyword(),
            _ => {
                return Err(Error::Syntax(format!(
                    "unexpected character '{}' at offset {}",
                    c, self.pos
                )))
            }
        };
        Ok(token)
    }

    fn read_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
    }

    /// Read a number literal: `Digits ('.' Digits?)?` or `'.' Digits`
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        self.read_digits();
        if self.peek() == Some('.') {
            self.advance(1);
            self.read_digits();
        }
        let value = self.input[start..self.pos].parse().unwrap_or(f64::NAN);
        Token::Number(value)
    }

    /// Read a string literal; XPath 1.0 literals have no escapes.
    fn read_string(&mut self, quote: char) -> Result<Token> {
        let body = &self.remaining().as_bytes()[1..];
        let Some(len) = memchr::memchr(quote as u8, body) else {
            return Err(Error::Syntax(format!(
                "unterminated string literal at offset {}",
                self.pos
            )));
        };
        let start = self.pos + 1;
        let value = self.input[start..start + len].to_string();
        self.pos = start + len + 1;
        Ok(Token::String(value))
    }

    fn read_ncname(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    fn read_name_or_keyword(&mut self) -> Token {
        let name = self.read_ncname();

        if self.after_operand {
            match name {
                "and" => return Token::And,
                "or" => return Token::Or,
                "mod" => return Token::Mod,
                "div" => return Token::Div,
                _ => {}
            }
        }

        // prefix:local or prefix:*
        if self.peek() == Some(':') && self.peek_at(1) != Some(':') {
            let start = self.pos - name.len();
            self.advance(1);
            if self.peek() == Some('*') {
                self.advance(1);
            } else {
                self.read_ncname();
            }
            return Token::NameTest(self.input[start..self.pos].to_string());
        }

        let mark = self.pos;
        self.skip_whitespace();
        if self.remaining().starts_with("::") {
            return Token::Axis(name.to_string());
        }
        if self.peek() == Some('(')
            && matches!(name, "node" | "text" | "comment" | "processing-instruction")
        {
            return Token::NodeType(name.to_string());
        }
        self.pos = mark;
        Token::Name(name.to_string())
    }

    /// Tokenize entire input; the result always ends with `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    fn name(s: &str) -> Token {
        Token::Name(s.to_string())
    }

    fn qname(s: &str) -> Token {
        Token::NameTest(s.to_string())
    }

    #[test]
    fn test_simple_path() {
        assert_eq!(
            tokens("/t1:cont1a/t1:leaf1a"),
            vec![
                Token::Slash,
                qname("t1:cont1a"),
                Token::Slash,
                qname("t1:leaf1a"),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_predicate() {
        assert_eq!(
            tokens("list2a[@name='l2a1']"),
            vec![
                name("list2a"),
                Token::LeftBracket,
                Token::At,
                name("name"),
                Token::Eq,
                Token::String("l2a1".to_string()),
                Token::RightBracket,
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_axis() {
        let mut lexer = Lexer::new("ancestor :: node()");
        assert_eq!(lexer.next_token().unwrap(), Token::Axis("ancestor".to_string()));
        assert_eq!(lexer.next_token().unwrap(), Token::DoubleColon);
        assert_eq!(lexer.next_token().unwrap(), Token::NodeType("node".to_string()));
        assert_eq!(lexer.next_token().unwrap(), Token::LeftParen);
    }

    #[test]
    fn test_hyphenated_names_and_numbers() {
        assert_eq!(
            tokens("tx-power < 8.5"),
            vec![name("tx-power"), Token::Lt, Token::Number(8.5), Token::Eof]
        );
        assert_eq!(tokens(".5"), vec![Token::Number(0.5), Token::Eof]);
    }

    #[test]
    fn star_and_operator_names_depend_on_position() {
        assert_eq!(
            tokens("2 * 3"),
            vec![Token::Number(2.0), Token::Multiply, Token::Number(3.0), Token::Eof]
        );
        assert_eq!(tokens("/*"), vec![Token::Slash, Token::Star, Token::Eof]);
        assert_eq!(
            tokens("div div div"),
            vec![name("div"), Token::Div, name("div"), Token::Eof]
        );
        assert_eq!(tokens("t1:*"), vec![qname("t1:*"), Token::Eof]);
    }

    #[test]
    fn function_names_are_plain_names() {
        assert_eq!(
            tokens("count (x)"),
            vec![name("count"), Token::LeftParen, name("x"), Token::RightParen, Token::Eof]
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Lexer::new("'open").tokenize(), Err(Error::Syntax(_))));
        assert!(matches!(Lexer::new("a ! b").tokenize(), Err(Error::Syntax(_))));
        assert!(matches!(Lexer::new("a # b").tokenize(), Err(Error::Syntax(_))));
    }
}
