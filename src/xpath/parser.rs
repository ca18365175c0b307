//! XPath Parser
//!
//! Recursive descent parser for XPath 1.0 expressions.

use super::lexer::{Lexer, Token};
use crate::error::{Error, Result};

/// XPath expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Root path (/)
    Root,
    /// Current context node
    Context,
    /// Union of two expressions (|)
    Union(Box<Expr>, Box<Expr>),
    /// Location step applied to every node of the base
    Path(Box<Expr>, Box<Step>),
    /// Filter expression with predicate
    Filter(Box<Expr>, Box<Expr>),
    /// Function call
    Function(String, Vec<Expr>),
    /// Binary operation
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    /// Unary negation
    Negate(Box<Expr>),
    /// Literal number
    Number(f64),
    /// Literal string
    String(String),
    /// Variable reference
    Variable(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Location step in a path
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    fn bare(axis: Axis, node_test: NodeTest) -> Self {
        Step {
            axis,
            node_test,
            predicates: Vec::new(),
        }
    }
}

/// XPath axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    Self_,
    Attribute,
    Namespace,
}

impl Axis {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "child" => Some(Axis::Child),
            "descendant" => Some(Axis::Descendant),
            "descendant-or-self" => Some(Axis::DescendantOrSelf),
            "parent" => Some(Axis::Parent),
            "ancestor" => Some(Axis::Ancestor),
            "ancestor-or-self" => Some(Axis::AncestorOrSelf),
            "following-sibling" => Some(Axis::FollowingSibling),
            "preceding-sibling" => Some(Axis::PrecedingSibling),
            "following" => Some(Axis::Following),
            "preceding" => Some(Axis::Preceding),
            "self" => Some(Axis::Self_),
            "attribute" => Some(Axis::Attribute),
            "namespace" => Some(Axis::Namespace),
            _ => None,
        }
    }

    /// Reverse axes number their nodes nearest-first, against document order.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Parent
                | Axis::Ancestor
                | Axis::AncestorOrSelf
                | Axis::PrecedingSibling
                | Axis::Preceding
        )
    }
}

/// Node test in a location step
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    /// Matches any node of the principal type (*)
    Any,
    /// Matches by local name, any module
    Name(String),
    /// Matches prefix:localname
    QName(String, String),
    /// Matches prefix:*
    NamespaceWildcard(String),
    /// node() - matches any node
    Node,
    /// text() - matches text nodes
    Text,
    /// comment() - matches comments
    Comment,
    /// processing-instruction() - matches PIs
    ProcessingInstruction(Option<String>),
}

impl NodeTest {
    fn from_qname(qname: &str) -> Self {
        match memchr::memchr(b':', qname.as_bytes()) {
            Some(colon) => {
                let (prefix, local) = (&qname[..colon], &qname[colon + 1..]);
                if local == "*" {
                    NodeTest::NamespaceWildcard(prefix.to_string())
                } else {
                    NodeTest::QName(prefix.to_string(), local.to_string())
                }
            }
            None => NodeTest::Name(qname.to_string()),
        }
    }
}

/// XPath parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser
    pub fn new(input: &str) -> Result<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Parser { tokens, pos: 0 })
    }

    /// Parse an XPath expression; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        if !matches!(self.current(), Token::Eof) {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<()> {
        if *self.current() != token {
            return Err(Error::Syntax(format!(
                "expected {}, found {:?}",
                what,
                self.current()
            )));
        }
        self.advance();
        Ok(())
    }

    fn unexpected(&self) -> Error {
        Error::Syntax(format!("unexpected token {:?}", self.current()))
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or_expr()
    }

    fn parse_or_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_and_expr()?;
        while matches!(self.current(), Token::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = Expr::Binary(Box::new(left), BinaryOp::Or, Box::new(right));
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality_expr()?;
        while matches!(self.current(), Token::And) {
            self.advance();
            let right = self.parse_equality_expr()?;
            left = Expr::Binary(Box::new(left), BinaryOp::And, Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_relational_expr()?;
        loop {
            let op = match self.current() {
                Token::Eq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expr()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_relational_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive_expr()?;
        loop {
            let op = match self.current() {
                Token::Lt => BinaryOp::Lt,
                Token::LtEq => BinaryOp::LtEq,
                Token::Gt => BinaryOp::Gt,
                Token::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expr()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative_expr()?;
        loop {
            let op = match self.current() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expr()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary_expr()?;
        loop {
            let op = match self.current() {
                Token::Multiply => BinaryOp::Mul,
                Token::Div => BinaryOp::Div,
                Token::Mod => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expr()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr> {
        if matches!(self.current(), Token::Minus) {
            self.advance();
            let expr = self.parse_unary_expr()?;
            Ok(Expr::Negate(Box::new(expr)))
        } else {
            self.parse_union_expr()
        }
    }

    fn parse_union_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_path_expr()?;
        while matches!(self.current(), Token::Pipe) {
            self.advance();
            let right = self.parse_path_expr()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// Whether the current token can begin a location step
    fn at_step_start(&self) -> bool {
        match self.current() {
            Token::Star
            | Token::NodeType(_)
            | Token::At
            | Token::Dot
            | Token::DoubleDot
            | Token::Axis(_) => true,
            // a name followed by '(' is a function call
            Token::Name(_) | Token::NameTest(_) => !matches!(self.peek(), Token::LeftParen),
            _ => false,
        }
    }

    fn parse_path_expr(&mut self) -> Result<Expr> {
        match self.current() {
            Token::Slash => {
                self.advance();
                if self.at_step_start() {
                    self.parse_relative_path(Expr::Root)
                } else {
                    Ok(Expr::Root)
                }
            }
            Token::DoubleSlash => {
                self.advance();
                let base = descendant_or_self(Expr::Root);
                self.parse_relative_path(base)
            }
            _ if self.at_step_start() => self.parse_relative_path(Expr::Context),
            _ => {
                let mut expr = self.parse_primary_expr()?;
                while matches!(self.current(), Token::LeftBracket) {
                    let pred = self.parse_predicate()?;
                    expr = Expr::Filter(Box::new(expr), Box::new(pred));
                }
                self.parse_path_tail(expr)
            }
        }
    }

    /// `Step (('/' | '//') Step)*` on top of `base`
    fn parse_relative_path(&mut self, base: Expr) -> Result<Expr> {
        let step = self.parse_step()?;
        self.parse_path_tail(Expr::Path(Box::new(base), Box::new(step)))
    }

    fn parse_path_tail(&mut self, mut expr: Expr) -> Result<Expr> {
        loop {
            match self.current() {
                Token::Slash => {
                    self.advance();
                }
                Token::DoubleSlash => {
                    self.advance();
                    expr = descendant_or_self(expr);
                }
                _ => return Ok(expr),
            }
            let step = self.parse_step()?;
            expr = Expr::Path(Box::new(expr), Box::new(step));
        }
    }

    fn parse_predicate(&mut self) -> Result<Expr> {
        self.expect(Token::LeftBracket, "'['")?;
        let pred = self.parse_expr()?;
        self.expect(Token::RightBracket, "']'")?;
        Ok(pred)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr> {
        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::String(s))
            }
            Token::Dollar => {
                self.advance();
                match self.current().clone() {
                    Token::Name(name) | Token::NameTest(name) => {
                        self.advance();
                        Ok(Expr::Variable(name))
                    }
                    _ => Err(Error::Syntax("expected variable name after '$'".to_string())),
                }
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(Token::RightParen, "')'")?;
                Ok(expr)
            }
            Token::Name(name) | Token::NameTest(name) => {
                self.advance();
                self.expect(Token::LeftParen, "'('")?;
                let args = self.parse_function_args()?;
                Ok(Expr::Function(name, args))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_step(&mut self) -> Result<Step> {
        let axis = match self.current().clone() {
            Token::Dot => {
                self.advance();
                return Ok(Step::bare(Axis::Self_, NodeTest::Node));
            }
            Token::DoubleDot => {
                self.advance();
                return Ok(Step::bare(Axis::Parent, NodeTest::Node));
            }
            Token::At => {
                self.advance();
                Axis::Attribute
            }
            Token::Axis(name) => {
                let axis = Axis::from_name(&name)
                    .ok_or_else(|| Error::Syntax(format!("unknown axis '{}'", name)))?;
                self.advance();
                self.expect(Token::DoubleColon, "'::'")?;
                axis
            }
            _ => Axis::Child,
        };

        let node_test = match self.current().clone() {
            Token::Star => {
                self.advance();
                NodeTest::Any
            }
            Token::Name(name) => {
                self.advance();
                NodeTest::Name(name)
            }
            Token::NameTest(qname) => {
                self.advance();
                NodeTest::from_qname(&qname)
            }
            Token::NodeType(kind) => {
                self.advance();
                self.expect(Token::LeftParen, "'('")?;
                let literal = match self.current().clone() {
                    Token::String(s) if kind == "processing-instruction" => {
                        self.advance();
                        Some(s)
                    }
                    _ => None,
                };
                self.expect(Token::RightParen, "')'")?;
                match kind.as_str() {
                    "node" => NodeTest::Node,
                    "text" => NodeTest::Text,
                    "comment" => NodeTest::Comment,
                    _ => NodeTest::ProcessingInstruction(literal),
                }
            }
            other => {
                return Err(Error::Syntax(format!(
                    "expected node test, found {:?}",
                    other
                )))
            }
        };

        let mut predicates = Vec::new();
        while matches!(self.current(), Token::LeftBracket) {
            predicates.push(self.parse_predicate()?);
        }

        Ok(Step {
            axis,
            node_test,
            predicates,
        })
    }

    fn parse_function_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if !matches!(self.current(), Token::RightParen) {
            args.push(self.parse_expr()?);
            while matches!(self.current(), Token::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.expect(Token::RightParen, "')'")?;
        Ok(args)
    }
}

/// `base//x` is `base/descendant-or-self::node()/x`
fn descendant_or_self(base: Expr) -> Expr {
    Expr::Path(
        Box::new(base),
        Box::new(Step::bare(Axis::DescendantOrSelf, NodeTest::Node)),
    )
}

/// Parse an XPath expression string
pub fn parse(input: &str) -> Result<Expr> {
    Parser::new(input)?.parse()
}
