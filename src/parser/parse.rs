//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing the main class, classes, methods and variable declarations
//! - `statements`: Parsing statements (block, if, while, print, assignment)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! The parser never backtracks. The only state is the position of the
//! lookahead token, and the first error aborts the parse: no partial tree is
//! ever returned.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The lookahead token is not the one the grammar requires here
    #[error("Expects: {expected}\nBut got: {found} at line {line}")]
    Mismatch {
        expected: TokenKind,
        found: TokenKind,
        line: usize,
    },

    /// No expression can start with the lookahead token
    #[error("Syntax error: {found} cannot start an expression at line {line}")]
    UnrecognizedAtom { found: TokenKind, line: usize },

    /// No statement can start with the lookahead token
    #[error("Syntax error: {found} cannot start a statement at line {line}")]
    UnrecognizedStatement { found: TokenKind, line: usize },

    /// An integer token whose text is not a 32-bit integer
    #[error("Syntax error: invalid integer literal '{lexeme}' at line {line}")]
    InvalidInteger { lexeme: String, line: usize },

    #[error(transparent)]
    Lexical(#[from] LexError),
}

impl SyntaxError {
    /// Source line the error points at
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Mismatch { line, .. }
            | SyntaxError::UnrecognizedAtom { line, .. }
            | SyntaxError::UnrecognizedStatement { line, .. }
            | SyntaxError::InvalidInteger { line, .. } => *line,
            SyntaxError::Lexical(err) => err.location.line,
        }
    }
}

/// Recursive descent parser for Soo
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    next_node_id: NodeId,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Build a parser over an already-lexed token stream.
    ///
    /// An end marker is appended when the stream does not end with one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let location = tokens
                .last()
                .map(|t| t.location)
                .unwrap_or(SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }
        Self {
            tokens,
            position: 0,
            next_node_id: 0,
        }
    }

    /// Parse the entire program: the main class followed by zero or more classes
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let main_class = self.parse_main_class()?;
        let mut program = Program::new(main_class);

        while self.check(TokenKind::Class) {
            let class = self.parse_class()?;
            program.classes.push(class);
        }

        self.expect(TokenKind::Eof)?;

        log::debug!(
            "parsed program '{}' with {} class(es)",
            program.main_class.name,
            program.classes.len()
        );
        Ok(program)
    }

    /// Parse a single expression that must span the whole input
    pub fn parse_standalone_expression(&mut self) -> Result<Expression, SyntaxError> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Eof)?;
        Ok(expr)
    }

    // ===== Helper methods =====

    /// Allocate the next stable node id
    pub(crate) fn fresh_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Kind of the token `n` places past the lookahead (end marker past the end)
    pub(crate) fn peek_ahead_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.position + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn current_line(&self) -> usize {
        self.peek().line()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the lookahead token and return it.
    ///
    /// The end marker is never consumed; advancing past it returns it again.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(SyntaxError::Mismatch {
                expected: kind,
                found: self.peek_kind(),
                line: self.current_line(),
            })
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<Token, SyntaxError> {
        self.expect(TokenKind::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_program() {
        let source = "class Main { public static void main(String[] a) { System.out.println(1); } }";
        let mut parser = Parser::new(source).unwrap();
        let program = parser.parse_program().unwrap();

        assert_eq!(program.main_class.name, "Main");
        assert!(program.classes.is_empty());
        match &program.main_class.body {
            Statement::Print { value, .. } => assert_eq!(*value, Expression::Num(1, 1)),
            other => panic!("Expected print statement, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let mut parser = Parser::new("1 + 2 )").unwrap();
        let err = parser.parse_standalone_expression().unwrap_err();
        assert_eq!(
            err,
            SyntaxError::Mismatch {
                expected: TokenKind::Eof,
                found: TokenKind::RParen,
                line: 1,
            }
        );
    }

    #[test]
    fn test_from_tokens_appends_end_marker() {
        let loc = SourceLocation::new(4, 1);
        let mut parser = Parser::from_tokens(vec![Token::new(TokenKind::Id, "x", loc)]);
        let expr = parser.parse_standalone_expression().unwrap();
        assert!(matches!(expr, Expression::Id { ref name, line: 4, .. } if name == "x"));
    }

    #[test]
    fn test_lex_error_surfaces_as_syntax_error() {
        let err = Parser::new("a # b").err().unwrap();
        assert!(matches!(err, SyntaxError::Lexical(_)));
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_mismatch_message_format() {
        let err = SyntaxError::Mismatch {
            expected: TokenKind::RParen,
            found: TokenKind::Semicolon,
            line: 7,
        };
        assert_eq!(err.to_string(), "Expects: ')'\nBut got: ';' at line 7");
    }
}
