//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= '{' statement* '}'
//!             | 'if' '(' exp ')' statement 'else' statement
//!             | 'while' '(' exp ')' statement
//!             | 'System.out.println' '(' exp ')' ';'
//!             | id '=' exp ';'
//! ```
//!
//! Both branches of an `if` are mandatory, so there is no dangling-else case.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse statements up to (not including) the closing brace
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();

        while self.starts_statement() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Whether the lookahead token can begin a statement
    pub(crate) fn starts_statement(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::LBrace
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Println
                | TokenKind::Id
        )
    }

    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        let line = self.current_line();

        match self.peek_kind() {
            TokenKind::LBrace => {
                self.advance();
                let statements = self.parse_block_statements()?;
                self.expect(TokenKind::RBrace)?;
                Ok(Statement::Block { statements, line })
            }
            TokenKind::If => {
                self.advance();
                self.parse_if_statement(line)
            }
            TokenKind::While => {
                self.advance();
                self.parse_while_statement(line)
            }
            TokenKind::Println => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Print { value, line })
            }
            TokenKind::Id => {
                let target = self.advance();
                self.expect(TokenKind::Eq)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Assign {
                    id: self.fresh_node_id(),
                    target: target.lexeme,
                    value,
                    line,
                })
            }
            found => Err(SyntaxError::UnrecognizedStatement { found, line }),
        }
    }

    /// Parse if statement: if (cond) then_stmt else else_stmt
    fn parse_if_statement(&mut self, line: usize) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = Box::new(self.parse_statement()?);
        self.expect(TokenKind::Else)?;
        let else_branch = Box::new(self.parse_statement()?);

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
            line,
        })
    }

    /// Parse while statement: while (cond) body
    fn parse_while_statement(&mut self, line: usize) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While {
            condition,
            body,
            line,
        })
    }
}
