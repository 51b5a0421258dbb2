//! Declaration parsing implementation
//!
//! Parses the structural parts of a program: the main class, class
//! definitions, methods, and variable declarations (fields, formals, locals).
//!
//! # Grammar
//!
//! ```text
//! main_class ::= 'class' id '{' 'public' 'static' 'void' 'main'
//!                '(' 'String' '[' ']' id ')' '{' statement '}' '}'
//! class      ::= 'class' id ['extends' id] '{' var_decl* method* '}'
//! var_decl   ::= type id ';'
//! method     ::= 'public' type id '(' [type id (',' type id)*] ')'
//!                '{' var_decl* statement* 'return' exp ';' '}'
//! type       ::= 'int' | 'boolean' | id
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse the main class, whose only member is `main`
    pub(crate) fn parse_main_class(&mut self) -> Result<MainClass, SyntaxError> {
        self.expect(TokenKind::Class)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LBrace)?;

        self.expect(TokenKind::Public)?;
        self.expect(TokenKind::Static)?;
        self.expect(TokenKind::Void)?;
        self.expect(TokenKind::Main)?;
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::String)?;
        self.expect(TokenKind::LBracket)?;
        self.expect(TokenKind::RBracket)?;
        self.expect_identifier()?;
        self.expect(TokenKind::RParen)?;

        self.expect(TokenKind::LBrace)?;
        let body = self.parse_statement()?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace)?;

        log::debug!("parsed main class '{}'", name.lexeme);
        Ok(MainClass {
            name: name.lexeme,
            body,
            line: name.location.line,
        })
    }

    /// Parse class definition: class Name [extends Base] { fields methods }
    pub(crate) fn parse_class(&mut self) -> Result<Class, SyntaxError> {
        self.expect(TokenKind::Class)?;
        let name = self.expect_identifier()?;

        let base = if self.match_token(TokenKind::Extends) {
            Some(self.expect_identifier()?.lexeme)
        } else {
            None
        };

        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while self.starts_type() {
            fields.push(self.parse_var_decl()?);
        }

        let mut methods = Vec::new();
        while self.check(TokenKind::Public) {
            methods.push(self.parse_method()?);
        }

        self.expect(TokenKind::RBrace)?;

        log::debug!(
            "parsed class '{}' ({} field(s), {} method(s))",
            name.lexeme,
            fields.len(),
            methods.len()
        );
        Ok(Class {
            name: name.lexeme,
            base,
            fields,
            methods,
            line: name.location.line,
        })
    }

    /// Parse method definition
    fn parse_method(&mut self) -> Result<Method, SyntaxError> {
        self.expect(TokenKind::Public)?;
        let return_type = self.parse_type()?;
        let name = self.expect_identifier()?;

        self.expect(TokenKind::LParen)?;
        let formals = self.parse_formal_list()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        // `Foo x;` and `x = e;` both start with an identifier; a second
        // identifier means a declaration.
        let mut locals = Vec::new();
        while self.starts_local_declaration() {
            locals.push(self.parse_var_decl()?);
        }

        let body = self.parse_block_statements()?;

        self.expect(TokenKind::Return)?;
        let return_expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        self.expect(TokenKind::RBrace)?;

        log::trace!("parsed method '{}'", name.lexeme);
        Ok(Method {
            return_type,
            name: name.lexeme,
            formals,
            locals,
            body,
            return_expr,
            line: name.location.line,
        })
    }

    /// Parse formal parameter list (without the parentheses)
    fn parse_formal_list(&mut self) -> Result<Vec<Declaration>, SyntaxError> {
        let mut formals = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(formals);
        }

        loop {
            let ty = self.parse_type()?;
            let name = self.expect_identifier()?;
            formals.push(Declaration::new(ty, name.lexeme, name.location.line));

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(formals)
    }

    /// Parse variable declaration: type name ;
    fn parse_var_decl(&mut self) -> Result<Declaration, SyntaxError> {
        let ty = self.parse_type()?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Declaration::new(ty, name.lexeme, name.location.line))
    }

    /// Parse type: int | boolean | ClassName
    fn parse_type(&mut self) -> Result<Type, SyntaxError> {
        if self.match_token(TokenKind::Int) {
            Ok(Type::Int)
        } else if self.match_token(TokenKind::Boolean) {
            Ok(Type::Boolean)
        } else {
            let class = self.expect_identifier()?;
            Ok(Type::ClassType(class.lexeme))
        }
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Int | TokenKind::Boolean | TokenKind::Id
        )
    }

    fn starts_local_declaration(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Int | TokenKind::Boolean => true,
            TokenKind::Id => self.peek_ahead_kind(1) == TokenKind::Id,
            _ => false,
        }
    }
}
