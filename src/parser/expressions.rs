//! Expression parsing implementation
//!
//! Precedence is encoded entirely in the call structure: each level parses
//! operands with the next tighter level and loops over its own operators.
//! There is no precedence table.
//!
//! # Precedence (tightest first)
//!
//! 1. atoms: `( e )`, integer literals, `true`, `false`, `this`, identifiers, `new C()`
//! 2. postfix method calls: `e.m(args)`, chained left to right
//! 3. prefix `!` (an even number of `!` cancels out)
//! 4. `*`
//! 5. `+` `-`
//! 6. `<`
//! 7. `&&`
//!
//! All binary levels are left-associative.
//!
//! # Line numbers
//!
//! `*` nodes take the line of their right operand, while `+`, `-`, `<` and `&&`
//! take the line of their left operand. A parenthesized expression and every
//! call argument are re-stamped with the line of the token that follows them.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_logical_and()
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_relational()?;

        while self.match_token(TokenKind::AndAnd) {
            let right = self.parse_relational()?;
            let line = left.line();
            left = Expression::binary(BinOp::And, left, right, line);
        }

        Ok(left)
    }

    /// Parse relational (<)
    fn parse_relational(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_additive()?;

        while self.match_token(TokenKind::Lt) {
            let right = self.parse_additive()?;
            let line = left.line();
            left = Expression::binary(BinOp::Lt, left, right, line);
        }

        Ok(left)
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();

            let right = self.parse_multiplicative()?;
            let line = left.line();
            left = Expression::binary(op, left, right, line);
        }

        Ok(left)
    }

    /// Parse multiplicative (*)
    fn parse_multiplicative(&mut self) -> Result<Expression, SyntaxError> {
        let mut left = self.parse_unary()?;

        while self.match_token(TokenKind::Star) {
            let right = self.parse_unary()?;
            let line = right.line();
            left = Expression::binary(BinOp::Times, left, right, line);
        }

        Ok(left)
    }

    /// Parse prefix negation.
    ///
    /// The `!` tokens are counted rather than nested: an even count yields the
    /// operand itself and an odd count yields exactly one `Not`.
    fn parse_unary(&mut self) -> Result<Expression, SyntaxError> {
        let mut bangs = 0usize;
        while self.match_token(TokenKind::Bang) {
            bangs += 1;
        }

        let operand = self.parse_postfix()?;
        if bangs % 2 == 0 {
            return Ok(operand);
        }

        let line = operand.line();
        Ok(Expression::Not {
            operand: Box::new(operand),
            line,
        })
    }

    /// Parse postfix method calls: atom ('.' id '(' args ')')*
    fn parse_postfix(&mut self) -> Result<Expression, SyntaxError> {
        let mut expr = self.parse_primary()?;

        while self.match_token(TokenKind::Dot) {
            let method = self.expect_identifier()?;
            self.expect(TokenKind::LParen)?;
            let args = self.parse_argument_list()?;
            self.expect(TokenKind::RParen)?;

            expr = Expression::Call {
                id: self.fresh_node_id(),
                receiver: Box::new(expr),
                method: method.lexeme,
                args,
                line: method.location.line,
            };
        }

        Ok(expr)
    }

    /// Parse primary expression (atoms)
    fn parse_primary(&mut self) -> Result<Expression, SyntaxError> {
        let line = self.current_line();

        match self.peek_kind() {
            TokenKind::LParen => {
                self.advance();
                let mut expr = self.parse_expression()?;
                expr.set_line(self.current_line());
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Num => {
                let token = self.advance();
                let value = token
                    .lexeme
                    .parse::<i32>()
                    .map_err(|_| SyntaxError::InvalidInteger {
                        lexeme: token.lexeme.clone(),
                        line,
                    })?;
                Ok(Expression::Num(value, line))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::True(line))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::False(line))
            }
            TokenKind::This => {
                self.advance();
                Ok(Expression::This(line))
            }
            TokenKind::Id => {
                let token = self.advance();
                Ok(Expression::Id {
                    id: self.fresh_node_id(),
                    name: token.lexeme,
                    line,
                })
            }
            TokenKind::New => {
                self.advance();
                let class = self.expect_identifier()?;
                self.expect(TokenKind::LParen)?;
                self.expect(TokenKind::RParen)?;
                Ok(Expression::NewObject {
                    class: class.lexeme,
                    line: class.location.line,
                })
            }
            found => Err(SyntaxError::UnrecognizedAtom { found, line }),
        }
    }

    /// Parse call arguments: empty, or comma-separated expressions
    fn parse_argument_list(&mut self) -> Result<Vec<Expression>, SyntaxError> {
        let mut args = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            let mut arg = self.parse_expression()?;
            arg.set_line(self.current_line());
            args.push(arg);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        Parser::new(source)
            .unwrap()
            .parse_standalone_expression()
            .unwrap()
    }

    fn parse_err(source: &str) -> SyntaxError {
        Parser::new(source)
            .unwrap()
            .parse_standalone_expression()
            .unwrap_err()
    }

    #[test]
    fn test_times_binds_tighter_than_add() {
        assert_eq!(
            parse("1+2*3"),
            Expression::binary(
                BinOp::Add,
                Expression::Num(1, 1),
                Expression::binary(BinOp::Times, Expression::Num(2, 1), Expression::Num(3, 1), 1),
                1,
            )
        );
    }

    #[test]
    fn test_additive_is_left_associative() {
        match parse("1 - 2 + 3") {
            Expression::Binary {
                op: BinOp::Add,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expression::Binary { op: BinOp::Sub, .. }));
                assert_eq!(*right, Expression::Num(3, 1));
            }
            other => panic!("Expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_and_is_loosest() {
        match parse("1 < 2 && 3 + 4 < 5") {
            Expression::Binary {
                op: BinOp::And,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expression::Binary { op: BinOp::Lt, .. }));
                assert!(matches!(*right, Expression::Binary { op: BinOp::Lt, .. }));
            }
            other => panic!("Expected && at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_negation_parity() {
        assert_eq!(parse("!!true"), Expression::True(1));
        assert_eq!(parse("!!!!true"), Expression::True(1));
        assert_eq!(
            parse("!!!true"),
            Expression::Not {
                operand: Box::new(Expression::True(1)),
                line: 1,
            }
        );
    }

    #[test]
    fn test_not_binds_tighter_than_times() {
        match parse("!a * b") {
            Expression::Binary {
                op: BinOp::Times,
                left,
                ..
            } => assert!(matches!(*left, Expression::Not { .. })),
            other => panic!("Expected * at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_not_takes_operand_line() {
        let expr = parse("!\n\nx");
        assert!(matches!(expr, Expression::Not { line: 3, .. }));
    }

    #[test]
    fn test_call_chain_nests_left_to_right() {
        match parse("a.f().g(1, b)") {
            Expression::Call {
                receiver,
                method,
                args,
                ..
            } => {
                assert_eq!(method, "g");
                assert_eq!(args.len(), 2);
                assert!(matches!(*receiver, Expression::Call { ref method, .. } if method == "f"));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_new_object() {
        assert_eq!(
            parse("new Foo()"),
            Expression::NewObject {
                class: "Foo".to_string(),
                line: 1,
            }
        );
    }

    #[test]
    fn test_times_line_comes_from_right_operand() {
        assert_eq!(parse("1\n*\n2").line(), 3);
    }

    #[test]
    fn test_add_line_comes_from_left_operand() {
        assert_eq!(parse("1\n+\n2").line(), 1);
        assert_eq!(parse("1\n<\n2").line(), 1);
        assert_eq!(parse("true\n&&\nfalse").line(), 1);
    }

    #[test]
    fn test_parenthesized_takes_closing_line() {
        assert_eq!(parse("(1 + 2\n\n)").line(), 3);
    }

    #[test]
    fn test_argument_takes_following_token_line() {
        match parse("a.m(1\n, 2\n\n)") {
            Expression::Call { args, line, .. } => {
                assert_eq!(line, 1);
                assert_eq!(args[0].line(), 2);
                assert_eq!(args[1].line(), 4);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(
            parse_err("(1 + 2;"),
            SyntaxError::Mismatch {
                expected: TokenKind::RParen,
                found: TokenKind::Semicolon,
                line: 1,
            }
        );
    }

    #[test]
    fn test_unrecognized_atom() {
        assert_eq!(
            parse_err("1 + *"),
            SyntaxError::UnrecognizedAtom {
                found: TokenKind::Star,
                line: 1,
            }
        );
    }

    #[test]
    fn test_node_ids_are_distinct() {
        match parse("a.m(b)") {
            Expression::Call { id, receiver, args, .. } => {
                let Expression::Id { id: recv_id, .. } = *receiver else {
                    panic!("Expected identifier receiver");
                };
                let Expression::Id { id: arg_id, .. } = args[0] else {
                    panic!("Expected identifier argument");
                };
                assert_ne!(id, recv_id);
                assert_ne!(id, arg_id);
                assert_ne!(recv_id, arg_id);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }
}
