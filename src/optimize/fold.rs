//! Constant folding
//!
//! A single depth-first pass that replaces sub-expressions with `Num`, `True`
//! or `False` literals when their operands are literals.
//!
//! # Rules
//!
//! - Binary nodes fold their left operand first. When it is not a literal of
//!   the right kind the node is returned as written and the right operand is
//!   **not** visited.
//! - With a literal left, the right operand is folded. Two literals become one
//!   literal carrying the right operand's line; otherwise the node is rebuilt
//!   from the folded operands, also with the right operand's line.
//! - `&&` rebuilds its left side as a fresh literal on the right operand's line.
//! - `!` becomes a literal only when its operand folds to `true`/`false`;
//!   otherwise the original `Not` is kept around the original operand.
//! - Call arguments are folded one by one; the receiver is left alone.
//! - "As written" still carries folded arguments for every call the pass
//!   reached inside that subtree: the left operand, the right operand once
//!   the left was a literal, and the operand of `!`. Receivers and skipped
//!   right operands are copied untouched.
//! - Statements are folded structurally. Both branches of an `if` are always
//!   kept, even when the condition folds to a literal.
//!
//! Arithmetic wraps on overflow (32-bit two's complement).
//!
//! Folding runs before type checking, so ill-typed operands such as `true + 1`
//! or `!5` can show up here. A literal of the wrong kind counts as
//! non-constant and the node is left for semantic analysis to reject.

use crate::parser::ast::*;

/// Constant folding pass.
///
/// Stateless; every method returns a new tree and leaves its input untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFolder;

impl ConstantFolder {
    pub fn new() -> Self {
        ConstantFolder
    }

    /// Fold the main class, then every class in order
    pub fn fold_program(&self, program: &Program) -> Program {
        let main_class = self.fold_main_class(&program.main_class);
        let classes = program
            .classes
            .iter()
            .map(|class| self.fold_class(class))
            .collect();

        log::debug!(
            "folded constants in '{}' and {} class(es)",
            program.main_class.name,
            program.classes.len()
        );
        Program {
            main_class,
            classes,
        }
    }

    pub fn fold_main_class(&self, main_class: &MainClass) -> MainClass {
        MainClass {
            name: main_class.name.clone(),
            body: self.fold_statement(&main_class.body),
            line: main_class.line,
        }
    }

    pub fn fold_class(&self, class: &Class) -> Class {
        Class {
            name: class.name.clone(),
            base: class.base.clone(),
            fields: class.fields.clone(),
            methods: class
                .methods
                .iter()
                .map(|method| self.fold_method(method))
                .collect(),
            line: class.line,
        }
    }

    /// Fold every body statement, then the return expression
    pub fn fold_method(&self, method: &Method) -> Method {
        let body = method
            .body
            .iter()
            .map(|stmt| self.fold_statement(stmt))
            .collect();
        let return_expr = self.fold_expression(&method.return_expr);

        Method {
            return_type: method.return_type.clone(),
            name: method.name.clone(),
            formals: method.formals.clone(),
            locals: method.locals.clone(),
            body,
            return_expr,
            line: method.line,
        }
    }

    pub fn fold_statement(&self, stmt: &Statement) -> Statement {
        match stmt {
            Statement::Assign {
                id,
                target,
                value,
                line,
            } => Statement::Assign {
                id: *id,
                target: target.clone(),
                value: self.fold_expression(value),
                line: *line,
            },
            Statement::Block { statements, line } => Statement::Block {
                statements: statements.iter().map(|s| self.fold_statement(s)).collect(),
                line: *line,
            },
            // No dead-branch elimination: both branches survive.
            Statement::If {
                condition,
                then_branch,
                else_branch,
                line,
            } => Statement::If {
                condition: self.fold_expression(condition),
                then_branch: Box::new(self.fold_statement(then_branch)),
                else_branch: Box::new(self.fold_statement(else_branch)),
                line: *line,
            },
            Statement::Print { value, line } => Statement::Print {
                value: self.fold_expression(value),
                line: *line,
            },
            Statement::While {
                condition,
                body,
                line,
            } => Statement::While {
                condition: self.fold_expression(condition),
                body: Box::new(self.fold_statement(body)),
                line: *line,
            },
        }
    }

    pub fn fold_expression(&self, expr: &Expression) -> Expression {
        self.visit(expr).folded
    }

    fn visit(&self, expr: &Expression) -> Visit {
        match expr {
            Expression::Binary {
                op,
                left,
                right,
                line,
            } => self.visit_binary(*op, left, right, *line),
            Expression::Not { operand, line } => {
                let operand = self.visit(operand);
                let written = Expression::Not {
                    operand: Box::new(operand.written),
                    line: *line,
                };
                let folded = match operand.folded.as_bool() {
                    Some(value) => Expression::boolean(!value, operand.folded.line()),
                    None => written.clone(),
                };
                Visit { folded, written }
            }
            Expression::Call {
                id,
                receiver,
                method,
                args,
                line,
            } => Visit::same(Expression::Call {
                id: *id,
                receiver: receiver.clone(),
                method: method.clone(),
                args: args.iter().map(|arg| self.fold_expression(arg)).collect(),
                line: *line,
            }),
            Expression::Num(..)
            | Expression::True(_)
            | Expression::False(_)
            | Expression::Id { .. }
            | Expression::This(_)
            | Expression::NewObject { .. } => Visit::same(expr.clone()),
        }
    }

    fn visit_binary(
        &self,
        op: BinOp,
        left: &Expression,
        right: &Expression,
        line: usize,
    ) -> Visit {
        let left = self.visit(left);
        let left_is_constant = match op {
            BinOp::And => left.folded.as_bool().is_some(),
            _ => left.folded.as_num().is_some(),
        };

        // Right operand is never visited behind a non-constant left.
        if !left_is_constant {
            return Visit::same(Expression::binary(op, left.written, right.clone(), line));
        }

        let right = self.visit(right);
        let folded = self.combine(op, &left.folded, right.folded);
        Visit {
            folded,
            written: Expression::binary(op, left.written, right.written, line),
        }
    }

    /// Combine a literal left operand with the folded right operand
    fn combine(&self, op: BinOp, left: &Expression, right: Expression) -> Expression {
        let line = right.line();
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Times => {
                let (Some(a), Some(b)) = (left.as_num(), right.as_num()) else {
                    return Expression::binary(op, left.clone(), right, line);
                };
                let value = match op {
                    BinOp::Add => a.wrapping_add(b),
                    BinOp::Sub => a.wrapping_sub(b),
                    _ => a.wrapping_mul(b),
                };
                log::trace!("folded {} {} {} to {} (line {})", a, op.symbol(), b, value, line);
                Expression::Num(value, line)
            }
            BinOp::Lt => match (left.as_num(), right.as_num()) {
                (Some(a), Some(b)) => {
                    log::trace!("folded {} < {} (line {})", a, b, line);
                    Expression::boolean(a < b, line)
                }
                _ => Expression::binary(op, left.clone(), right, line),
            },
            BinOp::And => match (left.as_bool(), right.as_bool()) {
                (Some(p), Some(q)) => {
                    log::trace!("folded {} && {} (line {})", p, q, line);
                    Expression::boolean(p && q, line)
                }
                (Some(p), None) => {
                    Expression::binary(op, Expression::boolean(p, line), right, line)
                }
                _ => Expression::binary(op, left.clone(), right, line),
            },
        }
    }
}

/// Outcome of visiting one expression
struct Visit {
    /// The folded expression
    folded: Expression,
    /// The expression as written, except that every call reached on the way
    /// carries its folded arguments
    written: Expression,
}

impl Visit {
    fn same(expr: Expression) -> Self {
        Visit {
            folded: expr.clone(),
            written: expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Expression {
        Parser::new(source)
            .unwrap()
            .parse_standalone_expression()
            .unwrap()
    }

    fn fold(source: &str) -> Expression {
        ConstantFolder::new().fold_expression(&parse(source))
    }

    #[test]
    fn test_precedence_example_folds_to_seven() {
        assert_eq!(fold("1+2*3"), Expression::Num(7, 1));
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(fold("2147483647 + 1"), Expression::Num(i32::MIN, 1));
        assert_eq!(fold("0 - 2147483647 - 2"), Expression::Num(i32::MAX, 1));
        assert_eq!(fold("65536 * 65536"), Expression::Num(0, 1));
    }

    #[test]
    fn test_not_of_literal() {
        assert_eq!(fold("!true"), Expression::False(1));
        assert_eq!(fold("!(1 < 2)"), Expression::False(1));
    }

    #[test]
    fn test_not_of_non_literal_is_kept_as_written() {
        let original = parse("!(x && (true && false))");
        assert_eq!(ConstantFolder::new().fold_expression(&original), original);
    }

    #[test]
    fn test_relational_folds() {
        assert_eq!(fold("1 < 2"), Expression::True(1));
        assert_eq!(fold("3 < 2"), Expression::False(1));
    }

    #[test]
    fn test_and_truth_table() {
        assert_eq!(fold("true && true"), Expression::True(1));
        assert_eq!(fold("true && false"), Expression::False(1));
        assert_eq!(fold("false && true"), Expression::False(1));
        assert_eq!(fold("false && false"), Expression::False(1));
    }

    #[test]
    fn test_non_constant_left_skips_right() {
        for source in ["x + (1 + 2)", "x < 1 + 2", "b && (true && false)"] {
            let original = parse(source);
            assert_eq!(ConstantFolder::new().fold_expression(&original), original, "{}", source);
        }
    }

    #[test]
    fn test_constant_left_rebuilds_with_folded_right() {
        match fold("(1 + 2) * y") {
            Expression::Binary {
                op: BinOp::Times,
                left,
                right,
                ..
            } => {
                assert_eq!(*left, Expression::Num(3, 1));
                assert!(matches!(*right, Expression::Id { ref name, .. } if name == "y"));
            }
            other => panic!("Expected rebuilt multiplication, got {:?}", other),
        }
    }

    #[test]
    fn test_and_rebuilds_left_literal_on_right_line() {
        match fold("(true && true)\n&&\nflag") {
            Expression::Binary {
                op: BinOp::And,
                left,
                right,
                line,
            } => {
                assert_eq!(*left, Expression::True(3));
                assert_eq!(right.line(), 3);
                assert_eq!(line, 3);
            }
            other => panic!("Expected rebuilt &&, got {:?}", other),
        }
    }

    #[test]
    fn test_folded_literal_takes_right_line() {
        assert_eq!(fold("1 +\n2").line(), 2);
        assert_eq!(fold("1 <\n\n2").line(), 3);
    }

    #[test]
    fn test_ill_typed_literals_are_left_alone() {
        for source in ["true + 1", "1 + true", "1 && true", "true < 2", "!5"] {
            let original = parse(source);
            assert_eq!(ConstantFolder::new().fold_expression(&original), original, "{}", source);
        }
    }

    #[test]
    fn test_call_folds_arguments_only() {
        match fold("a.m(1 + 2, x, (1 < 0) && b)") {
            Expression::Call {
                receiver,
                method,
                args,
                ..
            } => {
                assert!(matches!(*receiver, Expression::Id { ref name, .. } if name == "a"));
                assert_eq!(method, "m");
                assert_eq!(args[0], Expression::Num(3, 1));
                assert!(matches!(args[1], Expression::Id { ref name, .. } if name == "x"));
                assert!(matches!(
                    args[2],
                    Expression::Binary {
                        op: BinOp::And,
                        ref left,
                        ..
                    } if **left == Expression::False(1)
                ));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_receiver_is_not_folded() {
        let folded = fold("a.f(1 + 1).g(2 * 2)");
        let Expression::Call { receiver, args, .. } = folded else {
            panic!("Expected call");
        };
        assert_eq!(args, vec![Expression::Num(4, 1)]);
        let Expression::Call { args: inner_args, .. } = *receiver else {
            panic!("Expected inner call");
        };
        // the receiver is carried over untouched, arguments included
        assert!(matches!(inner_args[0], Expression::Binary { op: BinOp::Add, .. }));
    }

    #[test]
    fn test_if_keeps_both_branches() {
        let stmt = Parser::new("if (true) x = 1 + 1; else y = 2 * 3;")
            .unwrap()
            .parse_statement()
            .unwrap();
        match ConstantFolder::new().fold_statement(&stmt) {
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(condition, Expression::True(1));
                assert!(matches!(*then_branch, Statement::Assign { value: Expression::Num(2, _), .. }));
                assert!(matches!(*else_branch, Statement::Assign { value: Expression::Num(6, _), .. }));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_unfolded_subtree_keeps_folded_call_arguments() {
        let cases = [
            ("!o.m(1 + 2)", "!o.m(3)"),
            ("o.m(1 + 2) + 1", "o.m(3) + 1"),
            ("o.m(2 * 2) < x", "o.m(4) < x"),
            ("!(1 + o.m(2 + 3))", "!(1 + o.m(5))"),
            ("!a.f(1 + 1).g(2 * 2)", "!a.f(1 + 1).g(4)"),
        ];
        for (source, expected) in cases {
            assert_eq!(fold(source).to_string(), expected, "{}", source);
        }
    }

    #[test]
    fn test_skipped_right_operand_keeps_its_calls() {
        let original = parse("o.m(1 + 2) + p.n(3 * 4)");
        match ConstantFolder::new().fold_expression(&original) {
            Expression::Binary { left, right, line, .. } => {
                assert!(matches!(*left, Expression::Call { ref args, .. } if args[0] == Expression::Num(3, 1)));
                assert_eq!(right, match original {
                    Expression::Binary { right, .. } => right,
                    _ => unreachable!(),
                });
                assert_eq!(line, 1);
            }
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_call_ids_survive_in_unfolded_subtree() {
        let original = parse("!o.m(1 + 2)");
        let Expression::Not { operand, .. } = &original else {
            panic!("Expected not");
        };
        let Expression::Call { id, .. } = **operand else {
            panic!("Expected call");
        };
        match fold("!o.m(1 + 2)") {
            Expression::Not { operand, .. } => {
                assert!(matches!(*operand, Expression::Call { id: folded_id, .. } if folded_id == id))
            }
            other => panic!("Expected not, got {:?}", other),
        }
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let original = parse("1 + 2");
        let copy = original.clone();
        let _ = ConstantFolder::new().fold_expression(&original);
        assert_eq!(original, copy);
    }
}
