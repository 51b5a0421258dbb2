//! Source rendering for AST nodes
//!
//! Every node implements [`fmt::Display`] and prints back as Soo source.
//! Binary operands of binary operators, of `!` and of a call receiver are
//! wrapped in parentheses (as is a negated receiver), so printed output
//! re-parses to the same shape.
//! Negative literals, which only folding produces, print as a subtraction
//! from zero.
//! Nested statements are indented four spaces per level.

use crate::parser::ast::*;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => write!(f, "boolean"),
            Type::Int => write!(f, "int"),
            Type::ClassType(name) => write!(f, "{}", name),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// Write `expr`, parenthesized when it is a binary expression
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression) -> fmt::Result {
    if matches!(expr, Expression::Binary { .. }) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Binary {
                op, left, right, ..
            } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
            Expression::Not { operand, .. } => {
                write!(f, "!")?;
                write_operand(f, operand)
            }
            // No unary minus in the grammar
            Expression::Num(i32::MIN, _) => write!(f, "(0 - {} - 1)", i32::MAX),
            Expression::Num(n, _) if *n < 0 => write!(f, "(0 - {})", n.unsigned_abs()),
            Expression::Num(n, _) => write!(f, "{}", n),
            Expression::True(_) => write!(f, "true"),
            Expression::False(_) => write!(f, "false"),
            Expression::Id { name, .. } => write!(f, "{}", name),
            Expression::This(_) => write!(f, "this"),
            Expression::NewObject { class, .. } => write!(f, "new {}()", class),
            Expression::Call {
                receiver,
                method,
                args,
                ..
            } => {
                if matches!(**receiver, Expression::Not { .. }) {
                    write!(f, "({})", receiver)?;
                } else {
                    write_operand(f, receiver)?;
                }
                write!(f, ".{}(", method)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Forwards output, indenting every line after the first by `levels`
struct Indented<'a, 'b> {
    inner: &'a mut fmt::Formatter<'b>,
    levels: usize,
    at_line_start: bool,
}

impl<'a, 'b> Indented<'a, 'b> {
    fn new(inner: &'a mut fmt::Formatter<'b>, levels: usize) -> Self {
        Indented {
            inner,
            levels,
            at_line_start: false,
        }
    }
}

impl Write for Indented<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for piece in s.split_inclusive('\n') {
            // blank lines stay empty
            if self.at_line_start && piece != "\n" {
                for _ in 0..self.levels {
                    self.inner.write_str(INDENT)?;
                }
            }
            self.inner.write_str(piece)?;
            self.at_line_start = piece.ends_with('\n');
        }
        Ok(())
    }
}

/// Write a nested statement on its own indented line
fn write_nested(f: &mut fmt::Formatter<'_>, stmt: &Statement, levels: usize) -> fmt::Result {
    writeln!(f)?;
    for _ in 0..levels {
        f.write_str(INDENT)?;
    }
    write!(Indented::new(f, levels), "{}", stmt)
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign { target, value, .. } => write!(f, "{} = {};", target, value),
            Statement::Block { statements, .. } => {
                write!(f, "{{")?;
                for stmt in statements {
                    write_nested(f, stmt, 1)?;
                }
                write!(f, "\n}}")
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                write!(f, "if ({})", condition)?;
                write_nested(f, then_branch, 1)?;
                write!(f, "\nelse")?;
                write_nested(f, else_branch, 1)
            }
            Statement::Print { value, .. } => write!(f, "System.out.println({});", value),
            Statement::While {
                condition, body, ..
            } => {
                write!(f, "while ({})", condition)?;
                write_nested(f, body, 1)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "public {} {}(", self.return_type, self.name)?;
        for (i, formal) in self.formals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", formal)?;
        }
        write!(f, ") {{")?;
        for local in &self.locals {
            write!(f, "\n{}{};", INDENT, local)?;
        }
        for stmt in &self.body {
            write_nested(f, stmt, 1)?;
        }
        write!(f, "\n{}return {};\n}}", INDENT, self.return_expr)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(base) = &self.base {
            write!(f, " extends {}", base)?;
        }
        write!(f, " {{")?;
        for field in &self.fields {
            write!(f, "\n{}{};", INDENT, field)?;
        }
        for method in &self.methods {
            writeln!(f)?;
            write!(f, "{}", INDENT)?;
            write!(Indented::new(f, 1), "{}", method)?;
        }
        write!(f, "\n}}")
    }
}

impl fmt::Display for MainClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} {{", self.name)?;
        write!(f, "\n{}public static void main(String[] args) {{", INDENT)?;
        write_nested(f, &self.body, 2)?;
        write!(f, "\n{}}}\n}}", INDENT)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.main_class)?;
        for class in &self.classes {
            write!(f, "\n\n{}", class)?;
        }
        writeln!(f)
    }
}
