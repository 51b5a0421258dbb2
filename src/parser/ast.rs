// AST (Abstract Syntax Tree) definitions for the Soo front-end

/// Stable identifier for AST nodes that carry annotation slots.
///
/// Only `Id`, `Call` and `Assign` nodes get one. The semantic pass keys its
/// side-table ([`crate::annotations::Annotations`]) by these ids, and the
/// constant folder carries them over unchanged.
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Types supported by the language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Int,
    ClassType(String), // Class name
}

/// A field, formal parameter or local variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub ty: Type,
    pub name: String,
    pub line: usize,
}

impl Declaration {
    pub fn new(ty: Type, name: impl Into<String>, line: usize) -> Self {
        Declaration {
            ty,
            name: name.into(),
            line,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Times,
    // Relational
    Lt,
    // Logical
    And,
}

impl BinOp {
    /// Surface spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Times => "*",
            BinOp::Lt => "<",
            BinOp::And => "&&",
        }
    }
}

/// Expression nodes
///
/// `line` is the provenance assigned by the parser: the line of the token that
/// completed the node, used by later diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
        line: usize,
    },
    Not {
        operand: Box<Expression>,
        line: usize,
    },

    // Literals
    Num(i32, usize),
    True(usize),
    False(usize),

    Id {
        id: NodeId,
        name: String,
        line: usize,
    },
    This(usize),
    NewObject {
        class: String,
        line: usize,
    },
    Call {
        id: NodeId,
        receiver: Box<Expression>,
        method: String,
        args: Vec<Expression>,
        line: usize,
    },
}

impl Expression {
    pub fn binary(op: BinOp, left: Expression, right: Expression, line: usize) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            line,
        }
    }

    /// Boolean literal node for `value`
    pub fn boolean(value: bool, line: usize) -> Self {
        if value {
            Expression::True(line)
        } else {
            Expression::False(line)
        }
    }

    /// Get the source line of this node
    pub fn line(&self) -> usize {
        match self {
            Expression::Binary { line, .. } => *line,
            Expression::Not { line, .. } => *line,
            Expression::Num(_, line) => *line,
            Expression::True(line) => *line,
            Expression::False(line) => *line,
            Expression::Id { line, .. } => *line,
            Expression::This(line) => *line,
            Expression::NewObject { line, .. } => *line,
            Expression::Call { line, .. } => *line,
        }
    }

    /// Overwrite the source line of this node.
    ///
    /// Used by the parser for parenthesized expressions and call arguments,
    /// which take the line of the token that follows them.
    pub(crate) fn set_line(&mut self, new_line: usize) {
        match self {
            Expression::Binary { line, .. }
            | Expression::Not { line, .. }
            | Expression::Num(_, line)
            | Expression::True(line)
            | Expression::False(line)
            | Expression::Id { line, .. }
            | Expression::This(line)
            | Expression::NewObject { line, .. }
            | Expression::Call { line, .. } => *line = new_line,
        }
    }

    /// Value of a `True`/`False` literal, `None` for anything else
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expression::True(_) => Some(true),
            Expression::False(_) => Some(false),
            _ => None,
        }
    }

    /// Value of a `Num` literal, `None` for anything else
    pub fn as_num(&self) -> Option<i32> {
        match self {
            Expression::Num(n, _) => Some(*n),
            _ => None,
        }
    }
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assign {
        id: NodeId,
        target: String,
        value: Expression,
        line: usize,
    },
    Block {
        statements: Vec<Statement>,
        line: usize,
    },
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Box<Statement>,
        line: usize,
    },
    Print {
        value: Expression,
        line: usize,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
        line: usize,
    },
}

impl Statement {
    /// Get the source line of this statement
    pub fn line(&self) -> usize {
        match self {
            Statement::Assign { line, .. } => *line,
            Statement::Block { line, .. } => *line,
            Statement::If { line, .. } => *line,
            Statement::Print { line, .. } => *line,
            Statement::While { line, .. } => *line,
        }
    }
}

/// Method definition. The trailing `return` expression is the only exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub return_type: Type,
    pub name: String,
    pub formals: Vec<Declaration>,
    pub locals: Vec<Declaration>,
    pub body: Vec<Statement>,
    pub return_expr: Expression,
    pub line: usize,
}

/// Class definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub base: Option<String>, // None when the class has no superclass
    pub fields: Vec<Declaration>,
    pub methods: Vec<Method>,
    pub line: usize,
}

/// The entry class: a name and the body of `main`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainClass {
    pub name: String,
    pub body: Statement,
    pub line: usize,
}

/// Top-level program structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub main_class: MainClass,
    pub classes: Vec<Class>,
}

impl Program {
    pub fn new(main_class: MainClass) -> Self {
        Program {
            main_class,
            classes: Vec::new(),
        }
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }
}
