//! AST node definitions for the IL language.
//!
//! `Expression` and `Statement` are tagged variants rather than a class
//! hierarchy: every variant carries its own span, and behavior attaches
//! via free functions in the downstream crates (`ilc-sem`, `ilc-opt`,
//! `ilc-gen`) instead of virtual methods on the node types.

use ilc_util::{Span, Symbol};

/// A complete compilation unit: an ordered sequence of top-level statements.
pub type Program = Vec<Statement>;

/// A type as written in source (before the symbol table resolves
/// user-defined names into `ilc_sem::Type`).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Simple(Symbol),
    Array { element: Box<TypeExpr>, size: i32 },
    Record(Vec<RecordField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: Symbol,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntegerLit(i32, Span),
    RealLit(f64, Span),
    BooleanLit(bool, Span),
    StringLit(String, Span),
    VarRef(Symbol, Span),
    ArrayAccess {
        name: Symbol,
        index: Box<Expression>,
        span: Span,
    },
    RecordAccess {
        record: Box<Expression>,
        field: Symbol,
        span: Span,
    },
    Unary {
        op: UnOp,
        operand: Box<Expression>,
        span: Span,
    },
    Binary {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
        span: Span,
    },
    RoutineCall {
        name: Symbol,
        args: Vec<Expression>,
        span: Span,
    },
    TypeCast {
        expr: Box<Expression>,
        target_type: TypeExpr,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::IntegerLit(_, s)
            | Expression::RealLit(_, s)
            | Expression::BooleanLit(_, s)
            | Expression::StringLit(_, s)
            | Expression::VarRef(_, s)
            | Expression::ArrayAccess { span: s, .. }
            | Expression::RecordAccess { span: s, .. }
            | Expression::Unary { span: s, .. }
            | Expression::Binary { span: s, .. }
            | Expression::RoutineCall { span: s, .. }
            | Expression::TypeCast { span: s, .. } => *s,
        }
    }
}

/// An assignment's left-hand side: a bare variable, an array slot, or a
/// dotted record field.
#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    Var(Symbol),
    Index(Symbol, Box<Expression>),
    Field(Symbol, Symbol),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VarDecl {
        name: Symbol,
        ty: TypeExpr,
        init: Option<Expression>,
        span: Span,
    },
    ArrayDecl {
        name: Symbol,
        ty: TypeExpr,
        span: Span,
    },
    TypeDecl {
        name: Symbol,
        ty: TypeExpr,
        span: Span,
    },
    RoutineDecl {
        name: Symbol,
        params: Vec<Param>,
        return_type: Option<TypeExpr>,
        body: Vec<Statement>,
        span: Span,
    },
    Assignment {
        target: LValue,
        value: Expression,
        span: Span,
    },
    IfStmt {
        cond: Expression,
        then_branch: Vec<Statement>,
        else_branch: Option<Vec<Statement>>,
        span: Span,
    },
    WhileStmt {
        cond: Expression,
        body: Vec<Statement>,
        span: Span,
    },
    ForLoop {
        var: Symbol,
        reverse: bool,
        start: Expression,
        end: Expression,
        body: Vec<Statement>,
        span: Span,
    },
    PrintStmt {
        expr: Expression,
        span: Span,
    },
    ReadStmt {
        var: Symbol,
        span: Span,
    },
    ReturnStmt {
        expr: Option<Expression>,
        span: Span,
    },
    RoutineCallStmt {
        name: Symbol,
        args: Vec<Expression>,
        span: Span,
    },
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::VarDecl { span, .. }
            | Statement::ArrayDecl { span, .. }
            | Statement::TypeDecl { span, .. }
            | Statement::RoutineDecl { span, .. }
            | Statement::Assignment { span, .. }
            | Statement::IfStmt { span, .. }
            | Statement::WhileStmt { span, .. }
            | Statement::ForLoop { span, .. }
            | Statement::PrintStmt { span, .. }
            | Statement::ReadStmt { span, .. }
            | Statement::ReturnStmt { span, .. }
            | Statement::RoutineCallStmt { span, .. } => *span,
        }
    }
}
