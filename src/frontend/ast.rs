//! AST for the scar language.
//!
//! The node set is closed: statements and expressions are tagged enums and
//! every phase matches on them exhaustively, so adding a node kind is a
//! compile-time-visible change. Composite nodes own their children outright
//! (`Box`/`Vec`), the tree has no sharing and no cycles, and everything lives
//! until the [`Module`] root is dropped.
//!
//! Expressions carry a [`TypeInfo`] that starts as `Invalid`; the verifier
//! resolves it in place before codegen walks the tree.

use crate::frontend::intern::StringId;
use crate::frontend::types::TypeInfo;

/// A half-open byte range in the source, used for diagnostics and exact-text
/// extraction. Spans are cheap value types and never mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Root of one compilation unit.
#[derive(Debug)]
pub struct Module {
    pub functions: Vec<Function>,
    pub span: Span,
}

/// A function definition, or a forward declaration when `body` is `None`.
#[derive(Debug)]
pub struct Function {
    pub proto: FunctionPrototype,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug)]
pub struct FunctionPrototype {
    pub name: StringId,
    pub params: Vec<Param>,
    /// Omitted return type parses as `Void`.
    pub return_type: TypeInfo,
    pub span: Span,
}

#[derive(Debug)]
pub struct Param {
    pub name: StringId,
    pub ty: TypeInfo,
    pub span: Span,
}

#[derive(Debug)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum StmtKind {
    Var(VarDecl),
    Branch(Branch),
    For(ForLoop),
    While(WhileLoop),
    Continue,
    Break,
    Return(Option<Expr>),
    Expr(Expr),
    /// A bare `;`.
    Empty,
}

/// `var name: type (= init)?;`
///
/// A missing initializer is desugared by the parser to the zero literal of
/// the declared type, so the verifier and codegen always see an initializer.
#[derive(Debug)]
pub struct VarDecl {
    pub name: StringId,
    pub declared_type: TypeInfo,
    pub init: Expr,
}

/// `if (cond) block else block`. A missing `else` parses as an implicit
/// empty block.
#[derive(Debug)]
pub struct Branch {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Block,
}

#[derive(Debug)]
pub struct ForLoop {
    pub init: Option<Expr>,
    pub cond: Expr,
    pub update: Option<Expr>,
    pub body: Block,
}

/// `while (cond) block`. `loop block` desugars to `while (true) block`.
#[derive(Debug)]
pub struct WhileLoop {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Resolved by the verifier; `Invalid` until then.
    pub ty: TypeInfo,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: TypeInfo::Invalid,
        }
    }
}

#[derive(Debug)]
pub enum ExprKind {
    Bool(bool),
    Int(u64),
    Float(f64),
    Str(StringId),
    Char(char),
    /// Variable read (or assignment target on the left of `=`).
    Var(StringId),
    Call {
        callee: StringId,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Suffix `as type`.
    Cast {
        operand: Box<Expr>,
        target: TypeInfo,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Prefix `+`.
    Plus,
    /// Prefix `-`.
    Neg,
    /// Logical `!`.
    Not,
    /// Bitwise `~`.
    BitNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Binding strength used by precedence climbing; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Assign => 1,
            BinaryOp::Or => 2,
            BinaryOp::And => 3,
            BinaryOp::BitOr => 4,
            BinaryOp::BitXor => 5,
            BinaryOp::BitAnd => 6,
            BinaryOp::Eq | BinaryOp::Ne => 7,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 8,
            BinaryOp::Add | BinaryOp::Sub => 10,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 11,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinaryOp::Assign)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::BitAnd)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}
