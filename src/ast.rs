//! Language-neutral AST shared by every front end and generator.
//!
//! Nodes are pure data: no behavior beyond structural equality and a
//! [`AstNode::kind`] name used in diagnostics. Type names are carried as the
//! source language spelled them and are mapped per target at generation time.

use std::fmt;

/// Binary operators, shared verbatim across all three languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        };
        write!(f, "{}", s)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
    BitNot,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
            UnOp::BitNot => "~",
        };
        write!(f, "{}", s)
    }
}

/// Loop-update forms (`i++`, `i--`, `i += e`, `i -= e`, `i = e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Inc,
    Dec,
    AddAssign,
    SubAssign,
    Set,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: String,
    pub name: String,
    pub is_array: bool,
}

/// One `if`/`else if` arm. Chains are flattened into a branch list at parse
/// time and never nest.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub cond: AstNode,
    pub body: Vec<AstNode>,
}

/// One arm of a `switch`.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchCase {
    Case { value: AstNode, body: Vec<AstNode> },
    Default { body: Vec<AstNode> },
}

/// A data member of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: String,
    pub name: String,
}

/// A constructor: parameters, field-initializer list, then body statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Ctor {
    pub params: Vec<Param>,
    pub field_inits: Vec<(String, AstNode)>,
    pub body: Vec<AstNode>,
}

/// A class method.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<AstNode>,
    pub is_virtual: bool,
}

/// All statement and expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Top-level
    Function {
        return_type: String,
        name: String,
        params: Vec<Param>,
        body: Vec<AstNode>,
        is_entry: bool,
    },
    Define {
        name: String,
        value: String,
    },

    // Declarations
    VarDecl {
        ty: String,
        name: String,
        init: Option<Box<AstNode>>,
    },
    /// Exactly one of `size` and `init` is `Some`; the parsers enforce it.
    ArrayDecl {
        ty: String,
        name: String,
        size: Option<Box<AstNode>>,
        init: Option<Vec<AstNode>>,
    },
    ArrayDecl2D {
        ty: String,
        name: String,
        rows: Box<AstNode>,
        cols: Box<AstNode>,
    },

    // Assignments
    Assign {
        name: String,
        value: Box<AstNode>,
    },
    CompoundAssign {
        name: String,
        op: BinOp,
        value: Box<AstNode>,
    },
    ArrayAssign {
        name: String,
        index: Box<AstNode>,
        value: Box<AstNode>,
    },
    ArrayAssign2D {
        name: String,
        row: Box<AstNode>,
        col: Box<AstNode>,
        value: Box<AstNode>,
    },

    // Control flow
    If {
        branches: Vec<Branch>,
        else_block: Option<Vec<AstNode>>,
    },
    For {
        init: Box<AstNode>,
        cond: Box<AstNode>,
        update: Box<AstNode>,
        body: Vec<AstNode>,
    },
    Update {
        name: String,
        op: UpdateOp,
        value: Option<Box<AstNode>>,
    },
    While {
        cond: Box<AstNode>,
        body: Vec<AstNode>,
    },
    DoWhile {
        body: Vec<AstNode>,
        cond: Box<AstNode>,
    },
    Switch {
        expr: Box<AstNode>,
        cases: Vec<SwitchCase>,
    },
    Break,
    Continue,
    Return {
        value: Option<Box<AstNode>>,
    },

    // I/O
    /// `format` is the format string with quotes stripped; `None` means a
    /// bare-value println/print. `newline` distinguishes println from print
    /// for Java-style sources.
    Print {
        format: Option<String>,
        args: Vec<AstNode>,
        newline: bool,
    },
    Scan {
        format: String,
        targets: Vec<String>,
    },

    // Calls
    CallStmt {
        name: String,
        args: Vec<AstNode>,
    },

    // Map operations
    MapDecl {
        key_ty: String,
        val_ty: String,
        name: String,
    },
    MapPut {
        map: String,
        key: Box<AstNode>,
        value: Box<AstNode>,
    },
    MapGet {
        map: String,
        key: Box<AstNode>,
    },
    MapContains {
        map: String,
        key: Box<AstNode>,
    },

    // Expressions
    Ternary {
        cond: Box<AstNode>,
        then_val: Box<AstNode>,
        else_val: Box<AstNode>,
    },
    Binary {
        op: BinOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    Unary {
        op: UnOp,
        operand: Box<AstNode>,
    },
    ArrayAccess {
        name: String,
        index: Box<AstNode>,
    },
    ArrayAccess2D {
        name: String,
        row: Box<AstNode>,
        col: Box<AstNode>,
    },
    Call {
        name: String,
        args: Vec<AstNode>,
    },
    IntLit(String),
    FloatLit(String),
    /// Quotes kept, escapes passed through verbatim.
    CharLit(String),
    /// Quotes kept, escapes passed through verbatim.
    StrLit(String),
    BoolLit(bool),
    Ident(String),

    // Object-oriented forms, lowered by the C generator
    ClassDecl {
        name: String,
        base: Option<String>,
        fields: Vec<Field>,
        ctor: Option<Ctor>,
        dtor: Option<Vec<AstNode>>,
        methods: Vec<Method>,
    },
    /// A function template with a single type parameter.
    GenericFn {
        name: String,
        type_params: Vec<String>,
        params: Vec<Param>,
        body: Vec<AstNode>,
    },
}

impl AstNode {
    /// Variant name for diagnostics and unsupported-construct reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            AstNode::Function { .. } => "Function",
            AstNode::Define { .. } => "Define",
            AstNode::VarDecl { .. } => "VarDecl",
            AstNode::ArrayDecl { .. } => "ArrayDecl",
            AstNode::ArrayDecl2D { .. } => "ArrayDecl2D",
            AstNode::Assign { .. } => "Assign",
            AstNode::CompoundAssign { .. } => "CompoundAssign",
            AstNode::ArrayAssign { .. } => "ArrayAssign",
            AstNode::ArrayAssign2D { .. } => "ArrayAssign2D",
            AstNode::If { .. } => "If",
            AstNode::For { .. } => "For",
            AstNode::Update { .. } => "Update",
            AstNode::While { .. } => "While",
            AstNode::DoWhile { .. } => "DoWhile",
            AstNode::Switch { .. } => "Switch",
            AstNode::Break => "Break",
            AstNode::Continue => "Continue",
            AstNode::Return { .. } => "Return",
            AstNode::Print { .. } => "Print",
            AstNode::Scan { .. } => "Scan",
            AstNode::CallStmt { .. } => "CallStmt",
            AstNode::MapDecl { .. } => "MapDecl",
            AstNode::MapPut { .. } => "MapPut",
            AstNode::MapGet { .. } => "MapGet",
            AstNode::MapContains { .. } => "MapContains",
            AstNode::Ternary { .. } => "Ternary",
            AstNode::Binary { .. } => "Binary",
            AstNode::Unary { .. } => "Unary",
            AstNode::ArrayAccess { .. } => "ArrayAccess",
            AstNode::ArrayAccess2D { .. } => "ArrayAccess2D",
            AstNode::Call { .. } => "Call",
            AstNode::IntLit(_) => "IntLit",
            AstNode::FloatLit(_) => "FloatLit",
            AstNode::CharLit(_) => "CharLit",
            AstNode::StrLit(_) => "StrLit",
            AstNode::BoolLit(_) => "BoolLit",
            AstNode::Ident(_) => "Ident",
            AstNode::ClassDecl { .. } => "ClassDecl",
            AstNode::GenericFn { .. } => "GenericFn",
        }
    }
}

/// A parsed program: an ordered list of top-level items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}
