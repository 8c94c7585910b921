//! Abstract Syntax Tree definitions for the script language.
//!
//! Programs and test suites share one grammar (a JavaScript subset). Nodes carry byte-offset spans so
//! diagnostics and the interpreter's error messages can point back at source text.
//!
//! ## Notes
//! - Functions are stored behind `Rc` so closures created at runtime share the definition instead of cloning it.
//! - Destructuring targets and assignment targets share [`Pattern`]; only assignment targets may contain
//!   [`Pattern::Member`].

use std::fmt;
use std::rc::Rc;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Return the 1-based `(line, column)` of `self.start` within `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let upto = &source[..self.start.min(source.len())];
        let line = upto.matches('\n').count() + 1;
        let col = upto.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
        (line, col)
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier
pub type Ident = String;

/// A block of statements
pub type Block = Vec<Spanned<Stmt>>;

/// A program (or a single re-parsed test body) is a sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Block,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDecl),
    Function(Rc<Function>),
    Return(Option<Spanned<Expr>>),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(WhileStmt),
    For(ForStmt),
    ForOf(ForEachStmt),
    ForIn(ForEachStmt),
    Break,
    Continue,
    Throw(Spanned<Expr>),
    Try(TryStmt),
    Switch(SwitchStmt),
    Block(Block),
    Expr(Spanned<Expr>),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Var => write!(f, "var"),
            DeclKind::Let => write!(f, "let"),
            DeclKind::Const => write!(f, "const"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: DeclKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub target: Spanned<Pattern>,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Spanned<Expr>,
    pub consequent: Box<Spanned<Stmt>>,
    pub alternate: Option<Box<Spanned<Stmt>>>,
}

/// `while (test) body` and `do body while (test)`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub test: Spanned<Expr>,
    pub body: Box<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub test: Option<Spanned<Expr>>,
    pub update: Option<Spanned<Expr>>,
    pub body: Box<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Spanned<Expr>),
}

/// `for (kind target of|in iterable) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    /// `None` when the loop assigns to an existing binding.
    pub kind: Option<DeclKind>,
    pub target: Spanned<Pattern>,
    pub iterable: Spanned<Expr>,
    pub body: Box<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub block: Block,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Spanned<Pattern>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub discriminant: Spanned<Expr>,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Spanned<Expr>>,
    pub body: Block,
}

// ============================================================================
// Functions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    pub rest: Option<Spanned<Pattern>>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    pub span: Span,
}

impl Function {
    /// Number of declared parameters before the first default (the `length` property).
    pub fn arity(&self) -> usize {
        self.params.iter().take_while(|p| p.default.is_none()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Spanned<Pattern>,
    pub default: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Block),
    /// Concise arrow body: `x => x * 2`
    Expr(Box<Spanned<Expr>>),
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Ident(Ident),
    /// `obj.key` / `arr[i]` as an assignment target
    Member(Box<Spanned<Expr>>),
    Array(ArrayPattern),
    Object(ObjectPattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    /// `None` entries are elisions: `[, second]`
    pub elements: Vec<Option<PatternElement>>,
    pub rest: Option<Box<Spanned<Pattern>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    pub props: Vec<ObjectPatternProp>,
    pub rest: Option<Box<Spanned<Pattern>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProp {
    pub key: PropKey,
    pub value: PatternElement,
}

/// A destructuring target with an optional default
#[derive(Debug, Clone, PartialEq)]
pub struct PatternElement {
    pub target: Spanned<Pattern>,
    pub default: Option<Spanned<Expr>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    String(String),
    Template(Vec<TemplatePart>),
    Regex { pattern: String, flags: String },
    Bool(bool),
    Null,
    Ident(Ident),
    This,
    Array(Vec<ArrayElement>),
    Object(Vec<Property>),
    Function(Rc<Function>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Spanned<Expr>>,
    },
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    Logical(Box<Spanned<Expr>>, LogicalOp, Box<Spanned<Expr>>),
    Conditional {
        test: Box<Spanned<Expr>>,
        consequent: Box<Spanned<Expr>>,
        alternate: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Pattern>>,
        value: Box<Spanned<Expr>>,
    },
    Member {
        object: Box<Spanned<Expr>>,
        property: MemberProp,
        optional: bool,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Argument>,
        optional: bool,
    },
    New {
        callee: Box<Spanned<Expr>>,
        args: Vec<Argument>,
    },
    Sequence(Vec<Spanned<Expr>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Str(String),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Expr(Spanned<Expr>),
    Spread(Spanned<Expr>),
    Hole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Expr(Spanned<Expr>),
    Spread(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `key: value` and methods `key() { ... }`
    KeyValue(PropKey, Spanned<Expr>),
    /// `{ name }`
    Shorthand(Ident),
    /// `{ ...other }`
    Spread(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Static(String),
    Computed(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Static(Ident),
    Computed(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
    InstanceOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
    Logical(LogicalOp),
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        };
        write!(f, "{s}")
    }
}

impl Expr {
    /// Render a short source-like description of a callee, used in "x is not a function" messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Ident(name) => name.clone(),
            Expr::This => "this".to_string(),
            Expr::Member { object, property, .. } => {
                let base = object.node.describe();
                match property {
                    MemberProp::Static(name) => format!("{base}.{name}"),
                    MemberProp::Computed(_) => format!("{base}[...]"),
                }
            }
            Expr::Call { callee, .. } => format!("{}(...)", callee.node.describe()),
            Expr::Function(_) => "(intermediate value)".to_string(),
            _ => "expression".to_string(),
        }
    }
}
