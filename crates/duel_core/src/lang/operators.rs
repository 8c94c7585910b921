//! Operator vocabulary.
//!
//! This module defines the canonical symbol-operator set along with precedence, associativity and fixity.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`typeof`, `instanceof`, `in`, `void`, `delete`) are keywords; see
//!   [`crate::lang::keywords`].
//! - `precedence` mirrors the parser's ladder (higher binds tighter). Assignment operators share the lowest level.
//!
//! ## Examples
//! ```rust
//! use duel_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("==="), Some(OperatorId::EqEqEq));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define whether an operator is infix, prefix, or usable on both sides of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    /// `++` / `--`
    PrefixOrPostfix,
}

/// Stable identifier for every operator.
///
/// ## Notes
/// - Variant order matches [`OPERATORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    // Comparison
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    AndAnd,
    OrOr,
    QuestionQuestion,
    Bang,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    UShr,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    UShrEq,
    AndAndEq,
    OrOrEq,
    QuestionQuestionEq,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
}

/// Registry of all operators, in [`OperatorId`] order.
pub const OPERATORS: &[OperatorInfo] = &[
    infix(OperatorId::Plus, "+", 130),
    infix(OperatorId::Minus, "-", 130),
    infix(OperatorId::Star, "*", 140),
    op(OperatorId::StarStar, "**", 150, Associativity::Right, Fixity::Infix),
    infix(OperatorId::Slash, "/", 140),
    infix(OperatorId::Percent, "%", 140),
    op(OperatorId::PlusPlus, "++", 170, Associativity::Right, Fixity::PrefixOrPostfix),
    op(OperatorId::MinusMinus, "--", 170, Associativity::Right, Fixity::PrefixOrPostfix),
    infix(OperatorId::EqEq, "==", 100),
    infix(OperatorId::NotEq, "!=", 100),
    infix(OperatorId::EqEqEq, "===", 100),
    infix(OperatorId::NotEqEq, "!==", 100),
    infix(OperatorId::Lt, "<", 110),
    infix(OperatorId::LtEq, "<=", 110),
    infix(OperatorId::Gt, ">", 110),
    infix(OperatorId::GtEq, ">=", 110),
    infix(OperatorId::AndAnd, "&&", 60),
    infix(OperatorId::OrOr, "||", 50),
    infix(OperatorId::QuestionQuestion, "??", 50),
    op(OperatorId::Bang, "!", 160, Associativity::Right, Fixity::Prefix),
    infix(OperatorId::Amp, "&", 90),
    infix(OperatorId::Pipe, "|", 70),
    infix(OperatorId::Caret, "^", 80),
    op(OperatorId::Tilde, "~", 160, Associativity::Right, Fixity::Prefix),
    infix(OperatorId::Shl, "<<", 120),
    infix(OperatorId::Shr, ">>", 120),
    infix(OperatorId::UShr, ">>>", 120),
    assign(OperatorId::Eq, "="),
    assign(OperatorId::PlusEq, "+="),
    assign(OperatorId::MinusEq, "-="),
    assign(OperatorId::StarEq, "*="),
    assign(OperatorId::SlashEq, "/="),
    assign(OperatorId::PercentEq, "%="),
    assign(OperatorId::StarStarEq, "**="),
    assign(OperatorId::AmpEq, "&="),
    assign(OperatorId::PipeEq, "|="),
    assign(OperatorId::CaretEq, "^="),
    assign(OperatorId::ShlEq, "<<="),
    assign(OperatorId::ShrEq, ">>="),
    assign(OperatorId::UShrEq, ">>>="),
    assign(OperatorId::AndAndEq, "&&="),
    assign(OperatorId::OrOrEq, "||="),
    assign(OperatorId::QuestionQuestionEq, "??="),
];

/// Return the full metadata entry for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Return the canonical spelling for an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Return `true` for `=` and the compound assignment operators.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).precedence == ASSIGNMENT_PRECEDENCE
}

/// Resolve an operator spelling to its identifier.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Longest operator spelling, used by the lexer for maximal munch.
pub const MAX_SPELLING_LEN: usize = 4;

const ASSIGNMENT_PRECEDENCE: u8 = 20;

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
        fixity,
    }
}

const fn infix(id: OperatorId, spelling: &'static str, precedence: u8) -> OperatorInfo {
    op(id, spelling, precedence, Associativity::Left, Fixity::Infix)
}

const fn assign(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    op(id, spelling, ASSIGNMENT_PRECEDENCE, Associativity::Right, Fixity::Infix)
}
