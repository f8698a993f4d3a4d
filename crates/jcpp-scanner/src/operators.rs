//! The operator table.
//!
//! Entries are listed in matching order, so a longer spelling sits before
//! any entry that is its prefix. Each entry's precedence level is the split
//! preference of the resolver: the lowest level binds most loosely and is
//! tried as an outer split first.

/// How an operator finds the operand on one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandPolicy {
    /// Recursively resolve everything up to the edge of the requested range.
    Full,
    /// Take text up to the nearest operator character in that direction.
    Greedy,
    /// No operand on this side.
    None,
}

/// Which candidate wins when several operators share a precedence level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    Leftmost,
    Rightmost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OpKind {
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    BarAssign,
    CaretAssign,
    ShlAssign,
    UShrAssign,
    ShrAssign,
    Question,
    Colon,
    Dot,
    Instanceof,
    Increment,
    Decrement,
    BarBar,
    AmpAmp,
    Bar,
    Caret,
    Amp,
    EqEq,
    NotEq,
    Not,
    GtEq,
    UShr,
    Shr,
    Shl,
    Gt,
    LtEq,
    Lt,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
}

#[derive(Clone, Copy, Debug)]
pub struct OperatorInfo {
    pub kind: OpKind,
    pub text: &'static str,
    pub precedence: u8,
    pub left: OperandPolicy,
    pub right: OperandPolicy,
    pub tie_break: TieBreak,
}

const fn op(
    kind: OpKind,
    text: &'static str,
    precedence: u8,
    left: OperandPolicy,
    right: OperandPolicy,
    tie_break: TieBreak,
) -> OperatorInfo {
    OperatorInfo {
        kind,
        text,
        precedence,
        left,
        right,
        tie_break,
    }
}

use OperandPolicy::{Full, Greedy, None as NoOperand};
use TieBreak::{Leftmost, Rightmost};

pub const OPERATORS: [OperatorInfo; 45] = [
    op(OpKind::OpenParen, "(", 0, Greedy, Full, Rightmost),
    op(OpKind::CloseParen, ")", 0, Full, Greedy, Rightmost),
    op(OpKind::OpenBrace, "{", 1, Greedy, Full, Rightmost),
    op(OpKind::CloseBrace, "}", 1, Full, NoOperand, Rightmost),
    op(OpKind::OpenBracket, "[", 2, Greedy, Full, Rightmost),
    op(OpKind::CloseBracket, "]", 2, Full, Greedy, Rightmost),
    op(OpKind::Comma, ",", 3, Full, Full, Rightmost),
    op(OpKind::Assign, "=", 4, Full, Full, Leftmost),
    op(OpKind::PlusAssign, "+=", 4, Full, Full, Leftmost),
    op(OpKind::MinusAssign, "-=", 4, Full, Full, Leftmost),
    op(OpKind::StarAssign, "*=", 4, Full, Full, Leftmost),
    op(OpKind::SlashAssign, "/=", 4, Full, Full, Leftmost),
    op(OpKind::PercentAssign, "%=", 4, Full, Full, Leftmost),
    op(OpKind::AmpAssign, "&=", 4, Full, Full, Leftmost),
    op(OpKind::BarAssign, "|=", 4, Full, Full, Leftmost),
    op(OpKind::CaretAssign, "^=", 4, Full, Full, Leftmost),
    op(OpKind::ShlAssign, "<<=", 4, Full, Full, Leftmost),
    op(OpKind::UShrAssign, ">>>=", 4, Full, Full, Leftmost),
    op(OpKind::ShrAssign, ">>=", 4, Full, Full, Leftmost),
    op(OpKind::Question, "?", 5, Full, Full, Leftmost),
    op(OpKind::Colon, ":", 6, Full, Full, Leftmost),
    op(OpKind::Dot, ".", 7, Greedy, Greedy, Leftmost),
    op(OpKind::Instanceof, "instanceof", 8, Greedy, Greedy, Leftmost),
    op(OpKind::Increment, "++", 9, Greedy, Greedy, Rightmost),
    op(OpKind::Decrement, "--", 9, Greedy, Greedy, Rightmost),
    op(OpKind::BarBar, "||", 10, Full, Full, Rightmost),
    op(OpKind::AmpAmp, "&&", 11, Full, Full, Rightmost),
    op(OpKind::Bar, "|", 12, Full, Full, Rightmost),
    op(OpKind::Caret, "^", 13, Full, Full, Rightmost),
    op(OpKind::Amp, "&", 14, Full, Full, Rightmost),
    op(OpKind::EqEq, "==", 15, Full, Full, Rightmost),
    op(OpKind::NotEq, "!=", 15, Full, Full, Rightmost),
    op(OpKind::Not, "!", 16, NoOperand, Greedy, Rightmost),
    op(OpKind::GtEq, ">=", 17, Full, Full, Rightmost),
    op(OpKind::UShr, ">>>", 18, Full, Full, Rightmost),
    op(OpKind::Shr, ">>", 18, Full, Full, Rightmost),
    op(OpKind::Shl, "<<", 18, Full, Full, Rightmost),
    op(OpKind::Gt, ">", 17, Full, Full, Rightmost),
    op(OpKind::LtEq, "<=", 17, Full, Full, Rightmost),
    op(OpKind::Lt, "<", 17, Full, Full, Rightmost),
    op(OpKind::Plus, "+", 19, Full, Full, Rightmost),
    op(OpKind::Minus, "-", 19, Full, Full, Rightmost),
    op(OpKind::Star, "*", 20, Full, Full, Rightmost),
    op(OpKind::Slash, "/", 20, Full, Full, Rightmost),
    op(OpKind::Percent, "%", 20, Full, Full, Rightmost),
];

impl OpKind {
    #[inline]
    pub fn info(self) -> &'static OperatorInfo {
        &OPERATORS[self as usize]
    }

    #[inline]
    pub fn text(self) -> &'static str {
        self.info().text
    }

    #[inline]
    pub fn width(self) -> usize {
        self.info().text.chars().count()
    }

    pub const fn is_open_bracket(self) -> bool {
        matches!(
            self,
            OpKind::OpenParen | OpKind::OpenBrace | OpKind::OpenBracket
        )
    }

    pub const fn is_close_bracket(self) -> bool {
        matches!(
            self,
            OpKind::CloseParen | OpKind::CloseBrace | OpKind::CloseBracket
        )
    }

    /// The closing partner of an opening bracket.
    pub const fn closing(self) -> Option<OpKind> {
        match self {
            OpKind::OpenParen => Some(OpKind::CloseParen),
            OpKind::OpenBrace => Some(OpKind::CloseBrace),
            OpKind::OpenBracket => Some(OpKind::CloseBracket),
            _ => None,
        }
    }

    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            OpKind::Assign
                | OpKind::PlusAssign
                | OpKind::MinusAssign
                | OpKind::StarAssign
                | OpKind::SlashAssign
                | OpKind::PercentAssign
                | OpKind::AmpAssign
                | OpKind::BarAssign
                | OpKind::CaretAssign
                | OpKind::ShlAssign
                | OpKind::UShrAssign
                | OpKind::ShrAssign
        )
    }

    /// Result is a boolean regardless of operand categories.
    pub const fn is_predicate(self) -> bool {
        matches!(
            self,
            OpKind::BarBar
                | OpKind::AmpAmp
                | OpKind::EqEq
                | OpKind::NotEq
                | OpKind::Not
                | OpKind::GtEq
                | OpKind::Gt
                | OpKind::LtEq
                | OpKind::Lt
                | OpKind::Instanceof
        )
    }

    /// `>>` and `>>>`, which may also close nested type-argument lists.
    pub const fn is_right_shift(self) -> bool {
        matches!(self, OpKind::Shr | OpKind::UShr)
    }

    pub const fn is_unary(self) -> bool {
        matches!(self, OpKind::Increment | OpKind::Decrement | OpKind::Not)
    }
}
