//! Position scanner: tags every character of a statement buffer.
//!
//! The scanner is context sensitive:
//! - characters inside quoted literals are never operators
//! - `=` followed by `=` is equality, not assignment
//! - `<`/`>` pairs after a type name enclosing only type-argument text
//!   become part of that name, splitting `>>` where it closes two lists
//! - `instanceof` counts only when surrounded by whitespace
//! - a sign or decimal point in front of a digit belongs to the literal
//! - `[]` is an operator pair only when an array initializer `{` follows

use crate::keywords::is_identifier_char;
use crate::ledger::{Ledger, Tag};
use crate::operators::{OPERATORS, OpKind};
use crate::text::QuoteState;
use smallvec::SmallVec;
use tracing::trace;

/// Scan `text` into a fresh ledger.
pub fn scan(text: &str) -> Ledger {
    let mut scanner = PositionScanner {
        ledger: Ledger::new(text),
        angles: SmallVec::new(),
    };
    scanner.run();
    scanner.ledger
}

struct PositionScanner {
    ledger: Ledger,
    /// Offsets of `<` candidates that may open a type-argument list.
    angles: SmallVec<[usize; 8]>,
}

impl PositionScanner {
    fn run(&mut self) {
        let len = self.ledger.len();
        let mut quote = QuoteState::default();
        let mut idx = 0;
        while idx < len {
            let ch = self.ledger.char_at(idx);
            if quote.feed(ch) {
                self.ledger.set(idx, Tag::Unresolved);
                idx += 1;
                continue;
            }
            if ch.is_whitespace() {
                idx += 1;
                continue;
            }
            idx += self.scan_at(idx);
        }
        trace!(text = %self.ledger.full_text(), "scanned statement");
    }

    /// Tag the operator starting at `idx`, returning how many characters
    /// were consumed (at least one).
    fn scan_at(&mut self, idx: usize) -> usize {
        let ch = self.ledger.char_at(idx);
        if ch == '[' {
            if let Some(consumed) = self.empty_brackets(idx) {
                return consumed;
            }
        }
        let Some(kind) = self.match_operator(idx) else {
            return 1;
        };
        let kind = if kind == OpKind::Assign && self.char_is(idx + 1, '=') {
            OpKind::EqEq
        } else if kind.is_right_shift() && self.closes_type_arguments(idx) {
            OpKind::Gt
        } else {
            kind
        };
        if self.is_literal_prefix(idx, kind) {
            return 1;
        }
        let width = kind.width();
        self.ledger.set(idx, Tag::Operator(kind));
        for tail in idx + 1..idx + width {
            self.ledger.set(tail, Tag::OperatorTail(kind));
        }
        match kind {
            OpKind::Lt if self.follows_type_name(idx) => self.angles.push(idx),
            OpKind::Gt => self.close_angle(idx),
            _ => {}
        }
        width
    }

    fn match_operator(&self, idx: usize) -> Option<OpKind> {
        OPERATORS
            .iter()
            .find(|info| {
                self.matches_text(idx, info.text)
                    && (info.kind != OpKind::Instanceof || self.is_spaced_word(idx, info.text))
            })
            .map(|info| info.kind)
    }

    fn matches_text(&self, idx: usize, text: &str) -> bool {
        let mut pos = idx;
        for expected in text.chars() {
            if pos >= self.ledger.len() || self.ledger.char_at(pos) != expected {
                return false;
            }
            pos += 1;
        }
        true
    }

    fn is_spaced_word(&self, idx: usize, word: &str) -> bool {
        let end = idx + word.chars().count();
        idx > 0
            && self.ledger.char_at(idx - 1).is_whitespace()
            && end < self.ledger.len()
            && self.ledger.char_at(end).is_whitespace()
    }

    fn char_is(&self, idx: usize, expected: char) -> bool {
        idx < self.ledger.len() && self.ledger.char_at(idx) == expected
    }

    /// `-1`, `+2`, `.5`, `1.5`: the character belongs to a numeric literal.
    fn is_literal_prefix(&self, idx: usize, kind: OpKind) -> bool {
        let next_is_digit = idx + 1 < self.ledger.len() && self.ledger.char_at(idx + 1).is_ascii_digit();
        if !next_is_digit {
            return false;
        }
        match kind {
            OpKind::Dot => true,
            OpKind::Minus | OpKind::Plus => self.in_prefix_position(idx),
            _ => false,
        }
    }

    /// Nothing operand-like precedes `idx`: start of text, after an operator
    /// other than a closing bracket or postfix step, or after an exponent.
    fn in_prefix_position(&self, idx: usize) -> bool {
        let mut prev = idx;
        while prev > 0 && self.ledger.tag(prev - 1) == Tag::Space {
            prev -= 1;
        }
        if prev == 0 {
            return true;
        }
        match self.ledger.tag(prev - 1) {
            Tag::Operator(kind) | Tag::OperatorTail(kind) => !matches!(
                kind,
                OpKind::CloseParen | OpKind::CloseBracket | OpKind::Increment | OpKind::Decrement
            ),
            _ => prev == idx && self.follows_exponent(idx),
        }
    }

    /// `1e-5`: the token before `idx` is a number ending in an exponent mark.
    fn follows_exponent(&self, idx: usize) -> bool {
        let mut start = idx;
        while start > 0 && self.ledger.char_at(start - 1).is_ascii_alphanumeric() {
            start -= 1;
        }
        start < idx
            && self.ledger.char_at(start).is_ascii_digit()
            && matches!(self.ledger.char_at(idx - 1), 'e' | 'E')
    }

    /// `[]` not followed by `{` is part of a type name.
    fn empty_brackets(&mut self, idx: usize) -> Option<usize> {
        let close = self.next_non_space(idx + 1)?;
        if self.ledger.char_at(close) != ']' {
            return None;
        }
        let after = self.next_non_space(close + 1);
        if after.is_some_and(|a| self.ledger.char_at(a) == '{') {
            return None;
        }
        self.ledger.set(idx, Tag::Unresolved);
        self.ledger.set(close, Tag::Unresolved);
        Some(close + 1 - idx)
    }

    fn next_non_space(&self, from: usize) -> Option<usize> {
        (from..self.ledger.len()).find(|&i| !self.ledger.char_at(i).is_whitespace())
    }

    /// `List<`, `java.util.Map<`: the name in front of `<` reads as a type.
    /// Lowercase operands (`a < b`) never open a type-argument list.
    fn follows_type_name(&self, idx: usize) -> bool {
        let mut end = idx;
        while end > 0 && self.ledger.char_at(end - 1).is_whitespace() {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && is_identifier_char(self.ledger.char_at(start - 1)) {
            start -= 1;
        }
        start < end && self.ledger.char_at(start).is_ascii_uppercase()
    }

    /// A `>>` or `>>>` at `close` whose first `>` ends the innermost open
    /// type-argument list, as in `Map<K, List<V>>`.
    fn closes_type_arguments(&self, close: usize) -> bool {
        self.angles
            .last()
            .is_some_and(|&open| self.only_type_text(open, close))
    }

    fn only_type_text(&self, open: usize, close: usize) -> bool {
        (open + 1..close).all(|i| match self.ledger.tag(i) {
            Tag::Space | Tag::Unresolved => true,
            Tag::Operator(kind) | Tag::OperatorTail(kind) => {
                matches!(kind, OpKind::Comma | OpKind::Question | OpKind::Dot)
            }
            _ => false,
        })
    }

    /// A `>` closes the most recent `<` as a type-argument list when only
    /// name text, commas, wildcards and qualifiers sit between them.
    fn close_angle(&mut self, close: usize) {
        let Some(open) = self.angles.pop() else {
            return;
        };
        if !self.only_type_text(open, close) {
            return;
        }
        for i in open..=close {
            if self.ledger.tag(i).is_operator() {
                self.ledger.set(i, Tag::Unresolved);
            }
        }
        trace!(open, close, "type-argument delimiters");
    }
}
