//! The resolution ledger: one tag per character of a statement buffer.
//!
//! The scanner fills the ledger with `Space`, `Unresolved` and operator
//! tags. The resolver then folds ranges into nodes, retagging their
//! characters as `Resolved` or, while the enclosing span is still being
//! built, `Pending` with the id of the node that owns them.

use crate::operators::OpKind;
use jcpp_common::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Space,
    Unresolved,
    /// First character of an operator.
    Operator(OpKind),
    /// Continuation character of a multi-character operator.
    OperatorTail(OpKind),
    Resolved,
    /// Folded into a pending subtree awaiting its enclosing node.
    Pending(u32),
}

impl Tag {
    /// Any character belonging to a not-yet-folded operator.
    #[inline]
    pub const fn is_operator(self) -> bool {
        matches!(self, Tag::Operator(_) | Tag::OperatorTail(_))
    }

    #[inline]
    pub const fn is_settled(self) -> bool {
        matches!(self, Tag::Space | Tag::Resolved)
    }
}

#[derive(Clone, Debug)]
pub struct Ledger {
    chars: Vec<char>,
    tags: Vec<Tag>,
}

impl Ledger {
    pub fn new(text: &str) -> Ledger {
        let chars: Vec<char> = text.chars().collect();
        let tags = chars
            .iter()
            .map(|c| {
                if c.is_whitespace() {
                    Tag::Space
                } else {
                    Tag::Unresolved
                }
            })
            .collect();
        Ledger { chars, tags }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[inline]
    pub fn char_at(&self, idx: usize) -> char {
        self.chars[idx]
    }

    #[inline]
    pub fn tag(&self, idx: usize) -> Tag {
        self.tags[idx]
    }

    #[inline]
    pub fn set(&mut self, idx: usize, tag: Tag) {
        self.tags[idx] = tag;
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Source text of `[start, end)`.
    pub fn text(&self, span: Span) -> String {
        self.chars[span.start..span.end].iter().collect()
    }

    pub fn full_text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Narrow `[start, end)` past leading and trailing `Space` tags.
    pub fn trim(&self, start: usize, end: usize) -> Span {
        let mut s = start;
        let mut e = end.min(self.len());
        while s < e && self.tags[s] == Tag::Space {
            s += 1;
        }
        while e > s && self.tags[e - 1] == Tag::Space {
            e -= 1;
        }
        Span::new(s, e)
    }

    pub fn is_blank(&self, start: usize, end: usize) -> bool {
        self.trim(start, end).is_empty()
    }

    /// Tag every non-space character of `span`.
    pub fn mark(&mut self, span: Span, tag: Tag) {
        for idx in span.start..span.end.min(self.len()) {
            if self.tags[idx] != Tag::Space {
                self.tags[idx] = tag;
            }
        }
    }

    /// Turn an operator (all of its characters) back into plain text.
    pub fn untag_operator(&mut self, head: usize) {
        if let Tag::Operator(kind) = self.tags[head] {
            for idx in head..(head + kind.width()).min(self.len()) {
                self.tags[idx] = Tag::Unresolved;
            }
        }
    }

    /// Operator heads in `[start, end)` as `(index, kind)`.
    pub fn operator_heads(&self, start: usize, end: usize) -> impl Iterator<Item = (usize, OpKind)> + '_ {
        (start..end.min(self.len())).filter_map(|idx| match self.tags[idx] {
            Tag::Operator(kind) => Some((idx, kind)),
            _ => None,
        })
    }

    pub fn has_operator(&self, start: usize, end: usize) -> bool {
        self.tags[start..end.min(self.len())]
            .iter()
            .any(|t| t.is_operator())
    }

    /// True once every character of the span is a space or resolved.
    pub fn is_settled(&self, span: Span) -> bool {
        self.tags[span.start..span.end.min(self.len())]
            .iter()
            .all(|t| t.is_settled())
    }
}
