//! Quote- and bracket-aware helpers over raw statement text.
//!
//! These work on byte offsets of `&str`, which is safe because every
//! delimiter they look for is ASCII.

use std::ops::Range;

/// Tracks whether the scan is inside a `"..."` or `'...'` literal.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuoteState {
    quote: Option<char>,
    escaped: bool,
}

impl QuoteState {
    /// Feed one character. Returns true when it is part of a quoted
    /// literal, delimiters included.
    pub fn feed(&mut self, ch: char) -> bool {
        match self.quote {
            Some(open) => {
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == open {
                    self.quote = None;
                }
                true
            }
            None if ch == '"' || ch == '\'' => {
                self.quote = Some(ch);
                true
            }
            None => false,
        }
    }

    pub fn in_literal(&self) -> bool {
        self.quote.is_some()
    }
}

fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        _ => None,
    }
}

/// Byte offset of the bracket closing the one at `open`, skipping literals.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let open_ch = text[open..].chars().next()?;
    let close_ch = closing_for(open_ch)?;
    let mut quote = QuoteState::default();
    let mut depth = 0usize;
    for (offset, ch) in text[open..].char_indices() {
        if quote.feed(ch) {
            continue;
        }
        if ch == open_ch {
            depth += 1;
        } else if ch == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// A statement found in a text buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementCut {
    /// Byte offset of the terminator.
    pub end: usize,
    /// Byte ranges (braces included) of class bodies that follow a
    /// construction, as in `new Runnable() { ... }`.
    pub class_bodies: Vec<Range<usize>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminatorSearch {
    Found(StatementCut),
    /// More text is needed before the statement ends.
    Incomplete,
    /// A closing bracket with no opener, at this byte offset.
    StrayClose(usize),
}

/// Find `terminator` at bracket depth zero outside literals.
pub fn find_terminator(text: &str, terminator: char) -> TerminatorSearch {
    let mut quote = QuoteState::default();
    let mut depth = 0usize;
    let mut last_significant: Option<char> = None;
    let mut body: Option<(usize, usize)> = None;
    let mut class_bodies = Vec::new();
    for (offset, ch) in text.char_indices() {
        if quote.feed(ch) {
            last_significant = Some(ch);
            continue;
        }
        if ch.is_whitespace() {
            continue;
        }
        match ch {
            _ if ch == terminator && depth == 0 => {
                return TerminatorSearch::Found(StatementCut {
                    end: offset,
                    class_bodies,
                });
            }
            '{' => {
                if body.is_none() && last_significant == Some(')') {
                    body = Some((offset, depth));
                }
                depth += 1;
            }
            '(' | '[' => depth += 1,
            '}' | ')' | ']' => {
                if depth == 0 {
                    return TerminatorSearch::StrayClose(offset);
                }
                depth -= 1;
                if ch == '}' {
                    if let Some((start, at)) = body {
                        if at == depth {
                            class_bodies.push(start..offset + 1);
                            body = None;
                        }
                    }
                }
            }
            _ => {}
        }
        last_significant = Some(ch);
    }
    TerminatorSearch::Incomplete
}

/// Split at `sep` occurrences at depth zero outside literals.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote = QuoteState::default();
    let mut depth = 0usize;
    let mut from = 0;
    for (offset, ch) in text.char_indices() {
        if quote.feed(ch) {
            continue;
        }
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if ch == sep && depth == 0 => {
                parts.push(&text[from..offset]);
                from = offset + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[from..]);
    parts
}

/// Copy of `text` with the given byte ranges removed.
pub fn remove_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut from = 0;
    for range in ranges {
        out.push_str(&text[from..range.start]);
        from = range.end;
    }
    out.push_str(&text[from..]);
    out
}

/// Brackets and literals are all closed.
pub fn is_balanced(text: &str) -> bool {
    let mut quote = QuoteState::default();
    let mut depth = 0i64;
    for ch in text.chars() {
        if quote.feed(ch) {
            continue;
        }
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0 && !quote.in_literal()
}
