//! Statement keywords and labels.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    For,
    Do,
    While,
    Switch,
    Case,
    Default,
    Try,
    Synchronized,
    Return,
    Continue,
    Break,
    Throw,
}

impl Keyword {
    pub const ALL: [Keyword; 13] = [
        Keyword::If,
        Keyword::For,
        Keyword::Do,
        Keyword::While,
        Keyword::Switch,
        Keyword::Case,
        Keyword::Default,
        Keyword::Try,
        Keyword::Synchronized,
        Keyword::Return,
        Keyword::Continue,
        Keyword::Break,
        Keyword::Throw,
    ];

    pub const fn text(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::For => "for",
            Keyword::Do => "do",
            Keyword::While => "while",
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::Default => "default",
            Keyword::Try => "try",
            Keyword::Synchronized => "synchronized",
            Keyword::Return => "return",
            Keyword::Continue => "continue",
            Keyword::Break => "break",
            Keyword::Throw => "throw",
        }
    }

    /// Constructs that may carry a `label:` prefix.
    pub const fn accepts_label(self) -> bool {
        matches!(self, Keyword::For | Keyword::While | Keyword::Do)
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, Keyword>> =
    Lazy::new(|| Keyword::ALL.iter().map(|k| (k.text(), *k)).collect());

#[inline]
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// `text` starts with `word` followed by a non-identifier character.
pub fn starts_with_word(text: &str, word: &str) -> bool {
    text.starts_with(word)
        && !text[word.len()..]
            .chars()
            .next()
            .is_some_and(is_identifier_char)
}

fn leading_word(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map_or(text.len(), |(i, _)| i);
    &text[..end]
}

/// The statement keyword `text` opens with, if any.
pub fn leading_keyword(text: &str) -> Option<Keyword> {
    KEYWORDS.get(leading_word(text)).copied()
}

/// `outer: ...` returns `("outer", bytes consumed through the colon)`.
pub fn leading_label(text: &str) -> Option<(&str, usize)> {
    let word = leading_word(text);
    if word.is_empty()
        || word.starts_with(|c: char| c.is_ascii_digit())
        || KEYWORDS.contains_key(word)
    {
        return None;
    }
    let rest = &text[word.len()..];
    let trimmed = rest.trim_start();
    if !trimmed.starts_with(':') || trimmed.starts_with("::") {
        return None;
    }
    let consumed = word.len() + (rest.len() - trimmed.len()) + 1;
    Some((word, consumed))
}
