//! Paragraphs and keyword constructs: the control-flow tree.

use crate::node::{KeywordId, NodeIndex, ParagraphId, VariableId};
use jcpp_scanner::Keyword;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParagraphKind {
    /// The method body itself. Has no braces of its own.
    Root,
    /// A bare `{ ... }` block.
    Block,
    /// Body of a keyword construct, braced or single-statement.
    Body,
    /// Body of a `switch`: case labels render one level out.
    SwitchBody,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Statement {
    /// Lone `;`.
    Empty,
    Expression(NodeIndex),
    Block(ParagraphId),
    Keyword(KeywordId),
}

#[derive(Clone, Debug)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub parent: Option<ParagraphId>,
    pub items: Vec<Statement>,
    pub variables: Vec<VariableId>,
    pub label: Option<String>,
    pub braced: bool,
}

impl Paragraph {
    pub fn new(kind: ParagraphKind, parent: Option<ParagraphId>) -> Paragraph {
        Paragraph {
            kind,
            parent,
            items: Vec::new(),
            variables: Vec::new(),
            label: None,
            braced: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Branch {
    /// `NONE` for the final `else`.
    pub condition: NodeIndex,
    pub body: ParagraphId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatchClause {
    pub declaration: NodeIndex,
    pub body: ParagraphId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeywordDetail {
    Conditional {
        branches: Vec<Branch>,
    },
    /// `for (init; condition; update)`; each clause may be `NONE`.
    CountedLoop {
        init: NodeIndex,
        condition: NodeIndex,
        update: NodeIndex,
        body: ParagraphId,
    },
    /// `for (T x : items)`.
    IteratorLoop {
        header: NodeIndex,
        /// Declaration over a container: emitted as element iteration.
        element_iteration: bool,
        body: ParagraphId,
    },
    While {
        condition: NodeIndex,
        body: ParagraphId,
    },
    DoWhile {
        body: ParagraphId,
        condition: NodeIndex,
    },
    Switch {
        subject: NodeIndex,
        body: ParagraphId,
    },
    Try {
        body: ParagraphId,
        catches: Vec<CatchClause>,
        finally: Option<ParagraphId>,
    },
    Synchronized {
        lock: NodeIndex,
        body: ParagraphId,
    },
    /// `return`, `throw`, `break`, `continue`.
    Jump {
        value: NodeIndex,
        label: Option<String>,
    },
    Case {
        value: NodeIndex,
    },
    Default,
    /// Header not parsed yet.
    Pending,
}

#[derive(Clone, Debug)]
pub struct KeywordConstruct {
    pub keyword: Keyword,
    pub label: Option<String>,
    /// Paragraph the construct appears in.
    pub scope: ParagraphId,
    pub detail: KeywordDetail,
}
