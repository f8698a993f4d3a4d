//! Arena storage for nodes, paragraphs, keyword constructs and variables.

use crate::node::{KeywordId, LiftedId, Node, NodeIndex, NodeKind, ParagraphId, VariableId};
use crate::scope::Variable;
use crate::statements::{KeywordConstruct, Paragraph};
use jcpp_common::{Span, ValueCategory};
use std::rc::Rc;

/// An anonymous class body detached from a construction call.
#[derive(Clone, Debug)]
pub struct AnonymousSite {
    pub call: NodeIndex,
    pub scope: ParagraphId,
    pub base_type: String,
    /// Class body text, braces included.
    pub body: String,
}

/// A final local copied into a lifted type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub name: String,
    pub type_name: String,
    pub category: ValueCategory,
}

/// Named type synthesized from an anonymous class body.
#[derive(Clone, Debug)]
pub struct LiftedType {
    pub name: String,
    pub base_type: String,
    pub body: String,
    pub captures: Vec<Capture>,
    pub site: NodeIndex,
}

#[derive(Debug, Default)]
pub struct CodeArena {
    pub nodes: Vec<Node>,
    pub paragraphs: Vec<Paragraph>,
    pub keywords: Vec<KeywordConstruct>,
    pub variables: Vec<Rc<Variable>>,
    pub anonymous_sites: Vec<AnonymousSite>,
    pub lifted: Vec<LiftedType>,
}

impl CodeArena {
    pub fn new() -> CodeArena {
        CodeArena::default()
    }

    pub fn add_node(&mut self, kind: NodeKind, span: Span, text: String, scope: ParagraphId) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let mut node = Node::new(kind, span, text, scope);
        node.visible_variables = self.variables.len() as u32;
        self.nodes.push(node);
        index
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.index())
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.index())
        }
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) -> ParagraphId {
        let id = ParagraphId(self.paragraphs.len() as u32);
        self.paragraphs.push(paragraph);
        id
    }

    #[inline]
    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        &self.paragraphs[id.index()]
    }

    #[inline]
    pub fn paragraph_mut(&mut self, id: ParagraphId) -> &mut Paragraph {
        &mut self.paragraphs[id.index()]
    }

    pub fn add_keyword(&mut self, construct: KeywordConstruct) -> KeywordId {
        let id = KeywordId(self.keywords.len() as u32);
        self.keywords.push(construct);
        id
    }

    #[inline]
    pub fn keyword(&self, id: KeywordId) -> &KeywordConstruct {
        &self.keywords[id.index()]
    }

    #[inline]
    pub fn keyword_mut(&mut self, id: KeywordId) -> &mut KeywordConstruct {
        &mut self.keywords[id.index()]
    }

    /// Register `variable` in the paragraph that declares it.
    pub fn declare(&mut self, variable: Variable) -> VariableId {
        let id = VariableId(self.variables.len() as u32);
        let scope = variable.scope;
        self.variables.push(Rc::new(variable));
        if scope.is_some() {
            self.paragraphs[scope.index()].variables.push(id);
        }
        id
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> &Rc<Variable> {
        &self.variables[id.index()]
    }

    #[inline]
    pub fn lifted_type(&self, id: LiftedId) -> &LiftedType {
        &self.lifted[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
