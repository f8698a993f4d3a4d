//! Node model: one tagged union for every statement and expression form.
//!
//! Nodes live in the `CodeArena` and refer to their children by index. Each
//! child index is referenced by exactly one parent.

use jcpp_common::{Span, ValueCategory};
use jcpp_scanner::OpKind;
use smallvec::SmallVec;
use std::cell::Cell;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(u32::MAX);

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == u32::MAX
            }

            #[inline]
            pub const fn is_some(self) -> bool {
                self.0 != u32::MAX
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_index!(
    /// Index of a node in the arena.
    NodeIndex
);
define_index!(
    /// Index of a paragraph (block) in the arena.
    ParagraphId
);
define_index!(
    /// Index of a keyword construct in the arena.
    KeywordId
);
define_index!(
    /// Index of a declared variable in the arena.
    VariableId
);
define_index!(
    /// Index of a type synthesized from an anonymous class body.
    LiftedId
);

/// How a leaf expression was classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpressionForm {
    Identifier,
    /// Numeric, character, string or boolean literal.
    Literal,
    Null,
    /// `this` or `super`.
    This,
    /// `new T`, the callee of a construction call.
    Construction { type_name: String },
    /// Text the resolver could not structure; emitted for manual review.
    Verbatim,
}

#[derive(Clone, Debug)]
pub struct ExpressionData {
    pub text: String,
    pub form: ExpressionForm,
}

#[derive(Clone, Debug)]
pub struct DeclarationData {
    pub variable: VariableId,
    /// Later declarator of `int a, b;` sharing the first one's type.
    pub continued: bool,
}

#[derive(Clone, Debug)]
pub struct OperatorData {
    pub op: OpKind,
    /// `NONE` for prefix operators.
    pub left: NodeIndex,
    /// `NONE` for postfix operators.
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AssignmentData {
    pub op: OpKind,
    pub target: NodeIndex,
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct InstanceofData {
    pub operand: NodeIndex,
    pub type_name: String,
}

/// Member access `subject.member`.
#[derive(Clone, Debug)]
pub struct InvocationData {
    pub subject: NodeIndex,
    pub member: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BracketData {
    /// `{...}` array initializer rather than `(...)` grouping.
    pub brace: bool,
    pub items: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct CastData {
    pub type_name: String,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct MethodCallData {
    pub callee: NodeIndex,
    pub args: Vec<NodeIndex>,
    /// Set by the lifting stage when the call constructs an anonymous class.
    pub lifted: Option<LiftedId>,
}

/// Indexing `a[i][j]` or array construction `new int[n]{...}`.
#[derive(Clone, Debug)]
pub struct ArrayData {
    /// `NONE` for a dimension list not yet attached to its target.
    pub target: NodeIndex,
    /// One entry per `[...]`; `NONE` for an empty `[]`.
    pub indices: SmallVec<[NodeIndex; 2]>,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Expression(ExpressionData),
    Declaration(DeclarationData),
    Operator(OperatorData),
    Assignment(AssignmentData),
    Instanceof(InstanceofData),
    Invocation(InvocationData),
    Bracket(BracketData),
    Cast(CastData),
    MethodCall(MethodCallData),
    Array(ArrayData),
}

impl NodeKind {
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Expression(_) => "Expression",
            NodeKind::Declaration(_) => "Declaration",
            NodeKind::Operator(_) => "Operator",
            NodeKind::Assignment(_) => "Assignment",
            NodeKind::Instanceof(_) => "Instanceof",
            NodeKind::Invocation(_) => "Invocation",
            NodeKind::Bracket(_) => "Bracket",
            NodeKind::Cast(_) => "Cast",
            NodeKind::MethodCall(_) => "MethodCall",
            NodeKind::Array(_) => "Array",
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Character range inside the statement text the node was resolved from.
    pub span: Span,
    /// Source text of `span`.
    pub text: String,
    /// Paragraph whose scope the node's identifiers resolve in.
    pub scope: ParagraphId,
    /// Variables declared by the end of the node's statement. Locals
    /// declared later in the source are out of sight.
    pub visible_variables: u32,
    pub(crate) category: Cell<Option<ValueCategory>>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span, text: String, scope: ParagraphId) -> Node {
        Node {
            kind,
            span,
            text,
            scope,
            visible_variables: u32::MAX,
            category: Cell::new(None),
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionData> {
        match &self.kind {
            NodeKind::Expression(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(
            &self.kind,
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Identifier,
                ..
            })
        )
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(
            &self.kind,
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Null,
                ..
            })
        )
    }

    /// Type name of `new T`, looking through a construction call.
    pub fn construction_type(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Construction { type_name },
                ..
            }) => Some(type_name),
            _ => None,
        }
    }
}
