//! Statement and control-flow layer of the jcpp translator.
//!
//! This crate provides:
//! - `CodeArena` / `Node` - the arena-backed node model
//! - `Resolver` - operator-precedence resolution of one statement
//! - `CodeBody` - scope chain lookup and value categories
//! - `CodeReader` - the line-driven control-flow state machine
//! - anonymous-class lifting over a finished body

pub mod node;
pub use node::{
    ArrayData, AssignmentData, BracketData, CastData, DeclarationData, ExpressionData,
    ExpressionForm, InstanceofData, InvocationData, KeywordId, LiftedId, MethodCallData, Node,
    NodeIndex, NodeKind, OperatorData, ParagraphId, VariableId,
};

pub mod arena;
pub use arena::{AnonymousSite, Capture, CodeArena, LiftedType};

pub mod node_access;

pub mod context;
pub use context::{ClassSignature, FieldSignature, MethodContext, MethodSignature, ParameterSignature};

pub mod scope;
pub use scope::{Variable, VariableFlags};

pub mod statements;
pub use statements::{
    Branch, CatchClause, KeywordConstruct, KeywordDetail, Paragraph, ParagraphKind, Statement,
};

mod resolver;
pub use resolver::ResolveStats;

pub mod body;
pub use body::CodeBody;

pub mod category;

pub mod reader;
pub use reader::CodeReader;

mod state_keywords;
mod state_paragraph;

mod lifting;

/// Parse a whole method body given as lines.
pub fn parse_body<I, S>(
    context: MethodContext,
    options: jcpp_common::TranslateOptions,
    lines: I,
) -> jcpp_common::TranslateResult<CodeBody>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut reader = CodeReader::new(context, options);
    for line in lines {
        reader.feed_line(line.as_ref())?;
    }
    reader.finish()
}

#[cfg(test)]
#[path = "tests/resolver_unit_tests.rs"]
mod resolver_unit_tests;
