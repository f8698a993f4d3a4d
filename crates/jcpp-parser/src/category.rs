//! Value categories of resolved nodes.
//!
//! Categories are computed on demand and memoized on the node, so the
//! emitter can query any node any number of times.

use crate::body::CodeBody;
use crate::node::{ArrayData, ExpressionData, ExpressionForm, InvocationData, MethodCallData, NodeIndex, NodeKind, OperatorData};
use jcpp_common::ValueCategory;
use jcpp_common::types::{TEXT_TYPE, classify_type, literal_category, strip_array};
use jcpp_scanner::OpKind;

/// `String` methods returning text.
const TEXT_RETURNING: &[&str] = &[
    "substring", "trim", "toLowerCase", "toUpperCase", "replace", "replaceAll", "concat",
    "valueOf", "format", "intern", "toString",
];

/// `String` methods returning a primitive.
const TEXT_PRIMITIVE_RETURNING: &[&str] = &[
    "length", "indexOf", "lastIndexOf", "charAt", "equals", "equalsIgnoreCase", "compareTo",
    "isEmpty", "startsWith", "endsWith", "contains", "hashCode", "matches",
];

/// Container methods returning a primitive.
const CONTAINER_PRIMITIVE_RETURNING: &[&str] = &[
    "size", "isEmpty", "contains", "containsKey", "containsValue", "indexOf", "length",
];

/// How a member of an invocation is named.
enum Member {
    Field(String),
    Call(String, usize),
    Indexed(String),
}

impl CodeBody {
    /// Category of the value `node` evaluates to. `NONE` yields `None`.
    pub fn value_category(&self, node: NodeIndex) -> ValueCategory {
        let Some(entry) = self.arena.get(node) else {
            return ValueCategory::None;
        };
        if let Some(cached) = entry.category.get() {
            return cached;
        }
        let category = self.compute_category(node);
        entry.category.set(Some(category));
        category
    }

    fn compute_category(&self, node: NodeIndex) -> ValueCategory {
        let entry = self.arena.node(node);
        match &entry.kind {
            NodeKind::Expression(ExpressionData { text, form }) => match form {
                ExpressionForm::Literal => literal_category(text).unwrap_or(ValueCategory::CommonExpression),
                ExpressionForm::Null | ExpressionForm::Verbatim => ValueCategory::CommonExpression,
                ExpressionForm::This => ValueCategory::ThisReference,
                ExpressionForm::Construction { .. } => ValueCategory::RawPointer,
                ExpressionForm::Identifier => self
                    .lookup_at(node, text.trim())
                    .map_or(ValueCategory::None, |v| v.category),
            },
            NodeKind::Declaration(data) => self.arena.variable(data.variable).category,
            NodeKind::Operator(data) => self.operator_category(data),
            NodeKind::Assignment(data) => self.value_category(data.target),
            NodeKind::Instanceof(_) => ValueCategory::Primitive,
            NodeKind::Invocation(data) => self.invocation_category(data),
            NodeKind::Bracket(data) => match data.items.as_slice() {
                [inner] if !data.brace => self.value_category(*inner),
                _ => ValueCategory::CommonExpression,
            },
            NodeKind::Cast(data) => self.classify(&data.type_name),
            NodeKind::MethodCall(data) => self.call_category(data),
            NodeKind::Array(data) => self.array_category(data),
        }
    }

    fn classify(&self, type_name: &str) -> ValueCategory {
        match type_name.trim() {
            "void" | "" => ValueCategory::CommonExpression,
            name => classify_type(name, &self.options.extra_container_types),
        }
    }

    fn operator_category(&self, data: &OperatorData) -> ValueCategory {
        match data.op {
            op if op.is_predicate() => ValueCategory::Primitive,
            OpKind::Plus
                if self.value_category(data.left) == ValueCategory::Text
                    || self.value_category(data.right) == ValueCategory::Text =>
            {
                ValueCategory::Text
            }
            OpKind::Question => match &self.arena.get(data.right).map(|n| &n.kind) {
                Some(NodeKind::Operator(branches)) if branches.op == OpKind::Colon => {
                    self.value_category(branches.left)
                }
                _ => ValueCategory::CommonExpression,
            },
            OpKind::Colon => self.value_category(data.left),
            OpKind::Comma => self.value_category(data.right),
            _ => ValueCategory::Primitive,
        }
    }

    fn call_category(&self, data: &MethodCallData) -> ValueCategory {
        let callee = self.arena.node(data.callee);
        if callee.construction_type().is_some() {
            return ValueCategory::RawPointer;
        }
        if !callee.is_identifier() {
            return ValueCategory::CommonExpression;
        }
        self.context
            .find_method(0, callee.text.trim(), data.args.len())
            .map_or(ValueCategory::CommonExpression, |m| self.classify(&m.return_type))
    }

    fn array_category(&self, data: &ArrayData) -> ValueCategory {
        if data.target.is_none() {
            return ValueCategory::Array;
        }
        if self.arena.node(data.target).construction_type().is_some() {
            return ValueCategory::Array;
        }
        self.declared_type(data.target)
            .map_or(ValueCategory::CommonExpression, |t| {
                self.element_category(&t, data.indices.len())
            })
    }

    fn element_category(&self, type_name: &str, depth: usize) -> ValueCategory {
        let (element, dims) = strip_array(type_name);
        if dims == 0 {
            return ValueCategory::CommonExpression;
        }
        let remaining = dims.saturating_sub(depth);
        let mut name = element.to_string();
        for _ in 0..remaining {
            name.push_str("[]");
        }
        self.classify(&name)
    }

    fn member_of(&self, member: NodeIndex) -> Option<Member> {
        let node = self.arena.node(member);
        match &node.kind {
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Identifier,
                text,
            }) => Some(Member::Field(text.trim().to_string())),
            NodeKind::MethodCall(call) => {
                let callee = self.arena.node(call.callee);
                callee
                    .is_identifier()
                    .then(|| Member::Call(callee.text.trim().to_string(), call.args.len()))
            }
            NodeKind::Array(array) if array.target.is_some() => {
                let target = self.arena.node(array.target);
                target
                    .is_identifier()
                    .then(|| Member::Indexed(target.text.trim().to_string()))
            }
            _ => None,
        }
    }

    /// Enclosing class whose members `subject` exposes, as a depth into
    /// the context's class list.
    pub fn class_scope(&self, subject: NodeIndex) -> Option<usize> {
        let node = self.arena.get(subject)?;
        match &node.kind {
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::This,
                text,
            }) => Some(usize::from(text.trim() == "super")),
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Identifier,
                text,
            }) => match self.lookup_at(subject, text.trim()) {
                Some(variable) => self.context.class_depth(&variable.type_name),
                None => self.context.class_depth(text.trim()),
            },
            NodeKind::Invocation(InvocationData { subject, member }) => {
                let is_this = matches!(
                    self.arena.node(*member).as_expression(),
                    Some(ExpressionData {
                        form: ExpressionForm::This,
                        ..
                    })
                );
                if is_this {
                    self.context.class_depth(self.arena.node(*subject).text.trim())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn invocation_category(&self, data: &InvocationData) -> ValueCategory {
        let Some(member) = self.member_of(data.member) else {
            return self.value_category(data.member);
        };
        if let Some(depth) = self.class_scope(data.subject) {
            let class = &self.context.classes[depth];
            let resolved = match &member {
                Member::Field(name) => class.field(name).map(|f| self.classify(&f.type_name)),
                Member::Indexed(name) => class
                    .field(name)
                    .map(|f| self.element_category(&f.type_name, 1)),
                Member::Call(name, argc) => self
                    .context
                    .find_method(depth, name, *argc)
                    .map(|m| self.classify(&m.return_type)),
            };
            if let Some(category) = resolved {
                return category;
            }
        }
        let subject = self.value_category(data.subject);
        let subject_is_text = subject == ValueCategory::Text
            || self.arena.node(data.subject).text.trim() == TEXT_TYPE;
        match member {
            Member::Field(name) if name == "length" && subject == ValueCategory::Array => {
                ValueCategory::Primitive
            }
            Member::Call(name, _) if name == "toString" => ValueCategory::Text,
            Member::Call(name, _) if subject_is_text => {
                if TEXT_RETURNING.contains(&name.as_str()) {
                    ValueCategory::Text
                } else if TEXT_PRIMITIVE_RETURNING.contains(&name.as_str()) {
                    ValueCategory::Primitive
                } else {
                    ValueCategory::CommonExpression
                }
            }
            Member::Call(name, _)
                if subject == ValueCategory::Container
                    && CONTAINER_PRIMITIVE_RETURNING.contains(&name.as_str()) =>
            {
                ValueCategory::Primitive
            }
            _ => ValueCategory::CommonExpression,
        }
    }

    /// Declared source type of the value `node` names, where known.
    pub fn declared_type(&self, node: NodeIndex) -> Option<String> {
        let entry = self.arena.get(node)?;
        match &entry.kind {
            NodeKind::Declaration(data) => Some(self.arena.variable(data.variable).type_name.clone()),
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Identifier,
                text,
            }) => self.lookup_at(node, text.trim()).map(|v| v.type_name.clone()),
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Construction { type_name },
                ..
            }) => Some(type_name.clone()),
            NodeKind::Cast(data) => Some(data.type_name.clone()),
            NodeKind::Assignment(data) => self.declared_type(data.target),
            NodeKind::Bracket(data) if !data.brace && data.items.len() == 1 => {
                self.declared_type(data.items[0])
            }
            NodeKind::Invocation(data) => {
                let depth = self.class_scope(data.subject)?;
                match self.member_of(data.member)? {
                    Member::Field(name) => self.context.classes[depth]
                        .field(&name)
                        .map(|f| f.type_name.clone()),
                    _ => None,
                }
            }
            NodeKind::Array(data) if data.target.is_some() => {
                let target = self.declared_type(data.target)?;
                let (element, dims) = strip_array(&target);
                let mut name = element.to_string();
                if self.arena.node(data.target).construction_type().is_some() {
                    for _ in 0..dims + data.indices.len() {
                        name.push_str("[]");
                    }
                    return Some(name);
                }
                for _ in 0..dims.saturating_sub(data.indices.len()) {
                    name.push_str("[]");
                }
                Some(name)
            }
            _ => None,
        }
    }
}
