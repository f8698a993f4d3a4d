//! Lowering pass: decide how each node is emitted.
//!
//! The pass walks the finished body once, in source order, and records
//! `TransformDirective`s in a `TransformContext`. It never mutates the
//! body, so running it twice yields the same directives. Referenced user
//! types are reported to the collector as they are met.
//!
//! Rewrites recorded here:
//! - text concatenation wraps the primitive side in the to-text helper
//! - `== null` / `!= null` on containers and arrays become emptiness tests
//! - assignments of null or fresh constructions to containers, arrays and
//!   text become clear / init-empty / bulk-copy / constructor forms
//! - `instanceof` becomes a pointer or object type-test helper
//! - member access picks `->`, `::` or `.`
//! - array constructions outside those assignments become inline
//!   target arrays; unsigned shifts and self copies are left for review
//! - outer-class fields, smart-handle arguments, null literals,
//!   `throw new T(..)` and unstructured text get their markers

use crate::collector::TypeCollector;
use crate::transform_context::{MemberAccess, TransformContext, TransformDirective};
use jcpp_common::ValueCategory;
use jcpp_common::limits::{LIFTED_TYPE_PREFIX, MAX_EMIT_DEPTH};
use jcpp_common::types::{generic_arguments, generic_base, is_container, is_reportable_type, strip_array};
use jcpp_parser::{
    AssignmentData, CodeBody, ExpressionData, ExpressionForm, InvocationData, KeywordDetail,
    KeywordId, MethodCallData, NodeIndex, NodeKind, OperatorData, ParagraphId, Statement,
};
use jcpp_scanner::{Keyword, OpKind};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

pub struct LoweringPass<'a> {
    body: &'a CodeBody,
    collector: &'a mut dyn TypeCollector,
    transforms: TransformContext,
    /// Calls whose subject is a container: arguments keep their handles.
    container_calls: FxHashSet<NodeIndex>,
    /// Member names and callees; never resolved as local identifiers.
    member_positions: FxHashSet<NodeIndex>,
    /// Array constructions already rendered by an assignment rewrite.
    assigned_arrays: FxHashSet<NodeIndex>,
    temporaries: u32,
    visit_depth: u32,
}

impl<'a> LoweringPass<'a> {
    pub fn new(body: &'a CodeBody, collector: &'a mut dyn TypeCollector) -> Self {
        LoweringPass {
            body,
            collector,
            transforms: TransformContext::new(),
            container_calls: FxHashSet::default(),
            member_positions: FxHashSet::default(),
            assigned_arrays: FxHashSet::default(),
            temporaries: 0,
            visit_depth: 0,
        }
    }

    /// Run the pass over the whole body.
    pub fn run(mut self) -> TransformContext {
        let root = self.body.root();
        self.visit_paragraph(root);
        debug!(
            directives = self.transforms.len(),
            temporaries = self.temporaries,
            "lowering finished"
        );
        self.transforms
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn visit_paragraph(&mut self, id: ParagraphId) {
        let body = self.body;
        for &statement in &body.paragraph(id).items {
            match statement {
                Statement::Empty => {}
                Statement::Expression(node) => {
                    self.lower_statement_root(node, true);
                    self.visit(node);
                }
                Statement::Block(block) => self.visit_paragraph(block),
                Statement::Keyword(keyword) => self.visit_keyword(keyword),
            }
        }
    }

    fn visit_keyword(&mut self, id: KeywordId) {
        let body = self.body;
        let construct = body.keyword(id);
        match &construct.detail {
            KeywordDetail::Conditional { branches } => {
                for branch in branches {
                    self.visit(branch.condition);
                    self.visit_paragraph(branch.body);
                }
            }
            KeywordDetail::CountedLoop {
                init,
                condition,
                update,
                body: loop_body,
            } => {
                self.lower_statement_root(*init, false);
                self.visit(*init);
                self.visit(*condition);
                self.visit(*update);
                self.visit_paragraph(*loop_body);
            }
            KeywordDetail::IteratorLoop {
                header,
                body: loop_body,
                ..
            } => {
                self.visit(*header);
                self.visit_paragraph(*loop_body);
            }
            KeywordDetail::While {
                condition,
                body: loop_body,
            } => {
                self.visit(*condition);
                self.visit_paragraph(*loop_body);
            }
            KeywordDetail::DoWhile {
                body: loop_body,
                condition,
            } => {
                self.visit_paragraph(*loop_body);
                self.visit(*condition);
            }
            KeywordDetail::Switch {
                subject,
                body: switch_body,
            } => {
                self.visit(*subject);
                self.visit_paragraph(*switch_body);
            }
            KeywordDetail::Try {
                body: protected,
                catches,
                finally,
            } => {
                self.visit_paragraph(*protected);
                let mut lowered = None;
                for clause in catches {
                    self.visit(clause.declaration);
                    // Multi-catch alternatives share one handler.
                    if lowered != Some(clause.body) {
                        self.visit_paragraph(clause.body);
                        lowered = Some(clause.body);
                    }
                }
                if let Some(cleanup) = finally {
                    self.visit_paragraph(*cleanup);
                }
            }
            KeywordDetail::Synchronized { lock, body: locked } => {
                self.visit(*lock);
                self.visit_paragraph(*locked);
            }
            KeywordDetail::Jump { value, .. } => {
                if construct.keyword == Keyword::Throw {
                    self.lower_throw(*value);
                }
                self.visit(*value);
            }
            KeywordDetail::Case { value } => self.visit(*value),
            KeywordDetail::Default | KeywordDetail::Pending => {}
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn visit(&mut self, node: NodeIndex) {
        if node.is_none() {
            return;
        }
        if self.visit_depth >= MAX_EMIT_DEPTH {
            trace!(node = node.0, "lowering depth limit reached");
            return;
        }
        self.visit_depth += 1;
        self.lower_node(node);
        for child in self.body.arena().children(node) {
            self.visit(child);
        }
        self.visit_depth -= 1;
    }

    fn lower_node(&mut self, node: NodeIndex) {
        let body = self.body;
        let entry = body.node(node);
        match &entry.kind {
            NodeKind::Expression(ExpressionData { text, form }) => match form {
                ExpressionForm::Null => {
                    self.transforms.insert(node, TransformDirective::NullLiteral);
                }
                ExpressionForm::Verbatim => {
                    debug!(text = %text.trim(), "unsupported construct left for manual review");
                    self.transforms.insert(node, TransformDirective::Unsupported);
                }
                ExpressionForm::Construction { type_name } => self.report_type(type_name),
                ExpressionForm::Identifier => self.lower_identifier(node, text.trim()),
                ExpressionForm::Literal | ExpressionForm::This => {}
            },
            NodeKind::Declaration(data) => {
                let type_name = &body.variable(data.variable).type_name;
                self.report_type(type_name);
            }
            NodeKind::Operator(data) => self.lower_operator(node, data),
            NodeKind::Assignment(data) if data.op == OpKind::UShrAssign => {
                self.transforms.insert(node, TransformDirective::Unsupported);
            }
            NodeKind::Assignment(data) => {
                if data.op == OpKind::PlusAssign
                    && body.value_category(data.target) == ValueCategory::Text
                    && body.value_category(data.value) == ValueCategory::Primitive
                {
                    self.transforms.insert(data.value, TransformDirective::ToText);
                }
            }
            NodeKind::Instanceof(data) => {
                self.report_type(&data.type_name);
                let pointer = body.value_category(data.operand).is_raw_pointer();
                self.transforms
                    .insert(node, TransformDirective::TypeTest { pointer });
            }
            NodeKind::Invocation(data) => self.lower_invocation(node, data),
            NodeKind::Cast(data) => self.report_type(&data.type_name),
            NodeKind::MethodCall(data) => self.lower_call(node, data),
            NodeKind::Array(data) => {
                let constructed = data.target.is_some() && body.node(data.target).construction_type().is_some();
                if constructed && !self.assigned_arrays.contains(&node) {
                    let directive = match body.declared_type(node) {
                        Some(array_type) => TransformDirective::ArrayValue { array_type },
                        None => TransformDirective::Unsupported,
                    };
                    self.transforms.insert(node, directive);
                }
            }
            NodeKind::Bracket(_) => {}
        }
    }

    fn lower_identifier(&mut self, node: NodeIndex, name: &str) {
        if !self.body.options().mark_outer_fields || self.member_positions.contains(&node) {
            return;
        }
        if self
            .body
            .lookup_at(node, name)
            .is_some_and(|variable| variable.is_outer_field())
        {
            self.transforms.insert(node, TransformDirective::OuterField);
        }
    }

    fn lower_operator(&mut self, node: NodeIndex, data: &OperatorData) {
        let body = self.body;
        match data.op {
            OpKind::Plus if data.left.is_some() => self.text_concatenation(data.left, data.right),
            OpKind::EqEq | OpKind::NotEq => {
                let subject = if body.node(data.right).is_null_literal() {
                    data.left
                } else if body.node(data.left).is_null_literal() {
                    data.right
                } else {
                    return;
                };
                if matches!(
                    body.value_category(subject),
                    ValueCategory::Container | ValueCategory::Array
                ) {
                    self.transforms.insert(
                        node,
                        TransformDirective::EmptinessTest {
                            subject,
                            negated: data.op == OpKind::NotEq,
                        },
                    );
                }
            }
            // No unsigned shift in the target language.
            OpKind::UShr => self.transforms.insert(node, TransformDirective::Unsupported),
            OpKind::Question => {
                if let NodeKind::Operator(OperatorData {
                    op: OpKind::Colon,
                    left,
                    right,
                }) = &body.node(data.right).kind
                {
                    self.text_concatenation(*left, *right);
                }
            }
            _ => {}
        }
    }

    /// Wrap the primitive side of a text/primitive pair.
    fn text_concatenation(&mut self, left: NodeIndex, right: NodeIndex) {
        let body = self.body;
        match (body.value_category(left), body.value_category(right)) {
            (ValueCategory::Text, ValueCategory::Primitive) => {
                self.transforms.insert(right, TransformDirective::ToText);
            }
            (ValueCategory::Primitive, ValueCategory::Text) => {
                self.transforms.insert(left, TransformDirective::ToText);
            }
            _ => {}
        }
    }

    fn lower_invocation(&mut self, node: NodeIndex, data: &InvocationData) {
        let body = self.body;
        self.member_positions.insert(data.member);
        let member = body.node(data.member);
        if let NodeKind::MethodCall(call) = &member.kind {
            self.member_positions.insert(call.callee);
        }
        if let NodeKind::Array(array) = &member.kind {
            self.member_positions.insert(array.target);
        }
        if matches!(
            member.as_expression(),
            Some(ExpressionData {
                form: ExpressionForm::This,
                ..
            })
        ) {
            // `Outer.this` has no target counterpart.
            self.transforms.insert(node, TransformDirective::Unsupported);
            return;
        }

        let subject_category = body.value_category(data.subject);
        let access = match subject_category {
            ValueCategory::ThisReference | ValueCategory::RawPointer | ValueCategory::OwnedValue => {
                MemberAccess::Arrow
            }
            ValueCategory::None => {
                let subject = body.node(data.subject);
                let name = subject.text.trim();
                if subject.is_identifier() && name.starts_with(|c: char| c.is_ascii_uppercase()) {
                    self.report_type(name);
                    MemberAccess::Scope
                } else {
                    MemberAccess::Arrow
                }
            }
            _ => MemberAccess::Dot,
        };
        self.transforms
            .insert(node, TransformDirective::MemberAccess(access));

        if subject_category == ValueCategory::Container
            && matches!(member.kind, NodeKind::MethodCall(_))
        {
            self.container_calls.insert(data.member);
        }
    }

    fn lower_call(&mut self, node: NodeIndex, data: &MethodCallData) {
        let body = self.body;
        if !body.options().smart_handle_get || self.container_calls.contains(&node) {
            return;
        }
        for &arg in &data.args {
            if body.node(arg).is_identifier() && body.value_category(arg) == ValueCategory::OwnedValue {
                self.transforms.insert(arg, TransformDirective::SmartHandleGet);
            }
        }
    }

    fn lower_throw(&mut self, value: NodeIndex) {
        let body = self.body;
        let Some(entry) = body.arena().get(value) else {
            return;
        };
        if let NodeKind::MethodCall(call) = &entry.kind
            && call.lifted.is_none()
            && body.node(call.callee).construction_type().is_some()
        {
            self.transforms.insert(value, TransformDirective::ThrowByValue);
        }
    }

    // =========================================================================
    // Assignment rewrites
    // =========================================================================

    /// Rewrites that change the shape of a whole statement. `sole` is false
    /// inside `for` headers, where a second statement cannot be emitted.
    fn lower_statement_root(&mut self, node: NodeIndex, sole: bool) {
        let body = self.body;
        let Some(entry) = body.arena().get(node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Operator(OperatorData {
                op: OpKind::Comma,
                left,
                right,
            }) => {
                self.lower_statement_root(*left, false);
                self.lower_statement_root(*right, false);
            }
            NodeKind::Assignment(data) if data.op == OpKind::Assign => {
                self.lower_assignment(node, data, sole);
            }
            _ => {}
        }
    }

    fn lower_assignment(&mut self, node: NodeIndex, data: &AssignmentData, sole: bool) {
        let body = self.body;
        let target_category = body.value_category(data.target);
        if !target_category.is_value_collection() {
            return;
        }
        let declare = matches!(body.node(data.target).kind, NodeKind::Declaration(_));
        let emptied = if declare {
            TransformDirective::InitEmpty
        } else {
            TransformDirective::ClearValue {
                text: target_category == ValueCategory::Text,
            }
        };
        let Some(value) = body.arena().get(data.value) else {
            return;
        };
        if value.is_null_literal() {
            self.transforms.insert(node, emptied);
            return;
        }

        match &value.kind {
            NodeKind::MethodCall(call) if call.lifted.is_none() => {
                let Some(constructed) = body.node(call.callee).construction_type() else {
                    return;
                };
                match call.args.as_slice() {
                    [] => self.transforms.insert(node, emptied),
                    [source] if target_category == ValueCategory::Container => {
                        match body.value_category(*source) {
                            // Initial capacity.
                            ValueCategory::Primitive => self.transforms.insert(node, emptied),
                            _ if !declare && same_value(body, data.target, *source) => {
                                debug!(text = %body.node(node).text.trim(), "copy of itself left for manual review");
                                self.transforms.insert(node, TransformDirective::Unsupported);
                            }
                            source_category if sole => {
                                let target_type = body.declared_type(data.target).unwrap_or_default();
                                self.transforms.insert(
                                    node,
                                    TransformDirective::BulkCopy {
                                        source: *source,
                                        method: bulk_copy_method(constructed, &target_type),
                                        declare,
                                        checked: source_category == ValueCategory::Container,
                                    },
                                );
                            }
                            _ => {}
                        }
                    }
                    _ if target_category == ValueCategory::Text => {
                        self.transforms.insert(
                            node,
                            TransformDirective::ConstructFrom {
                                call: data.value,
                                declare,
                            },
                        );
                    }
                    _ => {}
                }
            }
            NodeKind::Array(array)
                if array.target.is_some()
                    && body.node(array.target).construction_type().is_some() =>
            {
                let dims: SmallVec<[NodeIndex; 2]> =
                    array.indices.iter().copied().filter(|i| i.is_some()).collect();
                if declare {
                    self.assigned_arrays.insert(data.value);
                    self.transforms.insert(
                        node,
                        TransformDirective::ArrayConstructor {
                            dims,
                            initializer: array.initializer,
                        },
                    );
                } else if sole && array.initializer.is_none() {
                    self.assigned_arrays.insert(data.value);
                    self.temporaries += 1;
                    let array_type = body.declared_type(data.value).unwrap_or_default();
                    self.transforms.insert(
                        node,
                        TransformDirective::ArrayTemporary {
                            temp: format!("tempArray{}", self.temporaries),
                            array_type,
                            dims,
                        },
                    );
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Type reporting
    // =========================================================================

    fn report_type(&mut self, name: &str) {
        let (element, _) = strip_array(name);
        let element = element.trim_start_matches('?').trim_start();
        let element = element
            .strip_prefix("extends ")
            .or_else(|| element.strip_prefix("super "))
            .unwrap_or(element)
            .trim();
        for argument in generic_arguments(element) {
            self.report_type(argument);
        }
        let base = generic_base(element);
        let body = self.body;
        if !is_reportable_type(base)
            || base.starts_with(LIFTED_TYPE_PREFIX)
            || is_container(base, &body.options().extra_container_types)
            || body.context().class_depth(base).is_some()
        {
            return;
        }
        self.collector.report_type(base);
    }
}

/// Both nodes spell the same variable or field.
fn same_value(body: &CodeBody, left: NodeIndex, right: NodeIndex) -> bool {
    let (left, right) = (body.node(left), body.node(right));
    left.is_identifier() == right.is_identifier() && left.text.trim() == right.text.trim()
}

/// `putAll` for map-like types, `addAll` otherwise.
fn bulk_copy_method(constructed: &str, declared: &str) -> &'static str {
    let hints = [generic_base(constructed), generic_base(declared)];
    if hints
        .iter()
        .any(|name| name.contains("Map") || name.contains("Table") || name.contains("table"))
    {
        "putAll"
    } else {
        "addAll"
    }
}
