//! Printer: renders a lowered body as C++ text.
//!
//! Statements are written line by line through a `SourceWriter`;
//! expressions render to strings. Before emitting a node the printer
//! consults the `TransformContext` and lets any directive replace or wrap
//! the node's plain rendering.

use crate::source_writer::SourceWriter;
use crate::transform_context::{MemberAccess, TransformContext, TransformDirective};
use crate::type_spelling::{spell_plain, spell_type};
use jcpp_common::TranslateOptions;
use jcpp_common::limits::MAX_EMIT_DEPTH;
use jcpp_common::types::strip_array;
use jcpp_parser::{
    ArrayData, BracketData, CodeBody, ExpressionData, ExpressionForm, KeywordConstruct,
    KeywordDetail, KeywordId, LiftedId, MethodCallData, Node, NodeIndex, NodeKind, OperatorData,
    ParagraphId, ParagraphKind, Statement,
};
use jcpp_scanner::{Keyword, OpKind};
use std::cell::Cell;

const MANUAL_REVIEW: &str = "/* manual review */";

pub struct Printer<'a> {
    body: &'a CodeBody,
    transforms: &'a TransformContext,
    options: &'a TranslateOptions,
    depth: Cell<u32>,
}

impl<'a> Printer<'a> {
    pub fn new(body: &'a CodeBody, transforms: &'a TransformContext) -> Self {
        Printer {
            body,
            transforms,
            options: body.options(),
            depth: Cell::new(0),
        }
    }

    fn writer(&self, indent: u32) -> SourceWriter {
        SourceWriter::new(self.options.indent_unit(), indent)
    }

    /// The whole body at `indent` levels.
    pub fn render_body(&self, indent: u32) -> String {
        let mut writer = self.writer(indent);
        self.emit_items(&mut writer, self.body.root());
        writer.finish()
    }

    /// One paragraph's statements at `indent` levels, without braces.
    pub fn render_paragraph(&self, id: ParagraphId, indent: u32) -> String {
        let mut writer = self.writer(indent);
        self.emit_items(&mut writer, id);
        writer.finish()
    }

    /// One keyword construct and its bodies.
    pub fn render_keyword(&self, id: KeywordId, indent: u32) -> String {
        let mut writer = self.writer(indent);
        self.emit_keyword(&mut writer, id);
        writer.finish()
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn emit_items(&self, writer: &mut SourceWriter, id: ParagraphId) {
        let paragraph = self.body.paragraph(id);
        let switch_body = paragraph.kind == ParagraphKind::SwitchBody;
        for &statement in &paragraph.items {
            let is_label = matches!(statement, Statement::Keyword(k)
                if matches!(self.body.keyword(k).keyword, Keyword::Case | Keyword::Default));
            if switch_body && !is_label {
                writer.increase_indent();
                self.emit_statement(writer, statement);
                writer.decrease_indent();
            } else {
                self.emit_statement(writer, statement);
            }
        }
    }

    fn emit_statement(&self, writer: &mut SourceWriter, statement: Statement) {
        match statement {
            Statement::Empty => writer.line(";"),
            Statement::Expression(node) => {
                self.emit_prelude(writer, node);
                writer.line(&format!("{};", self.expression(node)));
            }
            Statement::Block(id) => {
                if let Some(label) = &self.body.paragraph(id).label {
                    writer.line(&format!("{label}:"));
                }
                writer.line("{");
                self.emit_body(writer, id);
                writer.line("}");
            }
            Statement::Keyword(id) => self.emit_keyword(writer, id),
        }
    }

    /// Declarations a statement needs on the line before it.
    fn emit_prelude(&self, writer: &mut SourceWriter, node: NodeIndex) {
        for directive in self.transforms.get(node) {
            if let TransformDirective::ArrayTemporary {
                temp,
                array_type,
                dims,
            } = directive
            {
                writer.line(&format!(
                    "/* auto generated */ {} {temp}({});",
                    spell_type(array_type, &self.options.extra_container_types),
                    self.list(dims)
                ));
            }
        }
    }

    fn emit_body(&self, writer: &mut SourceWriter, id: ParagraphId) {
        writer.increase_indent();
        self.emit_items(writer, id);
        writer.decrease_indent();
    }

    fn emit_keyword(&self, writer: &mut SourceWriter, id: KeywordId) {
        let construct = self.body.keyword(id);
        if let Some(label) = &construct.label {
            writer.line(&format!("{label}:"));
        }
        match &construct.detail {
            KeywordDetail::Conditional { branches } => {
                for (i, branch) in branches.iter().enumerate() {
                    let header = if i == 0 {
                        format!("if ({}) {{", self.expression(branch.condition))
                    } else if branch.condition.is_none() {
                        "} else {".to_string()
                    } else {
                        format!("}} else if ({}) {{", self.expression(branch.condition))
                    };
                    writer.line(&header);
                    self.emit_body(writer, branch.body);
                }
                writer.line("}");
            }
            KeywordDetail::CountedLoop {
                init,
                condition,
                update,
                body,
            } => {
                let mut header = format!("for ({};", self.expression(*init));
                for clause in [*condition, *update] {
                    if clause.is_some() {
                        header.push(' ');
                        header.push_str(&self.expression(clause));
                    }
                    header.push(';');
                }
                header.pop();
                writer.line(&format!("{header}) {{"));
                self.emit_body(writer, *body);
                writer.line("}");
            }
            KeywordDetail::IteratorLoop {
                header,
                element_iteration,
                body,
            } => {
                writer.line(&format!(
                    "for ({}) {{",
                    self.iteration_header(*header, *element_iteration)
                ));
                self.emit_body(writer, *body);
                writer.line("}");
            }
            KeywordDetail::While { condition, body } => {
                writer.line(&format!("while ({}) {{", self.expression(*condition)));
                self.emit_body(writer, *body);
                writer.line("}");
            }
            KeywordDetail::DoWhile { body, condition } => {
                writer.line("do {");
                self.emit_body(writer, *body);
                writer.line(&format!("}} while ({});", self.expression(*condition)));
            }
            KeywordDetail::Switch { subject, body } => {
                writer.line(&format!("switch ({}) {{", self.expression(*subject)));
                self.emit_body(writer, *body);
                writer.line("}");
            }
            KeywordDetail::Try {
                body,
                catches,
                finally,
            } => {
                if let Some(cleanup) = finally {
                    // The scope-exit action must be registered before the
                    // guarded work.
                    writer.line("{");
                    writer.increase_indent();
                    writer.line(&format!("{} {{", self.options.defer_keyword));
                    self.emit_body(writer, *cleanup);
                    writer.line("};");
                }
                if catches.is_empty() {
                    self.emit_items(writer, *body);
                } else {
                    writer.line("try {");
                    self.emit_body(writer, *body);
                    for clause in catches {
                        writer.line(&format!(
                            "}} catch ({}) {{",
                            self.catch_declaration(clause.declaration)
                        ));
                        self.emit_body(writer, clause.body);
                    }
                    writer.line("}");
                }
                if finally.is_some() {
                    writer.decrease_indent();
                    writer.line("}");
                }
            }
            KeywordDetail::Synchronized { lock, body } => {
                writer.line(&format!(
                    "/* synchronized ({}) */ {{",
                    self.expression(*lock)
                ));
                self.emit_body(writer, *body);
                writer.line("}");
            }
            KeywordDetail::Jump { value, label } => writer.line(&self.jump(construct, *value, label.as_deref())),
            KeywordDetail::Case { value } => {
                writer.line(&format!("case {}:", self.expression(*value)));
            }
            KeywordDetail::Default => writer.line("default:"),
            KeywordDetail::Pending => {}
        }
    }

    fn jump(&self, construct: &KeywordConstruct, value: NodeIndex, label: Option<&str>) -> String {
        let keyword = construct.keyword.text();
        match label {
            Some(label) => format!("{keyword} /* {label} */;"),
            None if value.is_some() => format!("{keyword} {};", self.expression(value)),
            None => format!("{keyword};"),
        }
    }

    fn iteration_header(&self, header: NodeIndex, element_iteration: bool) -> String {
        let Some(NodeKind::Operator(OperatorData {
            op: OpKind::Colon,
            left,
            right,
        })) = self.body.arena().get(header).map(|node| &node.kind)
        else {
            return self.expression(header);
        };
        if element_iteration
            && let Some(variable) = self.body.declared_variable(*left)
        {
            return format!(
                "auto& {} : {}",
                self.body.variable(variable).name,
                self.expression(*right)
            );
        }
        format!("{} : {}", self.expression(*left), self.expression(*right))
    }

    fn catch_declaration(&self, declaration: NodeIndex) -> String {
        match self.body.declared_variable(declaration) {
            Some(variable) => {
                let variable = self.body.variable(variable);
                format!("{}& {}", spell_plain(&variable.type_name), variable.name)
            }
            None => self.expression(declaration),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Render one expression node. `NONE` renders as the empty string.
    pub fn expression(&self, node: NodeIndex) -> String {
        let Some(entry) = self.body.arena().get(node) else {
            return String::new();
        };
        let depth = self.depth.get();
        if depth >= MAX_EMIT_DEPTH {
            return entry.text.trim().to_string();
        }
        self.depth.set(depth + 1);
        let directives = self.transforms.get(node);
        let mut text = self
            .directed(node, entry, directives)
            .unwrap_or_else(|| self.plain(node, entry));
        for directive in directives {
            match directive {
                TransformDirective::OuterField => text = format!("/* outer */ {text}"),
                TransformDirective::SmartHandleGet => text.push_str(".get()"),
                TransformDirective::ToText => {
                    text = format!("{}({text})", self.options.to_text_helper);
                }
                _ => {}
            }
        }
        self.depth.set(depth);
        text
    }

    /// Rendering dictated by a replacing directive, if the node has one.
    fn directed(&self, node: NodeIndex, entry: &Node, directives: &[TransformDirective]) -> Option<String> {
        for directive in directives {
            let text = match directive {
                TransformDirective::Unsupported => {
                    format!("{MANUAL_REVIEW} {}", entry.text.trim())
                }
                TransformDirective::NullLiteral => self.options.null_literal.clone(),
                TransformDirective::EmptinessTest { subject, negated } => {
                    let comparison = if *negated { "> 0" } else { "== 0" };
                    format!("{}.size() {comparison}", self.expression(*subject))
                }
                TransformDirective::TypeTest { pointer } => {
                    let NodeKind::Instanceof(data) = &entry.kind else {
                        continue;
                    };
                    let helper = if *pointer {
                        &self.options.pointer_type_test
                    } else {
                        &self.options.object_type_test
                    };
                    format!(
                        "{helper}<{}>({})",
                        spell_plain(&data.type_name),
                        self.expression(data.operand)
                    )
                }
                TransformDirective::ThrowByValue => {
                    let NodeKind::MethodCall(call) = &entry.kind else {
                        continue;
                    };
                    let type_name = self.body.node(call.callee).construction_type()?;
                    format!("{}({})", spell_plain(type_name), self.list(&call.args))
                }
                TransformDirective::ArrayValue { array_type } => {
                    let NodeKind::Array(data) = &entry.kind else {
                        continue;
                    };
                    let spelled = spell_type(array_type, &self.options.extra_container_types);
                    if data.initializer.is_some() {
                        format!("{spelled}({})", self.expression(data.initializer))
                    } else {
                        let dims: Vec<NodeIndex> = data.indices.iter().copied().filter(|i| i.is_some()).collect();
                        format!("{spelled}({})", self.list(&dims))
                    }
                }
                TransformDirective::InitEmpty
                | TransformDirective::ClearValue { .. }
                | TransformDirective::BulkCopy { .. }
                | TransformDirective::ConstructFrom { .. }
                | TransformDirective::ArrayConstructor { .. }
                | TransformDirective::ArrayTemporary { .. } => {
                    let NodeKind::Assignment(data) = &entry.kind else {
                        continue;
                    };
                    self.rewritten_assignment(data.target, directive)?
                }
                TransformDirective::ToText
                | TransformDirective::MemberAccess(_)
                | TransformDirective::OuterField
                | TransformDirective::SmartHandleGet => continue,
            };
            tracing::trace!(node = node.0, %text, "directive applied");
            return Some(text);
        }
        None
    }

    fn rewritten_assignment(&self, target: NodeIndex, directive: &TransformDirective) -> Option<String> {
        let target_text = self.expression(target);
        Some(match directive {
            TransformDirective::InitEmpty => target_text,
            TransformDirective::ClearValue { text: true } => format!("{target_text} = \"\""),
            TransformDirective::ClearValue { text: false } => format!("{target_text}.clear()"),
            TransformDirective::BulkCopy {
                source,
                method,
                declare,
                checked,
            } => {
                let (head, name) = if *declare {
                    let variable = self.body.declared_variable(target)?;
                    (target_text, self.body.variable(variable).name.clone())
                } else {
                    (format!("{target_text}.clear()"), target_text)
                };
                let mut text = format!("{head}; {name}.{method}({})", self.expression(*source));
                if !checked {
                    text.push(' ');
                    text.push_str(MANUAL_REVIEW);
                }
                text
            }
            TransformDirective::ConstructFrom { call, declare } => {
                let NodeKind::MethodCall(data) = &self.body.node(*call).kind else {
                    return None;
                };
                let args = self.list(&data.args);
                if *declare {
                    format!("{target_text}({args})")
                } else {
                    let type_name = self.body.node(data.callee).construction_type()?;
                    format!("{target_text} = {}({args})", spell_plain(type_name))
                }
            }
            TransformDirective::ArrayConstructor { dims, initializer } => {
                if initializer.is_some() {
                    format!("{target_text} = {}", self.expression(*initializer))
                } else {
                    format!("{target_text}({})", self.list(dims))
                }
            }
            TransformDirective::ArrayTemporary { temp, .. } => format!("{target_text} = {temp}"),
            _ => return None,
        })
    }

    fn plain(&self, node: NodeIndex, entry: &Node) -> String {
        match &entry.kind {
            NodeKind::Expression(ExpressionData { text, form }) => match form {
                ExpressionForm::Null => self.options.null_literal.clone(),
                ExpressionForm::Construction { type_name } => {
                    format!("new {}", spell_plain(type_name))
                }
                ExpressionForm::Identifier
                | ExpressionForm::Literal
                | ExpressionForm::This
                | ExpressionForm::Verbatim => text.trim().to_string(),
            },
            NodeKind::Declaration(data) => {
                let variable = self.body.variable(data.variable);
                if data.continued {
                    variable.name.clone()
                } else {
                    format!(
                        "{} {}",
                        spell_type(&variable.type_name, &self.options.extra_container_types),
                        variable.name
                    )
                }
            }
            NodeKind::Operator(data) => self.operator(data),
            NodeKind::Assignment(data) => format!(
                "{} {} {}",
                self.expression(data.target),
                data.op.text(),
                self.expression(data.value)
            ),
            NodeKind::Instanceof(data) => format!(
                "{} instanceof {}",
                self.expression(data.operand),
                data.type_name
            ),
            NodeKind::Invocation(data) => {
                let access = self
                    .transforms
                    .get(node)
                    .iter()
                    .find_map(|d| match d {
                        TransformDirective::MemberAccess(access) => Some(*access),
                        _ => None,
                    })
                    .unwrap_or(MemberAccess::Dot);
                format!(
                    "{}{}{}",
                    self.expression(data.subject),
                    access.text(),
                    self.expression(data.member)
                )
            }
            NodeKind::Bracket(BracketData { brace, items }) => {
                if *brace {
                    format!("{{{}}}", self.list(items))
                } else {
                    format!("({})", self.list(items))
                }
            }
            NodeKind::Cast(data) => {
                let target = if strip_array(&data.type_name).1 > 0 {
                    spell_type(&data.type_name, &self.options.extra_container_types)
                } else {
                    spell_plain(&data.type_name)
                };
                format!("static_cast<{target}>({})", self.expression(data.operand))
            }
            NodeKind::MethodCall(call) => self.call(call),
            NodeKind::Array(data) => self.array(data),
        }
    }

    fn operator(&self, data: &OperatorData) -> String {
        let op = data.op.text();
        if data.left.is_none() {
            return format!("{op}{}", self.expression(data.right));
        }
        if data.right.is_none() {
            return format!("{}{op}", self.expression(data.left));
        }
        let left = self.expression(data.left);
        let right = self.expression(data.right);
        if data.op == OpKind::Comma {
            format!("{left}, {right}")
        } else {
            format!("{left} {op} {right}")
        }
    }

    fn call(&self, call: &MethodCallData) -> String {
        if let Some(lifted) = call.lifted {
            return self.lifted_construction(lifted, call);
        }
        format!("{}({})", self.expression(call.callee), self.list(&call.args))
    }

    fn lifted_construction(&self, lifted: LiftedId, call: &MethodCallData) -> String {
        let lifted = self.body.arena().lifted_type(lifted);
        let mut args: Vec<String> = call.args.iter().map(|&arg| self.expression(arg)).collect();
        args.extend(lifted.captures.iter().map(|capture| capture.name.clone()));
        format!("new {}({})", lifted.name, args.join(", "))
    }

    fn array(&self, data: &ArrayData) -> String {
        let mut text = self.expression(data.target);
        for &index in &data.indices {
            text.push('[');
            text.push_str(&self.expression(index));
            text.push(']');
        }
        if data.initializer.is_some() {
            text.push(' ');
            text.push_str(&self.expression(data.initializer));
        }
        text
    }

    fn list(&self, items: &[NodeIndex]) -> String {
        items
            .iter()
            .map(|&item| self.expression(item))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // =========================================================================
    // Lifted types
    // =========================================================================

    /// Class definition for a lifted anonymous type. Captures become
    /// constructor parameters and members; the class body is carried over
    /// for manual review.
    pub fn render_lifted(&self, id: LiftedId, indent: u32) -> String {
        let lifted = self.body.arena().lifted_type(id);
        let extra = &self.options.extra_container_types;
        let mut writer = self.writer(indent);
        writer.line(&format!(
            "class {} : public {} {{",
            lifted.name,
            spell_plain(&lifted.base_type)
        ));
        writer.line("public:");
        writer.increase_indent();
        let parameters = lifted
            .captures
            .iter()
            .map(|c| format!("{} {}", spell_type(&c.type_name, extra), c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let initializers = lifted
            .captures
            .iter()
            .map(|c| format!("{0}({0})", c.name))
            .collect::<Vec<_>>()
            .join(", ");
        if initializers.is_empty() {
            writer.line(&format!("{}({parameters}) {{}}", lifted.name));
        } else {
            writer.line(&format!("{}({parameters}) : {initializers} {{}}", lifted.name));
        }
        writer.line(&format!("{MANUAL_REVIEW} {}", lifted.body.trim()));
        writer.decrease_indent();
        if !lifted.captures.is_empty() {
            writer.line("private:");
            writer.increase_indent();
            for capture in &lifted.captures {
                writer.line(&format!("{} {};", spell_type(&capture.type_name, extra), capture.name));
            }
            writer.decrease_indent();
        }
        writer.line("};");
        writer.finish()
    }
}
