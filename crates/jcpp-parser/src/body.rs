//! A parsed method body: the arena, the scope chain and resolver entry points.

use crate::arena::{AnonymousSite, CodeArena, LiftedType};
use crate::context::MethodContext;
use crate::node::{
    AssignmentData, DeclarationData, Node, NodeIndex, NodeKind, OperatorData, ParagraphId,
    VariableId,
};
use crate::resolver::{ResolveStats, Resolver};
use crate::scope::{Variable, VariableFlags};
use crate::statements::{KeywordConstruct, Paragraph, ParagraphKind};
use jcpp_common::{TranslateOptions, TranslateResult};
use jcpp_scanner::OpKind;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

pub struct CodeBody {
    pub(crate) arena: CodeArena,
    pub(crate) context: MethodContext,
    pub(crate) options: TranslateOptions,
    pub(crate) root: ParagraphId,
    pub(crate) stats: ResolveStats,
    pub(crate) returns_smart_handle: bool,
    /// Field lookups by name, misses included.
    fields: RefCell<FxHashMap<String, Option<Rc<Variable>>>>,
}

impl CodeBody {
    /// Empty body whose root paragraph holds the parameters.
    pub(crate) fn new(context: MethodContext, options: TranslateOptions) -> CodeBody {
        let mut arena = CodeArena::new();
        let root = arena.add_paragraph(Paragraph::new(ParagraphKind::Root, None));
        for parameter in &context.parameters {
            let mut flags = VariableFlags::PARAMETER | VariableFlags::OUTSIDE_BLOCK;
            if parameter.is_final {
                flags |= VariableFlags::FINAL;
            }
            arena.declare(Variable::new(
                parameter.name.clone(),
                parameter.type_name.clone(),
                flags,
                root,
                &options.extra_container_types,
            ));
        }
        CodeBody {
            arena,
            context,
            options,
            root,
            stats: ResolveStats::default(),
            returns_smart_handle: false,
            fields: RefCell::new(FxHashMap::default()),
        }
    }

    #[inline]
    pub fn arena(&self) -> &CodeArena {
        &self.arena
    }

    #[inline]
    pub fn context(&self) -> &MethodContext {
        &self.context
    }

    #[inline]
    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    #[inline]
    pub fn root(&self) -> ParagraphId {
        self.root
    }

    #[inline]
    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// A `return` hands back an owned object handle.
    #[inline]
    pub fn returns_smart_handle(&self) -> bool {
        self.returns_smart_handle
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        self.arena.node(index)
    }

    #[inline]
    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        self.arena.paragraph(id)
    }

    #[inline]
    pub fn keyword(&self, id: crate::node::KeywordId) -> &KeywordConstruct {
        self.arena.keyword(id)
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> &Rc<Variable> {
        self.arena.variable(id)
    }

    pub fn lifted_types(&self) -> &[LiftedType] {
        &self.arena.lifted
    }

    pub fn anonymous_sites(&self) -> &[AnonymousSite] {
        &self.arena.anonymous_sites
    }

    /// Locals declared in the body, parameters excluded, in source order.
    pub fn declarations(&self) -> impl Iterator<Item = &Rc<Variable>> + '_ {
        self.arena
            .variables
            .iter()
            .filter(|v| !v.flags.contains(VariableFlags::PARAMETER))
    }

    /// Resolve `name` from `scope` outwards, then against class fields.
    pub fn lookup(&self, scope: ParagraphId, name: &str) -> Option<Rc<Variable>> {
        self.lookup_within(scope, name, u32::MAX)
    }

    /// Resolve `name` as written at `node`: locals declared after the node's
    /// statement do not shadow what it sees.
    pub fn lookup_at(&self, node: NodeIndex, name: &str) -> Option<Rc<Variable>> {
        let entry = self.arena.get(node)?;
        self.lookup_within(entry.scope, name, entry.visible_variables)
    }

    fn lookup_within(&self, scope: ParagraphId, name: &str, visible: u32) -> Option<Rc<Variable>> {
        let mut current = scope.is_some().then_some(scope);
        while let Some(id) = current {
            let paragraph = self.arena.paragraph(id);
            for &variable in paragraph.variables.iter().rev() {
                if variable.0 >= visible {
                    continue;
                }
                let variable = self.arena.variable(variable);
                if variable.name == name {
                    return Some(Rc::clone(variable));
                }
            }
            current = paragraph.parent;
        }
        self.field(name)
    }

    fn field(&self, name: &str) -> Option<Rc<Variable>> {
        if let Some(hit) = self.fields.borrow().get(name) {
            return hit.clone();
        }
        let found = self.context.find_field(name).map(|(depth, field)| {
            let mut flags = VariableFlags::FIELD | VariableFlags::OUTSIDE_BLOCK;
            if field.is_static {
                flags |= VariableFlags::STATIC;
            }
            if field.is_final {
                flags |= VariableFlags::FINAL;
            }
            if depth > 0 {
                flags |= VariableFlags::OUTER_CLASS;
            }
            Rc::new(Variable::new(
                field.name.clone(),
                field.type_name.clone(),
                flags,
                ParagraphId::NONE,
                &self.options.extra_container_types,
            ))
        });
        self.fields
            .borrow_mut()
            .insert(name.to_string(), found.clone());
        found
    }

    /// Resolve one expression in `scope`. Blank text yields `NONE`.
    pub(crate) fn parse_expression(&mut self, scope: ParagraphId, text: &str) -> TranslateResult<NodeIndex> {
        let first = self.arena.nodes.len();
        let resolver = Resolver::new(
            &mut self.arena,
            &self.options.extra_container_types,
            &mut self.stats,
            scope,
            text,
        );
        let root = resolver.resolve_statement()?;
        self.seal_statement(first);
        Ok(root)
    }

    /// Nodes from `first` on see every variable their statement declared.
    fn seal_statement(&mut self, first: usize) {
        let visible = self.arena.variables.len() as u32;
        for node in &mut self.arena.nodes[first..] {
            node.visible_variables = visible;
        }
    }

    /// Resolve a full statement: like an expression, but a declaration
    /// heading a comma list gives its type to the names that follow.
    pub(crate) fn parse_statement(&mut self, scope: ParagraphId, text: &str) -> TranslateResult<NodeIndex> {
        let first = self.arena.nodes.len();
        let root = self.parse_expression(scope, text)?;
        if root.is_some() {
            self.continue_declaration(root);
            self.seal_statement(first);
        }
        Ok(root)
    }

    /// `int a = 1, b, c = 2`: `b` and `c` become declarations of `int`.
    fn continue_declaration(&mut self, root: NodeIndex) {
        let mut items = Vec::new();
        self.comma_items(root, &mut items);
        let Some((&first, rest)) = items.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let Some(lead) = self.declared_variable(first) else {
            return;
        };
        let lead = Rc::clone(self.arena.variable(lead));
        let type_name = jcpp_common::types::strip_array(&lead.type_name).0.to_string();
        let flags = lead.flags & (VariableFlags::FINAL | VariableFlags::STATIC);
        for &item in rest {
            let target = match &self.arena.node(item).kind {
                NodeKind::Assignment(AssignmentData { target, .. }) => *target,
                _ => item,
            };
            if !self.arena.node(target).is_identifier() {
                continue;
            }
            let node = self.arena.node(target);
            let variable = Variable::new(
                node.text.trim(),
                type_name.clone(),
                flags,
                lead.scope,
                &self.options.extra_container_types,
            );
            trace!(name = %variable.name, "continued declaration");
            let variable = self.arena.declare(variable);
            if let Some(node) = self.arena.get_mut(target) {
                node.kind = NodeKind::Declaration(DeclarationData {
                    variable,
                    continued: true,
                });
            }
        }
    }

    fn comma_items(&self, node: NodeIndex, out: &mut Vec<NodeIndex>) {
        match &self.arena.node(node).kind {
            NodeKind::Operator(OperatorData {
                op: OpKind::Comma,
                left,
                right,
            }) => {
                let (left, right) = (*left, *right);
                if left.is_some() {
                    self.comma_items(left, out);
                }
                if right.is_some() {
                    self.comma_items(right, out);
                }
            }
            _ => out.push(node),
        }
    }

    /// Variable declared by `node` directly or as an assignment target.
    pub fn declared_variable(&self, node: NodeIndex) -> Option<VariableId> {
        match &self.arena.get(node)?.kind {
            NodeKind::Declaration(data) => Some(data.variable),
            NodeKind::Assignment(AssignmentData { target, .. }) => match &self.arena.get(*target)?.kind {
                NodeKind::Declaration(data) => Some(data.variable),
                _ => None,
            },
            _ => None,
        }
    }
}
