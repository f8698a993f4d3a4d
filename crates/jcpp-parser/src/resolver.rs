//! Precedence resolver.
//!
//! Turns one scanned statement into a node tree. Each pass picks the most
//! loosely binding operator left in the requested range, resolves its
//! operands, and folds the consumed characters. A node that covers only
//! part of the range is folded as a pending subtree; later passes reuse it
//! as an atomic operand until the whole range is covered.

use crate::arena::CodeArena;
use crate::node::{
    ArrayData, AssignmentData, BracketData, CastData, DeclarationData, ExpressionData,
    ExpressionForm, InstanceofData, InvocationData, MethodCallData, NodeIndex, NodeKind,
    OperatorData, ParagraphId,
};
use crate::scope::{Variable, VariableFlags};
use jcpp_common::limits::MAX_RESOLVE_PASSES;
use jcpp_common::types::{ValueCategory, is_primitive, literal_category, strip_array};
use jcpp_common::{Span, TranslateError, TranslateResult};
use jcpp_scanner::keywords::is_identifier_char;
use jcpp_scanner::{Ledger, OpKind, QuoteState, Tag, TieBreak, scan};
use rustc_hash::FxHashMap;
use smallvec::smallvec;
use std::rc::Rc;
use tracing::{debug, trace};

/// Declaration modifiers stripped before the type.
const MODIFIERS: &[&str] = &["final", "static", "volatile", "transient"];

/// Prefix `+`/`-` binds like logical negation.
const UNARY_PRECEDENCE: u8 = 16;

/// Diagnostic counters accumulated over a method body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub statements: u64,
    pub passes: u64,
    pub total_depth: u64,
    pub max_depth: u32,
}

impl ResolveStats {
    pub fn average_depth(&self) -> f64 {
        if self.statements == 0 {
            0.0
        } else {
            self.total_depth as f64 / self.statements as f64
        }
    }

    pub fn reset(&mut self) {
        *self = ResolveStats::default();
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingSubtree {
    span: Span,
    node: NodeIndex,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    pos: usize,
    kind: OpKind,
    /// Prefix `+`/`-`.
    unary: bool,
}

pub(crate) struct Resolver<'a> {
    arena: &'a mut CodeArena,
    extra_containers: &'a [String],
    stats: &'a mut ResolveStats,
    ledger: Ledger,
    scope: ParagraphId,
    pending: FxHashMap<u32, PendingSubtree>,
    next_pending: u32,
    depth: u32,
    deepest: u32,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        arena: &'a mut CodeArena,
        extra_containers: &'a [String],
        stats: &'a mut ResolveStats,
        scope: ParagraphId,
        text: &str,
    ) -> Self {
        Resolver {
            arena,
            extra_containers,
            stats,
            ledger: scan(text),
            scope,
            pending: FxHashMap::default(),
            next_pending: 0,
            depth: 0,
            deepest: 0,
        }
    }

    /// Resolve the whole buffer. Returns `NONE` for blank text.
    pub(crate) fn resolve_statement(mut self) -> TranslateResult<NodeIndex> {
        self.stats.statements += 1;
        let len = self.ledger.len();
        let node = self.resolve(0, len)?;
        self.stats.total_depth += u64::from(self.deepest);
        self.stats.max_depth = self.stats.max_depth.max(self.deepest);
        trace!(
            depth = self.deepest,
            pending = self.next_pending,
            "resolved statement"
        );
        Ok(node.unwrap_or(NodeIndex::NONE))
    }

    // =========================================================================
    // Driver loop
    // =========================================================================

    fn resolve(&mut self, start: usize, end: usize) -> TranslateResult<Option<NodeIndex>> {
        self.depth += 1;
        self.deepest = self.deepest.max(self.depth);
        let result = self.resolve_range(start, end);
        self.depth -= 1;
        result
    }

    fn resolve_range(&mut self, start: usize, end: usize) -> TranslateResult<Option<NodeIndex>> {
        let range = self.ledger.trim(start, end);
        if range.is_empty() {
            return Ok(None);
        }
        for _ in 0..MAX_RESOLVE_PASSES {
            self.stats.passes += 1;
            if let Some(node) = self.pending_at(range) {
                self.ledger.mark(range, Tag::Resolved);
                return Ok(Some(node));
            }
            let Some(candidate) = self.pick_operator(range)? else {
                let node = self.leaf(range)?;
                self.ledger.mark(range, Tag::Resolved);
                return Ok(Some(node));
            };
            let node = self.build(candidate, range)?;
            let span = self.arena.node(node).span;
            if !range.covers(span) {
                return Err(TranslateError::SpanEscape {
                    operator: candidate.kind.text(),
                    requested: range,
                    found: span,
                });
            }
            if span == range {
                self.ledger.mark(range, Tag::Resolved);
                return Ok(Some(node));
            }
            self.fold_pending(span, node);
        }
        Err(TranslateError::ResolveStalled {
            text: self.ledger.text(range),
        })
    }

    fn pending_at(&self, range: Span) -> Option<NodeIndex> {
        match self.ledger.tag(range.start) {
            Tag::Pending(id) => self
                .pending
                .get(&id)
                .filter(|p| p.span == range)
                .map(|p| p.node),
            _ => None,
        }
    }

    fn fold_pending(&mut self, span: Span, node: NodeIndex) {
        let id = self.next_pending;
        self.next_pending += 1;
        self.pending.insert(id, PendingSubtree { span, node });
        self.ledger.mark(span, Tag::Pending(id));
    }

    /// The operator to split on: lowest precedence level, ties broken by the
    /// level's associativity.
    fn pick_operator(&self, range: Span) -> TranslateResult<Option<Candidate>> {
        let mut best: Option<(u8, Candidate)> = None;
        let mut stray_close = None;
        for (pos, kind) in self.ledger.operator_heads(range.start, range.end) {
            if kind.is_close_bracket() {
                stray_close.get_or_insert((pos, kind));
                continue;
            }
            let unary = matches!(kind, OpKind::Plus | OpKind::Minus) && self.in_prefix_position(pos, range);
            let (precedence, tie_break) = if unary {
                (UNARY_PRECEDENCE, TieBreak::Rightmost)
            } else {
                (kind.info().precedence, kind.info().tie_break)
            };
            let candidate = Candidate { pos, kind, unary };
            best = match best {
                None => Some((precedence, candidate)),
                Some((level, _)) if precedence < level => Some((precedence, candidate)),
                Some((level, _)) if precedence == level && tie_break == TieBreak::Rightmost => {
                    Some((precedence, candidate))
                }
                keep => keep,
            };
        }
        if best.is_none() {
            if let Some((pos, kind)) = stray_close {
                return Err(self.unbalanced(kind, pos));
            }
        }
        Ok(best.map(|(_, candidate)| candidate))
    }

    fn in_prefix_position(&self, pos: usize, range: Span) -> bool {
        let mut prev = pos;
        while prev > range.start && self.ledger.tag(prev - 1) == Tag::Space {
            prev -= 1;
        }
        if prev == range.start {
            return true;
        }
        match self.ledger.tag(prev - 1) {
            Tag::Operator(kind) | Tag::OperatorTail(kind) => !matches!(
                kind,
                OpKind::CloseParen | OpKind::CloseBracket | OpKind::Increment | OpKind::Decrement
            ),
            _ => false,
        }
    }

    fn build(&mut self, candidate: Candidate, range: Span) -> TranslateResult<NodeIndex> {
        let Candidate { pos, kind, unary } = candidate;
        match kind {
            OpKind::OpenParen | OpKind::OpenBracket | OpKind::OpenBrace => {
                self.build_bracket(pos, kind, range)
            }
            OpKind::Question => self.build_conditional(pos, range),
            OpKind::Dot => self.build_member(pos, range),
            OpKind::Instanceof => self.build_instanceof(pos, range),
            OpKind::Increment | OpKind::Decrement | OpKind::Not => self.build_unary(pos, kind, range),
            OpKind::Plus | OpKind::Minus if unary => self.build_unary(pos, kind, range),
            k if k.is_assignment() => self.build_assignment(pos, kind, range),
            k if k.is_close_bracket() => Err(self.unbalanced(k, pos)),
            _ => self.build_binary(pos, kind, range),
        }
    }

    // =========================================================================
    // Operand ranges
    // =========================================================================

    /// Start of the greedy operand ending at `pos`.
    fn greedy_left(&self, pos: usize, range: Span) -> usize {
        let mut start = pos;
        while start > range.start && !self.ledger.tag(start - 1).is_operator() {
            start -= 1;
        }
        start
    }

    /// End of the greedy operand starting at `from`.
    fn greedy_right(&self, from: usize, range: Span) -> usize {
        let mut end = from;
        while end < range.end && !self.ledger.tag(end).is_operator() {
            end += 1;
        }
        end
    }

    fn next_non_space(&self, from: usize, end: usize) -> Option<usize> {
        (from..end).find(|&i| self.ledger.tag(i) != Tag::Space)
    }

    fn op_span(pos: usize, kind: OpKind) -> Span {
        Span::new(pos, pos + kind.width())
    }

    fn add(&mut self, kind: NodeKind, span: Span) -> NodeIndex {
        let text = self.ledger.text(span);
        self.arena.add_node(kind, span, text, self.scope)
    }

    /// Add a node spanning `anchor` and every present operand.
    fn add_spanned(&mut self, kind: NodeKind, anchor: Span, operands: &[Option<NodeIndex>]) -> NodeIndex {
        let span = operands
            .iter()
            .flatten()
            .fold(anchor, |acc, &n| acc.join(self.arena.node(n).span));
        self.add(kind, span)
    }

    fn unbalanced(&self, kind: OpKind, pos: usize) -> TranslateError {
        TranslateError::UnbalancedBracket {
            bracket: kind.text().chars().next().unwrap_or('?'),
            offset: pos,
            text: self.ledger.full_text(),
        }
    }

    fn missing_operand(kind: OpKind, context: &'static str) -> TranslateError {
        TranslateError::UnexpectedToken {
            token: kind.text().to_string(),
            context,
        }
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn build_binary(&mut self, pos: usize, kind: OpKind, range: Span) -> TranslateResult<NodeIndex> {
        let op_span = Self::op_span(pos, kind);
        let left = self.resolve(range.start, pos)?;
        let right = self.resolve(op_span.end, range.end)?;
        let data = OperatorData {
            op: kind,
            left: left.unwrap_or(NodeIndex::NONE),
            right: right.unwrap_or(NodeIndex::NONE),
        };
        Ok(self.add_spanned(NodeKind::Operator(data), op_span, &[left, right]))
    }

    fn build_assignment(&mut self, pos: usize, kind: OpKind, range: Span) -> TranslateResult<NodeIndex> {
        let op_span = Self::op_span(pos, kind);
        let target = self
            .resolve(range.start, pos)?
            .ok_or_else(|| Self::missing_operand(kind, "without an assignment target"))?;
        let value = self.resolve(op_span.end, range.end)?;
        let data = AssignmentData {
            op: kind,
            target,
            value: value.unwrap_or(NodeIndex::NONE),
        };
        Ok(self.add_spanned(NodeKind::Assignment(data), op_span, &[Some(target), value]))
    }

    /// `c ? a : b` becomes `?(c, :(a, b))`, pairing nested conditionals.
    fn build_conditional(&mut self, pos: usize, range: Span) -> TranslateResult<NodeIndex> {
        let colon = self
            .matching_colon(pos, range)
            .ok_or(TranslateError::MissingClause {
                keyword: "?",
                clause: "`:` branch",
            })?;
        let condition = self.resolve(range.start, pos)?;
        let then = self.resolve(pos + 1, colon)?;
        let otherwise = self.resolve(colon + 1, range.end)?;
        let branches = OperatorData {
            op: OpKind::Colon,
            left: then.unwrap_or(NodeIndex::NONE),
            right: otherwise.unwrap_or(NodeIndex::NONE),
        };
        let branches = self.add_spanned(
            NodeKind::Operator(branches),
            Span::new(colon, colon + 1),
            &[then, otherwise],
        );
        let data = OperatorData {
            op: OpKind::Question,
            left: condition.unwrap_or(NodeIndex::NONE),
            right: branches,
        };
        Ok(self.add_spanned(
            NodeKind::Operator(data),
            Span::new(pos, pos + 1),
            &[condition, Some(branches)],
        ))
    }

    fn matching_colon(&self, question: usize, range: Span) -> Option<usize> {
        let mut depth = 0usize;
        for (pos, kind) in self.ledger.operator_heads(question + 1, range.end) {
            match kind {
                OpKind::Question => depth += 1,
                OpKind::Colon if depth == 0 => return Some(pos),
                OpKind::Colon => depth -= 1,
                _ => {}
            }
        }
        None
    }

    fn build_member(&mut self, pos: usize, range: Span) -> TranslateResult<NodeIndex> {
        let start = self.greedy_left(pos, range);
        let end = self.greedy_right(pos + 1, range);
        let subject = self
            .resolve(start, pos)?
            .ok_or_else(|| Self::missing_operand(OpKind::Dot, "without a subject"))?;
        let member = self
            .resolve(pos + 1, end)?
            .ok_or_else(|| Self::missing_operand(OpKind::Dot, "without a member name"))?;
        if let Some(construction) = self.qualify_construction(subject, member) {
            return Ok(construction);
        }
        if self.qualify_declaration(subject, member) {
            return Ok(member);
        }
        let data = InvocationData { subject, member };
        Ok(self.add_spanned(
            NodeKind::Invocation(data),
            Span::new(pos, pos + 1),
            &[Some(subject), Some(member)],
        ))
    }

    /// `new a.b.C(...)`: folds the qualifier of a construction into the type
    /// name and returns the widened member node.
    fn qualify_construction(&mut self, subject: NodeIndex, member: NodeIndex) -> Option<NodeIndex> {
        let qualifier = self.arena.node(subject).construction_type()?.to_string();
        let target = match &self.arena.node(member).kind {
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Identifier,
                ..
            }) => member,
            NodeKind::MethodCall(data) if self.arena.node(data.callee).is_identifier() => data.callee,
            NodeKind::Array(data)
                if data.target.is_some() && self.arena.node(data.target).is_identifier() =>
            {
                data.target
            }
            _ => return None,
        };
        let start = self.arena.node(subject).span.start;
        let type_name = format!("{qualifier}.{}", self.arena.node(target).text.trim());
        let span = Span::new(start, self.arena.node(target).span.end);
        let text = self.ledger.text(span);
        let node = self.arena.get_mut(target)?;
        node.kind = NodeKind::Expression(ExpressionData {
            text: text.clone(),
            form: ExpressionForm::Construction { type_name },
        });
        node.span = span;
        node.text = text;
        if member != target {
            let span = Span::new(start, self.arena.node(member).span.end);
            let text = self.ledger.text(span);
            let node = self.arena.get_mut(member)?;
            node.span = span;
            node.text = text;
        }
        Some(member)
    }

    /// `Map.Entry<K, V> e`: a declaration whose type is qualified. Folds the
    /// qualifier into the declared type and widens the declaration node.
    fn qualify_declaration(&mut self, subject: NodeIndex, member: NodeIndex) -> bool {
        let NodeKind::Declaration(data) = &self.arena.node(member).kind else {
            return false;
        };
        let variable = data.variable;
        let qualifier = self.arena.node(subject).text.clone();
        if !is_qualified_name(&qualifier) {
            return false;
        }
        let old = Rc::clone(self.arena.variable(variable));
        let type_name = format!("{qualifier}.{}", old.type_name);
        let updated = Variable::new(
            old.name.clone(),
            type_name,
            old.flags,
            old.scope,
            self.extra_containers,
        );
        self.arena.variables[variable.index()] = Rc::new(updated);
        let span = self.arena.node(subject).span.join(self.arena.node(member).span);
        let text = self.ledger.text(span);
        if let Some(node) = self.arena.get_mut(member) {
            node.span = span;
            node.text = text;
        }
        true
    }

    fn build_instanceof(&mut self, pos: usize, range: Span) -> TranslateResult<NodeIndex> {
        let op_span = Self::op_span(pos, OpKind::Instanceof);
        let start = self.greedy_left(pos, range);
        let end = self.greedy_right(op_span.end, range);
        let operand = self
            .resolve(start, pos)?
            .ok_or_else(|| Self::missing_operand(OpKind::Instanceof, "without an operand"))?;
        let type_span = self.ledger.trim(op_span.end, end);
        if type_span.is_empty() {
            return Err(TranslateError::MissingClause {
                keyword: "instanceof",
                clause: "type name",
            });
        }
        let type_name = self.ledger.text(type_span);
        self.ledger.mark(type_span, Tag::Resolved);
        let data = InstanceofData { operand, type_name };
        let span = self.arena.node(operand).span.join(type_span);
        Ok(self.add(NodeKind::Instanceof(data), span))
    }

    fn build_unary(&mut self, pos: usize, kind: OpKind, range: Span) -> TranslateResult<NodeIndex> {
        let op_span = Self::op_span(pos, kind);
        let postfix = matches!(kind, OpKind::Increment | OpKind::Decrement)
            && !self.ledger.is_blank(self.greedy_left(pos, range), pos);
        let data = if postfix {
            let start = self.greedy_left(pos, range);
            let left = self
                .resolve(start, pos)?
                .ok_or_else(|| Self::missing_operand(kind, "without an operand"))?;
            OperatorData {
                op: kind,
                left,
                right: NodeIndex::NONE,
            }
        } else {
            let end = self.greedy_right(op_span.end, range);
            let right = self
                .resolve(op_span.end, end)?
                .ok_or_else(|| Self::missing_operand(kind, "without an operand"))?;
            OperatorData {
                op: kind,
                left: NodeIndex::NONE,
                right,
            }
        };
        let operand = if postfix { data.left } else { data.right };
        Ok(self.add_spanned(NodeKind::Operator(data), op_span, &[Some(operand)]))
    }

    // =========================================================================
    // Brackets
    // =========================================================================

    fn build_bracket(&mut self, pos: usize, kind: OpKind, range: Span) -> TranslateResult<NodeIndex> {
        let Some(close_kind) = kind.closing() else {
            return Err(self.unbalanced(kind, pos));
        };
        let close = (pos + 1..range.end)
            .find(|&i| self.ledger.tag(i) == Tag::Operator(close_kind))
            .ok_or_else(|| self.unbalanced(kind, pos))?;
        let inner = self.resolve(pos + 1, close)?;
        match kind {
            OpKind::OpenParen => self.finish_paren(pos, close, inner, range),
            OpKind::OpenBracket => self.finish_index(pos, close, inner, range),
            _ => {
                let items = self.flatten_commas(inner);
                Ok(self.add(
                    NodeKind::Bracket(BracketData { brace: true, items }),
                    Span::new(pos, close + 1),
                ))
            }
        }
    }

    /// Call, cast or grouping, decided by what surrounds the parentheses.
    fn finish_paren(
        &mut self,
        pos: usize,
        close: usize,
        inner: Option<NodeIndex>,
        range: Span,
    ) -> TranslateResult<NodeIndex> {
        let callee_start = self.greedy_left(pos, range);
        if !self.ledger.is_blank(callee_start, pos) {
            let callee = self
                .resolve(callee_start, pos)?
                .ok_or_else(|| self.unbalanced(OpKind::OpenParen, pos))?;
            let args = self.flatten_commas(inner);
            let data = MethodCallData {
                callee,
                args,
                lifted: None,
            };
            return Ok(self.add_spanned(
                NodeKind::MethodCall(data),
                Span::new(pos, close + 1),
                &[Some(callee)],
            ));
        }

        let operand_end = self.cast_operand_end(close + 1, range);
        if !self.ledger.is_blank(close + 1, operand_end) {
            if let Some(type_name) = inner.and_then(|n| self.type_like_text(n)) {
                let operand = self
                    .resolve(close + 1, operand_end)?
                    .ok_or_else(|| self.unbalanced(OpKind::OpenParen, pos))?;
                let data = CastData { type_name, operand };
                return Ok(self.add_spanned(
                    NodeKind::Cast(data),
                    Span::new(pos, close + 1),
                    &[Some(operand)],
                ));
            }
            debug!(
                text = %self.ledger.full_text(),
                "parenthesized expression followed by an operand is not a cast"
            );
        }

        let items = self.flatten_commas(inner);
        Ok(self.add(
            NodeKind::Bracket(BracketData {
                brace: false,
                items,
            }),
            Span::new(pos, close + 1),
        ))
    }

    /// End of a cast operand: a name followed by any chain of member
    /// accesses, calls and indexes.
    fn cast_operand_end(&self, from: usize, range: Span) -> usize {
        let mut end = from;
        loop {
            end = self.greedy_right(end, range);
            if end >= range.end || self.ledger.is_blank(from, end) {
                break;
            }
            match self.ledger.tag(end) {
                Tag::Operator(OpKind::Dot) => end += 1,
                Tag::Operator(open @ (OpKind::OpenParen | OpKind::OpenBracket)) => {
                    match self.matching_operator_close(end, open, range) {
                        Some(close) => end = close + 1,
                        None => break,
                    }
                }
                _ => break,
            }
        }
        end
    }

    fn matching_operator_close(&self, open_pos: usize, open: OpKind, range: Span) -> Option<usize> {
        let close = open.closing()?;
        let mut depth = 0usize;
        for (pos, kind) in self.ledger.operator_heads(open_pos, range.end) {
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// Source text of `node` when it reads as a type name.
    fn type_like_text(&self, node: NodeIndex) -> Option<String> {
        let node = self.arena.node(node);
        if !matches!(
            &node.kind,
            NodeKind::Expression(ExpressionData {
                form: ExpressionForm::Identifier,
                ..
            }) | NodeKind::Invocation(_)
        ) {
            return None;
        }
        let text = node.text.trim();
        if !text
            .chars()
            .all(|c| is_identifier_char(c) || ".<>[]?, ".contains(c))
        {
            return None;
        }
        let base = strip_array(text).0;
        let base = base.split('<').next().unwrap_or(base);
        let last = base.rsplit('.').next().unwrap_or(base).trim();
        let type_like = is_primitive(last) || last.starts_with(|c: char| c.is_ascii_uppercase());
        type_like.then(|| text.to_string())
    }

    /// Indexing or array construction. Absorbs directly following pending
    /// dimension lists and a brace initializer.
    fn finish_index(
        &mut self,
        pos: usize,
        close: usize,
        inner: Option<NodeIndex>,
        range: Span,
    ) -> TranslateResult<NodeIndex> {
        let target_start = self.greedy_left(pos, range);
        let target = self.resolve(target_start, pos)?;
        let mut indices = smallvec![inner.unwrap_or(NodeIndex::NONE)];
        let mut initializer = NodeIndex::NONE;
        let mut end = close + 1;
        while let Some(next) = self.next_non_space(end, range.end) {
            let Tag::Pending(id) = self.ledger.tag(next) else {
                break;
            };
            let Some(pending) = self.pending.get(&id).copied() else {
                break;
            };
            if pending.span.start != next || initializer.is_some() {
                break;
            }
            match &self.arena.node(pending.node).kind {
                NodeKind::Array(data) if data.target.is_none() => {
                    indices.extend(data.indices.iter().copied());
                    initializer = data.initializer;
                }
                NodeKind::Bracket(data) if data.brace => initializer = pending.node,
                _ => break,
            }
            self.pending.remove(&id);
            end = pending.span.end;
        }
        let start = target.map_or(pos, |t| self.arena.node(t).span.start);
        let data = ArrayData {
            target: target.unwrap_or(NodeIndex::NONE),
            indices,
            initializer,
        };
        Ok(self.add(NodeKind::Array(data), Span::new(start, end)))
    }

    fn flatten_commas(&self, inner: Option<NodeIndex>) -> Vec<NodeIndex> {
        let mut items = Vec::new();
        if let Some(node) = inner {
            self.collect_comma_items(node, &mut items);
        }
        items
    }

    fn collect_comma_items(&self, node: NodeIndex, out: &mut Vec<NodeIndex>) {
        match &self.arena.node(node).kind {
            NodeKind::Operator(OperatorData {
                op: OpKind::Comma,
                left,
                right,
            }) => {
                let (left, right) = (*left, *right);
                if left.is_some() {
                    self.collect_comma_items(left, out);
                }
                if right.is_some() {
                    self.collect_comma_items(right, out);
                }
            }
            _ => out.push(node),
        }
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    fn leaf(&mut self, range: Span) -> TranslateResult<NodeIndex> {
        let text = self.ledger.text(range);
        let has_pending = (range.start..range.end).any(|i| matches!(self.ledger.tag(i), Tag::Pending(_)));
        let kind = if has_pending {
            debug!(%text, "unstructured operand sequence kept verbatim");
            NodeKind::Expression(ExpressionData {
                text: text.clone(),
                form: ExpressionForm::Verbatim,
            })
        } else {
            self.classify_leaf(&text)?
        };
        Ok(self.arena.add_node(kind, range, text, self.scope))
    }

    fn classify_leaf(&mut self, text: &str) -> TranslateResult<NodeKind> {
        let expression = |form| {
            NodeKind::Expression(ExpressionData {
                text: text.to_string(),
                form,
            })
        };
        match text {
            "null" => return Ok(expression(ExpressionForm::Null)),
            "this" | "super" => return Ok(expression(ExpressionForm::This)),
            _ => {}
        }
        if literal_category(text).is_some_and(|c| c != ValueCategory::ThisReference) {
            return Ok(expression(ExpressionForm::Literal));
        }
        if top_level_words(text).len() > 1 {
            if let Some(rest) = text.strip_prefix("new ") {
                return Ok(expression(ExpressionForm::Construction {
                    type_name: rest.trim().to_string(),
                }));
            }
            return self.declaration(text);
        }
        Ok(expression(ExpressionForm::Identifier))
    }

    /// `final Map<K, V> name[]` registers a variable in the current scope.
    fn declaration(&mut self, text: &str) -> TranslateResult<NodeKind> {
        let malformed = || TranslateError::MalformedDeclaration {
            text: text.to_string(),
        };
        let words = top_level_words(text);
        let mut flags = VariableFlags::empty();
        let mut first = 0;
        while first < words.len() && MODIFIERS.contains(&words[first]) {
            match words[first] {
                "final" => flags |= VariableFlags::FINAL,
                "static" => flags |= VariableFlags::STATIC,
                _ => {}
            }
            first += 1;
        }
        let rest = &words[first..];
        let Some((name_word, type_words)) = rest.split_last() else {
            return Err(malformed());
        };
        if type_words.is_empty() {
            return Err(malformed());
        }
        if !is_type_text(type_words) {
            debug!(%text, "operand sequence is not a declaration, kept verbatim");
            return Ok(NodeKind::Expression(ExpressionData {
                text: text.to_string(),
                form: ExpressionForm::Verbatim,
            }));
        }
        let (name, dims) = strip_array(name_word);
        if name.is_empty()
            || name.starts_with(|c: char| c.is_ascii_digit())
            || !name.chars().all(is_identifier_char)
        {
            return Err(malformed());
        }
        let mut type_name = type_words.join(" ");
        for _ in 0..dims {
            type_name.push_str("[]");
        }
        let variable = Variable::new(name, type_name, flags, self.scope, self.extra_containers);
        trace!(name = %variable.name, type_name = %variable.type_name, "declared");
        let variable = self.arena.declare(variable);
        Ok(NodeKind::Declaration(DeclarationData {
            variable,
            continued: false,
        }))
    }
}

/// Split at whitespace outside literals and type-argument brackets. A word
/// opening with `<` or `[` is glued to the previous one.
fn top_level_words(text: &str) -> Vec<&str> {
    let mut words: Vec<(usize, usize)> = Vec::new();
    let mut quote = QuoteState::default();
    let mut angle = 0usize;
    let mut start: Option<usize> = None;
    for (offset, ch) in text.char_indices() {
        let quoted = quote.feed(ch);
        if !quoted {
            match ch {
                '<' => angle += 1,
                '>' => angle = angle.saturating_sub(1),
                _ => {}
            }
        }
        if !quoted && angle == 0 && ch.is_whitespace() {
            if let Some(s) = start.take() {
                words.push((s, offset));
            }
        } else if start.is_none() {
            start = Some(offset);
        }
    }
    if let Some(s) = start {
        words.push((s, text.len()));
    }
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(words.len());
    for (s, e) in words {
        let glue = text[s..e].starts_with(['<', '[']);
        match merged.last_mut() {
            Some(last) if glue => last.1 = e,
            _ => merged.push((s, e)),
        }
    }
    merged.into_iter().map(|(s, e)| &text[s..e]).collect()
}

/// Declared types hold names, qualifiers, type arguments, wildcards and
/// array brackets, starting with a name.
fn is_type_text(words: &[&str]) -> bool {
    words[0].starts_with(|c: char| c.is_alphabetic() || c == '_' || c == '$')
        && words.iter().all(|word| {
            word.chars().all(|c| {
                is_identifier_char(c) || c.is_whitespace() || matches!(c, '.' | '<' | '>' | '[' | ']' | '?' | ',')
            })
        })
}

/// `java.util` or `Map`: identifiers joined by dots.
fn is_qualified_name(text: &str) -> bool {
    !text.is_empty()
        && text
            .split('.')
            .all(|part| !part.trim().is_empty() && part.trim().chars().all(is_identifier_char))
}

#[cfg(test)]
pub(crate) fn words_for_test(text: &str) -> Vec<&str> {
    top_level_words(text)
}
