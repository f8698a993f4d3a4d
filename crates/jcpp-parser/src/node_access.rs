//! Traversal and debug rendering of node trees.

use crate::arena::CodeArena;
use crate::body::CodeBody;
use crate::node::{ExpressionForm, NodeIndex, NodeKind};
use smallvec::SmallVec;
use std::fmt::Write;

impl CodeArena {
    /// Direct children of `node` in source order.
    pub fn children(&self, node: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        let mut out = SmallVec::new();
        let Some(entry) = self.get(node) else {
            return out;
        };
        match &entry.kind {
            NodeKind::Expression(_) | NodeKind::Declaration(_) => {}
            NodeKind::Operator(data) => out.extend([data.left, data.right]),
            NodeKind::Assignment(data) => out.extend([data.target, data.value]),
            NodeKind::Instanceof(data) => out.push(data.operand),
            NodeKind::Invocation(data) => out.extend([data.subject, data.member]),
            NodeKind::Bracket(data) => out.extend(data.items.iter().copied()),
            NodeKind::Cast(data) => out.push(data.operand),
            NodeKind::MethodCall(data) => {
                out.push(data.callee);
                out.extend(data.args.iter().copied());
            }
            NodeKind::Array(data) => {
                out.push(data.target);
                out.extend(data.indices.iter().copied());
                out.push(data.initializer);
            }
        }
        out.retain(|n: &mut NodeIndex| n.is_some());
        out
    }

    /// Every node of the subtree rooted at `node`, parents first.
    pub fn walk(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current.is_none() {
                continue;
            }
            order.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        order
    }
}

impl CodeBody {
    /// Prefix rendering of a subtree, e.g. `+(a, *(b, c))`.
    pub fn describe(&self, node: NodeIndex) -> String {
        let mut out = String::new();
        self.describe_into(node, &mut out);
        out
    }

    fn describe_into(&self, node: NodeIndex, out: &mut String) {
        let Some(entry) = self.arena.get(node) else {
            out.push('_');
            return;
        };
        match &entry.kind {
            NodeKind::Expression(data) => match &data.form {
                ExpressionForm::Construction { type_name } => {
                    let _ = write!(out, "new {type_name}");
                }
                ExpressionForm::Verbatim => {
                    let _ = write!(out, "verbatim({})", data.text.trim());
                }
                _ => out.push_str(data.text.trim()),
            },
            NodeKind::Declaration(data) => {
                let variable = self.arena.variable(data.variable);
                let _ = write!(out, "decl({} {})", variable.type_name, variable.name);
            }
            NodeKind::Operator(data) => {
                if data.left.is_none() {
                    let _ = write!(out, "{}(", data.op.text());
                    self.describe_into(data.right, out);
                    out.push(')');
                } else if data.right.is_none() && data.op.is_unary() {
                    out.push_str("post");
                    let _ = write!(out, "{}(", data.op.text());
                    self.describe_into(data.left, out);
                    out.push(')');
                } else {
                    self.describe_call(data.op.text(), &[data.left, data.right], out);
                }
            }
            NodeKind::Assignment(data) => {
                self.describe_call(data.op.text(), &[data.target, data.value], out);
            }
            NodeKind::Instanceof(data) => {
                out.push_str("instanceof(");
                self.describe_into(data.operand, out);
                let _ = write!(out, ", {})", data.type_name);
            }
            NodeKind::Invocation(data) => self.describe_call(".", &[data.subject, data.member], out),
            NodeKind::Bracket(data) => {
                self.describe_call(if data.brace { "brace" } else { "paren" }, &data.items, out);
            }
            NodeKind::Cast(data) => {
                let name = format!("cast<{}>", data.type_name);
                self.describe_call(&name, &[data.operand], out);
            }
            NodeKind::MethodCall(data) => {
                let mut parts = vec![data.callee];
                parts.extend(data.args.iter().copied());
                self.describe_call("call", &parts, out);
            }
            NodeKind::Array(data) => {
                let mut parts = vec![data.target];
                parts.extend(data.indices.iter().copied());
                if data.initializer.is_some() {
                    parts.push(data.initializer);
                }
                self.describe_call("index", &parts, out);
            }
        }
    }

    fn describe_call(&self, name: &str, parts: &[NodeIndex], out: &mut String) {
        out.push_str(name);
        out.push('(');
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.describe_into(*part, out);
        }
        out.push(')');
    }
}
