//! Paragraph frames: statement lists, nested blocks and labels.

use crate::arena::AnonymousSite;
use crate::node::{NodeIndex, NodeKind, ParagraphId};
use crate::reader::{CodeReader, Frame, KeywordFrame, ParagraphFrame, ParagraphMode, Step};
use crate::state_keywords::KeywordState;
use crate::statements::{KeywordConstruct, KeywordDetail, Paragraph, ParagraphKind, Statement};
use jcpp_common::types::generic_base;
use jcpp_common::{TranslateError, TranslateResult};
use jcpp_scanner::text::remove_ranges;
use jcpp_scanner::{StatementCut, TerminatorSearch, find_terminator, leading_keyword, leading_label, starts_with_word};
use tracing::trace;

/// Words that only continue a construct opened earlier.
const CONTINUATION_WORDS: &[&str] = &["else", "catch", "finally"];

impl CodeReader {
    pub(crate) fn step_paragraph(&mut self, frame: &mut ParagraphFrame, text: &str) -> TranslateResult<Step> {
        match frame.mode {
            ParagraphMode::AwaitOpen => {
                if text.is_empty() {
                    return Ok(Step::NeedMore);
                }
                if text.starts_with('{') {
                    frame.mode = ParagraphMode::Open;
                    self.body.arena.paragraph_mut(frame.id).braced = true;
                    return Ok(Step::Consumed(1));
                }
                frame.mode = ParagraphMode::Single { taken: false };
                return Ok(Step::Consumed(0));
            }
            ParagraphMode::Single { taken: true } => return Ok(Step::Pop(0)),
            _ => {}
        }
        if text.is_empty() {
            return Ok(Step::NeedMore);
        }
        let single = matches!(frame.mode, ParagraphMode::Single { .. });

        if text.starts_with('}') {
            return match frame.mode {
                ParagraphMode::Open => Ok(Step::Pop(1)),
                _ => Err(TranslateError::UnexpectedToken {
                    token: "}".to_string(),
                    context: "outside of any block",
                }),
            };
        }
        if text.starts_with('{') {
            let mut block = Paragraph::new(ParagraphKind::Block, Some(frame.id));
            block.label = frame.pending_label.take();
            block.braced = true;
            let block = self.body.arena.add_paragraph(block);
            self.add_statement(frame, Statement::Block(block));
            return Ok(Step::Push(1, Frame::paragraph(block, ParagraphMode::Open)));
        }
        if text.starts_with(';') {
            self.add_statement(frame, Statement::Empty);
            return Ok(Step::Consumed(1));
        }
        if let Some(word) = CONTINUATION_WORDS.iter().find(|w| starts_with_word(text, w)) {
            return Err(TranslateError::UnexpectedToken {
                token: (*word).to_string(),
                context: "without a matching construct",
            });
        }
        if let Some(keyword) = leading_keyword(text) {
            let label = frame.pending_label.take();
            let construct = KeywordConstruct {
                keyword,
                label,
                scope: frame.id,
                detail: KeywordDetail::Pending,
            };
            let id = self.body.arena.add_keyword(construct);
            self.add_statement(frame, Statement::Keyword(id));
            trace!(keyword = keyword.text(), "keyword construct");
            let child = Frame::Keyword(KeywordFrame {
                id,
                scope: frame.id,
                state: KeywordState::Header,
            });
            return Ok(Step::Push(keyword.text().len(), child));
        }
        if !single {
            if let Some((label, consumed)) = leading_label(text) {
                let rest = text[consumed..].trim_start();
                if rest.is_empty() && !self.finishing {
                    return Ok(Step::NeedMore);
                }
                let labels_construct = rest.starts_with('{')
                    || leading_keyword(rest).is_some_and(|k| k.accepts_label());
                if labels_construct {
                    frame.pending_label = Some(label.to_string());
                    return Ok(Step::Consumed(consumed));
                }
            }
        }

        match find_terminator(text, ';') {
            TerminatorSearch::Incomplete => Ok(Step::NeedMore),
            TerminatorSearch::StrayClose(offset) => Err(TranslateError::UnexpectedToken {
                token: text[offset..].chars().next().unwrap_or('}').to_string(),
                context: "closing a bracket that was never opened",
            }),
            TerminatorSearch::Found(cut) => {
                let node = self.parse_cut(frame.id, text, &cut, true)?;
                if node.is_some() {
                    self.add_statement(frame, Statement::Expression(node));
                } else {
                    self.add_statement(frame, Statement::Empty);
                }
                Ok(Step::Consumed(cut.end + 1))
            }
        }
    }

    fn add_statement(&mut self, frame: &mut ParagraphFrame, statement: Statement) {
        self.body.arena.paragraph_mut(frame.id).items.push(statement);
        if let ParagraphMode::Single { taken } = &mut frame.mode {
            *taken = true;
        }
    }

    /// Resolve `text[..cut.end]` with class bodies detached, recording one
    /// anonymous site per detached body.
    pub(crate) fn parse_cut(
        &mut self,
        scope: ParagraphId,
        text: &str,
        cut: &StatementCut,
        statement: bool,
    ) -> TranslateResult<NodeIndex> {
        let head = &text[..cut.end];
        let source = remove_ranges(head, &cut.class_bodies);
        let node = if statement {
            self.body.parse_statement(scope, &source)?
        } else {
            self.body.parse_expression(scope, &source)?
        };
        if cut.class_bodies.is_empty() || node.is_none() {
            return Ok(node);
        }

        let mut removed = 0;
        for range in &cut.class_bodies {
            let at = range.start - removed;
            removed += range.len();
            let call_end = source[..at].trim_end().chars().count();
            let call = self.body.arena.walk(node).into_iter().find(|&n| {
                let entry = self.body.arena.node(n);
                entry.span.end == call_end
                    && matches!(&entry.kind, NodeKind::MethodCall(data)
                        if self.body.arena.node(data.callee).construction_type().is_some())
            });
            let Some(call) = call else {
                return Err(TranslateError::UnexpectedToken {
                    token: "{".to_string(),
                    context: "opening a class body that does not follow a construction",
                });
            };
            let NodeKind::MethodCall(data) = &self.body.arena.node(call).kind else {
                continue;
            };
            let base_type = self
                .body
                .arena
                .node(data.callee)
                .construction_type()
                .map(|t| generic_base(t).to_string())
                .unwrap_or_default();
            trace!(%base_type, "anonymous class body");
            self.body.arena.anonymous_sites.push(AnonymousSite {
                call,
                scope,
                base_type,
                body: head[range.clone()].to_string(),
            });
        }
        Ok(node)
    }
}
