//! Keyword frames: headers, bodies and trailing clauses of constructs.

use crate::node::{NodeIndex, NodeKind, ParagraphId};
use crate::reader::{CodeReader, Frame, KeywordFrame, ParagraphMode, Step};
use crate::statements::{Branch, CatchClause, KeywordDetail, Paragraph, ParagraphKind};
use jcpp_common::{TranslateError, TranslateResult, ValueCategory};
use jcpp_scanner::text::split_top_level;
use jcpp_scanner::{Keyword, OpKind, TerminatorSearch, find_terminator, matching_close, starts_with_word};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeywordState {
    /// Keyword consumed; header or body comes next.
    Header,
    /// A branch body closed; an `else` may follow.
    AfterBranch,
    /// `do` body closed; `while` must follow.
    AfterDoBody,
    DoCondition,
    /// `try` or `catch` body closed; more clauses may follow.
    AfterTryClause,
    /// Last body closed.
    Done,
}

impl KeywordState {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            KeywordState::Header => "keyword header",
            KeywordState::AfterBranch => "if",
            KeywordState::AfterDoBody | KeywordState::DoCondition => "do",
            KeywordState::AfterTryClause => "try",
            KeywordState::Done => "keyword",
        }
    }
}

/// `(...)` at the start of `text`: inner text and bytes through `)`.
enum Parenthesized<'t> {
    Complete(&'t str, usize),
    Incomplete,
}

fn parenthesized<'t>(keyword: Keyword, text: &'t str) -> TranslateResult<Parenthesized<'t>> {
    if text.is_empty() {
        return Ok(Parenthesized::Incomplete);
    }
    if !text.starts_with('(') {
        return Err(TranslateError::MissingClause {
            keyword: keyword.text(),
            clause: "parenthesized header",
        });
    }
    Ok(match matching_close(text, 0) {
        Some(close) => Parenthesized::Complete(&text[1..close], close + 1),
        None => Parenthesized::Incomplete,
    })
}

impl CodeReader {
    pub(crate) fn step_keyword(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let keyword = self.body.arena.keyword(frame.id).keyword;
        match frame.state {
            KeywordState::Done => Ok(Step::Pop(0)),
            KeywordState::AfterBranch => self.after_branch(frame, text),
            KeywordState::AfterDoBody => self.after_do_body(frame, text),
            KeywordState::DoCondition => self.do_condition(frame, text),
            KeywordState::AfterTryClause => self.after_try_clause(frame, text),
            KeywordState::Header => match keyword {
                Keyword::If => self.conditional_header(frame, text),
                Keyword::For => self.for_header(frame, text),
                Keyword::While => self.while_header(frame, text),
                Keyword::Do => {
                    let body = self.open_body(frame, ParagraphKind::Body);
                    self.set_detail(frame, KeywordDetail::DoWhile {
                        body,
                        condition: NodeIndex::NONE,
                    });
                    frame.state = KeywordState::AfterDoBody;
                    Ok(Step::Push(0, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
                }
                Keyword::Switch => self.switch_header(frame, text),
                Keyword::Try => {
                    let body = self.open_body(frame, ParagraphKind::Body);
                    self.set_detail(frame, KeywordDetail::Try {
                        body,
                        catches: Vec::new(),
                        finally: None,
                    });
                    frame.state = KeywordState::AfterTryClause;
                    Ok(Step::Push(0, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
                }
                Keyword::Synchronized => self.synchronized_header(frame, text),
                Keyword::Return | Keyword::Throw => self.jump_with_value(frame, keyword, text),
                Keyword::Break | Keyword::Continue => self.jump_with_label(frame, text),
                Keyword::Case => self.case_label(frame, text),
                Keyword::Default => {
                    if text.is_empty() {
                        return Ok(Step::NeedMore);
                    }
                    if !text.starts_with(':') {
                        return Err(TranslateError::MissingClause {
                            keyword: "default",
                            clause: "`:`",
                        });
                    }
                    self.set_detail(frame, KeywordDetail::Default);
                    Ok(Step::Pop(1))
                }
            },
        }
    }

    fn set_detail(&mut self, frame: &KeywordFrame, detail: KeywordDetail) {
        self.body.arena.keyword_mut(frame.id).detail = detail;
    }

    fn open_body(&mut self, frame: &KeywordFrame, kind: ParagraphKind) -> ParagraphId {
        self.body
            .arena
            .add_paragraph(Paragraph::new(kind, Some(frame.scope)))
    }

    // =========================================================================
    // if / else
    // =========================================================================

    fn conditional_header(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let (inner, consumed) = match parenthesized(Keyword::If, text)? {
            Parenthesized::Complete(inner, consumed) => (inner, consumed),
            Parenthesized::Incomplete => return Ok(Step::NeedMore),
        };
        let condition = self.body.parse_expression(frame.scope, inner)?;
        let body = self.open_body(frame, ParagraphKind::Body);
        self.push_branch(frame, Branch { condition, body });
        frame.state = KeywordState::AfterBranch;
        Ok(Step::Push(consumed, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
    }

    fn push_branch(&mut self, frame: &KeywordFrame, branch: Branch) {
        let construct = self.body.arena.keyword_mut(frame.id);
        match &mut construct.detail {
            KeywordDetail::Conditional { branches } => branches.push(branch),
            detail => {
                *detail = KeywordDetail::Conditional {
                    branches: vec![branch],
                }
            }
        }
    }

    fn after_branch(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        if text.is_empty() {
            return Ok(if self.finishing { Step::Pop(0) } else { Step::NeedMore });
        }
        if !starts_with_word(text, "else") {
            return Ok(Step::Pop(0));
        }
        let rest = &text[4..];
        let after = rest.trim_start();
        if after.is_empty() && !self.finishing {
            return Ok(Step::NeedMore);
        }
        if starts_with_word(after, "if") {
            frame.state = KeywordState::Header;
            return Ok(Step::Consumed(4 + (rest.len() - after.len()) + 2));
        }
        let body = self.open_body(frame, ParagraphKind::Body);
        self.push_branch(
            frame,
            Branch {
                condition: NodeIndex::NONE,
                body,
            },
        );
        frame.state = KeywordState::Done;
        Ok(Step::Push(4, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
    }

    // =========================================================================
    // Loops
    // =========================================================================

    fn for_header(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let (inner, consumed) = match parenthesized(Keyword::For, text)? {
            Parenthesized::Complete(inner, consumed) => (inner, consumed),
            Parenthesized::Incomplete => return Ok(Step::NeedMore),
        };
        let body = self.open_body(frame, ParagraphKind::Body);
        let clauses = split_top_level(inner, ';');
        let detail = match clauses.as_slice() {
            [init, condition, update] => KeywordDetail::CountedLoop {
                init: self.body.parse_statement(body, init)?,
                condition: self.body.parse_expression(body, condition)?,
                update: self.body.parse_expression(body, update)?,
                body,
            },
            [header] => {
                let header = self.body.parse_expression(body, header)?;
                let element_iteration = self.is_element_iteration(header)?;
                KeywordDetail::IteratorLoop {
                    header,
                    element_iteration,
                    body,
                }
            }
            _ => {
                return Err(TranslateError::UnexpectedToken {
                    token: inner.trim().to_string(),
                    context: "as a for-loop header",
                });
            }
        };
        self.set_detail(frame, detail);
        frame.state = KeywordState::Done;
        Ok(Step::Push(consumed, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
    }

    /// `T x : items` over a container iterates elements by reference.
    fn is_element_iteration(&self, header: NodeIndex) -> TranslateResult<bool> {
        let Some(node) = self.body.arena.get(header) else {
            return Err(TranslateError::MissingClause {
                keyword: "for",
                clause: "loop header",
            });
        };
        let NodeKind::Operator(data) = &node.kind else {
            return Err(TranslateError::UnexpectedToken {
                token: node.text.trim().to_string(),
                context: "as a for-each header",
            });
        };
        if data.op != OpKind::Colon {
            return Err(TranslateError::UnexpectedToken {
                token: node.text.trim().to_string(),
                context: "as a for-each header",
            });
        }
        let declares = matches!(
            self.body.arena.get(data.left).map(|n| &n.kind),
            Some(NodeKind::Declaration(_))
        );
        Ok(declares && self.body.value_category(data.right) == ValueCategory::Container)
    }

    fn while_header(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let (inner, consumed) = match parenthesized(Keyword::While, text)? {
            Parenthesized::Complete(inner, consumed) => (inner, consumed),
            Parenthesized::Incomplete => return Ok(Step::NeedMore),
        };
        let condition = self.body.parse_expression(frame.scope, inner)?;
        let body = self.open_body(frame, ParagraphKind::Body);
        self.set_detail(frame, KeywordDetail::While { condition, body });
        frame.state = KeywordState::Done;
        Ok(Step::Push(consumed, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
    }

    fn after_do_body(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        if text.is_empty() && !self.finishing {
            return Ok(Step::NeedMore);
        }
        if !starts_with_word(text, "while") {
            return Err(TranslateError::MissingClause {
                keyword: "do",
                clause: "`while` condition",
            });
        }
        frame.state = KeywordState::DoCondition;
        Ok(Step::Consumed(5))
    }

    fn do_condition(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let (inner, consumed) = match parenthesized(Keyword::Do, text)? {
            Parenthesized::Complete(inner, consumed) => (inner, consumed),
            Parenthesized::Incomplete if self.finishing => {
                return Err(TranslateError::MissingClause {
                    keyword: "do",
                    clause: "`while` condition",
                });
            }
            Parenthesized::Incomplete => return Ok(Step::NeedMore),
        };
        let rest = &text[consumed..];
        let after = rest.trim_start();
        if after.is_empty() && !self.finishing {
            return Ok(Step::NeedMore);
        }
        let condition = self.body.parse_expression(frame.scope, inner)?;
        if let KeywordDetail::DoWhile { condition: slot, .. } = &mut self.body.arena.keyword_mut(frame.id).detail {
            *slot = condition;
        }
        let semicolon = if after.starts_with(';') {
            rest.len() - after.len() + 1
        } else {
            0
        };
        Ok(Step::Pop(consumed + semicolon))
    }

    // =========================================================================
    // switch, synchronized
    // =========================================================================

    fn switch_header(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let (inner, consumed) = match parenthesized(Keyword::Switch, text)? {
            Parenthesized::Complete(inner, consumed) => (inner, consumed),
            Parenthesized::Incomplete => return Ok(Step::NeedMore),
        };
        let subject = self.body.parse_expression(frame.scope, inner)?;
        let body = self.open_body(frame, ParagraphKind::SwitchBody);
        self.set_detail(frame, KeywordDetail::Switch { subject, body });
        frame.state = KeywordState::Done;
        Ok(Step::Push(consumed, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
    }

    fn synchronized_header(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let (inner, consumed) = match parenthesized(Keyword::Synchronized, text)? {
            Parenthesized::Complete(inner, consumed) => (inner, consumed),
            Parenthesized::Incomplete => return Ok(Step::NeedMore),
        };
        let lock = self.body.parse_expression(frame.scope, inner)?;
        let body = self.open_body(frame, ParagraphKind::Body);
        self.set_detail(frame, KeywordDetail::Synchronized { lock, body });
        frame.state = KeywordState::Done;
        Ok(Step::Push(consumed, Frame::paragraph(body, ParagraphMode::AwaitOpen)))
    }

    // =========================================================================
    // try / catch / finally
    // =========================================================================

    fn after_try_clause(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        if text.is_empty() && !self.finishing {
            return Ok(Step::NeedMore);
        }
        if starts_with_word(text, "catch") {
            let rest = &text[5..];
            let after = rest.trim_start();
            let (inner, consumed) = match parenthesized(Keyword::Try, after)? {
                Parenthesized::Complete(inner, consumed) => (inner, consumed),
                Parenthesized::Incomplete => return Ok(Step::NeedMore),
            };
            let body = self.open_body(frame, ParagraphKind::Body);
            for alternative in catch_alternatives(inner) {
                let declaration = self.body.parse_expression(body, &alternative)?;
                if let KeywordDetail::Try { catches, .. } = &mut self.body.arena.keyword_mut(frame.id).detail {
                    catches.push(CatchClause { declaration, body });
                }
            }
            let consumed = 5 + (rest.len() - after.len()) + consumed;
            return Ok(Step::Push(consumed, Frame::paragraph(body, ParagraphMode::AwaitOpen)));
        }
        if starts_with_word(text, "finally") {
            let body = self.open_body(frame, ParagraphKind::Body);
            if let KeywordDetail::Try { finally, .. } = &mut self.body.arena.keyword_mut(frame.id).detail {
                *finally = Some(body);
            }
            frame.state = KeywordState::Done;
            return Ok(Step::Push(7, Frame::paragraph(body, ParagraphMode::AwaitOpen)));
        }
        let has_clause = matches!(
            &self.body.arena.keyword(frame.id).detail,
            KeywordDetail::Try { catches, finally, .. } if !catches.is_empty() || finally.is_some()
        );
        if !has_clause {
            return Err(TranslateError::MissingClause {
                keyword: "try",
                clause: "`catch` or `finally` clause",
            });
        }
        Ok(Step::Pop(0))
    }

    // =========================================================================
    // Jumps and switch labels
    // =========================================================================

    fn jump_with_value(&mut self, frame: &mut KeywordFrame, keyword: Keyword, text: &str) -> TranslateResult<Step> {
        let cut = match find_terminator(text, ';') {
            TerminatorSearch::Found(cut) => cut,
            TerminatorSearch::Incomplete => return Ok(Step::NeedMore),
            TerminatorSearch::StrayClose(_) => {
                return Err(TranslateError::MissingClause {
                    keyword: keyword.text(),
                    clause: "terminating `;`",
                });
            }
        };
        let value = self.parse_cut(frame.scope, text, &cut, false)?;
        if keyword == Keyword::Return
            && value.is_some()
            && self.body.arena.node(value).is_identifier()
            && self.body.value_category(value) == ValueCategory::OwnedValue
        {
            self.body.returns_smart_handle = true;
        }
        self.set_detail(frame, KeywordDetail::Jump { value, label: None });
        Ok(Step::Pop(cut.end + 1))
    }

    fn jump_with_label(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let Some(end) = text.find(';') else {
            return Ok(Step::NeedMore);
        };
        let label = text[..end].trim();
        let label = (!label.is_empty()).then(|| label.to_string());
        self.set_detail(
            frame,
            KeywordDetail::Jump {
                value: NodeIndex::NONE,
                label,
            },
        );
        Ok(Step::Pop(end + 1))
    }

    fn case_label(&mut self, frame: &mut KeywordFrame, text: &str) -> TranslateResult<Step> {
        let cut = match find_terminator(text, ':') {
            TerminatorSearch::Found(cut) => cut,
            TerminatorSearch::Incomplete => return Ok(Step::NeedMore),
            TerminatorSearch::StrayClose(_) => {
                return Err(TranslateError::MissingClause {
                    keyword: "case",
                    clause: "`:`",
                });
            }
        };
        let value = self.body.parse_expression(frame.scope, &text[..cut.end])?;
        self.set_detail(frame, KeywordDetail::Case { value });
        Ok(Step::Pop(cut.end + 1))
    }
}

/// `A | B e` catches either type into `e`; each alternative becomes its own
/// declaration sharing the handler body.
fn catch_alternatives(inner: &str) -> Vec<String> {
    let inner = inner.trim();
    let alternatives = split_top_level(inner, '|');
    let Some((last, types)) = alternatives.split_last() else {
        return vec![inner.to_string()];
    };
    let last = last.trim();
    let Some(split) = last.rfind(char::is_whitespace) else {
        return vec![inner.to_string()];
    };
    if types.is_empty() {
        return vec![inner.to_string()];
    }
    let name = last[split..].trim();
    types
        .iter()
        .map(|type_name| type_name.trim())
        .chain(std::iter::once(last[..split].trim()))
        .map(|type_name| format!("{type_name} {name}"))
        .collect()
}
