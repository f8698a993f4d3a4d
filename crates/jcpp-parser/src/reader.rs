//! Line-driven control-flow state machine.
//!
//! `CodeReader` is a pushdown automaton over frames. The driver feeds one
//! source line at a time; the reader appends it to the leftover of the
//! previous call and lets the top frame consume what it can. A frame that
//! cannot finish with the text at hand answers `Step::NeedMore` and the
//! leftover waits for the next line.

use crate::body::CodeBody;
use crate::context::MethodContext;
use crate::lifting::lift_anonymous_types;
use crate::node::{KeywordId, ParagraphId};
use crate::state_keywords::KeywordState;
use jcpp_common::limits::{FINISH_RETRY_BUDGET, MAX_STEPS_PER_FEED};
use jcpp_common::{TranslateError, TranslateOptions, TranslateResult};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParagraphMode {
    /// The method body. Never closes on its own.
    Root,
    /// Waiting to see whether the body opens with `{`.
    AwaitOpen,
    /// Braced; closes at the matching `}`.
    Open,
    /// Unbraced body: exactly one statement or construct.
    Single { taken: bool },
}

#[derive(Clone, Debug)]
pub(crate) struct ParagraphFrame {
    pub(crate) id: ParagraphId,
    pub(crate) mode: ParagraphMode,
    /// `label:` seen, waiting for the construct it names.
    pub(crate) pending_label: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct KeywordFrame {
    pub(crate) id: KeywordId,
    /// Paragraph the construct appears in.
    pub(crate) scope: ParagraphId,
    pub(crate) state: KeywordState,
}

#[derive(Clone, Debug)]
pub(crate) enum Frame {
    Paragraph(ParagraphFrame),
    Keyword(KeywordFrame),
}

impl Frame {
    pub(crate) fn paragraph(id: ParagraphId, mode: ParagraphMode) -> Frame {
        Frame::Paragraph(ParagraphFrame {
            id,
            mode,
            pending_label: None,
        })
    }

    fn describe(&self) -> &'static str {
        match self {
            Frame::Paragraph(p) => match p.mode {
                ParagraphMode::Root => "method body",
                ParagraphMode::AwaitOpen => "body",
                ParagraphMode::Open => "{",
                ParagraphMode::Single { .. } => "single statement body",
            },
            Frame::Keyword(k) => k.state.describe(),
        }
    }
}

/// Outcome of one frame transition. Offsets count bytes of the trimmed text
/// handed to the frame.
#[derive(Debug)]
pub(crate) enum Step {
    NeedMore,
    Consumed(usize),
    Push(usize, Frame),
    Pop(usize),
}

pub struct CodeReader {
    pub(crate) body: CodeBody,
    stack: Vec<Frame>,
    leftover: String,
    pub(crate) finishing: bool,
}

impl CodeReader {
    pub fn new(context: MethodContext, options: TranslateOptions) -> CodeReader {
        let body = CodeBody::new(context, options);
        let root = body.root();
        CodeReader {
            body,
            stack: vec![Frame::paragraph(root, ParagraphMode::Root)],
            leftover: String::new(),
            finishing: false,
        }
    }

    #[inline]
    pub fn body(&self) -> &CodeBody {
        &self.body
    }

    /// Text carried over to the next line.
    pub fn leftover(&self) -> &str {
        &self.leftover
    }

    /// Number of open frames, the root paragraph included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Only the root paragraph is open and nothing is buffered.
    pub fn is_idle(&self) -> bool {
        self.stack.len() == 1 && self.leftover.trim().is_empty()
    }

    pub fn feed_line(&mut self, line: &str) -> TranslateResult<()> {
        if !self.leftover.is_empty() {
            self.leftover.push(' ');
        }
        self.leftover.push_str(line);
        self.run()
    }

    /// Close the body: drain leftovers, close frames, lift anonymous types.
    pub fn finish(mut self) -> TranslateResult<CodeBody> {
        self.finishing = true;
        let mut retries = FINISH_RETRY_BUDGET;
        loop {
            self.run()?;
            if self.is_idle() || retries == 0 {
                break;
            }
            retries -= 1;
            trace!(retries, depth = self.stack.len(), "retrying stalled frame");
        }
        if !self.is_idle() {
            let leftover = self.leftover.trim();
            let leftover = if leftover.is_empty() {
                self.stack
                    .last()
                    .map_or("", Frame::describe)
                    .to_string()
            } else {
                leftover.to_string()
            };
            return Err(TranslateError::UnterminatedInput { leftover });
        }
        lift_anonymous_types(&mut self.body);
        let stats = self.body.stats();
        debug!(
            method = %self.body.context().name,
            statements = stats.statements,
            passes = stats.passes,
            max_depth = stats.max_depth,
            average_depth = stats.average_depth(),
            lifted = self.body.lifted_types().len(),
            "method body parsed"
        );
        Ok(self.body)
    }

    fn run(&mut self) -> TranslateResult<()> {
        for _ in 0..MAX_STEPS_PER_FEED {
            let Some(mut frame) = self.stack.pop() else {
                return Ok(());
            };
            let text = std::mem::take(&mut self.leftover);
            let trimmed = text.trim_start();
            let step = match self.step(&mut frame, trimmed) {
                Ok(step) => step,
                Err(err) => {
                    self.stack.push(frame);
                    self.leftover = text;
                    return Err(err);
                }
            };
            match step {
                Step::NeedMore => {
                    self.stack.push(frame);
                    self.leftover = text;
                    return Ok(());
                }
                Step::Consumed(n) => {
                    self.leftover = trimmed[n..].to_string();
                    self.stack.push(frame);
                }
                Step::Push(n, child) => {
                    trace!(parent = frame.describe(), child = child.describe(), "push frame");
                    self.leftover = trimmed[n..].to_string();
                    self.stack.push(frame);
                    self.stack.push(child);
                }
                Step::Pop(n) => {
                    trace!(frame = frame.describe(), "pop frame");
                    self.leftover = trimmed[n..].to_string();
                }
            }
        }
        Err(TranslateError::ResolveStalled {
            text: self.leftover.clone(),
        })
    }

    fn step(&mut self, frame: &mut Frame, text: &str) -> TranslateResult<Step> {
        match frame {
            Frame::Paragraph(paragraph) => self.step_paragraph(paragraph, text),
            Frame::Keyword(keyword) => self.step_keyword(keyword, text),
        }
    }
}
