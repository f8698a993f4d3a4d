//! `TranslationUnit`: the backend-facing handle on a finished body.
//!
//! The backend calls `translate` once with its unseen-type collector, then
//! renders the body, single paragraphs, keyword constructs or lifted types
//! as often as it likes.

use crate::collector::{DiscardTypes, TypeCollector};
use crate::lowering_pass::LoweringPass;
use crate::printer::Printer;
use crate::transform_context::TransformContext;
use jcpp_common::ValueCategory;
use jcpp_parser::{CodeBody, KeywordId, LiftedId, LiftedType, NodeIndex, ParagraphId};

pub struct TranslationUnit<'a> {
    body: &'a CodeBody,
    transforms: Option<TransformContext>,
}

impl<'a> TranslationUnit<'a> {
    pub fn new(body: &'a CodeBody) -> Self {
        TranslationUnit {
            body,
            transforms: None,
        }
    }

    /// Lower the body and report referenced types. Calling it again
    /// recomputes the same directives.
    pub fn translate(&mut self, collector: &mut dyn TypeCollector) {
        let transforms = LoweringPass::new(self.body, collector).run();
        self.transforms = Some(transforms);
    }

    pub fn is_translated(&self) -> bool {
        self.transforms.is_some()
    }

    pub fn transforms(&self) -> Option<&TransformContext> {
        self.transforms.as_ref()
    }

    /// Render the whole body at `indent` levels.
    pub fn render(&self, indent: u32) -> String {
        self.with_printer(|printer| printer.render_body(indent))
    }

    pub fn render_paragraph(&self, id: ParagraphId, indent: u32) -> String {
        self.with_printer(|printer| printer.render_paragraph(id, indent))
    }

    pub fn render_keyword(&self, id: KeywordId, indent: u32) -> String {
        self.with_printer(|printer| printer.render_keyword(id, indent))
    }

    pub fn render_node(&self, node: NodeIndex) -> String {
        self.with_printer(|printer| printer.expression(node))
    }

    pub fn render_lifted(&self, id: LiftedId, indent: u32) -> String {
        self.with_printer(|printer| printer.render_lifted(id, indent))
    }

    fn with_printer<R>(&self, f: impl FnOnce(&Printer<'_>) -> R) -> R {
        let owned;
        let transforms = match &self.transforms {
            Some(transforms) => transforms,
            None => {
                let mut discard = DiscardTypes;
                owned = LoweringPass::new(self.body, &mut discard).run();
                &owned
            }
        };
        f(&Printer::new(self.body, transforms))
    }

    pub fn returns_smart_handle(&self) -> bool {
        self.body.returns_smart_handle()
    }

    pub fn lifted_types(&self) -> &'a [LiftedType] {
        self.body.lifted_types()
    }

    /// Parameters and locals with their resolved categories, in
    /// declaration order.
    pub fn declaration_categories(&self) -> impl Iterator<Item = (&'a str, ValueCategory)> {
        self.body
            .arena()
            .variables
            .iter()
            .map(|variable| (variable.name.as_str(), variable.category))
    }
}
