use std::fmt;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dom::{Dom, NodeId};
use crate::html::parse_html;
use crate::trace::{TraceCategory, TraceState};
use crate::viewport::{ScrollBehavior, Viewport};
use crate::{Error, Result};

const DEFAULT_RANDOM_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// The host capabilities a behavior may use: document lookup and mutation,
/// window scrolling, randomness and tracing.
pub struct Page {
    dom: Dom,
    viewport: Viewport,
    rng: Box<dyn RngCore>,
    trace: TraceState,
    enhanced: bool,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("dom", &self.dom)
            .field("viewport", &self.viewport)
            .field("trace", &self.trace)
            .field("enhanced", &self.enhanced)
            .finish_non_exhaustive()
    }
}

impl Page {
    pub fn new(dom: Dom) -> Self {
        Self::with_rng(dom, Box::new(ChaCha8Rng::seed_from_u64(DEFAULT_RANDOM_SEED)))
    }

    pub fn with_rng(dom: Dom, rng: Box<dyn RngCore>) -> Self {
        Self {
            dom,
            viewport: Viewport::default(),
            rng,
            trace: TraceState::default(),
            enhanced: false,
        }
    }

    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::new(parse_html(html)?))
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng = Box::new(ChaCha8Rng::seed_from_u64(seed));
    }

    pub fn set_rng(&mut self, rng: Box<dyn RngCore>) {
        self.rng = rng;
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng.as_mut()
    }

    /// Uniform draw in `[0, 1)`.
    pub fn random_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform pick from `palette`; `None` when it is empty.
    pub fn choose<'a>(&mut self, palette: &'a [String]) -> Option<&'a str> {
        if palette.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..palette.len());
        palette.get(idx).map(String::as_str)
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.by_id(id)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    /// `getBoundingClientRect().top`: document position minus current scroll.
    pub fn bounding_top(&self, node_id: NodeId) -> Result<f64> {
        Ok(self.dom.document_top(node_id)? - self.viewport.scroll_y())
    }

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y()
    }

    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let from = self.viewport.scroll_y();
        self.viewport.scroll_to(top, behavior);
        self.trace_scroll(format!(
            "[scroll] to top={} behavior={:?} from={}",
            crate::format_float(top),
            behavior,
            crate::format_float(from)
        ));
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        self.viewport.advance_time(delta_ms)
    }

    pub fn node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        if let Some(class) = self.dom.attr(node, "class") {
            if let Some(first) = class.split_whitespace().next() {
                let tag = self.dom.tag_name(node).unwrap_or_default();
                return format!("{tag}.{first}");
            }
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }

    /// Whether the behaviors have already been installed on this page.
    pub fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    pub(crate) fn mark_enhanced(&mut self) {
        self.enhanced = true;
    }

    pub(crate) fn trace_wants(&self, category: TraceCategory) -> bool {
        self.trace.wants(category)
    }

    pub(crate) fn trace_mut(&mut self) -> &mut TraceState {
        &mut self.trace
    }

    pub(crate) fn trace_event(&mut self, line: String) {
        self.trace.line(TraceCategory::Event, line);
    }

    pub(crate) fn trace_scroll(&mut self, line: String) {
        self.trace.line(TraceCategory::Scroll, line);
    }

    pub(crate) fn trace_enhance(&mut self, line: String) {
        self.trace.line(TraceCategory::Enhance, line);
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    #[test]
    fn bounding_top_subtracts_scroll_offset() -> Result<()> {
        let mut page = Page::from_html("<section id='s' data-layout-top='900'></section>")?;
        let section = page.by_id("s").expect("section");
        assert_eq!(page.bounding_top(section)?, 900.0);
        page.scroll_to(300.0, ScrollBehavior::Auto);
        assert_eq!(page.bounding_top(section)?, 600.0);
        Ok(())
    }

    #[test]
    fn same_seed_gives_same_draws() -> Result<()> {
        let mut a = Page::from_html("")?;
        let mut b = Page::from_html("")?;
        a.set_random_seed(7);
        b.set_random_seed(7);
        let left = (0..4).map(|_| a.random_f64()).collect::<Vec<_>>();
        let right = (0..4).map(|_| b.random_f64()).collect::<Vec<_>>();
        assert_eq!(left, right);
        assert!(left.iter().all(|v| (0.0..1.0).contains(v)));
        Ok(())
    }

    #[test]
    fn choose_uses_injected_generator() -> Result<()> {
        let mut page = Page::with_rng(Dom::new(), Box::new(StepRng::new(0, 0)));
        let palette = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(page.choose(&palette), Some("a"));
        assert_eq!(page.random_f64(), 0.0);
        assert_eq!(page.choose(&[]), None);
        Ok(())
    }

    #[test]
    fn node_label_prefers_id_then_class() -> Result<()> {
        let page = Page::from_html("<a id='x'></a><div class='logo big'></div><p></p>")?;
        let labels = page
            .query_selector_all("a, div, p")?
            .into_iter()
            .map(|node| page.node_label(node))
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["#x", "div.logo", "p"]);
        Ok(())
    }
}
