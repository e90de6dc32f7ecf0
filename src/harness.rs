use rand::RngCore;

use crate::dom::{LayoutBox, NodeId};
use crate::enhance::{self, EnhanceConfig, InstallReport};
use crate::events::{self, EventKind, EventState, ListenerStore};
use crate::html::parse_html;
use crate::page::Page;
use crate::trace::TraceCategory;
use crate::viewport::ScrollBehavior;
use crate::{Error, Result, truncate_chars};

/// A loaded page plus the listeners attached to it, driven the way a user
/// would: clicks, hovers and the passage of time.
#[derive(Debug)]
pub struct Harness {
    page: Page,
    listeners: ListenerStore,
    location_hash: String,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::with_page(Page::new(parse_html(html)?)))
    }

    pub fn from_html_with_rng(html: &str, rng: Box<dyn RngCore>) -> Result<Self> {
        Ok(Self::with_page(Page::with_rng(parse_html(html)?, rng)))
    }

    fn with_page(page: Page) -> Self {
        Self {
            page,
            listeners: ListenerStore::default(),
            location_hash: String::new(),
        }
    }

    /// Runs the initialization pass of every behavior against the page.
    pub fn install(&mut self, config: &EnhanceConfig) -> Result<InstallReport> {
        enhance::install(&mut self.page, &mut self.listeners, config)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn listeners(&self) -> &ListenerStore {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerStore {
        &mut self.listeners
    }

    pub fn location_hash(&self) -> &str {
        &self.location_hash
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.page.trace_mut().set_enabled(enabled);
    }

    pub fn set_trace_category(&mut self, category: TraceCategory, enabled: bool) {
        self.page.trace_mut().set_category(category, enabled);
    }

    pub fn set_trace_to_log(&mut self, enabled: bool) {
        self.page.trace_mut().set_forward_to_log(enabled);
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.page.trace_mut().set_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.page.trace_mut().take()
    }

    pub fn set_random_seed(&mut self, seed: u64) {
        self.page.set_random_seed(seed);
    }

    pub fn set_viewport(&mut self, viewport_height: f64, document_height: f64) -> Result<()> {
        self.page
            .viewport_mut()
            .set_dimensions(viewport_height, document_height)
    }

    pub fn set_smooth_scroll_duration(&mut self, duration_ms: i64) -> Result<()> {
        self.page.viewport_mut().set_smooth_duration_ms(duration_ms)
    }

    pub fn set_layout_box(&mut self, selector: &str, top: f64, height: f64) -> Result<()> {
        let target = self.page.select_one(selector)?;
        self.page
            .dom_mut()
            .set_layout_box(target, LayoutBox { top, height })
    }

    /// Scrolls instantly, as a user dragging the scrollbar would.
    pub fn scroll_to(&mut self, top: f64) {
        self.page.scroll_to(top, ScrollBehavior::Auto);
    }

    pub fn scroll_y(&self) -> f64 {
        self.page.scroll_y()
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        self.page.advance_time(delta_ms)
    }

    pub fn finish_scroll(&mut self) {
        self.page.viewport_mut().finish_scroll();
    }

    /// Dispatches a click and, unless a listener prevented it, performs the
    /// default action of in-page anchors: update the location hash and jump
    /// to the target without animation.
    pub fn click(&mut self, selector: &str) -> Result<EventState> {
        let target = self.page.select_one(selector)?;
        let outcome = events::dispatch(&mut self.page, &self.listeners, EventKind::Click, target)?;
        if !outcome.default_prevented {
            self.follow_fragment_link(target)?;
        }
        Ok(outcome)
    }

    pub fn hover(&mut self, selector: &str) -> Result<EventState> {
        self.dispatch(selector, EventKind::MouseEnter)
    }

    pub fn unhover(&mut self, selector: &str) -> Result<EventState> {
        self.dispatch(selector, EventKind::MouseLeave)
    }

    pub fn dispatch(&mut self, selector: &str, kind: EventKind) -> Result<EventState> {
        let target = self.page.select_one(selector)?;
        events::dispatch(&mut self.page, &self.listeners, kind, target)
    }

    fn follow_fragment_link(&mut self, clicked: NodeId) -> Result<()> {
        let dom = self.page.dom();
        let mut cursor = Some(clicked);
        let mut anchor = None;
        while let Some(node) = cursor {
            if dom.tag_name(node) == Some("a") && dom.attr(node, "href").is_some() {
                anchor = Some(node);
                break;
            }
            cursor = dom.parent(node);
        }
        let Some(href) = anchor.and_then(|node| dom.attr(node, "href")) else {
            return Ok(());
        };
        let Some(fragment) = href.strip_prefix('#') else {
            return Ok(());
        };

        let destination = if fragment.is_empty() {
            Some(0.0)
        } else {
            match dom.by_id(fragment) {
                Some(target) => Some(dom.document_top(target)?),
                None => None,
            }
        };
        self.location_hash = href;
        if let Some(top) = destination {
            self.page.scroll_to(top, ScrollBehavior::Auto);
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.page.select_one(selector)?;
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.page.select_one(selector)?;
        let actual = self.page.dom().class_contains(target, class_name)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!("class {class_name} present={actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.page.select_one(selector)?;
        let actual = self.page.dom().style_get(target, property)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: format!("{property}: {actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.page.select_one(selector)?;
        self.page.dom().style_get(target, property)
    }

    pub fn child_element_count(&self, selector: &str) -> Result<usize> {
        let target = self.page.select_one(selector)?;
        Ok(self.page.dom().element_children(target).len())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.page.select_one(selector)?;
        Ok(self.page.dom().dump_node(target))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.page.dom().dump_node(node_id), 200)
    }
}
