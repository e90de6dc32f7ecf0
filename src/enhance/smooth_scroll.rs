use super::EnhanceConfig;
use crate::Result;
use crate::events::{EventKind, ListenerStore};
use crate::page::Page;
use crate::viewport::ScrollBehavior;

/// Destination that leaves the target just below a fixed header.
pub fn scroll_target(rect_top: f64, scroll_y: f64, header_height: f64, padding: f64) -> f64 {
    rect_top + scroll_y - header_height - padding
}

/// Intercepts in-page anchor clicks and animates the window to the anchor's
/// target instead of jumping. Returns the number of anchors wired.
pub fn install_smooth_scroll(
    page: &mut Page,
    listeners: &mut ListenerStore,
    config: &EnhanceConfig,
) -> Result<usize> {
    let anchors = page.query_selector_all(&config.fragment_link_selector)?;
    for anchor in &anchors {
        let anchor = *anchor;
        let header_selector = config.header_selector.clone();
        let padding = config.scroll_padding;
        listeners.add(anchor, EventKind::Click, move |page, event| {
            let Some(href) = page.dom().attr(anchor, "href") else {
                return Ok(());
            };
            if href == "#" {
                return Ok(());
            }
            let fragment = href.strip_prefix('#').unwrap_or(href.as_str());
            let Some(target) = page.by_id(fragment) else {
                page.trace_scroll(format!("[scroll] no target for {href}"));
                return Ok(());
            };

            event.prevent_default();
            let header_height = match page.query_selector(&header_selector)? {
                Some(header) => page.dom().offset_height(header)?,
                None => {
                    page.trace_scroll(format!(
                        "[scroll] header {header_selector} missing, using 0"
                    ));
                    0.0
                }
            };
            let top = scroll_target(
                page.bounding_top(target)?,
                page.scroll_y(),
                header_height,
                padding,
            );
            page.scroll_to(top, ScrollBehavior::Smooth);
            Ok(())
        });
    }

    page.trace_enhance(format!("[scroll] wired {} fragment links", anchors.len()));
    Ok(anchors.len())
}
