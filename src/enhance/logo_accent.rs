use super::EnhanceConfig;
use crate::Result;
use crate::events::{EventKind, ListenerStore};
use crate::page::Page;

/// Colors the logo with a random accent while hovered. Leaving clears the
/// inline color so the stylesheet color shows again.
pub fn install_logo_accent(
    page: &mut Page,
    listeners: &mut ListenerStore,
    config: &EnhanceConfig,
) -> Result<bool> {
    let Some(logo) = page.query_selector(&config.logo_selector)? else {
        page.trace_enhance(format!("[logo] inert: {} missing", config.logo_selector));
        return Ok(false);
    };

    let palette = config.logo_palette.clone();
    listeners.add(logo, EventKind::MouseEnter, move |page, _| {
        let Some(color) = page.choose(&palette) else {
            return Ok(());
        };
        page.dom_mut().style_set(logo, "color", color)
    });
    listeners.add(logo, EventKind::MouseLeave, move |page, _| {
        page.dom_mut().style_set(logo, "color", "")
    });

    Ok(true)
}
