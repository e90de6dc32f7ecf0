//! The four page behaviors and the configuration they share.
//!
//! Every behavior receives the [`Page`] it works on and the [`ListenerStore`]
//! it registers handlers in. A behavior whose elements are missing stays
//! inert and reports so through [`InstallReport`]; nothing here treats a
//! missing element as an error.

mod logo_accent;
mod nav_toggle;
mod scatter;
mod smooth_scroll;

pub use logo_accent::install_logo_accent;
pub use nav_toggle::install_nav_toggle;
pub use scatter::{ScatterDot, decorate_scatter};
pub use smooth_scroll::{install_smooth_scroll, scroll_target};

use crate::events::ListenerStore;
use crate::page::Page;
use crate::{Error, Result};

pub const MENU_TOGGLE_ID: &str = "menu-toggle";
pub const NAV_MENU_ID: &str = "nav-menu";
pub const MENU_OPEN_CLASS: &str = "open";
pub const FRAGMENT_LINK_SELECTOR: &str = "a[href^=\"#\"]";
pub const HEADER_SELECTOR: &str = ".site-header";
pub const SCROLL_PADDING: f64 = 20.0;
pub const SCATTER_SELECTOR: &str = ".scatter-dots";
pub const SCATTER_DOT_COUNT: usize = 40;
pub const LOGO_SELECTOR: &str = ".logo";

pub const SCATTER_PALETTE: [&str; 5] = [
    "rgba(255,107,53,0.25)",
    "rgba(0,212,170,0.25)",
    "rgba(167,139,250,0.2)",
    "rgba(244,114,182,0.2)",
    "rgba(251,191,36,0.2)",
];

pub const LOGO_PALETTE: [&str; 6] = [
    "#ff6b35", "#00d4aa", "#a78bfa", "#f472b6", "#fbbf24", "#58a6ff",
];

/// Element hooks, palettes and constants for all behaviors. `Default` matches
/// the site markup.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceConfig {
    pub menu_toggle_id: String,
    pub nav_menu_id: String,
    pub menu_open_class: String,
    pub fragment_link_selector: String,
    pub header_selector: String,
    pub scroll_padding: f64,
    pub scatter_selector: String,
    pub scatter_dot_count: usize,
    pub scatter_palette: Vec<String>,
    pub logo_selector: String,
    pub logo_palette: Vec<String>,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            menu_toggle_id: MENU_TOGGLE_ID.into(),
            nav_menu_id: NAV_MENU_ID.into(),
            menu_open_class: MENU_OPEN_CLASS.into(),
            fragment_link_selector: FRAGMENT_LINK_SELECTOR.into(),
            header_selector: HEADER_SELECTOR.into(),
            scroll_padding: SCROLL_PADDING,
            scatter_selector: SCATTER_SELECTOR.into(),
            scatter_dot_count: SCATTER_DOT_COUNT,
            scatter_palette: SCATTER_PALETTE.iter().map(|c| c.to_string()).collect(),
            logo_selector: LOGO_SELECTOR.into(),
            logo_palette: LOGO_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl EnhanceConfig {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("menu_toggle_id", &self.menu_toggle_id),
            ("nav_menu_id", &self.nav_menu_id),
            ("menu_open_class", &self.menu_open_class),
            ("fragment_link_selector", &self.fragment_link_selector),
            ("header_selector", &self.header_selector),
            ("scatter_selector", &self.scatter_selector),
            ("logo_selector", &self.logo_selector),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
        }
        if self.menu_open_class.split_whitespace().count() != 1 {
            return Err(Error::Config(format!(
                "menu_open_class must be a single class token, got {:?}",
                self.menu_open_class
            )));
        }
        if !self.scroll_padding.is_finite() {
            return Err(Error::Config(format!(
                "scroll_padding must be finite, got {}",
                self.scroll_padding
            )));
        }
        if self.scatter_palette.is_empty() {
            return Err(Error::Config("scatter_palette must not be empty".into()));
        }
        if self.logo_palette.is_empty() {
            return Err(Error::Config("logo_palette must not be empty".into()));
        }
        Ok(())
    }
}

/// Which behaviors found their elements during installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub nav_toggle: bool,
    pub nav_links: usize,
    pub fragment_links: usize,
    pub scatter_dots: usize,
    pub logo_accent: bool,
}

/// Runs the one-time initialization pass for every behavior. A page accepts
/// a single pass; a second call fails without touching the page.
pub fn install(
    page: &mut Page,
    listeners: &mut ListenerStore,
    config: &EnhanceConfig,
) -> Result<InstallReport> {
    if page.is_enhanced() {
        return Err(Error::Config("behaviors are already installed".into()));
    }
    config.validate()?;
    page.mark_enhanced();

    let nav_links = install_nav_toggle(page, listeners, config)?;
    let fragment_links = install_smooth_scroll(page, listeners, config)?;
    let scatter_dots = decorate_scatter(page, config)?;
    let logo_accent = install_logo_accent(page, listeners, config)?;

    let report = InstallReport {
        nav_toggle: nav_links.is_some(),
        nav_links: nav_links.unwrap_or(0),
        fragment_links,
        scatter_dots,
        logo_accent,
    };
    page.trace_enhance(format!("[enhance] installed {report:?}"));
    Ok(report)
}
