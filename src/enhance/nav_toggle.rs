use super::EnhanceConfig;
use crate::Result;
use crate::events::{EventKind, ListenerStore};
use crate::page::Page;

/// Wires the mobile menu button. Clicking the toggle flips the open class on
/// the menu; clicking any link inside the menu removes it.
///
/// Returns the number of menu links wired, or `None` when the toggle or the
/// menu is missing.
pub fn install_nav_toggle(
    page: &mut Page,
    listeners: &mut ListenerStore,
    config: &EnhanceConfig,
) -> Result<Option<usize>> {
    let (Some(toggle), Some(menu)) = (
        page.by_id(&config.menu_toggle_id),
        page.by_id(&config.nav_menu_id),
    ) else {
        page.trace_enhance(format!(
            "[nav] inert: #{} or #{} missing",
            config.menu_toggle_id, config.nav_menu_id
        ));
        return Ok(None);
    };

    let open_class = config.menu_open_class.clone();
    listeners.add(toggle, EventKind::Click, move |page, _| {
        let open = page.dom_mut().class_toggle(menu, &open_class)?;
        page.trace_enhance(format!("[nav] toggle open={open}"));
        Ok(())
    });

    // Links are collected once; anchors added to the menu later are not wired.
    let links = page.dom().query_selector_all_from(menu, "a")?;
    for link in &links {
        let open_class = config.menu_open_class.clone();
        listeners.add(*link, EventKind::Click, move |page, _| {
            page.dom_mut().class_remove(menu, &open_class)
        });
    }

    page.trace_enhance(format!("[nav] wired toggle with {} links", links.len()));
    Ok(Some(links.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::dispatch;

    const NAV_HTML: &str = r##"
    <button id="menu-toggle">Menu</button>
    <nav id="nav-menu">
      <a href="#about">About</a>
      <a href="/blog">Blog</a>
    </nav>
    "##;

    #[test]
    fn toggle_flips_open_class_each_click() -> Result<()> {
        let mut page = Page::from_html(NAV_HTML)?;
        let mut listeners = ListenerStore::default();
        let wired = install_nav_toggle(&mut page, &mut listeners, &EnhanceConfig::default())?;
        assert_eq!(wired, Some(2));

        let toggle = page.by_id("menu-toggle").expect("toggle");
        let menu = page.by_id("nav-menu").expect("menu");
        dispatch(&mut page, &listeners, EventKind::Click, toggle)?;
        assert!(page.dom().class_contains(menu, "open")?);
        dispatch(&mut page, &listeners, EventKind::Click, toggle)?;
        assert!(!page.dom().class_contains(menu, "open")?);
        Ok(())
    }

    #[test]
    fn menu_link_closes_menu_regardless_of_state() -> Result<()> {
        let mut page = Page::from_html(NAV_HTML)?;
        let mut listeners = ListenerStore::default();
        install_nav_toggle(&mut page, &mut listeners, &EnhanceConfig::default())?;

        let toggle = page.by_id("menu-toggle").expect("toggle");
        let menu = page.by_id("nav-menu").expect("menu");
        let blog = page.query_selector("a[href='/blog']")?.expect("blog link");

        dispatch(&mut page, &listeners, EventKind::Click, toggle)?;
        dispatch(&mut page, &listeners, EventKind::Click, blog)?;
        assert!(!page.dom().class_contains(menu, "open")?);

        dispatch(&mut page, &listeners, EventKind::Click, blog)?;
        assert!(!page.dom().class_contains(menu, "open")?);
        Ok(())
    }

    #[test]
    fn missing_menu_leaves_toggle_inert() -> Result<()> {
        let mut page = Page::from_html("<button id='menu-toggle'>Menu</button>")?;
        let mut listeners = ListenerStore::default();
        let wired = install_nav_toggle(&mut page, &mut listeners, &EnhanceConfig::default())?;
        assert_eq!(wired, None);
        assert_eq!(listeners.total(), 0);
        Ok(())
    }
}
