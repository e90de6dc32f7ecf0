use site_enhancer::enhance::{LOGO_PALETTE, SCATTER_PALETTE};
use site_enhancer::{EnhanceConfig, Harness, InstallReport, ScrollBehavior, TraceCategory};

const SITE_HTML: &str = r##"
<!DOCTYPE html>
<html>
<body>
  <header class="site-header" data-layout-height="72">
    <a class="logo" href="#" style="font-weight: 700">portfolio</a>
    <button id="menu-toggle" aria-label="Menu">&#9776;</button>
    <nav id="nav-menu">
      <a href="#projects">Projects</a>
      <a href="#about">About</a>
      <a href="/resume.pdf">Resume</a>
    </nav>
  </header>
  <section class="hero">
    <div class="scatter-dots"></div>
    <a id="cta" href="#projects">See work</a>
  </section>
  <section id="projects" data-layout-top="1400" data-layout-height="900"></section>
  <section id="about" data-layout-top="2600" data-layout-height="600"></section>
  <footer><a id="broken" href="#contact">Contact</a></footer>
</body>
</html>
"##;

fn installed_site() -> site_enhancer::Result<Harness> {
    let mut harness = Harness::from_html(SITE_HTML)?;
    harness.set_viewport(800.0, 4000.0)?;
    let report = harness.install(&EnhanceConfig::default())?;
    assert_eq!(
        report,
        InstallReport {
            nav_toggle: true,
            nav_links: 3,
            fragment_links: 5,
            scatter_dots: 40,
            logo_accent: true,
        }
    );
    Ok(harness)
}

#[test]
fn menu_toggle_opens_and_closes_navigation() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.assert_class("#nav-menu", "open", false)?;
    h.click("#menu-toggle")?;
    h.assert_class("#nav-menu", "open", true)?;
    h.click("#menu-toggle")?;
    h.assert_class("#nav-menu", "open", false)?;
    Ok(())
}

#[test]
fn following_a_menu_link_closes_the_menu_and_scrolls() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.click("#menu-toggle")?;
    let outcome = h.click("#nav-menu a[href='#about']")?;
    assert!(outcome.default_prevented);
    h.assert_class("#nav-menu", "open", false)?;

    let request = h
        .page()
        .viewport()
        .last_scroll_request()
        .expect("scroll requested");
    assert_eq!(request.top, 2600.0 - 72.0 - 20.0);
    assert_eq!(request.behavior, ScrollBehavior::Smooth);

    h.finish_scroll();
    assert_eq!(h.scroll_y(), 2508.0);
    assert_eq!(h.location_hash(), "");
    Ok(())
}

#[test]
fn non_fragment_menu_link_still_closes_the_menu() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.click("#menu-toggle")?;
    let outcome = h.click("a[href$='.pdf']")?;
    assert!(!outcome.default_prevented);
    h.assert_class("#nav-menu", "open", false)?;
    assert!(h.page().viewport().scroll_requests().is_empty());
    Ok(())
}

#[test]
fn smooth_scroll_accounts_for_current_offset() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.scroll_to(300.0);
    h.click("#cta")?;

    // rect top 1100 + scroll 300 - header 72 - padding 20
    let request = h.page().viewport().last_scroll_request().expect("request");
    assert_eq!(request.top, 1308.0);

    h.advance_time(200)?;
    let midway = h.scroll_y();
    assert!(midway > 300.0 && midway < 1308.0, "midway at {midway}");
    h.advance_time(1_000)?;
    assert_eq!(h.scroll_y(), 1308.0);
    Ok(())
}

#[test]
fn rapid_fragment_clicks_end_at_the_last_target() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.click("#cta")?;
    h.advance_time(100)?;
    h.click("#nav-menu a[href='#about']")?;
    h.advance_time(1_000)?;
    assert_eq!(h.scroll_y(), 2508.0);
    Ok(())
}

#[test]
fn bare_hash_link_keeps_default_navigation() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.scroll_to(900.0);
    let outcome = h.click(".logo")?;
    assert!(!outcome.default_prevented);
    assert_eq!(h.location_hash(), "#");
    assert_eq!(h.scroll_y(), 0.0);
    assert!(
        h.page()
            .viewport()
            .scroll_requests()
            .iter()
            .all(|request| request.behavior == ScrollBehavior::Auto)
    );
    Ok(())
}

#[test]
fn unmatched_fragment_is_not_intercepted() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.enable_trace(true);
    h.set_trace_to_log(false);
    h.scroll_to(500.0);
    let outcome = h.click("#broken")?;
    assert!(!outcome.default_prevented);
    assert_eq!(h.location_hash(), "#contact");
    assert_eq!(h.scroll_y(), 500.0);

    let logs = h.take_trace_logs();
    assert!(
        logs.iter().any(|line| line == "[scroll] no target for #contact"),
        "logs: {logs:?}"
    );
    Ok(())
}

#[test]
fn scatter_container_receives_forty_palette_dots() -> site_enhancer::Result<()> {
    let h = installed_site()?;
    assert_eq!(h.child_element_count(".scatter-dots")?, 40);

    let page = h.page();
    let container = page.query_selector(".scatter-dots")?.expect("container");
    for dot in page.dom().element_children(container) {
        let dom = page.dom();
        let background = dom.style_get(dot, "background")?;
        assert!(SCATTER_PALETTE.contains(&background.as_str()), "{background}");
        assert_eq!(dom.style_get(dot, "position")?, "absolute");

        let size = px(&dom.style_get(dot, "width")?);
        assert!((2.0..8.0).contains(&size), "size {size}");
        let opacity = dom.style_get(dot, "opacity")?.parse::<f64>().expect("opacity");
        assert!((0.2..0.8).contains(&opacity), "opacity {opacity}");
        for edge in ["top", "left"] {
            let pct = percent(&dom.style_get(dot, edge)?);
            assert!((0.0..100.0).contains(&pct), "{edge} {pct}");
        }
    }
    Ok(())
}

#[test]
fn same_seed_produces_the_same_decoration() -> site_enhancer::Result<()> {
    let render = |seed: u64| -> site_enhancer::Result<String> {
        let mut h = Harness::from_html(SITE_HTML)?;
        h.set_random_seed(seed);
        h.install(&EnhanceConfig::default())?;
        h.dump_dom(".scatter-dots")
    };
    assert_eq!(render(11)?, render(11)?);
    assert_ne!(render(11)?, render(12)?);
    Ok(())
}

#[test]
fn logo_hover_sets_and_clears_accent() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.hover(".logo")?;
    let accent = h.style(".logo", "color")?;
    assert!(LOGO_PALETTE.contains(&accent.as_str()), "{accent}");

    h.unhover(".logo")?;
    h.assert_style(".logo", "color", "")?;
    h.assert_style(".logo", "font-weight", "700")?;
    Ok(())
}

#[test]
fn hovering_the_header_does_not_reach_the_logo() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.hover(".site-header")?;
    h.assert_style(".logo", "color", "")?;
    Ok(())
}

#[test]
fn page_without_hooks_installs_nothing() -> site_enhancer::Result<()> {
    let mut h = Harness::from_html("<main><p>nothing to enhance</p></main>")?;
    h.enable_trace(true);
    h.set_trace_to_log(false);
    let report = h.install(&EnhanceConfig::default())?;
    assert_eq!(report, InstallReport::default());
    assert_eq!(h.listeners().total(), 0);

    let logs = h.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[nav] inert")));
    assert!(logs.iter().any(|line| line.starts_with("[scatter] skipped")));
    assert!(logs.iter().any(|line| line.starts_with("[logo] inert")));
    Ok(())
}

#[test]
fn custom_config_targets_other_hooks() -> site_enhancer::Result<()> {
    let html = r##"
    <button id="burger">=</button>
    <ul id="drawer"><li><a href="#x">x</a></li></ul>
    <div class="confetti"></div>
    <span class="brand">b</span>
    <section id="x" data-layout-top="500"></section>
    "##;
    let config = EnhanceConfig {
        menu_toggle_id: "burger".into(),
        nav_menu_id: "drawer".into(),
        menu_open_class: "is-open".into(),
        scroll_padding: 0.0,
        scatter_selector: ".confetti".into(),
        scatter_dot_count: 3,
        scatter_palette: vec!["red".into()],
        logo_selector: ".brand".into(),
        logo_palette: vec!["gold".into()],
        ..EnhanceConfig::default()
    };

    let mut h = Harness::from_html(html)?;
    let report = h.install(&config)?;
    assert_eq!(report.scatter_dots, 3);

    h.click("#burger")?;
    h.assert_class("#drawer", "is-open", true)?;
    h.click("#drawer a")?;
    h.assert_class("#drawer", "is-open", false)?;
    assert_eq!(h.page().viewport().last_scroll_request().map(|r| r.top), Some(500.0));

    h.hover(".brand")?;
    h.assert_style(".brand", "color", "gold")?;
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_any_wiring() -> site_enhancer::Result<()> {
    let mut h = Harness::from_html(SITE_HTML)?;
    let config = EnhanceConfig {
        logo_palette: Vec::new(),
        ..EnhanceConfig::default()
    };
    assert!(matches!(h.install(&config), Err(site_enhancer::Error::Config(_))));
    assert_eq!(h.listeners().total(), 0);
    assert_eq!(h.child_element_count(".scatter-dots")?, 0);
    Ok(())
}

#[test]
fn second_install_is_refused_and_behaviors_stay_single() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    let wired = h.listeners().total();
    assert!(matches!(
        h.install(&EnhanceConfig::default()),
        Err(site_enhancer::Error::Config(_))
    ));
    assert!(h.page().is_enhanced());
    assert_eq!(h.listeners().total(), wired);
    assert_eq!(h.child_element_count(".scatter-dots")?, 40);

    h.click("#menu-toggle")?;
    h.assert_class("#nav-menu", "open", true)?;
    Ok(())
}

#[test]
fn event_trace_can_be_filtered() -> site_enhancer::Result<()> {
    let mut h = installed_site()?;
    h.enable_trace(true);
    h.set_trace_to_log(false);
    h.set_trace_category(TraceCategory::Enhance, false);
    h.set_trace_category(TraceCategory::Scroll, false);
    h.click("#menu-toggle")?;

    let logs = h.take_trace_logs();
    assert_eq!(
        logs,
        vec![
            "[event] click target=#menu-toggle current=#menu-toggle default_prevented=false"
                .to_string(),
            "[event] done click target=#menu-toggle default_prevented=false propagation_stopped=false"
                .to_string(),
        ]
    );
    Ok(())
}

fn px(raw: &str) -> f64 {
    raw.strip_suffix("px")
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or_else(|| panic!("not a px length: {raw}"))
}

fn percent(raw: &str) -> f64 {
    raw.strip_suffix('%')
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or_else(|| panic!("not a percentage: {raw}"))
}
