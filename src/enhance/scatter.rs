use rand::Rng;

use super::EnhanceConfig;
use crate::format_float;
use crate::page::Page;
use crate::{Error, Result};

const MIN_DOT_SIZE: f64 = 2.0;
const DOT_SIZE_SPAN: f64 = 6.0;
const MIN_DOT_OPACITY: f64 = 0.2;
const DOT_OPACITY_SPAN: f64 = 0.6;

/// One decorative dot: a filled circle placed by percentage inside the
/// scatter container.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterDot {
    /// Diameter in px, in `[2, 8)`.
    pub size: f64,
    pub color: String,
    /// Vertical position in percent, in `[0, 100)`.
    pub top: f64,
    /// Horizontal position in percent, in `[0, 100)`.
    pub left: f64,
    /// In `[0.2, 0.8)`.
    pub opacity: f64,
}

impl ScatterDot {
    /// Draws size, color, top, left and opacity, in that order.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, palette: &[String]) -> Result<Self> {
        if palette.is_empty() {
            return Err(Error::Config("scatter palette is empty".into()));
        }
        let size = rng.r#gen::<f64>() * DOT_SIZE_SPAN + MIN_DOT_SIZE;
        let color = palette[rng.gen_range(0..palette.len())].clone();
        let top = rng.r#gen::<f64>() * 100.0;
        let left = rng.r#gen::<f64>() * 100.0;
        let opacity = rng.r#gen::<f64>() * DOT_OPACITY_SPAN + MIN_DOT_OPACITY;
        Ok(Self {
            size,
            color,
            top,
            left,
            opacity,
        })
    }

    pub fn style_declarations(&self) -> Vec<(&'static str, String)> {
        let size = format!("{}px", format_float(self.size));
        vec![
            ("position", "absolute".to_string()),
            ("width", size.clone()),
            ("height", size),
            ("border-radius", "50%".to_string()),
            ("background", self.color.clone()),
            ("top", format!("{}%", format_float(self.top))),
            ("left", format!("{}%", format_float(self.left))),
            ("opacity", format_float(self.opacity)),
        ]
    }
}

/// Fills the scatter container with freshly sampled dots, once. Returns the
/// number appended; 0 when the container is absent.
pub fn decorate_scatter(page: &mut Page, config: &EnhanceConfig) -> Result<usize> {
    let Some(container) = page.query_selector(&config.scatter_selector)? else {
        page.trace_enhance(format!(
            "[scatter] skipped: {} missing",
            config.scatter_selector
        ));
        return Ok(0);
    };

    for _ in 0..config.scatter_dot_count {
        let dot = ScatterDot::sample(page.rng(), &config.scatter_palette)?;
        let node = page.dom_mut().create_detached_element("div");
        for (property, value) in dot.style_declarations() {
            page.dom_mut().style_set(node, property, &value)?;
        }
        page.dom_mut().append_child(container, node)?;
    }

    page.trace_enhance(format!(
        "[scatter] appended {} dots to {}",
        config.scatter_dot_count,
        page.node_label(container)
    ));
    Ok(config.scatter_dot_count)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::enhance::SCATTER_PALETTE;

    fn palette() -> Vec<String> {
        SCATTER_PALETTE.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn sample_with_zero_generator_hits_lower_bounds() -> Result<()> {
        let mut rng = StepRng::new(0, 0);
        let dot = ScatterDot::sample(&mut rng, &palette())?;
        assert_eq!(dot.size, 2.0);
        assert_eq!(dot.color, SCATTER_PALETTE[0]);
        assert_eq!(dot.top, 0.0);
        assert_eq!(dot.left, 0.0);
        assert_eq!(dot.opacity, 0.2);
        Ok(())
    }

    #[test]
    fn seeded_samples_stay_in_range() -> Result<()> {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let palette = palette();
        for _ in 0..500 {
            let dot = ScatterDot::sample(&mut rng, &palette)?;
            assert!((2.0..8.0).contains(&dot.size));
            assert!((0.0..100.0).contains(&dot.top));
            assert!((0.0..100.0).contains(&dot.left));
            assert!((0.2..0.8).contains(&dot.opacity));
            assert!(palette.contains(&dot.color));
        }
        Ok(())
    }

    #[test]
    fn style_declarations_describe_a_round_absolute_dot() {
        let dot = ScatterDot {
            size: 4.5,
            color: "rgba(0,212,170,0.25)".into(),
            top: 12.5,
            left: 80.0,
            opacity: 0.5,
        };
        let style = dot.style_declarations();
        assert_eq!(style[0], ("position", "absolute".to_string()));
        assert_eq!(style[1], ("width", "4.5px".to_string()));
        assert_eq!(style[2], ("height", "4.5px".to_string()));
        assert_eq!(style[3], ("border-radius", "50%".to_string()));
        assert_eq!(style[5], ("top", "12.5%".to_string()));
        assert_eq!(style[6], ("left", "80%".to_string()));
        assert_eq!(style[7], ("opacity", "0.5".to_string()));
    }

    #[test]
    fn decorate_appends_configured_number_of_dots() -> Result<()> {
        let mut page = Page::from_html("<div class='scatter-dots'><span>keep</span></div>")?;
        let appended = decorate_scatter(&mut page, &EnhanceConfig::default())?;
        assert_eq!(appended, 40);

        let container = page.query_selector(".scatter-dots")?.expect("container");
        let children = page.dom().element_children(container);
        assert_eq!(children.len(), 41);
        for dot in &children[1..] {
            assert_eq!(page.dom().tag_name(*dot), Some("div"));
            assert_eq!(page.dom().style_get(*dot, "border-radius")?, "50%");
            assert_eq!(
                page.dom().style_get(*dot, "width")?,
                page.dom().style_get(*dot, "height")?
            );
        }
        Ok(())
    }

    #[test]
    fn decorate_without_container_does_nothing() -> Result<()> {
        let mut page = Page::from_html("<main></main>")?;
        let before = page.dom().dump_node(page.dom().root());
        assert_eq!(decorate_scatter(&mut page, &EnhanceConfig::default())?, 0);
        assert_eq!(page.dom().dump_node(page.dom().root()), before);
        Ok(())
    }
}
