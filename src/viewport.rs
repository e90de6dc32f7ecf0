use crate::{Error, Result};

const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
const DEFAULT_SMOOTH_SCROLL_MS: i64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// One `scroll_to` call as issued, before clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    started_at: i64,
    duration_ms: i64,
}

impl ScrollAnimation {
    fn position_at(&self, now_ms: i64) -> f64 {
        let elapsed = (now_ms - self.started_at).max(0);
        if elapsed >= self.duration_ms {
            return self.to;
        }
        let progress = elapsed as f64 / self.duration_ms as f64;
        self.from + (self.to - self.from) * ease_in_out_cubic(progress)
    }

    fn finished_at(&self, now_ms: i64) -> bool {
        now_ms - self.started_at >= self.duration_ms
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Window scroll state with a virtual clock driving smooth scrolling.
#[derive(Debug, Clone)]
pub struct Viewport {
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
    now_ms: i64,
    smooth_duration_ms: i64,
    animation: Option<ScrollAnimation>,
    requests: Vec<ScrollRequest>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            document_height: f64::INFINITY,
            now_ms: 0,
            smooth_duration_ms: DEFAULT_SMOOTH_SCROLL_MS,
            animation: None,
            requests: Vec::new(),
        }
    }
}

impl Viewport {
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    pub fn last_scroll_request(&self) -> Option<ScrollRequest> {
        self.requests.last().copied()
    }

    /// Sets the visible height and total document height. An unbounded
    /// document uses `f64::INFINITY`.
    pub fn set_dimensions(&mut self, viewport_height: f64, document_height: f64) -> Result<()> {
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return Err(Error::Config(format!(
                "viewport height must be positive and finite, got {viewport_height}"
            )));
        }
        if document_height.is_nan() || document_height < 0.0 {
            return Err(Error::Config(format!(
                "document height must be non-negative, got {document_height}"
            )));
        }
        self.viewport_height = viewport_height;
        self.document_height = document_height;
        self.scroll_y = self.clamp(self.scroll_y);
        Ok(())
    }

    pub fn set_smooth_duration_ms(&mut self, duration_ms: i64) -> Result<()> {
        if duration_ms <= 0 {
            return Err(Error::Config(
                "smooth scroll duration requires at least 1 ms".into(),
            ));
        }
        self.smooth_duration_ms = duration_ms;
        Ok(())
    }

    fn clamp(&self, top: f64) -> f64 {
        top.clamp(0.0, self.max_scroll())
    }

    /// Requests a scroll. A new request replaces any animation in flight and
    /// starts from the current position.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.requests.push(ScrollRequest { top, behavior });
        let destination = if top.is_finite() {
            self.clamp(top)
        } else {
            self.scroll_y
        };

        match behavior {
            ScrollBehavior::Auto => {
                self.animation = None;
                self.scroll_y = destination;
            }
            ScrollBehavior::Smooth => {
                if destination == self.scroll_y {
                    self.animation = None;
                    return;
                }
                self.animation = Some(ScrollAnimation {
                    from: self.scroll_y,
                    to: destination,
                    started_at: self.now_ms,
                    duration_ms: self.smooth_duration_ms,
                });
            }
        }
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Config(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        if let Some(animation) = self.animation {
            self.scroll_y = animation.position_at(self.now_ms);
            if animation.finished_at(self.now_ms) {
                self.animation = None;
            }
        }
        Ok(())
    }

    /// Jumps any running animation to its destination.
    pub fn finish_scroll(&mut self) {
        if let Some(animation) = self.animation.take() {
            self.scroll_y = animation.to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_scroll_jumps_and_clamps() -> Result<()> {
        let mut viewport = Viewport::default();
        viewport.set_dimensions(800.0, 2000.0)?;
        viewport.scroll_to(5000.0, ScrollBehavior::Auto);
        assert_eq!(viewport.scroll_y(), 1200.0);
        viewport.scroll_to(-40.0, ScrollBehavior::Auto);
        assert_eq!(viewport.scroll_y(), 0.0);
        assert_eq!(
            viewport.last_scroll_request(),
            Some(ScrollRequest {
                top: -40.0,
                behavior: ScrollBehavior::Auto
            })
        );
        Ok(())
    }

    #[test]
    fn smooth_scroll_eases_to_destination() -> Result<()> {
        let mut viewport = Viewport::default();
        viewport.scroll_to(1000.0, ScrollBehavior::Smooth);
        assert_eq!(viewport.scroll_y(), 0.0);
        assert!(viewport.is_animating());

        viewport.advance_time(200)?;
        assert!((viewport.scroll_y() - 500.0).abs() < 1e-9);

        viewport.advance_time(100)?;
        let late = viewport.scroll_y();
        assert!(late > 500.0 && late < 1000.0);

        viewport.advance_time(100)?;
        assert_eq!(viewport.scroll_y(), 1000.0);
        assert!(!viewport.is_animating());
        Ok(())
    }

    #[test]
    fn later_request_replaces_running_animation() -> Result<()> {
        let mut viewport = Viewport::default();
        viewport.scroll_to(1000.0, ScrollBehavior::Smooth);
        viewport.advance_time(200)?;
        viewport.scroll_to(100.0, ScrollBehavior::Smooth);
        viewport.finish_scroll();
        assert_eq!(viewport.scroll_y(), 100.0);
        assert_eq!(viewport.scroll_requests().len(), 2);
        Ok(())
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut viewport = Viewport::default();
        assert!(viewport.advance_time(-1).is_err());
        assert!(viewport.set_dimensions(0.0, 100.0).is_err());
        assert!(viewport.set_dimensions(100.0, f64::NAN).is_err());
        assert!(viewport.set_smooth_duration_ms(0).is_err());
    }
}
