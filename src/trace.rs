use std::collections::VecDeque;

use crate::{Error, Result};

const DEFAULT_TRACE_LOG_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceCategory {
    Event,
    Scroll,
    Enhance,
}

impl TraceCategory {
    fn target(self) -> &'static str {
        match self {
            Self::Event => "site_enhancer::event",
            Self::Scroll => "site_enhancer::scroll",
            Self::Enhance => "site_enhancer::enhance",
        }
    }
}

/// Opt-in trace buffer. Lines are kept in memory for inspection and, when
/// forwarding is on, also handed to the `log` facade.
#[derive(Debug, Clone)]
pub(crate) struct TraceState {
    enabled: bool,
    events: bool,
    scroll: bool,
    enhance: bool,
    forward_to_log: bool,
    logs: VecDeque<String>,
    limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            scroll: true,
            enhance: true,
            forward_to_log: true,
            logs: VecDeque::new(),
            limit: DEFAULT_TRACE_LOG_LIMIT,
        }
    }
}

impl TraceState {
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_category(&mut self, category: TraceCategory, enabled: bool) {
        match category {
            TraceCategory::Event => self.events = enabled,
            TraceCategory::Scroll => self.scroll = enabled,
            TraceCategory::Enhance => self.enhance = enabled,
        }
    }

    pub(crate) fn set_forward_to_log(&mut self, enabled: bool) {
        self.forward_to_log = enabled;
    }

    pub(crate) fn set_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.limit = max_entries;
        while self.logs.len() > self.limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }

    fn category_enabled(&self, category: TraceCategory) -> bool {
        match category {
            TraceCategory::Event => self.events,
            TraceCategory::Scroll => self.scroll,
            TraceCategory::Enhance => self.enhance,
        }
    }

    pub(crate) fn wants(&self, category: TraceCategory) -> bool {
        self.enabled && self.category_enabled(category)
    }

    pub(crate) fn line(&mut self, category: TraceCategory, line: String) {
        if !self.wants(category) {
            return;
        }
        if self.forward_to_log {
            log::debug!(target: category.target(), "{line}");
        }
        if self.logs.len() >= self.limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_logs_are_empty_when_trace_is_disabled() {
        let mut trace = TraceState::default();
        trace.line(TraceCategory::Event, "[event] click".into());
        assert!(trace.take().is_empty());
    }

    #[test]
    fn trace_categories_can_be_disabled() {
        let mut trace = TraceState::default();
        trace.set_enabled(true);
        trace.set_category(TraceCategory::Event, false);
        trace.line(TraceCategory::Event, "[event] click".into());
        trace.line(TraceCategory::Scroll, "[scroll] to 10".into());
        assert_eq!(trace.take(), vec!["[scroll] to 10".to_string()]);
    }

    #[test]
    fn trace_log_limit_keeps_latest_entries() -> Result<()> {
        let mut trace = TraceState::default();
        trace.set_enabled(true);
        trace.set_forward_to_log(false);
        for idx in 0..5 {
            trace.line(TraceCategory::Enhance, format!("line {idx}"));
        }
        trace.set_limit(2)?;
        assert_eq!(trace.take(), vec!["line 3".to_string(), "line 4".to_string()]);
        assert!(trace.set_limit(0).is_err());
        Ok(())
    }
}
