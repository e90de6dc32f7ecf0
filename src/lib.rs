use std::error::Error as StdError;
use std::fmt;

mod dom;
pub mod enhance;
mod events;
mod harness;
mod html;
mod page;
mod selector;
mod trace;
mod viewport;

pub use dom::{Dom, LayoutBox, NodeId};
pub use enhance::{EnhanceConfig, InstallReport};
pub use events::{EventKind, EventState, Handler, ListenerStore};
pub use harness::Harness;
pub use page::Page;
pub use trace::TraceCategory;
pub use viewport::{ScrollBehavior, ScrollRequest, Viewport};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    Dom(String),
    Config(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

pub(crate) fn format_float(value: f64) -> String {
    let mut out = format!("{:.16}", value);
    while out.contains('.') && out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_float_trims_trailing_zeros() {
        assert_eq!(format_float(2.0), "2");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-20.5), "-20.5");
    }

    #[test]
    fn truncate_chars_marks_cut_output() {
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn error_display_names_the_failing_selector() {
        let err = Error::SelectorNotFound(".logo".into());
        assert_eq!(err.to_string(), "selector not found: .logo");
    }
}
