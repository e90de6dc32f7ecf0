use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::Result;
use crate::dom::NodeId;
use crate::page::Page;
use crate::trace::TraceCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
        }
    }

    /// Pointer enter/leave are delivered to the hovered element only.
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct EventState {
    pub kind: EventKind,
    pub target: NodeId,
    pub current_target: NodeId,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventState {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

pub type Handler = Rc<dyn Fn(&mut Page, &mut EventState) -> Result<()>>;

#[derive(Default, Clone)]
pub struct ListenerStore {
    map: HashMap<NodeId, HashMap<EventKind, Vec<Handler>>>,
}

impl fmt::Debug for ListenerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts = self
            .map
            .iter()
            .flat_map(|(node, events)| {
                events
                    .iter()
                    .map(move |(kind, handlers)| (node.0, kind.name(), handlers.len()))
            })
            .collect::<Vec<_>>();
        counts.sort();
        f.debug_struct("ListenerStore")
            .field("listeners", &counts)
            .finish()
    }
}

impl ListenerStore {
    pub fn add<F>(&mut self, node_id: NodeId, kind: EventKind, handler: F)
    where
        F: Fn(&mut Page, &mut EventState) -> Result<()> + 'static,
    {
        self.map
            .entry(node_id)
            .or_default()
            .entry(kind)
            .or_default()
            .push(Rc::new(handler));
    }

    /// Snapshot of the handlers registered for `kind` on `node_id`.
    pub fn get(&self, node_id: NodeId, kind: EventKind) -> Vec<Handler> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(&kind))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, node_id: NodeId, kind: EventKind) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(&kind))
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.map
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// Runs the listeners for `event` on its target and, for bubbling kinds, on
/// every ancestor up to the document.
pub(crate) fn dispatch(
    page: &mut Page,
    listeners: &ListenerStore,
    kind: EventKind,
    target: NodeId,
) -> Result<EventState> {
    let mut event = EventState::new(kind, target);

    let mut path = vec![target];
    if kind.bubbles() {
        let mut cursor = page.dom().parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = page.dom().parent(node);
        }
    }

    for node in path {
        event.current_target = node;
        for handler in listeners.get(node, kind) {
            if page.trace_wants(TraceCategory::Event) {
                let line = format!(
                    "[event] {} target={} current={} default_prevented={}",
                    kind,
                    page.node_label(target),
                    page.node_label(node),
                    event.default_prevented
                );
                page.trace_event(line);
            }
            handler(page, &mut event)?;
        }
        if event.propagation_stopped {
            break;
        }
    }

    if page.trace_wants(TraceCategory::Event) {
        let line = format!(
            "[event] done {} target={} default_prevented={} propagation_stopped={}",
            kind,
            page.node_label(target),
            event.default_prevented,
            event.propagation_stopped
        );
        page.trace_event(line);
    }
    Ok(event)
}
