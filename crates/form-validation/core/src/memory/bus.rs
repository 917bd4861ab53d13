use crate::dom::{Document, DomError};
use crate::events::{DomEvent, EventKind, EventSource, Listener, Phase};

use super::document::{MemoryDocument, NodeId};

struct Registered<D: Document> {
    kind: EventKind,
    phase: Phase,
    listener: Listener<D>,
}

/// Document-level listener registry with capture-then-bubble dispatch
pub struct EventBus<D: Document> {
    listeners: Vec<Registered<D>>,
}

impl<D: Document> Default for EventBus<D> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<D: Document> EventSource<D> for EventBus<D> {
    fn on(&mut self, kind: EventKind, phase: Phase, listener: Listener<D>) {
        self.listeners.push(Registered {
            kind,
            phase,
            listener,
        });
    }
}

impl<D: Document> EventBus<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event fired at `target`
    ///
    /// Capture listeners run first, in registration order. Bubble listeners
    /// follow for bubbling event kinds unless a capture listener stopped
    /// propagation. The returned event carries the listeners' decisions.
    pub fn dispatch(&mut self, doc: &mut D, kind: EventKind, target: D::Node) -> DomEvent<D::Node> {
        let mut event = DomEvent::new(kind, target);

        self.run_phase(doc, &mut event, Phase::Capture);
        if kind.bubbles() && !event.propagation_stopped {
            self.run_phase(doc, &mut event, Phase::Bubble);
        }

        tracing::debug!(
            "Dispatched {} (default prevented: {})",
            kind.as_str(),
            event.default_prevented
        );
        event
    }

    fn run_phase(&mut self, doc: &mut D, event: &mut DomEvent<D::Node>, phase: Phase) {
        let kind = event.kind;
        for registered in self
            .listeners
            .iter_mut()
            .filter(|r| r.kind == kind && r.phase == phase)
        {
            (registered.listener)(doc, event);
        }
    }
}

impl EventBus<MemoryDocument> {
    /// Move focus to `node` the way a user tabbing through the page does
    ///
    /// Fires `blur` at the previously focused element (if it differs) before
    /// focusing `node`. [`Document::focus`] called from inside a listener only
    /// records the new focus; it does not dispatch a nested `blur`.
    pub fn focus(&mut self, doc: &mut MemoryDocument, node: NodeId) -> Result<(), DomError> {
        if let Some(previous) = doc.focused().filter(|previous| *previous != node) {
            self.dispatch(doc, EventKind::Blur, previous);
        }
        doc.focus(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_capture_runs_before_bubble() {
        let mut doc = MemoryDocument::new();
        let target = doc.body();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<MemoryDocument> = EventBus::new();

        let log = Rc::clone(&order);
        bus.on(
            EventKind::Input,
            Phase::Bubble,
            Box::new(move |_: &mut MemoryDocument, _: &mut DomEvent<NodeId>| log.borrow_mut().push("bubble")),
        );
        let log = Rc::clone(&order);
        bus.on(
            EventKind::Input,
            Phase::Capture,
            Box::new(move |_: &mut MemoryDocument, _: &mut DomEvent<NodeId>| log.borrow_mut().push("capture")),
        );

        bus.dispatch(&mut doc, EventKind::Input, target);
        assert_eq!(*order.borrow(), vec!["capture", "bubble"]);
    }

    #[test]
    fn test_blur_skips_bubble_listeners() {
        let mut doc = MemoryDocument::new();
        let target = doc.body();
        let hits = Rc::new(RefCell::new(0));
        let mut bus: EventBus<MemoryDocument> = EventBus::new();

        let counter = Rc::clone(&hits);
        bus.on(
            EventKind::Blur,
            Phase::Bubble,
            Box::new(move |_: &mut MemoryDocument, _: &mut DomEvent<NodeId>| *counter.borrow_mut() += 1),
        );

        bus.dispatch(&mut doc, EventKind::Blur, target);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_stop_propagation_in_capture() {
        let mut doc = MemoryDocument::new();
        let target = doc.body();
        let mut bus: EventBus<MemoryDocument> = EventBus::new();

        bus.on(
            EventKind::Submit,
            Phase::Capture,
            Box::new(|_: &mut MemoryDocument, event: &mut DomEvent<NodeId>| event.stop_propagation()),
        );
        bus.on(
            EventKind::Submit,
            Phase::Bubble,
            Box::new(|_: &mut MemoryDocument, event: &mut DomEvent<NodeId>| event.prevent_default()),
        );

        let event = bus.dispatch(&mut doc, EventKind::Submit, target);
        assert!(event.propagation_stopped);
        assert!(!event.default_prevented);
    }

    #[test]
    fn test_focus_blurs_previous_element() {
        let mut doc = MemoryDocument::new();
        let first = doc.append(doc.body(), "input", &[("id", "first")]);
        let second = doc.append(doc.body(), "input", &[("id", "second")]);
        let blurred = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<MemoryDocument> = EventBus::new();

        let log = Rc::clone(&blurred);
        bus.on(
            EventKind::Blur,
            Phase::Capture,
            Box::new(move |_: &mut MemoryDocument, event: &mut DomEvent<NodeId>| log.borrow_mut().push(event.target)),
        );

        bus.focus(&mut doc, first).unwrap();
        bus.focus(&mut doc, first).unwrap();
        assert!(blurred.borrow().is_empty());

        bus.focus(&mut doc, second).unwrap();
        assert_eq!(*blurred.borrow(), vec![first]);
        assert_eq!(doc.focused(), Some(second));
    }
}
