//! Event plumbing between a host and the controller

use crate::dom::Document;

/// The DOM events the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    Blur,
    Input,
}

impl EventKind {
    /// DOM event type name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Submit => "submit",
            EventKind::Blur => "blur",
            EventKind::Input => "input",
        }
    }

    /// Whether the event reaches bubbling-phase listeners on ancestors
    pub fn bubbles(&self) -> bool {
        !matches!(self, EventKind::Blur)
    }
}

/// Listener phase at the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    Bubble,
}

/// An event delivered to a listener
///
/// Listeners record their decisions in the flags; the host applies them to
/// the real event once the listener returns.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent<N> {
    pub kind: EventKind,
    pub target: N,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl<N> DomEvent<N> {
    pub fn new(kind: EventKind, target: N) -> Self {
        Self {
            kind,
            target,
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

/// Boxed document-level listener
pub type Listener<D> = Box<dyn FnMut(&mut D, &mut DomEvent<<D as Document>::Node>)>;

/// Registration capability for document-level listeners
pub trait EventSource<D: Document> {
    fn on(&mut self, kind: EventKind, phase: Phase, listener: Listener<D>);
}
