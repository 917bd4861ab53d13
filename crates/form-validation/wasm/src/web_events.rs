//! `EventSource` over `document.addEventListener`

use form_validation_core::{DomEvent, EventKind, EventSource, Listener, Phase};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::web_document::WebDocument;

struct Registration {
    kind: EventKind,
    capture: bool,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// Document-level listeners; the closures stay alive until [`WebEvents::detach`]
pub struct WebEvents {
    document: web_sys::Document,
    registrations: Vec<Registration>,
}

impl WebEvents {
    pub fn new(document: web_sys::Document) -> Self {
        Self {
            document,
            registrations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Remove every listener registered through this source
    pub fn detach(&mut self) {
        for registration in self.registrations.drain(..) {
            let removed = self.document.remove_event_listener_with_callback_and_bool(
                registration.kind.as_str(),
                registration.closure.as_ref().unchecked_ref(),
                registration.capture,
            );
            if let Err(err) = removed {
                tracing::warn!("Failed to remove {} listener: {:?}", registration.kind.as_str(), err);
            }
        }
    }
}

impl Drop for WebEvents {
    fn drop(&mut self) {
        self.detach();
    }
}

impl EventSource<WebDocument> for WebEvents {
    fn on(&mut self, kind: EventKind, phase: Phase, mut listener: Listener<WebDocument>) {
        let document = self.document.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };

            let mut doc = WebDocument::new(document.clone());
            let mut dom_event = DomEvent::new(kind, target);
            listener(&mut doc, &mut dom_event);

            if dom_event.default_prevented {
                event.prevent_default();
            }
            if dom_event.propagation_stopped {
                event.stop_propagation();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let capture = phase == Phase::Capture;
        let added = self.document.add_event_listener_with_callback_and_bool(
            kind.as_str(),
            closure.as_ref().unchecked_ref(),
            capture,
        );
        if let Err(err) = added {
            tracing::warn!("Failed to add {} listener: {:?}", kind.as_str(), err);
            return;
        }

        self.registrations.push(Registration {
            kind,
            capture,
            closure,
        });
    }
}
