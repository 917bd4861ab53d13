//! Form Validation Core
//!
//! Attaches declarative validation behavior to HTML forms. The controller
//! listens for submit/blur/input events, asks the host for each field's
//! native validity flags, turns them into human-readable messages and
//! renders (or clears) inline feedback with ARIA links and styling classes.
//!
//! The host document and its event dispatch are injected through the
//! [`Document`] and [`EventSource`] traits, so the same controller drives a
//! real browser (see the `form-validation-wasm` crate) or the in-memory
//! [`memory::MemoryDocument`] used in tests.
//!
//! # Example
//!
//! ```
//! use form_validation_core::memory::{EventBus, MemoryDocument};
//! use form_validation_core::{EventKind, FormValidation, ValidationOptions};
//!
//! let mut doc = MemoryDocument::new();
//! let form = doc.append(doc.body(), "form", &[("id", "signup")]);
//! let email = doc.append(form, "input", &[("id", "email"), ("type", "email"), ("required", "")]);
//!
//! let mut bus = EventBus::new();
//! let _validation = FormValidation::attach(&mut doc, &mut bus, "form", ValidationOptions::default())
//!     .expect("attach");
//!
//! let event = bus.dispatch(&mut doc, EventKind::Submit, form);
//! assert!(event.default_prevented);
//! assert_eq!(doc.focused(), Some(email));
//! ```

pub mod config;
pub mod controller;
pub mod dom;
pub mod email;
pub mod events;
pub mod feedback;
pub mod field;
pub mod issue;

#[cfg(feature = "memory")]
pub mod memory;

pub use config::{OptInPolicy, ValidationOptions};
pub use controller::{FieldError, FormValidation};
pub use dom::{Document, DomError, ValidityState};
pub use email::{is_valid_email, EMAIL_PATTERN_ATTRIBUTE};
pub use events::{DomEvent, EventKind, EventSource, Listener, Phase};
pub use field::FieldKind;
pub use issue::{evaluate, FieldSnapshot, ValidationIssue};
