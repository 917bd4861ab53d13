//! In-memory host
//!
//! A small element tree with native-like constraint validation and a
//! document-level event bus. Lets the controller run (and be tested)
//! without a browser.

mod bus;
mod document;
mod selector;
mod validity;

pub use bus::EventBus;
pub use document::{MemoryDocument, NodeId};
pub use validity::{is_simple_email, is_url_like};
