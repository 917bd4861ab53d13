//! Form Validation WASM
//!
//! WebAssembly bindings for the form validation controller.
//! Drives the real browser DOM through `web-sys`.
//!
//! # Example (JavaScript)
//! ```javascript
//! import init, { FormValidation } from './form_validation_wasm.js';
//!
//! await init();
//! const validation = new FormValidation('form.needs-validation', {
//!     errorColor: '#dc3545',
//!     invalidClass: 'is-invalid',
//! });
//! ```

use std::rc::Rc;

use form_validation_core::{self as core, FormValidation, ValidationOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

mod console;
mod web_document;
mod web_events;

pub use web_document::WebDocument;
pub use web_events::WebEvents;

/// Set panic hook for better error messages in the browser and route
/// `tracing` output (listener failures included) to the console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    console::init(level);
}

/// Failing field returned to JavaScript
#[derive(Serialize, Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Read the JavaScript options object; `undefined`/`null` mean defaults
pub fn parse_options(options: JsValue) -> Result<ValidationOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ValidationOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse options: {}", e)))
}

/// Controller bound to the page's forms
#[wasm_bindgen(js_name = FormValidation)]
pub struct FormValidationHandle {
    validation: Rc<FormValidation<WebDocument>>,
    document: WebDocument,
    events: WebEvents,
}

#[wasm_bindgen(js_class = FormValidation)]
impl FormValidationHandle {
    /// Bind to every form matching `selector`
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str, options: JsValue) -> Result<FormValidationHandle, JsValue> {
        let options = parse_options(options)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let mut doc = WebDocument::new(document.clone());
        let mut events = WebEvents::new(document);
        let validation = FormValidation::attach(&mut doc, &mut events, selector, options).map_err(to_js)?;

        Ok(Self {
            validation,
            document: doc,
            events,
        })
    }

    /// Number of forms bound at construction
    #[wasm_bindgen(getter, js_name = formCount)]
    pub fn form_count(&self) -> usize {
        self.validation.forms().len()
    }

    /// Error message for a field, or `undefined` when it is valid
    #[wasm_bindgen(js_name = hasError)]
    pub fn has_error(&self, field: &Element) -> Option<String> {
        self.validation
            .has_error(&self.document, field)
            .map(|issue| issue.to_string())
    }

    #[wasm_bindgen(js_name = showError)]
    pub fn show_error(&mut self, field: &Element, error: &str) -> Result<(), JsValue> {
        self.validation
            .show_error(&mut self.document, field, error)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = clearError)]
    pub fn clear_error(&mut self, field: &Element) -> Result<(), JsValue> {
        self.validation
            .clear_error(&mut self.document, field)
            .map_err(to_js)
    }

    /// Validate and render a whole form; returns `[{ field, message }]`
    #[wasm_bindgen(js_name = validateForm)]
    pub fn validate_form(&mut self, form: &Element) -> Result<JsValue, JsValue> {
        let errors: Vec<FieldError> = self
            .validation
            .validate_form(&mut self.document, form)
            .map_err(to_js)?
            .into_iter()
            .map(|error| FieldError {
                field: error.field.id(),
                message: error.issue.to_string(),
            })
            .collect();

        Ok(serde_wasm_bindgen::to_value(&errors)?)
    }

    /// Remove the document listeners
    pub fn detach(&mut self) {
        self.events.detach();
    }
}

/// Quick email validation (the strict syntax check)
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    core::is_valid_email(email)
}

/// Pattern attribute installed on email inputs
#[wasm_bindgen(js_name = emailPattern)]
pub fn email_pattern_js() -> String {
    core::EMAIL_PATTERN_ATTRIBUTE.to_string()
}
