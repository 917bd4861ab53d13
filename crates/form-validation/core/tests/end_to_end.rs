//! End-to-end flows through the event bus
//!
//! Each test builds a small document, attaches the controller and drives it
//! with submit/blur/input events the way a browser would.

use std::rc::Rc;

use form_validation_core::memory::{EventBus, MemoryDocument, NodeId};
use form_validation_core::{Document, EventKind, FormValidation, ValidationOptions, EMAIL_PATTERN_ATTRIBUTE};
use pretty_assertions::assert_eq;

struct Page {
    doc: MemoryDocument,
    bus: EventBus<MemoryDocument>,
    validation: Rc<FormValidation<MemoryDocument>>,
    form: NodeId,
    label: NodeId,
    email: NodeId,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn signup_page(options: ValidationOptions) -> Page {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.body(), "form", &[("id", "signup"), ("class", "js-validate")]);
    let label = doc.append(form, "label", &[("for", "email")]);
    let email = doc.append(
        form,
        "input",
        &[
            ("id", "email"),
            ("type", "email"),
            ("required", ""),
            ("data-validate", "validate"),
        ],
    );
    doc.append(form, "button", &[("type", "submit")]);

    let mut bus = EventBus::new();
    let validation = FormValidation::attach(&mut doc, &mut bus, "form.js-validate", options).unwrap();

    Page {
        doc,
        bus,
        validation,
        form,
        label,
        email,
    }
}

impl Page {
    fn submit(&mut self) -> bool {
        let form = self.form;
        self.bus.dispatch(&mut self.doc, EventKind::Submit, form).default_prevented
    }

    fn type_into(&mut self, field: NodeId, value: &str) {
        self.doc.set_value(field, value);
        self.bus.dispatch(&mut self.doc, EventKind::Input, field);
    }

    fn message(&self) -> Option<NodeId> {
        self.doc.by_id("error-for-email")
    }
}

#[test]
fn test_attach_marks_forms_and_installs_pattern() {
    let page = signup_page(ValidationOptions::default());

    assert_eq!(page.validation.forms(), &[page.form]);
    assert_eq!(page.doc.attribute(&page.form, "novalidate").as_deref(), Some("true"));
    assert_eq!(
        page.doc.attribute(&page.email, "pattern").as_deref(),
        Some(EMAIL_PATTERN_ATTRIBUTE)
    );
    // submit + blur + input
    assert_eq!(page.bus.len(), 3);
}

#[test]
fn test_submit_empty_required_email() {
    let mut page = signup_page(ValidationOptions::default());

    assert!(page.submit());

    let message = page.message().expect("message element");
    assert_eq!(page.doc.tag_name(&message), "div");
    assert_eq!(page.doc.text(message), "Email is required.");
    assert!(page.doc.has_class(message, "invalid-feedback"));
    assert_eq!(page.doc.style(message, "display"), Some("block"));
    assert_eq!(page.doc.style(message, "visibility"), Some("visible"));

    assert!(page.doc.has_class(page.email, "is-invalid"));
    assert!(!page.doc.has_class(page.email, "is-valid"));
    assert_eq!(
        page.doc.attribute(&page.email, "aria-describedby").as_deref(),
        Some("error-for-email")
    );
    assert_eq!(page.doc.style(page.label, "color"), Some("#dc3545"));
    assert_eq!(page.doc.focused(), Some(page.email));

    // placed right after the field
    let children = page.doc.children(page.form);
    let index = children.iter().position(|n| *n == page.email).unwrap();
    assert_eq!(children[index + 1], message);
}

#[test]
fn test_submit_invalid_email_syntax() {
    let mut page = signup_page(ValidationOptions::default());
    page.doc.set_value(page.email, "not-an-email");

    assert!(page.submit());
    let message = page.message().unwrap();
    assert_eq!(page.doc.text(message), "Please enter a valid email address");
}

#[test]
fn test_submit_email_without_dotted_domain() {
    let mut page = signup_page(ValidationOptions::default());
    page.doc.set_value(page.email, "user@localhost");

    page.submit();
    let message = page.message().unwrap();
    assert_eq!(
        page.doc.text(message),
        "Domain portion of the email address is invalid (the portion after the @ symbol)"
    );
}

#[test]
fn test_valid_submit_still_prevents_navigation() {
    let mut page = signup_page(ValidationOptions::default());
    page.doc.set_value(page.email, "user@example.com");

    assert!(page.submit());
    assert_eq!(page.message(), None);
    assert_eq!(page.doc.focused(), None);
}

#[test]
fn test_resubmission_reuses_message_element() {
    let mut page = signup_page(ValidationOptions::default());

    page.submit();
    page.doc.set_value(page.email, "nope");
    page.submit();

    let messages = page.doc.query_selector_all("#error-for-email").unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(page.doc.text(messages[0]), "Please enter a valid email address");
}

#[test]
fn test_input_fixes_and_clears_error() {
    let mut page = signup_page(ValidationOptions::default());

    page.type_into(page.email, "bad");
    let message = page.message().unwrap();
    assert_eq!(page.doc.text(message), "Please enter a valid email address");

    page.type_into(page.email, "good@example.com");
    assert_eq!(page.doc.text(message), "");
    assert_eq!(page.doc.style(message, "display"), Some("none"));
    assert_eq!(page.doc.style(message, "visibility"), Some("hidden"));
    assert!(page.doc.has_class(page.email, "is-valid"));
    assert!(!page.doc.has_class(page.email, "is-invalid"));
    assert_eq!(page.doc.attribute(&page.email, "aria-describedby"), None);
    assert_eq!(page.doc.style(page.label, "color"), None);
}

#[test]
fn test_blur_on_empty_required_field() {
    let mut page = signup_page(ValidationOptions::default());
    let email = page.email;

    page.bus.dispatch(&mut page.doc, EventKind::Blur, email);
    assert_eq!(page.doc.text(page.message().unwrap()), "Email is required.");
}

#[test]
fn test_blur_outside_forms_is_ignored() {
    let mut page = signup_page(ValidationOptions::default());
    let body = page.doc.body();
    let loose = page.doc.append(body, "input", &[("id", "search"), ("required", "")]);

    page.bus.dispatch(&mut page.doc, EventKind::Blur, loose);
    assert!(!page.doc.has_class(loose, "is-invalid"));
    assert!(!page.doc.has_class(loose, "is-valid"));
    assert_eq!(page.doc.by_id("error-for-search"), None);
}

#[test]
fn test_was_validated_path() {
    let options = ValidationOptions {
        was_validated: true,
        ..ValidationOptions::default()
    };
    let mut page = signup_page(options);
    assert_eq!(page.bus.len(), 4);

    let form = page.form;
    let event = page.bus.dispatch(&mut page.doc, EventKind::Submit, form);
    assert!(event.default_prevented);
    assert!(event.propagation_stopped);
    assert!(page.doc.has_class(form, "was-validated"));
}

#[test]
fn test_plain_class_scheme() {
    let mut page = signup_page(ValidationOptions::plain());

    page.submit();
    let message = page.message().unwrap();
    assert!(page.doc.has_class(message, "error-message"));
    assert!(page.doc.has_class(page.email, "error"));

    page.type_into(page.email, "user@example.com");
    assert!(page.doc.has_class(page.email, "success"));
    assert!(!page.doc.has_class(page.email, "error"));
}

#[test]
fn test_tabbing_away_validates_the_field_left_behind() {
    let mut page = signup_page(ValidationOptions::default());
    let email = page.email;
    let other = page.doc.append(page.form, "input", &[("id", "nickname")]);

    page.bus.focus(&mut page.doc, email).unwrap();
    assert_eq!(page.message(), None);

    page.bus.focus(&mut page.doc, other).unwrap();
    assert_eq!(page.doc.text(page.message().unwrap()), "Email is required.");
    assert_eq!(page.doc.focused(), Some(other));
}
