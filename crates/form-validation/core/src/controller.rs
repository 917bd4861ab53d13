//! FormValidation controller
//!
//! Binds to the forms matched by a selector, turns off the native validation
//! UI and reacts to document-level events:
//!
//! - `submit` (bubbling): validate every control of the submitted form,
//!   render every failure and focus the first failing field
//! - `blur` / `input` (capturing): validate the event target and show or
//!   clear its message immediately
//!
//! Messages live in a `div#error-for-<key>` next to the field, linked through
//! `aria-describedby`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{OptInPolicy, ValidationOptions};
use crate::dom::{Document, DomError};
use crate::email::EMAIL_PATTERN_ATTRIBUTE;
use crate::events::{DomEvent, EventKind, EventSource, Phase};
use crate::feedback::{message_id, MessageRegistry};
use crate::field::{field_key, is_control_tag, FieldKind};
use crate::issue::{evaluate, FieldSnapshot, ValidationIssue};

/// Attribute a consuming form (or control) sets to opt in
pub const OPT_IN_ATTRIBUTE: &str = "data-validate";
pub const OPT_IN_VALUE: &str = "validate";

/// Class added by the native submit path
pub const WAS_VALIDATED_CLASS: &str = "was-validated";

const ARIA_DESCRIBED_BY: &str = "aria-describedby";

/// A failing field found while validating a whole form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError<N> {
    pub field: N,
    pub issue: ValidationIssue,
}

/// The validation controller
pub struct FormValidation<D: Document> {
    options: ValidationOptions,
    forms: Vec<D::Node>,
    messages: RefCell<MessageRegistry<D::Node>>,
}

impl<D: Document + 'static> FormValidation<D> {
    /// Bind to the forms matching `selector` and register the document listeners
    pub fn attach<E>(
        doc: &mut D,
        events: &mut E,
        selector: &str,
        options: ValidationOptions,
    ) -> Result<Rc<Self>, DomError>
    where
        E: EventSource<D>,
    {
        let validation = Rc::new(Self::bind(doc, selector, options)?);
        validation.listen(events);
        Ok(validation)
    }

    fn listen<E: EventSource<D>>(self: &Rc<Self>, events: &mut E) {
        let this = Rc::clone(self);
        events.on(
            EventKind::Submit,
            Phase::Bubble,
            Box::new(move |doc: &mut D, event: &mut DomEvent<D::Node>| {
                if let Err(err) = this.handle_submit(doc, event) {
                    tracing::warn!("Submit validation failed: {}", err);
                }
            }),
        );

        for kind in [EventKind::Blur, EventKind::Input] {
            let this = Rc::clone(self);
            events.on(
                kind,
                Phase::Capture,
                Box::new(move |doc: &mut D, event: &mut DomEvent<D::Node>| {
                    if let Err(err) = this.handle_interaction(doc, event) {
                        tracing::warn!("{} validation failed: {}", event.kind.as_str(), err);
                    }
                }),
            );
        }

        if self.options.was_validated {
            let this = Rc::clone(self);
            events.on(
                EventKind::Submit,
                Phase::Bubble,
                Box::new(move |doc: &mut D, event: &mut DomEvent<D::Node>| {
                    if let Err(err) = this.on_submit_form(doc, event) {
                        tracing::warn!("Native submit check failed: {}", err);
                    }
                }),
            );
        }
    }
}

impl<D: Document> FormValidation<D> {
    /// Resolve the forms, mark them `novalidate` and install the email pattern
    ///
    /// No listeners are registered; the host drives the `handle_*` methods.
    pub fn bind(doc: &mut D, selector: &str, options: ValidationOptions) -> Result<Self, DomError> {
        let forms = doc.query_selector_all(selector)?;

        for form in &forms {
            doc.set_attribute(form, "novalidate", "true")?;
        }

        if options.install_email_pattern {
            install_email_pattern(doc)?;
        }

        tracing::debug!("Bound validation to {} form(s) matching '{}'", forms.len(), selector);

        Ok(Self {
            options,
            forms,
            messages: RefCell::new(MessageRegistry::new()),
        })
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Forms matched at bind time
    pub fn forms(&self) -> &[D::Node] {
        &self.forms
    }

    /// Registered feedback element for a field key within a form
    pub fn feedback_for(&self, form: Option<&D::Node>, key: &str) -> Option<D::Node> {
        self.messages.borrow().get(form, key)
    }

    /// Evaluate one field against its native validity flags
    pub fn has_error(&self, doc: &D, field: &D::Node) -> Option<ValidationIssue> {
        evaluate(&FieldSnapshot::capture(doc, field))
    }

    /// Render `error` for `field`
    ///
    /// Radio fields flag every same-named member of their form and put the
    /// message on the last one. A field without id or name gets its classes
    /// toggled but no message.
    pub fn show_error(&self, doc: &mut D, field: &D::Node, error: &str) -> Result<(), DomError> {
        let label = doc.previous_element_sibling(field);
        let valid_class = self.options.valid_class();
        let invalid_class = self.options.invalid_class();

        doc.remove_class(field, valid_class)?;
        doc.add_class(field, invalid_class)?;

        let mut target = field.clone();
        if let Some(group) = radio_group(doc, field) {
            for member in &group {
                doc.add_class(member, invalid_class)?;
            }
            if let Some(last) = group.last() {
                target = last.clone();
            }
        }

        let Some(key) = field_key(
            doc.attribute(&target, "id").as_deref(),
            doc.attribute(&target, "name").as_deref(),
        ) else {
            tracing::warn!("Cannot show error for a field without id or name: {:?}", target);
            return Ok(());
        };

        let form = doc.form_of(&target);
        let feedback_class = self.options.feedback_class();

        let existing = self
            .messages
            .borrow_mut()
            .find(&*doc, form.as_ref(), &key, feedback_class);
        let message = match existing {
            Some(message) => message,
            None => {
                let anchor = message_anchor(doc, &target, form.as_ref());
                self.messages.borrow_mut().create(
                    doc,
                    form.as_ref(),
                    &key,
                    feedback_class,
                    &anchor,
                )?
            }
        };

        doc.set_attribute(&target, ARIA_DESCRIBED_BY, &message_id(&key))?;
        doc.set_text_content(&message, error)?;
        doc.set_style(&message, "display", "block")?;
        doc.set_style(&message, "visibility", "visible")?;

        if let Some(label) = label {
            doc.set_style(&label, "color", &self.options.error_color)?;
        }

        Ok(())
    }

    /// Undo [`show_error`](Self::show_error) for `field`
    ///
    /// Does nothing beyond the class swap if no message was ever rendered.
    pub fn clear_error(&self, doc: &mut D, field: &D::Node) -> Result<(), DomError> {
        let label = doc.previous_element_sibling(field);
        let valid_class = self.options.valid_class();
        let invalid_class = self.options.invalid_class();

        doc.remove_class(field, invalid_class)?;
        doc.add_class(field, valid_class)?;
        doc.remove_attribute(field, ARIA_DESCRIBED_BY)?;

        let mut target = field.clone();
        if let Some(group) = radio_group(doc, field) {
            for member in &group {
                doc.remove_class(member, invalid_class)?;
            }
            if let Some(last) = group.last() {
                target = last.clone();
            }
        }

        let Some(key) = field_key(
            doc.attribute(&target, "id").as_deref(),
            doc.attribute(&target, "name").as_deref(),
        ) else {
            return Ok(());
        };

        let form = doc.form_of(&target);
        let existing = self.messages.borrow_mut().find(
            &*doc,
            form.as_ref(),
            &key,
            self.options.feedback_class(),
        );
        let Some(message) = existing else {
            return Ok(());
        };

        if target != *field {
            doc.remove_attribute(&target, ARIA_DESCRIBED_BY)?;
        }
        doc.set_text_content(&message, "")?;
        doc.set_style(&message, "display", "none")?;
        doc.set_style(&message, "visibility", "hidden")?;

        if let Some(label) = label {
            doc.set_style(&label, "color", "")?;
        }

        Ok(())
    }

    /// Validate every control of `form`, rendering each failure
    ///
    /// Returns the failing fields in form order.
    pub fn validate_form(&self, doc: &mut D, form: &D::Node) -> Result<Vec<FieldError<D::Node>>, DomError> {
        let mut errors = Vec::new();

        for field in doc.form_elements(form) {
            if let Some(issue) = self.has_error(doc, &field) {
                self.show_error(doc, &field, &issue.to_string())?;
                errors.push(FieldError { field, issue });
            }
        }

        Ok(errors)
    }

    /// Document-level submit handler
    ///
    /// Always prevents the default submission, then validates the submitted
    /// form and focuses the first failing field.
    pub fn handle_submit(&self, doc: &mut D, event: &mut DomEvent<D::Node>) -> Result<(), DomError> {
        event.prevent_default();

        let form = event.target.clone();
        if doc.tag_name(&form) != "form" || !self.opts_in(doc, &form) {
            return Ok(());
        }

        let errors = self.validate_form(doc, &form)?;
        tracing::debug!("Submit validation found {} invalid field(s)", errors.len());

        if let Some(first) = errors.first() {
            doc.focus(&first.field)?;
        }

        Ok(())
    }

    /// Blur/input handler: validate the target and show or clear its message
    pub fn handle_interaction(&self, doc: &mut D, event: &mut DomEvent<D::Node>) -> Result<(), DomError> {
        let field = event.target.clone();

        if !is_control_tag(&doc.tag_name(&field)) || doc.form_of(&field).is_none() {
            return Ok(());
        }
        if FieldKind::of(doc, &field).is_exempt() || !self.opts_in(doc, &field) {
            return Ok(());
        }

        match self.has_error(doc, &field) {
            Some(issue) => self.show_error(doc, &field, &issue.to_string()),
            None => self.clear_error(doc, &field),
        }
    }

    /// Native submit path for hosts styling through a `was-validated` class
    ///
    /// Only bound forms are handled. Submission is blocked when the native
    /// check fails; the class is added either way.
    pub fn on_submit_form(&self, doc: &mut D, event: &mut DomEvent<D::Node>) -> Result<(), DomError> {
        let Some(form) = self.forms.iter().find(|form| **form == event.target) else {
            return Ok(());
        };

        if !doc.check_validity(form) {
            event.prevent_default();
            event.stop_propagation();
        }

        doc.add_class(form, WAS_VALIDATED_CLASS)
    }

    fn opts_in(&self, doc: &D, node: &D::Node) -> bool {
        if self.options.opt_in == OptInPolicy::Always {
            return true;
        }

        let marked = |node: &D::Node| doc.attribute(node, OPT_IN_ATTRIBUTE).as_deref() == Some(OPT_IN_VALUE);

        if marked(node) {
            return true;
        }

        if doc.tag_name(node) == "form" {
            return doc.form_elements(node).iter().any(marked);
        }

        doc.form_of(node).map(|form| marked(&form)).unwrap_or(false)
    }
}

/// Put the email `pattern` attribute on every email input in the document
pub fn install_email_pattern<D: Document>(doc: &mut D) -> Result<Vec<D::Node>, DomError> {
    let fields = doc.query_selector_all("input[type=email]")?;
    for field in &fields {
        doc.set_attribute(field, "pattern", EMAIL_PATTERN_ATTRIBUTE)?;
    }
    Ok(fields)
}

/// Same-named members of a radio's form, or `None` for other fields
fn radio_group<D: Document>(doc: &D, field: &D::Node) -> Option<Vec<D::Node>> {
    if FieldKind::of(doc, field) != FieldKind::Radio {
        return None;
    }
    let name = doc.attribute(field, "name").filter(|name| !name.is_empty())?;
    let form = doc.form_of(field);

    let group: Vec<_> = doc
        .elements_by_name(&name)
        .into_iter()
        .filter(|member| doc.form_of(member) == form)
        .collect();

    if group.is_empty() {
        None
    } else {
        Some(group)
    }
}

/// Where a new message goes: after the label wrapper of a checkable, else after the field
fn message_anchor<D: Document>(doc: &D, field: &D::Node, form: Option<&D::Node>) -> D::Node {
    if FieldKind::of(doc, field).is_checkable() {
        if let Some(wrapper) = doc.parent(field) {
            let is_form = form.map(|form| *form == wrapper).unwrap_or(false);
            if !is_form && doc.parent(&wrapper).is_some() {
                return wrapper;
            }
        }
    }
    field.clone()
}
