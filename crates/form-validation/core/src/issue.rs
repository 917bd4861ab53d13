//! Field evaluation: native validity flags in, human-readable issue out

use std::fmt;

use crate::dom::{Document, ValidityState};
use crate::email::is_valid_email;
use crate::field::{resolve_label, FieldKind};

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Required value is empty; carries the resolved label
    Required(String),
    InvalidEmail,
    InvalidUrl,
    /// Email failed the installed domain pattern
    InvalidEmailDomain,
    PatternMismatch,
    TooShort,
    TooLong,
    NotANumber,
    /// Any other failure; carries the field id (or name)
    Invalid(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Required(label) => write!(f, "{} is required.", label),
            ValidationIssue::InvalidEmail => f.write_str("Please enter a valid email address"),
            ValidationIssue::InvalidUrl => f.write_str("Please enter a URL"),
            ValidationIssue::InvalidEmailDomain => f.write_str(
                "Domain portion of the email address is invalid (the portion after the @ symbol)",
            ),
            ValidationIssue::PatternMismatch => f.write_str("Please match required pattern"),
            ValidationIssue::TooShort => f.write_str("Please, value is too short."),
            ValidationIssue::TooLong => f.write_str("Please, value is too long."),
            ValidationIssue::NotANumber => f.write_str("Please enter a number."),
            ValidationIssue::Invalid(field) => write!(f, "Value entered for {} is invalid", field),
        }
    }
}

/// Everything the evaluator reads from a field, detached from the host
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot {
    pub kind: FieldKind,
    pub disabled: bool,
    pub validity: ValidityState,
    pub id: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    pub value: String,
    pub has_pattern: bool,
}

impl FieldSnapshot {
    pub fn capture<D: Document>(doc: &D, node: &D::Node) -> Self {
        Self {
            kind: FieldKind::of(doc, node),
            disabled: doc.is_disabled(node),
            validity: doc.validity(node),
            id: doc.attribute(node, "id"),
            name: doc.attribute(node, "name"),
            placeholder: doc.attribute(node, "placeholder"),
            value: doc.value(node),
            has_pattern: doc.has_attribute(node, "pattern"),
        }
    }

    fn label(&self) -> String {
        resolve_label(
            self.id.as_deref(),
            self.placeholder.as_deref(),
            self.name.as_deref(),
        )
    }

    fn id_or_name(&self) -> String {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.name.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// Map a field's validity flags to the first matching issue
///
/// Flags are checked in priority order and only one issue is reported.
/// A type mismatch that is not settled by the email/url checks continues
/// into the pattern-mismatch branch; outside email fields that branch
/// reports the generic invalid message.
pub fn evaluate(field: &FieldSnapshot) -> Option<ValidationIssue> {
    if field.kind.is_exempt() || field.disabled {
        return None;
    }

    let validity = &field.validity;

    if validity.valid {
        return None;
    }

    if validity.value_missing {
        return Some(ValidationIssue::Required(field.label()));
    }

    if validity.type_mismatch {
        match field.kind {
            FieldKind::Email if !is_valid_email(&field.value) => {
                return Some(ValidationIssue::InvalidEmail);
            }
            FieldKind::Url => return Some(ValidationIssue::InvalidUrl),
            _ => {}
        }
    }

    if validity.type_mismatch || validity.pattern_mismatch {
        if field.kind == FieldKind::Email {
            return Some(if field.has_pattern {
                ValidationIssue::InvalidEmailDomain
            } else {
                ValidationIssue::PatternMismatch
            });
        }
        return Some(ValidationIssue::Invalid(field.id_or_name()));
    }

    if validity.too_short {
        return Some(ValidationIssue::TooShort);
    }

    if validity.too_long {
        return Some(ValidationIssue::TooLong);
    }

    if validity.bad_input {
        return Some(ValidationIssue::NotANumber);
    }

    Some(ValidationIssue::Invalid(field.id_or_name()))
}
