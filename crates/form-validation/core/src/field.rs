// File: src/field.rs
// Purpose: Field classification and label resolution

use crate::dom::Document;

/// Control kind, derived from the element's `type` attribute (or tag)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Url,
    Number,
    Radio,
    Checkbox,
    Submit,
    Button,
    File,
    Reset,
    Select,
    TextArea,
    Other(String),
}

impl FieldKind {
    /// Parse a `type` attribute value (case-insensitive, missing means text)
    pub fn from_type(kind: Option<&str>) -> Self {
        let kind = kind.unwrap_or("text").trim().to_ascii_lowercase();
        match kind.as_str() {
            "" | "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "url" => FieldKind::Url,
            "number" => FieldKind::Number,
            "radio" => FieldKind::Radio,
            "checkbox" => FieldKind::Checkbox,
            "submit" => FieldKind::Submit,
            "button" => FieldKind::Button,
            "file" => FieldKind::File,
            "reset" => FieldKind::Reset,
            _ => FieldKind::Other(kind),
        }
    }

    /// Resolve the kind of a host element
    pub fn of<D: Document>(doc: &D, node: &D::Node) -> Self {
        match doc.tag_name(node).as_str() {
            "select" => FieldKind::Select,
            "textarea" => FieldKind::TextArea,
            // <button> defaults to submit
            "button" => match doc.attribute(node, "type") {
                Some(kind) => FieldKind::from_type(Some(&kind)),
                None => FieldKind::Submit,
            },
            _ => FieldKind::from_type(doc.attribute(node, "type").as_deref()),
        }
    }

    /// Kinds the evaluator never looks at
    pub fn is_exempt(&self) -> bool {
        matches!(
            self,
            FieldKind::Submit | FieldKind::Button | FieldKind::File | FieldKind::Reset
        )
    }

    /// Checkables get their message after the wrapping label instead of the field
    pub fn is_checkable(&self) -> bool {
        matches!(self, FieldKind::Radio | FieldKind::Checkbox)
    }
}

/// Whether an element is a form control the controller can annotate
pub fn is_control_tag(tag: &str) -> bool {
    matches!(tag, "input" | "select" | "textarea" | "button")
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Human label for messages: capitalized id, else placeholder, else name
pub fn resolve_label(id: Option<&str>, placeholder: Option<&str>, name: Option<&str>) -> String {
    if let Some(id) = non_empty(id) {
        return capitalize(id);
    }
    if let Some(placeholder) = non_empty(placeholder) {
        return placeholder.to_string();
    }
    name.unwrap_or_default().to_string()
}

/// Key used for message ids: the id, else the name
pub fn field_key(id: Option<&str>, name: Option<&str>) -> Option<String> {
    non_empty(id).or(non_empty(name)).map(str::to_string)
}
