//! Native-like constraint validation for the in-memory document

use regex::Regex;

use crate::dom::{Document, ValidityState};

use super::document::{MemoryDocument, NodeId};

fn is_email_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_email_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// The browser's `type=email` check: dotted domain not required
pub fn is_simple_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local.chars().all(is_email_local_char)
        && domain.split('.').all(is_email_domain_label)
}

/// `scheme:rest` with a well-formed scheme and no whitespace
pub fn is_url_like(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };
    let mut scheme_chars = scheme.chars();
    let starts_alpha = scheme_chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    starts_alpha
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
        && !rest.is_empty()
        && !value.chars().any(char::is_whitespace)
}

fn parse_attr_usize(doc: &MemoryDocument, node: NodeId, name: &str) -> Option<usize> {
    doc.attribute(&node, name)?.trim().parse().ok()
}

fn apply_length_limits(doc: &MemoryDocument, node: NodeId, value: &str, validity: &mut ValidityState) {
    let len = value.chars().count();
    if let Some(min) = parse_attr_usize(doc, node, "minlength") {
        validity.too_short = len < min;
    }
    if let Some(max) = parse_attr_usize(doc, node, "maxlength") {
        validity.too_long = len > max;
    }
}

fn is_radio(doc: &MemoryDocument, node: NodeId) -> bool {
    doc.attribute(&node, "type")
        .map(|kind| kind.eq_ignore_ascii_case("radio"))
        .unwrap_or(false)
}

/// Radios sharing the name and form owner of `node`, `node` included
fn radio_group(doc: &MemoryDocument, node: NodeId) -> Vec<NodeId> {
    let Some(name) = doc.attribute(&node, "name").filter(|name| !name.is_empty()) else {
        return vec![node];
    };
    let form = doc.form_of(&node);
    doc.elements_by_name(&name)
        .into_iter()
        .filter(|member| is_radio(doc, *member) && doc.form_of(member) == form)
        .collect()
}

/// A group is missing its value when any member is required and none is checked
fn radio_group_missing(doc: &MemoryDocument, node: NodeId) -> bool {
    let group = radio_group(doc, node);
    let required = group.iter().any(|member| doc.has_attribute(member, "required"));
    required && !group.iter().any(|member| doc.is_checked(*member))
}

pub(crate) fn compute(doc: &MemoryDocument, node: NodeId) -> ValidityState {
    let mut validity = ValidityState::valid();

    let Some(element) = doc.element(node) else {
        return validity;
    };
    if doc.is_disabled(&node) {
        return validity;
    }

    validity.custom_error = !element.custom_validity_message.is_empty();
    let required = element.attr("required").is_some();
    let readonly = element.attr("readonly").is_some();
    let value = element.value.as_str();

    match element.tag_name.as_str() {
        "textarea" => {
            validity.value_missing = required && !readonly && value.is_empty();
            if !value.is_empty() {
                apply_length_limits(doc, node, value, &mut validity);
            }
        }
        "select" => {
            validity.value_missing = required && value.is_empty();
        }
        "input" => {
            let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
            if matches!(kind.as_str(), "button" | "submit" | "reset" | "hidden" | "image") {
                return ValidityState::valid();
            }

            validity.value_missing = match kind.as_str() {
                "radio" => radio_group_missing(doc, node),
                "checkbox" => required && !element.checked,
                _ => required && !readonly && value.is_empty(),
            };

            if !value.is_empty() {
                match kind.as_str() {
                    "email" => validity.type_mismatch = !is_simple_email(value),
                    "url" => validity.type_mismatch = !is_url_like(value),
                    "number" => validity.bad_input = value.trim().parse::<f64>().is_err(),
                    _ => {}
                }

                if matches!(
                    kind.as_str(),
                    "text" | "search" | "url" | "tel" | "email" | "password"
                ) {
                    apply_length_limits(doc, node, value, &mut validity);

                    if let Some(pattern) = element.attr("pattern").filter(|p| !p.is_empty()) {
                        // an uncompilable pattern is ignored, as browsers do
                        if let Ok(regex) = Regex::new(&format!("^(?:{})$", pattern)) {
                            validity.pattern_mismatch = !regex.is_match(value);
                        }
                    }
                }
            }
        }
        _ => {}
    }

    validity.settle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::EMAIL_PATTERN_ATTRIBUTE;

    #[test]
    fn test_simple_email() {
        assert!(is_simple_email("user@localhost"));
        assert!(is_simple_email("user@example.com"));
        assert!(!is_simple_email("not-an-email"));
        assert!(!is_simple_email("user@"));
        assert!(!is_simple_email("user@-bad.com"));
        assert!(!is_simple_email("a b@example.com"));
    }

    #[test]
    fn test_url_like() {
        assert!(is_url_like("https://example.com"));
        assert!(is_url_like("mailto:someone@example.com"));
        assert!(!is_url_like("example.com"));
        assert!(!is_url_like("http://exa mple.com"));
        assert!(!is_url_like("1http://example.com"));
    }

    #[test]
    fn test_required_text() {
        let mut doc = MemoryDocument::new();
        let input = doc.append(doc.body(), "input", &[("required", "")]);
        assert!(doc.validity(&input).value_missing);

        doc.set_value(input, "hello");
        assert!(doc.validity(&input).valid);
    }

    #[test]
    fn test_email_mismatches() {
        let mut doc = MemoryDocument::new();
        let input = doc.append(doc.body(), "input", &[("type", "email")]);

        doc.set_value(input, "not-an-email");
        let validity = doc.validity(&input);
        assert!(validity.type_mismatch);
        assert!(!validity.valid);

        doc.set_value(input, "user@localhost");
        assert!(doc.validity(&input).valid);

        doc.set_attribute(&input, "pattern", EMAIL_PATTERN_ATTRIBUTE).unwrap();
        let validity = doc.validity(&input);
        assert!(!validity.type_mismatch);
        assert!(validity.pattern_mismatch);
    }

    #[test]
    fn test_length_and_number() {
        let mut doc = MemoryDocument::new();
        let short = doc.append(doc.body(), "input", &[("minlength", "3"), ("value", "ab")]);
        assert!(doc.validity(&short).too_short);

        let long = doc.append(doc.body(), "textarea", &[("maxlength", "2"), ("value", "abc")]);
        assert!(doc.validity(&long).too_long);

        let number = doc.append(doc.body(), "input", &[("type", "number"), ("value", "abc")]);
        assert!(doc.validity(&number).bad_input);
    }

    #[test]
    fn test_radio_group_required() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.body(), "form", &[]);
        let yes = doc.append(form, "input", &[("type", "radio"), ("name", "rsvp"), ("required", "")]);
        let no = doc.append(form, "input", &[("type", "radio"), ("name", "rsvp")]);

        assert!(doc.validity(&yes).value_missing);
        assert!(doc.validity(&no).value_missing);
        doc.set_checked(no, true);
        assert!(doc.validity(&yes).valid);
        assert!(doc.validity(&no).valid);
    }

    #[test]
    fn test_radio_group_is_scoped_by_form() {
        let mut doc = MemoryDocument::new();
        let first = doc.append(doc.body(), "form", &[]);
        let second = doc.append(doc.body(), "form", &[]);
        doc.append(first, "input", &[("type", "RADIO"), ("name", "plan"), ("required", "")]);
        let other = doc.append(second, "input", &[("type", "radio"), ("name", "plan")]);
        let sibling = doc.append(first, "input", &[("type", "Radio"), ("name", "plan")]);

        assert!(doc.validity(&sibling).value_missing);
        assert!(doc.validity(&other).valid);
    }

    #[test]
    fn test_exempt_and_disabled_are_valid() {
        let mut doc = MemoryDocument::new();
        let submit = doc.append(doc.body(), "input", &[("type", "submit"), ("required", "")]);
        let disabled = doc.append(doc.body(), "input", &[("required", ""), ("disabled", "")]);
        assert!(doc.validity(&submit).valid);
        assert!(doc.validity(&disabled).valid);
    }

    #[test]
    fn test_custom_validity() {
        let mut doc = MemoryDocument::new();
        let input = doc.append(doc.body(), "input", &[("value", "x")]);
        doc.set_custom_validity(input, "taken");
        let validity = doc.validity(&input);
        assert!(validity.custom_error);
        assert!(!validity.valid);
    }
}
