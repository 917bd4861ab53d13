//! Selector subset: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! descendant combinator and `,` groups.

use crate::dom::DomError;

use super::document::{MemoryDocument, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

/// Compounds joined by descendant combinators
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ComplexSelector {
    compounds: Vec<Compound>,
}

fn invalid(selector: &str, reason: impl Into<String>) -> DomError {
    DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: reason.into(),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Split on `sep` outside brackets and quotes
fn split_top_level(input: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_sep(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

pub(crate) fn parse(selector: &str) -> Result<Vec<ComplexSelector>, DomError> {
    let mut out = Vec::new();

    for group in split_top_level(selector, |c| c == ',') {
        let compounds = split_top_level(group.trim(), char::is_whitespace)
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(|part| parse_compound(selector, part))
            .collect::<Result<Vec<_>, _>>()?;

        if compounds.is_empty() {
            return Err(invalid(selector, "empty selector"));
        }
        out.push(ComplexSelector { compounds });
    }

    Ok(out)
}

fn read_ident(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut ident = String::new();
    while let Some((_, c)) = chars.peek() {
        if !is_ident_char(*c) {
            break;
        }
        ident.push(*c);
        chars.next();
    }
    ident
}

fn parse_compound(selector: &str, part: &str) -> Result<Compound, DomError> {
    let mut compound = Compound::default();
    let mut chars = part.char_indices().peekable();
    let mut first = true;

    while let Some(&(i, c)) = chars.peek() {
        match c {
            '*' if first => {
                chars.next();
            }
            '#' | '.' => {
                chars.next();
                let ident = read_ident(&mut chars);
                if ident.is_empty() {
                    return Err(invalid(selector, format!("expected name after '{}'", c)));
                }
                if c == '#' {
                    compound.id = Some(ident);
                } else {
                    compound.classes.push(ident);
                }
            }
            '[' => {
                let end = part[i..]
                    .find(']')
                    .map(|offset| i + offset)
                    .ok_or_else(|| invalid(selector, "unclosed attribute selector"))?;
                compound.attrs.push(parse_attr(selector, &part[i + 1..end])?);
                while chars.peek().map(|(j, _)| *j <= end).unwrap_or(false) {
                    chars.next();
                }
            }
            c if first && is_ident_char(c) => {
                compound.tag = Some(read_ident(&mut chars).to_ascii_lowercase());
            }
            other => {
                return Err(invalid(selector, format!("unsupported token '{}'", other)));
            }
        }
        first = false;
    }

    Ok(compound)
}

fn parse_attr(selector: &str, body: &str) -> Result<AttrMatcher, DomError> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };

    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(invalid(selector, format!("bad attribute name '{}'", name)));
    }

    Ok(AttrMatcher {
        name: name.to_ascii_lowercase(),
        value,
    })
}

// HTML attributes whose values match case-insensitively in selectors
const CASE_INSENSITIVE_ATTRS: &[&str] = &["type", "method", "enctype", "dir", "lang", "autocomplete"];

impl AttrMatcher {
    fn accepts(&self, actual: &str, expected: &str) -> bool {
        if CASE_INSENSITIVE_ATTRS.contains(&self.name.as_str()) {
            actual.eq_ignore_ascii_case(expected)
        } else {
            actual == expected
        }
    }
}

impl Compound {
    fn matches(&self, doc: &MemoryDocument, node: NodeId) -> bool {
        let Some(element) = doc.element(node) else {
            return false;
        };

        if let Some(tag) = &self.tag {
            if element.tag_name != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|matcher| match (element.attr(&matcher.name), &matcher.value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => matcher.accepts(actual, expected),
            (None, _) => false,
        })
    }
}

impl ComplexSelector {
    /// Match `node`, with ancestor compounds searched up to (not past) `scope`
    pub(crate) fn matches(&self, doc: &MemoryDocument, node: NodeId, scope: NodeId) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(doc, node) {
            return false;
        }

        let mut ancestors = doc.ancestors(node).take_while(|ancestor| *ancestor != scope);
        rest.iter()
            .rev()
            .all(|compound| ancestors.any(|ancestor| compound.matches(doc, ancestor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound_parts() {
        let parsed = parse("form#signup.needs-validation[data-validate=\"validate\"]").unwrap();
        assert_eq!(parsed.len(), 1);
        let compound = &parsed[0].compounds[0];
        assert_eq!(compound.tag.as_deref(), Some("form"));
        assert_eq!(compound.id.as_deref(), Some("signup"));
        assert_eq!(compound.classes, vec!["needs-validation".to_string()]);
        assert_eq!(compound.attrs[0].value.as_deref(), Some("validate"));
    }

    #[test]
    fn test_parse_groups_and_descendants() {
        let parsed = parse("form .field, input[type=email]").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].compounds.len(), 2);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(parse("").is_err());
        assert!(parse("input[type=email").is_err());
        assert!(parse("form > input").is_err());
        assert!(parse("#").is_err());
    }

    #[test]
    fn test_matching() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.body(), "form", &[("class", "js-validate")]);
        let wrapper = doc.append(form, "div", &[("class", "field")]);
        let input = doc.append(wrapper, "input", &[("type", "email")]);
        let outside = doc.append(doc.body(), "input", &[("type", "email")]);

        let parsed = parse("form.js-validate input").unwrap();
        let descendant = &parsed[0];
        assert!(descendant.matches(&doc, input, doc.root()));
        assert!(!descendant.matches(&doc, outside, doc.root()));
        // ancestors at or above the scope do not count
        assert!(!descendant.matches(&doc, input, form));

        let parsed = parse("input[type='email']").unwrap();
        let by_attr = &parsed[0];
        assert!(by_attr.matches(&doc, outside, doc.root()));
    }

    #[test]
    fn test_type_value_is_case_insensitive() {
        let mut doc = MemoryDocument::new();
        let shouting = doc.append(doc.body(), "input", &[("type", "EMAIL"), ("class", "Big")]);

        let parsed = parse("input[type=email]").unwrap();
        assert!(parsed[0].matches(&doc, shouting, doc.root()));

        let parsed = parse("input[class=big]").unwrap();
        assert!(!parsed[0].matches(&doc, shouting, doc.root()));
    }
}
