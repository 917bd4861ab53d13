//! Feedback element registry
//!
//! One message element per (form, field key). Elements are created lazily on
//! the first error, reused afterwards and never removed, only hidden.

use crate::config::FALLBACK_FEEDBACK_CLASS;
use crate::dom::{Document, DomError};

/// Id of the message element for a field key
pub fn message_id(key: &str) -> String {
    format!("error-for-{}", key)
}

#[derive(Debug, Clone)]
struct MessageEntry<N> {
    form: Option<N>,
    key: String,
    node: N,
}

/// Owned mapping from field key to its message element
#[derive(Debug, Clone)]
pub struct MessageRegistry<N> {
    entries: Vec<MessageEntry<N>>,
}

impl<N> Default for MessageRegistry<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> MessageRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered element for `key` within `form`
    pub fn get(&self, form: Option<&N>, key: &str) -> Option<N> {
        self.entries
            .iter()
            .find(|entry| entry.key == key && entry.form.as_ref() == form)
            .map(|entry| entry.node.clone())
    }

    /// Registered element, else a pre-rendered `div#error-for-<key>` inside
    /// the form carrying the feedback class (or the fallback class)
    pub fn find<D>(&mut self, doc: &D, form: Option<&N>, key: &str, feedback_class: &str) -> Option<N>
    where
        D: Document<Node = N>,
    {
        if let Some(node) = self.get(form, key) {
            return Some(node);
        }

        let scope = form?;
        let id = message_id(key);
        let adopted = [feedback_class, FALLBACK_FEEDBACK_CLASS]
            .iter()
            .find_map(|class| {
                let selector = format!("div.{}#{}", class, id);
                match doc.query_selector_within(scope, &selector) {
                    Ok(found) => found,
                    Err(err) => {
                        tracing::debug!("Skipping feedback lookup for '{}': {}", key, err);
                        None
                    }
                }
            })?;

        tracing::debug!("Adopted existing feedback element #{}", id);
        self.register(form.cloned(), key, adopted.clone());
        Some(adopted)
    }

    /// Create a feedback element after `anchor` and register it
    pub fn create<D>(
        &mut self,
        doc: &mut D,
        form: Option<&N>,
        key: &str,
        feedback_class: &str,
        anchor: &N,
    ) -> Result<N, DomError>
    where
        D: Document<Node = N>,
    {
        let node = doc.create_element("div")?;
        doc.set_attribute(&node, "class", feedback_class)?;
        doc.set_attribute(&node, "id", &message_id(key))?;
        doc.insert_after(anchor, &node)?;

        tracing::debug!("Created feedback element #{}", message_id(key));
        self.register(form.cloned(), key, node.clone());
        Ok(node)
    }

    fn register(&mut self, form: Option<N>, key: &str, node: N) {
        self.entries.push(MessageEntry {
            form,
            key: key.to_string(),
            node,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id() {
        assert_eq!(message_id("email"), "error-for-email");
    }

    #[test]
    fn test_registry_is_scoped_by_form() {
        let mut registry: MessageRegistry<u32> = MessageRegistry::new();
        registry.register(Some(1), "email", 10);
        registry.register(Some(2), "email", 20);

        assert_eq!(registry.get(Some(&1), "email"), Some(10));
        assert_eq!(registry.get(Some(&2), "email"), Some(20));
        assert_eq!(registry.get(Some(&3), "email"), None);
        assert_eq!(registry.get(None, "email"), None);
        assert_eq!(registry.len(), 2);
    }
}
