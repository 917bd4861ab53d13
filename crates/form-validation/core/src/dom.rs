//! Host document capability
//!
//! The controller never touches a global document. Everything it needs from
//! the host (element lookup, attribute and class mutation, native validity
//! flags, focus) goes through [`Document`].

use std::fmt;
use thiserror::Error;

/// Failures reported by a host document
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("node {0} has no parent")]
    Detached(String),

    #[error("host error: {0}")]
    Host(String),
}

/// Native constraint-validation flags of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityState {
    pub valid: bool,
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_short: bool,
    pub too_long: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl Default for ValidityState {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidityState {
    pub fn valid() -> Self {
        Self {
            valid: true,
            value_missing: false,
            type_mismatch: false,
            pattern_mismatch: false,
            too_short: false,
            too_long: false,
            bad_input: false,
            custom_error: false,
        }
    }

    /// Recompute `valid` from the individual flags
    pub fn settle(mut self) -> Self {
        self.valid = !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_short
            || self.too_long
            || self.bad_input
            || self.custom_error);
        self
    }
}

/// Everything the controller needs from a host document
pub trait Document {
    /// Element handle; cheap to clone and comparable by identity
    type Node: Clone + PartialEq + fmt::Debug;

    /// All elements matching `selector`, in document order (a static snapshot)
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Node>, DomError>;

    /// First descendant of `scope` matching `selector`
    fn query_selector_within(
        &self,
        scope: &Self::Node,
        selector: &str,
    ) -> Result<Option<Self::Node>, DomError>;

    /// Elements whose `name` attribute equals `name`, in document order
    fn elements_by_name(&self, name: &str) -> Vec<Self::Node>;

    /// Form-associated controls of `form`, in tree order
    fn form_elements(&self, form: &Self::Node) -> Vec<Self::Node>;

    /// The form owner of a control
    fn form_of(&self, node: &Self::Node) -> Option<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn previous_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Lowercase tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), DomError>;

    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn remove_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    /// Current value of a control (empty for non-controls)
    fn value(&self, node: &Self::Node) -> String;

    fn is_disabled(&self, node: &Self::Node) -> bool;

    fn validity(&self, node: &Self::Node) -> ValidityState;

    /// Native whole-form validity check
    fn check_validity(&self, form: &Self::Node) -> bool;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    /// Insert `node` right after `reference` under the same parent
    fn insert_after(&mut self, reference: &Self::Node, node: &Self::Node) -> Result<(), DomError>;

    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<(), DomError>;

    /// Set an inline style property; an empty value removes it
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;

    fn focus(&mut self, node: &Self::Node) -> Result<(), DomError>;
}
