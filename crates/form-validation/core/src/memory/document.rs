use crate::dom::{Document, DomError, ValidityState};
use crate::field::is_control_tag;

use super::selector::{self, ComplexSelector};
use super::validity;

/// Handle of an element in a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) style: Vec<(String, String)>,
    pub(crate) text: String,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) custom_validity_message: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            custom_validity_message: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

/// Element arena rooted at a document node with a `<body>`
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Element>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Element::new("#document")],
            root: NodeId(0),
            body: NodeId(0),
            focused: None,
        };
        let body = doc.push(Element::new("body"));
        doc.attach_child(doc.root, body);
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a new element under `parent`
    ///
    /// `value` and `checked` attributes also seed the control state.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut element = Element::new(tag);
        for (name, value) in attrs {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                "value" => element.value = value.to_string(),
                "checked" => element.checked = true,
                _ => {}
            }
            element.set_attr(&name, value);
        }
        let id = self.push(element);
        self.attach_child(parent, id);
        id
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element.checked = checked;
        }
    }

    /// Equivalent of `setCustomValidity`; an empty message clears it
    pub fn set_custom_validity(&mut self, node: NodeId, message: &str) {
        if let Some(element) = self.nodes.get_mut(node.0) {
            element.custom_validity_message = message.to_string();
        }
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.element(*node).and_then(|e| e.attr("id")) == Some(id))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text(&self, node: NodeId) -> &str {
        self.element(node)
            .map(|element| element.text.as_str())
            .unwrap_or_default()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|element| element.has_class(class))
            .unwrap_or(false)
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).map(|element| element.checked).unwrap_or(false)
    }

    /// Element that last received focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub(crate) fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| DomError::UnknownNode(format!("{:?}", node)))
    }

    fn push(&mut self, element: Element) -> NodeId {
        self.nodes.push(element);
        NodeId(self.nodes.len() - 1)
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    /// Descendants of `scope` in tree order, `scope` excluded
    pub(crate) fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub(crate) fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.element(node).and_then(|e| e.parent), move |current| {
            self.element(*current).and_then(|e| e.parent)
        })
    }

    fn select(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let selectors: Vec<ComplexSelector> = selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|node| selectors.iter().any(|s| s.matches(self, *node, scope)))
            .collect())
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.select(self.root, selector)
    }

    fn query_selector_within(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.select(*scope, selector)?.into_iter().next())
    }

    fn elements_by_name(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|node| self.element(*node).and_then(|e| e.attr("name")) == Some(name))
            .collect()
    }

    fn form_elements(&self, form: &NodeId) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|node| {
                self.element(*node)
                    .map(|e| is_control_tag(&e.tag_name))
                    .unwrap_or(false)
                    && self.form_of(node) == Some(*form)
            })
            .collect()
    }

    fn form_of(&self, node: &NodeId) -> Option<NodeId> {
        let element = self.element(*node)?;
        if !is_control_tag(&element.tag_name) {
            return None;
        }
        if let Some(owner) = element.attr("form") {
            return self
                .by_id(owner)
                .filter(|form| self.tag_name(form) == "form");
        }
        self.ancestors(*node).find(|ancestor| self.tag_name(ancestor) == "form")
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.element(*node)?.parent.filter(|parent| *parent != self.root)
    }

    fn previous_element_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.element(*node)?.parent?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|sibling| sibling == node)?;
        index.checked_sub(1).map(|prev| siblings[prev])
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.element(*node)
            .map(|element| element.tag_name.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(*node)?.attr(name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(*node)?.set_attr(&name.to_ascii_lowercase(), value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(*node)?.remove_attr(&name.to_ascii_lowercase());
        Ok(())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        let element = self.element_mut(*node)?;
        if element.has_class(class) {
            return Ok(());
        }
        let classes = match element.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        element.set_attr("class", &classes);
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        let element = self.element_mut(*node)?;
        let Some(existing) = element.attr("class") else {
            return Ok(());
        };
        let classes = existing
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        element.set_attr("class", &classes);
        Ok(())
    }

    fn value(&self, node: &NodeId) -> String {
        self.element(*node)
            .map(|element| element.value.clone())
            .unwrap_or_default()
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        let Some(element) = self.element(*node) else {
            return false;
        };
        element.attr("disabled").is_some()
            || self.ancestors(*node).any(|ancestor| {
                self.element(ancestor)
                    .map(|e| e.tag_name == "fieldset" && e.attr("disabled").is_some())
                    .unwrap_or(false)
            })
    }

    fn validity(&self, node: &NodeId) -> ValidityState {
        validity::compute(self, *node)
    }

    fn check_validity(&self, form: &NodeId) -> bool {
        self.form_elements(form)
            .iter()
            .all(|field| self.validity(field).valid)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.push(Element::new(tag)))
    }

    fn insert_after(&mut self, reference: &NodeId, node: &NodeId) -> Result<(), DomError> {
        self.element_mut(*node)?;
        let parent = self
            .element_mut(*reference)?
            .parent
            .ok_or_else(|| DomError::Detached(format!("{:?}", reference)))?;

        self.detach(*node);
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|sibling| sibling == reference)
            .map(|index| index + 1)
            .unwrap_or(siblings.len());
        siblings.insert(index, *node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        self.element_mut(*node)?.text = text.to_string();
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(*node)?;
        element.style.retain(|(key, _)| key != property);
        if !value.is_empty() {
            element.style.push((property.to_string(), value.to_string()));
        }
        Ok(())
    }

    // Records focus only; `EventBus::focus` also fires the blur
    fn focus(&mut self, node: &NodeId) -> Result<(), DomError> {
        self.element_mut(*node)?;
        self.focused = Some(*node);
        Ok(())
    }
}
