//! `Document` implementation over the browser DOM

use form_validation_core::field::is_control_tag;
use form_validation_core::{Document, DomError, ValidityState};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, NodeList,
};

pub(crate) fn host_error(err: JsValue) -> DomError {
    DomError::Host(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn selector_error(selector: &str, err: JsValue) -> DomError {
    DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

fn elements_of(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn native_validity(element: &Element) -> Option<web_sys::ValidityState> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.validity());
    }
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return Some(select.validity());
    }
    if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        return Some(textarea.validity());
    }
    element.dyn_ref::<HtmlButtonElement>().map(|button| button.validity())
}

/// Browser document handle; cheap to clone
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn html_element<'a>(&self, node: &'a Element) -> Result<&'a HtmlElement, DomError> {
        node.dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Host(format!("<{}> is not an HTML element", node.tag_name())))
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(|err| selector_error(selector, err))?;
        Ok(elements_of(&list))
    }

    fn query_selector_within(&self, scope: &Element, selector: &str) -> Result<Option<Element>, DomError> {
        scope
            .query_selector(selector)
            .map_err(|err| selector_error(selector, err))
    }

    fn elements_by_name(&self, name: &str) -> Vec<Element> {
        elements_of(&self.document.get_elements_by_name(name))
    }

    fn form_elements(&self, form: &Element) -> Vec<Element> {
        let Some(form) = form.dyn_ref::<HtmlFormElement>() else {
            return Vec::new();
        };
        // `elements` also lists fieldset, output and object
        let controls = form.elements();
        (0..controls.length())
            .filter_map(|i| controls.item(i))
            .filter(|control| is_control_tag(&self.tag_name(control)))
            .collect()
    }

    fn form_of(&self, node: &Element) -> Option<Element> {
        let form = if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.form()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.form()
        } else if let Some(textarea) = node.dyn_ref::<HtmlTextAreaElement>() {
            textarea.form()
        } else if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.form()
        } else {
            None
        };
        form.map(|form| form.unchecked_into::<Element>())
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn previous_element_sibling(&self, node: &Element) -> Option<Element> {
        node.previous_element_sibling()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value).map_err(host_error)
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) -> Result<(), DomError> {
        node.remove_attribute(name).map_err(host_error)
    }

    fn add_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list().add_1(class).map_err(host_error)
    }

    fn remove_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list().remove_1(class).map_err(host_error)
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(textarea) = node.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else {
            String::new()
        }
    }

    fn is_disabled(&self, node: &Element) -> bool {
        node.matches(":disabled").unwrap_or(false)
    }

    fn validity(&self, node: &Element) -> ValidityState {
        match native_validity(node) {
            Some(state) => ValidityState {
                valid: state.valid(),
                value_missing: state.value_missing(),
                type_mismatch: state.type_mismatch(),
                pattern_mismatch: state.pattern_mismatch(),
                too_short: state.too_short(),
                too_long: state.too_long(),
                bad_input: state.bad_input(),
                custom_error: state.custom_error(),
            },
            None => ValidityState::valid(),
        }
    }

    fn check_validity(&self, form: &Element) -> bool {
        form.dyn_ref::<HtmlFormElement>()
            .map(|form| form.check_validity())
            .unwrap_or(true)
    }

    fn create_element(&mut self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(host_error)
    }

    fn insert_after(&mut self, reference: &Element, node: &Element) -> Result<(), DomError> {
        let parent = reference
            .parent_node()
            .ok_or_else(|| DomError::Detached(format!("<{}>", reference.tag_name())))?;
        parent
            .insert_before(node, reference.next_sibling().as_ref())
            .map(|_| ())
            .map_err(host_error)
    }

    fn set_text_content(&mut self, node: &Element, text: &str) -> Result<(), DomError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let style = self.html_element(node)?.style();
        if value.is_empty() {
            style.remove_property(property).map(|_| ()).map_err(host_error)
        } else {
            style.set_property(property, value).map_err(host_error)
        }
    }

    fn focus(&mut self, node: &Element) -> Result<(), DomError> {
        self.html_element(node)?.focus().map_err(host_error)
    }
}
