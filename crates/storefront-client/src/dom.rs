//! Thin helpers over web-sys

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, NodeList};

/// Something that can run `querySelectorAll`
pub trait QueryScope {
    fn select_all(&self, selector: &str) -> Result<NodeList, JsValue>;
}

impl QueryScope for Document {
    fn select_all(&self, selector: &str) -> Result<NodeList, JsValue> {
        self.query_selector_all(selector)
    }
}

impl QueryScope for Element {
    fn select_all(&self, selector: &str) -> Result<NodeList, JsValue> {
        self.query_selector_all(selector)
    }
}

/// All elements matching `selector`, in document order
pub fn query_all<S: QueryScope>(scope: &S, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = scope.select_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Descendants matching `selector` whose nearest `owner` ancestor is `root`
///
/// Leaves out matches that belong to a nested `owner` inside `root`.
pub fn query_owned(root: &Element, selector: &str, owner: &str) -> Result<Vec<Element>, JsValue> {
    let mut owned = Vec::new();
    for element in query_all(root, selector)? {
        let nearest = match element.parent_element() {
            Some(parent) => parent.closest(owner)?,
            None => None,
        };
        if nearest.as_ref() == Some(root) {
            owned.push(element);
        }
    }
    Ok(owned)
}

/// First descendant matching `selector`, or an error naming it
pub fn require(root: &Element, selector: &str) -> Result<Element, JsValue> {
    root.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing '{}' inside <{}>", selector, root.tag_name().to_lowercase())))
}

pub fn owner_document(element: &Element) -> Result<Document, JsValue> {
    element
        .owner_document()
        .ok_or_else(|| JsValue::from_str("element is not attached to a document"))
}

pub fn set_style(element: &Element, property: &str, value: &str) -> Result<(), JsValue> {
    let element = element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| JsValue::from_str("element has no inline style"))?;
    element.style().set_property(property, value)
}

/// Run `handler` on every click of `element` for the lifetime of the page
pub fn on_click<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler());
    element.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
