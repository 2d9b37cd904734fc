//! Quantity stepper controls

use crate::dom::{self, on_click, QueryScope};
use crate::quantity::Quantity;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::Element;

pub const SELECTOR: &str = "[data-quantity-selector]";
pub const DECREMENT: &str = "[data-quantity-decrement]";
pub const INCREMENT: &str = "[data-quantity-increment]";
pub const VALUE: &str = "[data-quantity-value]";

/// Wire up every quantity selector under `scope`
///
/// Each selector gets its own counter. A selector missing one of its parts
/// is logged and skipped.
pub fn init_all<S: QueryScope>(scope: &S) -> Result<usize, JsValue> {
    let mut count = 0;
    for element in dom::query_all(scope, SELECTOR)? {
        match attach(&element) {
            Ok(()) => count += 1,
            Err(err) => tracing::error!("quantity selector setup failed: {:?}", err),
        }
    }
    Ok(count)
}

fn attach(root: &Element) -> Result<(), JsValue> {
    let decrement = dom::require(root, DECREMENT)?;
    let increment = dom::require(root, INCREMENT)?;
    let display = dom::require(root, VALUE)?;

    // The display text is only rewritten by a click that changes the value
    let initial = Quantity::parse(&display.text_content().unwrap_or_default());
    let counter = Rc::new(Cell::new(initial));

    let (state, target) = (Rc::clone(&counter), display.clone());
    on_click(&decrement, move || {
        let mut quantity = state.get();
        if quantity.decrement() {
            state.set(quantity);
            show(&target, quantity);
        }
    })?;

    let (state, target) = (counter, display);
    on_click(&increment, move || {
        let mut quantity = state.get();
        if quantity.increment() {
            state.set(quantity);
            show(&target, quantity);
        }
    })?;

    Ok(())
}

fn show(display: &Element, quantity: Quantity) {
    display.set_text_content(Some(&quantity.value().to_string()));
}
