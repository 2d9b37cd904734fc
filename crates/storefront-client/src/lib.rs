//! Storefront client - carousel and quantity stepper handlers
//!
//! Runs once the document is parsed and enhances the rendered markup.

pub mod carousel;
pub mod dom;
pub mod quantity;
pub mod stepper;

pub use carousel::Carousel;
pub use quantity::Quantity;

use wasm_bindgen::JsValue;
use web_sys::Document;

/// Attach all handlers to `document`
pub fn init(document: &Document) -> Result<(), JsValue> {
    let carousels = carousel::init_all(document)?;
    let steppers = stepper::init_all(document)?;
    tracing::debug!("initialised {} carousel(s), {} quantity selector(s)", carousels, steppers);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        return init(&document);
    }

    let target = document.clone();
    let on_ready = Closure::once(move || {
        if let Err(err) = init(&target) {
            tracing::error!("storefront client failed to start: {:?}", err);
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}
