//! Paginated carousel

use crate::dom::{self, on_click, QueryScope};
use wasm_bindgen::JsValue;
use web_sys::Element;

use std::cell::Cell;
use std::rc::Rc;

pub const CAROUSEL: &str = ".swiper";
pub const WRAPPER: &str = ".swiper-wrapper";
pub const SLIDE: &str = ".swiper-slide";
pub const PAGINATION: &str = ".swiper-pagination";

const BULLET_CLASS: &str = "swiper-pagination-bullet";
const BULLET_ACTIVE_CLASS: &str = "swiper-pagination-bullet-active";
const SLIDE_ACTIVE_CLASS: &str = "swiper-slide-active";

/// Which slide of how many is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    active: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, active: 0 }
    }

    pub fn len(self) -> usize {
        self.len
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    pub fn active(self) -> usize {
        self.active
    }

    /// Show slide `index`; `false` if it is out of range or already showing
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    /// CSS transform placing slide `active` in view
    pub fn transform(self) -> String {
        format!("translate3d({}%, 0px, 0px)", -(self.active as i64) * 100)
    }
}

/// Attach a carousel to every `.swiper` under `scope`
///
/// Returns how many were set up. A carousel with broken markup is logged
/// and skipped.
pub fn init_all<S: QueryScope>(scope: &S) -> Result<usize, JsValue> {
    let mut count = 0;
    for element in dom::query_all(scope, CAROUSEL)? {
        match attach(&element) {
            Ok(()) => count += 1,
            Err(err) => tracing::error!("carousel setup failed: {:?}", err),
        }
    }
    Ok(count)
}

/// Wire one carousel; nested carousels keep their own slides and pagination
fn attach(root: &Element) -> Result<(), JsValue> {
    let wrapper = dom::query_owned(root, WRAPPER, CAROUSEL)?
        .into_iter()
        .next()
        .ok_or_else(|| JsValue::from_str(&format!("missing '{}' inside <{}>", WRAPPER, root.tag_name().to_lowercase())))?;
    let slides = dom::query_owned(root, SLIDE, CAROUSEL)?;
    let state = Rc::new(Cell::new(Carousel::new(slides.len())));

    dom::set_style(&wrapper, "transition-duration", "300ms")?;
    render(&wrapper, &slides, &[], state.get())?;

    let Some(pagination) = dom::query_owned(root, PAGINATION, CAROUSEL)?.into_iter().next() else {
        return Ok(());
    };
    let document = dom::owner_document(root)?;
    pagination.class_list().add_2("swiper-pagination-clickable", "swiper-pagination-bullets")?;

    let mut bullets = Vec::with_capacity(slides.len());
    for index in 0..slides.len() {
        let bullet = document.create_element("span")?;
        bullet.set_class_name(BULLET_CLASS);
        bullet.set_attribute("role", "button")?;
        bullet.set_attribute("tabindex", "0")?;
        bullet.set_attribute("aria-label", &format!("Go to slide {}", index + 1))?;
        pagination.append_child(&bullet)?;
        bullets.push(bullet);
    }
    render(&wrapper, &slides, &bullets, state.get())?;

    let bullets = Rc::new(bullets);
    let slides = Rc::new(slides);
    for (index, bullet) in bullets.iter().enumerate() {
        let state = Rc::clone(&state);
        let wrapper = wrapper.clone();
        let slides = Rc::clone(&slides);
        let all_bullets = Rc::clone(&bullets);
        on_click(bullet, move || {
            let mut carousel = state.get();
            if carousel.go_to(index) {
                state.set(carousel);
                if let Err(err) = render(&wrapper, &slides, &all_bullets, carousel) {
                    tracing::error!("carousel update failed: {:?}", err);
                }
            }
        })?;
    }
    Ok(())
}

fn render(
    wrapper: &Element,
    slides: &[Element],
    bullets: &[Element],
    carousel: Carousel,
) -> Result<(), JsValue> {
    dom::set_style(wrapper, "transform", &carousel.transform())?;
    for (index, slide) in slides.iter().enumerate() {
        slide
            .class_list()
            .toggle_with_force(SLIDE_ACTIVE_CLASS, index == carousel.active())?;
    }
    for (index, bullet) in bullets.iter().enumerate() {
        let active = index == carousel.active();
        bullet.class_list().toggle_with_force(BULLET_ACTIVE_CLASS, active)?;
        if active {
            bullet.set_attribute("aria-current", "true")?;
        } else {
            bullet.remove_attribute("aria-current")?;
        }
    }
    Ok(())
}
