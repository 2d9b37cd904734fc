//! Renders the demo site shipped in the repository

use storefront_core::{Preview, Site};
use storefront_testkit::manifest_path;

fn demo() -> Preview {
    Preview::new(Site::open(&manifest_path("../../site")).unwrap())
}

#[test]
fn test_demo_site_renders() {
    let page = demo().render_page().unwrap();

    assert_eq!(page.title, "Summer Sale");
    assert!(page.fragment.contains(r#"<h1 class="collection__title">Summer Sale</h1>"#));
    assert!(page.fragment.contains("<s>£30.00</s>"));
    assert!(page.fragment.contains("Save £5.00"));
    assert!(page.fragment.contains("<strong>£12.50</strong>"));
    assert!(page.fragment.contains("COASTLINE"));
}

#[test]
fn test_demo_site_carousel_markup() {
    let page = demo().render_page().unwrap();

    assert_eq!(page.fragment.matches(r#"class="swiper""#).count(), 2);
    assert_eq!(page.fragment.matches(r#"class="swiper-slide""#).count(), 4);
    assert!(page.fragment.contains(
        r#"<img src="/images/hat-side.jpg" alt="Straw Hat" class="product-card__image" width="600" height="600" loading="lazy">"#
    ));
}

#[test]
fn test_demo_site_steppers_only_for_available_products() {
    let page = demo().render_page().unwrap();

    assert_eq!(page.fragment.matches("data-quantity-selector").count(), 2);
    assert_eq!(page.fragment.matches("Sold out").count(), 1);
}
