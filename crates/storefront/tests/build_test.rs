//! Integration tests for `storefront build` command

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::process::Command;
use storefront_testkit::fixture_site;

fn storefront() -> Command {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_build_writes_single_file_page() {
    let site = fixture_site();

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built"));

    let html = site.read("dist/index.html");
    assert!(html.contains("<title>Summer Sale</title>"));
    assert!(html.contains("<h3>Straw Hat</h3>"));
    assert!(html.contains("<style>.product { display: grid; }"));
    assert!(html.contains(r#"<script type="module">console.log("storefront");"#));
    assert!(!html.contains(r#"<div id="liquid-content"></div>"#));
}

#[test]
fn test_build_empties_output_directory() {
    let site = fixture_site();
    site.write("dist/stale.js", "old");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success();

    assert!(!site.path("dist/stale.js").exists());
    assert!(site.path("dist/index.html").exists());
}

#[test]
fn test_build_keeps_output_when_emptying_disabled() {
    let site = fixture_site();
    site.write("storefront.toml", "[build]\nempty_out_dir = false\n")
        .write("dist/keep.txt", "keep");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success();

    assert!(site.path("dist/keep.txt").exists());
}

#[test]
fn test_build_out_dir_override() {
    let site = fixture_site();

    storefront()
        .current_dir(site.root())
        .args(["build", "--out-dir", "public"])
        .assert()
        .success();

    assert!(site.path("public/index.html").exists());
    assert!(!site.path("dist").exists());
}

#[test]
fn test_build_without_inlining_keeps_links() {
    let site = fixture_site();
    site.write("storefront.toml", "[build]\ninline_assets = false\n");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success();

    let html = site.read("dist/index.html");
    assert!(html.contains(r#"<link rel="stylesheet" href="src/styles.css" />"#));
}

#[test]
fn test_build_succeeds_with_render_error() {
    let site = fixture_site();
    site.write("src/sections/template.liquid", "{% if %}");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Render failed"));

    let html = site.read("dist/index.html");
    assert!(html.contains("<pre>Error: TEMPLATE_RENDER_ERROR"));
    assert!(html.contains("<title>Shopify Developer Test</title>"));
}

#[test]
fn test_build_reports_missing_assets() {
    let site = fixture_site();
    site.remove("src/styles.css");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/styles.css"));

    let html = site.read("dist/index.html");
    assert!(html.contains(r#"href="src/styles.css""#));
}

#[test]
fn test_build_fails_without_base_document() {
    let site = fixture_site();
    site.remove("index.html");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read base document"));
}

#[test]
fn test_build_refuses_to_empty_site_root() {
    let site = fixture_site();

    storefront()
        .current_dir(site.root())
        .args(["build", "--out-dir", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to empty"));

    assert!(site.path("index.html").exists());
}

#[test]
fn test_build_inlines_client_module_and_wasm() {
    let site = fixture_site();
    site.write(
        "index.html",
        r#"<html><head><title>Shopify Developer Test</title></head><body>
<div id="liquid-content"></div>
<script type="module">
  import init from "./pkg/storefront_client.js";
  init();
</script>
</body></html>"#,
    )
    .write(
        "pkg/storefront_client.js",
        "export default async function init() {\n  const url = new URL('storefront_client_bg.wasm', import.meta.url);\n  return fetch(url);\n}\n",
    )
    .write("pkg/storefront_client_bg.wasm", "\0asm");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Asset not found").not());

    let html = site.read("dist/index.html");
    assert!(!html.contains("./pkg/"));
    assert!(!html.contains("storefront_client.js"));
    assert!(html.contains(r#"import init from "data:text/javascript;base64,"#));
    assert!(!site.path("dist/pkg").exists());
}

#[test]
fn test_build_reports_output_write_error() {
    let site = fixture_site();
    site.write("storefront.toml", "[build]\nempty_out_dir = false\n")
        .write("dist", "a file where the output directory should be");

    storefront()
        .current_dir(site.root())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT_WRITE_ERROR"));
}
