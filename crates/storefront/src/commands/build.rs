//! Build command - render the page into a single-file dist/index.html

use crate::context::Context;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use storefront_core::{Injection, inject, inline_assets, write_page};

/// Build the site
///
/// Render failures end up in the page and do not fail the build.
///
/// # Arguments
///
/// * `out_dir` - Output directory override, relative to the site root
/// * `verbose` - Enable verbose output if true
pub fn run(out_dir: Option<PathBuf>, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;
    let started = Instant::now();
    let site = &ctx.site;
    let build = site.config().build;

    let out_dir = match out_dir {
        Some(dir) => site.root.join(dir),
        None => site.out_dir(),
    };

    // Step 1: Render and inject
    if verbose {
        println!(
            "{} Rendering {}",
            "→".cyan(),
            site.template_path().display()
        );
    }

    let index_path = site.index_path();
    let html = fs::read_to_string(&index_path)
        .with_context(|| format!("Failed to read base document '{}'", index_path.display()))?;

    let injection = ctx.preview().injection();
    match &injection {
        Injection::Rendered { title, .. } => {
            if verbose {
                println!("{} Rendered '{}'", "✓".green().bold(), title);
            }
        }
        Injection::Failed { message } => {
            println!("{} Render failed: {}", "✗".red().bold(), message);
        }
    }
    let mut html = inject(&html, &injection);

    // Step 2: Inline local assets
    if build.inline_assets {
        let bundle = inline_assets(&html, &site.root);
        if verbose {
            for path in &bundle.inlined {
                println!("{} Inlined {}", "→".cyan(), path.display());
            }
        }
        for reference in &bundle.missing {
            println!("{} Asset not found, left linked: {}", "✗".yellow(), reference);
        }
        html = bundle.html;
    }

    // Step 3: Prepare output directory
    if build.empty_out_dir {
        empty_dir(&out_dir, &site.root, verbose)?;
    }

    // Step 4: Write the page
    let output_path = write_page(&out_dir, &html)?;

    println!(
        "{} Built {} in {:.2}s",
        "✓".green().bold(),
        output_path.display(),
        started.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Remove everything in `dir`, refusing to touch the site root or its ancestors
fn empty_dir(dir: &Path, root: &Path, verbose: bool) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let canonical_dir = dir.canonicalize()?;
    let canonical_root = root.canonicalize()?;
    if canonical_root.starts_with(&canonical_dir) {
        bail!(
            "Refusing to empty '{}': it contains the site root",
            dir.display()
        );
    }
    if !canonical_dir.starts_with(&canonical_root) {
        println!(
            "{} '{}' is outside the site root, not emptying it",
            "✗".yellow(),
            dir.display()
        );
        return Ok(());
    }

    if verbose {
        println!("{} Emptying {}", "→".cyan(), dir.display());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
