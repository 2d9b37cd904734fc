//! Render command - print the rendered section template

use crate::context::Context;
use crate::output::{print_json, print_raw};
use anyhow::Result;
use colored::Colorize;

/// Render the template against the context data
///
/// # Arguments
///
/// * `json` - Print `{title, fragment}` as JSON instead of the bare fragment
/// * `verbose` - Enable verbose output if true
pub fn run(json: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;

    if verbose {
        eprintln!(
            "{} Rendering {} with {}",
            "→".cyan(),
            ctx.site.template_path().display(),
            ctx.site.data_path().display()
        );
    }

    let page = ctx.preview().render_page()?;

    if json {
        print_json(&serde_json::to_string_pretty(&page)?)?;
    } else {
        print_raw(&page.fragment)?;
    }

    if verbose {
        eprintln!("{} Rendered '{}'", "✓".green().bold(), page.title);
    }

    Ok(())
}
