//! Dev command - serve the site and reload pages on template/data changes

use crate::context::Context;
use crate::server::{AppState, router};
use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use storefront_core::config::consts::dev::RELOAD_ENDPOINT;
use storefront_watch::{WatchSpec, subscribe};

/// Run the dev server until interrupted
///
/// # Arguments
///
/// * `port` - Port override (default: server.port)
/// * `host` - Bind address override (default: server.host)
/// * `verbose` - Enable verbose output if true
pub fn run(port: Option<u16>, host: Option<String>, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;
    let server = &ctx.site.config().server;
    let host = host.unwrap_or_else(|| server.host.clone());
    let port = port.unwrap_or(server.port);
    if port == 0 {
        return Err(anyhow!("Port must be between 1 and 65535"));
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(ctx, host, port))
}

async fn serve(ctx: Context, host: String, port: u16) -> Result<()> {
    let state = AppState::new(ctx.preview());
    let watch = &ctx.site.config().watch;
    let spec = WatchSpec::new(watch.patterns.clone(), watch.reload_suffixes.clone());

    // Watcher callbacks run on the notify thread
    let reload = state.reload.clone();
    let subscription = subscribe(&ctx.site.root, &spec, move |signal| {
        // No receivers just means no page is open
        let _ = reload.send(signal);
    })?;

    if ctx.verbose {
        for dir in subscription.watched() {
            println!("{} Watching {}", "→".cyan(), dir.display());
        }
    }

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", host, port))?;

    println!(
        "{} Serving {} at http://{}:{}/",
        "✓".green().bold(),
        ctx.site.root.display(),
        host,
        port
    );
    if ctx.verbose {
        println!("{} Reload events at {}", "→".cyan(), RELOAD_ENDPOINT);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(subscription);
    println!("{} Dev server stopped", "✓".green().bold());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
