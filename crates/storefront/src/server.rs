//! Dev server: transformed index, reload stream, static files

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::Preview;
use storefront_core::config::consts::dev::RELOAD_ENDPOINT;
use storefront_watch::ReloadSignal;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub preview: Arc<Preview>,
    pub reload: broadcast::Sender<ReloadSignal>,
}

impl AppState {
    pub fn new(preview: Preview) -> Self {
        let (reload, _) = broadcast::channel(16);
        Self {
            preview: Arc::new(preview),
            reload,
        }
    }
}

/// Script that reloads the page when the server says so
pub fn reload_client() -> String {
    format!(
        r#"<script>new EventSource("{}").addEventListener("reload", (e) => {{ if (JSON.parse(e.data).type === "full-reload") location.reload(); }});</script>"#,
        RELOAD_ENDPOINT
    )
}

/// Place the reload client before the last `</body>`, or at the end
pub fn with_reload_client(html: &str) -> String {
    let client = reload_client();
    match html.rfind("</body>") {
        Some(at) => format!("{}{}{}", &html[..at], client, &html[at..]),
        None => format!("{}{}", html, client),
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.preview.site().root);

    Router::new()
        .route("/", get(serve_index))
        .route("/index.html", get(serve_index))
        .route(RELOAD_ENDPOINT, get(reload_events))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /`: base document, rendered on every request
async fn serve_index(State(state): State<AppState>) -> Response {
    let preview = Arc::clone(&state.preview);
    let built = tokio::task::spawn_blocking(move || preview.build_index()).await;

    match built {
        Ok(Ok(html)) => Html(with_reload_client(&html)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("index task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /__storefront/reload`: one `reload` event per signal
async fn reload_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.reload.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(signal) => {
            let json = serde_json::to_string(&signal).unwrap_or_default();
            Some(Ok(Event::default().event("reload").data(json)))
        }
        Err(_) => None, // Lagged: skip missed signals
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
