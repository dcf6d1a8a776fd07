//! Server assembly: API routes, CORS layer, static fallback, and listener.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, Uri, header};
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

/// Builds the application router.
///
/// API routes come first; every unmatched path falls through to the static
/// responder. The CORS layer wraps both, so cross-origin headers appear on
/// every response and pre-flight `OPTIONS` requests short-circuit before
/// routing.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    api::routes()
        .fallback(static_fallback)
        .layer(cors)
        .with_state(state)
}

/// Fallback handler delegating unmatched paths to the static responder.
async fn static_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    state.statics.respond(&uri).await
}

/// Starts the server on the given address and returns the bound address
/// and a join handle.
///
/// Binding to port 0 picks an OS-assigned port, which is how the test
/// suites boot isolated instances.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    state: AppState,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}
