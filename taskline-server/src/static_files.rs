//! Static front-end serving for any path the API router does not match.
//!
//! `/` resolves to the configured default document; every other path joins
//! onto the served root. Resolved paths are canonicalized and must stay
//! inside the root, so `..` segments cannot escape it. Content types are
//! inferred from the file extension, with HTML as the catch-all.

use std::path::{Path, PathBuf};

use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};

/// Static file responder rooted at a single served directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    default_document: String,
}

impl StaticFiles {
    /// Creates a responder serving files under `root`, with `/` mapping to
    /// `default_document`.
    pub fn new(root: impl Into<PathBuf>, default_document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_document: default_document.into(),
        }
    }

    /// Serves the file the request path names, confined to the root.
    ///
    /// A path that does not resolve to a file inside the root answers 404
    /// with an HTML body; a file that exists but cannot be read answers
    /// 500 with a plain-text body.
    pub async fn respond(&self, uri: &Uri) -> Response {
        let path = uri.path();
        let rel = if path == "/" {
            self.default_document.as_str()
        } else {
            path.trim_start_matches('/')
        };

        let Some(full) = self.resolve(rel).await else {
            return not_found();
        };

        match tokio::fs::read(&full).await {
            Ok(bytes) => {
                ([(header::CONTENT_TYPE, content_type_for(&full))], bytes).into_response()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => not_found(),
            Err(e) => {
                tracing::warn!(path = %full.display(), error = %e, "static read failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }

    /// Joins `rel` onto the root and canonicalizes both sides; a path that
    /// resolves outside the root (or does not exist) yields `None`.
    async fn resolve(&self, rel: &str) -> Option<PathBuf> {
        let root = tokio::fs::canonicalize(&self.root).await.ok()?;
        let full = tokio::fs::canonicalize(self.root.join(rel)).await.ok()?;
        full.starts_with(&root).then_some(full)
    }
}

/// Content type by file extension; anything unrecognized serves as HTML.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        _ => "text/html",
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response()
}
