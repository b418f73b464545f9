//! Local HTTP file server exposing the working directory to the crawler.
//!
//! `/` answers with `index.html` when the directory has one, otherwise with a
//! generated listing of anchors (one per directory entry) that the crawler
//! uses as its listing page. Everything else is served from disk.

use crate::utils::error::{Result, ScrapeError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub struct StaticServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StaticServer {
    /// Binds an ephemeral port on 127.0.0.1 and starts serving `root`.
    pub async fn start(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ScrapeError::InvalidConfigValueError {
                field: "crawl.working_dir".to_string(),
                value: root.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = Router::new()
            .route("/", get(index))
            .fallback_service(ServeDir::new(&root))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::new(root.clone()));

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = rx.await;
            });
            if let Err(e) = server.await {
                tracing::error!("❌ File server stopped: {}", e);
            }
        });

        tracing::info!("🗂️ Serving {} at http://{}", root.display(), addr);

        Ok(Self {
            addr,
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        tracing::debug!("File server at {} closed", self.addr);
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn index(State(root): State<Arc<PathBuf>>) -> Response {
    if let Ok(body) = tokio::fs::read_to_string(root.join("index.html")).await {
        return Html(body).into_response();
    }

    match directory_listing(&root).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("❌ Cannot list {}: {}", root.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn directory_listing(root: &Path) -> std::io::Result<String> {
    let mut entries = tokio::fs::read_dir(root).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let mut body = String::from("<!doctype html>\n<pre>\n");
    for name in &names {
        let escaped = escape_html(name);
        body.push_str(&format!("<a href=\"{}\">{}</a>\n", escaped, escaped));
    }
    body.push_str("</pre>\n");
    Ok(body)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
