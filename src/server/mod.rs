//! Preview server with live reload
//!
//! Serves the public directory. With watching enabled, the site is rebuilt on
//! changes and connected pages are told to reload over a websocket.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Blog;

const RELOAD_PATH: &str = "/__livereload";

/// Live reload client injected before `</body>`
const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(function () {
  var ws = new WebSocket((location.protocol === "https:" ? "wss://" : "ws://") + location.host + "/__livereload");
  ws.onmessage = function (msg) { if (msg.data === "reload") location.reload(); };
  ws.onclose = function () { setTimeout(function () { location.reload(); }, 1000); };
})();
</script>
"#;

struct ServerState {
    public_dir: PathBuf,
    /// Bumped after every successful rebuild
    builds: watch::Receiver<u64>,
    live_reload: bool,
}

/// Serve the generated site until interrupted
pub async fn start(blog: &Blog, ip: &str, port: u16, live_reload: bool) -> Result<()> {
    let (build_tx, build_rx) = watch::channel(0u64);

    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        builds: build_rx,
        live_reload,
    });

    if live_reload {
        let blog = blog.clone();
        tokio::task::spawn_blocking(move || {
            let rebuilt = || {
                build_tx.send_modify(|n| *n += 1);
            };
            if let Err(e) = crate::commands::generate::watch(&blog, rebuilt) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let app = Router::new()
        .route(RELOAD_PATH, get(livereload_handler))
        .fallback(page_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("Server running at http://{}:{}", ip, port);
    if live_reload {
        println!("Live reload enabled.");
    }
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let builds = state.builds.clone();
    ws.on_upgrade(move |socket| notify_reloads(socket, builds))
}

/// Send `reload` to the page after each rebuild
async fn notify_reloads(mut socket: WebSocket, mut builds: watch::Receiver<u64>) {
    builds.mark_unchanged();

    loop {
        tokio::select! {
            changed = builds.changed() => {
                if changed.is_err()
                    || socket.send(Message::Text("reload".to_string())).await.is_err()
                {
                    break;
                }
            }
            msg = socket.recv() => match msg {
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                _ => {}
            },
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve HTML pages with the reload client, everything else from disk
async fn page_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let Some(candidate) = resolve_in(&state.public_dir, uri.path()) else {
        return not_found(&state.public_dir).await;
    };
    let page = if candidate.is_dir() {
        candidate.join("index.html")
    } else {
        candidate
    };

    let is_html = page.extension().map(|ext| ext == "html").unwrap_or(false);

    if !(is_html && state.live_reload) {
        return serve_file(&state.public_dir, uri).await;
    }

    match tokio::fs::read_to_string(&page).await {
        Ok(content) => Html(inject_live_reload(&content)).into_response(),
        Err(_) => not_found(&state.public_dir).await,
    }
}

async fn serve_file(public_dir: &Path, uri: Uri) -> Response {
    let request = match axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
    {
        Ok(request) => request,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    let mut service = ServeDir::new(public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(public_dir).await,
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::warn!("Failed to serve file: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn not_found(public_dir: &Path) -> Response {
    match tokio::fs::read_to_string(public_dir.join("404.html")).await {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Not found",
        )
            .into_response(),
    }
}

/// File for a request path under `public_dir`, `None` if it would leave it
fn resolve_in(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode(request_path.trim_start_matches('/'));
    let relative = Path::new(&decoded);
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then(|| public_dir.join(relative))
}

fn percent_decode(path: &str) -> String {
    percent_encoding::percent_decode_str(path)
        .decode_utf8_lossy()
        .into_owned()
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], LIVE_RELOAD_SCRIPT, &html[pos..]),
        None => format!("{}{}", html, LIVE_RELOAD_SCRIPT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.contains("/__livereload"));
        assert!(html.ends_with("</script>\n</body></html>"));

        let bare = inject_live_reload("<p>x</p>");
        assert!(bare.starts_with("<p>x</p><script>"));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("tags/%EB%B8%94%EB%A1%9C%EA%B7%B8/"), "tags/블로그/");
    }

    #[test]
    fn test_resolve_in_stays_inside_public_dir() {
        let public = Path::new("/site/public");
        assert_eq!(
            resolve_in(public, "/posts/hello/"),
            Some(PathBuf::from("/site/public/posts/hello"))
        );
        assert_eq!(resolve_in(public, "/"), Some(PathBuf::from("/site/public")));
        assert_eq!(resolve_in(public, "/%2E%2E/secret.html"), None);
        assert_eq!(resolve_in(public, "/posts/../../secret.html"), None);
        assert_eq!(resolve_in(public, "/%2Fetc%2Fpasswd"), None);
    }

    #[tokio::test]
    async fn test_encoded_parent_dir_is_not_served() {
        let dir = tempfile::tempdir().unwrap();
        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&public_dir).unwrap();
        std::fs::write(dir.path().join("secret.html"), "<p>secret</p>").unwrap();

        let (_tx, builds) = watch::channel(0u64);
        let state = Arc::new(ServerState {
            public_dir,
            builds,
            live_reload: true,
        });

        let uri: Uri = "/%2E%2E/secret.html".parse().unwrap();
        let response = page_handler(State(state), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
