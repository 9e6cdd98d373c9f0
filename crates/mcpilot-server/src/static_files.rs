//! Static assets for the browser UI.

use std::path::{Path, PathBuf};

use axum::extract::{Path as UrlPath, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

const INDEX: &str = "index.html";

/// Content type for a file name, by extension. Unknown extensions are text.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "text/plain",
    }
}

/// Map a decoded request path onto `root`.
///
/// Returns `None` for anything that could leave the root: parent segments,
/// backslashes, drive prefixes or NUL bytes.
pub fn resolve_static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.contains("..")
        || relative.contains('\\')
        || relative.contains(':')
        || relative.contains('\0')
    {
        return None;
    }
    if relative.is_empty() {
        return Some(root.join(INDEX));
    }
    Some(root.join(relative))
}

pub async fn index(State(state): State<AppState>) -> Response {
    serve_file(&state, "/").await
}

pub async fn asset(State(state): State<AppState>, UrlPath(path): UrlPath<String>) -> Response {
    serve_file(&state, &path).await
}

async fn serve_file(state: &AppState, request_path: &str) -> Response {
    let Some(path) = resolve_static_path(state.static_root(), request_path) else {
        tracing::warn!(path = request_path, "rejected static path");
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type_for(&path)),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            bytes,
        )
            .into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read static file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_maps_to_index() {
        let root = Path::new("/srv/ui");
        assert_eq!(
            resolve_static_path(root, "/"),
            Some(PathBuf::from("/srv/ui/index.html"))
        );
        assert_eq!(
            resolve_static_path(root, "/js/app.js"),
            Some(PathBuf::from("/srv/ui/js/app.js"))
        );
    }

    #[test]
    fn traversal_is_rejected() {
        let root = Path::new("/srv/ui");
        assert_eq!(resolve_static_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_static_path(root, "a/../../b"), None);
        assert_eq!(resolve_static_path(root, "..\\secret"), None);
        assert_eq!(resolve_static_path(root, "C:/Windows/win.ini"), None);
    }

    #[test]
    fn content_types_follow_extension_table() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html");
        assert_eq!(content_type_for(Path::new("app.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("logo.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(content_type_for(Path::new("README")), "text/plain");
        assert_eq!(content_type_for(Path::new("data.yaml")), "text/plain");
    }
}
