//! Front-end compiled into the binary.
//!
//! The files under `build/` are embedded at compile time so the relay serves
//! its front-end regardless of the working directory. `StaticDir` swaps this
//! for an on-disk tree (see [`super::router`]).

use axum::{
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::error::AppError;

/// An embedded file: request path, content type, contents.
struct Asset {
    path: &'static str,
    content_type: &'static str,
    body: &'static [u8],
}

const HTML: &str = "text/html; charset=utf-8";
const JAVASCRIPT: &str = "text/javascript; charset=utf-8";

static ASSETS: &[Asset] = &[
    Asset {
        path: "index.html",
        content_type: HTML,
        body: include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/build/index.html")),
    },
    Asset {
        path: "app.js",
        content_type: JAVASCRIPT,
        body: include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/build/app.js")),
    },
    Asset {
        path: "service-worker.js",
        content_type: JAVASCRIPT,
        body: include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/build/service-worker.js")),
    },
];

/// Look up an embedded file by request path. Directory paths map to their
/// `index.html`.
fn lookup(path: &str) -> Option<&'static Asset> {
    let path = path.trim_start_matches('/');
    let path = if path.is_empty() || path.ends_with('/') {
        format!("{path}index.html")
    } else {
        path.to_string()
    };
    ASSETS.iter().find(|asset| asset.path == path)
}

/// Fallback handler serving the embedded front-end.
pub async fn serve_embedded(method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return AppError::MethodNotAllowed.into_response();
    }
    match lookup(uri.path()) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        let asset = lookup("/").expect("index");
        assert_eq!(asset.path, "index.html");
        assert_eq!(asset.content_type, HTML);
        assert!(!asset.body.is_empty());
    }

    #[test]
    fn test_service_worker_embedded() {
        let asset = lookup("/service-worker.js").expect("service worker");
        assert_eq!(asset.content_type, JAVASCRIPT);
        assert!(std::str::from_utf8(asset.body)
            .expect("utf-8")
            .contains("push"));
    }

    #[test]
    fn test_unknown_path_not_found() {
        assert!(lookup("/missing.js").is_none());
        assert!(lookup("/nested/").is_none());
    }
}
