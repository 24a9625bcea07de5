use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::{service_fn, ServiceExt};
use tower_http::services::{ServeDir, ServeFile};

const INDEX_FILE: &str = "index.html";

/// Static client, mounted as the router fallback.
///
/// Lookup order for a path: the file itself (or `index.html` inside a directory),
/// then `{path}.html`, then the root `index.html` for client-side routes.
pub fn static_client(static_dir: &Path) -> Router {
    let root = Arc::new(static_dir.to_path_buf());

    let serve_dir = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(service_fn(move |request: Request<Body>| {
            serve_page_or_index(root.clone(), request)
        }));

    Router::new().fallback_service(serve_dir)
}

async fn serve_page_or_index(
    root: Arc<PathBuf>,
    request: Request<Body>,
) -> Result<Response, Infallible> {
    let page = match html_page_path(&root, request.uri().path()) {
        Some(page) if is_file(&page).await => page,
        _ => root.join(INDEX_FILE),
    };

    let response = ServeFile::new(page).oneshot(request).await?;
    Ok(response.into_response())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Map `/docs/intro` to `<root>/docs/intro.html`. Returns `None` for the root, for
/// directory paths, and for anything that could step outside `root`.
fn html_page_path(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(uri_path).ok()?;
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() || relative.ends_with('/') {
        return None;
    }

    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains('\\')
            || segment.contains('\0')
        {
            return None;
        }
        path.push(segment);
    }

    let mut file_name = path.file_name()?.to_os_string();
    file_name.push(".html");
    path.set_file_name(file_name);
    Some(path)
}
