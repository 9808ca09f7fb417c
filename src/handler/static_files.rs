//! Static file serving module
//!
//! Serves the storefront frontend (HTML, CSS, scripts, artwork) from the
//! configured root. Any path not claimed by the API ends up here.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, response::FileHeaders, ByteRange};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs;

/// Where a request path leads inside the static root
#[derive(Debug)]
pub enum Resolved {
    File(PathBuf, Metadata),
    /// Directory asked for without trailing slash; redirect target
    Redirect(String),
    NotFound,
}

/// Serve the file behind `ctx.path`
pub async fn serve(ctx: &RequestContext<'_>, config: &StaticFilesConfig) -> Response<Full<Bytes>> {
    match resolve(&config.root, ctx.path, &config.index_files).await {
        Resolved::File(path, meta) => serve_file(ctx, &path, &meta, config.max_age).await,
        Resolved::Redirect(location) => http::response::build_301_response(&location),
        Resolved::NotFound => http::build_404_response(),
    }
}

async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    meta: &Metadata,
    max_age: u64,
) -> Response<Full<Bytes>> {
    let modified = meta.modified().unwrap_or(UNIX_EPOCH);
    let etag = cache::weak_etag(meta.len(), modified);
    let last_modified = cache::http_date(modified);

    if cache::is_not_modified(ctx.if_none_match, ctx.if_modified_since, &etag, modified) {
        return http::response::build_304_response(&etag, &last_modified);
    }

    let data = match fs::read(path).await {
        Ok(d) => Bytes::from(d),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let headers = FileHeaders {
        content_type: mime::content_type_for(path),
        etag: &etag,
        last_modified: &last_modified,
        max_age,
    };

    let total = data.len() as u64;
    match ByteRange::parse(ctx.range_header, total) {
        ByteRange::Full => http::response::build_file_response(data, &headers),
        ByteRange::Partial { start, end } => {
            let (Ok(from), Ok(to)) = (usize::try_from(start), usize::try_from(end)) else {
                return http::build_416_response(total);
            };
            http::response::build_partial_response(data.slice(from..=to), &headers, start, end, total)
        }
        ByteRange::Unsatisfiable => http::build_416_response(total),
    }
}

/// Map a URL path onto the filesystem below `root`
///
/// Dot segments, dotfiles and anything that canonicalizes outside `root`
/// resolve to `NotFound`. Directories resolve to their first index file.
pub async fn resolve(root: &Path, url_path: &str, index_files: &[String]) -> Resolved {
    let Some(decoded) = percent_decode(url_path) else {
        return Resolved::NotFound;
    };

    let mut file_path = root.to_path_buf();
    for segment in decoded.split('/').filter(|s| !s.is_empty()) {
        if segment.starts_with('.') || segment.contains(['\\', '\0']) {
            return Resolved::NotFound;
        }
        file_path.push(segment);
    }

    let Ok(mut meta) = fs::metadata(&file_path).await else {
        return Resolved::NotFound;
    };

    if meta.is_dir() {
        if !decoded.ends_with('/') {
            // A leading `//` would make the target scheme-relative
            return Resolved::Redirect(format!("/{}/", url_path.trim_start_matches('/')));
        }
        let mut found = None;
        for index in index_files {
            let candidate = file_path.join(index);
            if let Ok(m) = fs::metadata(&candidate).await {
                if m.is_file() {
                    found = Some((candidate, m));
                    break;
                }
            }
        }
        let Some((index_path, index_meta)) = found else {
            return Resolved::NotFound;
        };
        file_path = index_path;
        meta = index_meta;
    }

    if !meta.is_file() {
        return Resolved::NotFound;
    }

    // Symlinks may still point outside the root
    let (Ok(root_canonical), Ok(file_canonical)) =
        (fs::canonicalize(root).await, fs::canonicalize(&file_path).await)
    else {
        return Resolved::NotFound;
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {url_path} -> {}",
            file_canonical.display()
        ));
        return Resolved::NotFound;
    }

    Resolved::File(file_path, meta)
}

/// Decode `%XX` escapes; `None` for malformed escapes or non-UTF-8 results
fn percent_decode(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::header;
    use hyper::StatusCode;

    struct TempRoot(PathBuf);

    impl TempRoot {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "lugx-static-{name}-{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(dir.join("css")).unwrap();
            std::fs::create_dir_all(dir.join("empty")).unwrap();
            std::fs::write(dir.join("index.html"), "<h1>LUGX</h1>").unwrap();
            std::fs::write(dir.join("css/style.css"), "body{margin:0}").unwrap();
            std::fs::write(dir.join("my game.txt"), "spaced").unwrap();
            std::fs::write(dir.join(".env"), "SECRET=1").unwrap();
            Self(dir)
        }

        fn config(&self) -> StaticFilesConfig {
            StaticFilesConfig {
                root: self.0.clone(),
                index_files: vec!["index.html".to_string()],
                max_age: 0,
            }
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            if_none_match: None,
            if_modified_since: None,
            range_header: None,
        }
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_serves_file_with_content_type() {
        let root = TempRoot::new("file");
        let resp = serve(&ctx("/css/style.css"), &root.config()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
        assert!(resp.headers().contains_key(header::ETAG));
        assert!(resp.headers().contains_key(header::LAST_MODIFIED));
        assert_eq!(body_of(resp).await, b"body{margin:0}");
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let root = TempRoot::new("index");
        let resp = serve(&ctx("/"), &root.config()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, b"<h1>LUGX</h1>");
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let root = TempRoot::new("redirect");
        let resp = serve(&ctx("/css"), &root.config()).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[header::LOCATION], "/css/");

        for path in ["//css", "///css"] {
            let resp = serve(&ctx(path), &root.config()).await;
            assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(resp.headers()[header::LOCATION], "/css/", "path {path}");
        }
    }

    #[tokio::test]
    async fn test_missing_and_hidden_paths_are_404() {
        let root = TempRoot::new("missing");
        let cfg = root.config();
        for path in ["/nope.html", "/.env", "/../etc/passwd", "/css/%2e%2e/.env", "/empty/", "/bad%zz"] {
            let resp = serve(&ctx(path), &cfg).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_percent_encoded_names() {
        let root = TempRoot::new("encoded");
        let resp = serve(&ctx("/my%20game.txt"), &root.config()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, b"spaced");
    }

    #[tokio::test]
    async fn test_conditional_request_returns_304() {
        let root = TempRoot::new("etag");
        let cfg = root.config();
        let first = serve(&ctx("/index.html"), &cfg).await;
        let etag = first.headers()[header::ETAG].to_str().unwrap().to_string();

        let mut again = ctx("/index.html");
        again.if_none_match = Some(&etag);
        let resp = serve(&again, &cfg).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_range_requests() {
        let root = TempRoot::new("range");
        let cfg = root.config();

        let mut partial = ctx("/css/style.css");
        partial.range_header = Some("bytes=0-3");
        let resp = serve(&partial, &cfg).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes 0-3/14");
        assert_eq!(body_of(resp).await, b"body");

        let mut beyond = ctx("/css/style.css");
        beyond.range_header = Some("bytes=100-");
        let resp = serve(&beyond, &cfg).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b").as_deref(), Some("/a b"));
        assert_eq!(percent_decode("/plain").as_deref(), Some("/plain"));
        assert_eq!(percent_decode("/trunc%2"), None);
        assert_eq!(percent_decode("/%ff"), None);
    }
}
