//! Static Asset Server module.
//!
//! Resolves request paths to files under a root directory. Resolution is
//! done twice: lexically (no `..`, no drive or separator tricks) and then
//! on the canonical path, so a symlink pointing outside the root is refused
//! the same way a `../` path is.

mod bootstrap;
mod content_type;
mod error;
pub mod handler;

pub use bootstrap::{default_pages, prepare_root};
pub use content_type::{content_type_for, DEFAULT_CONTENT_TYPE};
pub use error::AssetError;

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::io;
use std::path::{Path, PathBuf};

/// Body returned for a missing asset.
pub const NOT_FOUND_BODY: &str = "404 - Not Found";

/// A request path resolved to a readable file under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Canonical file path
    pub path: PathBuf,
    /// Content type inferred from the requested name
    pub content_type: &'static str,
}

/// Result of serving one asset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl AssetResponse {
    pub fn ok(content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            content_type: "text/html",
            body: Bytes::from_static(NOT_FOUND_BODY.as_bytes()),
        }
    }
}

impl From<AssetError> for AssetResponse {
    fn from(error: AssetError) -> Self {
        match error {
            AssetError::NotFound => Self::not_found(),
            AssetError::Read(e) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                content_type: "text/plain",
                body: Bytes::from(format!("Error reading file: {}", e)),
            },
        }
    }
}

impl IntoResponse for AssetResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Serves files from a fixed root directory.
#[derive(Debug, Clone)]
pub struct AssetServer {
    root: PathBuf,
    default_document: String,
}

impl AssetServer {
    /// Create a server for an existing root directory.
    ///
    /// The root is canonicalized once here; every resolved path must stay
    /// under it.
    pub fn new(root: impl AsRef<Path>, default_document: impl Into<String>) -> io::Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self {
            root,
            default_document: default_document.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn default_document(&self) -> &str {
        &self.default_document
    }

    /// Map a request path to a path relative to the root.
    ///
    /// Empty, `/` and directory paths (trailing `/`) map to the default
    /// document. Returns `None` for any path containing a parent segment or
    /// a segment with `\`, `:` or NUL.
    pub fn relative_path(&self, request_path: &str) -> Option<PathBuf> {
        let trimmed = request_path.trim_start_matches('/');
        let mut relative = PathBuf::new();

        for segment in trimmed.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains(['\\', ':', '\0']) => return None,
                s => relative.push(s),
            }
        }

        if trimmed.is_empty() || trimmed.ends_with('/') {
            relative.push(&self.default_document);
        }
        Some(relative)
    }

    /// Resolve a request path to a regular file inside the root.
    pub async fn resolve(&self, request_path: &str) -> Result<ResolvedAsset, AssetError> {
        let relative = self
            .relative_path(request_path)
            .ok_or(AssetError::NotFound)?;

        // Anything that cannot be canonicalized does not exist as far as
        // clients are concerned.
        let canonical = tokio::fs::canonicalize(self.root.join(&relative))
            .await
            .map_err(|_| AssetError::NotFound)?;

        if !canonical.starts_with(&self.root) {
            tracing::debug!(path = %request_path, "Asset path escapes root");
            return Err(AssetError::NotFound);
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|_| AssetError::NotFound)?;
        if !metadata.is_file() {
            return Err(AssetError::NotFound);
        }

        Ok(ResolvedAsset {
            content_type: content_type_for(&relative),
            path: canonical,
        })
    }

    /// Serve one request path.
    ///
    /// Never fails: lookup and read errors become 404 and 500 responses.
    pub async fn serve(&self, request_path: &str) -> AssetResponse {
        let asset = match self.resolve(request_path).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::debug!(path = %request_path, "Asset not found");
                return e.into();
            }
        };

        match tokio::fs::read(&asset.path).await {
            Ok(body) => AssetResponse::ok(asset.content_type, body),
            Err(e) => {
                tracing::warn!(
                    path = %asset.path.display(),
                    error = %e,
                    "Failed to read asset"
                );
                AssetError::Read(e).into()
            }
        }
    }
}
