//! Static asset configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where dashboard pages are served from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Asset root, relative to the working directory unless absolute
    pub root: PathBuf,
    /// File served for `/` and for paths ending in `/`
    pub default_document: String,
    /// Create a missing root and fill it with the built-in dashboard
    pub bootstrap: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("htmlPages"),
            default_document: "index.html".to_string(),
            bootstrap: true,
        }
    }
}
