//! Asset root preparation with the embedded default dashboard.

use rust_embed::RustEmbed;
use std::io;
use std::path::Path;

/// Default dashboard pages from dashboard/ directory
#[derive(RustEmbed)]
#[folder = "dashboard/"]
struct DefaultPages;

/// Names of the embedded default pages, sorted.
pub fn default_pages() -> Vec<String> {
    let mut names: Vec<String> = DefaultPages::iter().map(|name| name.into_owned()).collect();
    names.sort();
    names
}

/// Make sure the asset root exists.
///
/// An existing directory is left untouched. A missing root is created and
/// populated with the default pages when `bootstrap` is set, and is an
/// error otherwise. Returns `true` if the root was created.
pub fn prepare_root(root: &Path, bootstrap: bool) -> io::Result<bool> {
    if root.is_dir() {
        return Ok(false);
    }
    if root.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", root.display()),
        ));
    }
    if !bootstrap {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("asset root {} does not exist", root.display()),
        ));
    }

    std::fs::create_dir_all(root)?;
    for name in DefaultPages::iter() {
        let Some(file) = DefaultPages::get(&name) else {
            continue;
        };
        let target = root.join(name.as_ref());
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, file.data.as_ref())?;
    }

    tracing::info!(root = %root.display(), "Created asset root with default dashboard");
    Ok(true)
}
