//! Extension to content-type mapping.

use std::path::Path;

/// Fallback for any extension not in the table.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Infer the content type of an asset from its extension (case-insensitive).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use telemetry_bridge::assets::content_type_for;
///
/// assert_eq!(content_type_for(Path::new("index.HTML")), "text/html");
/// assert_eq!(content_type_for(Path::new("data.bin")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
