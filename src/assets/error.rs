/// Static asset lookup errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Missing file, a directory, or a path that escapes the root
    #[error("asset not found")]
    NotFound,

    #[error("{0}")]
    Read(#[from] std::io::Error),
}
