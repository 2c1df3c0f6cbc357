use std::path::PathBuf;

/// Errors surfaced by the renderer and its delivery boundary.
///
/// Malformed post text is never an error: unterminated fences and tables are
/// force-closed during rendering. Only loading input and delivering the
/// finished document can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse content item: {0}")]
    InvalidContent(String),

    #[error("failed to parse palette file: {0}")]
    InvalidPalette(String),

    #[error("failed to deliver document: {0}")]
    Delivery(String),
}
