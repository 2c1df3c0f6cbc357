use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::error::Error;

/// Where the finished document goes. The renderer itself is a pure string
/// producer; this boundary owns the only side effect of the whole pipeline,
/// and the only failure that reaches the caller.
pub trait DocumentSink {
    fn deliver(&self, html: &str) -> Result<(), Error>;
}

/// Writes the document to a fixed path.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSink for FileSink {
    fn deliver(&self, html: &str) -> Result<(), Error> {
        std::fs::write(&self.path, html).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Persists the document to a temp file and opens it in the default browser,
/// the closest thing a CLI has to a new display surface.
pub struct BrowserSink;

impl DocumentSink for BrowserSink {
    fn deliver(&self, html: &str) -> Result<(), Error> {
        let mut file = tempfile::Builder::new()
            .prefix("labpress-")
            .suffix(".html")
            .tempfile()
            .map_err(|e| Error::Delivery(format!("could not create temp file: {e}")))?;
        file.write_all(html.as_bytes())
            .map_err(|e| Error::Delivery(format!("could not write temp file: {e}")))?;
        let (_file, path) = file
            .keep()
            .map_err(|e| Error::Delivery(format!("could not persist temp file: {e}")))?;

        webbrowser::open(&path.to_string_lossy())
            .map_err(|e| Error::Delivery(format!("browser refused to open: {e}")))?;
        info!(path = %path.display(), "document opened in browser");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentSink, FileSink};
    use crate::error::Error;

    #[test]
    fn file_sink_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("post.html");

        FileSink::new(&path)
            .deliver("<html>ok</html>")
            .expect("deliver");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, "<html>ok</html>");
    }

    #[test]
    fn file_sink_surfaces_io_failure() {
        let sink = FileSink::new("/definitely/not/a/real/dir/post.html");
        match sink.deliver("x") {
            Err(Error::Io { .. }) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
