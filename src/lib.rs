//! labpress renders a research-group blog post — a content item plus a
//! constrained markdown-like markup — into a complete standalone HTML
//! document.
//!
//! The pipeline is a single synchronous pass: the [`renderer`] classifies
//! each line against a small set of exclusive block modes (code fence, math
//! fence, table, lists), the [`document`] assembler wraps the resulting
//! fragment in the site shell, and a [`sink::DocumentSink`] carries the one
//! side effect of delivering the finished document.

pub mod content;
pub mod document;
pub mod error;
pub mod inline;
pub mod renderer;
pub mod sink;
pub mod table;
pub mod theme;

pub use content::ContentItem;
pub use document::assemble;
pub use error::Error;
pub use sink::{BrowserSink, DocumentSink, FileSink};
pub use theme::{ContentKind, Palette};

/// Render the item and hand the document to the sink. The render itself
/// cannot fail; only delivery can.
pub fn publish(
    item: &ContentItem,
    kind: ContentKind,
    palette: &Palette,
    sink: &dyn DocumentSink,
) -> Result<(), Error> {
    let html = document::assemble(item, kind, palette);
    sink.deliver(&html)
}
