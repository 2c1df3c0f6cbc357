use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use labpress::{BrowserSink, ContentItem, ContentKind, DocumentSink, FileSink, Palette};

/// Render research-group blog posts to styled standalone HTML
#[derive(Parser, Debug)]
#[command(name = "labpress")]
#[command(version)]
#[command(about = "Render a post's lightweight markup into a styled HTML document", long_about = None)]
struct Args {
    /// Input content-item file, JSON or TOML (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the document to this path instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Content kind: news or achievement (defaults to the item's category)
    #[arg(short, long, value_name = "KIND")]
    kind: Option<String>,

    /// Path to a TOML palette override file
    #[arg(short, long, value_name = "PALETTE")]
    palette: Option<PathBuf>,

    /// Open the rendered document in the default browser
    #[arg(long)]
    open: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Read content item input
    let raw = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .context("failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read input file: {}", args.input.display()))?
    };

    let item = match args.input.extension().and_then(|e| e.to_str()) {
        Some("json") => ContentItem::from_json(&raw)?,
        Some("toml") => ContentItem::from_toml(&raw)?,
        // No extension to go by (stdin included): try TOML first, then JSON.
        _ => ContentItem::from_str_any(&raw)?,
    };

    let kind = args
        .kind
        .as_deref()
        .or(item.category.as_deref())
        .map(ContentKind::parse)
        .unwrap_or(ContentKind::News);

    // Load palette
    let palette = if let Some(ref palette_path) = args.palette {
        if palette_path.exists() && palette_path.is_file() {
            let content = std::fs::read_to_string(palette_path).with_context(|| {
                format!("failed to read palette file: {}", palette_path.display())
            })?;
            Palette::from_toml(&content)?
        } else {
            anyhow::bail!("palette file not found: {}", palette_path.display());
        }
    } else {
        Palette::for_kind(kind)
    };

    let html = labpress::assemble(&item, kind, &palette);

    if let Some(ref output) = args.output {
        FileSink::new(output).deliver(&html)?;
        eprintln!("Document saved to: {}", output.display());
    }
    if args.open {
        BrowserSink.deliver(&html)?;
    }
    if args.output.is_none() && !args.open {
        print!("{html}");
    }

    Ok(())
}
