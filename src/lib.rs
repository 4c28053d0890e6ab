//! # markdown2docx
//!
//! Convert markdown (typically a generated assignment solution) into a Word
//! `.docx` document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! markdown
//!  │
//!  ├─ 1. Input     <stem>.md through the preprocessor, or text as-is
//!  ├─ 2. HTML      pulldown-cmark with fenced code, code-friendly, pipe + wiki tables
//!  ├─ 3. Tree      html5ever → owned HtmlNode tree
//!  ├─ 4. Classify  one NodeKind per top-level node
//!  ├─ 5. Map       headings, paragraphs, pictures, tables, lists, code, rules, TOC
//!  └─ 6. Save      docx-rs render → zip in memory → atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use markdown2docx::{convert, ConversionConfig, MarkdownInput};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     // Reads solution.md, writes solution.docx (and solution.html).
//!     let output = convert(MarkdownInput::file("solution"), None, &config, true)?;
//!     eprintln!(
//!         "{} paragraphs, {} tables → {}",
//!         output.stats.blocks.paragraphs,
//!         output.stats.blocks.tables,
//!         output.output_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2docx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! markdown2docx = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod preprocess;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, MarkdownExtensions, PageSize, StyleNames,
};
pub use convert::{
    convert, convert_markdown_to_docx, convert_with_html, Conversion, MarkdownInput,
};
pub use document::DocumentAssembler;
pub use error::Md2DocxError;
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::map::MapStats;
pub use preprocess::{Preprocessor, TokenPreprocessor};
