//! Word document assembly.
//!
//! ```text
//! mapper ──▶ DocumentAssembler ──▶ Document (model) ──▶ writer ──▶ .docx bytes ──▶ atomic save
//!              (style lookup)                            (docx-rs)
//! ```
//!
//! - [`assembler`] — append operations and persistence
//! - [`model`]     — the block/paragraph/run tree the assembler builds
//! - [`styles`]    — built-in style sheet and name → id resolution
//! - [`image`]     — loading pictures from files and `data:` URIs
//! - [`writer`]    — rendering the model with docx-rs

pub mod assembler;
pub mod image;
pub mod model;
pub mod styles;
pub mod writer;

pub use assembler::DocumentAssembler;
pub use self::image::{load_image, LoadedImage};
pub use model::{Alignment, Block, Document, FontSpec, Paragraph, Picture, Table, TextRun};
pub use styles::{StyleDef, StyleKind, StyleSheet};
