//! Pipeline stages for markdown-to-DOCX conversion.
//!
//! Each submodule implements exactly one transformation step and is tested
//! on its own.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ markdown ──▶ html ──▶ classify ──▶ map ──▶ DocumentAssembler
//!  (text)     (pulldown)   (tree)   (NodeKind)   (walk)
//!                                                 ├─ lists
//!                                                 └─ table
//! ```
//!
//! 1. [`markdown`] — render markdown to an HTML string with the fixed
//!    extension set (fenced code, code-friendly, pipe and wiki tables)
//! 2. [`html`]     — parse the HTML into an owned, immutable node tree
//! 3. [`classify`] — tag every top-level node with the block it maps to
//! 4. [`map`]      — walk the tagged nodes and append blocks to the document;
//!    [`lists`] flattens nested lists and [`table`] reconstructs table grids

pub mod classify;
pub mod html;
pub mod lists;
pub mod map;
pub mod markdown;
pub mod table;
