//! Conversion results.

use crate::pipeline::map::MapStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a finished conversion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The written `.docx` file.
    pub output_path: PathBuf,
    /// The intermediate HTML file, when one was written.
    pub html_path: Option<PathBuf>,
    pub stats: ConversionStats,
}

/// Counters and timings for one conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Length of the markdown after preprocessing.
    pub markdown_bytes: usize,
    /// Length of the rendered HTML.
    pub html_bytes: usize,
    /// Blocks emitted by the mapper.
    #[serde(flatten)]
    pub blocks: MapStats,
    /// Size of the packed `.docx`.
    pub docx_bytes: u64,
    pub total_duration_ms: u64,
}
