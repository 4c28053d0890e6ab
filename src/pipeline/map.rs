//! HTML → document mapping.
//!
//! [`Mapper::map_document`] walks the top-level nodes of the parsed HTML once,
//! in document order, and drives a [`DocumentAssembler`]. Each node produces
//! at most one block (lists produce one paragraph per item). Unrecognised
//! nodes are dropped; image, style and table faults abort the walk.

use super::classify::{classify_children, prescan_tables, NodeKind};
use super::html::HtmlNode;
use super::lists::flatten_list;
use super::table::TableMapping;
use crate::config::ConversionConfig;
use crate::document::{load_image, Alignment, DocumentAssembler};
use crate::error::Md2DocxError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// The marker's second occurrence becomes the table of contents.
const TOC_OCCURRENCE: u8 = 2;

/// Font for code blocks.
const CODE_FONT: &str = "Courier";
const CODE_FONT_SIZE_PT: f32 = 10.0;

/// What the walk emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStats {
    pub headings: usize,
    pub paragraphs: usize,
    pub list_items: usize,
    pub tables: usize,
    pub code_blocks: usize,
    pub pictures: usize,
    pub rules: usize,
    pub toc_inserted: bool,
    /// Emphasis nodes with no text.
    pub skipped_nodes: usize,
    /// Text nodes and unsupported tags.
    pub dropped_nodes: usize,
}

/// Width in inches at which to insert a picture.
///
/// The natural width is `width_px / pixels_per_inch`; it is capped at
/// `fraction` of the page width.
pub fn fit_picture_width(
    width_px: u32,
    pixels_per_inch: u32,
    page_width_inches: f64,
    fraction: f64,
) -> f64 {
    let natural = f64::from(width_px) / f64::from(pixels_per_inch.max(1));
    natural.min(page_width_inches * fraction)
}

/// Walk state for one conversion.
#[derive(Debug)]
pub struct Mapper<'a> {
    config: &'a ConversionConfig,
    base_dir: &'a Path,
    marker: String,
    toc_seen: u8,
    stats: MapStats,
}

impl<'a> Mapper<'a> {
    /// `base_dir` is where relative image paths are resolved.
    pub fn new(config: &'a ConversionConfig, base_dir: &'a Path) -> Self {
        Self {
            config,
            base_dir,
            marker: config.toc_marker.to_lowercase(),
            toc_seen: 0,
            stats: MapStats::default(),
        }
    }

    pub fn stats(&self) -> &MapStats {
        &self.stats
    }

    pub fn into_stats(self) -> MapStats {
        self.stats
    }

    /// Map every top-level child of `root` into `doc`.
    pub fn map_document(
        &mut self,
        root: &HtmlNode,
        doc: &mut DocumentAssembler,
    ) -> Result<(), Md2DocxError> {
        let tables = prescan_tables(root);
        for classified in classify_children(root) {
            if self.is_toc_trigger(classified.node) {
                debug!("TOC marker '{}' seen twice; inserting table of contents", self.marker);
                doc.add_table_of_contents();
                self.stats.toc_inserted = true;
                continue;
            }
            self.map_node(classified.node, classified.kind, &tables, doc)?;
        }
        Ok(())
    }

    /// Count marker occurrences while fewer than two have been seen.
    ///
    /// Returns `true` only for the second occurrence.
    fn is_toc_trigger(&mut self, node: &HtmlNode) -> bool {
        if self.toc_seen >= TOC_OCCURRENCE {
            return false;
        }
        if !node.text().to_lowercase().contains(&self.marker) {
            return false;
        }
        self.toc_seen += 1;
        self.toc_seen == TOC_OCCURRENCE
    }

    fn map_node(
        &mut self,
        node: &HtmlNode,
        kind: NodeKind,
        tables: &[&HtmlNode],
        doc: &mut DocumentAssembler,
    ) -> Result<(), Md2DocxError> {
        let styles = &self.config.styles;
        match kind {
            NodeKind::Emphasis { text } => {
                if text.is_empty() {
                    debug!("Skipping emphasis node without text");
                    self.stats.skipped_nodes += 1;
                } else {
                    doc.add_paragraph(&text, Some(styles.body.as_str()))?;
                    self.stats.paragraphs += 1;
                }
            }
            NodeKind::Rule => {
                let rule = self
                    .config
                    .rule_char
                    .to_string()
                    .repeat(self.config.rule_length);
                doc.add_paragraph(&rule, None)?
                    .set_alignment(Alignment::Center);
                self.stats.rules += 1;
            }
            NodeKind::Heading { level, text } => {
                doc.add_heading(&text, level)?;
                self.stats.headings += 1;
            }
            NodeKind::Image { src } => {
                let image = load_image(&src, self.base_dir)?;
                let width = fit_picture_width(
                    image.width_px,
                    self.config.assumed_pixels_per_inch,
                    doc.page_width_inches(),
                    self.config.picture_fraction_of_width,
                );
                debug!("Picture {} at {:.2} in", src, width);
                doc.add_picture(image, width)?;
                self.stats.pictures += 1;
            }
            NodeKind::Paragraph { text } => {
                doc.add_paragraph(&text, Some(styles.body.as_str()))?;
                self.stats.paragraphs += 1;
            }
            NodeKind::CodeBlock { text } => {
                let table = doc.add_table(1, 1, Some(styles.quote_table.as_str()))?;
                if let Some(cell) = table.cell_mut(0, 0) {
                    cell.add_run(text.trim_end_matches('\n'))
                        .set_font(CODE_FONT, CODE_FONT_SIZE_PT);
                }
                self.stats.code_blocks += 1;
            }
            NodeKind::Table { index } => {
                let source = tables.get(index).copied().ok_or_else(|| {
                    Md2DocxError::Internal(format!("table {index} missing from prescan"))
                })?;
                let mapping = TableMapping::from_node(source, index)?;
                let table = doc.add_table(mapping.n_rows(), mapping.n_cols(), Some(styles.table.as_str()))?;
                for (col, header) in mapping.headers.iter().enumerate() {
                    table.set_cell_text(0, col, header);
                }
                for (row, cells) in mapping.rows.iter().enumerate() {
                    for (col, text) in cells.iter().enumerate() {
                        table.set_cell_text(row + 1, col, text);
                    }
                }
                debug!(
                    "Table {}: {} × {}",
                    index,
                    mapping.n_rows(),
                    mapping.n_cols()
                );
                self.stats.tables += 1;
            }
            NodeKind::List { ordered } => {
                let lines = flatten_list(node);
                debug!(
                    "{} list with {} items",
                    if ordered { "Ordered" } else { "Bullet" },
                    lines.len()
                );
                for line in &lines {
                    doc.add_paragraph(&line.rendered_text(), line.style())?;
                }
                self.stats.list_items += lines.len();
            }
            NodeKind::PlainText => {
                self.stats.dropped_nodes += 1;
            }
            NodeKind::Unknown { tag } => {
                debug!("Dropping unsupported <{}>", tag);
                self.stats.dropped_nodes += 1;
            }
        }
        Ok(())
    }
}
