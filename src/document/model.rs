//! In-memory document model.
//!
//! A [`Document`] is an ordered list of [`Block`]s. Style references are
//! already-resolved style ids; resolution happens when content is appended,
//! so a model can always be rendered.

/// One generated document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Paragraphs at the top level, in order. Table cells are not included.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}

/// Block-level content.
#[derive(Debug, Clone)]
pub enum Block {
    /// Level 0 is the title.
    Heading { level: u8, text: String },
    Paragraph(Paragraph),
    Picture(Picture),
    Table(Table),
    /// Field the word processor fills from the headings when the file is opened.
    TableOfContents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// A paragraph: optional style id, optional alignment, and runs of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut TextRun {
        self.runs.push(TextRun {
            text: text.into(),
            font: None,
        });
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = Some(alignment);
        self
    }

    /// Text of all runs concatenated.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A span of text with an optional explicit font.
///
/// Newlines in `text` become line breaks when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: Option<FontSpec>,
}

impl TextRun {
    pub fn set_font(&mut self, name: impl Into<String>, size_pt: f32) -> &mut Self {
        self.font = Some(FontSpec {
            name: name.into(),
            size_pt,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub name: String,
    pub size_pt: f32,
}

/// An embedded image with its display size.
#[derive(Debug, Clone)]
pub struct Picture {
    pub data: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub width_inches: f64,
    pub height_inches: f64,
}

/// A rectangular table whose cells each hold one paragraph.
#[derive(Debug, Clone)]
pub struct Table {
    pub style: Option<String>,
    rows: Vec<Vec<Paragraph>>,
}

impl Table {
    pub(crate) fn new(rows: usize, cols: usize, style: Option<String>) -> Self {
        Self {
            style,
            rows: vec![vec![Paragraph::default(); cols]; rows],
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<Paragraph>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Paragraph> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Paragraph> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Replace the text of a cell with a single plain run.
    ///
    /// Returns `false` when the position is outside the table.
    pub fn set_cell_text(&mut self, row: usize, col: usize, text: &str) -> bool {
        match self.cell_mut(row, col) {
            Some(cell) => {
                cell.runs.clear();
                if !text.is_empty() {
                    cell.add_run(text);
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_shape_and_cells() {
        let mut t = Table::new(3, 2, None);
        assert_eq!((t.n_rows(), t.n_cols()), (3, 2));
        assert!(t.set_cell_text(2, 1, "x"));
        assert!(!t.set_cell_text(3, 0, "out"));
        assert_eq!(t.cell(2, 1).map(Paragraph::text).as_deref(), Some("x"));
        assert_eq!(t.cell(0, 0).map(Paragraph::text).as_deref(), Some(""));
    }

    #[test]
    fn run_font_is_recorded() {
        let mut p = Paragraph::default();
        p.add_run("code").set_font("Courier", 10.0);
        assert_eq!(p.runs[0].font.as_ref().map(|f| f.name.as_str()), Some("Courier"));
        assert_eq!(p.text(), "code");
    }
}
