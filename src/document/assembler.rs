//! Append-only document builder with atomic persistence.

use super::image::LoadedImage;
use super::model::{Block, Document, Paragraph, Picture, Table};
use super::styles::{StyleKind, StyleSheet};
use super::writer;
use crate::config::PageSize;
use crate::error::Md2DocxError;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Owns the document for one conversion.
///
/// Style names passed to the `add_*` methods are resolved immediately, so an
/// unknown style fails the call that uses it and nothing is appended.
#[derive(Debug)]
pub struct DocumentAssembler {
    styles: StyleSheet,
    page: PageSize,
    page_width_inches: f64,
    document: Document,
}

impl DocumentAssembler {
    pub fn new(page: PageSize) -> Self {
        Self {
            styles: StyleSheet::builtin(),
            page,
            page_width_inches: page.width_inches(),
            document: Document::new(),
        }
    }

    /// Usable page width in inches for sizing pictures.
    pub fn page_width_inches(&self) -> f64 {
        self.page_width_inches
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Append a heading. Level 0 is the title; 1–4 are heading levels.
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<(), Md2DocxError> {
        if StyleSheet::heading_id(level).is_none() {
            return Err(Md2DocxError::Internal(format!(
                "heading level {level} is outside 0..=4"
            )));
        }
        self.document.blocks.push(Block::Heading {
            level,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Append a paragraph holding `text` as one run.
    ///
    /// Empty text yields an empty paragraph with no runs.
    pub fn add_paragraph(
        &mut self,
        text: &str,
        style: Option<&str>,
    ) -> Result<&mut Paragraph, Md2DocxError> {
        let style = style
            .map(|name| self.styles.resolve(name, StyleKind::Paragraph))
            .transpose()?
            .map(|s| s.id.to_string());
        let mut paragraph = Paragraph {
            style,
            ..Paragraph::default()
        };
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        self.document.blocks.push(Block::Paragraph(paragraph));
        match self.document.blocks.last_mut() {
            Some(Block::Paragraph(p)) => Ok(p),
            _ => Err(Md2DocxError::Internal("paragraph vanished after push".into())),
        }
    }

    /// Append a picture `width_inches` wide; height keeps the aspect ratio.
    pub fn add_picture(
        &mut self,
        image: LoadedImage,
        width_inches: f64,
    ) -> Result<&Picture, Md2DocxError> {
        let height_inches =
            width_inches * f64::from(image.height_px) / f64::from(image.width_px.max(1));
        self.document.blocks.push(Block::Picture(Picture {
            data: image.data,
            width_px: image.width_px,
            height_px: image.height_px,
            width_inches,
            height_inches,
        }));
        match self.document.blocks.last() {
            Some(Block::Picture(p)) => Ok(p),
            _ => Err(Md2DocxError::Internal("picture vanished after push".into())),
        }
    }

    /// Append an empty `rows × cols` table.
    pub fn add_table(
        &mut self,
        rows: usize,
        cols: usize,
        style: Option<&str>,
    ) -> Result<&mut Table, Md2DocxError> {
        let style = style
            .map(|name| self.styles.resolve(name, StyleKind::Table))
            .transpose()?
            .map(|s| s.id.to_string());
        self.document
            .blocks
            .push(Block::Table(Table::new(rows, cols, style)));
        match self.document.blocks.last_mut() {
            Some(Block::Table(t)) => Ok(t),
            _ => Err(Md2DocxError::Internal("table vanished after push".into())),
        }
    }

    /// Append a table-of-contents field covering heading levels 1–3.
    pub fn add_table_of_contents(&mut self) {
        self.document.blocks.push(Block::TableOfContents);
    }

    /// Render and pack the document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Md2DocxError> {
        writer::pack(&self.document, &self.styles, self.page)
    }

    /// Write the document to `path`.
    ///
    /// Missing parent directories are created. The bytes go to a temporary
    /// file in the destination directory which is then renamed over `path`,
    /// so readers never observe a partial file.
    pub fn save(&self, path: &Path) -> Result<(), Md2DocxError> {
        let bytes = self.to_bytes()?;
        let write_err = |source| Md2DocxError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} blocks", self.document.len());
        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> DocumentAssembler {
        DocumentAssembler::new(PageSize::Letter)
    }

    #[test]
    fn page_width_is_computed_once_from_page_size() {
        assert!((assembler().page_width_inches() - 8.5).abs() < 1e-9);
        let a4 = DocumentAssembler::new(PageSize::A4);
        assert!((a4.page_width_inches() - 11906.0 / 1440.0).abs() < 1e-9);
    }

    #[test]
    fn paragraph_style_is_resolved_to_id() {
        let mut a = assembler();
        let p = a.add_paragraph("hello", Some("Body Text")).unwrap();
        assert_eq!(p.style.as_deref(), Some("BodyText"));
        assert_eq!(p.text(), "hello");
    }

    #[test]
    fn unknown_style_appends_nothing() {
        let mut a = assembler();
        assert!(a.add_paragraph("x", Some("Nope")).is_err());
        assert!(a.add_table(1, 1, Some("Nope")).is_err());
        assert!(a.document().is_empty());
    }

    #[test]
    fn heading_level_out_of_range() {
        let mut a = assembler();
        assert!(a.add_heading("ok", 0).is_ok());
        assert!(a.add_heading("bad", 5).is_err());
        assert_eq!(a.document().len(), 1);
    }

    #[test]
    fn picture_height_keeps_aspect_ratio() {
        let mut a = assembler();
        let img = LoadedImage {
            data: Vec::new(),
            width_px: 3000,
            height_px: 2000,
        };
        let pic = a.add_picture(img, 6.0).unwrap();
        assert!((pic.height_inches - 4.0).abs() < 1e-9);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b").join("doc.docx");
        let mut a = assembler();
        a.add_heading("Title", 0).unwrap();
        a.add_paragraph("body", Some("Body Text")).unwrap();
        a.save(&out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"PK"));
        // Saving again over an existing file is fine.
        a.save(&out).unwrap();
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("doc.docx");
        assembler().save(&out).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("doc.docx")]);
    }
}
