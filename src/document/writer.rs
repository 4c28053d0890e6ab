//! Rendering of the document model with docx-rs and packing to bytes.

use super::model::{Alignment, Block, Document, Paragraph, Picture, Table, TextRun};
use super::styles::{StyleDef, StyleKind, StyleSheet, BULLET_NUMBERING_ID, DECIMAL_NUMBERING_ID};
use crate::config::PageSize;
use crate::error::Md2DocxError;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    NumberFormat, Numbering, NumberingId, Pic, Run, RunFonts, SpecialIndentType, Start, Style,
    StyleType, TableCell, TableOfContents, TableRow,
};
use std::io::Cursor;

/// English Metric Units per inch, the unit of drawing extents.
const EMU_PER_INCH: f64 = 914_400.0;

/// Style ids `Docx::new()` already declares in `styles.xml`.
const DOCX_DEFAULT_STYLE_IDS: &[&str] = &["Normal"];

/// Render `document` and pack it into DOCX bytes.
pub fn pack(document: &Document, styles: &StyleSheet, page: PageSize) -> Result<Vec<u8>, Md2DocxError> {
    let docx = render(document, styles, page);
    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| Md2DocxError::PackFailed(e.to_string()))?;
    Ok(buffer)
}

fn render(document: &Document, styles: &StyleSheet, page: PageSize) -> Docx {
    let mut docx = Docx::new().page_size(page.width_twips(), page.height_twips());
    for style in styles.iter() {
        if DOCX_DEFAULT_STYLE_IDS.contains(&style.id) {
            continue;
        }
        docx = docx.add_style(docx_style(style));
    }
    docx = add_list_numbering(docx);

    for block in &document.blocks {
        docx = match block {
            Block::Heading { level, text } => {
                let style = StyleSheet::heading_id(*level).unwrap_or("Heading4");
                docx.add_paragraph(
                    docx_rs::Paragraph::new()
                        .style(style)
                        .add_run(text_run(text)),
                )
            }
            Block::Paragraph(p) => docx.add_paragraph(docx_paragraph(p, styles)),
            Block::Picture(pic) => docx.add_paragraph(picture_paragraph(pic)),
            Block::Table(t) => docx.add_table(docx_table(t, styles)),
            Block::TableOfContents => {
                docx.add_table_of_contents(
                    TableOfContents::new()
                        .heading_styles_range(1, 3)
                        .hyperlink(),
                )
            }
        };
    }
    docx
}

fn docx_style(def: &StyleDef) -> Style {
    let kind = match def.kind {
        StyleKind::Paragraph => StyleType::Paragraph,
        StyleKind::Table => StyleType::Table,
    };
    let mut style = Style::new(def.id, kind).name(def.name);
    if let Some(size) = def.size {
        style = style.size(size);
    }
    if def.bold {
        style = style.bold();
    }
    if def.italic {
        style = style.italic();
    }
    if let Some(indent) = def.indent {
        style = style.indent(Some(indent), None, None, None);
    }
    style
}

/// One bullet and one decimal numbering, nine levels each.
fn add_list_numbering(docx: Docx) -> Docx {
    let mut bullets = AbstractNumbering::new(BULLET_NUMBERING_ID);
    let mut decimals = AbstractNumbering::new(DECIMAL_NUMBERING_ID);
    for level in 0..9 {
        bullets = bullets.add_level(list_level(level, "bullet", "•"));
        decimals = decimals.add_level(list_level(level, "decimal", &format!("%{}.", level + 1)));
    }
    docx.add_abstract_numbering(bullets)
        .add_abstract_numbering(decimals)
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
        .add_numbering(Numbering::new(DECIMAL_NUMBERING_ID, DECIMAL_NUMBERING_ID))
}

fn list_level(level: usize, format: &str, text: &str) -> Level {
    Level::new(
        level,
        Start::new(1),
        NumberFormat::new(format),
        LevelText::new(text),
        LevelJc::new("left"),
    )
    .indent(
        Some(720 * (level as i32 + 1)),
        Some(SpecialIndentType::Hanging(360)),
        None,
        None,
    )
}

fn docx_paragraph(p: &Paragraph, styles: &StyleSheet) -> docx_rs::Paragraph {
    let mut para = docx_rs::Paragraph::new();
    if let Some(ref id) = p.style {
        para = para.style(id);
        if let Some(n) = styles.get(id).and_then(|s| s.numbering) {
            para = para.numbering(NumberingId::new(n.numbering_id), IndentLevel::new(n.level));
        }
    }
    if let Some(alignment) = p.alignment {
        para = para.align(match alignment {
            Alignment::Left => AlignmentType::Left,
            Alignment::Center => AlignmentType::Center,
            Alignment::Right => AlignmentType::Right,
        });
    }
    for run in &p.runs {
        para = para.add_run(docx_run(run));
    }
    para
}

fn docx_run(run: &TextRun) -> Run {
    let mut r = text_run(&run.text);
    if let Some(ref font) = run.font {
        r = r
            .fonts(
                RunFonts::new()
                    .ascii(&font.name)
                    .hi_ansi(&font.name)
                    .east_asia(&font.name)
                    .cs(&font.name),
            )
            .size((font.size_pt * 2.0).round() as usize);
    }
    r
}

/// A run whose newlines become line breaks.
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        if !line.is_empty() {
            run = run.add_text(line);
        }
    }
    run
}

fn picture_paragraph(pic: &Picture) -> docx_rs::Paragraph {
    let width = (pic.width_inches * EMU_PER_INCH).round() as u32;
    let height = (pic.height_inches * EMU_PER_INCH).round() as u32;
    docx_rs::Paragraph::new().add_run(Run::new().add_image(Pic::new(&pic.data).size(width, height)))
}

fn docx_table(t: &Table, styles: &StyleSheet) -> docx_rs::Table {
    let rows = t
        .rows()
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|cell| TableCell::new().add_paragraph(docx_paragraph(cell, styles)))
                .collect();
            TableRow::new(cells)
        })
        .collect();
    let mut table = docx_rs::Table::new(rows);
    if let Some(ref id) = t.style {
        table = table.style(id);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_packs_to_zip() {
        let bytes = pack(&Document::new(), &StyleSheet::builtin(), PageSize::Letter).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    fn zip_entry(bytes: &[u8], name: &str) -> String {
        use std::io::Read;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn style_ids_are_unique() {
        let bytes = pack(&Document::new(), &StyleSheet::builtin(), PageSize::Letter).unwrap();
        let xml = zip_entry(&bytes, "word/styles.xml");
        let re = regex::Regex::new(r#"w:styleId="([^"]+)""#).unwrap();
        let mut ids: Vec<&str> = re.captures_iter(&xml).map(|c| c.get(1).unwrap().as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "duplicate style ids in styles.xml");
        assert!(ids.contains(&"Normal"));
        assert!(ids.contains(&"ListBullet2"));
    }

    #[test]
    fn toc_entries_are_hyperlinks() {
        let mut doc = Document::new();
        doc.blocks.push(Block::TableOfContents);
        let bytes = pack(&doc, &StyleSheet::builtin(), PageSize::Letter).unwrap();
        let xml = zip_entry(&bytes, "word/document.xml");
        assert!(xml.contains("TOC"), "got: {xml}");
        assert!(xml.contains("\\h"), "got: {xml}");
    }

    #[test]
    fn emu_conversion() {
        assert_eq!((1.5 * EMU_PER_INCH) as u32, 1_371_600);
    }
}
