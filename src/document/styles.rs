//! Built-in style sheet.
//!
//! Every document starts with the same set of named styles. Content refers to
//! styles by user-facing name ("Body Text") or by id ("BodyText"); lookups
//! never fall back to another style, so a typo in a configured name surfaces
//! as [`Md2DocxError::StyleNotFound`] instead of silently unstyled output.

use crate::error::Md2DocxError;

/// Numbering instance used by bullet list styles.
pub const BULLET_NUMBERING_ID: usize = 1;
/// Numbering instance used by numbered list styles.
pub const DECIMAL_NUMBERING_ID: usize = 2;

/// What a style can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Paragraph,
    Table,
}

/// Link from a list style to a numbering definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNumbering {
    pub numbering_id: usize,
    pub level: usize,
}

/// One style definition.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDef {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: StyleKind,
    /// Font size in half-points.
    pub size: Option<usize>,
    pub bold: bool,
    pub italic: bool,
    /// Left indent in twips.
    pub indent: Option<i32>,
    pub numbering: Option<ListNumbering>,
}

impl StyleDef {
    const fn paragraph(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            kind: StyleKind::Paragraph,
            size: None,
            bold: false,
            italic: false,
            indent: None,
            numbering: None,
        }
    }

    const fn table(id: &'static str, name: &'static str) -> Self {
        Self {
            kind: StyleKind::Table,
            ..Self::paragraph(id, name)
        }
    }

    const fn heading(id: &'static str, name: &'static str, size: usize) -> Self {
        Self {
            size: Some(size),
            bold: true,
            ..Self::paragraph(id, name)
        }
    }

    const fn list(id: &'static str, name: &'static str, numbering_id: usize, level: usize) -> Self {
        Self {
            numbering: Some(ListNumbering {
                numbering_id,
                level,
            }),
            ..Self::paragraph(id, name)
        }
    }
}

/// The set of styles a document can use.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    styles: Vec<StyleDef>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleSheet {
    /// Styles every generated document carries.
    pub fn builtin() -> Self {
        let quote = StyleDef {
            italic: true,
            indent: Some(720),
            ..StyleDef::paragraph("Quote", "Quote")
        };
        let styles = vec![
            StyleDef::paragraph("Normal", "Normal"),
            StyleDef::heading("Title", "Title", 56),
            StyleDef::heading("Heading1", "Heading 1", 32),
            StyleDef::heading("Heading2", "Heading 2", 28),
            StyleDef::heading("Heading3", "Heading 3", 26),
            StyleDef::heading("Heading4", "Heading 4", 24),
            StyleDef::paragraph("BodyText", "Body Text"),
            quote,
            StyleDef::list("ListBullet", "List Bullet", BULLET_NUMBERING_ID, 0),
            StyleDef::list("ListBullet2", "List Bullet 2", BULLET_NUMBERING_ID, 1),
            StyleDef::list("ListBullet3", "List Bullet 3", BULLET_NUMBERING_ID, 2),
            StyleDef::list("ListNumber", "List Number", DECIMAL_NUMBERING_ID, 0),
            StyleDef::list("ListNumber2", "List Number 2", DECIMAL_NUMBERING_ID, 1),
            StyleDef::list("ListNumber3", "List Number 3", DECIMAL_NUMBERING_ID, 2),
            StyleDef::table("TableGrid", "Table Grid"),
            StyleDef::table("MediumShading1-Accent3", "Medium Shading 1 Accent 3"),
            StyleDef::table("LightGrid-Accent1", "Light Grid Accent 1"),
        ];
        Self { styles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDef> {
        self.styles.iter()
    }

    /// Look a style up by id.
    pub fn get(&self, id: &str) -> Option<&StyleDef> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Resolve a style by name or id, requiring it to apply to `kind`.
    ///
    /// A style of the wrong kind is reported as not found.
    pub fn resolve(&self, name: &str, kind: StyleKind) -> Result<&StyleDef, Md2DocxError> {
        self.styles
            .iter()
            .find(|s| s.kind == kind && (s.name == name || s.id == name))
            .ok_or_else(|| Md2DocxError::StyleNotFound {
                style: name.to_string(),
            })
    }

    /// Style id for a heading level: 0 is the title, 1–4 are headings.
    pub fn heading_id(level: u8) -> Option<&'static str> {
        match level {
            0 => Some("Title"),
            1 => Some("Heading1"),
            2 => Some("Heading2"),
            3 => Some("Heading3"),
            4 => Some("Heading4"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_name_and_id() {
        let sheet = StyleSheet::builtin();
        let by_name = sheet.resolve("Body Text", StyleKind::Paragraph).unwrap();
        let by_id = sheet.resolve("BodyText", StyleKind::Paragraph).unwrap();
        assert_eq!(by_name, by_id);
    }

    #[test]
    fn default_table_styles_exist() {
        let sheet = StyleSheet::builtin();
        assert!(sheet.resolve("Medium Shading 1 Accent 3", StyleKind::Table).is_ok());
        assert!(sheet.resolve("Table Grid", StyleKind::Table).is_ok());
    }

    #[test]
    fn unknown_style_is_an_error() {
        let err = StyleSheet::builtin()
            .resolve("Fancy Body", StyleKind::Paragraph)
            .unwrap_err();
        assert!(matches!(err, Md2DocxError::StyleNotFound { style } if style == "Fancy Body"));
    }

    #[test]
    fn kind_mismatch_is_not_found() {
        let sheet = StyleSheet::builtin();
        assert!(sheet.resolve("Table Grid", StyleKind::Paragraph).is_err());
        assert!(sheet.resolve("Body Text", StyleKind::Table).is_err());
    }

    #[test]
    fn list_styles_carry_numbering() {
        let sheet = StyleSheet::builtin();
        let s = sheet.resolve("List Number 3", StyleKind::Paragraph).unwrap();
        assert_eq!(
            s.numbering,
            Some(ListNumbering {
                numbering_id: DECIMAL_NUMBERING_ID,
                level: 2
            })
        );
    }

    #[test]
    fn heading_ids() {
        assert_eq!(StyleSheet::heading_id(0), Some("Title"));
        assert_eq!(StyleSheet::heading_id(3), Some("Heading3"));
        assert_eq!(StyleSheet::heading_id(5), None);
    }
}
