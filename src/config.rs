//! Configuration types for markdown-to-DOCX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`] or loaded from JSON with serde. Every
//! field has a default matching the behaviour callers expect out of the box,
//! so most code only ever calls [`ConversionConfig::default()`].

use crate::error::Md2DocxError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Twips per inch in WordprocessingML page geometry.
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Configuration for a markdown-to-DOCX conversion.
///
/// # Example
/// ```rust
/// use markdown2docx::{ConversionConfig, PageSize};
///
/// let config = ConversionConfig::builder()
///     .page_size(PageSize::A4)
///     .picture_fraction_of_width(0.5)
///     .toc_marker("inhalt")
///     .build()
///     .unwrap();
/// assert_eq!(config.toc_marker, "inhalt");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Style names applied to generated content.
    pub styles: StyleNames,

    /// Marker word whose second occurrence becomes a table-of-contents field.
    /// Matched case-insensitively against each top-level node's text. Default: `contents`.
    pub toc_marker: String,

    /// Pixel density used to turn an image's pixel width into inches. Default: 200.
    pub assumed_pixels_per_inch: u32,

    /// Widest an image may be, as a fraction of the page width. Default: 0.7.
    pub picture_fraction_of_width: f64,

    /// Character repeated to draw a horizontal rule. Default: `_`.
    pub rule_char: char,

    /// Number of `rule_char` repetitions in a horizontal rule. Default: 80.
    pub rule_length: usize,

    /// Physical page size of the output document. Default: US Letter.
    pub page_size: PageSize,

    /// Markdown dialect switches.
    pub extensions: MarkdownExtensions,

    /// Directory relative image paths are resolved against.
    ///
    /// When `None`, file inputs use the markdown file's directory and text
    /// inputs use the current working directory.
    pub image_dir: Option<PathBuf>,

    /// Values substituted for `{{ name }}` tokens when preprocessing file inputs.
    pub tokens: BTreeMap<String, String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            styles: StyleNames::default(),
            toc_marker: "contents".to_string(),
            assumed_pixels_per_inch: 200,
            picture_fraction_of_width: 0.7,
            rule_char: '_',
            rule_length: 80,
            page_size: PageSize::default(),
            extensions: MarkdownExtensions::default(),
            image_dir: None,
            tokens: BTreeMap::new(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parse a JSON document into a validated configuration.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, Md2DocxError> {
        let config: ConversionConfig = serde_json::from_str(json)
            .map_err(|e| Md2DocxError::InvalidConfig(format!("JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the builder enforces.
    pub fn validate(&self) -> Result<(), Md2DocxError> {
        if self.assumed_pixels_per_inch == 0 {
            return Err(Md2DocxError::InvalidConfig(
                "assumed_pixels_per_inch must be ≥ 1".into(),
            ));
        }
        if !(self.picture_fraction_of_width > 0.0 && self.picture_fraction_of_width <= 1.0) {
            return Err(Md2DocxError::InvalidConfig(format!(
                "picture_fraction_of_width must be in (0, 1], got {}",
                self.picture_fraction_of_width
            )));
        }
        if self.toc_marker.trim().is_empty() {
            return Err(Md2DocxError::InvalidConfig(
                "toc_marker must not be empty".into(),
            ));
        }
        if self.page_size.width_twips() == 0 || self.page_size.height_twips() == 0 {
            return Err(Md2DocxError::InvalidConfig(
                "page size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn table_style(mut self, name: impl Into<String>) -> Self {
        self.config.styles.table = name.into();
        self
    }

    pub fn quote_style(mut self, name: impl Into<String>) -> Self {
        self.config.styles.quote = name.into();
        self
    }

    pub fn body_style(mut self, name: impl Into<String>) -> Self {
        self.config.styles.body = name.into();
        self
    }

    pub fn quote_table_style(mut self, name: impl Into<String>) -> Self {
        self.config.styles.quote_table = name.into();
        self
    }

    pub fn toc_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.toc_marker = marker.into().to_lowercase();
        self
    }

    pub fn assumed_pixels_per_inch(mut self, ppi: u32) -> Self {
        self.config.assumed_pixels_per_inch = ppi;
        self
    }

    pub fn picture_fraction_of_width(mut self, fraction: f64) -> Self {
        self.config.picture_fraction_of_width = fraction;
        self
    }

    pub fn rule_char(mut self, c: char) -> Self {
        self.config.rule_char = c;
        self
    }

    pub fn rule_length(mut self, n: usize) -> Self {
        self.config.rule_length = n;
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn extensions(mut self, extensions: MarkdownExtensions) -> Self {
        self.config.extensions = extensions;
        self
    }

    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.image_dir = Some(dir.into());
        self
    }

    pub fn token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.tokens.insert(name.into(), value.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2DocxError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Nested option groups ─────────────────────────────────────────────────

/// Style names the mapper applies, resolved against the document style sheet.
///
/// Names are user-facing style names ("Body Text"), not style ids ("BodyText");
/// both forms resolve. A name the style sheet does not know fails the
/// conversion with [`Md2DocxError::StyleNotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleNames {
    /// Style for tables built from markdown tables. Default: `Medium Shading 1 Accent 3`.
    pub table: String,
    /// Style for quoted prose. Default: `Body Text`.
    pub quote: String,
    /// Style for ordinary paragraphs. Default: `Body Text`.
    pub body: String,
    /// Bordered table style used to box code blocks. Default: `Table Grid`.
    pub quote_table: String,
}

impl Default for StyleNames {
    fn default() -> Self {
        Self {
            table: "Medium Shading 1 Accent 3".to_string(),
            quote: "Body Text".to_string(),
            body: "Body Text".to_string(),
            quote_table: "Table Grid".to_string(),
        }
    }
}

/// Markdown dialect switches passed to the parser.
///
/// Fenced code blocks are part of CommonMark and always enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownExtensions {
    /// Underscores never start emphasis, so `snake_case_names` stay literal.
    pub code_friendly: bool,
    /// GFM pipe tables.
    pub tables: bool,
    /// `|| cell || cell ||` tables; first row becomes the header row.
    pub wiki_tables: bool,
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self {
            code_friendly: true,
            tables: true,
            wiki_tables: true,
        }
    }
}

/// Physical page size of the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// US Letter, 8.5 × 11 in. (default)
    #[default]
    Letter,
    /// ISO A4, 210 × 297 mm.
    A4,
    /// Arbitrary size in twips (1/1440 in).
    Custom { width_twips: u32, height_twips: u32 },
}

impl PageSize {
    pub fn width_twips(&self) -> u32 {
        match self {
            PageSize::Letter => 12240,
            PageSize::A4 => 11906,
            PageSize::Custom { width_twips, .. } => *width_twips,
        }
    }

    pub fn height_twips(&self) -> u32 {
        match self {
            PageSize::Letter => 15840,
            PageSize::A4 => 16838,
            PageSize::Custom { height_twips, .. } => *height_twips,
        }
    }

    /// Page width in inches.
    pub fn width_inches(&self) -> f64 {
        f64::from(self.width_twips()) / TWIPS_PER_INCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ConversionConfig::default();
        assert_eq!(c.toc_marker, "contents");
        assert_eq!(c.assumed_pixels_per_inch, 200);
        assert!((c.picture_fraction_of_width - 0.7).abs() < f64::EPSILON);
        assert_eq!(c.rule_char, '_');
        assert_eq!(c.rule_length, 80);
        assert_eq!(c.styles.body, "Body Text");
        assert_eq!(c.styles.quote_table, "Table Grid");
        assert_eq!(c.styles.table, "Medium Shading 1 Accent 3");
    }

    #[test]
    fn letter_is_eight_and_a_half_inches() {
        assert!((PageSize::Letter.width_inches() - 8.5).abs() < 1e-9);
    }

    #[test]
    fn builder_rejects_zero_ppi() {
        let err = ConversionConfig::builder()
            .assumed_pixels_per_inch(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Md2DocxError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_fraction_out_of_range() {
        assert!(ConversionConfig::builder()
            .picture_fraction_of_width(1.5)
            .build()
            .is_err());
        assert!(ConversionConfig::builder()
            .picture_fraction_of_width(0.0)
            .build()
            .is_err());
    }

    #[test]
    fn builder_lowercases_marker() {
        let c = ConversionConfig::builder()
            .toc_marker("Contents")
            .build()
            .unwrap();
        assert_eq!(c.toc_marker, "contents");
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let c = ConversionConfig::from_json(r#"{ "rule_length": 40, "page_size": "A4" }"#).unwrap();
        assert_eq!(c.rule_length, 40);
        assert_eq!(c.page_size, PageSize::A4);
        assert_eq!(c.toc_marker, "contents");
        assert_eq!(c.styles.body, "Body Text");
    }

    #[test]
    fn json_rejects_invalid_values() {
        assert!(ConversionConfig::from_json(r#"{ "toc_marker": "  " }"#).is_err());
        assert!(ConversionConfig::from_json("not json").is_err());
    }
}
