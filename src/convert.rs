//! Conversion entry points.
//!
//! A [`Conversion`] is created from a [`MarkdownInput`]; creating it reads
//! and preprocesses the markdown and renders the HTML. Nothing touches the
//! output path until [`Conversion::save`], which maps the whole document
//! first and writes the file once at the end.

use crate::config::ConversionConfig;
use crate::document::DocumentAssembler;
use crate::error::Md2DocxError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::html::parse_html;
use crate::pipeline::map::{MapStats, Mapper};
use crate::pipeline::markdown::markdown_to_html;
use crate::preprocess::{Preprocessor, TokenPreprocessor};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Default output for text inputs.
pub const DEFAULT_OUTPUT: &str = "output.docx";
/// Default HTML dump for text inputs.
pub const DEFAULT_HTML_OUTPUT: &str = "output.html";

/// Where the markdown comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownInput {
    /// A project stem: the markdown lives in `<stem>.md`.
    File(PathBuf),
    /// Markdown text used as-is.
    Text(String),
}

impl MarkdownInput {
    /// File input from a stem or a path ending in `.md`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_md = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if is_md {
            MarkdownInput::File(path.with_extension(""))
        } else {
            MarkdownInput::File(path)
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        MarkdownInput::Text(text.into())
    }

    pub fn stem(&self) -> Option<&Path> {
        match self {
            MarkdownInput::File(stem) => Some(stem),
            MarkdownInput::Text(_) => None,
        }
    }

    /// `<stem>.docx`, or `output.docx` for text.
    pub fn default_output(&self) -> PathBuf {
        match self {
            MarkdownInput::File(stem) => with_suffix(stem, ".docx"),
            MarkdownInput::Text(_) => PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    /// `<stem>.html`, or `output.html` for text.
    pub fn default_html_output(&self) -> PathBuf {
        match self {
            MarkdownInput::File(stem) => with_suffix(stem, ".html"),
            MarkdownInput::Text(_) => PathBuf::from(DEFAULT_HTML_OUTPUT),
        }
    }

    /// Directory relative image paths resolve against when none is configured.
    fn default_image_dir(&self) -> PathBuf {
        match self.stem().and_then(Path::parent) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = stem.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// One markdown-to-DOCX conversion.
#[derive(Debug)]
pub struct Conversion<'c> {
    config: &'c ConversionConfig,
    input: MarkdownInput,
    output_path: PathBuf,
    html_path: PathBuf,
    image_dir: PathBuf,
    markdown_bytes: usize,
    html: String,
    html_written: bool,
    started: Instant,
}

impl<'c> Conversion<'c> {
    /// Read the markdown and render it to HTML.
    ///
    /// File inputs go through a [`TokenPreprocessor`] built from
    /// `config.tokens`. `output` defaults to [`MarkdownInput::default_output`].
    pub fn new(
        input: MarkdownInput,
        output: Option<PathBuf>,
        config: &'c ConversionConfig,
    ) -> Result<Self, Md2DocxError> {
        let preprocessor = TokenPreprocessor::new(config.tokens.clone());
        Self::with_preprocessor(input, output, config, &preprocessor)
    }

    /// Like [`Conversion::new`] with a caller-supplied preprocessor.
    pub fn with_preprocessor(
        input: MarkdownInput,
        output: Option<PathBuf>,
        config: &'c ConversionConfig,
        preprocessor: &dyn Preprocessor,
    ) -> Result<Self, Md2DocxError> {
        let started = Instant::now();
        config.validate()?;

        let markdown = match &input {
            MarkdownInput::File(stem) => {
                info!("Reading markdown project: {}", stem.display());
                preprocessor.preprocess(stem)?
            }
            MarkdownInput::Text(text) => {
                info!("Converting {} bytes of markdown text", text.len());
                text.clone()
            }
        };
        let html = markdown_to_html(&markdown, &config.extensions);

        let output_path = output.unwrap_or_else(|| input.default_output());
        let html_path = input.default_html_output();
        let image_dir = config
            .image_dir
            .clone()
            .unwrap_or_else(|| input.default_image_dir());
        debug!(
            "Output: {}, images relative to {}",
            output_path.display(),
            image_dir.display()
        );

        Ok(Self {
            config,
            input,
            output_path,
            html_path,
            image_dir,
            markdown_bytes: markdown.len(),
            html,
            html_written: false,
            started,
        })
    }

    pub fn input(&self) -> &MarkdownInput {
        &self.input
    }

    /// The intermediate HTML.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn html_path(&self) -> &Path {
        &self.html_path
    }

    /// Dump the HTML to `path` instead of [`MarkdownInput::default_html_output`].
    pub fn with_html_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.html_path = path.into();
        self
    }

    /// Write the intermediate HTML to [`Conversion::html_path`].
    pub fn write_html(&mut self) -> Result<&Path, Md2DocxError> {
        if let Some(parent) = self.html_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Md2DocxError::OutputWriteFailed {
                path: self.html_path.clone(),
                source: e,
            })?;
        }
        std::fs::write(&self.html_path, &self.html).map_err(|e| {
            Md2DocxError::OutputWriteFailed {
                path: self.html_path.clone(),
                source: e,
            }
        })?;
        info!("Wrote HTML: {}", self.html_path.display());
        self.html_written = true;
        Ok(&self.html_path)
    }

    /// Map the HTML into a fresh document without writing anything.
    pub fn render(&self) -> Result<(DocumentAssembler, MapStats), Md2DocxError> {
        let root = parse_html(&self.html);
        let mut doc = DocumentAssembler::new(self.config.page_size);
        let mut mapper = Mapper::new(self.config, &self.image_dir);
        mapper.map_document(&root, &mut doc)?;
        Ok((doc, mapper.into_stats()))
    }

    /// Render and write the `.docx`.
    pub fn save(self) -> Result<ConversionOutput, Md2DocxError> {
        let (doc, blocks) = self.render()?;
        doc.save(&self.output_path)?;

        let docx_bytes = std::fs::metadata(&self.output_path)
            .map(|m| m.len())
            .unwrap_or(0);
        let stats = ConversionStats {
            markdown_bytes: self.markdown_bytes,
            html_bytes: self.html.len(),
            blocks,
            docx_bytes,
            total_duration_ms: self.started.elapsed().as_millis() as u64,
        };
        info!(
            "Conversion complete: {} headings, {} paragraphs, {} tables, {} pictures, {}ms",
            stats.blocks.headings,
            stats.blocks.paragraphs,
            stats.blocks.tables,
            stats.blocks.pictures,
            stats.total_duration_ms
        );

        Ok(ConversionOutput {
            output_path: self.output_path,
            html_path: self.html_written.then_some(self.html_path),
            stats,
        })
    }
}

/// Convert `input`, optionally dumping the HTML, and return what was written.
pub fn convert(
    input: MarkdownInput,
    output: Option<PathBuf>,
    config: &ConversionConfig,
    write_html: bool,
) -> Result<ConversionOutput, Md2DocxError> {
    if write_html {
        return convert_with_html(input, output, None, config);
    }
    Conversion::new(input, output, config)?.save()
}

/// Convert `input` and always dump the HTML, to `html_output` when given or
/// to the input's default HTML path.
pub fn convert_with_html(
    input: MarkdownInput,
    output: Option<PathBuf>,
    html_output: Option<PathBuf>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2DocxError> {
    let mut conversion = Conversion::new(input, output, config)?;
    if let Some(path) = html_output {
        conversion = conversion.with_html_path(path);
    }
    conversion.write_html()?;
    conversion.save()
}

/// Convert `input` to a `.docx` and return its path.
///
/// The output's parent directory is created if missing.
///
/// # Example
/// ```rust,no_run
/// use markdown2docx::{convert_markdown_to_docx, ConversionConfig, MarkdownInput};
///
/// let path = convert_markdown_to_docx(
///     MarkdownInput::text("# Solution\n\nThe answer is 42.\n"),
///     Some("out/solution.docx".into()),
///     &ConversionConfig::default(),
/// )?;
/// assert!(path.ends_with("solution.docx"));
/// # Ok::<(), markdown2docx::Md2DocxError>(())
/// ```
pub fn convert_markdown_to_docx(
    input: MarkdownInput,
    output: Option<PathBuf>,
    config: &ConversionConfig,
) -> Result<PathBuf, Md2DocxError> {
    convert(input, output, config, false).map(|out| out.output_path)
}
