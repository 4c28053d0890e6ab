//! Turning a project stem into markdown text.
//!
//! File inputs are named by stem (`notes` for `notes.md`). A [`Preprocessor`]
//! reads the markdown for a stem and may rewrite it before conversion. The
//! default, [`TokenPreprocessor`], substitutes `{{ name }}` placeholders from
//! the configured token table.

use crate::error::Md2DocxError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Produces the markdown text for a project stem.
pub trait Preprocessor {
    fn preprocess(&self, stem: &Path) -> Result<String, Md2DocxError>;
}

/// Path of the markdown file for a stem: `<stem>.md`.
pub fn markdown_path(stem: &Path) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".md");
    PathBuf::from(name)
}

static RE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.-]*)\s*\}\}").unwrap());

/// Reads `<stem>.md` and replaces `{{ name }}` with configured values.
///
/// Unknown names are left in place.
#[derive(Debug, Clone, Default)]
pub struct TokenPreprocessor {
    tokens: BTreeMap<String, String>,
}

impl TokenPreprocessor {
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Substitute tokens in `text`.
    pub fn substitute(&self, text: &str) -> String {
        if self.tokens.is_empty() {
            return text.to_string();
        }
        RE_TOKEN
            .replace_all(text, |caps: &Captures<'_>| match self.tokens.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Preprocessor for TokenPreprocessor {
    fn preprocess(&self, stem: &Path) -> Result<String, Md2DocxError> {
        let path = markdown_path(stem);
        let text =
            std::fs::read_to_string(&path).map_err(|e| Md2DocxError::from_read(&path, e))?;
        debug!("Read {} ({} bytes)", path.display(), text.len());
        Ok(self.substitute(&text))
    }
}
