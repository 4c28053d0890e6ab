//! CLI binary for markdown2docx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use markdown2docx::{
    convert, convert_with_html, ConversionConfig, ConversionOutput, MarkdownInput, PageSize,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # notes.md → notes.docx
  md2docx notes.md

  # Stem form, custom output, keep the intermediate HTML
  md2docx notes -o out/notes.docx --write-html

  # Intermediate HTML at a chosen path
  md2docx notes.md --html-output debug/notes.html

  # Markdown from stdin → output.docx
  cat answer.md | md2docx -

  # Several files at once, A4 pages
  md2docx --page-size a4 hw1.md hw2.md hw3.md

  # Fill {{ student }} and {{ course }} placeholders
  md2docx --token student="Ada Lovelace" --token course=CS101 report.md

  # Settings from a JSON file, summary as JSON
  md2docx --config md2docx.json --json report.md

CONFIG FILE:
  JSON object with any of the ConversionConfig fields, for example
    { "toc_marker": "contents", "rule_length": 60,
      "styles": { "body": "Normal" }, "page_size": "A4" }
  Command-line flags override values from the file.

ENVIRONMENT VARIABLES:
  RUST_LOG                Log filter (overrides -v / -q)
  MD2DOCX_CONFIG          Path to a JSON config file
  MD2DOCX_PAGE_SIZE       letter or a4
  MD2DOCX_IMAGE_DIR       Base directory for relative image paths
"#;

/// Convert markdown files to Word documents.
#[derive(Parser, Debug)]
#[command(
    name = "md2docx",
    version,
    about = "Convert markdown files to Word (.docx) documents",
    long_about = "Convert markdown to Word documents. Headings, paragraphs, images, tables, \
nested lists, code blocks and horizontal rules are mapped to styled Word content; a second \
mention of the table-of-contents marker becomes a TOC field.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file (`notes.md`), project stem (`notes`), or `-` for stdin.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output .docx path (single input only).
    #[arg(short, long, env = "MD2DOCX_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the intermediate HTML (`<stem>.html` or `output.html`).
    #[arg(long, env = "MD2DOCX_WRITE_HTML")]
    write_html: bool,

    /// Write the intermediate HTML to this path (single input only).
    #[arg(long, value_name = "PATH", env = "MD2DOCX_HTML_OUTPUT")]
    html_output: Option<PathBuf>,

    /// JSON file with ConversionConfig fields.
    #[arg(long, env = "MD2DOCX_CONFIG")]
    config: Option<PathBuf>,

    /// Substitute `{{ KEY }}` with VALUE in file inputs (repeatable).
    #[arg(long = "token", value_name = "KEY=VALUE", value_parser = parse_token)]
    tokens: Vec<(String, String)>,

    /// Word whose second occurrence becomes a table of contents.
    #[arg(long, env = "MD2DOCX_TOC_MARKER")]
    toc_marker: Option<String>,

    /// Pixel density assumed when sizing images.
    #[arg(long, env = "MD2DOCX_PIXELS_PER_INCH",
          value_parser = clap::value_parser!(u32).range(1..))]
    pixels_per_inch: Option<u32>,

    /// Widest an image may be, as a fraction of page width (0–1].
    #[arg(long, env = "MD2DOCX_PICTURE_FRACTION")]
    picture_fraction: Option<f64>,

    /// Character used to draw horizontal rules.
    #[arg(long, env = "MD2DOCX_RULE_CHAR")]
    rule_char: Option<char>,

    /// Length of horizontal rules in characters.
    #[arg(long, env = "MD2DOCX_RULE_LENGTH")]
    rule_length: Option<usize>,

    /// Page size.
    #[arg(long, env = "MD2DOCX_PAGE_SIZE", value_enum)]
    page_size: Option<PageSizeArg>,

    /// Paragraph style for body text.
    #[arg(long, env = "MD2DOCX_BODY_STYLE")]
    body_style: Option<String>,

    /// Table style for markdown tables.
    #[arg(long, env = "MD2DOCX_TABLE_STYLE")]
    table_style: Option<String>,

    /// Paragraph style for quoted text.
    #[arg(long, env = "MD2DOCX_QUOTE_STYLE")]
    quote_style: Option<String>,

    /// Table style boxing code blocks.
    #[arg(long, env = "MD2DOCX_QUOTE_TABLE_STYLE")]
    quote_table_style: Option<String>,

    /// Base directory for relative image paths.
    #[arg(long, env = "MD2DOCX_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// Print a JSON summary (ConversionOutput per input) on stdout.
    #[arg(long, env = "MD2DOCX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "MD2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2DOCX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    Letter,
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

fn parse_token(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty token name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs for multi-file runs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.output.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!("--output can only be used with a single input");
    }
    if cli.html_output.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!("--html-output can only be used with a single input");
    }
    if cli.inputs.iter().filter(|i| i.as_str() == "-").count() > 1 {
        anyhow::bail!("stdin ('-') can only be given once");
    }

    let config = build_config(&cli)?;

    let bar = if show_progress {
        let bar = ProgressBar::new(cli.inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    // ── Run conversions ──────────────────────────────────────────────────
    let mut outputs: Vec<ConversionOutput> = Vec::with_capacity(cli.inputs.len());
    for raw in &cli.inputs {
        if let Some(ref bar) = bar {
            bar.set_message(raw.clone());
        }
        let input = resolve_input(raw)?;
        let result = match cli.html_output {
            Some(ref html) => {
                convert_with_html(input, cli.output.clone(), Some(html.clone()), &config)
            }
            None => convert(input, cli.output.clone(), &config, cli.write_html),
        }
        .with_context(|| format!("Conversion of '{raw}' failed"));

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                if let Some(ref bar) = bar {
                    bar.println(format!("  {} {}", red("✗"), raw));
                    bar.abandon();
                }
                return Err(e);
            }
        };

        if let Some(ref bar) = bar {
            bar.println(format!(
                "  {} {}  →  {}",
                green("✓"),
                raw,
                dim(&output.output_path.display().to_string())
            ));
            bar.inc(1);
        } else if !cli.quiet && !cli.json {
            print_summary(&output);
        }
        outputs.push(output);
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
        eprintln!(
            "{} {} files converted",
            green("✔"),
            bold(&outputs.len().to_string())
        );
    }

    if cli.json {
        let json = if outputs.len() == 1 {
            serde_json::to_string_pretty(&outputs[0])
        } else {
            serde_json::to_string_pretty(&outputs)
        }
        .context("Failed to serialise output")?;
        println!("{json}");
    }

    Ok(())
}

fn resolve_input(raw: &str) -> Result<MarkdownInput> {
    if raw == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read markdown from stdin")?;
        Ok(MarkdownInput::text(text))
    } else {
        Ok(MarkdownInput::file(raw))
    }
}

fn print_summary(output: &ConversionOutput) {
    let s = &output.stats;
    eprintln!(
        "{}  {}  {}ms",
        green("✔"),
        bold(&output.output_path.display().to_string()),
        s.total_duration_ms,
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{} headings · {} paragraphs · {} list items · {} tables · {} code blocks · {} pictures{}",
            s.blocks.headings,
            s.blocks.paragraphs,
            s.blocks.list_items,
            s.blocks.tables,
            s.blocks.code_blocks,
            s.blocks.pictures,
            if s.blocks.toc_inserted { " · TOC" } else { "" },
        ))
    );
    if let Some(ref html) = output.html_path {
        eprintln!("   HTML: {}", dim(&html.display().to_string()));
    }
}

/// Map CLI args to `ConversionConfig`, layered over an optional JSON file.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let base = match cli.config {
        Some(ref path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            ConversionConfig::from_json(&json)
                .with_context(|| format!("Invalid config file {:?}", path))?
        }
        None => ConversionConfig::default(),
    };

    let mut builder = ConversionConfig::builder()
        .table_style(cli.table_style.clone().unwrap_or(base.styles.table))
        .quote_style(cli.quote_style.clone().unwrap_or(base.styles.quote))
        .body_style(cli.body_style.clone().unwrap_or(base.styles.body))
        .quote_table_style(
            cli.quote_table_style
                .clone()
                .unwrap_or(base.styles.quote_table),
        )
        .toc_marker(cli.toc_marker.clone().unwrap_or(base.toc_marker))
        .assumed_pixels_per_inch(cli.pixels_per_inch.unwrap_or(base.assumed_pixels_per_inch))
        .picture_fraction_of_width(
            cli.picture_fraction
                .unwrap_or(base.picture_fraction_of_width),
        )
        .rule_char(cli.rule_char.unwrap_or(base.rule_char))
        .rule_length(cli.rule_length.unwrap_or(base.rule_length))
        .page_size(cli.page_size.map(PageSize::from).unwrap_or(base.page_size))
        .extensions(base.extensions);

    if let Some(dir) = cli.image_dir.clone().or(base.image_dir) {
        builder = builder.image_dir(dir);
    }
    for (key, value) in base.tokens.into_iter().chain(cli.tokens.iter().cloned()) {
        builder = builder.token(key, value);
    }

    builder.build().context("Invalid configuration")
}
