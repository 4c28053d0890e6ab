//! Markdown → HTML using pulldown-cmark.
//!
//! The dialect is fixed per conversion by [`MarkdownExtensions`]:
//!
//! - fenced code blocks (always on, CommonMark)
//! - code-friendly mode: `_x_` and `__x__` are never emphasis
//! - GFM pipe tables
//! - wiki tables (`|| a || b ||`), rewritten to pipe tables before parsing
//!
//! Code-friendly mode works on the event stream rather than the source text:
//! emphasis events whose opening delimiter is an underscore are replaced by the
//! literal delimiters, so `*x*` still renders as emphasis.

use crate::config::MarkdownExtensions;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use tracing::debug;

/// Render markdown to an HTML fragment.
pub fn markdown_to_html(text: &str, extensions: &MarkdownExtensions) -> String {
    let source = if extensions.wiki_tables {
        rewrite_wiki_tables(text)
    } else {
        text.to_string()
    };

    let mut options = Options::empty();
    if extensions.tables || extensions.wiki_tables {
        options.insert(Options::ENABLE_TABLES);
    }

    let mut out = String::with_capacity(source.len() * 3 / 2);
    let parser = Parser::new_ext(&source, options);
    if extensions.code_friendly {
        let mut underscore_stack: Vec<bool> = Vec::new();
        let events = parser.into_offset_iter().map(|(event, range)| match event {
            Event::Start(tag @ (Tag::Emphasis | Tag::Strong)) => {
                let underscore = source[range.start..].starts_with('_');
                underscore_stack.push(underscore);
                if underscore {
                    Event::Text(delimiter_for_start(&tag))
                } else {
                    Event::Start(tag)
                }
            }
            Event::End(end @ (TagEnd::Emphasis | TagEnd::Strong)) => {
                if underscore_stack.pop().unwrap_or(false) {
                    Event::Text(delimiter_for_end(end))
                } else {
                    Event::End(end)
                }
            }
            other => other,
        });
        html::push_html(&mut out, events);
    } else {
        html::push_html(&mut out, parser);
    }

    debug!("Rendered {} bytes of markdown → {} bytes of HTML", text.len(), out.len());
    out
}

fn delimiter_for_start(tag: &Tag<'_>) -> CowStr<'static> {
    match tag {
        Tag::Strong => CowStr::Borrowed("__"),
        _ => CowStr::Borrowed("_"),
    }
}

fn delimiter_for_end(end: TagEnd) -> CowStr<'static> {
    match end {
        TagEnd::Strong => CowStr::Borrowed("__"),
        _ => CowStr::Borrowed("_"),
    }
}

// ── Wiki tables ──────────────────────────────────────────────────────────────

static RE_WIKI_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\|\|.*\|\|\s*$").unwrap());

/// Rewrite every block of `|| a || b ||` rows into a GFM pipe table.
///
/// The first row of each block becomes the header row. Header markers
/// (`||= a =||` and `||~ a ||`) are stripped. Rows inside fenced code blocks are
/// left alone.
pub fn rewrite_wiki_tables(input: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;

    for line in input.lines() {
        let trimmed = line.trim_start();
        if let Some((ch, len)) = fence {
            // A closing fence uses the same character, at least as many times.
            if fence_run(trimmed).is_some_and(|(c, n)| c == ch && n >= len) {
                fence = None;
            }
            out.push(line.to_string());
            continue;
        }
        if let Some(run) = fence_run(trimmed) {
            flush_wiki_block(&mut block, &mut out);
            fence = Some(run);
            out.push(line.to_string());
            continue;
        }
        if RE_WIKI_ROW.is_match(line) {
            block.push(line);
        } else {
            flush_wiki_block(&mut block, &mut out);
            out.push(line.to_string());
        }
    }
    flush_wiki_block(&mut block, &mut out);

    let mut joined = out.join("\n");
    if input.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// The fence character and run length opening `line`, if it is a code fence.
fn fence_run(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let n = line.chars().take_while(|c| *c == ch).count();
    (n >= 3).then_some((ch, n))
}

fn flush_wiki_block(block: &mut Vec<&str>, out: &mut Vec<String>) {
    if block.is_empty() {
        return;
    }
    for (i, row) in block.iter().enumerate() {
        let cells = wiki_cells(row);
        out.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            let sep: Vec<&str> = std::iter::repeat_n("---", cells.len()).collect();
            out.push(format!("| {} |", sep.join(" | ")));
        }
    }
    // A pipe table must be followed by a blank line before the next paragraph.
    out.push(String::new());
    block.clear();
}

fn wiki_cells(row: &str) -> Vec<String> {
    let inner = row.trim();
    let inner = inner.strip_prefix("||").unwrap_or(inner);
    let inner = inner.strip_suffix("||").unwrap_or(inner);
    inner
        .split("||")
        .map(|cell| {
            cell.trim()
                .trim_start_matches(['=', '~'])
                .trim_end_matches('=')
                .trim()
                .replace('|', "\\|")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(md: &str) -> String {
        markdown_to_html(md, &MarkdownExtensions::default())
    }

    #[test]
    fn heading_and_paragraph() {
        let html = render("# Title\n\nBody text\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Body text</p>"));
    }

    #[test]
    fn fenced_code_block() {
        let html = render("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre><code"), "got: {html}");
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn pipe_table_has_thead() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<thead>"), "got: {html}");
        assert!(html.contains("<th>A</th>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn code_friendly_keeps_underscores_literal() {
        let html = render("call my_func_name and _not emphasis_ here\n");
        assert!(!html.contains("<em>"), "got: {html}");
        assert!(html.contains("_not emphasis_"));
    }

    #[test]
    fn code_friendly_keeps_double_underscores_literal() {
        let html = render("__dunder__\n");
        assert!(!html.contains("<strong>"), "got: {html}");
        assert!(html.contains("__dunder__"));
    }

    #[test]
    fn code_friendly_still_allows_star_emphasis() {
        let html = render("*yes* and **bold**\n");
        assert!(html.contains("<em>yes</em>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn underscore_emphasis_without_code_friendly() {
        let ext = MarkdownExtensions {
            code_friendly: false,
            ..MarkdownExtensions::default()
        };
        let html = markdown_to_html("_yes_\n", &ext);
        assert!(html.contains("<em>yes</em>"));
    }

    #[test]
    fn wiki_table_becomes_pipe_table() {
        let md = "|| Year || Low ||\n|| 1900 || -10 ||\n";
        let rewritten = rewrite_wiki_tables(md);
        assert!(rewritten.starts_with("| Year | Low |\n| --- | --- |\n| 1900 | -10 |"));
        let html = render(md);
        assert!(html.contains("<th>Year</th>"), "got: {html}");
        assert!(html.contains("<td>-10</td>"));
    }

    #[test]
    fn wiki_header_markers_are_stripped() {
        let rewritten = rewrite_wiki_tables("||= Name =||= Age =||\n|| Ann || 30 ||\n");
        assert!(rewritten.starts_with("| Name | Age |"), "got: {rewritten}");
    }

    #[test]
    fn wiki_tilde_header_markers_are_stripped() {
        let html = render("||~ Year ||~ Low ||\n|| 1900 || -10 ||\n");
        assert!(html.contains("<th>Year</th>"), "got: {html}");
        assert!(html.contains("<th>Low</th>"));
        assert!(!html.contains('~'));
    }

    #[test]
    fn longer_fence_is_not_closed_by_shorter_one() {
        let md = "````\n```\n|| still || code ||\n```\n````\n";
        assert_eq!(rewrite_wiki_tables(md), md);
    }

    #[test]
    fn wiki_rows_after_long_fence_are_rewritten() {
        let md = "````\ncode\n````\n|| A ||\n|| 1 ||\n";
        let rewritten = rewrite_wiki_tables(md);
        assert!(rewritten.contains("| A |\n| --- |\n| 1 |"), "got: {rewritten}");
    }

    #[test]
    fn wiki_rows_inside_fences_untouched() {
        let md = "```\n|| not || a table ||\n```\n";
        assert_eq!(rewrite_wiki_tables(md), md);
    }

    #[test]
    fn wiki_rewrite_is_noop_without_rows() {
        let md = "# Heading\n\ntext\n";
        assert_eq!(rewrite_wiki_tables(md), md);
    }
}
