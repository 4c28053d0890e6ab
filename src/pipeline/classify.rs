//! Classification of top-level HTML nodes into the kinds the mapper emits.
//!
//! The order of the checks in [`classify`] is the precedence of the mapping
//! rules: a heading that contains `<em>` is an [`NodeKind::Emphasis`] node, a
//! paragraph that contains `<img>` is an [`NodeKind::Image`] node, and so on.
//! The table-of-contents marker is not a kind: it depends on how many markers
//! the walk has already seen, so the mapper checks it before consulting the
//! kind.

use super::html::HtmlNode;

/// What a top-level node maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element containing `<em>`: emitted as a body paragraph of its text.
    Emphasis { text: String },
    /// `<hr>`.
    Rule,
    /// `<h1>`–`<h4>`; level 0 is the title.
    Heading { level: u8, text: String },
    /// `<p>` containing an `<img src=…>`.
    Image { src: String },
    /// Any other `<p>`.
    Paragraph { text: String },
    /// `<pre>`.
    CodeBlock { text: String },
    /// `<table>`; `index` counts tables among the top-level nodes.
    Table { index: usize },
    /// `<ul>` or `<ol>`.
    List { ordered: bool },
    /// Bare text between block elements.
    PlainText,
    /// Anything else, including `<h5>`/`<h6>` and custom tags.
    Unknown { tag: String },
}

/// One top-level node with its kind.
#[derive(Debug)]
pub struct Classified<'a> {
    pub node: &'a HtmlNode,
    pub kind: NodeKind,
}

/// Classify every child of `root`, numbering tables in document order.
pub fn classify_children(root: &HtmlNode) -> Vec<Classified<'_>> {
    let mut table_index = 0;
    root.children()
        .iter()
        .map(|node| {
            let kind = classify(node, &mut table_index);
            Classified { node, kind }
        })
        .collect()
}

/// Top-level `<table>` elements in document order.
///
/// [`NodeKind::Table::index`] indexes into this list.
pub fn prescan_tables(root: &HtmlNode) -> Vec<&HtmlNode> {
    root.children()
        .iter()
        .filter(|n| n.is_element("table"))
        .collect()
}

fn classify(node: &HtmlNode, table_index: &mut usize) -> NodeKind {
    let tag = match node {
        HtmlNode::Text(_) => return NodeKind::PlainText,
        HtmlNode::Element { tag, .. } => tag.as_str(),
    };

    if node.find("em").is_some() {
        return NodeKind::Emphasis {
            text: node.text().trim().to_string(),
        };
    }

    match tag {
        "hr" => NodeKind::Rule,
        "h1" | "h2" | "h3" | "h4" => NodeKind::Heading {
            level: heading_level(tag),
            text: node.text().trim().to_string(),
        },
        "p" => match node.find("img").and_then(|img| img.attr("src")) {
            Some(src) if !src.trim().is_empty() => NodeKind::Image {
                src: src.trim().to_string(),
            },
            _ => NodeKind::Paragraph {
                text: node.text().trim().to_string(),
            },
        },
        "pre" => NodeKind::CodeBlock { text: node.text() },
        "table" => {
            let index = *table_index;
            *table_index += 1;
            NodeKind::Table { index }
        }
        "ul" => NodeKind::List { ordered: false },
        "ol" => NodeKind::List { ordered: true },
        other => NodeKind::Unknown {
            tag: other.to_string(),
        },
    }
}

fn heading_level(tag: &str) -> u8 {
    match tag {
        "h1" => 0,
        "h2" => 1,
        "h3" => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::html::parse_html;

    fn kinds(html: &str) -> Vec<NodeKind> {
        let root = parse_html(html);
        classify_children(&root)
            .into_iter()
            .map(|c| c.kind)
            .filter(|k| *k != NodeKind::PlainText)
            .collect()
    }

    #[test]
    fn headings_map_to_levels_zero_through_three() {
        let k = kinds("<h1>a</h1><h2>b</h2><h3>c</h3><h4>d</h4>");
        let levels: Vec<u8> = k
            .iter()
            .map(|k| match k {
                NodeKind::Heading { level, .. } => *level,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(levels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn h5_is_unknown() {
        assert_eq!(
            kinds("<h5>small</h5>"),
            vec![NodeKind::Unknown { tag: "h5".into() }]
        );
    }

    #[test]
    fn emphasis_wins_over_heading() {
        assert_eq!(
            kinds("<h2>A <em>stressed</em> title</h2>"),
            vec![NodeKind::Emphasis {
                text: "A stressed title".into()
            }]
        );
    }

    #[test]
    fn strong_is_not_emphasis() {
        assert_eq!(
            kinds("<p><strong>bold</strong></p>"),
            vec![NodeKind::Paragraph {
                text: "bold".into()
            }]
        );
    }

    #[test]
    fn paragraph_with_image() {
        assert_eq!(
            kinds(r#"<p><img src="fig.png" alt="fig"></p>"#),
            vec![NodeKind::Image {
                src: "fig.png".into()
            }]
        );
    }

    #[test]
    fn image_without_src_is_plain_paragraph() {
        assert_eq!(
            kinds(r#"<p>before<img alt="x">after</p>"#),
            vec![NodeKind::Paragraph {
                text: "beforeafter".into()
            }]
        );
    }

    #[test]
    fn tables_are_numbered_in_order() {
        let k = kinds("<table></table><p>x</p><table></table>");
        assert_eq!(k[0], NodeKind::Table { index: 0 });
        assert_eq!(k[2], NodeKind::Table { index: 1 });
    }

    #[test]
    fn prescan_matches_table_indices() {
        let root = parse_html("<table id=\"a\"></table><p>x</p><table id=\"b\"></table>");
        let tables = prescan_tables(&root);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].attr("id"), Some("b"));
    }

    #[test]
    fn lists_rules_and_code() {
        assert_eq!(
            kinds("<ul><li>a</li></ul><ol><li>b</li></ol><hr><pre><code>x\n</code></pre>"),
            vec![
                NodeKind::List { ordered: false },
                NodeKind::List { ordered: true },
                NodeKind::Rule,
                NodeKind::CodeBlock { text: "x\n".into() },
            ]
        );
    }

    #[test]
    fn bare_text_is_plain_text() {
        let root = parse_html("loose text");
        let c = classify_children(&root);
        assert_eq!(c[0].kind, NodeKind::PlainText);
    }
}
