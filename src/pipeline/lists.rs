//! Nested list flattening.
//!
//! Word has no nested-list container: every list entry is a paragraph whose
//! style encodes its level. [`flatten_list`] walks a `<ul>`/`<ol>` subtree and
//! yields one [`ListLine`] per non-blank text node, tagged with the nesting
//! depth and the kind of the innermost enclosing list.
//!
//! All walk state lives in a [`ListContext`] created per call, so an ordered
//! list never changes how a later unordered list is styled.

use super::html::HtmlNode;

/// Paragraph styles for bullet items at depths 0, 1, 2.
pub const BULLET_STYLES: [&str; 3] = ["List Bullet", "List Bullet 2", "List Bullet 3"];

/// Paragraph styles for numbered items at depths 0, 1, 2.
pub const NUMBER_STYLES: [&str; 3] = ["List Number", "List Number 2", "List Number 3"];

/// Indentation per depth for items deeper than the styled levels.
pub const FALLBACK_SPACING: &str = "    ";

/// Bullet or number list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ul" => Some(ListKind::Bullet),
            "ol" => Some(ListKind::Number),
            _ => None,
        }
    }

    fn styles(self) -> &'static [&'static str; 3] {
        match self {
            ListKind::Bullet => &BULLET_STYLES,
            ListKind::Number => &NUMBER_STYLES,
        }
    }

    /// Marker prefixed to items deeper than the styled levels.
    pub fn fallback_glyph(self) -> &'static str {
        match self {
            ListKind::Bullet => "○  ",
            ListKind::Number => "#  ",
        }
    }
}

/// Walk state: current depth and the kinds of the open lists.
#[derive(Debug)]
pub struct ListContext {
    depth: i32,
    kinds: Vec<ListKind>,
}

impl Default for ListContext {
    fn default() -> Self {
        Self {
            depth: -1,
            kinds: Vec::new(),
        }
    }
}

impl ListContext {
    pub fn depth(&self) -> i32 {
        self.depth
    }

    fn open(&mut self, kind: ListKind) {
        self.depth += 1;
        self.kinds.push(kind);
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.kinds.pop();
    }

    fn current_kind(&self) -> ListKind {
        self.kinds.last().copied().unwrap_or(ListKind::Bullet)
    }
}

/// One emitted list paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    pub depth: i32,
    pub kind: ListKind,
    pub text: String,
}

impl ListLine {
    /// Paragraph style for this line, or `None` past the styled levels.
    pub fn style(&self) -> Option<&'static str> {
        usize::try_from(self.depth)
            .ok()
            .and_then(|d| self.kind.styles().get(d).copied())
    }

    /// Text as it appears in the document: styled lines carry the bare text,
    /// deeper lines are indented by `depth × 4` spaces and get a glyph.
    pub fn rendered_text(&self) -> String {
        if self.style().is_some() {
            return self.text.clone();
        }
        let depth = usize::try_from(self.depth).unwrap_or(0);
        format!(
            "{}{}{}",
            FALLBACK_SPACING.repeat(depth),
            self.kind.fallback_glyph(),
            self.text
        )
    }
}

/// Flatten a list subtree into lines.
pub fn flatten_list(node: &HtmlNode) -> Vec<ListLine> {
    let mut ctx = ListContext::default();
    let mut lines = Vec::new();
    walk(node, &mut ctx, &mut lines);
    debug_assert_eq!(ctx.depth(), -1, "list walk must close every list it opens");
    lines
}

fn walk(node: &HtmlNode, ctx: &mut ListContext, lines: &mut Vec<ListLine>) {
    match node {
        HtmlNode::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(ListLine {
                    depth: ctx.depth(),
                    kind: ctx.current_kind(),
                    text: text.to_string(),
                });
            }
        }
        HtmlNode::Element { tag, children, .. } => {
            let kind = ListKind::from_tag(tag);
            if let Some(kind) = kind {
                ctx.open(kind);
            }
            for child in children {
                walk(child, ctx, lines);
            }
            if kind.is_some() {
                ctx.close();
            }
        }
    }
}
