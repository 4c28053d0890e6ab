//! Reconstruction of a rectangular table from a parsed `<table>`.
//!
//! The header row decides the width: `n_cols` is the number of `<th>` cells in
//! `<thead>`. Every `<td>` in the table is then laid out row-major, so the data
//! cell count must be an exact multiple of `n_cols`. A table that does not
//! divide evenly is rejected rather than truncated.

use super::html::HtmlNode;
use crate::error::Md2DocxError;

/// Header and data rows of one table, all cells as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableMapping {
    /// Build the mapping for the `index`-th table of the document.
    pub fn from_node(node: &HtmlNode, index: usize) -> Result<Self, Md2DocxError> {
        let headers: Vec<String> = node
            .find("thead")
            .map(|thead| thead.find_all("th").into_iter().map(cell_text).collect())
            .unwrap_or_default();

        let n_cols = headers.len();
        if n_cols == 0 {
            return Err(Md2DocxError::MissingTableHeader { index });
        }

        let data: Vec<String> = node.find_all("td").into_iter().map(cell_text).collect();
        if data.len() % n_cols != 0 {
            return Err(Md2DocxError::MalformedTable {
                index,
                cells: data.len(),
                columns: n_cols,
            });
        }

        let rows = data.chunks(n_cols).map(<[String]>::to_vec).collect();
        Ok(Self { headers, rows })
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// Header row plus data rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len() + 1
    }
}

fn cell_text(cell: &HtmlNode) -> String {
    cell.text().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::html::parse_html;

    fn table(html: &str) -> Result<TableMapping, Md2DocxError> {
        let root = parse_html(html);
        TableMapping::from_node(&root.children()[0], 0)
    }

    const HEADER: &str = "<thead><tr><th>A</th><th>B</th><th>C</th></tr></thead>";

    #[test]
    fn six_cells_three_columns_make_two_rows() {
        let t = table(&format!(
            "<table>{HEADER}<tbody><tr><td>1</td><td>2</td><td>3</td></tr>\
             <tr><td>4</td><td>5</td><td>6</td></tr></tbody></table>"
        ))
        .unwrap();
        assert_eq!(t.headers, vec!["A", "B", "C"]);
        assert_eq!(t.n_cols(), 3);
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn seven_cells_are_rejected_not_truncated() {
        let err = table(&format!(
            "<table>{HEADER}<tbody><tr><td>1</td><td>2</td><td>3</td></tr>\
             <tr><td>4</td><td>5</td><td>6</td><td>7</td></tr></tbody></table>"
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            Md2DocxError::MalformedTable {
                cells: 7,
                columns: 3,
                ..
            }
        ));
    }

    #[test]
    fn empty_cells_become_empty_strings() {
        let t = table(&format!(
            "<table>{HEADER}<tbody><tr><td></td><td>x</td><td> </td></tr></tbody></table>"
        ))
        .unwrap();
        assert_eq!(t.rows[0], vec!["", "x", ""]);
    }

    #[test]
    fn nested_markup_is_flattened() {
        let t = table(
            "<table><thead><tr><th><strong>Name</strong></th></tr></thead>\
             <tbody><tr><td>a <code>b</code></td></tr></tbody></table>",
        )
        .unwrap();
        assert_eq!(t.headers, vec!["Name"]);
        assert_eq!(t.rows[0], vec!["a b"]);
    }

    #[test]
    fn header_only_table_has_one_row() {
        let t = table(&format!("<table>{HEADER}</table>")).unwrap();
        assert_eq!(t.n_rows(), 1);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = table("<table><tr><td>1</td></tr></table>").unwrap_err();
        assert!(matches!(err, Md2DocxError::MissingTableHeader { index: 0 }));
    }
}
