use std::sync::LazyLock;

use regex::Regex;

use crate::theme::Palette;

// A cell of an alignment/separator row: optional colons around one or more
// dashes, e.g. `---`, `:--`, `:-:`.
static SEPARATOR_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// True when the trimmed line should be buffered as a table row.
pub fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Split a buffered pipe row into trimmed cells. The leading and trailing
/// empty segments produced by the outer pipes are dropped; interior empty
/// cells survive.
fn split_cells(row: &str) -> Vec<String> {
    let mut parts: Vec<&str> = row.split('|').collect();
    if parts.first().is_some_and(|p| p.is_empty()) {
        parts.remove(0);
    }
    if parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts.into_iter().map(|p| p.trim().to_string()).collect()
}

fn is_separator_row(row: &str) -> bool {
    let cells = split_cells(row);
    !cells.is_empty() && cells.iter().all(|c| SEPARATOR_CELL.is_match(c))
}

/// Assemble the buffered rows into a styled table fragment. The first row is
/// always the header; a second row made only of separator tokens is dropped;
/// everything else renders as data in original order. An empty buffer
/// renders nothing.
pub fn render_table(rows: &[String], palette: &Palette) -> String {
    let Some((header, rest)) = rows.split_first() else {
        return String::new();
    };

    let mut out = String::new();
    out.push_str(&format!(
        r#"<div style="overflow-x:auto;margin:16px 0"><table style="border-collapse:collapse;width:100%;border:1px solid {}">"#,
        palette.border
    ));

    out.push_str("<thead><tr>");
    for cell in split_cells(header) {
        out.push_str(&format!(
            r#"<th style="background:{};color:{};text-align:left;padding:8px 12px;border:1px solid {}">{}</th>"#,
            palette.soft_bg, palette.primary_dark, palette.border, cell
        ));
    }
    out.push_str("</tr></thead><tbody>");

    let data = match rest.first() {
        Some(second) if is_separator_row(second) => &rest[1..],
        _ => rest,
    };

    for row in data {
        out.push_str("<tr>");
        for cell in split_cells(row) {
            out.push_str(&format!(
                r#"<td style="padding:8px 12px;border:1px solid {};color:{}">{}</td>"#,
                palette.border, palette.text, cell
            ));
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table></div>");
    out
}

#[cfg(test)]
mod tests {
    use super::{is_table_row, render_table};
    use crate::theme::Palette;

    fn rows(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|r| (*r).to_string()).collect()
    }

    #[test]
    fn detects_pipe_rows() {
        assert!(is_table_row("|a|b|"));
        assert!(is_table_row("| a | b |"));
        assert!(!is_table_row("|"));
        assert!(!is_table_row("a|b"));
        assert!(!is_table_row("|a|b"));
    }

    #[test]
    fn separator_row_never_appears_in_output() {
        let palette = Palette::news();
        let html = render_table(&rows(&["|A|B|", "|--|--|", "|1|2|"]), &palette);

        assert_eq!(html.matches("<th").count(), 2);
        assert_eq!(html.matches("<td").count(), 2);
        assert!(html.contains(">A</th>"));
        assert!(html.contains(">B</th>"));
        assert!(html.contains(">1</td>"));
        assert!(html.contains(">2</td>"));
        assert!(!html.contains("--"), "separator leaked: {html}");
    }

    #[test]
    fn second_row_with_data_is_kept() {
        let palette = Palette::news();
        let html = render_table(&rows(&["|A|", "|x|", "|y|"]), &palette);
        assert_eq!(html.matches("<td").count(), 2);
    }

    #[test]
    fn aligned_separator_cells_are_recognized() {
        let palette = Palette::news();
        let html = render_table(&rows(&["|A|B|C|", "|:--|:-:|--:|", "|1|2|3|"]), &palette);
        assert_eq!(html.matches("<td").count(), 3);
    }

    #[test]
    fn interior_empty_cells_survive() {
        let palette = Palette::news();
        let html = render_table(&rows(&["|A||C|"]), &palette);
        assert_eq!(html.matches("<th").count(), 3);
    }

    #[test]
    fn empty_buffer_renders_nothing() {
        let palette = Palette::news();
        assert_eq!(render_table(&[], &palette), "");
    }
}
