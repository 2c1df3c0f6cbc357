use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::inline::InlineFormatter;
use crate::table::{is_table_row, render_table};
use crate::theme::Palette;

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").unwrap());
static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{6,})(?:[?&#]\S*)?$",
    )
    .unwrap()
});
static VIDEO_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\S+\.(?:mp4|webm|ogv|mov)$").unwrap());

/// The multi-line parsing context. At most one extended mode is active at
/// any line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockMode {
    Normal,
    CodeFence,
    MathFence,
    Table,
    UnorderedList,
    OrderedList,
}

/// Single-pass transformer from post text to an HTML body fragment.
///
/// Each input line is classified against the current [`BlockMode`];
/// fragments are accumulated and joined once at the end. Rendering never
/// fails: malformed input (an unterminated fence, a dangling table) is
/// force-closed at end-of-input so the output always has balanced
/// containers.
pub struct Renderer<'a> {
    palette: &'a Palette,
    inline: InlineFormatter<'a>,
    fragments: Vec<String>,
    mode: BlockMode,
    table_rows: Vec<String>,
}

impl<'a> Renderer<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            inline: InlineFormatter::new(palette),
            fragments: Vec::new(),
            mode: BlockMode::Normal,
            table_rows: Vec::new(),
        }
    }

    pub fn render(&mut self, text: &str) -> String {
        for line in text.lines() {
            self.push_line(line);
        }
        self.finish()
    }

    fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();

        match self.mode {
            BlockMode::CodeFence => {
                if trimmed.is_empty() {
                    return;
                }
                if trimmed.starts_with("```") {
                    self.fragments.push("</code></pre></div>\n".to_string());
                    self.mode = BlockMode::Normal;
                } else {
                    // Verbatim, indentation preserved.
                    self.fragments.push(format!("{line}\n"));
                }
                return;
            }
            BlockMode::MathFence => {
                if trimmed.is_empty() {
                    return;
                }
                if trimmed == "$$" {
                    self.fragments.push("</section>\n".to_string());
                    self.mode = BlockMode::Normal;
                } else {
                    self.fragments
                        .push(format!("{}<br>\n", self.inline.math_line(trimmed)));
                }
                return;
            }
            BlockMode::Table => {
                if trimmed.is_empty() {
                    return;
                }
                if is_table_row(trimmed) {
                    self.table_rows.push(trimmed.to_string());
                    return;
                }
                // First non-table line flushes the buffered rows, then the
                // line is classified normally.
                self.flush_table();
            }
            _ => {}
        }

        self.classify(trimmed);
    }

    fn classify(&mut self, trimmed: &str) {
        if let Some(rest) = trimmed.strip_prefix("```") {
            self.close_list();
            let lang = rest.trim();
            let lang = if lang.is_empty() { "text" } else { lang };
            debug!(lang, "opening code fence");
            self.push_code_open(lang);
            self.mode = BlockMode::CodeFence;
            return;
        }

        if trimmed == "$$" {
            self.close_list();
            self.fragments.push(format!(
                r#"<section class="lp-math-block" style="background:{};border-left:4px solid {};padding:12px 16px;margin:16px 0">{}"#,
                self.palette.soft_bg, self.palette.primary, "\n"
            ));
            self.mode = BlockMode::MathFence;
            return;
        }

        if trimmed.is_empty() {
            self.close_list();
            self.fragments.push("<br>\n".to_string());
            return;
        }

        // A pipe row wins over list closure: the table starts here and the
        // open list container is closed first to keep nesting sound.
        if is_table_row(trimmed) {
            self.close_list();
            self.table_rows.push(trimmed.to_string());
            self.mode = BlockMode::Table;
            return;
        }

        if let Some(text) = trimmed.strip_prefix("- ") {
            self.open_unordered();
            self.fragments.push(format!(
                r#"<li style="margin:6px 0">{}</li>{}"#,
                self.inline.apply(text),
                "\n"
            ));
            return;
        }

        if let Some(caps) = ORDERED_ITEM.captures(trimmed) {
            self.open_ordered();
            self.fragments.push(format!(
                r#"<li style="margin:6px 0"><span style="color:{};font-weight:600">{}.</span> {}</li>{}"#,
                self.palette.primary,
                &caps[1],
                self.inline.apply(&caps[2]),
                "\n"
            ));
            return;
        }

        // Everything below is a non-list line, so an open list closes now.
        self.close_list();

        if let Some(embed) = self.media_embed(trimmed) {
            self.fragments.push(embed);
            return;
        }

        // Longest heading prefix first.
        if let Some(text) = trimmed.strip_prefix("#### ") {
            self.push_heading(4, text);
            return;
        }
        if let Some(text) = trimmed.strip_prefix("### ") {
            self.push_heading(3, text);
            return;
        }
        if let Some(text) = trimmed.strip_prefix("## ") {
            self.push_heading(2, text);
            return;
        }

        if let Some(text) = trimmed.strip_prefix("> ") {
            self.fragments.push(format!(
                r#"<blockquote style="border-left:4px solid {};background:{};color:{};margin:16px 0;padding:10px 16px;font-style:italic">{}</blockquote>{}"#,
                self.palette.quote_accent,
                self.palette.soft_bg,
                self.palette.muted_text,
                self.inline.apply(text),
                "\n"
            ));
            return;
        }

        if let Some(rest) = trimmed.strip_prefix("[INFO]") {
            self.push_callout("ℹ", rest.trim_start(), false);
            return;
        }
        if let Some(rest) = trimmed.strip_prefix("[WARNING]") {
            self.push_callout("⚠", rest.trim_start(), true);
            return;
        }

        self.fragments.push(format!(
            r#"<p style="color:{};line-height:1.7;margin:10px 0">{}</p>{}"#,
            self.palette.text,
            self.inline.apply(trimmed),
            "\n"
        ));
    }

    /// Force-close whatever is still open. A dangling list or table is
    /// ordinary input; a dangling fence is malformed and closed silently
    /// apart from a warning.
    fn finish(&mut self) -> String {
        match self.mode {
            BlockMode::CodeFence => {
                warn!("unterminated code fence at end of input, closing");
                self.fragments.push("</code></pre></div>\n".to_string());
            }
            BlockMode::MathFence => {
                warn!("unterminated math fence at end of input, closing");
                self.fragments.push("</section>\n".to_string());
            }
            BlockMode::Table => self.flush_table(),
            BlockMode::UnorderedList | BlockMode::OrderedList => self.close_list(),
            BlockMode::Normal => {}
        }
        self.mode = BlockMode::Normal;

        let html = self.fragments.join("");
        self.fragments.clear();
        html
    }

    fn push_code_open(&mut self, lang: &str) {
        self.fragments.push(format!(
            concat!(
                r#"<div class="lp-code" style="background:{};border-radius:8px;margin:16px 0;overflow:hidden">"#,
                r#"<div style="display:flex;justify-content:space-between;align-items:center;padding:6px 12px;background:{};color:#fff;font-size:0.8em">"#,
                r#"<span>{}</span><button type="button" onclick="lpCopy(this)" style="background:none;border:1px solid #fff;border-radius:4px;color:#fff;padding:2px 8px;cursor:pointer">Copy</button></div>"#,
                r#"<pre style="margin:0;padding:12px;overflow-x:auto"><code style="color:{};font-family:ui-monospace,monospace;font-size:0.9em">"#,
            ),
            self.palette.code_bg, self.palette.primary_dark, lang, self.palette.code_text
        ));
    }

    fn push_heading(&mut self, level: u8, text: &str) {
        let formatted = self.inline.apply(text);
        let fragment = match level {
            2 => format!(
                r#"<h2 style="color:{};border-bottom:2px solid {};padding-bottom:6px;margin:24px 0 12px">{}</h2>{}"#,
                self.palette.primary_dark, self.palette.border, formatted, "\n"
            ),
            3 => format!(
                r#"<h3 style="color:{};margin:20px 0 10px">{}</h3>{}"#,
                self.palette.primary, formatted, "\n"
            ),
            _ => format!(
                r#"<h4 style="color:{};margin:16px 0 8px">{}</h4>{}"#,
                self.palette.primary_dark, formatted, "\n"
            ),
        };
        self.fragments.push(fragment);
    }

    fn push_callout(&mut self, icon: &str, text: &str, warning: bool) {
        let (bg, accent) = if warning {
            (&self.palette.warning_bg, &self.palette.warning_accent)
        } else {
            (&self.palette.soft_bg, &self.palette.primary)
        };
        self.fragments.push(format!(
            r#"<div class="lp-callout" style="background:{};border-left:4px solid {};border-radius:6px;padding:12px 16px;margin:16px 0;color:{}"><strong style="color:{}">{} </strong>{}</div>{}"#,
            bg,
            accent,
            self.palette.text,
            accent,
            icon,
            self.inline.apply(text),
            "\n"
        ));
    }

    fn media_embed(&self, trimmed: &str) -> Option<String> {
        if let Some(caps) = YOUTUBE_URL.captures(trimmed) {
            return Some(format!(
                concat!(
                    r#"<div style="position:relative;padding-bottom:56.25%;height:0;margin:16px 0">"#,
                    r#"<iframe src="https://www.youtube.com/embed/{}" style="position:absolute;top:0;left:0;width:100%;height:100%;border:0" allowfullscreen></iframe></div>"#,
                    "\n"
                ),
                &caps[1]
            ));
        }
        if VIDEO_FILE.is_match(trimmed) {
            return Some(format!(
                "<video controls src=\"{trimmed}\" style=\"width:100%;border-radius:8px;margin:16px 0\"></video>\n"
            ));
        }
        None
    }

    fn flush_table(&mut self) {
        if !self.table_rows.is_empty() {
            let mut table = render_table(&self.table_rows, self.palette);
            table.push('\n');
            self.fragments.push(table);
            self.table_rows.clear();
        }
        self.mode = BlockMode::Normal;
    }

    fn close_list(&mut self) {
        match self.mode {
            BlockMode::UnorderedList => self.fragments.push("</ul>\n".to_string()),
            BlockMode::OrderedList => self.fragments.push("</ol>\n".to_string()),
            _ => return,
        }
        self.mode = BlockMode::Normal;
    }

    fn open_unordered(&mut self) {
        if self.mode == BlockMode::UnorderedList {
            return;
        }
        self.close_list();
        self.fragments.push(format!(
            r#"<ul style="margin:12px 0;padding-left:24px;color:{}">{}"#,
            self.palette.text, "\n"
        ));
        self.mode = BlockMode::UnorderedList;
    }

    fn open_ordered(&mut self) {
        if self.mode == BlockMode::OrderedList {
            return;
        }
        self.close_list();
        // The captured numerals are shown by hand, so the browser's own
        // numbering is disabled.
        self.fragments.push(format!(
            r#"<ol style="list-style:none;margin:12px 0;padding-left:24px;color:{}">{}"#,
            self.palette.text, "\n"
        ));
        self.mode = BlockMode::OrderedList;
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::theme::Palette;
    use proptest::prelude::*;

    fn render(text: &str) -> String {
        let palette = Palette::news();
        let mut renderer = Renderer::new(&palette);
        renderer.render(text)
    }

    #[test]
    fn heading_specificity_is_longest_prefix() {
        let html = render("#### X");
        assert!(html.contains("<h4"), "expected h4: {html}");
        assert!(!html.contains("<h2"), "h4 line misread as h2: {html}");

        let html = render("### Y\n## Z");
        assert!(html.contains("<h3"));
        assert!(html.contains("<h2"));
    }

    #[test]
    fn list_switch_closes_previous_container() {
        let html = render("- a\n1. b");
        let ul_close = html.find("</ul>").expect("ul closed");
        let ol_open = html.find("<ol").expect("ol opened");
        assert!(
            ul_close < ol_open,
            "unordered list must close before ordered opens: {html}"
        );
        assert_eq!(html.matches("<li").count(), 2);
    }

    #[test]
    fn non_list_line_closes_open_list() {
        let html = render("- a\nplain text");
        let ul_close = html.find("</ul>").expect("ul closed");
        let para = html.find("<p").expect("paragraph rendered");
        assert!(ul_close < para, "list must close before paragraph: {html}");
    }

    #[test]
    fn blank_line_closes_list_and_emits_break() {
        let html = render("- a\n\nafter");
        assert!(html.contains("</ul>\n<br>"), "break after close: {html}");
    }

    #[test]
    fn code_fence_is_verbatim_and_labeled() {
        let html = render("```rust\nlet x = **1**;\n\n```<not a fence>\n```");
        assert!(html.contains("<span>rust</span>"), "language label: {html}");
        assert!(
            html.contains("let x = **1**;"),
            "no inline formatting inside fence: {html}"
        );
        // The blank line inside the fence is dropped entirely.
        assert!(!html.contains("\n\n"), "blank line survived: {html}");
        // A fence-opening line inside the open fence closes it instead.
        assert!(!html.contains("<not a fence>"));
    }

    #[test]
    fn fence_language_defaults_to_text() {
        let html = render("```\nx\n```");
        assert!(html.contains("<span>text</span>"), "default label: {html}");
    }

    #[test]
    fn unterminated_fence_is_force_closed() {
        let html = render("```python\nprint(1)");
        assert_eq!(html.matches("<pre").count(), 1);
        assert_eq!(html.matches("</pre").count(), 1);
    }

    #[test]
    fn math_fence_uses_breaks_not_newlines() {
        let html = render("$$\nE = mc^2\n$$");
        assert!(html.contains("<section class=\"lp-math-block\""));
        assert!(html.contains("mc<sup>2</sup><br>"), "sup + break: {html}");
    }

    #[test]
    fn table_flushes_on_non_table_line() {
        let html = render("|A|B|\n|--|--|\n|1|2|\nafter");
        let table_end = html.find("</table>").expect("table rendered");
        let para = html.find("<p").expect("paragraph rendered");
        assert!(table_end < para, "table must flush before paragraph: {html}");
        assert_eq!(html.matches("<th").count(), 2);
        assert_eq!(html.matches("<td").count(), 2);
    }

    #[test]
    fn table_row_during_list_closes_the_list_first() {
        let html = render("- a\n|A|B|");
        let ul_close = html.find("</ul>").expect("ul closed");
        let table = html.find("<table").expect("table rendered");
        assert!(ul_close < table, "list closes before the table: {html}");
    }

    #[test]
    fn youtube_line_becomes_embedded_player() {
        let html = render("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert!(
            html.contains("youtube.com/embed/dQw4w9WgXcQ"),
            "embed url: {html}"
        );
        let html = render("https://youtu.be/dQw4w9WgXcQ");
        assert!(html.contains("youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn video_file_line_becomes_video_element() {
        let html = render("https://cdn.example.org/demo.mp4");
        assert!(html.contains("<video controls"), "video element: {html}");
    }

    #[test]
    fn callout_tags_are_stripped() {
        let html = render("[INFO] lab meeting moved\n[WARNING] deadline");
        assert!(!html.contains("[INFO]"));
        assert!(!html.contains("[WARNING]"));
        assert_eq!(html.matches("lp-callout").count(), 2);
        assert!(html.contains("lab meeting moved"));
    }

    #[test]
    fn quote_uses_alternate_accent() {
        let palette = Palette::news();
        let html = render("> attributed remark");
        assert!(html.contains(&palette.quote_accent), "quote accent: {html}");
        assert!(html.contains("<blockquote"));
    }

    #[test]
    fn end_to_end_order_and_theme() {
        let html = render("## Hi\n- a\n- b\n\nDone");
        let h2 = html.find("<h2").expect("heading");
        let ul = html.find("<ul").expect("list");
        let para = html.find("<p").expect("paragraph");
        assert!(h2 < ul && ul < para, "block order: {html}");
        assert_eq!(html.matches("<li").count(), 2);
        assert!(html.contains("#1d4ed8"), "blue family tokens: {html}");
    }

    fn count(html: &str, needle: &str) -> usize {
        html.matches(needle).count()
    }

    proptest! {
        // Well-formedness invariant: every opening container is matched by a
        // close, whatever the input, including unterminated fences.
        #[test]
        fn containers_are_balanced(lines in proptest::collection::vec(
            prop_oneof![
                Just("```".to_string()),
                Just("```rust".to_string()),
                Just("$$".to_string()),
                Just("- item".to_string()),
                Just("1. item".to_string()),
                Just("|a|b|".to_string()),
                Just("|--|--|".to_string()),
                Just("## head".to_string()),
                Just("> quote".to_string()),
                Just("[INFO] note".to_string()),
                Just(String::new()),
                "[a-z ]{0,12}",
            ],
            0..40,
        )) {
            let palette = Palette::news();
            let mut renderer = Renderer::new(&palette);
            let html = renderer.render(&lines.join("\n"));

            prop_assert_eq!(count(&html, "<ul"), count(&html, "</ul"));
            prop_assert_eq!(count(&html, "<ol"), count(&html, "</ol"));
            prop_assert_eq!(count(&html, "<pre"), count(&html, "</pre"));
            prop_assert_eq!(count(&html, "<table"), count(&html, "</table"));
            prop_assert_eq!(count(&html, "<section"), count(&html, "</section"));
        }
    }
}
