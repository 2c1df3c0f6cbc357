use chrono::NaiveDate;
use rand::Rng;

use crate::content::ContentItem;
use crate::renderer::Renderer;
use crate::theme::{ContentKind, Palette};

const SITE_NAME: &str = "NIS Lab";

const SHELL_CSS: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:-apple-system,'Segoe UI',Roboto,sans-serif;background:#f8fafc}
.lp-nav{display:flex;justify-content:space-between;align-items:center;padding:12px 24px;background:#fff;border-bottom:1px solid #e5e7eb;position:sticky;top:0}
.lp-nav a{color:var(--lp-muted);text-decoration:none;margin-left:16px;font-size:0.95em}
.lp-nav a:hover{color:var(--lp-primary)}
.lp-brand{font-weight:700;color:var(--lp-primary-dark);font-size:1.1em}
.lp-article{max-width:760px;margin:24px auto;padding:0 16px 48px}
.lp-hero img{width:100%;border-radius:12px;max-height:360px;object-fit:cover}
.lp-banner{height:120px;border-radius:12px}
.lp-badge{display:inline-block;margin-top:16px;padding:3px 12px;border-radius:999px;background:var(--lp-soft);color:var(--lp-primary-dark);font-size:0.8em;font-weight:600;text-transform:uppercase;letter-spacing:0.05em}
.lp-title{color:#111827;margin:10px 0 6px;font-size:2em;line-height:1.25}
.lp-meta{color:var(--lp-muted);font-size:0.9em;margin-bottom:20px}
.lp-summary{background:var(--lp-soft);border:1px solid var(--lp-border);border-radius:8px;padding:12px 16px;margin-bottom:20px;color:#374151}
.lp-footer{margin-top:40px;padding-top:16px;border-top:1px solid #e5e7eb;display:flex;justify-content:space-between;align-items:center;color:var(--lp-muted);font-size:0.9em}
.lp-footer button{background:var(--lp-primary);border:0;border-radius:6px;color:#fff;padding:8px 14px;margin-left:8px;cursor:pointer}
.lp-toc{background:#fff;border:1px solid #e5e7eb;border-radius:8px;padding:12px 16px;margin-bottom:20px}
.lp-toc ul{margin:8px 0 0;padding-left:18px}
.lp-toc a{color:var(--lp-primary);text-decoration:none}
.lp-toc-h3{margin-left:14px}
.lp-toc-h4{margin-left:28px}
@media (max-width:600px){.lp-title{font-size:1.5em}.lp-nav a{margin-left:10px}}
@media print{.lp-nav,.lp-footer button,#lp-progress{display:none}body{background:#fff}}
"#;

const SHELL_JS: &str = r#"
function lpCopy(btn){
  var code = btn.closest('.lp-code').querySelector('code');
  navigator.clipboard.writeText(code.innerText).then(function(){
    btn.textContent = 'Copied';
    setTimeout(function(){ btn.textContent = 'Copy'; }, 1500);
  });
}
function lpShare(){
  if (navigator.share) {
    navigator.share({ title: document.title, url: location.href });
  } else {
    navigator.clipboard.writeText(location.href);
  }
}
window.addEventListener('scroll', function(){
  var doc = document.documentElement;
  var max = doc.scrollHeight - doc.clientHeight;
  var ratio = max > 0 ? doc.scrollTop / max : 0;
  document.getElementById('lp-progress').style.width = (ratio * 100) + '%';
});
(function(){
  var body = document.querySelector('.lp-body');
  if (!body) return;
  var headings = body.querySelectorAll('h2, h3, h4');
  if (headings.length <= 3) return;
  var toc = document.createElement('nav');
  toc.className = 'lp-toc';
  var label = document.createElement('strong');
  label.textContent = 'Contents';
  toc.appendChild(label);
  var list = document.createElement('ul');
  headings.forEach(function(head, i){
    if (!head.id) head.id = 'section-' + i;
    var item = document.createElement('li');
    item.className = 'lp-toc-' + head.tagName.toLowerCase();
    var link = document.createElement('a');
    link.href = '#' + head.id;
    link.textContent = head.textContent;
    item.appendChild(link);
    list.appendChild(item);
  });
  toc.appendChild(list);
  body.insertBefore(toc, body.firstChild);
})();
"#;

/// `ceil(characterLength / 1000)` minutes, matching how the site has always
/// shown it.
pub fn reading_minutes(body: &str) -> usize {
    body.chars().count().div_ceil(1000)
}

/// Best-effort display form of the item's date. Unparseable input is shown
/// as-is rather than rejected.
fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    for pattern in ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, pattern) {
            return date.format("%B %d, %Y").to_string();
        }
    }
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%B %d, %Y").to_string();
    }
    raw.to_string()
}

/// Assemble the complete standalone document: header blocks, meta strip,
/// rendered body and shell chrome around it.
pub fn assemble(item: &ContentItem, kind: ContentKind, palette: &Palette) -> String {
    let body_src = item.body();
    let body = Renderer::new(palette).render(body_src);

    let badge = item
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map_or_else(|| kind.label().to_string(), |c| c.trim().to_string());

    let header = match item.image.as_deref().filter(|i| !i.trim().is_empty()) {
        Some(image) => format!(
            r#"<div class="lp-hero"><img src="{}" alt="{}"></div>"#,
            image, item.title
        ),
        None => format!(
            r#"<div class="lp-banner" style="background:linear-gradient(135deg,{},{})"></div>"#,
            palette.primary, palette.primary_dark
        ),
    };

    let mut meta = Vec::new();
    if let Some(date) = item.date.as_deref().filter(|d| !d.trim().is_empty()) {
        meta.push(format!("📅 {}", format_date(date)));
    }
    if let Some(location) = item.location.as_deref().filter(|l| !l.trim().is_empty()) {
        meta.push(format!("📍 {location}"));
    }
    meta.push(format!("⏱ {} min read", reading_minutes(body_src)));
    // Placeholder until the site gets real analytics.
    meta.push(format!(
        "👁 {} views",
        rand::rng().random_range(120..=2400)
    ));

    let summary = item
        .short_description
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!(r#"<div class="lp-summary">{s}</div>"#))
        .unwrap_or_default();

    let mut out = String::with_capacity(body.len() + SHELL_CSS.len() + SHELL_JS.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{} — {SITE_NAME}</title>\n", item.title));
    out.push_str(&format!(
        "<style>:root{{--lp-primary:{};--lp-primary-dark:{};--lp-soft:{};--lp-border:{};--lp-muted:{}}}{}</style>\n",
        palette.primary,
        palette.primary_dark,
        palette.soft_bg,
        palette.border,
        palette.muted_text,
        SHELL_CSS
    ));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!(
        r#"<div id="lp-progress" style="position:fixed;top:0;left:0;height:3px;width:0;background:{};z-index:10"></div>{}"#,
        palette.primary, "\n"
    ));
    out.push_str(&format!(
        concat!(
            r#"<nav class="lp-nav"><span class="lp-brand">{}</span>"#,
            r#"<span><a href="/">Home</a><a href="/news">News</a><a href="/achievements">Achievements</a><a href="/contact">Contact</a></span></nav>"#,
            "\n"
        ),
        SITE_NAME
    ));
    out.push_str("<article class=\"lp-article\">\n");
    out.push_str(&header);
    out.push('\n');
    out.push_str(&format!(r#"<span class="lp-badge">{badge}</span>"#));
    out.push('\n');
    out.push_str(&format!(r#"<h1 class="lp-title">{}</h1>"#, item.title));
    out.push('\n');
    out.push_str(&format!(
        r#"<div class="lp-meta">{}</div>"#,
        meta.join(" · ")
    ));
    out.push('\n');
    out.push_str(&summary);
    out.push_str("\n<div class=\"lp-body\">\n");
    out.push_str(&body);
    out.push_str("</div>\n");
    out.push_str(&format!(
        concat!(
            r#"<footer class="lp-footer"><span>Published by the {} web team</span>"#,
            r#"<span><button type="button" onclick="window.print()">Print</button>"#,
            r#"<button type="button" onclick="lpShare()">Share</button></span></footer>"#,
            "\n"
        ),
        SITE_NAME
    ));
    out.push_str("</article>\n");
    out.push_str(&format!("<script>{SHELL_JS}</script>\n"));
    out.push_str("</body>\n</html>\n");
    out
}
