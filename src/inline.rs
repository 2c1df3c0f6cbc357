use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::theme::Palette;

// Substitution order is a contract: bold runs before italic so the
// single-asterisk pattern never eats half of a double-asterisk pair, and
// every replacement emits markup that no earlier pattern can re-match.
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static MATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([^$]+)\$").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

static GREEK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\(alpha|beta|gamma|delta|epsilon|zeta|eta|theta|iota|kappa|lambda|mu|nu|xi|pi|rho|sigma|tau|upsilon|phi|chi|psi|omega|Gamma|Delta|Theta|Lambda|Xi|Pi|Sigma|Upsilon|Phi|Psi|Omega)\b",
    )
    .unwrap()
});
static SUB_BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9])_\{([^}]+)\}").unwrap());
static SUB_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9])_([A-Za-z0-9]+)").unwrap());
static SUP_BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9])\^\{([^}]+)\}").unwrap());
static SUP_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9])\^([A-Za-z0-9]+)").unwrap());
static OPERATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[≤≥∑∫√∞]").unwrap());

fn greek_char(name: &str) -> &'static str {
    match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Upsilon" => "Υ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        _ => "",
    }
}

/// Applies the inline substitution rules with the colors of one palette.
pub struct InlineFormatter<'a> {
    palette: &'a Palette,
}

impl<'a> InlineFormatter<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    /// Bold, italic, inline code, inline math and links, in that order.
    /// Applying this twice yields the same string as applying it once, as
    /// long as the input does not itself contain the replacement markup.
    pub fn apply(&self, text: &str) -> String {
        let bold = format!(
            r#"<strong style="color:{}">${{1}}</strong>"#,
            self.palette.primary_dark
        );
        let italic = "<em>${1}</em>".to_string();
        let code = format!(
            r#"<code style="background:{};border:1px solid {};border-radius:4px;padding:1px 5px;font-size:0.9em">${{1}}</code>"#,
            self.palette.soft_bg, self.palette.border
        );
        let math = format!(
            r#"<span class="lp-math" style="color:{};font-style:italic">${{1}}</span>"#,
            self.palette.primary
        );
        let link = format!(
            r#"<a href="${{2}}" target="_blank" rel="noopener" style="color:{}">${{1}}</a>"#,
            self.palette.primary
        );

        let out = BOLD.replace_all(text, bold.as_str());
        let out = ITALIC.replace_all(&out, italic.as_str());
        let out = CODE.replace_all(&out, code.as_str());
        let out = MATH.replace_all(&out, math.as_str());
        LINK.replace_all(&out, link.as_str()).into_owned()
    }

    /// Highlighting for one line inside a `$$` fence: Greek-letter names,
    /// sub/superscripts (`x_y`, `x_{yz}`, `x^y`, `x^{yz}`) and the
    /// comparison/aggregate operators ≤ ≥ ∑ ∫ √ ∞.
    pub fn math_line(&self, line: &str) -> String {
        let greek_color = self.palette.primary_dark.clone();
        let out = GREEK.replace_all(line, |caps: &Captures| {
            format!(
                r#"<span style="color:{}">{}</span>"#,
                greek_color,
                greek_char(&caps[1])
            )
        });

        let out = SUB_BRACED.replace_all(&out, "${1}<sub>${2}</sub>");
        let out = SUB_PLAIN.replace_all(&out, "${1}<sub>${2}</sub>");
        let out = SUP_BRACED.replace_all(&out, "${1}<sup>${2}</sup>");
        let out = SUP_PLAIN.replace_all(&out, "${1}<sup>${2}</sup>");

        let op = format!(
            r#"<span style="color:{};font-weight:600">${{0}}</span>"#,
            self.palette.quote_accent
        );
        OPERATORS.replace_all(&out, op.as_str()).into_owned()
    }
}
