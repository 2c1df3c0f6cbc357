use serde::Deserialize;

use crate::error::Error;

const NEWS_PRIMARY: &str = "#2563eb";
const NEWS_PRIMARY_DARK: &str = "#1d4ed8";
const NEWS_SOFT_BG: &str = "#eff6ff";
const NEWS_BORDER: &str = "#bfdbfe";
const NEWS_QUOTE_ACCENT: &str = "#7c3aed";

const ACHIEVEMENT_PRIMARY: &str = "#d97706";
const ACHIEVEMENT_PRIMARY_DARK: &str = "#b45309";
const ACHIEVEMENT_SOFT_BG: &str = "#fffbeb";
const ACHIEVEMENT_BORDER: &str = "#fde68a";
const ACHIEVEMENT_QUOTE_ACCENT: &str = "#0d9488";

const TEXT: &str = "#1f2937";
const MUTED_TEXT: &str = "#6b7280";
const CODE_BG: &str = "#1e293b";
const CODE_TEXT: &str = "#e2e8f0";
const WARNING_BG: &str = "#fef2f2";
const WARNING_ACCENT: &str = "#dc2626";

/// The kind of post being rendered. Selects the color palette; everything
/// else about rendering is kind-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    News,
    Achievement,
}

impl ContentKind {
    /// Unrecognized values fall back to `News`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "achievement" => ContentKind::Achievement,
            _ => ContentKind::News,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::News => "News",
            ContentKind::Achievement => "Achievement",
        }
    }
}

/// Color tokens consulted wherever the generated markup needs a theme color.
/// Fixed for the duration of one render.
#[derive(Debug, Clone, Deserialize)]
pub struct Palette {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_primary_dark")]
    pub primary_dark: String,
    #[serde(default = "default_soft_bg")]
    pub soft_bg: String,
    #[serde(default = "default_border")]
    pub border: String,
    #[serde(default = "default_quote_accent")]
    pub quote_accent: String,

    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_muted_text")]
    pub muted_text: String,
    #[serde(default = "default_code_bg")]
    pub code_bg: String,
    #[serde(default = "default_code_text")]
    pub code_text: String,
    #[serde(default = "default_warning_bg")]
    pub warning_bg: String,
    #[serde(default = "default_warning_accent")]
    pub warning_accent: String,
}

fn default_primary() -> String {
    NEWS_PRIMARY.to_string()
}
fn default_primary_dark() -> String {
    NEWS_PRIMARY_DARK.to_string()
}
fn default_soft_bg() -> String {
    NEWS_SOFT_BG.to_string()
}
fn default_border() -> String {
    NEWS_BORDER.to_string()
}
fn default_quote_accent() -> String {
    NEWS_QUOTE_ACCENT.to_string()
}
fn default_text() -> String {
    TEXT.to_string()
}
fn default_muted_text() -> String {
    MUTED_TEXT.to_string()
}
fn default_code_bg() -> String {
    CODE_BG.to_string()
}
fn default_code_text() -> String {
    CODE_TEXT.to_string()
}
fn default_warning_bg() -> String {
    WARNING_BG.to_string()
}
fn default_warning_accent() -> String {
    WARNING_ACCENT.to_string()
}

impl Default for Palette {
    fn default() -> Self {
        Self::news()
    }
}

impl Palette {
    pub fn news() -> Self {
        Palette {
            primary: NEWS_PRIMARY.to_string(),
            primary_dark: NEWS_PRIMARY_DARK.to_string(),
            soft_bg: NEWS_SOFT_BG.to_string(),
            border: NEWS_BORDER.to_string(),
            quote_accent: NEWS_QUOTE_ACCENT.to_string(),
            text: TEXT.to_string(),
            muted_text: MUTED_TEXT.to_string(),
            code_bg: CODE_BG.to_string(),
            code_text: CODE_TEXT.to_string(),
            warning_bg: WARNING_BG.to_string(),
            warning_accent: WARNING_ACCENT.to_string(),
        }
    }

    pub fn achievement() -> Self {
        Palette {
            primary: ACHIEVEMENT_PRIMARY.to_string(),
            primary_dark: ACHIEVEMENT_PRIMARY_DARK.to_string(),
            soft_bg: ACHIEVEMENT_SOFT_BG.to_string(),
            border: ACHIEVEMENT_BORDER.to_string(),
            quote_accent: ACHIEVEMENT_QUOTE_ACCENT.to_string(),
            ..Self::news()
        }
    }

    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::News => Self::news(),
            ContentKind::Achievement => Self::achievement(),
        }
    }

    /// Load palette overrides from a TOML file. Missing keys keep the news
    /// defaults, so a file only has to name the tokens it changes.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::InvalidPalette(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentKind, Palette};

    #[test]
    fn unknown_kind_falls_back_to_news() {
        assert_eq!(ContentKind::parse("event"), ContentKind::News);
        assert_eq!(ContentKind::parse(""), ContentKind::News);
        assert_eq!(ContentKind::parse("Achievement"), ContentKind::Achievement);
    }

    #[test]
    fn kind_selects_color_family() {
        let news = Palette::for_kind(ContentKind::News);
        let achievement = Palette::for_kind(ContentKind::Achievement);

        assert_eq!(news.primary, "#2563eb");
        assert_eq!(achievement.primary, "#d97706");
        assert_eq!(news.text, achievement.text);
    }

    #[test]
    fn partial_toml_override_keeps_defaults() {
        let palette = Palette::from_toml(r##"primary = "#123456""##).expect("partial override");
        assert_eq!(palette.primary, "#123456");
        assert_eq!(palette.primary_dark, "#1d4ed8");
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(Palette::from_toml("primary = [").is_err());
    }
}
