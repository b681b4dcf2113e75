//! Renderer configuration, deserializable from the camelCase JSON the site
//! build passes in.

use crate::error::RenderError;
use crate::theme::ThemeMode;
use hlmark_core::normalize_language;
use serde::{Deserialize, Serialize};

/// Languages handed to the highlighter when none are configured.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "julia",
    "javascript",
    "python",
    "bash",
    "json",
    "yaml",
    "toml",
];

/// Settings shared by every block a [`Renderer`](crate::Renderer) touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Theme for light pages.
    pub theme: String,
    /// Theme for dark pages.
    pub dark_theme: String,
    /// Allow-list of languages sent to the highlighter.
    pub languages: Vec<String>,
    /// Upper bound on blocks rendered concurrently.
    pub batch_size: usize,
    /// Append a copy-to-clipboard button to rendered blocks.
    pub copy_button: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: "github-light".to_string(),
            dark_theme: "github-dark".to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            batch_size: 5,
            copy_button: true,
        }
    }
}

impl RenderConfig {
    /// Reads a config from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check if blocks in `language` may be highlighted.
    pub fn supports(&self, language: &str) -> bool {
        let language = normalize_language(language);
        self.languages
            .iter()
            .any(|allowed| normalize_language(allowed) == language)
    }

    /// Theme name for a page mode.
    pub fn theme_for(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Light => &self.theme,
            ThemeMode::Dark => &self.dark_theme,
        }
    }

    /// Concurrency bound, never below one.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
