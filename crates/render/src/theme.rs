//! Light/dark detection from the page's root element.

use serde::{Deserialize, Serialize};

const DARK_CLASSES: &[&str] = &["theme--dark", "theme--documenter-dark", "documenter-dark"];
const DARK_DATA_THEMES: &[&str] = &["dark", "documenter-dark"];

/// Color scheme a page is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light pages.
    #[default]
    Light,
    /// Dark pages.
    Dark,
}

impl ThemeMode {
    /// Mode implied by the `class` and `data-theme` attributes of `<html>`.
    pub fn from_root_attributes(class: Option<&str>, data_theme: Option<&str>) -> Self {
        if detect_dark_mode(class, data_theme) {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

/// Check if the root element marks the page as dark.
pub fn detect_dark_mode(class: Option<&str>, data_theme: Option<&str>) -> bool {
    let dark_class = class.is_some_and(|class| {
        class
            .split_whitespace()
            .any(|token| DARK_CLASSES.contains(&token))
    });
    let dark_attr = data_theme.is_some_and(|theme| DARK_DATA_THEMES.contains(&theme.trim()));
    dark_class || dark_attr
}
