//! Named color palettes

use serde::{Deserialize, Serialize};

/// Theme selected by the `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
    Minimal,
    Colorful,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Minimal => "minimal",
            Self::Colorful => "colorful",
        }
    }

    /// Parse a theme name; anything unrecognized resolves to [`ThemeName::Light`].
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Self::Dark,
            "minimal" => Self::Minimal,
            "colorful" => Self::Colorful,
            _ => Self::Light,
        }
    }
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable palette resolved once per widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    pub primary: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
}

const LIGHT: Theme = Theme {
    name: ThemeName::Light,
    primary: "#2563eb",
    background: "#ffffff",
    text: "#1f2937",
    border: "#e5e7eb",
    accent: "#f59e0b",
};

const DARK: Theme = Theme {
    name: ThemeName::Dark,
    primary: "#60a5fa",
    background: "#111827",
    text: "#f9fafb",
    border: "#374151",
    accent: "#fbbf24",
};

const MINIMAL: Theme = Theme {
    name: ThemeName::Minimal,
    primary: "#111111",
    background: "transparent",
    text: "#222222",
    border: "#dddddd",
    accent: "#555555",
};

const COLORFUL: Theme = Theme {
    name: ThemeName::Colorful,
    primary: "#db2777",
    background: "#fdf4ff",
    text: "#3b0764",
    border: "#f0abfc",
    accent: "#f97316",
};

impl Theme {
    pub fn resolve(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => LIGHT,
            ThemeName::Dark => DARK,
            ThemeName::Minimal => MINIMAL,
            ThemeName::Colorful => COLORFUL,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        LIGHT
    }
}
