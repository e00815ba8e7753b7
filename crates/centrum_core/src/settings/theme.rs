//! Theme configuration object and its persistence service.
//!
//! # Responsibility
//! - Model the color palette and dark-mode preference as one explicit
//!   settings object.
//! - Persist it under the `prefColors`/`darkMode` cache keys.
//!
//! # Invariants
//! - Colors are validated as `#rrggbb` before they enter the settings object.
//! - Malformed stored preferences degrade to defaults, logged only.

use crate::repo::cache_repo::{CacheError, CacheResult, CacheStore};
use crate::repo::keys::{DARK_MODE_KEY, PREF_COLORS_KEY};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid"));

/// Default bootstrap palette, keyed by CSS variable name.
pub const DEFAULT_COLORS: [(&str, &str); 5] = [
    ("--bs-primary", "#007bff"),
    ("--bs-secondary", "#6c757d"),
    ("--bs-success", "#28a745"),
    ("--bs-danger", "#dc3545"),
    ("--bs-warning", "#ffc107"),
];

pub type ThemeResult<T> = Result<T, ThemeError>;

#[derive(Debug)]
pub enum ThemeError {
    InvalidHexColor(String),
    Cache(CacheError),
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHexColor(value) => write!(f, "invalid hex color: {value}"),
            Self::Cache(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ThemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHexColor(_) => None,
            Self::Cache(err) => Some(err),
        }
    }
}

impl From<CacheError> for ThemeError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

/// One stored color preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPref {
    #[serde(rename = "hexColor")]
    pub hex_color: String,
}

/// Dark-mode switch values as the body attribute carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DarkMode {
    Dark,
    #[default]
    NoDark,
}

impl DarkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::NoDark => "nodark",
        }
    }

    /// Parses the stored value; anything unknown falls back to light mode.
    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            _ => Self::NoDark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::NoDark,
            Self::NoDark => Self::Dark,
        }
    }
}

/// Explicit theme configuration passed between UI and settings service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    pub colors: BTreeMap<String, ColorPref>,
    pub dark_mode: DarkMode,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let colors = DEFAULT_COLORS
            .iter()
            .map(|(variable, hex)| {
                (
                    (*variable).to_string(),
                    ColorPref {
                        hex_color: (*hex).to_string(),
                    },
                )
            })
            .collect();
        Self {
            colors,
            dark_mode: DarkMode::NoDark,
        }
    }
}

impl ThemeSettings {
    /// Sets one palette entry after validating the hex value.
    pub fn set_color(&mut self, variable: &str, hex_color: &str) -> ThemeResult<()> {
        if !HEX_COLOR.is_match(hex_color) {
            return Err(ThemeError::InvalidHexColor(hex_color.to_string()));
        }
        self.colors.insert(
            variable.to_string(),
            ColorPref {
                hex_color: hex_color.to_string(),
            },
        );
        Ok(())
    }

    pub fn color(&self, variable: &str) -> Option<&str> {
        self.colors
            .get(variable)
            .map(|pref| pref.hex_color.as_str())
    }
}

/// Converts `#rrggbb` into the `"r, g, b"` form the renderer injects as a
/// companion CSS variable.
pub fn hex_to_rgb(hex_color: &str) -> ThemeResult<String> {
    if !HEX_COLOR.is_match(hex_color) {
        return Err(ThemeError::InvalidHexColor(hex_color.to_string()));
    }
    let value = u32::from_str_radix(&hex_color[1..], 16)
        .map_err(|_| ThemeError::InvalidHexColor(hex_color.to_string()))?;
    let r = (value >> 16) & 255;
    let g = (value >> 8) & 255;
    let b = value & 255;
    Ok(format!("{r}, {g}, {b}"))
}

/// Loads and saves theme settings from the durable cache.
pub struct ThemeService<C: CacheStore> {
    cache: C,
}

impl<C: CacheStore> ThemeService<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Loads stored settings; malformed or absent values fall back to
    /// defaults.
    pub fn load(&self) -> CacheResult<ThemeSettings> {
        let mut settings = ThemeSettings::default();

        if let Some(raw) = self.cache.get(PREF_COLORS_KEY)? {
            match serde_json::from_str::<BTreeMap<String, ColorPref>>(&raw) {
                Ok(colors) => settings.colors.extend(colors),
                Err(err) => {
                    warn!(
                        "event=theme_load module=settings status=degraded key={PREF_COLORS_KEY} error={err}"
                    );
                }
            }
        }

        if let Some(raw) = self.cache.get(DARK_MODE_KEY)? {
            settings.dark_mode = DarkMode::parse(&raw);
        }

        Ok(settings)
    }

    /// Persists both preference keys.
    pub fn save(&self, settings: &ThemeSettings) -> CacheResult<()> {
        let payload =
            serde_json::to_string(&settings.colors).unwrap_or_else(|_| "{}".to_string());
        self.cache.set(PREF_COLORS_KEY, &payload)?;
        self.cache.set(DARK_MODE_KEY, settings.dark_mode.as_str())?;
        Ok(())
    }
}
