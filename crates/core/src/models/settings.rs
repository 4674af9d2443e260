use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, PlanResult};

pub const DEFAULT_THEME_COLOR: &str = "#1e3a8a";

/// Global site switches, stored in a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub registration_enabled: bool,
    pub theme_color: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            registration_enabled: false,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePreset {
    pub name: &'static str,
    pub color: &'static str,
}

pub const THEME_PRESETS: [ThemePreset; 6] = [
    ThemePreset { name: "Xanh Chính phủ", color: "#1e3a8a" },
    ThemePreset { name: "Đỏ Đô", color: "#991b1b" },
    ThemePreset { name: "Xanh Lá Đậm", color: "#064e3b" },
    ThemePreset { name: "Tím Than", color: "#4c1d95" },
    ThemePreset { name: "Đen Sang Trọng", color: "#0f172a" },
    ThemePreset { name: "Nâu Đất", color: "#451a03" },
];

/// Accepts `#rgb` or `#rrggbb` and returns it lower-cased.
pub fn validate_theme_color(raw: &str) -> PlanResult<String> {
    let color = raw.trim();
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));

    if valid {
        Ok(color.to_ascii_lowercase())
    } else {
        Err(PlanError::Validation(format!("Invalid theme color: {}", raw)))
    }
}
