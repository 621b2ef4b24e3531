//! Host page theme detection from computed background colors.

use serde::{Deserialize, Serialize};

/// Average brightness below this is treated as a dark page.
const DARK_THRESHOLD: f64 = 0.3;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Computed `background-color` values sampled from the host page.
#[derive(Clone, Debug, Default)]
pub struct BackgroundSamples {
    pub body: Option<String>,
    pub html: Option<String>,
    /// `main`, `article`, `.content`, `#content`, `.main`, `#main` when present.
    pub containers: Vec<String>,
}

/// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)`. Alpha is validated but ignored,
/// so `rgba(0, 0, 0, 0)` reads as black.
pub fn parse_css_rgb(color: &str) -> Option<[u8; 3]> {
    let color = color.trim();
    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }
    if let Some(alpha) = parts.get(3) {
        alpha.parse::<f64>().ok()?;
    }
    Some(rgb)
}

/// Perceived luminance in `[0, 1]`.
pub fn brightness(rgb: [u8; 3]) -> f64 {
    (0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64) / 255.0
}

pub fn detect_theme(samples: &BackgroundSamples) -> Theme {
    let body = samples.body.as_deref().and_then(parse_css_rgb).map(brightness);
    let html = samples.html.as_deref().and_then(parse_css_rgb).map(brightness);

    // Unparseable roots count as black; the brighter root wins.
    let main = body.unwrap_or(0.0).max(html.unwrap_or(0.0));

    let mut total = main;
    let mut count = 1.0;
    for rgb in samples.containers.iter().filter_map(|c| parse_css_rgb(c)) {
        total += brightness(rgb);
        count += 1.0;
    }

    let average = total / count;
    tracing::debug!(average, "theme brightness sampled");
    if average < DARK_THRESHOLD {
        Theme::Dark
    } else {
        Theme::Light
    }
}
