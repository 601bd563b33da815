//! Computed text color sampling and WCAG contrast

use super::RenderedPage;
use crate::analysis::Defaulted;
use serde::{Deserialize, Serialize};

/// Upper bound on distinct colors kept in a palette
pub const MAX_PALETTE_COLORS: usize = 10;

/// Collects distinct computed `color` values in document order, stopping at the cap
const SAMPLE_SCRIPT: &str = r#"(() => {
    const seen = [];
    for (const el of document.querySelectorAll('*')) {
        const color = window.getComputedStyle(el).color;
        if (color && !seen.includes(color)) {
            seen.push(color);
            if (seen.length >= 10) break;
        }
    }
    return seen;
})()"#;

/// Distinct rendered text colors and the contrast between the first two
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub palette: Vec<String>,
    pub primary_contrast: f64,
}

impl ColorPalette {
    /// Builds a palette from raw samples
    ///
    /// Samples are deduplicated in first-seen order and capped at
    /// `MAX_PALETTE_COLORS`. The contrast is 0 with fewer than two entries or
    /// when either of the first two cannot be parsed.
    pub fn from_samples<I, S>(samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut palette: Vec<String> = Vec::new();
        for sample in samples {
            let sample = sample.into().trim().to_string();
            if sample.is_empty() || palette.contains(&sample) {
                continue;
            }
            palette.push(sample);
            if palette.len() == MAX_PALETTE_COLORS {
                break;
            }
        }

        let primary_contrast = match palette.as_slice() {
            [first, second, ..] => contrast_ratio(first, second).unwrap_or(0.0),
            _ => 0.0,
        };

        Self {
            palette,
            primary_contrast,
        }
    }
}

/// Samples the computed text colors of a rendered page
pub async fn sample_colors(page: &dyn RenderedPage) -> Result<ColorPalette, Defaulted> {
    let value = page.evaluate(SAMPLE_SCRIPT).await?;
    let samples: Vec<String> = serde_json::from_value(value)
        .map_err(|e| Defaulted::Render(format!("unexpected color samples: {}", e)))?;
    Ok(ColorPalette::from_samples(samples))
}

/// WCAG 2.x contrast ratio between two CSS colors, rounded to two decimals
///
/// Returns `None` when either color is not `rgb()`, `rgba()` or `#hex`.
///
/// # Example
///
/// ```
/// use site_lens::render::contrast_ratio;
///
/// assert_eq!(contrast_ratio("rgb(0, 0, 0)", "#fff"), Some(21.0));
/// assert_eq!(contrast_ratio("red", "#fff"), None);
/// ```
pub fn contrast_ratio(first: &str, second: &str) -> Option<f64> {
    let a = relative_luminance(parse_css_color(first)?);
    let b = relative_luminance(parse_css_color(second)?);
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    let ratio = (lighter + 0.05) / (darker + 0.05);
    Some((ratio * 100.0).round() / 100.0)
}

/// Parses `rgb(...)`, `rgba(...)`, `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`; alpha is ignored
fn parse_css_color(value: &str) -> Option<[u8; 3]> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    // Drop a space-syntax alpha ("r g b / a")
    let inner = inner.split('/').next()?;

    let channels: Vec<&str> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if channels.len() < 3 {
        return None;
    }

    Some([
        parse_channel(channels[0])?,
        parse_channel(channels[1])?,
        parse_channel(channels[2])?,
    ])
}

fn parse_channel(part: &str) -> Option<u8> {
    let value = match part.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? * 255.0 / 100.0,
        None => part.parse::<f64>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 | 4 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some([digit(0)?, digit(1)?, digit(2)?])
        }
        6 | 8 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some([pair(0)?, pair(2)?, pair(4)?])
        }
        _ => None,
    }
}

/// WCAG relative luminance of an sRGB color
fn relative_luminance([r, g, b]: [u8; 3]) -> f64 {
    let linear = |channel: u8| {
        let c = f64::from(channel) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}
