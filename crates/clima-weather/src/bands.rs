//! Temperature color bands for markers, legends and the heat layer.

/// Lower bound (inclusive, °C) and color of each band, hottest first
pub const BANDS: [(f64, &str); 10] = [
    (34.0, "#991B1B"),
    (32.0, "#DC2626"),
    (30.0, "#EF4444"),
    (29.0, "#F97316"),
    (28.0, "#FB923C"),
    (27.0, "#FBBF24"),
    (26.0, "#FCD34D"),
    (25.0, "#84CC16"),
    (24.0, "#22C55E"),
    (23.0, "#10B981"),
];

/// Color below the coolest band
pub const COLDEST_COLOR: &str = "#3B82F6";

/// Heat layer gradient stops over the normalized intensity
pub const HEAT_GRADIENT: [(f64, &str); 7] = [
    (0.0, "#3B82F6"),
    (0.2, "#22C55E"),
    (0.4, "#84CC16"),
    (0.5, "#FBBF24"),
    (0.6, "#F97316"),
    (0.8, "#EF4444"),
    (1.0, "#DC2626"),
];

pub fn color_for(temperature: f64) -> &'static str {
    BANDS
        .iter()
        .find(|(lower, _)| temperature >= *lower)
        .map_or(COLDEST_COLOR, |(_, color)| *color)
}

/// `#RRGGBB` to its components
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn rgb_for(temperature: f64) -> (u8, u8, u8) {
    hex_to_rgb(color_for(temperature)).unwrap_or((0x3B, 0x82, 0xF6))
}

/// Coarse level selecting one of the three marker icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureLevel {
    Cold,
    Warm,
    Hot,
}

impl TemperatureLevel {
    pub fn from_temperature(temperature: f64) -> Self {
        if temperature < 26.0 {
            Self::Cold
        } else if temperature < 30.0 {
            Self::Warm
        } else {
            Self::Hot
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Hot => "hot",
        }
    }
}

/// Position of `temperature` between `min` and `max`, clamped to 0..=1.
/// A degenerate range maps to the middle.
pub fn heat_intensity(temperature: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= f64::EPSILON {
        return 0.5;
    }
    ((temperature - min) / span).clamp(0.0, 1.0)
}

/// Interpolated heat gradient color for an intensity in 0..=1
pub fn gradient_rgb(intensity: f64) -> (u8, u8, u8) {
    let t = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };

    let mut lower = HEAT_GRADIENT[0];
    let mut upper = HEAT_GRADIENT[HEAT_GRADIENT.len() - 1];
    for window in HEAT_GRADIENT.windows(2) {
        if t >= window[0].0 && t <= window[1].0 {
            lower = window[0];
            upper = window[1];
            break;
        }
    }

    let (Some(from), Some(to)) = (hex_to_rgb(lower.1), hex_to_rgb(upper.1)) else {
        return (0x3B, 0x82, 0xF6);
    };
    let span = upper.0 - lower.0;
    let f = if span > 0.0 { (t - lower.0) / span } else { 0.0 };
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;

    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}
