//! Swipe classification for timeline rows

use serde::{Deserialize, Serialize};

/// Result of classifying a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Not a horizontal swipe
    None,
    /// Leftward swipe
    Left,
    /// Rightward swipe
    Right,
}

/// Distance and direction requirements for a swipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeThresholds {
    /// Minimum horizontal travel
    #[serde(default = "default_min_distance")]
    pub min_distance: f64,
    /// How many times larger the horizontal travel must be than the vertical
    #[serde(default = "default_dominance")]
    pub dominance: f64,
}

const fn default_min_distance() -> f64 {
    60.0
}

const fn default_dominance() -> f64 {
    1.5
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            dominance: default_dominance(),
        }
    }
}

/// Classify a drag by its total translation
pub fn classify_swipe(dx: f64, dy: f64, thresholds: &SwipeThresholds) -> Swipe {
    if !dx.is_finite() || !dy.is_finite() {
        return Swipe::None;
    }
    if dx.abs() < thresholds.min_distance || dx.abs() < dy.abs() * thresholds.dominance {
        return Swipe::None;
    }
    if dx > 0.0 { Swipe::Right } else { Swipe::Left }
}
