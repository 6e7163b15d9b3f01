//! Secondary guidance derived from a snapshot: air-quality and UV tiers,
//! clothing tips, and display hints keyed on temperature and condition.

use serde::{Deserialize, Serialize};

use crate::session::Theme;

/// Provider air-quality scale, 1 (good) to 5 (very poor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiTier {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiTier {
    /// `None` for anything outside the 1..=5 scale.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(AqiTier::Good),
            2 => Some(AqiTier::Fair),
            3 => Some(AqiTier::Moderate),
            4 => Some(AqiTier::Poor),
            5 => Some(AqiTier::VeryPoor),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            AqiTier::Good => 1,
            AqiTier::Fair => 2,
            AqiTier::Moderate => 3,
            AqiTier::Poor => 4,
            AqiTier::VeryPoor => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UvTier {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvTier {
    /// Brackets are closed below and open above: 3.0 is already moderate.
    pub fn from_index(uvi: f64) -> Self {
        if uvi < 3.0 {
            UvTier::Low
        } else if uvi < 6.0 {
            UvTier::Moderate
        } else if uvi < 8.0 {
            UvTier::High
        } else if uvi < 11.0 {
            UvTier::VeryHigh
        } else {
            UvTier::Extreme
        }
    }
}

/// Clothing tips for the given conditions, joined into one sentence group.
pub fn clothing_suggestion(temp_c: f64, humidity_pct: f64, wind_mps: f64) -> String {
    let mut tips = vec![if temp_c <= 5.0 {
        "Heavy winter jacket, gloves, warm hat."
    } else if temp_c <= 15.0 {
        "Jacket or sweater; layers recommended."
    } else if temp_c <= 25.0 {
        "Light jacket or long sleeves."
    } else {
        "T-shirt / light clothing; stay hydrated."
    }];

    if humidity_pct >= 80.0 && temp_c >= 20.0 {
        tips.push("High humidity — breathable fabrics recommended.");
    }
    if wind_mps >= 10.0 && temp_c <= 15.0 {
        tips.push("Windy — consider a windbreaker.");
    }

    tips.join(" ")
}

/// Condition groups that warrant a severe-weather banner.
pub fn is_severe(condition: &str) -> bool {
    matches!(
        condition.to_ascii_lowercase().as_str(),
        "thunderstorm" | "rain" | "snow"
    )
}

/// Hex accent colour for a temperature: hot at 30°C and above, mild from 10°C.
pub fn accent_color(temp_c: f64, theme: Theme) -> &'static str {
    let dark = theme == Theme::Dark;
    if temp_c >= 30.0 {
        if dark { "#FF5733" } else { "#E94E2C" }
    } else if temp_c >= 10.0 {
        if dark { "#4CAF50" } else { "#00A896" }
    } else if dark {
        "#33AFFF"
    } else {
        "#2C7ADF"
    }
}
