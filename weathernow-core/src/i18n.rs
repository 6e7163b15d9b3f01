//! English and Hindi message tables.
//!
//! Templates that take an argument carry a single `{}` placeholder; use
//! [`crate::SessionContext::format`] to fill it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::advice::{AqiTier, UvTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            _ => Err(format!("Unknown language '{s}'. Supported languages: english, hindi.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Weather,
    FeelsLike,
    Humidity,
    WindSpeed,
    Pressure,
    Sunrise,
    Sunset,
    AirQuality,
    UvIndex,
    Clothing,
    HourlyHeader,
    ForecastHeader,
    TrendHeader,
    FavouritesHeader,
    SevereAlert,
    ForecastError,
    CityNotFound,
    FetchFailed,
    CountryError,
    OfflineNotice,
    LandmarkUnavailable,
    NoFavourites,
    FavouriteAdded,
    FavouriteRemoved,
    FavouriteAlreadyPresent,
    FavouriteMissing,
    AqiUnavailable,
    Aqi(AqiTier),
    Uv(UvTier),
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        match language {
            Language::English => self.english(),
            Language::Hindi => self.hindi(),
        }
    }

    fn english(self) -> &'static str {
        match self {
            Message::Weather => "Weather",
            Message::FeelsLike => "Feels Like",
            Message::Humidity => "Humidity",
            Message::WindSpeed => "Wind Speed",
            Message::Pressure => "Pressure",
            Message::Sunrise => "Sunrise",
            Message::Sunset => "Sunset",
            Message::AirQuality => "Air Quality Index (AQI)",
            Message::UvIndex => "UV Index",
            Message::Clothing => "Clothing suggestion",
            Message::HourlyHeader => "Next 24 Hours (Hourly Forecast)",
            Message::ForecastHeader => "5-Day Forecast (Midday)",
            Message::TrendHeader => "7-day temperature trend",
            Message::FavouritesHeader => "Favourite Locations",
            Message::SevereAlert => "Severe Weather Alert! Take precautions.",
            Message::ForecastError => {
                "Error: Could not fetch 5-day forecast. Check API configuration."
            }
            Message::CityNotFound => "City '{}' not found! Please try again.",
            Message::FetchFailed => "Error fetching weather data: {}",
            Message::CountryError => "Please enter a specific city name, not a country name.",
            Message::OfflineNotice => "Offline data used (cached).",
            Message::LandmarkUnavailable => "Landmark image not available.",
            Message::NoFavourites => "No favourites added yet.",
            Message::FavouriteAdded => "{} added to favourites!",
            Message::FavouriteRemoved => "{} removed from favourites!",
            Message::FavouriteAlreadyPresent => "{} is already in your favourites!",
            Message::FavouriteMissing => "{} is not in your favourites.",
            Message::AqiUnavailable => "N/A",
            Message::Aqi(tier) => match tier {
                AqiTier::Good => "Good (1)",
                AqiTier::Fair => "Fair (2)",
                AqiTier::Moderate => "Moderate (3)",
                AqiTier::Poor => "Poor (4)",
                AqiTier::VeryPoor => "Very Poor (5)",
            },
            Message::Uv(tier) => match tier {
                UvTier::Low => "Low — minimal protection required.",
                UvTier::Moderate => "Moderate — wear sunglasses and SPF 30+.",
                UvTier::High => "High — wear SPF 30+, hat, and avoid mid-day sun.",
                UvTier::VeryHigh => "Very High — extra precautions, avoid sun.",
                UvTier::Extreme => "Extreme — stay indoors if possible.",
            },
        }
    }

    fn hindi(self) -> &'static str {
        match self {
            Message::Weather => "मौसम",
            Message::FeelsLike => "महसूस होता है",
            Message::Humidity => "आर्द्रता",
            Message::WindSpeed => "हवा की गति",
            Message::Pressure => "दबाव",
            Message::Sunrise => "सूर्योदय",
            Message::Sunset => "सूर्यास्त",
            Message::AirQuality => "वायु गुणवत्ता सूचकांक (AQI)",
            Message::UvIndex => "UV सूचकांक",
            Message::Clothing => "कपड़ों का सुझाव",
            Message::HourlyHeader => "अगले 24 घंटे (प्रति घंटा पूर्वानुमान)",
            Message::ForecastHeader => "5-दिन का पूर्वानुमान (दोपहर)",
            Message::TrendHeader => "7-दिन का तापमान रुझान",
            Message::FavouritesHeader => "पसंदीदा स्थान",
            Message::SevereAlert => "गंभीर मौसम चेतावनी! सावधानी बरतें।",
            Message::ForecastError => {
                "त्रुटि: 5-दिन का पूर्वानुमान प्राप्त नहीं किया जा सका। एपीआई कॉन्फ़िगरेशन की जाँच करें।"
            }
            Message::CityNotFound => "शहर '{}' नहीं मिला! कृपया पुनः प्रयास करें।",
            Message::FetchFailed => "मौसम डेटा प्राप्त करने में त्रुटि: {}",
            Message::CountryError => {
                "कृपया किसी देश का नाम नहीं, बल्कि एक विशिष्ट शहर का नाम दर्ज करें।"
            }
            Message::OfflineNotice => "ऑफ़लाइन डेटा (कैश) का उपयोग किया गया।",
            Message::LandmarkUnavailable => "पहचान चिह्न की तस्वीर उपलब्ध नहीं है।",
            Message::NoFavourites => "कोई पसंदीदा स्थान जोड़ा नहीं गया।",
            Message::FavouriteAdded => "{} पसंदीदा में जोड़ा गया!",
            Message::FavouriteRemoved => "{} पसंदीदा से हटाया गया!",
            Message::FavouriteAlreadyPresent => "{} पहले से आपके पसंदीदा में है!",
            Message::FavouriteMissing => "{} आपके पसंदीदा में नहीं है।",
            Message::AqiUnavailable => "उपलब्ध नहीं",
            Message::Aqi(tier) => match tier {
                AqiTier::Good => "अच्छा (1)",
                AqiTier::Fair => "ठीक (2)",
                AqiTier::Moderate => "मध्यम (3)",
                AqiTier::Poor => "खराब (4)",
                AqiTier::VeryPoor => "बहुत खराब (5)",
            },
            Message::Uv(tier) => match tier {
                UvTier::Low => "कम — न्यूनतम सुरक्षा आवश्यक।",
                UvTier::Moderate => "मध्यम — धूप का चश्मा और SPF 30+ लगाएँ।",
                UvTier::High => "उच्च — SPF 30+, टोपी पहनें, मध्य-दिवस के सूरज से बचें।",
                UvTier::VeryHigh => "बहुत उच्च — अतिरिक्त सावधानी, सूरज से बचें।",
                UvTier::Extreme => "चरम — यदि संभव हो तो अंदर रहें।",
            },
        }
    }
}

/// Localized label for an air-quality reading, "N/A" when absent.
pub fn aqi_label(tier: Option<AqiTier>, language: Language) -> &'static str {
    match tier {
        Some(tier) => Message::Aqi(tier).text(language),
        None => Message::AqiUnavailable.text(language),
    }
}
