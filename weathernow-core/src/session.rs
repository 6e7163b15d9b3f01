use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    i18n::{Language, Message},
    model::WeatherSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme '{s}'. Supported themes: light, dark.")),
        }
    }
}

/// Per-interaction state, passed explicitly through resolution and rendering.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub language: Language,
    pub theme: Theme,
    /// Normalized name of the most recent query.
    pub last_query: Option<String>,
    /// Most recently displayed snapshot; cleared when a lookup fails.
    pub last_snapshot: Option<WeatherSnapshot>,
}

impl SessionContext {
    pub fn new(language: Language, theme: Theme) -> Self {
        Self { language, theme, last_query: None, last_snapshot: None }
    }

    /// Localized text for `message` in the session's language.
    pub fn text(&self, message: Message) -> &'static str {
        message.text(self.language)
    }

    /// Localized text with its `{}` placeholder filled by `arg`.
    pub fn format(&self, message: Message, arg: &str) -> String {
        self.text(message).replacen("{}", arg, 1)
    }
}
