use chrono::{DateTime, NaiveDate, NaiveDateTime};
use crossterm::style::{Color, Stylize, style};
use std::io::IsTerminal;

use weathernow_core::{
    ExtendedForecast, Forecast, Message, Origin, ResolveError, Resolution, Secondary,
    SessionContext, UvTier,
    advice::{accent_color, clothing_suggestion, is_severe},
    i18n::aqi_label,
    normalize_place,
    store::AddOutcome,
};

pub fn resolve_error(session: &SessionContext, err: &ResolveError) -> String {
    match err {
        ResolveError::AmbiguousInput(_) => session.text(Message::CountryError).to_string(),
        ResolveError::CityNotFound(place) => session.format(Message::CityNotFound, place),
        ResolveError::Fetch { message, .. } => session.format(Message::FetchFailed, message),
    }
}

pub fn add_outcome(session: &SessionContext, outcome: AddOutcome, place: &str) -> String {
    match outcome {
        AddOutcome::Added => session.format(Message::FavouriteAdded, place),
        AddOutcome::AlreadyPresent => session.format(Message::FavouriteAlreadyPresent, place),
    }
}

pub fn current(session: &SessionContext, resolution: &Resolution, secondary: &Secondary) {
    let snap = &resolution.snapshot;
    let accent = accent_color(snap.temperature_c, session.theme);

    let headline = format!("{} {}", resolution.place, session.text(Message::Weather));
    println!("{}", paint(&headline, accent));
    println!(
        "{}  {}",
        paint(&format!("{:.0} °C", snap.temperature_c), accent),
        normalize_place(&snap.description)
    );

    if let Origin::Cache { captured_at } = resolution.origin {
        match captured_at {
            Some(at) => println!(
                "! {} ({})",
                session.text(Message::OfflineNotice),
                at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => println!("! {}", session.text(Message::OfflineNotice)),
        }
    }

    println!();
    metric(session, Message::FeelsLike, format!("{:.0} °C", snap.feels_like_c));
    metric(session, Message::Humidity, format!("{} %", snap.humidity_pct));
    metric(session, Message::WindSpeed, format!("{} m/s", snap.wind_speed_mps));
    metric(session, Message::Pressure, format!("{} hPa", snap.pressure_hpa));
    metric(session, Message::Sunrise, local_clock(snap.sunrise, snap.timezone_offset));
    metric(session, Message::Sunset, local_clock(snap.sunset, snap.timezone_offset));
    metric(
        session,
        Message::AirQuality,
        aqi_label(secondary.air_quality, session.language).to_string(),
    );

    if let Some(uvi) = secondary.uv_index() {
        let advice = session.text(Message::Uv(UvTier::from_index(uvi)));
        metric(session, Message::UvIndex, format!("{uvi} — {advice}"));
    }

    if is_severe(&snap.condition) {
        println!("\n{}", session.text(Message::SevereAlert));
    }

    let tip = clothing_suggestion(
        snap.temperature_c,
        f64::from(snap.humidity_pct),
        snap.wind_speed_mps,
    );
    println!("\n{}: {tip}", session.text(Message::Clothing));

    match &secondary.landmark_image {
        Some(url) => println!("{url}"),
        None => println!("{}", session.text(Message::LandmarkUnavailable)),
    }
}

fn metric(session: &SessionContext, label: Message, value: String) {
    println!("  {:<28} {value}", session.text(label));
}

pub fn forecast(session: &SessionContext, forecast: &Forecast) {
    println!("\n{}", session.text(Message::HourlyHeader));
    for entry in forecast.next_hours() {
        println!(
            "  {:>6}  {}  {:>4.0}°C  {}",
            hour_label(&entry.dt_txt),
            condition_icon(&entry.condition),
            entry.temperature_c,
            normalize_place(&entry.description)
        );
    }

    println!("\n{}", session.text(Message::ForecastHeader));
    for entry in forecast.midday_days() {
        let day = entry
            .date()
            .map(|d| d.format("%a %b %d").to_string())
            .unwrap_or_else(|| entry.dt_txt.clone());
        println!(
            "  {day:<10}  {}  {:>4.0}°C  {}",
            condition_icon(&entry.condition),
            entry.temperature_c,
            normalize_place(&entry.description)
        );
    }
}

pub fn trend(session: &SessionContext, place: &str, extended: &ExtendedForecast) {
    if extended.daily.is_empty() {
        return;
    }

    println!("\n{} — {place}", session.text(Message::TrendHeader));
    for point in &extended.daily {
        println!("  {:<7} {:>5.1}°C", day_label(point.date), point.day_temperature_c);
    }
}

pub fn favourites(session: &SessionContext, names: &[String]) {
    if names.is_empty() {
        println!("{}", session.text(Message::NoFavourites));
        return;
    }

    println!("{}", session.text(Message::FavouritesHeader));
    for name in names {
        println!("  {name}");
    }
}

/// Wall-clock time at the place, e.g. "6:05 AM".
fn local_clock(epoch: i64, offset: i64) -> String {
    epoch
        .checked_add(offset)
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|t| t.format("%I:%M %p").to_string().trim_start_matches('0').to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// "2024-05-01 15:00:00" -> "3 PM".
fn hour_label(dt_txt: &str) -> String {
    NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.format("%I %p").to_string().trim_start_matches('0').to_string())
        .unwrap_or_else(|_| dt_txt.to_string())
}

fn day_label(date: NaiveDate) -> String {
    date.format("%a %d").to_string()
}

fn condition_icon(condition: &str) -> &'static str {
    match condition.to_ascii_lowercase().as_str() {
        "clear" => "☀",
        "clouds" => "☁",
        "rain" => "🌧",
        "thunderstorm" => "⛈",
        "snow" => "❄",
        "drizzle" => "☔",
        "mist" | "haze" | "fog" | "smoke" | "dust" | "sand" => "🌫",
        _ => "❓",
    }
}

/// Bold `text` in a "#RRGGBB" accent when stdout is a terminal.
fn paint(text: &str, hex: &str) -> String {
    if !std::io::stdout().is_terminal() {
        return text.to_string();
    }
    match accent(hex) {
        Some(color) => style(text).with(color).bold().to_string(),
        None => text.to_string(),
    }
}

fn accent(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathernow_core::{Language, Theme};

    #[test]
    fn local_clock_applies_offset_and_trims_zero() {
        // 00:35 UTC + 5:30 = 06:05 local
        assert_eq!(local_clock(2100, 19800), "6:05 AM");
        assert_eq!(local_clock(13 * 3600, 0), "1:00 PM");
    }

    #[test]
    fn hour_label_formats_twelve_hour_clock() {
        assert_eq!(hour_label("2024-05-01 15:00:00"), "3 PM");
        assert_eq!(hour_label("2024-05-01 00:00:00"), "12 AM");
        assert_eq!(hour_label("garbage"), "garbage");
    }

    #[test]
    fn hazy_conditions_share_mist_icon() {
        assert_eq!(condition_icon("Haze"), "🌫");
        assert_eq!(condition_icon("Smoke"), "🌫");
        assert_eq!(condition_icon("Tornado"), "❓");
    }

    #[test]
    fn local_clock_survives_out_of_range_offsets() {
        assert_eq!(local_clock(i64::MAX, 19800), "--");
        assert_eq!(local_clock(i64::MIN, -3600), "--");
    }

    #[test]
    fn accent_hex_becomes_rgb_colour() {
        assert_eq!(accent("#E94E2C"), Some(Color::Rgb { r: 0xE9, g: 0x4E, b: 0x2C }));
        assert_eq!(accent("E94E2C"), None);
        assert_eq!(accent("#12"), None);
    }

    #[test]
    fn paint_is_plain_off_terminal() {
        // Only checkable when stdout is redirected.
        if !std::io::stdout().is_terminal() {
            assert_eq!(paint("Delhi", "#E94E2C"), "Delhi");
        }
    }

    #[test]
    fn errors_are_localized() {
        let hindi = SessionContext::new(Language::Hindi, Theme::Light);
        let msg = resolve_error(&hindi, &ResolveError::CityNotFound("Agra".into()));
        assert_eq!(msg, "शहर 'Agra' नहीं मिला! कृपया पुनः प्रयास करें।");

        let english = SessionContext::new(Language::English, Theme::Dark);
        let msg = resolve_error(&english, &ResolveError::AmbiguousInput("France".into()));
        assert!(msg.contains("not a country name"));
    }
}
