use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};

use weathernow_core::{
    Config, Language, Message, ProviderId, Resolver, SessionContext, Store, Theme,
    normalize_place,
    provider::{image_source_from_config, weather_source_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weathernow",
    version,
    about = "Current weather, forecast, air quality and UV guidance for a city"
)]
pub struct Cli {
    /// Output language: english or hindi. Defaults to the configured language.
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Colour theme: light or dark. Defaults to the configured theme.
    #[arg(long, global = true)]
    pub theme: Option<Theme>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "openweather" or "unsplash".
        provider: String,
    },

    /// Show weather for a city.
    Show {
        /// City name, e.g. Dehradun or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Skip the hourly and 5-day forecast.
        #[arg(long)]
        no_forecast: bool,

        /// Add the city to favourites after a successful lookup.
        #[arg(long)]
        favourite: bool,
    },

    /// Manage favourite locations.
    Favourites {
        #[command(subcommand)]
        action: Option<FavouritesAction>,
    },

    /// List entries in the offline cache.
    Cache,
}

#[derive(Debug, Subcommand)]
pub enum FavouritesAction {
    /// List favourites in the order they were added.
    List,
    /// Add a city to favourites.
    Add {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    /// Remove a city from favourites.
    Remove {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    /// Print the coordinates of every favourite.
    Locate,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let mut session = SessionContext::new(
            self.lang.unwrap_or(config.language),
            self.theme.unwrap_or(config.theme),
        );

        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, no_forecast, favourite } => {
                show(&config, &mut session, &city.join(" "), !no_forecast, favourite).await
            }
            Command::Favourites { action } => {
                favourites(&config, &session, action.unwrap_or(FavouritesAction::List)).await
            }
            Command::Cache => list_cache(&config),
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = Password::new(&format!("{id} API key:"))
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let mut config = Config::load_file()?;
    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    println!("Saved {id} credentials to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_resolver(config: &Config) -> anyhow::Result<Resolver> {
    let weather = weather_source_from_config(config)?;
    let images = image_source_from_config(config)?;
    let store = Store::open(&config.data_dir()?);

    Ok(Resolver::new(weather, store).with_images(images).with_fallback(config.fallback))
}

async fn show(
    config: &Config,
    session: &mut SessionContext,
    city: &str,
    with_forecast: bool,
    save_favourite: bool,
) -> anyhow::Result<()> {
    let mut resolver = build_resolver(config)?;

    let resolution = resolver
        .resolve(session, city)
        .await
        .map_err(|err| anyhow!(render::resolve_error(session, &err)))?;
    let secondary = resolver.resolve_secondary(&resolution).await;

    render::current(session, &resolution, &secondary);

    if with_forecast {
        match resolver.forecast(&resolution.place).await {
            Ok(forecast) => render::forecast(session, &forecast),
            Err(err) => {
                tracing::warn!(place = %resolution.place, "forecast unavailable: {err}");
                eprintln!("{}", session.text(Message::ForecastError));
            }
        }
    }

    if let Some(extended) = &secondary.extended {
        render::trend(session, &resolution.place, extended);
    }

    if save_favourite {
        let outcome = resolver.store_mut().favourites.add(&resolution.place);
        println!("{}", render::add_outcome(session, outcome, &resolution.place));
    }

    Ok(())
}

async fn favourites(
    config: &Config,
    session: &SessionContext,
    action: FavouritesAction,
) -> anyhow::Result<()> {
    match action {
        FavouritesAction::List => {
            let store = Store::open(&config.data_dir()?);
            render::favourites(session, store.favourites.names());
        }
        FavouritesAction::Add { city } => {
            let mut store = Store::open(&config.data_dir()?);
            let place = normalize_place(&city.join(" "));
            let outcome = store.favourites.add(&place);
            println!("{}", render::add_outcome(session, outcome, &place));
        }
        FavouritesAction::Remove { city } => {
            let mut store = Store::open(&config.data_dir()?);
            let place = normalize_place(&city.join(" "));
            let message = if store.favourites.remove(&place) {
                Message::FavouriteRemoved
            } else {
                Message::FavouriteMissing
            };
            println!("{}", session.format(message, &place));
        }
        FavouritesAction::Locate => {
            let resolver = build_resolver(config)?;
            if resolver.store().favourites.is_empty() {
                println!("{}", session.text(Message::NoFavourites));
                return Ok(());
            }
            for (name, coords) in resolver.locate_favourites().await {
                println!("{name:<20} {:>9.4}, {:>9.4}", coords.lat, coords.lon);
            }
        }
    }

    Ok(())
}

fn list_cache(config: &Config) -> anyhow::Result<()> {
    let store = Store::open(&config.data_dir()?);

    for (key, entry) in store.cache.entries() {
        let captured = match entry.timestamp.to_utc() {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => entry.timestamp.as_str().to_string(),
        };
        println!("{key:<24} {captured}");
    }

    Ok(())
}
