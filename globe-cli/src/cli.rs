use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use globe_core::{
    Config, GlobeSession, Place, ResolutionState, Resolvers, StaticPosition, TemperatureUnit,
};
use inquire::{CustomType, Select};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "globe", version, about = "Current weather anywhere on the globe")]
pub struct Cli {
    /// Show temperatures in Fahrenheit regardless of the configured unit.
    #[arg(long, global = true)]
    pub fahrenheit: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the preferred unit and home location.
    Configure,

    /// Search for a place, pick a result and show its weather.
    Search {
        /// Free-text place name, e.g. "san fran".
        query: String,
    },

    /// Show weather for a named city.
    City {
        /// City name; bundled cities match exactly, others go to place search.
        name: String,
    },

    /// Show weather at a point.
    Show {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },

    /// Show weather at the configured home location.
    Here,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        let (state, unit) = match self.command {
            Command::Configure => return configure(config),
            Command::Search { query } => {
                let mut session = open_session(&config, self.fahrenheit)?;
                let Some(place) = pick_result(&session, &query).await? else {
                    println!("No places found for \"{query}\".");
                    return Ok(());
                };
                (session.select_result(place).await, session.unit())
            }
            Command::City { name } => {
                let mut session = open_session(&config, self.fahrenheit)?;
                let place = find_city(&session, &name).await?;
                (session.choose_place(place).await, session.unit())
            }
            Command::Show { lat, lng } => {
                let mut session = open_session(&config, self.fahrenheit)?;
                (session.click(lat, lng).await, session.unit())
            }
            Command::Here => {
                let home = StaticPosition(config.home_position()?);
                let mut session = open_session(&config, self.fahrenheit)?;
                (session.locate(&home).await, session.unit())
            }
        };

        finish(&state, unit)
    }
}

fn open_session(config: &Config, fahrenheit: bool) -> Result<GlobeSession> {
    let resolvers = Resolvers::from_config(config).context("Failed to build HTTP client")?;
    let mut session = GlobeSession::new(resolvers, config);
    if fahrenheit {
        session.set_unit(TemperatureUnit::Fahrenheit);
    }
    Ok(session)
}

fn finish(state: &ResolutionState, unit: TemperatureUnit) -> Result<()> {
    if let Some(error) = &state.error {
        return Err(anyhow!("{error}"));
    }

    match (&state.weather, &state.location) {
        (Some(weather), Some(location)) => {
            println!("{}", render::card(weather, location, unit));
            Ok(())
        }
        _ => Err(anyhow!("No weather available")),
    }
}

async fn pick_result(session: &GlobeSession, query: &str) -> Result<Option<Place>> {
    let state = session.search().search_now(query).await;
    if state.results.is_empty() {
        return Ok(None);
    }

    let options: Vec<String> = state.results.iter().map(render::place_line).collect();
    let chosen = Select::new("Choose a place:", options)
        .raw_prompt()
        .context("Selection cancelled")?;
    session.search().hover(chosen.index);

    Ok(session.search().state().selected().cloned())
}

async fn find_city(session: &GlobeSession, name: &str) -> Result<Place> {
    if let Some(place) = globe_core::Gazetteer::bundled().by_name(name) {
        return Ok(place);
    }

    session
        .search()
        .search_now(name)
        .await
        .results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No place named \"{name}\" found"))
}

fn configure(mut config: Config) -> Result<()> {
    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    config.unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Configuration cancelled")?;

    let current = config.home;
    let lat = CustomType::<f64>::new("Home latitude:")
        .with_default(current.map_or(0.0, |c| c.lat))
        .with_error_message("Please enter a number")
        .prompt()
        .context("Configuration cancelled")?;
    let lng = CustomType::<f64>::new("Home longitude:")
        .with_default(current.map_or(0.0, |c| c.lng))
        .with_error_message("Please enter a number")
        .prompt()
        .context("Configuration cancelled")?;
    config.set_home(lat, lng)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
