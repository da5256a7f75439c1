use std::time::Duration;

use clap::builder::{styling::AnsiColor, Styles};
use clap::{Parser, Subcommand};

use crate::client::ClientConfig;
use crate::owm::BASE_URL;

const ABOUT: &str = "OpenWeatherMap weather CLI";

const LONG_ABOUT: &str = "
CLI for current weather and 5-day forecasts sourced from OpenWeatherMap.

An OpenWeatherMap API key is required, either through --api-key or the OPENWEATHER_API_KEY
environment variable (a .env file in the working directory is honored). Without a subcommand an
interactive shell is started; type 'help' there for the list of commands.

Results are cached in memory for ten minutes per city.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(
        long,
        env = "OPENWEATHER_API_KEY",
        hide_env_values = true,
        help = "OpenWeatherMap API key"
    )]
    pub api_key: String,

    #[arg(
        long,
        env = "OPENWEATHER_BASE_URL",
        default_value = BASE_URL,
        help = "Base URL of the OpenWeatherMap data API"
    )]
    pub base_url: String,

    #[arg(long, default_value_t = 5, help = "Request timeout in seconds")]
    pub timeout: u64,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Query>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Show current weather for a city
    Weather {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Show the 5-day forecast for a city
    Forecast {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Chart the 5-day forecast for a city
    Chart {
        #[arg(required = true)]
        city: Vec<String>,
    },
}

impl Query {
    /// City words joined back together, so `wx weather New York` works unquoted.
    pub fn city(&self) -> String {
        match self {
            Query::Weather { city } | Query::Forecast { city } | Query::Chart { city } => {
                city.join(" ")
            }
        }
    }
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_key, &self.base_url)
            .with_timeout(Duration::from_secs(self.timeout))
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
