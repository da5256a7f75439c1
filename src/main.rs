use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use owx::cli::{Args, Query};
use owx::repl::Repl;
use owx::{app, display, Lookup, WeatherCache, WeatherClient, WeatherService};

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_query(service: &WeatherService, query: &Query) -> anyhow::Result<()> {
    let city = query.city();
    match query {
        Query::Weather { .. } => {
            print!("{}", display::current_lookup(&city, &service.current(&city)));
        }
        Query::Forecast { .. } => {
            print!("{}", display::forecast_lookup(&city, &service.forecast(&city)));
        }
        Query::Chart { .. } => match service.forecast(&city) {
            Lookup::Found(forecast) if !forecast.is_empty() => {
                app::show(&forecast).context("failed to draw forecast chart")?;
            }
            lookup => print!("{}", display::forecast_lookup(&city, &lookup)),
        },
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(args.log_level());
    match dotenv {
        Ok(path) => tracing::info!("Loaded environment variables from {}", path.display()),
        Err(e) => tracing::debug!("No .env file loaded: {}", e),
    }

    let config = args.client_config();
    tracing::debug!(?config, "starting");

    let cache = Arc::new(WeatherCache::default());
    let client = WeatherClient::connect(config, cache).context("failed to set up HTTP client")?;
    let service = WeatherService::new(client);

    match &args.command {
        Some(query) => run_query(&service, query),
        None => {
            let stdin = io::stdin();
            Repl::new(&service)
                .run(stdin.lock(), io::stdout())
                .context("shell I/O failed")
        }
    }
}
