//! Current weather and short-term forecasts from OpenWeatherMap, cached in
//! memory and rendered as text or terminal charts.

pub mod app;
pub mod cache;
pub mod cli;
pub mod client;
pub mod display;
pub mod error;
pub mod owm;
pub mod repl;
pub mod service;
pub mod weather;

pub use cache::{Clock, Endpoint, ManualClock, SystemClock, WeatherCache, CACHE_TTL_SECS};
pub use client::{ClientConfig, WeatherClient};
pub use error::{ProviderFailure, TransportError, WeatherError};
pub use service::{Lookup, WeatherService};
pub use weather::{Forecast, ForecastEntry, WeatherSnapshot};
