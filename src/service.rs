//! Query facade over [`WeatherClient`] for the presentation layer.
//!
//! Failures never escape as errors. Each lookup resolves to a [`Lookup`] that
//! keeps "no such city" apart from every other provider failure.

use tracing::info;

use crate::client::WeatherClient;
use crate::error::WeatherError;
use crate::weather::{Forecast, WeatherSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound { city: String },
    Failed { reason: String },
}

impl<T> Lookup<T> {
    /// The value, or `None` for either kind of failure.
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound { .. } | Lookup::Failed { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

impl<T> From<Result<T, WeatherError>> for Lookup<T> {
    fn from(result: Result<T, WeatherError>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(WeatherError::CityNotFound { city }) => Lookup::NotFound { city },
            Err(err) => Lookup::Failed {
                reason: format!("{} ({err})", err.user_message()),
            },
        }
    }
}

pub struct WeatherService {
    client: WeatherClient,
}

impl WeatherService {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub fn current(&self, city: &str) -> Lookup<WeatherSnapshot> {
        let lookup = Lookup::from(self.client.current(city));
        if let Lookup::NotFound { .. } = lookup {
            info!(city, "provider does not know this city");
        }
        lookup
    }

    pub fn forecast(&self, city: &str) -> Lookup<Forecast> {
        let lookup = Lookup::from(self.client.forecast(city));
        if let Lookup::NotFound { .. } = lookup {
            info!(city, "provider does not know this city");
        }
        lookup
    }
}
