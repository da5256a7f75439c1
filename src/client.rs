//! Fetch-and-cache client for the current-weather and forecast endpoints.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::cache::{Endpoint, WeatherCache};
use crate::error::{ProviderFailure, WeatherError};
use crate::owm::{self, BlockingTransport, HttpResponse, Transport};
use crate::weather::{Forecast, ForecastEntry, WeatherSnapshot};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub current_url: String,
    pub forecast_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Endpoints derived from `base_url` (e.g. `https://api.openweathermap.org/data/2.5`).
    pub fn new(api_key: &str, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            api_key: api_key.to_string(),
            current_url: format!("{base}/weather"),
            forecast_url: format!("{base}/forecast"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Current => &self.current_url,
            Endpoint::Forecast => &self.forecast_url,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("current_url", &self.current_url)
            .field("forecast_url", &self.forecast_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fetch-and-cache client.
///
/// Meant for one caller at a time. The cache is safe to share, but its
/// check-then-fetch-then-store sequence is not atomic per city: concurrent
/// misses for the same key each issue a request and the last store wins.
/// Callers that share a client across threads must serialize lookups per
/// `(endpoint, city)` themselves.
pub struct WeatherClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<WeatherCache>,
}

impl WeatherClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<WeatherCache>,
    ) -> Self {
        Self {
            config,
            transport,
            cache,
        }
    }

    /// Client talking to the provider over blocking reqwest.
    pub fn connect(config: ClientConfig, cache: Arc<WeatherCache>) -> Result<Self, WeatherError> {
        let transport =
            BlockingTransport::new(config.timeout).map_err(|e| WeatherError::Provider {
                context: "building HTTP client".to_string(),
                cause: e.into(),
            })?;
        Ok(Self::new(config, Arc::new(transport), cache))
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Current conditions for `city`, served from cache while fresh.
    #[instrument(skip(self), level = "debug")]
    pub fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        if let Some(snapshot) = self.cache.current(city) {
            debug!("cache hit");
            return Ok(snapshot);
        }

        let payload: owm::current::Current = self.fetch(Endpoint::Current, city)?;
        let snapshot = normalize_current(payload)
            .map_err(|cause| provider_error(Endpoint::Current, city, cause))?;
        self.cache.store_current(city, snapshot.clone());
        Ok(snapshot)
    }

    /// Forecast for `city` in provider order, served from cache while fresh.
    #[instrument(skip(self), level = "debug")]
    pub fn forecast(&self, city: &str) -> Result<Forecast, WeatherError> {
        if let Some(forecast) = self.cache.forecast(city) {
            debug!("cache hit");
            return Ok(forecast);
        }

        let payload: owm::forecast::Forecast = self.fetch(Endpoint::Forecast, city)?;
        let forecast = normalize_forecast(payload)
            .map_err(|cause| provider_error(Endpoint::Forecast, city, cause))?;
        self.cache.store_forecast(city, forecast.clone());
        Ok(forecast)
    }

    fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint, city: &str) -> Result<T, WeatherError> {
        let url = self.config.url(endpoint);
        debug!(url, "cache miss, requesting");
        let query = [
            ("q", city),
            ("appid", self.config.api_key.as_str()),
            ("units", "metric"),
        ];

        self.transport
            .get(url, &query)
            .map_err(|e| provider_error(endpoint, city, e.into()))
            .and_then(|response| decode(endpoint, city, response))
            .inspect_err(|err| warn!(%endpoint, city, error = %err, "provider request failed"))
    }
}

/// Status is checked before the body: 404 first, then any other non-2xx.
fn decode<T: DeserializeOwned>(
    endpoint: Endpoint,
    city: &str,
    response: HttpResponse,
) -> Result<T, WeatherError> {
    if response.status == 404 {
        return Err(WeatherError::CityNotFound {
            city: city.to_string(),
        });
    }
    if !response.is_success() {
        let cause = ProviderFailure::Status(response.status);
        return Err(provider_error(endpoint, city, cause));
    }
    serde_json::from_str(&response.body).map_err(|e| provider_error(endpoint, city, e.into()))
}

fn provider_error(endpoint: Endpoint, city: &str, cause: ProviderFailure) -> WeatherError {
    WeatherError::Provider {
        context: format!("fetching {endpoint} for '{city}'"),
        cause,
    }
}

fn first_description(weather: Vec<owm::Description>) -> Result<String, ProviderFailure> {
    weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or(ProviderFailure::MissingField("weather[0].description"))
}

fn normalize_current(payload: owm::current::Current) -> Result<WeatherSnapshot, ProviderFailure> {
    Ok(WeatherSnapshot {
        city: payload.name,
        temp: payload.main.temp,
        condition: first_description(payload.weather)?,
        humidity: payload.main.humidity,
        wind_speed: payload.wind.speed,
    })
}

fn normalize_forecast(payload: owm::forecast::Forecast) -> Result<Forecast, ProviderFailure> {
    let forecasts = payload
        .list
        .into_iter()
        .map(|item| {
            Ok(ForecastEntry {
                datetime: item.dt_txt,
                temp: item.main.temp,
                condition: first_description(item.weather)?,
            })
        })
        .collect::<Result<Vec<_>, ProviderFailure>>()?;

    Ok(Forecast {
        city: payload.city.name,
        forecasts,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use parking_lot::Mutex;

    use crate::error::TransportError;
    use crate::owm::{HttpResponse, Transport};

    /// Replays queued responses and records every request it sees.
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, status: u16, body: serde_json::Value) -> &Self {
            self.replies.lock().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn reply_raw(&self, status: u16, body: &str) -> &Self {
            self.replies.lock().push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(&self, message: &str) -> &Self {
            self.replies
                .lock()
                .push_back(Err(TransportError(message.to_string())));
            self
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().len()
        }

        pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.requests.lock().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
            self.requests.lock().push((
                url.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            self.replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
        }
    }

    pub fn current_body(name: &str, temp: f64) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "main": {"temp": temp, "humidity": 60},
            "weather": [{"description": "rain"}],
            "wind": {"speed": 2.0}
        })
    }

    pub fn forecast_body(name: &str) -> serde_json::Value {
        serde_json::json!({
            "city": {"name": name},
            "list": [
                {"dt_txt": "2025-01-01 00:00:00", "main": {"temp": 1}, "weather": [{"description": "snow"}]},
                {"dt_txt": "2025-01-01 03:00:00", "main": {"temp": 2}, "weather": [{"description": "cloudy"}]}
            ]
        })
    }
}
