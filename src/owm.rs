//! OpenWeatherMap wire types and the HTTP seam used to reach them.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::TransportError;

pub const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const USER_AGENT: &str = "owx";

pub mod current {
    use super::*;

    /// Body of `GET <base>/weather`.
    #[derive(Deserialize, Debug)]
    pub struct Current {
        pub name: String,

        pub main: Main,

        pub weather: Vec<Description>,

        pub wind: Wind,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp: f64,

        pub humidity: u8,
    }

    #[derive(Deserialize, Debug)]
    pub struct Wind {
        pub speed: f64,
    }
}

pub mod forecast {
    use super::*;

    /// Body of `GET <base>/forecast`.
    #[derive(Deserialize, Debug)]
    pub struct Forecast {
        pub city: City,

        pub list: Vec<Item>,
    }

    #[derive(Deserialize, Debug)]
    pub struct City {
        pub name: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct Item {
        pub dt_txt: String,

        pub main: Main,

        pub weather: Vec<Description>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Main {
        pub temp: f64,
    }
}

#[derive(Deserialize, Debug)]
pub struct Description {
    pub description: String,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests on behalf of the client.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a blocking reqwest client with a fixed timeout.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: Client,
}

impl BlockingTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for BlockingTransport {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_payload_ignores_extra_fields() {
        let body = r#"{
            "coord": {"lon": 2.35, "lat": 48.85},
            "name": "Paris",
            "main": {"temp": 11.2, "feels_like": 10.1, "humidity": 81},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
            "wind": {"speed": 4.6, "deg": 230}
        }"#;
        let current: current::Current = serde_json::from_str(body).unwrap();
        assert_eq!(current.name, "Paris");
        assert_eq!(current.main.humidity, 81);
        assert_eq!(current.weather[0].description, "light rain");
        assert_eq!(current.wind.speed, 4.6);
    }

    #[test]
    fn test_forecast_payload_integer_temperatures() {
        let body = r#"{
            "city": {"name": "Oslo"},
            "list": [
                {"dt_txt": "2025-01-01 00:00:00", "main": {"temp": -4}, "weather": [{"description": "snow"}]}
            ]
        }"#;
        let forecast: forecast::Forecast = serde_json::from_str(body).unwrap();
        assert_eq!(forecast.city.name, "Oslo");
        assert_eq!(forecast.list[0].main.temp, -4.0);
    }

    #[test]
    fn test_is_success() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let missing = HttpResponse {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }
}
