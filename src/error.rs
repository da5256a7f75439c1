//! Error types for provider lookups.

use thiserror::Error;

/// A request that never produced an HTTP response (connect, timeout, body read).
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Underlying cause of a [`WeatherError::Provider`].
#[derive(Error, Debug)]
pub enum ProviderFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request error: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed response: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("malformed response: missing {0}")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("City '{city}' not found")]
    CityNotFound { city: String },

    #[error("{context}: {cause}")]
    Provider {
        context: String,
        #[source]
        cause: ProviderFailure,
    },
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CityNotFound { .. })
    }

    /// User-friendly error message for terminal display.
    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound { city } => {
                format!("City '{city}' was not found. Please check the city name.")
            }
            Self::Provider { cause, .. } => match cause {
                ProviderFailure::Status(401) => {
                    "The weather provider rejected the API key.".to_string()
                }
                ProviderFailure::Status(code) => {
                    format!("The weather provider returned HTTP {code}. Try again later.")
                }
                ProviderFailure::Transport(_) => {
                    "Network error. Check your connection.".to_string()
                }
                ProviderFailure::Payload(_) | ProviderFailure::MissingField(_) => {
                    "The weather provider sent an unexpected response.".to_string()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(cause: ProviderFailure) -> WeatherError {
        WeatherError::Provider {
            context: "fetching current weather for 'Paris'".to_string(),
            cause,
        }
    }

    #[test]
    fn test_is_not_found() {
        let err = WeatherError::CityNotFound {
            city: "Atlantis".into(),
        };
        assert!(err.is_not_found());
        assert!(!provider(ProviderFailure::Status(404)).is_not_found());
    }

    #[test]
    fn test_display_includes_context_and_cause() {
        let err = provider(ProviderFailure::Status(503));
        assert_eq!(
            err.to_string(),
            "fetching current weather for 'Paris': HTTP status 503"
        );

        let err = provider(ProviderFailure::Transport(TransportError(
            "connection refused".into(),
        )));
        assert!(err.to_string().ends_with("request error: connection refused"));
    }

    #[test]
    fn test_user_messages() {
        let err = WeatherError::CityNotFound {
            city: "Atlantis".into(),
        };
        assert!(err.user_message().contains("check the city name"));
        assert!(provider(ProviderFailure::Status(401))
            .user_message()
            .contains("API key"));
        assert!(provider(ProviderFailure::Status(500))
            .user_message()
            .contains("500"));
        assert!(provider(ProviderFailure::MissingField("weather[0]"))
            .user_message()
            .contains("unexpected"));
    }
}
