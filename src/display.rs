//! Plain-text rendering for the shell and one-shot subcommands.

use std::fmt::Write;

use crate::service::Lookup;
use crate::weather::{Forecast, WeatherSnapshot};

/// Forecast slots shown in text mode (~2 days of 3-hour steps).
pub const FORECAST_ROWS: usize = 10;

pub const HELP: &str = "
Weather CLI Commands:
  weather <city>     Show current weather for <city>
  forecast <city>    Show 5-day forecast for <city>
  chart <city>       Chart the forecast for <city>
  help               Show this help message
  quit / exit / q    Quit the application
";

/// Upper-cases the first letter of every word: "light rain" -> "Light Rain".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

pub fn snapshot(weather: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCurrent weather in {}:", weather.city);
    let _ = writeln!(out, "  Temperature: {}°C", weather.temp);
    let _ = writeln!(out, "  Condition: {}", title_case(&weather.condition));
    let _ = writeln!(out, "  Humidity: {}%", weather.humidity);
    let _ = writeln!(out, "  Wind Speed: {} m/s", weather.wind_speed);
    out
}

pub fn forecast(forecast: &Forecast) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n5-Day Forecast for {}:", forecast.city);
    for item in forecast.forecasts.iter().take(FORECAST_ROWS) {
        let _ = writeln!(
            out,
            "  {}: {}°C, {}",
            item.datetime,
            item.temp,
            title_case(&item.condition)
        );
    }
    out
}

fn failure<T>(what: &str, city: &str, lookup: &Lookup<T>) -> String {
    match lookup {
        Lookup::NotFound { .. } => {
            format!("No city named '{city}' was found. Please check the city name.\n")
        }
        Lookup::Failed { reason } => {
            format!("Could not fetch {what} for '{city}'. {reason}\n")
        }
        Lookup::Found(_) => {
            format!("Could not fetch {what} for '{city}'. Please try again later.\n")
        }
    }
}

pub fn current_lookup(city: &str, lookup: &Lookup<WeatherSnapshot>) -> String {
    match lookup {
        Lookup::Found(weather) => snapshot(weather),
        _ => failure("weather", city, lookup),
    }
}

pub fn forecast_lookup(city: &str, lookup: &Lookup<Forecast>) -> String {
    match lookup {
        Lookup::Found(result) if !result.is_empty() => forecast(result),
        _ => failure("forecast", city, lookup),
    }
}
