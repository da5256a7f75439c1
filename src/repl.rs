//! Interactive `weather>` shell.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::display;
use crate::service::{Lookup, WeatherService};
use crate::weather::Forecast;

pub const PROMPT: &str = "weather> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Weather(String),
    Forecast(String),
    Chart(String),
    /// A city command given without a city.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parses one input line; `None` for a blank line.
    ///
    /// The first word is the command (case-insensitive), the rest of the line
    /// is the city and may contain spaces.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let word = word.to_lowercase();

        let with_city = |name: &'static str, make: fn(String) -> Command| {
            if arg.is_empty() {
                Command::Usage(name)
            } else {
                make(arg.to_string())
            }
        };

        Some(match word.as_str() {
            "quit" | "exit" | "q" => Command::Quit,
            "help" => Command::Help,
            "weather" => with_city("weather", Command::Weather),
            "forecast" => with_city("forecast", Command::Forecast),
            "chart" => with_city("chart", Command::Chart),
            _ => Command::Unknown(word),
        })
    }
}

type ChartFn = Box<dyn Fn(&Forecast) -> io::Result<()>>;

pub struct Repl<'a> {
    service: &'a WeatherService,
    chart: ChartFn,
}

impl<'a> Repl<'a> {
    pub fn new(service: &'a WeatherService) -> Self {
        Self {
            service,
            chart: Box::new(crate::app::show),
        }
    }

    /// Replaces the full-screen chart view, e.g. for headless use.
    pub fn with_chart(mut self, chart: impl Fn(&Forecast) -> io::Result<()> + 'static) -> Self {
        self.chart = Box::new(chart);
        self
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        writeln!(
            output,
            "Welcome to the Weather CLI App! Type 'help' for commands."
        )?;
        let mut lines = input.lines();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                writeln!(output)?;
                return Ok(());
            };
            let Some(command) = Command::parse(&line?) else {
                continue;
            };
            debug!(?command, "shell command");

            if command == Command::Quit {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
            self.execute(command, &mut output)?;
        }
    }

    pub fn execute<W: Write>(&self, command: Command, output: &mut W) -> io::Result<()> {
        match command {
            Command::Quit => {}
            Command::Help => write!(output, "{}", display::HELP)?,
            Command::Weather(city) => {
                let lookup = self.service.current(&city);
                write!(output, "{}", display::current_lookup(&city, &lookup))?;
            }
            Command::Forecast(city) => {
                let lookup = self.service.forecast(&city);
                write!(output, "{}", display::forecast_lookup(&city, &lookup))?;
            }
            Command::Chart(city) => match self.service.forecast(&city) {
                Lookup::Found(forecast) if !forecast.is_empty() => {
                    if let Err(err) = (self.chart)(&forecast) {
                        warn!(city = %city, error = %err, "chart view failed");
                        writeln!(output, "Could not draw chart for '{city}': {err}")?;
                    }
                }
                lookup => write!(output, "{}", display::forecast_lookup(&city, &lookup))?,
            },
            Command::Usage(name) => writeln!(output, "Usage: {name} <city>")?,
            Command::Unknown(word) => writeln!(
                output,
                "Unknown command: {word}. Type 'help' for available commands."
            )?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::cache::WeatherCache;
    use crate::client::testing::{current_body, forecast_body, ScriptedTransport};
    use crate::client::{ClientConfig, WeatherClient};
    use serde_json::json;

    fn service() -> (Arc<ScriptedTransport>, WeatherService) {
        let transport = Arc::new(ScriptedTransport::new());
        let client = WeatherClient::new(
            ClientConfig::new("key", "http://provider.test"),
            transport.clone(),
            Arc::new(WeatherCache::default()),
        );
        (transport, WeatherService::new(client))
    }

    fn run(repl: &Repl, script: &str) -> String {
        let mut out = Vec::new();
        repl.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("Q"), Some(Command::Quit));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("HELP"), Some(Command::Help));
        assert_eq!(
            Command::parse("weather  New York "),
            Some(Command::Weather("New York".into()))
        );
        assert_eq!(
            Command::parse("Forecast paris"),
            Some(Command::Forecast("paris".into()))
        );
        assert_eq!(Command::parse("chart"), Some(Command::Usage("chart")));
        assert_eq!(
            Command::parse("wether paris"),
            Some(Command::Unknown("wether".into()))
        );
    }

    #[test]
    fn test_session_prints_weather_and_quits() {
        let (transport, service) = service();
        transport.reply(200, current_body("Paris", 12.5));
        let repl = Repl::new(&service);

        let out = run(&repl, "\nweather paris\nweather PARIS\nquit\nweather Rome\n");
        assert!(out.starts_with("Welcome to the Weather CLI App!"));
        assert_eq!(out.matches("Current weather in Paris:").count(), 2);
        assert!(out.contains("Condition: Rain"));
        assert!(out.trim_end().ends_with("Goodbye!"));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_session_reports_errors_and_usage() {
        let (transport, service) = service();
        transport.reply(404, json!({})).reply(500, json!({}));
        let repl = Repl::new(&service);

        let out = run(&repl, "weather Atlantis\nforecast Berlin\nforecast\nfoo\nhelp\n");
        assert!(out.contains("No city named 'Atlantis' was found"));
        assert!(out.contains("Could not fetch forecast for 'Berlin'"));
        assert!(out.contains("Usage: forecast <city>"));
        assert!(out.contains("Unknown command: foo."));
        assert!(out.contains("Weather CLI Commands:"));
    }

    #[test]
    fn test_chart_failure_keeps_session_alive() {
        let (transport, service) = service();
        transport
            .reply(200, forecast_body("Oslo"))
            .reply(200, current_body("Rome", 21.0));
        let repl = Repl::new(&service)
            .with_chart(|_| Err(io::Error::other("not a terminal")));

        let out = run(&repl, "chart oslo\nweather rome\n");
        assert!(out.contains("Could not draw chart for 'oslo': not a terminal"));
        assert!(out.contains("Current weather in Rome:"));
    }

    #[test]
    fn test_chart_command_hands_forecast_to_view() {
        let (transport, service) = service();
        transport.reply(200, forecast_body("Oslo"));
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = seen.clone();
        let repl = Repl::new(&service).with_chart(move |forecast| {
            sink.borrow_mut().push(forecast.city.clone());
            Ok(())
        });

        let out = run(&repl, "chart oslo\nforecast Oslo\n");
        assert_eq!(*seen.borrow(), vec!["Oslo".to_string()]);
        assert!(out.contains("5-Day Forecast for Oslo:"));
        assert_eq!(transport.calls(), 1);
    }
}
