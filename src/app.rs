use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
        Paragraph,
    },
    Frame, Terminal,
};
use std::io;

use crate::display::title_case;
use crate::weather::Forecast;

const MISSING: &str = "--";

/// Terminal state changes needed for the full-screen view.
trait TerminalModes {
    fn enable_raw(&mut self) -> io::Result<()>;
    fn enter_alternate(&mut self) -> io::Result<()>;
    fn leave_alternate(&mut self) -> io::Result<()>;
    fn disable_raw(&mut self) -> io::Result<()>;
}

struct Crossterm;

impl TerminalModes for Crossterm {
    fn enable_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn enter_alternate(&mut self) -> io::Result<()> {
        execute!(io::stdout(), EnterAlternateScreen)
    }

    fn leave_alternate(&mut self) -> io::Result<()> {
        execute!(io::stdout(), LeaveAlternateScreen, Show)
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }
}

/// Undoes whatever part of the setup succeeded, on every exit path.
struct TerminalGuard<M: TerminalModes> {
    modes: M,
    alternate: bool,
}

impl<M: TerminalModes> TerminalGuard<M> {
    fn enter(mut modes: M) -> io::Result<Self> {
        modes.enable_raw()?;
        let mut guard = TerminalGuard {
            modes,
            alternate: false,
        };
        guard.modes.enter_alternate()?;
        guard.alternate = true;
        Ok(guard)
    }
}

impl<M: TerminalModes> Drop for TerminalGuard<M> {
    fn drop(&mut self) {
        if self.alternate {
            let _ = self.modes.leave_alternate();
        }
        let _ = self.modes.disable_raw();
    }
}

/// Shows the forecast charts full-screen until `q` or `Esc` is pressed.
pub fn show(forecast: &Forecast) -> io::Result<()> {
    let _guard = TerminalGuard::enter(Crossterm)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, forecast)
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, forecast: &Forecast) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, forecast))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let KeyCode::Char('q') | KeyCode::Esc = key.code {
                return Ok(());
            }
        }
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn display_headline(forecast: &Forecast) -> Paragraph<'_> {
    let span = match (forecast.forecasts.first(), forecast.forecasts.last()) {
        (Some(first), Some(last)) => format!(" {} .. {}", first.datetime, last.datetime),
        _ => format!(" {MISSING}"),
    };
    Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                forecast.city.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  (q to close)"),
        ]),
        Line::from(span),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

/// Min and max temperature, padded by one degree so the line never sits on the border.
fn temperature_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() {
        [min.floor() - 1.0, max.ceil() + 1.0]
    } else {
        [0.0, 1.0]
    }
}

fn time_labels(forecast: &Forecast) -> Vec<Span<'static>> {
    let entries = &forecast.forecasts;
    let mut picks = vec![0, entries.len() / 2, entries.len().saturating_sub(1)];
    picks.dedup();
    picks
        .into_iter()
        .filter_map(|i| entries.get(i))
        .map(|e| Span::raw(e.datetime.get(5..16).unwrap_or(&e.datetime).to_string()))
        .collect()
}

fn ui(f: &mut Frame, forecast: &Forecast) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(60),
            Constraint::Min(6),
        ])
        .split(f.area());

    f.render_widget(display_headline(forecast), vert_layout[0]);

    if forecast.is_empty() {
        let empty = Paragraph::new(format!("\n  {MISSING}")).block(panel("Temperature"));
        f.render_widget(empty, vert_layout[1]);
        return;
    }

    let points: Vec<(f64, f64)> = forecast
        .forecasts
        .iter()
        .enumerate()
        .map(|(i, e)| (i as f64, e.temp))
        .collect();
    let [low, high] = temperature_bounds(&points);

    let dataset = Dataset::default()
        .name("°C")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(panel("Temperature"))
        .x_axis(
            Axis::default()
                .title("Date and Time")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (points.len().saturating_sub(1)).max(1) as f64])
                .labels(time_labels(forecast)),
        )
        .y_axis(
            Axis::default()
                .title("°C")
                .style(Style::default().fg(Color::Gray))
                .bounds([low, high])
                .labels(vec![
                    Span::raw(format!("{low:.0}")),
                    Span::raw(format!("{high:.0}")),
                ]),
        );
    f.render_widget(chart, vert_layout[1]);

    let frequency = forecast.condition_frequency();
    let bars: Vec<Bar> = frequency
        .iter()
        .map(|(condition, count)| {
            Bar::default()
                .value(*count)
                .label(Line::from(title_case(condition)))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let width = vert_layout[2].width.saturating_sub(2) as usize;
    let bar_width = (width / frequency.len().max(1)).saturating_sub(1).clamp(3, 16) as u16;

    let barchart = BarChart::default()
        .block(panel("Conditions"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(barchart, vert_layout[2]);
}
