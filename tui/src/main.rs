//! medcast Dashboard — interactive Ratatui TUI
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  medcast    Medication Consumption and Forecast for Meropenem 1g    │
//!   ├─── controls ──────────┬─── chart ───────────────────────────────────┤
//!   │  Medication           │  Daily Consumption                          │
//!   │  Forecast days        │  N-Day MA                                   │
//!   │  MA window            │  Forecasted Consumption                     │
//!   │  Comorbidity metric   │                                             │
//!   │  Predicted score      │                                             │
//!   ├───────────────────────┴─────────────────────────────────────────────┤
//!   │  Summary                                                            │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! Usage:
//!   cargo run -p medcast-tui [-- CONFIG.toml]

use std::{io, path::PathBuf, time::Duration};

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame, Terminal,
};

use medcast_config::MedcastConfig;
use medcast_contracts::{
    chart::{Dashboard, LineStyle, Series},
    error::MedcastResult,
    query::ForecastQuery,
};
use medcast_ref_hospital::Session;

// ── App state ─────────────────────────────────────────────────────────────────

/// Row labels of the controls panel, top to bottom.
const CONTROL_LABELS: [&str; 5] = [
    "Medication",
    "Forecast days",
    "MA window",
    "Comorbidity metric",
    "Predicted score",
];

struct App {
    session: Session,

    // Catalog names, plus the configured default if it is not in the catalog.
    medications: Vec<String>,
    med_index: usize,

    query: ForecastQuery,

    // Most recent computation. `error` is set instead when it failed.
    dashboard: Option<Dashboard>,
    error: Option<String>,
}

impl App {
    fn new(session: Session) -> MedcastResult<Self> {
        let query = session.default_query()?;

        let mut medications: Vec<String> = session
            .dataset()
            .catalog()
            .names()
            .map(str::to_string)
            .collect();
        let med_index = match medications.iter().position(|m| *m == query.medication) {
            Some(i) => i,
            None => {
                medications.push(query.medication.clone());
                medications.len() - 1
            }
        };

        let mut app = Self {
            session,
            medications,
            med_index,
            query,
            dashboard: None,
            error: None,
        };
        app.recompute();
        Ok(app)
    }

    /// Rerun the pipeline for the current controls.
    fn recompute(&mut self) {
        match self.session.compute(&self.query) {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.error = None;
            }
            Err(e) => {
                self.dashboard = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn select_medication(&mut self, forward: bool) {
        let n = self.medications.len();
        self.med_index = if forward {
            (self.med_index + 1) % n
        } else {
            (self.med_index + n - 1) % n
        };
        self.query.medication = self.medications[self.med_index].clone();
    }

    /// Apply one key press. Returns `false` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,

            KeyCode::Right => self.select_medication(true),
            KeyCode::Left => self.select_medication(false),

            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.query.forecast_days = self.query.forecast_days.increment();
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.query.forecast_days = self.query.forecast_days.decrement();
            }

            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.query.ma_window = self.query.ma_window.next();
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.query.comorbidity_stat = self.query.comorbidity_stat.toggled();
            }

            KeyCode::Up => {
                self.query.predicted_comorbidity = self.query.predicted_comorbidity.stepped(1);
            }
            KeyCode::Down => {
                self.query.predicted_comorbidity = self.query.predicted_comorbidity.stepped(-1);
            }

            // Same controls, fresh forecast draw.
            KeyCode::Char('r') | KeyCode::Char('R') => {}

            _ => return true,
        }
        self.recompute();
        true
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let full = f.area();

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(12),   // controls + chart
            Constraint::Length(6), // summary
            Constraint::Length(3), // footer
        ])
        .split(full);

    render_header(f, outer_chunks[0], app);

    let mid_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(outer_chunks[1]);

    render_controls(f, mid_chunks[0], app);
    render_chart(f, mid_chunks[1], app);
    render_summary(f, outer_chunks[2], app);
    render_footer(f, outer_chunks[3]);
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let chart_title = app
        .dashboard
        .as_ref()
        .map(|d| d.chart.title.clone())
        .unwrap_or_default();

    let header = Paragraph::new(Line::from(vec![
        Span::styled("medcast Dashboard    ", title_style),
        Span::styled(chart_title, Style::default().fg(Color::White)),
    ]))
    .block(bordered(""));
    f.render_widget(header, area);
}

fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let q = &app.query;
    let values = [
        q.medication.clone(),
        format!("{} day(s)", q.forecast_days.days()),
        format!("{}-day", q.ma_window.days()),
        q.comorbidity_stat.label().to_string(),
        format!(
            "{:.1}  (×{:.2})",
            q.predicted_comorbidity.score(),
            q.predicted_comorbidity.scale_factor()
        ),
    ];
    let keys = ["←/→", "-/+", "w", "m", "↓/↑"];

    let mut lines: Vec<Line> = Vec::new();
    for ((label, value), key) in CONTROL_LABELS.iter().zip(&values).zip(keys) {
        lines.push(Line::from(vec![
            Span::styled(format!(" {label:<19}"), Style::default().fg(Color::Gray)),
            Span::styled(format!("[{key}]"), Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {value}"),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
    }

    if !app.session.dataset().catalog().contains(&q.medication) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " not in catalog",
            Style::default().fg(Color::Yellow),
        )));
    }

    let panel = Paragraph::new(lines).block(bordered(" Controls "));
    f.render_widget(panel, area);
}

/// Chart points as `(days since origin, value)`.
fn plot_points(series: &Series, origin: NaiveDate) -> Vec<(f64, f64)> {
    series
        .points
        .iter()
        .map(|p| ((p.date - origin).num_days() as f64, p.value))
        .collect()
}

/// Evenly spaced date labels across `[first, last]`.
fn date_labels(first: NaiveDate, last: NaiveDate) -> Vec<Span<'static>> {
    let span_days = (last - first).num_days();
    let mid = first + chrono::Days::new((span_days / 2).max(0) as u64);
    let mut dates = vec![first, mid, last];
    dates.dedup();
    dates
        .into_iter()
        .map(|d| Span::raw(d.format("%m-%d").to_string()))
        .collect()
}

/// Rendering per series. The forecast is drawn as scattered dots in its own
/// color since a terminal chart cannot dash a line.
fn series_look(series: &Series, index: usize) -> (GraphType, Marker, Color) {
    match (series.style, index) {
        (LineStyle::Dashed, _) => (GraphType::Scatter, Marker::Dot, Color::Magenta),
        (LineStyle::Solid, 0) => (GraphType::Line, Marker::Braille, Color::Cyan),
        (LineStyle::Solid, _) => (GraphType::Line, Marker::Braille, Color::Yellow),
    }
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let Some(dashboard) = &app.dashboard else {
        let msg = Paragraph::new(Span::styled(
            app.error.clone().unwrap_or_default(),
            Style::default().fg(Color::Red),
        ))
        .wrap(Wrap { trim: true })
        .block(bordered(" Chart "));
        f.render_widget(msg, area);
        return;
    };

    let chart = &dashboard.chart;
    let Some((first, last)) = chart.date_bounds() else {
        let msg = Paragraph::new(Span::styled(
            format!("No consumption data for {}", dashboard.query.medication),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .block(bordered(" Chart "));
        f.render_widget(msg, area);
        return;
    };

    let series = chart.series();
    let points: Vec<Vec<(f64, f64)>> = series.iter().map(|s| plot_points(s, first)).collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&points)
        .enumerate()
        .filter(|(_, (s, _))| !s.is_empty())
        .map(|(i, (s, data))| {
            let (graph_type, marker, color) = series_look(s, i);
            Dataset::default()
                .name(s.name.clone())
                .graph_type(graph_type)
                .marker(marker)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let x_max = ((last - first).num_days() as f64).max(1.0);
    let y_max = (chart.max_value() * 1.1).max(1.0);
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.1}", y_max / 2.0)),
        Span::raw(format!("{:.1}", y_max)),
    ];

    let widget = Chart::new(datasets)
        .block(bordered(" Chart "))
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(date_labels(first, last)),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    f.render_widget(widget, area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.dashboard, &app.error) {
        (Some(d), _) => Line::from(Span::styled(
            d.summary.clone(),
            Style::default().fg(Color::White),
        )),
        (None, Some(e)) => Line::from(Span::styled(
            format!("Error: {e}"),
            Style::default().fg(Color::Red),
        )),
        (None, None) => Line::from(""),
    };

    let panel = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(bordered(" Summary "));
    f.render_widget(panel, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let spans: Vec<Span> = vec![
        Span::styled(" [←/→] ", key),
        Span::raw("Medication  "),
        Span::styled("[-/+] ", key),
        Span::raw("Days  "),
        Span::styled("[w] ", key),
        Span::raw("MA window  "),
        Span::styled("[m] ", key),
        Span::raw("Mean/Median  "),
        Span::styled("[↓/↑] ", key),
        Span::raw("Predicted  "),
        Span::styled("[r] ", key),
        Span::raw("Resample  "),
        Span::styled("[q] ", key),
        Span::raw("Quit"),
    ];

    let footer = Paragraph::new(Line::from(spans)).block(bordered(""));
    f.render_widget(footer, area);
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn start_app() -> MedcastResult<App> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = MedcastConfig::load(path.as_deref())?;
    config.validate()?;
    App::new(Session::start(config)?)
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    // Fail before touching the terminal so the error stays readable.
    let mut app = start_app().map_err(|e| io::Error::other(e.to_string()))?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                    break;
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
