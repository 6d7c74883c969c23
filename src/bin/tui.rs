// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! evcharge-tui: interactive terminal front end. Every input change reruns
//! the estimate and redraws the power curve and charging progress charts.

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ev_charge_estimator::config::{self, Config};
use ev_charge_estimator::report::{self, EstimateReport};
use ev_charge_estimator::simulator::ChargeSession;
use ev_charge_estimator::store::{CurveStore, PowerSource};
use ev_charge_estimator::temperature::{Chemistry, TemperatureModel};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Tabs},
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "evcharge-tui", about = "Interactive EV charging estimator")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// CSV curve to import at start-up.
    #[arg(long)]
    curve: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Estimate,
    PowerCurve,
    Progress,
    Curve,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Estimate, Tab::PowerCurve, Tab::Progress, Tab::Curve];

    fn index(self) -> usize {
        match self {
            Tab::Estimate => 0,
            Tab::PowerCurve => 1,
            Tab::Progress => 2,
            Tab::Curve => 3,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Estimate => "Estimate",
            Tab::PowerCurve => "Power Curve",
            Tab::Progress => "Progress",
            Tab::Curve => "Curve Import",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputField {
    StartSoc,
    EndSoc,
    MaxPower,
    Temperature,
    Chemistry,
    Preheated,
}

impl InputField {
    const ALL: [InputField; 6] = [
        InputField::StartSoc,
        InputField::EndSoc,
        InputField::MaxPower,
        InputField::Temperature,
        InputField::Chemistry,
        InputField::Preheated,
    ];

    fn label(self) -> &'static str {
        match self {
            InputField::StartSoc => "Start SOC",
            InputField::EndSoc => "End SOC",
            InputField::MaxPower => "Max power",
            InputField::Temperature => "Ambient temp",
            InputField::Chemistry => "Chemistry",
            InputField::Preheated => "Preheated",
        }
    }

    fn value(self, s: &ChargeSession) -> String {
        match self {
            InputField::StartSoc => format!("{}%", s.start_soc),
            InputField::EndSoc => format!("{}%", s.end_soc),
            InputField::MaxPower => format!("{:.0} kW", s.max_power_kw),
            InputField::Temperature => format!("{:.0}°C", s.ambient_temp_c),
            InputField::Chemistry => s.chemistry.to_string(),
            InputField::Preheated => if s.preheated { "yes" } else { "no" }.to_string(),
        }
    }
}

struct App {
    tab: Tab,
    running: bool,
    status_message: String,

    // Inputs
    session: ChargeSession,
    selected_input: usize,

    // Model
    store: CurveStore,
    temperature: TemperatureModel,
    report: EstimateReport,

    // Curve import
    import_path: String,
    editing_path: bool,
    imported_from: Option<PathBuf>,

    // Config
    config: Config,
    config_path: PathBuf,
}

impl App {
    fn new(config_path: PathBuf, curve: Option<PathBuf>) -> Self {
        let config = config::load_config(&config_path).unwrap_or_else(|e| {
            log::warn!("Could not load config: {e}, using defaults");
            Config::default()
        });
        let session = config.session.to_session();
        let temperature = config.temperature_model();
        let store = CurveStore::new();
        let report = report::build_report(&store, &temperature, &session);

        let mut app = Self {
            tab: Tab::Estimate,
            running: true,
            status_message: String::new(),
            session,
            selected_input: 0,
            store,
            temperature,
            report,
            import_path: String::new(),
            editing_path: false,
            imported_from: None,
            config,
            config_path,
        };

        if let Some(path) = curve.or_else(|| app.config.curve.user_curve.clone()) {
            app.import_curve(&path);
        }
        app
    }

    fn recompute(&mut self) {
        self.report = report::build_report(&self.store, &self.temperature, &self.session);
    }

    fn import_curve(&mut self, path: &Path) {
        match self.store.import_file(path) {
            Ok(n) => {
                self.imported_from = Some(path.to_path_buf());
                self.status_message = format!("Imported {n} point(s) from {}", path.display());
            }
            Err(e) => {
                self.status_message = format!("Import failed: {e} (curve unchanged)");
            }
        }
        self.recompute();
    }

    fn remove_curve(&mut self) {
        if self.store.clear_user_curve() {
            self.imported_from = None;
            self.status_message = "Removed imported curve".to_string();
            self.recompute();
        } else {
            self.status_message = "No imported curve to remove".to_string();
        }
    }

    fn adjust(&mut self, direction: i32, coarse: bool) {
        let s = &mut self.session;
        match InputField::ALL[self.selected_input] {
            InputField::StartSoc => s.start_soc = step_soc(s.start_soc, direction * step(coarse, 10, 1)),
            InputField::EndSoc => s.end_soc = step_soc(s.end_soc, direction * step(coarse, 10, 1)),
            InputField::MaxPower => {
                let delta = (direction * step(coarse, 25, 5)) as f64;
                s.max_power_kw = (s.max_power_kw + delta).clamp(5.0, 400.0);
            }
            InputField::Temperature => {
                let delta = (direction * step(coarse, 5, 1)) as f64;
                s.ambient_temp_c = (s.ambient_temp_c + delta).clamp(-30.0, 50.0);
            }
            InputField::Chemistry => {
                let n = Chemistry::ALL.len() as i32;
                let idx = Chemistry::ALL
                    .iter()
                    .position(|&c| c == s.chemistry)
                    .unwrap_or(0) as i32;
                s.chemistry = Chemistry::ALL[(idx + direction).rem_euclid(n) as usize];
            }
            InputField::Preheated => s.preheated = !s.preheated,
        }
        self.recompute();
    }

    fn save_config(&mut self) {
        self.config.session = self.session.into();
        self.config.curve.user_curve = self.imported_from.clone();
        self.status_message = match config::save_config(&self.config_path, &self.config) {
            Ok(()) => format!("Config saved to {}", self.config_path.display()),
            Err(e) => format!("Failed to save config: {e}"),
        };
    }

    fn reload_config(&mut self) {
        match config::load_config(&self.config_path) {
            Ok(cfg) => {
                self.session = cfg.session.to_session();
                self.temperature = cfg.temperature_model();
                self.config = cfg;
                self.status_message = "Config reloaded".to_string();
                if let Some(path) = self.config.curve.user_curve.clone() {
                    self.import_curve(&path);
                } else {
                    self.recompute();
                }
            }
            Err(e) => {
                self.status_message = format!("Failed to reload config: {e}");
            }
        }
    }
}

fn step(coarse: bool, big: i32, small: i32) -> i32 {
    if coarse { big } else { small }
}

fn step_soc(soc: u8, delta: i32) -> u8 {
    (soc as i32 + delta).clamp(0, 100) as u8
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_path = cli.config.clone();

    // Load before touching the terminal so config warnings stay readable
    let mut app = App::new(config_path, cli.curve);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(250);

    while app.running {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_input(app, key.code, key.modifiers);
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Input handling
// ---------------------------------------------------------------------------

fn handle_input(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
    // Global keys
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('q') if !app.editing_path => {
            app.running = false;
            return;
        }
        _ => {}
    }

    if app.editing_path {
        handle_path_input(app, key);
        return;
    }

    // Tab switching
    match key {
        KeyCode::Char('1') => app.tab = Tab::Estimate,
        KeyCode::Char('2') => app.tab = Tab::PowerCurve,
        KeyCode::Char('3') => app.tab = Tab::Progress,
        KeyCode::Char('4') => app.tab = Tab::Curve,
        KeyCode::Tab => {
            let idx = (app.tab.index() + 1) % Tab::ALL.len();
            app.tab = Tab::ALL[idx];
        }
        KeyCode::BackTab => {
            let idx = (app.tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len();
            app.tab = Tab::ALL[idx];
        }
        _ => {}
    }

    match app.tab {
        Tab::Curve => handle_curve_input(app, key),
        _ => handle_session_input(app, key),
    }
}

/// Input adjustment works on every chart tab so the charts update live.
fn handle_session_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('j') | KeyCode::Down => {
            app.selected_input = (app.selected_input + 1) % InputField::ALL.len();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected_input =
                (app.selected_input + InputField::ALL.len() - 1) % InputField::ALL.len();
        }
        KeyCode::Char('l') | KeyCode::Right => app.adjust(1, false),
        KeyCode::Char('h') | KeyCode::Left => app.adjust(-1, false),
        KeyCode::Char('L') => app.adjust(1, true),
        KeyCode::Char('H') => app.adjust(-1, true),
        KeyCode::Char(' ') | KeyCode::Enter
            if InputField::ALL[app.selected_input] == InputField::Preheated =>
        {
            app.adjust(1, false)
        }
        KeyCode::Char('s') => app.save_config(),
        KeyCode::Char('r') => app.reload_config(),
        _ => {}
    }
}

fn handle_curve_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('i') | KeyCode::Enter => {
            app.editing_path = true;
            app.status_message = "Type a CSV path, Enter to import, Esc to cancel".to_string();
        }
        KeyCode::Char('x') | KeyCode::Delete => app.remove_curve(),
        _ => {}
    }
}

fn handle_path_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.editing_path = false;
            app.status_message = "Import cancelled".to_string();
        }
        KeyCode::Enter => {
            app.editing_path = false;
            let path = PathBuf::from(app.import_path.trim());
            if path.as_os_str().is_empty() {
                app.status_message = "No path given".to_string();
            } else {
                app.import_curve(&path);
            }
        }
        KeyCode::Backspace => {
            app.import_path.pop();
        }
        KeyCode::Char(c) => app.import_path.push(c),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tab bar
            Constraint::Min(0),    // content
            Constraint::Length(4), // status bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.tab {
        Tab::Estimate => draw_estimate(f, app, chunks[1]),
        Tab::PowerCurve => draw_with_inputs(f, app, chunks[1], draw_power_curve),
        Tab::Progress => draw_with_inputs(f, app, chunks[1], draw_progress),
        Tab::Curve => draw_curve_import(f, app, chunks[1]),
    }

    draw_status_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" evcharge "))
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let source = match app.store.power_source() {
        PowerSource::Reference(_) => {
            Span::styled(" REFERENCE ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        }
        PowerSource::User(_) => {
            Span::styled(" IMPORTED ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        }
    };

    let msg = Span::raw(format!("  {}", app.status_message));

    let help = match app.tab {
        Tab::Curve if app.editing_path => " [Enter]import  [Esc]cancel ",
        Tab::Curve => " [i]mport  [x]remove  [Tab]switch  [q]uit ",
        _ => " [j/k]select  [h/l]adjust  [H/L]coarse  [s]ave  [r]eload  [q]uit ",
    };

    let status_line = Line::from(vec![source, msg]);
    let help_line = Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)));

    let paragraph =
        Paragraph::new(vec![status_line, help_line]).block(Block::default().borders(Borders::ALL));

    f.render_widget(paragraph, area);
}

fn draw_inputs(f: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = InputField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let style = if i == app.selected_input {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if i == app.selected_input { "▶" } else { " " };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(field.label()),
                Cell::from(field.value(&app.session)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(50),
            Constraint::Percentage(45),
        ],
    )
    .block(Block::default().borders(Borders::ALL).title(" Inputs "));

    f.render_widget(table, area);
}

fn draw_with_inputs(f: &mut Frame, app: &App, area: Rect, chart: fn(&mut Frame, &App, Rect)) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    draw_inputs(f, app, chunks[0]);
    chart(f, app, chunks[1]);
}

fn draw_estimate(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_inputs(f, app, chunks[0]);

    let report = &app.report;
    let Some(res) = &report.result else {
        let notice = report
            .notice
            .as_deref()
            .unwrap_or(report::INVALID_RANGE_NOTICE);
        let warning = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Result "));
        f.render_widget(warning, chunks[1]);
        return;
    };

    let metric = |name: &'static str, value: String, color: Color| {
        Row::new(vec![
            Cell::from(name),
            Cell::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
    };

    let rows = vec![
        metric("Total time", res.total_time.clone(), Color::Magenta),
        metric(
            "At full charger power",
            report::format_duration(res.uncapped_total_minutes),
            Color::Gray,
        ),
        metric("Charge added", format!("{}%", res.charge_added_pct), Color::Green),
        metric(
            "Energy added",
            format!("{:.1} kWh", res.energy_added_kwh),
            Color::Blue,
        ),
        metric(
            "Start power",
            format!("{:.0} kW", res.start_power_kw),
            Color::Red,
        ),
        metric(
            "Temperature factor",
            format!("x{:.2}", report.temperature_multiplier),
            Color::Yellow,
        ),
        metric("Curve", report.source.clone(), Color::Gray),
    ];

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(
            Row::new(vec!["Metric", "Value"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(" Result "));

    f.render_widget(table, chunks[1]);
}

fn draw_power_curve(f: &mut Frame, app: &App, area: Rect) {
    let samples = &app.report.power_curve;
    let base: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.soc as f64, s.base_power_kw))
        .collect();
    let applied: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.soc as f64, s.applied_power_kw))
        .collect();

    let (x_min, x_max) = match (samples.first(), samples.last()) {
        (Some(a), Some(b)) if b.soc > a.soc => (a.soc as f64, b.soc as f64),
        (Some(a), _) => (a.soc as f64, a.soc as f64 + 1.0),
        _ => (0.0, 100.0),
    };
    let y_max = samples
        .iter()
        .map(|s| s.base_power_kw)
        .fold(0.0, f64::max)
        .max(10.0)
        * 1.1;

    let datasets = vec![
        Dataset::default()
            .name("Curve")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&base),
        Dataset::default()
            .name("Applied")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&applied),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Power vs SOC "),
        )
        .x_axis(
            Axis::default()
                .title("SOC (%)")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(axis_labels(x_min, x_max, "%")),
        )
        .y_axis(
            Axis::default()
                .title("kW")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(axis_labels(0.0, y_max, "")),
        );

    f.render_widget(chart, area);
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let Some(res) = &app.report.result else {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from("  Set a valid SOC range to see charging progress"),
        ])
        .block(Block::default().borders(Borders::ALL).title(" SOC vs Time "));
        f.render_widget(placeholder, area);
        return;
    };

    let capped: Vec<(f64, f64)> = res
        .merged
        .iter()
        .map(|m| (m.elapsed_minutes, m.soc_capped))
        .collect();
    let uncapped: Vec<(f64, f64)> = res
        .merged
        .iter()
        .map(|m| (m.elapsed_minutes, m.soc_uncapped))
        .collect();

    let x_max = res.total_minutes.max(1.0);
    let s = &app.report.session;
    let (y_min, y_max) = (s.start_soc as f64, s.end_soc as f64);

    let datasets = vec![
        Dataset::default()
            .name("Full power")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&uncapped),
        Dataset::default()
            .name(format!("Capped {:.0} kW", s.max_power_kw))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&capped),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" SOC vs Time ({}) ", res.total_time)),
        )
        .x_axis(
            Axis::default()
                .title("min")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(axis_labels(0.0, x_max, "")),
        )
        .y_axis(
            Axis::default()
                .title("SOC (%)")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(axis_labels(y_min, y_max, "%")),
        );

    f.render_widget(chart, area);
}

fn axis_labels(min: f64, max: f64, unit: &str) -> Vec<String> {
    let mid = (min + max) / 2.0;
    [min, mid, max]
        .iter()
        .map(|v| format!("{v:.0}{unit}"))
        .collect()
}

fn draw_curve_import(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // path input
            Constraint::Length(5), // active source
            Constraint::Min(0),    // points
        ])
        .split(area);

    let path_style = if app.editing_path {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if app.editing_path { "_" } else { "" };
    let path_widget = Paragraph::new(format!("{}{cursor}", app.import_path))
        .style(path_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" CSV path (SOC and Power columns) "),
        );
    f.render_widget(path_widget, chunks[0]);

    let source_lines = match app.store.user_curve() {
        Some(curve) => {
            let range = curve
                .soc_range()
                .map(|(lo, hi)| format!("{lo:.0}%-{hi:.0}%"))
                .unwrap_or_else(|| "-".to_string());
            vec![
                Line::from(format!(
                    "Imported: {}",
                    app.imported_from
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "-".to_string())
                )),
                Line::from(format!(
                    "{} point(s), SOC {range}, peak {:.0} kW",
                    curve.len(),
                    curve.peak_power_kw()
                )),
            ]
        }
        None => {
            let reference = app.store.reference();
            vec![
                Line::from(format!("Reference: {}", reference.name)),
                Line::from(format!(
                    "{} point(s), peak {:.0} kW",
                    reference.points.len(),
                    reference.peak_power_kw()
                )),
            ]
        }
    };
    let source_widget = Paragraph::new(source_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Active power source "),
    );
    f.render_widget(source_widget, chunks[1]);

    let rows: Vec<Row> = match app.store.user_curve() {
        Some(curve) => curve
            .points()
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(format!("{:.1}%", p.soc)),
                    Cell::from(format!("{:.1} kW", p.power_kw)),
                ])
            })
            .collect(),
        None => app
            .store
            .reference()
            .points
            .iter()
            .map(|p| {
                Row::new(vec![
                    Cell::from(format!("{:.0}%", p.soc)),
                    Cell::from(format!("{:.0} kW", p.avg_power_kw)),
                    Cell::from(format!("{:.2} kWh", p.energy_kwh)),
                    Cell::from(p.time.clone()),
                ])
            })
            .collect(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["SOC", "Power", "Energy", "Time"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Points "));

    f.render_widget(table, chunks[2]);
}
