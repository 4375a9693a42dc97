//! Ratatui-based terminal UI.
//!
//! The TUI cycles through datasets (the requested one first, then the
//! built-ins), runs the matching pipeline, and renders its charts with the EER
//! marked. Estimator settings can be changed live.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
};

use crate::app::pipeline::{RunOutput, run_dataset};
use crate::domain::{Dataset, MAX_GRID_POINTS, MetricsConfig, RatePolicy, TieBreak};
use crate::error::AppError;
use crate::plot::SeriesKind;

mod plotters_chart;

use plotters_chart::{MetricsChart, series_color};

/// Start the TUI.
pub fn run(config: MetricsConfig) -> Result<(), AppError> {
    // Resolve the dataset before touching the terminal so errors print normally.
    let first = crate::data::load_dataset(&config.source)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(first, config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: MetricsConfig,
    datasets: Vec<Dataset>,
    selected_dataset: usize,
    selected_chart: usize,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(first: Dataset, config: MetricsConfig) -> Self {
        let mut datasets = vec![first];
        for d in crate::data::all_builtins() {
            if d.name() != datasets[0].name() {
                datasets.push(d);
            }
        }

        let mut app = Self {
            config,
            datasets,
            selected_dataset: 0,
            selected_chart: 0,
            status: String::new(),
            run: None,
        };
        app.recompute();
        app
    }

    fn dataset(&self) -> &Dataset {
        &self.datasets[self.selected_dataset]
    }

    fn chart_count(&self) -> usize {
        self.run.as_ref().map(|r| r.charts().len()).unwrap_or(0)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => {
                self.selected_dataset = (self.selected_dataset + self.datasets.len() - 1) % self.datasets.len();
                self.selected_chart = 0;
                self.recompute();
            }
            KeyCode::Right => {
                self.selected_dataset = (self.selected_dataset + 1) % self.datasets.len();
                self.selected_chart = 0;
                self.recompute();
            }
            KeyCode::Tab | KeyCode::Char('c') => {
                let n = self.chart_count();
                if n > 0 {
                    self.selected_chart = (self.selected_chart + 1) % n;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.config.grid_points = self.config.grid_points.saturating_mul(2).min(MAX_GRID_POINTS);
                self.recompute();
                self.status = format!("grid points: {}", self.config.grid_points);
            }
            KeyCode::Char('-') => {
                self.config.grid_points = (self.config.grid_points / 2).max(2);
                self.recompute();
                self.status = format!("grid points: {}", self.config.grid_points);
            }
            KeyCode::Char('t') => {
                self.config.tie_break = match self.config.tie_break {
                    TieBreak::First => TieBreak::Last,
                    TieBreak::Last => TieBreak::First,
                };
                self.recompute();
                self.status = format!("tie-break: {:?}", self.config.tie_break);
            }
            KeyCode::Char('p') => {
                self.config.rate_policy = next_rate_policy(self.config.rate_policy);
                self.recompute();
                self.status = format!("rate policy: {}", policy_label(self.config.rate_policy));
            }
            KeyCode::Char('d') => {
                if let Some(run) = &self.run {
                    match crate::debug::write_debug_bundle(run, &self.config) {
                        Ok(path) => {
                            self.status = format!("Wrote debug bundle: {}", path.display());
                        }
                        Err(err) => {
                            self.status = format!("Debug write failed: {err}");
                        }
                    }
                } else {
                    self.status = "Nothing computed for this dataset.".to_string();
                }
            }
            _ => {}
        }

        false
    }

    /// Rerun the pipeline for the selected dataset; failures go to the status line.
    fn recompute(&mut self) {
        match run_dataset(self.dataset(), &self.config) {
            Ok(run) => {
                self.status = match run.eer() {
                    Some(eer) => crate::report::eer_one_liner(eer),
                    None => format!("{} streams normalized", self.dataset().name()),
                };
                self.run = Some(run);
            }
            Err(err) => {
                self.status = format!("{err}");
                self.run = None;
            }
        }
        let n = self.chart_count();
        if self.selected_chart >= n {
            self.selected_chart = 0;
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let dataset = self.dataset();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("eer", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " - {} ({}) [{}/{}]",
                dataset.name(),
                dataset.kind().display_name(),
                self.selected_dataset + 1,
                self.datasets.len()
            )),
        ]));
        lines.push(Line::from(Span::styled(
            dataset.description().to_string(),
            Style::default().fg(Color::Gray),
        )));

        let result = match &self.run {
            Some(RunOutput::Orientation(o)) => match &o.comparison {
                Some(cmp) => format!(
                    "{} vs {}: longest run {} of {} (need {}) -> {}",
                    cmp.label_a,
                    cmp.label_b,
                    cmp.longest_run,
                    cmp.delta_angles.len(),
                    cmp.required_run,
                    if cmp.matched { "matched" } else { "not matched" }
                ),
                None => "no stream comparison".to_string(),
            },
            Some(run) => run
                .eer()
                .map(|eer| {
                    format!(
                        "{} | a={:.4} b={:.4} | {:?}",
                        crate::report::eer_one_liner(eer),
                        eer.rate_a,
                        eer.rate_b,
                        eer.method
                    )
                })
                .unwrap_or_default(),
            None => "-".to_string(),
        };
        lines.push(Line::from(Span::styled(result, Style::default().fg(Color::Yellow))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(34)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_side(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Chart").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No result (see status line).").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let charts = run.charts();
        let Some(chart) = charts.get(self.selected_chart) else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let titles: Vec<Line> = charts.iter().map(|c| Line::from(c.title.clone())).collect();
        let tabs = Tabs::new(titles)
            .select(self.selected_chart)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        frame.render_widget(MetricsChart::new(chart), chunks[1]);
    }

    fn draw_side(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(area);

        let items = vec![
            ListItem::new(format!("Grid points: {}", self.config.grid_points)),
            ListItem::new(format!("Tie-break: {:?}", self.config.tie_break)),
            ListItem::new(format!("Rate policy: {}", policy_label(self.config.rate_policy))),
            ListItem::new(format!(
                "Alignment: {:.2} rad x{}",
                self.config.alignment_threshold, self.config.alignment_run
            )),
        ];
        let list = List::new(items).block(Block::default().title("Settings").borders(Borders::ALL));
        frame.render_widget(list, chunks[0]);

        let mut legend: Vec<Line> = Vec::new();
        if let Some(chart) = self.run.as_ref().and_then(|r| r.charts().into_iter().nth(self.selected_chart)) {
            for (i, series) in chart.series.iter().enumerate() {
                let glyph = match series.kind {
                    SeriesKind::Line => "── ",
                    SeriesKind::Scatter | SeriesKind::Marker => "•  ",
                };
                legend.push(Line::from(vec![
                    Span::styled(glyph, Style::default().fg(series_color(i, series.kind))),
                    Span::raw(series.label.clone()),
                ]));
            }
        }
        let p = Paragraph::new(Text::from(legend)).block(Block::default().title("Legend").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ dataset  Tab chart  +/- grid  t tie  p policy  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn next_rate_policy(cur: Option<RatePolicy>) -> Option<RatePolicy> {
    match cur {
        None => Some(RatePolicy::CurveA),
        Some(RatePolicy::CurveA) => Some(RatePolicy::Mean),
        Some(RatePolicy::Mean) => None,
    }
}

fn policy_label(policy: Option<RatePolicy>) -> String {
    match policy {
        Some(p) => format!("{p:?}"),
        None => "default".to_string(),
    }
}
