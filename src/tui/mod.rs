//! Ratatui-based terminal dashboard.
//!
//! One screen mirrors the original single-page dashboard: a selector panel
//! for the filters, five charts, and a static recommendation card. Changing
//! a filter re-derives the aggregates from the in-memory record set; the
//! cleaned records themselves are never mutated.

use std::io;
use std::path::PathBuf;
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
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::agg;
use crate::app::pipeline::{self, DashboardView, Session};
use crate::cli::DashArgs;
use crate::domain::{FilterCriteria, Series};
use crate::error::AppError;
use crate::filter::{self, FilterOptions};
use crate::io::ingest::IngestedData;
use crate::report;

mod charts;

use charts::TrendChart;

/// Selector rows, top to bottom.
const FIELD_PLATFORM: usize = 0;
const FIELD_SENTIMENT: usize = 1;
const FIELD_MEDIA_TYPE: usize = 2;
const FIELD_LOCATION: usize = 3;
const FIELD_DATE_START: usize = 4;
const FIELD_DATE_END: usize = 5;
const FIELD_COUNT: usize = 6;

/// Start the dashboard.
pub fn run(args: DashArgs) -> Result<(), AppError> {
    // Resolve and load the CSV before touching the terminal, so picker
    // prompts and load errors print normally.
    let path = match args.file {
        Some(path) => crate::cli::picker::validate_csv_path(&path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };
    let session = Session::load(&path)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
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
    session: Session,
    options: FilterOptions,
    criteria: FilterCriteria,
    view: DashboardView,
    selected_field: usize,
    /// Which date field is being edited, if any.
    editing: Option<usize>,
    date_input: String,
    status: String,
}

impl App {
    fn new(session: Session) -> Self {
        let data = session.data();
        let options = filter::filter_options(&data.records);
        let criteria = default_criteria(data);
        let view = pipeline::build_view(data, &criteria, agg::DEFAULT_TOP_LOCATIONS);
        let status = format!("Loaded {}: {} record(s).", data.source, data.rows_used);

        Self {
            session,
            options,
            criteria,
            view,
            selected_field: 0,
            editing: None,
            date_input: String::new(),
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if matches!(self.selected_field, FIELD_DATE_START | FIELD_DATE_END) {
                    self.date_input = self
                        .current_date_field()
                        .map(|d| d.to_string())
                        .unwrap_or_default();
                    self.editing = Some(self.selected_field);
                    self.status =
                        "Editing date (YYYY-MM-DD). Enter applies, Esc cancels, empty clears."
                            .to_string();
                }
            }
            KeyCode::Char('c') => {
                self.criteria = default_criteria(self.session.data());
                self.recompute();
                self.status = "Filters cleared.".to_string();
            }
            KeyCode::Char('u') => self.reload(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => self.apply_date_input(),
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' || c == '/' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self) {
        let Some(field) = self.editing.take() else {
            return;
        };

        let trimmed = self.date_input.trim();
        let parsed = if trimmed.is_empty() {
            None
        } else {
            match crate::clean::parse_date(trimmed) {
                Some(date) => Some(date),
                None => {
                    self.status = format!("Invalid date '{trimmed}'.");
                    return;
                }
            }
        };

        let name = match field {
            FIELD_DATE_START => {
                self.criteria.date_start = parsed;
                "start date"
            }
            _ => {
                self.criteria.date_end = parsed;
                "end date"
            }
        };
        self.recompute();
        self.status = match parsed {
            Some(date) => format!("{name}: {date}"),
            None => format!("{name}: cleared"),
        };
    }

    fn adjust_field(&mut self, delta: i32) {
        let (label, value) = match self.selected_field {
            FIELD_PLATFORM => {
                self.criteria.platform = cycle(&self.criteria.platform, &self.options.platforms, delta);
                ("platform", self.criteria.platform.clone())
            }
            FIELD_SENTIMENT => {
                self.criteria.sentiment =
                    cycle(&self.criteria.sentiment, &self.options.sentiments, delta);
                ("sentiment", self.criteria.sentiment.clone())
            }
            FIELD_MEDIA_TYPE => {
                self.criteria.media_type =
                    cycle(&self.criteria.media_type, &self.options.media_types, delta);
                ("media type", self.criteria.media_type.clone())
            }
            FIELD_LOCATION => {
                self.criteria.location = cycle(&self.criteria.location, &self.options.locations, delta);
                ("location", self.criteria.location.clone())
            }
            _ => {
                self.status = "Press Enter to edit dates.".to_string();
                return;
            }
        };

        self.recompute();
        self.status = format!("{label}: {}", value.as_deref().unwrap_or("All"));
    }

    fn recompute(&mut self) {
        self.view = pipeline::build_view(
            self.session.data(),
            &self.criteria,
            agg::DEFAULT_TOP_LOCATIONS,
        );
    }

    /// Re-read the source file; an unchanged file keeps the cleaned dataset
    /// (content-hash memoization), a changed one replaces it wholesale.
    fn reload(&mut self) {
        match self.session.reload() {
            Ok(true) => {
                let data = self.session.data();
                self.options = filter::filter_options(&data.records);
                let source = data.source.clone();
                let rows_used = data.rows_used;
                self.recompute();
                self.status = format!("Reloaded {source}: {rows_used} record(s).");
            }
            Ok(false) => {
                self.status = "File unchanged; kept the cleaned dataset.".to_string();
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn export(&mut self) {
        let dashboard = pipeline::to_dashboard_file(self.session.data(), &self.view);
        let path = PathBuf::from(crate::io::bundle::BUNDLE_FILE_NAME);
        match crate::io::bundle::write_dashboard_json(&path, &dashboard) {
            Ok(()) => self.status = format!("Wrote {}.", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn current_date_field(&self) -> Option<chrono::NaiveDate> {
        match self.selected_field {
            FIELD_DATE_START => self.criteria.date_start,
            _ => self.criteria.date_end,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let data = self.session.data();

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("mi", Style::default().fg(Color::Cyan)),
            Span::raw(" — media intelligence dashboard"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "{} | rows: read={} kept={} dropped={}",
                data.source,
                data.rows_read,
                data.rows_used,
                data.dropped.len(),
            ),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "filter: {} | matched: {}",
                self.criteria.summary(),
                self.view.aggregates.n_records,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        self.draw_charts(frame, chunks[0]);
        self.draw_bottom(frame, chunks[1]);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.view.aggregates.is_empty() {
            let msg = Paragraph::new("No data matches the selected filters. Adjust your filters.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Min(8),
                Constraint::Length(9),
            ])
            .split(area);

        let mixes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        self.draw_breakdown(
            frame,
            mixes[0],
            "Sentiment Breakdown",
            &self.view.aggregates.sentiment_counts,
            charts::sentiment_color,
        );
        self.draw_breakdown(
            frame,
            mixes[1],
            "Media Type Mix",
            &self.view.aggregates.media_type_counts,
            charts::palette_color,
        );

        self.draw_trend(frame, rows[1]);

        let bars = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        self.draw_bar_chart(
            frame,
            bars[0],
            "Platform Engagements",
            &self.view.aggregates.platform_engagements,
        );
        self.draw_bar_chart(
            frame,
            bars[1],
            "Top 5 Locations by Post Count",
            &self.view.aggregates.top_locations,
        );
    }

    fn draw_breakdown(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        series: &Series,
        color_for: fn(usize, &str) -> Color,
    ) {
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = charts::percent_lines(series, inner.width, color_for);
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Engagement Trend over Time")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(TrendChart::new(&self.view.aggregates.daily_engagements), inner);
    }

    fn draw_bar_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, series: &Series) {
        let bars: Vec<Bar> = series
            .iter()
            .map(|p| {
                Bar::default()
                    .label(Line::from(p.label.clone()))
                    .value(p.value)
            })
            .collect();

        let chart = BarChart::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
    }

    fn draw_bottom(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        self.draw_selectors(frame, chunks[0]);

        let recommendation = Paragraph::new(report::RECOMMENDATION)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Campaign Strategy Summary")
                    .borders(Borders::ALL),
            );
        frame.render_widget(recommendation, chunks[1]);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let date_text = |value: Option<chrono::NaiveDate>, field: usize| -> String {
            if self.editing == Some(field) {
                format!("{}_", self.date_input)
            } else {
                value.map(|d| d.to_string()).unwrap_or_else(|| "All".to_string())
            }
        };

        let all = |value: &Option<String>| -> String {
            value.clone().unwrap_or_else(|| "All".to_string())
        };

        let items = vec![
            ListItem::new(format!("Platform:   {}", all(&self.criteria.platform))),
            ListItem::new(format!("Sentiment:  {}", all(&self.criteria.sentiment))),
            ListItem::new(format!("Media type: {}", all(&self.criteria.media_type))),
            ListItem::new(format!("Location:   {}", all(&self.criteria.location))),
            ListItem::new(format!(
                "Start date: {}",
                date_text(self.criteria.date_start, FIELD_DATE_START)
            )),
            ListItem::new(format!(
                "End date:   {}",
                date_text(self.criteria.date_end, FIELD_DATE_END)
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit date  c clear  u reload  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn default_criteria(data: &IngestedData) -> FilterCriteria {
    FilterCriteria {
        date_start: Some(data.stats.date_min),
        date_end: Some(data.stats.date_max),
        ..Default::default()
    }
}

/// Step through "All" + `options`, wrapping in both directions.
fn cycle(current: &Option<String>, options: &[String], delta: i32) -> Option<String> {
    let len = options.len() as i32 + 1;
    let pos = match current {
        None => 0,
        Some(value) => options
            .iter()
            .position(|o| o == value)
            .map(|i| i as i32 + 1)
            .unwrap_or(0),
    };

    let next = (pos + delta).rem_euclid(len);
    if next == 0 {
        None
    } else {
        Some(options[(next - 1) as usize].clone())
    }
}
