//! Ratatui-based terminal UI.
//!
//! The dashboard provides a profile panel for editing the farm attributes,
//! then renders the prediction, field status, yield trend and sensitivity
//! charts, and a conversation with the AI agronomist.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::advisor::{ChatSession, GeminiClient, TextGenerator};
use crate::app::pipeline::{self, AnalysisOutput};
use crate::cli::ProfileArgs;
use crate::config::Settings;
use crate::domain::{Choice, FarmProfile};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::estimator::EstimatorSettings;

mod fields;
mod plotters_chart;

use fields::Field;
use plotters_chart::{LinePlottersChart, chart_bounds};

/// Where `s` saves the profile when no `--profile` file was given.
const DEFAULT_PROFILE_FILE: &str = "farm-profile.json";
/// Where `e` writes the conversation.
const TRANSCRIPT_FILE: &str = "agri-transcript.md";

/// Start the TUI.
pub fn run(args: &ProfileArgs, settings: &Settings) -> Result<(), AppError> {
    // Build the app first: `--pick` prompts on the normal screen.
    let mut app = App::new(args, settings)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RUNTIME,
                format!("Failed to enter alternate screen: {e}"),
            ));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Asking,
}

struct App {
    profile: FarmProfile,
    estimator: EstimatorSettings,
    season: i32,
    selected_field: usize,
    mode: Mode,
    question: String,
    /// Set on Enter in ask mode; sent after the next redraw so the
    /// "consulting" status is visible during the blocking call.
    pending_question: Option<String>,
    session: ChatSession,
    advisor: Option<Box<dyn TextGenerator>>,
    maps_key_set: bool,
    profile_path: PathBuf,
    status: String,
    output: Option<AnalysisOutput>,
}

impl App {
    fn new(args: &ProfileArgs, settings: &Settings) -> Result<Self, AppError> {
        let (profile, estimator) = crate::app::resolve_profile(args, settings)?;

        let (advisor, status) = match GeminiClient::from_settings(settings) {
            Ok(client) => {
                let status = format!("Advisor ready ({}).", client.model());
                (Some(Box::new(client) as Box<dyn TextGenerator>), status)
            }
            Err(err) => {
                tracing::warn!(error = %err, "advisor unavailable");
                (None, format!("Advisor unavailable: {err}"))
            }
        };

        let mut app = Self::with_advisor(profile, estimator, advisor);
        app.maps_key_set = settings.maps_api_key.is_some();
        app.profile_path = args
            .profile
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_FILE));
        app.status = status;
        Ok(app)
    }

    fn with_advisor(
        mut profile: FarmProfile,
        estimator: EstimatorSettings,
        advisor: Option<Box<dyn TextGenerator>>,
    ) -> Self {
        // Saved profiles may come from the other variant.
        profile.conform_to(estimator.variant);
        let mut app = Self {
            profile,
            estimator,
            season: pipeline::current_season(),
            selected_field: 0,
            mode: Mode::Browse,
            question: String::new(),
            pending_question: None,
            session: ChatSession::new(),
            advisor,
            maps_key_set: false,
            profile_path: PathBuf::from(DEFAULT_PROFILE_FILE),
            status: String::new(),
            output: None,
        };
        app.recompute();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if let Some(question) = self.pending_question.take() {
                self.ask(&question);
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the user quits.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.mode == Mode::Asking {
            self.handle_question_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char(' ') => {
                if self.field().toggle(&mut self.profile) {
                    self.recompute();
                }
            }
            KeyCode::Char('v') => {
                self.estimator.variant = self.estimator.variant.next();
                self.profile.conform_to(self.estimator.variant);
                self.recompute();
                self.status = format!("variant: {}", self.estimator.variant.label());
            }
            KeyCode::Char('c') => {
                self.estimator.clamp_at_zero = !self.estimator.clamp_at_zero;
                self.recompute();
                self.status = format!(
                    "clamp at zero: {}",
                    if self.estimator.clamp_at_zero { "on" } else { "off" }
                );
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Asking;
                self.status = "Type a question. Enter to send, Esc to cancel.".to_string();
            }
            KeyCode::Char('s') => self.save_profile(),
            KeyCode::Char('e') => self.export_transcript(),
            _ => {}
        }

        false
    }

    fn handle_question_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = "Question canceled.".to_string();
            }
            KeyCode::Enter => {
                let question = self.question.trim().to_string();
                if question.is_empty() {
                    self.status = "Question is empty.".to_string();
                    return;
                }
                self.mode = Mode::Browse;
                self.question.clear();
                self.status = "Consulting the agronomist...".to_string();
                self.pending_question = Some(question);
            }
            KeyCode::Backspace => {
                self.question.pop();
            }
            KeyCode::Char(c) => self.question.push(c),
            _ => {}
        }
    }

    fn field(&self) -> Field {
        Field::ALL[self.selected_field.min(Field::ALL.len() - 1)]
    }

    fn adjust_field(&mut self, delta: i32) {
        let field = self.field();
        field.adjust(&mut self.profile, self.estimator.variant, delta);
        self.recompute();
        self.status = format!("{}: {}", field.name(), field.value(&self.profile));
    }

    /// Rebuild every derived output from the current profile.
    fn recompute(&mut self) {
        match pipeline::analyze(&self.profile, &self.estimator, self.season) {
            Ok(output) => self.output = Some(output),
            Err(err) => {
                self.output = None;
                self.status = err.to_string();
            }
        }
    }

    /// A failed call leaves the session untouched.
    fn ask(&mut self, question: &str) {
        let Some(advisor) = self.advisor.as_deref() else {
            self.status = "Advisor unavailable: set GEMINI_API_KEY.".to_string();
            return;
        };

        tracing::info!(chars = question.len(), "asking advisor");
        match self.session.ask(advisor, &self.profile, question) {
            Ok(session) => {
                self.session = session;
                self.status = "Reply received.".to_string();
            }
            Err(err) => {
                tracing::warn!(error = %err, "advisor call failed");
                self.status = format!("Advisor error: {err}");
            }
        }
    }

    fn save_profile(&mut self) {
        self.status = match crate::io::write_profile_json(&self.profile_path, &self.profile) {
            Ok(()) => format!("Saved profile: {}", self.profile_path.display()),
            Err(err) => format!("Save failed: {err}"),
        };
    }

    fn export_transcript(&mut self) {
        let Some(output) = &self.output else {
            self.status = "Nothing to export.".to_string();
            return;
        };
        let path = PathBuf::from(TRANSCRIPT_FILE);
        self.status = match crate::io::write_transcript_markdown(&path, output, &self.session) {
            Ok(()) => format!("Wrote transcript: {}", path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
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
        let variant = self.estimator.variant;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled(variant.title(), Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | variant: {} | season: {}", variant.label(), self.season)),
        ]));

        if let Some(output) = &self.output {
            let status_style = if output.status.is_critical() {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            let clamp_note = if output.breakdown.clamped { " (clamped)" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("Predicted yield: {:.2} q/acre{clamp_note}", output.predicted()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" | "),
                Span::styled(crate::report::format_status(&output.status), status_style),
            ]));
        }

        let tile = crate::map::tile_for(self.profile.location, crate::map::DEFAULT_ZOOM)
            .map(|t| format!("z{} x{} y{}", t.z, t.x, t.y))
            .unwrap_or_else(|_| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "location: {:.4}, {:.4} | satellite tile: {tile} | maps key: {} | clamp: {}",
                self.profile.location.lat,
                self.profile.location.lon,
                if self.maps_key_set { "set" } else { "unset" },
                if self.estimator.clamp_at_zero { "on" } else { "off" },
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(area);
        self.draw_fields(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Min(0)])
            .split(columns[1]);
        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.draw_series_chart(frame, charts[0]);
        self.draw_curve_chart(frame, charts[1]);
        self.draw_chat(frame, rows[1]);
    }

    fn draw_fields(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|f| ListItem::new(format!("{:<13} {}", f.name(), f.value(&self.profile))))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Farm profile").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_series_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(inner) = chart_frame(frame, area, "Yield trend") else {
            return;
        };
        let Some(output) = &self.output else {
            frame.render_widget(waiting(), inner);
            return;
        };

        let points = output.series.xy();
        let labels: Vec<String> = output.series.points().iter().map(|p| p.label.clone()).collect();
        let fmt_x = move |v: f64| {
            let idx = v.round();
            if (v - idx).abs() > 0.25 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };
        let (x_bounds, y_bounds) = chart_bounds(&points);

        let widget = LinePlottersChart {
            line: &points,
            highlight: points.last().copied(),
            x_bounds,
            y_bounds,
            x_label: "season",
            y_label: "q/acre",
            fmt_x: &fmt_x,
            fmt_y: fmt_axis_y,
            color: RGBColor(0, 255, 255),
        };
        frame.render_widget(widget, inner);
    }

    fn draw_curve_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(inner) = chart_frame(frame, area, "Sensitivity") else {
            return;
        };
        let Some(output) = &self.output else {
            frame.render_widget(waiting(), inner);
            return;
        };

        let points = output.curve.xy();
        let (x_bounds, y_bounds) = chart_bounds(&points);
        let widget = LinePlottersChart {
            line: &points,
            highlight: None,
            x_bounds,
            y_bounds,
            x_label: "improvement (%)",
            y_label: "q/acre",
            fmt_x: &fmt_axis_pct,
            fmt_y: fmt_axis_y,
            color: RGBColor(0, 255, 0),
        };
        frame.render_widget(widget, inner);
    }

    fn draw_chat(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("AI agronomist").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        if self.session.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press `a` to ask about this farm.",
                Style::default().fg(Color::Gray),
            )));
        }
        for message in self.session.messages() {
            let style = match message.role {
                crate::advisor::Role::User => Style::default().fg(Color::Cyan),
                crate::advisor::Role::Assistant => Style::default().fg(Color::Green),
            };
            lines.push(Line::from(Span::styled(
                format!("{} ({}):", message.role.display_name(), message.at.format("%H:%M")),
                style.add_modifier(Modifier::BOLD),
            )));
            for text in message.content.lines() {
                lines.push(Line::from(text.to_string()));
            }
            lines.push(Line::from(""));
        }

        // Keep the newest exchange in view.
        let rows = wrapped_rows(&lines, inner.width);
        let scroll = rows.saturating_sub(usize::from(inner.height));
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
        frame.render_widget(p, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = if self.mode == Mode::Asking {
            Line::from(vec![
                Span::styled("Ask: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.question.as_str()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        } else {
            let help = "↑/↓ select  ←/→ adjust  space toggle  v variant  c clamp  a ask  s save  e export  q quit";
            Line::from(vec![
                Span::styled(help, Style::default().fg(Color::Gray)),
                Span::raw(" | "),
                Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
            ])
        };
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn chart_frame(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str) -> Option<Rect> {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    frame.render_widget(Clear, inner);
    Some(inner)
}

fn waiting() -> Paragraph<'static> {
    Paragraph::new("Fix the profile to see the estimate.").style(Style::default().fg(Color::Yellow))
}

/// Rows `lines` occupy when wrapped at `width` columns.
fn wrapped_rows(lines: &[Line], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum()
}

fn fmt_axis_pct(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.1}")
}
