//! Dashboard application - terminal setup and run loop

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{handle_key_event, poll_event, Action};
use super::state::{ActivityLevel, DashboardState};
use super::theme::DashTheme;
use crate::exports;
use crate::message::StreamMsg;
use crate::request::ExecuteRequest;
use crate::stream::StreamClient;
use crate::types::TemplateId;

/// Terminal dashboard driven by a stream client.
pub struct DashboardApp {
    state: DashboardState,
    theme: DashTheme,
    client: Box<dyn StreamClient>,
    rx: mpsc::UnboundedReceiver<StreamMsg>,
    exports_dir: PathBuf,
}

impl DashboardApp {
    /// Wire the client's single callback slot into a channel the run loop
    /// drains. The dashboard is the one registered observer.
    pub fn new(
        client: Box<dyn StreamClient>,
        template_id: TemplateId,
        exports_dir: PathBuf,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        client.on_message(Arc::new(move |msg| {
            let _ = tx.send(msg);
        }));

        Self {
            state: DashboardState::new(template_id),
            theme: DashTheme::new(),
            client,
            rx,
            exports_dir,
        }
    }

    /// Run the dashboard until quit.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;

        self.client.connect().await?;
        let initial = exports::refresh(&self.exports_dir).await;
        self.state.set_exports(initial);

        let result = self.main_loop(&mut terminal).await;

        self.restore_terminal(&mut terminal)?;
        self.client.close();
        result
    }

    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(16); // ~60fps

        loop {
            // Fold in everything the stream produced since the last tick.
            while let Ok(msg) = self.rx.try_recv() {
                self.state.apply(msg);
            }

            terminal.draw(|frame| self.render(frame))?;

            if let Some(key) = poll_event(tick_rate)? {
                match handle_key_event(key, &self.state) {
                    Action::Run => {
                        self.state.on_run();
                        let request = ExecuteRequest::new(self.state.template_id.clone());
                        self.client.execute(request).await?;
                        self.state.session = self.client.session_id();
                    }
                    Action::SimulateError => self.client.simulate_error(),
                    Action::Reset => {
                        // Cancellation is silent; the reset itself restores idle.
                        self.client.cancel();
                        self.state.reset();
                    }
                    Action::RefreshExports => {
                        let refreshed = exports::refresh(&self.exports_dir).await;
                        self.state.set_exports(refreshed);
                    }
                    Action::Quit => self.state.should_quit = true,
                    Action::None => {}
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Progress gauge
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_gauge(frame, chunks[1]);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(5)])
            .split(content[0]);
        self.render_preview(frame, left[0]);
        self.render_activity(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(5)])
            .split(content[1]);
        self.render_viz(frame, right[0]);
        self.render_exports(frame, right[1]);

        self.render_footer(frame, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let session = self
            .state
            .session
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let line = Line::from(vec![
            Span::styled("DAP Notebook ", self.theme.header()),
            Span::styled(format!("[{}] ", self.state.template_id), self.theme.text()),
            Span::styled(
                format!("{} ", self.state.phase),
                ratatui::style::Style::default().fg(self.theme.phase_color(self.state.phase)),
            ),
            Span::styled(format!("session {}", session), self.theme.dimmed()),
        ]);
        let block = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).border_style(self.theme.border()));
        frame.render_widget(block, area);
    }

    fn render_gauge(&self, frame: &mut Frame, area: Rect) {
        // Progress arrives unclamped; clamp for display only.
        let ratio = (self.state.progress / 100.0).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_style(self.theme.border()))
            .gauge_style(
                ratatui::style::Style::default().fg(self.theme.phase_color(self.state.phase)),
            )
            .ratio(ratio)
            .label(format!("{:.0}%", self.state.progress));
        frame.render_widget(gauge, area);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let text = match &self.state.preview {
            Some(preview) => Line::styled(preview.to_string(), self.theme.text()),
            None => Line::styled("No table yet", self.theme.dimmed()),
        };
        let block = Paragraph::new(text).block(
            Block::default()
                .title("Table preview")
                .borders(Borders::ALL)
                .border_style(self.theme.border()),
        );
        frame.render_widget(block, area);
    }

    fn render_viz(&self, frame: &mut Frame, area: Rect) {
        // Structural summary only; chart rendering is out of scope.
        let lines: Vec<Line> = match (&self.state.live_spec, &self.state.last_error) {
            (Some(spec), _) => vec![
                Line::styled(format!("library: {}", spec.library), self.theme.text()),
                Line::styled(format!("traces:  {}", spec.trace_count()), self.theme.text()),
                Line::styled(
                    format!("title:   {}", spec.title().unwrap_or("(untitled)")),
                    self.theme.text(),
                ),
            ],
            (None, Some(error)) => vec![Line::styled(error.clone(), self.theme.error())],
            (None, None) => vec![Line::styled("No visualization yet", self.theme.dimmed())],
        };
        let block = Paragraph::new(lines).block(
            Block::default()
                .title("Live viz")
                .borders(Borders::ALL)
                .border_style(self.theme.border()),
        );
        frame.render_widget(block, area);
    }

    fn render_exports(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = exports::FIGURE_NAMES
            .iter()
            .map(|name| {
                let status = match self.state.exports.figures.get(*name) {
                    Some(slot) if slot.spec.is_some() => {
                        Span::styled("spec", self.theme.text())
                    }
                    Some(slot) if slot.image_path.is_some() => {
                        Span::styled("png", self.theme.dimmed())
                    }
                    _ => Span::styled("-", self.theme.dimmed()),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{name:<16}"), self.theme.text()),
                    status,
                ]))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title("Notebook exports")
                .borders(Borders::ALL)
                .border_style(self.theme.border()),
        );
        frame.render_widget(list, area);
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .state
            .events
            .iter()
            .take(area.height.saturating_sub(2) as usize)
            .map(|event| {
                let style = match event.level {
                    ActivityLevel::Info => self.theme.text(),
                    ActivityLevel::Error => self.theme.error(),
                };
                ListItem::new(Line::styled(event.text.clone(), style))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title("Activity")
                .borders(Borders::ALL)
                .border_style(self.theme.border()),
        );
        frame.render_widget(list, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let elapsed = self
            .state
            .start_time
            .map(|t| format_elapsed(t.elapsed().as_secs()))
            .unwrap_or_else(|| "--:--".to_string());
        let line = Line::from(vec![
            Span::styled(
                " r run | e sim error | x reset | g refresh exports | q quit ",
                self.theme.dimmed(),
            ),
            Span::styled(elapsed, self.theme.text()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Format elapsed seconds as MM:SS.
fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3600), "60:00");
    }
}
