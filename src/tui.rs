use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::aggregate::AggregateTotals;
use crate::events::WatchUpdate;
use crate::watcher::DirectoryWatcher;

/// What the dashboard shows, rebuilt purely from watcher updates.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub monitoring: bool,
    pub root: Option<PathBuf>,
    pub totals: AggregateTotals,
    pub log: Vec<String>,
    pub latest_findings: Vec<String>,
    pub status: String,
    /// Persistent warning shown in the status bar.
    pub notice: Option<String>,
}

impl DashboardState {
    pub fn apply(&mut self, update: WatchUpdate) {
        match update {
            WatchUpdate::Started { root } => {
                self.monitoring = true;
                self.totals = AggregateTotals::default();
                self.log.clear();
                self.latest_findings.clear();
                self.status = format!("Monitoring started: {}", root.display());
                self.root = Some(root);
            }
            WatchUpdate::Changed { event, totals } => {
                self.totals = totals;
                self.log.push(event.summary());
                self.latest_findings = event.misspellings;
            }
            WatchUpdate::Stopped => {
                self.monitoring = false;
                self.status = "Monitoring stopped".to_string();
            }
            WatchUpdate::Rejected { reason } => {
                self.status = reason;
            }
        }
    }

    /// Label for the added/deleted split
    pub fn split_label(&self) -> String {
        match (self.totals.added_percent(), self.totals.deleted_percent()) {
            (Some(added), Some(deleted)) => format!(
                "Text Added {:.1}% ({})  |  Text Deleted {:.1}% ({})",
                added, self.totals.total_added, deleted, self.totals.total_deleted
            ),
            _ => "No changes detected yet".to_string(),
        }
    }
}

pub struct TuiApp {
    pub watcher: DirectoryWatcher,
    pub root: PathBuf,
    pub state: DashboardState,
    pub should_quit: bool,
    pub show_help: bool,
    pub log_scroll: usize,
    poll_interval: Duration,
}

impl TuiApp {
    pub fn new(watcher: DirectoryWatcher, root: PathBuf) -> Self {
        let poll_interval = watcher.config().watcher.update_poll_duration();
        let state = DashboardState {
            notice: watcher.spelling_notice().map(str::to_string),
            ..Default::default()
        };
        Self {
            watcher,
            root,
            state,
            should_quit: false,
            show_help: false,
            log_scroll: 0,
            poll_interval,
        }
    }

    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<DirectoryWatcher> {
        if !self.watcher.is_watching() {
            self.toggle_monitoring();
        }

        loop {
            self.drain_updates();
            terminal.draw(|f| self.ui(f))?;

            // Handle keyboard input
            if event::poll(self.poll_interval)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(self.watcher)
    }

    fn drain_updates(&mut self) {
        let following = self.log_scroll + 1 >= self.state.log.len();
        while let Ok(update) = self.watcher.try_recv() {
            self.state.apply(update);
        }
        if following {
            self.log_scroll = self.state.log.len().saturating_sub(1);
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let max_scroll = self.state.log.len().saturating_sub(1);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Char('s') => self.toggle_monitoring(),
            KeyCode::Up | KeyCode::Char('k') => self.log_scroll = self.log_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.log_scroll = (self.log_scroll + 1).min(max_scroll),
            KeyCode::PageUp => self.log_scroll = self.log_scroll.saturating_sub(10),
            KeyCode::PageDown => self.log_scroll = (self.log_scroll + 10).min(max_scroll),
            KeyCode::Home => self.log_scroll = 0,
            KeyCode::End => self.log_scroll = max_scroll,
            _ => {}
        }
    }

    fn toggle_monitoring(&mut self) {
        if self.watcher.is_watching() {
            self.watcher.stop();
        } else {
            // Failures arrive as WatchUpdate::Rejected.
            let _ = self.watcher.start(&self.root);
        }
    }

    fn ui(&mut self, f: &mut Frame) {
        if self.show_help {
            self.render_help(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Added/deleted split
                Constraint::Min(5),    // Change log
                Constraint::Length(8), // Spelling
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_split(f, chunks[1]);
        self.render_log(f, chunks[2]);
        self.render_spelling(f, chunks[3]);
        self.render_status(f, chunks[4]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let (state, color) = if self.state.monitoring {
            ("WATCHING", Color::Green)
        } else {
            ("IDLE", Color::Rgb(150, 150, 150))
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", state),
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", self.root.display()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(80, 80, 80)))
                .title(" TextTracker ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );

        f.render_widget(header, area);
    }

    fn render_split(&self, f: &mut Frame, area: Rect) {
        let ratio = self.state.totals.added_percent().unwrap_or(0.0) / 100.0;

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(80, 80, 80)))
                    .title(" Text Changes "),
            )
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Red))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(self.state.split_label())
            .use_unicode(true);

        f.render_widget(gauge, area);
    }

    fn render_log(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.state.log.is_empty() {
            vec![Line::from(Span::styled(
                "Watching for text changes...",
                Style::default().fg(Color::Gray),
            ))]
        } else {
            self.state
                .log
                .iter()
                .map(|entry| Line::from(Span::raw(entry.as_str())))
                .collect()
        };

        // Keep the selected entry at the bottom of the view.
        let visible = area.height.saturating_sub(2) as usize;
        let offset = (self.log_scroll + 1).saturating_sub(visible);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(80, 80, 80)))
                    .title(format!(" Text Changes Information ({}) ", self.state.log.len()))
                    .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            )
            .scroll((offset.min(u16::MAX as usize) as u16, 0));

        f.render_widget(paragraph, area);
    }

    fn render_spelling(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.state.latest_findings.is_empty() {
            vec![Line::from("No spelling errors detected.")]
        } else {
            self.state
                .latest_findings
                .iter()
                .map(|finding| Line::from(finding.as_str()))
                .collect()
        };

        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(Color::Red))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(80, 80, 80)))
                    .title(" Spelling Errors ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let key = |label: &'static str, bg: Color| {
            Span::styled(label, Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD))
        };
        let dim = Style::default().fg(Color::Rgb(150, 150, 150));

        let mut spans = vec![
            key(" q ", Color::Red),
            Span::styled(" quit  ", dim),
            key(" s ", Color::Green),
            Span::styled(" start/stop  ", dim),
            key(" h ", Color::Blue),
            Span::styled(" help  ", dim),
            Span::styled(self.state.status.as_str(), Style::default().fg(Color::Cyan)),
        ];
        if let Some(ref notice) = self.state.notice {
            spans.push(Span::styled(
                format!("  {}", notice),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }

        let status = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(80, 80, 80))),
        )
        .alignment(Alignment::Center);

        f.render_widget(status, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let popup_area = centered_rect(70, 50, f.area());
        let key_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);

        let help_text = vec![
            Line::from(Span::styled(
                "TextTracker - added/deleted text monitor",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![Span::styled("  q, Esc     ", key_style), Span::raw("- Quit")]),
            Line::from(vec![Span::styled("  s          ", key_style), Span::raw("- Stop or restart monitoring")]),
            Line::from(vec![Span::styled("  h, F1      ", key_style), Span::raw("- Show/hide this help")]),
            Line::from(vec![Span::styled("  ↑/↓, k/j   ", key_style), Span::raw("- Scroll the change log")]),
            Line::from(vec![Span::styled("  PgUp/PgDn  ", key_style), Span::raw("- Scroll faster")]),
            Line::from(vec![Span::styled("  Home/End   ", key_style), Span::raw("- Oldest/newest entry")]),
            Line::from(""),
            Line::from("Restarting clears the totals and the log."),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, popup_area);
        f.render_widget(paragraph, popup_area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeEvent;

    fn changed(added: &str, deleted: &str, total_added: usize, total_deleted: usize) -> WatchUpdate {
        WatchUpdate::Changed {
            event: ChangeEvent::new(PathBuf::from("f.txt"), added.to_string(), deleted.to_string())
                .with_misspellings(vec!["Misspelled word: helo".to_string()]),
            totals: AggregateTotals {
                total_added,
                total_deleted,
            },
        }
    }

    #[test]
    fn test_dashboard_follows_updates() {
        let mut state = DashboardState::default();
        assert_eq!(state.split_label(), "No changes detected yet");

        state.apply(WatchUpdate::Started {
            root: PathBuf::from("/watched"),
        });
        assert!(state.monitoring);

        state.apply(changed("helo\n", "", 5, 0));
        state.apply(changed("", "x", 5, 1));

        assert_eq!(state.log.len(), 2);
        assert_eq!(state.totals.total_deleted, 1);
        assert_eq!(state.latest_findings, vec!["Misspelled word: helo"]);
        assert!(state.split_label().starts_with("Text Added 83.3%"));

        state.apply(WatchUpdate::Stopped);
        assert!(!state.monitoring);
        assert_eq!(state.log.len(), 2);
    }

    #[test]
    fn test_restart_clears_dashboard() {
        let mut state = DashboardState::default();
        state.apply(changed("abc", "", 3, 0));
        state.apply(WatchUpdate::Started {
            root: PathBuf::from("/again"),
        });

        assert!(state.log.is_empty());
        assert!(state.totals.is_empty());
        assert_eq!(state.root, Some(PathBuf::from("/again")));
    }

    #[test]
    fn test_spelling_notice_survives_restart() {
        let mut config = crate::config::TrackerConfig::default();
        config.spelling.dictionary_path = Some(PathBuf::from("/definitely/not/here/words"));
        let app = TuiApp::new(DirectoryWatcher::new(config), PathBuf::from("."));

        let mut state = app.state.clone();
        assert!(state
            .notice
            .as_deref()
            .is_some_and(|notice| notice.contains("Spell checking disabled")));

        state.apply(WatchUpdate::Started {
            root: PathBuf::from("/watched"),
        });
        assert!(state.notice.is_some());
    }

    #[test]
    fn test_rejection_sets_status() {
        let mut state = DashboardState::default();
        state.apply(WatchUpdate::Rejected {
            reason: "configuration error: Invalid directory path: /nope".to_string(),
        });

        assert!(!state.monitoring);
        assert!(state.status.contains("Invalid directory path"));
    }
}
