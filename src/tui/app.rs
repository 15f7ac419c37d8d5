//! Application state and event loop

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::github::{AuthToken, ContributionClient, Login, ReqwestTransport};
use crate::services::PreferenceStore;
use crate::types::FetchState;

use super::fetch::{FetchResult, FetchTask};
use super::theme::ThemeContext;
use super::widgets::{
    heatmap::CalendarGrid,
    panel::{self, ActivityPanel, PanelView},
    spinner::Spinner,
};

/// Everything the TUI needs to mount the panel
pub struct TuiConfig {
    pub login: Login,
    pub token: AuthToken,
    pub endpoint: String,
    pub store: PreferenceStore,
}

/// Main application
pub struct App {
    login: Login,
    theme: ThemeContext,
    state: FetchState,
    /// Derived from `state` and the palette; rebuilt only when either changes
    view: PanelView,
    fetch: Option<FetchTask>,
    mounted: bool,
    spinner_frame: usize,
    cursor: Option<(usize, usize)>,
    should_quit: bool,
}

impl App {
    /// Create a new app in loading state
    pub fn new(login: Login, theme: ThemeContext) -> Self {
        let state = FetchState::Loading;
        let view = panel::render(&state, theme.palette());
        Self {
            login,
            theme,
            state,
            view,
            fetch: None,
            mounted: false,
            spinner_frame: 0,
            cursor: None,
            should_quit: false,
        }
    }

    /// Start the one fetch this view performs. Later calls are ignored.
    pub fn mount<F>(&mut self, fetch: F)
    where
        F: FnOnce() -> FetchResult + Send + 'static,
    {
        if self.mounted {
            tracing::warn!("panel already mounted; not fetching again");
            return;
        }
        self.mounted = true;
        self.fetch = Some(FetchTask::spawn(fetch));
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Apply a fetch result to the state
    fn apply(&mut self, result: FetchResult) {
        if let Err(err) = &result {
            tracing::warn!(kind = err.kind(), "contribution fetch failed: {}", err);
        }
        if self.state.resolve(result) {
            self.refresh_view();
            self.cursor = self.grid().and_then(|g| g.last_position());
        }
    }

    fn refresh_view(&mut self) {
        self.view = panel::render(&self.state, self.theme.palette());
    }

    /// Advance the spinner and pick up a finished fetch
    pub fn tick(&mut self) {
        if !self.state.is_loading() {
            return;
        }

        self.spinner_frame = Spinner::next_frame(self.spinner_frame);

        if let Some(result) = self.fetch.as_ref().and_then(|task| task.poll()) {
            self.fetch = None;
            self.apply(result);
        }
    }

    /// Current display description
    pub fn view(&self) -> &PanelView {
        &self.view
    }

    fn grid(&self) -> Option<&CalendarGrid> {
        self.view.grid()
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Char('t') | KeyCode::Char('T') => {
                        self.theme.toggle();
                        self.refresh_view();
                    }
                    KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
                    KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
                    KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
                    KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
                    _ => {}
                }
            }
        }
    }

    /// Move the inspect cursor, staying on filled cells
    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let Some(grid) = self.grid() else {
            return;
        };
        let Some((col, row)) = self.cursor.or_else(|| grid.last_position()) else {
            return;
        };

        let max_col = grid.columns.len() - 1;
        let col = col.saturating_add_signed(dx).min(max_col);
        let rows = grid.columns[col].cells.len();
        let row = row.saturating_add_signed(dy).min(rows.saturating_sub(1));

        self.cursor = Some((col, row));
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }

    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ActivityPanel::new(&self.view, &self.login, self.theme.theme())
            .spinner_frame(self.spinner_frame)
            .selected(self.cursor)
            .render(area, buf);
    }
}

/// Run the TUI application
pub fn run(config: TuiConfig) -> anyhow::Result<()> {
    let client = ContributionClient::with_endpoint(ReqwestTransport::new()?, config.endpoint);
    let theme = ThemeContext::load(config.store);
    let mut app = App::new(config.login.clone(), theme);

    let login = config.login;
    let token = config.token;
    app.mount(move || client.fetch_calendar(&login, &token));

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
        app.tick();
    }

    Ok(())
}
