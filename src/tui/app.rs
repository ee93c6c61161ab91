use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config;
use crate::io::debounce::poll_timeout;
use crate::io::lock::InstanceLock;
use crate::io::recovery::Reporter;
use crate::io::storage::{JsonStorage, Storage};
use crate::model::config::AppConfig;
use crate::ops::task_ops::Edit;
use crate::shell::{CloseOutcome, SimulatedWindow, WindowController};
use crate::store::TaskStore;

use super::input;
use super::render;
use super::rows::{self, TaskRow};
use super::theme::Theme;

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input line
    Add,
    /// Editing the title of the task with this id
    Edit { id: String },
    /// `s` was pressed; waiting for a corner digit
    Snap,
}

/// Main application state
pub struct App<S: Storage = JsonStorage> {
    pub store: TaskStore,
    pub window: WindowController<SimulatedWindow>,
    pub storage: S,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Index of the selected task
    pub cursor: usize,
    /// First visible task
    pub scroll_offset: usize,
    pub edit_buffer: String,
    /// Byte offset into `edit_buffer`
    pub edit_cursor: usize,
    pub show_help: bool,
    pub show_key_hints: bool,
    /// Pixels per nudge/resize key
    pub move_step: i32,
    /// Latest one-line message for the status row
    pub notice: Option<String>,
}

impl App<JsonStorage> {
    /// Load config, restore the window and load tasks from `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = read_config(data_dir)?;
        let storage = JsonStorage::new(data_dir);
        Ok(App::new(storage, &config, Reporter::new(data_dir)))
    }
}

impl<S: Storage> App<S> {
    pub fn new(storage: S, config: &AppConfig, reporter: Reporter) -> Self {
        let window = SimulatedWindow::new(
            config.window.default_geometry(),
            config.window.monitors.clone(),
        );
        let mut controller = WindowController::new(window, &config.window, reporter.clone());
        controller.restore(&storage);

        let save_delay = Duration::from_millis(config.persistence.save_delay_ms);
        let store = TaskStore::load(&storage, save_delay, reporter);

        let mut app = App {
            store,
            window: controller,
            storage,
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            cursor: 0,
            scroll_offset: 0,
            edit_buffer: String::new(),
            edit_cursor: 0,
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            move_step: i32::try_from(config.window.move_step).unwrap_or(i32::MAX),
            notice: None,
        };
        app.collect_notices();
        app
    }

    pub fn rows_at(&self, now: &DateTime<Local>) -> Vec<TaskRow> {
        rows::rows(self.store.tasks(), now)
    }

    pub fn task_count(&self) -> usize {
        self.store.tasks().len()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.store
            .tasks()
            .todos
            .get(self.cursor)
            .map(|t| t.id.as_str())
    }

    /// The window is out of sight (hidden or minimized).
    pub fn window_concealed(&self) -> bool {
        let w = self.window.window();
        !w.is_visible() || w.is_minimized()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.task_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
    }

    /// Apply an edit stamped with the wall clock.
    pub fn apply(&mut self, edit: Edit) -> bool {
        let now = Utc::now();
        self.apply_at(edit, now.timestamp(), now.timestamp_millis(), Instant::now())
    }

    pub fn apply_at(&mut self, edit: Edit, now: i64, now_millis: i64, at: Instant) -> bool {
        let changed = self.store.apply(&edit, now, now_millis, at);
        if changed {
            if matches!(edit, Edit::Add { .. }) {
                self.cursor = self.task_count().saturating_sub(1);
            }
            self.clamp_cursor();
        }
        changed
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.task_count().saturating_sub(1));
    }

    /// Run due saves and window notifications. Returns true when the screen
    /// needs a redraw.
    pub fn tick(&mut self, at: Instant) -> bool {
        self.store.tick(at, &self.storage);
        let outcome = self.window.pump(at, &self.storage);
        if outcome == Some(CloseOutcome::Closed) {
            self.should_quit = true;
        }
        let noticed = self.collect_notices();
        self.store.take_render() | noticed | outcome.is_some()
    }

    /// How long input may block before the next save falls due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        poll_timeout(&[self.store.deadline(), self.window.deadline()], now, IDLE_POLL)
    }

    /// Write everything still pending.
    pub fn shutdown(&mut self) {
        self.store.flush(&self.storage);
        self.window.flush(&self.storage);
        self.collect_notices();
    }

    /// Press the simulated window's close button.
    pub fn request_close(&mut self) {
        self.window.window_mut().request_close();
    }

    fn collect_notices(&mut self) -> bool {
        let latest = [self.window.take_notice(), self.store.take_notice()]
            .into_iter()
            .flatten()
            .last();
        match latest {
            Some(n) => {
                self.notice = Some(n);
                true
            }
            None => false,
        }
    }
}

/// Run the TUI against the data directory
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let _instance = InstanceLock::acquire(data_dir)?;
    let mut app = App::open(data_dir)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|frame| render::render(frame, app))?;
            redraw = false;
        }

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    redraw = true;
                }
                Event::Paste(text) => {
                    input::handle_paste(app, &text);
                    redraw = true;
                }
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }

        redraw |= app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
