mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc::Sender,
    thread,
};
use tracing::{debug, info, warn};
use zikey::{
    app_dirs::AppDirs,
    composer::Composer,
    config::{Config, ConfigStore, FileConfigStore, RuntimeSettings},
    error::SourceUnavailable,
    language::{Language, TextSource, Vocabulary},
    logging::init_tracing,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    session::{Session, Status, Tick},
    stats::SessionStats,
};

/// timed typing test for English keystrokes and IME-composed Chinese
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A one-minute typing test. English is typed key by key; Chinese is typed through an input method and committed one character at a time. Errors must be corrected in order before typing continues."
)]
pub struct Cli {
    /// language to pull the passage from
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// length of the countdown in seconds
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// directory holding en_common.json and cn_common.json to use instead of the bundled lists
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// write a debug log to the state directory (filter with ZIKEY_LOG)
    #[clap(long)]
    log: bool,
}

/// Progress of the background vocabulary load
#[derive(Debug, Clone, PartialEq)]
pub enum VocabularyState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub settings: RuntimeSettings,
    pub session: Session,
    pub composer: Composer,
    pub vocabulary: VocabularyState,
    pub stats: SessionStats,
    pub notice: Option<String>,
    store: Option<Box<dyn ConfigStore>>,
}

impl App {
    pub fn new(settings: RuntimeSettings) -> Self {
        let session = Session::new(TextSource::new(), settings.language)
            .with_countdown(settings.countdown_secs);
        let stats = session.stats();
        Self {
            settings,
            session,
            composer: Composer::new(),
            vocabulary: VocabularyState::Loading,
            stats,
            notice: None,
            store: None,
        }
    }

    /// Persist language changes through `store`
    pub fn with_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn on_vocabulary(&mut self, result: Result<Vocabulary, SourceUnavailable>) {
        match result {
            Ok(vocabulary) => {
                self.session.source_mut().install(vocabulary);
                self.vocabulary = VocabularyState::Ready;
            }
            Err(err) => {
                warn!(%err, "word lists unavailable");
                self.vocabulary = VocabularyState::Failed(err.to_string());
            }
        }
    }

    pub fn can_start(&self) -> bool {
        self.vocabulary == VocabularyState::Ready && self.session.status() != Status::Running
    }

    pub fn can_reset(&self) -> bool {
        self.session.status() != Status::Idle
    }

    pub fn start(&mut self) {
        if !self.can_start() {
            return;
        }
        self.composer.cancel();
        match self.session.start(self.session.language()) {
            Ok(()) => self.notice = None,
            Err(err) => self.notice = Some(err.to_string()),
        }
        self.refresh_stats();
    }

    pub fn reset(&mut self) {
        self.composer.cancel();
        self.session.reset();
        self.notice = None;
        self.refresh_stats();
    }

    pub fn toggle_language(&mut self) {
        let language = self.session.language().toggled();
        self.composer.cancel();
        self.session.switch_language(language);
        self.settings.language = language;
        self.refresh_stats();

        if let Some(store) = &self.store {
            if let Err(err) = store.save(&Config::from(&self.settings)) {
                warn!(%err, "could not save settings");
            }
        }
    }

    pub fn on_tick(&mut self) {
        if let Tick::Expired = self.session.tick() {
            self.composer.cancel();
        }
        self.refresh_stats();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Flow::Quit,
                KeyCode::Char('r') if self.can_reset() => self.reset(),
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Esc if self.composer.is_composing() => self.composer.cancel(),
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Tab => self.toggle_language(),
            KeyCode::Enter if self.session.status() != Status::Running => self.start(),
            _ if self.session.status() == Status::Running => self.on_typing_key(key),
            _ => {}
        }
        Flow::Continue
    }

    pub fn on_paste(&mut self, text: &str) {
        if self.session.status() != Status::Running
            || self.session.language() != Language::Ideographic
        {
            return;
        }
        if self.composer.is_composing() {
            self.composer.push_str(text);
        } else {
            self.session.submit_composed_unit(text);
        }
        self.after_input();
    }

    fn on_typing_key(&mut self, key: KeyEvent) {
        match self.session.language() {
            Language::Alphabetic => match key.code {
                KeyCode::Backspace => {
                    self.session.request_correction();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                    self.session.submit_character(c);
                }
                _ => return,
            },
            Language::Ideographic => match key.code {
                KeyCode::Backspace => {
                    if !self.composer.pop() {
                        self.session.request_correction();
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if let Some(text) = self.composer.end() {
                        debug!(%text, "composition committed");
                        self.session.submit_composed_unit(&text);
                    }
                }
                KeyCode::Char(c) if c.is_ascii_graphic() || self.composer.is_composing() => {
                    self.composer.push(c)
                }
                KeyCode::Char(c) => {
                    self.session.submit_composed_unit(c.encode_utf8(&mut [0; 4]));
                }
                _ => return,
            },
        }
        self.after_input();
    }

    fn after_input(&mut self) {
        if self.session.status() != Status::Running {
            self.composer.cancel();
        }
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.stats = self.session.stats();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = if cli.log {
        AppDirs::log_dir().and_then(|dir| init_tracing(&dir))
    } else {
        None
    };

    let store = FileConfigStore::new();
    let settings = RuntimeSettings::resolve(&store.load(), cli.language, cli.seconds, cli.data_dir);
    info!(?settings, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    spawn_vocabulary_loader(settings.data_dir.clone(), events.sender());
    let mut runner = Runner::new(events, FixedTicker::default());

    let mut app = App::new(settings).with_store(Box::new(store));
    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn spawn_vocabulary_loader(data_dir: Option<PathBuf>, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let result = Vocabulary::load(data_dir.as_deref());
        let _ = tx.send(AppEvent::Vocabulary(result));
    });
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        if app.session.ticking() {
            runner.arm();
        } else {
            runner.disarm();
        }
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Idle | AppEvent::Resize => {}
            AppEvent::Paste(text) => app.on_paste(&text),
            AppEvent::Vocabulary(result) => app.on_vocabulary(result),
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
