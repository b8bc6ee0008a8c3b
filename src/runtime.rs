use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::warn;

use crate::error::SourceUnavailable;
use crate::language::Vocabulary;

/// Countdown granularity
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// bracketed paste, treated as one committed unit
    Paste(String),
    Resize,
    /// the countdown timer fired
    Tick,
    /// nothing arrived while the countdown timer was disarmed
    Idle,
    Vocabulary(Result<Vocabulary, SourceUnavailable>),
}

/// Source of terminal events (keyboard, paste, resize) and loader results
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader = tx.clone();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // ignore key releases on terminals that report them
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Release => continue,
                Ok(CtEvent::Key(key)) => AppEvent::Key(key),
                Ok(CtEvent::Paste(text)) => AppEvent::Paste(text),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    warn!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if reader.send(ev).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Lets background work (the vocabulary loader) post into the same queue
    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Serializes events and owns the recurring countdown timer.
///
/// While armed, a `Tick` is produced every interval even if other events keep
/// arriving. Disarming drops the pending deadline, so no tick fires afterwards.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    deadline: Option<Instant>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            deadline: None,
        }
    }

    /// Start the recurring tick; a timer that is already armed keeps its schedule
    pub fn arm(&mut self) {
        if self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.ticker.interval());
        }
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Blocks until the next event, the next due tick, or one idle interval
    pub fn step(&mut self) -> AppEvent {
        let interval = self.ticker.interval();
        match self.deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now < deadline {
                    match self.event_source.recv_timeout(deadline - now) {
                        Ok(ev) => return ev,
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            std::thread::sleep(deadline.saturating_duration_since(Instant::now()))
                        }
                    }
                }
                self.deadline = Some(deadline + interval);
                AppEvent::Tick
            }
            None => match self.event_source.recv_timeout(interval) {
                Ok(ev) => ev,
                Err(RecvTimeoutError::Timeout) => AppEvent::Idle,
                Err(RecvTimeoutError::Disconnected) => {
                    std::thread::sleep(interval);
                    AppEvent::Idle
                }
            },
        }
    }
}
