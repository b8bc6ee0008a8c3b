pub mod ledger;
pub mod reducer;

use tracing::{debug, error, info};

use crate::error::SessionError;
use crate::language::{Language, Passage, PassageSource, TextSource};
use crate::stats::SessionStats;

pub use ledger::{CharState, Ledger, Outcome};
pub use reducer::{Correction, Submission};

/// Fixed session duration
pub const COUNTDOWN_SECS: u32 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Counters that survive passage rotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub typed: usize,
    pub errors: usize,
}

/// Result of one countdown tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// no session is running
    Ignored,
    Counting(u32),
    Expired,
}

/// The one mutable typing session; owns its passage source
#[derive(Debug)]
pub struct Session<S = TextSource> {
    source: S,
    status: Status,
    language: Language,
    countdown_secs: u32,
    remaining_secs: u32,
    passage: Passage,
    ledger: Ledger,
    cursor: usize,
    totals: Totals,
    passages_completed: usize,
}

impl<S: PassageSource> Session<S> {
    pub fn new(source: S, language: Language) -> Self {
        Self {
            source,
            status: Status::Idle,
            language,
            countdown_secs: COUNTDOWN_SECS,
            remaining_secs: COUNTDOWN_SECS,
            passage: Passage::default(),
            ledger: Ledger::default(),
            cursor: 0,
            totals: Totals::default(),
            passages_completed: 0,
        }
    }

    /// Override the countdown window; applies from the next start
    pub fn with_countdown(mut self, secs: u32) -> Self {
        self.countdown_secs = secs.max(1);
        if self.status != Status::Running {
            self.remaining_secs = self.countdown_secs;
        }
        self
    }

    pub fn start(&mut self, language: Language) -> Result<(), SessionError> {
        if !self.source.is_ready(language) {
            return Err(SessionError::NotReady { language });
        }
        let passage = self.source.generate(language)?;
        if passage.is_empty() {
            return Err(SessionError::NotReady { language });
        }

        self.language = language;
        self.totals = Totals::default();
        self.passages_completed = 0;
        self.remaining_secs = self.countdown_secs;
        self.install(passage);
        self.status = Status::Running;

        info!(%language, countdown = self.countdown_secs, "session started");
        Ok(())
    }

    pub fn tick(&mut self) -> Tick {
        if self.status != Status::Running {
            return Tick::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish();
            Tick::Expired
        } else {
            Tick::Counting(self.remaining_secs)
        }
    }

    pub fn reset(&mut self) {
        if self.status != Status::Idle {
            debug!(status = ?self.status, "session reset");
        }
        self.status = Status::Idle;
        self.passage = Passage::default();
        self.ledger = Ledger::default();
        self.cursor = 0;
        self.totals = Totals::default();
        self.passages_completed = 0;
        self.remaining_secs = self.countdown_secs;
    }

    /// Returns true when a running or finished session had to be reset first
    pub fn switch_language(&mut self, language: Language) -> bool {
        let was_active = self.status != Status::Idle;
        if was_active {
            self.reset();
        }
        self.language = language;
        info!(%language, was_active, "language switched");
        was_active
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::compute(
            self.language,
            self.totals.typed,
            self.totals.errors,
            self.countdown_secs,
            self.remaining_secs,
        )
    }

    /// Whether the recurring one-second tick should be armed
    pub fn ticking(&self) -> bool {
        self.status == Status::Running
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn passages_completed(&self) -> usize {
        self.passages_completed
    }

    pub fn is_ready(&self, language: Language) -> bool {
        self.source.is_ready(language)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn install(&mut self, passage: Passage) {
        self.ledger = Ledger::new(passage.len());
        self.passage = passage;
        self.cursor = 0;
    }

    fn finish(&mut self) {
        self.status = Status::Finished;
        let stats = self.stats();
        info!(
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            errors = stats.errors,
            typed = stats.typed,
            "session finished"
        );
    }

    /// Swap in a fresh passage once the cursor runs off the end, keeping totals and clock
    fn rotate_passage(&mut self) {
        match self.source.generate(self.language) {
            Ok(passage) if !passage.is_empty() => {
                self.passages_completed += 1;
                debug!(completed = self.passages_completed, "passage rotated");
                self.install(passage);
            }
            Ok(_) => {
                error!(language = %self.language, "next passage came back empty");
                self.finish();
            }
            Err(err) => {
                error!(%err, "could not generate the next passage");
                self.finish();
            }
        }
    }
}
