/// Correctness of one passage position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CharState {
    #[default]
    Untyped,
    Correct,
    Incorrect,
    /// typed correctly after an earlier mistake at the same position was rewound
    Corrected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Entry {
    state: CharState,
    had_error: bool,
}

/// One entry per passage position; the single source of truth for rendering
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new(len: usize) -> Self {
        Self {
            entries: vec![Entry::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self, idx: usize) -> Option<CharState> {
        self.entries.get(idx).map(|e| e.state)
    }

    pub fn states(&self) -> impl Iterator<Item = CharState> + '_ {
        self.entries.iter().map(|e| e.state)
    }

    pub fn count(&self, state: CharState) -> usize {
        self.states().filter(|s| *s == state).count()
    }

    /// Any position strictly before `idx` still waiting for correction
    pub fn has_incorrect_before(&self, idx: usize) -> bool {
        self.entries
            .iter()
            .take(idx)
            .any(|e| e.state == CharState::Incorrect)
    }

    pub(super) fn record(&mut self, idx: usize, outcome: Outcome) -> CharState {
        let entry = &mut self.entries[idx];
        entry.state = match outcome {
            Outcome::Correct if entry.had_error => CharState::Corrected,
            Outcome::Correct => CharState::Correct,
            Outcome::Incorrect => {
                entry.had_error = true;
                CharState::Incorrect
            }
        };
        entry.state
    }

    /// Returns the state the position held before being cleared
    pub(super) fn clear(&mut self, idx: usize) -> CharState {
        std::mem::take(&mut self.entries[idx].state)
    }
}
