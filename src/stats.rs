use crate::language::Language;

/// Average English word length used to turn keystrokes into words
pub const CHARS_PER_WORD: f64 = 5.0;

/// Live readouts derived from a session; never stored as the source of truth
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub typed: usize,
    pub elapsed_secs: u32,
    pub remaining_secs: u32,
}

impl SessionStats {
    pub fn compute(
        language: Language,
        typed: usize,
        errors: usize,
        countdown_secs: u32,
        remaining_secs: u32,
    ) -> Self {
        let elapsed_secs = countdown_secs.saturating_sub(remaining_secs);
        Self {
            wpm: wpm(language, typed, elapsed_secs),
            accuracy: accuracy(typed, errors),
            errors,
            typed,
            elapsed_secs,
            remaining_secs,
        }
    }
}

/// English counts five keystrokes per word, Chinese one character per word.
/// The word count is rounded before dividing by elapsed time.
pub fn words_typed(language: Language, typed: usize) -> f64 {
    match language {
        Language::Alphabetic => (typed as f64 / CHARS_PER_WORD).round(),
        Language::Ideographic => typed as f64,
    }
}

pub fn wpm(language: Language, typed: usize, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    let elapsed_minutes = elapsed_secs as f64 / 60.0;
    (words_typed(language, typed) / elapsed_minutes).round() as u32
}

/// Percentage of typed positions not currently counted as errors
pub fn accuracy(typed: usize, errors: usize) -> u32 {
    if typed == 0 {
        return 0;
    }
    let good = typed.saturating_sub(errors) as f64;
    ((good / typed as f64) * 100.0).round() as u32
}
