use tracing::trace;

use super::ledger::{CharState, Outcome};
use super::{Session, Status};
use crate::language::{CorrectionPolicy, PassageSource};

/// What happened to one committed input unit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// no session running, or nothing to compare against
    Ignored,
    /// an earlier position still has to be corrected
    Rejected,
    Accepted { outcome: Outcome, rotated: bool },
}

/// What happened to one correction request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correction {
    /// no session running, or the cursor is at the start
    Ignored,
    /// the previous position may not be rewound
    Rejected,
    Rewound { previous: CharState },
}

impl<S: PassageSource> Session<S> {
    /// One key press in English mode
    pub fn submit_character(&mut self, key: char) -> Submission {
        self.submit(|expected| key == expected)
    }

    /// One committed IME string, compared whole against the single target character
    pub fn submit_composed_unit(&mut self, text: &str) -> Submission {
        if text.is_empty() {
            return Submission::Ignored;
        }
        self.submit(|expected| {
            let mut chars = text.chars();
            chars.next() == Some(expected) && chars.next().is_none()
        })
    }

    pub fn request_correction(&mut self) -> Correction {
        if self.status != Status::Running || self.cursor == 0 {
            return Correction::Ignored;
        }

        let target = self.cursor - 1;
        let previous = self.ledger.state(target).unwrap_or_default();
        let allowed = match self.language.correction_policy() {
            CorrectionPolicy::IncorrectOnly => previous == CharState::Incorrect,
            CorrectionPolicy::Unconditional => true,
        };
        if !allowed || self.ledger.has_incorrect_before(target) {
            trace!(target, ?previous, "correction rejected");
            return Correction::Rejected;
        }

        self.cursor = target;
        self.ledger.clear(target);
        if previous == CharState::Incorrect {
            self.totals.errors = self.totals.errors.saturating_sub(1);
        }
        self.totals.typed = self.totals.typed.saturating_sub(1);

        trace!(cursor = self.cursor, ?previous, "rewound");
        Correction::Rewound { previous }
    }

    fn submit(&mut self, matches: impl FnOnce(char) -> bool) -> Submission {
        if self.status != Status::Running {
            return Submission::Ignored;
        }
        let Some(expected) = self.passage.get(self.cursor) else {
            return Submission::Ignored;
        };
        if self.ledger.has_incorrect_before(self.cursor) {
            trace!(cursor = self.cursor, "input rejected until earlier error is corrected");
            return Submission::Rejected;
        }

        let outcome = if matches(expected) {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.ledger.record(self.cursor, outcome);
        self.cursor += 1;
        self.totals.typed += 1;
        if outcome == Outcome::Incorrect {
            self.totals.errors += 1;
        }

        let rotated = self.cursor >= self.passage.len();
        if rotated {
            self.rotate_passage();
        }
        Submission::Accepted { outcome, rotated }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::Totals;
    use super::*;
    use crate::language::Language;
    use assert_matches::assert_matches;

    fn accepted(outcome: Outcome) -> Submission {
        Submission::Accepted {
            outcome,
            rotated: false,
        }
    }

    #[test]
    fn test_submit_correct_and_incorrect() {
        let mut session = running("cat", Language::Alphabetic);

        assert_eq!(session.submit_character('c'), accepted(Outcome::Correct));
        assert_eq!(session.submit_character('x'), accepted(Outcome::Incorrect));

        assert_eq!(session.cursor(), 2);
        assert_eq!(session.ledger().state(0), Some(CharState::Correct));
        assert_eq!(session.ledger().state(1), Some(CharState::Incorrect));
        assert_eq!(session.totals(), Totals { typed: 2, errors: 1 });
    }

    #[test]
    fn test_input_after_uncorrected_error_is_rejected() {
        let mut session = running("cat", Language::Alphabetic);
        session.submit_character('c');
        session.submit_character('x');

        assert_eq!(session.submit_character('t'), Submission::Rejected);

        assert_eq!(session.cursor(), 2);
        assert_eq!(session.ledger().state(2), Some(CharState::Untyped));
        assert_eq!(session.totals(), Totals { typed: 2, errors: 1 });
    }

    #[test]
    fn test_error_at_cursor_start_is_not_earlier() {
        let mut session = running("cat", Language::Alphabetic);
        assert_eq!(session.submit_character('x'), accepted(Outcome::Incorrect));
        // position 0 is now before the cursor
        assert_eq!(session.submit_character('a'), Submission::Rejected);
    }

    #[test]
    fn test_correction_then_retype_marks_corrected() {
        let mut session = running("cat", Language::Alphabetic);
        session.submit_character('c');
        session.submit_character('x');

        assert_eq!(
            session.request_correction(),
            Correction::Rewound {
                previous: CharState::Incorrect
            }
        );
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.ledger().state(1), Some(CharState::Untyped));
        assert_eq!(session.totals(), Totals { typed: 1, errors: 0 });

        assert_eq!(session.submit_character('a'), accepted(Outcome::Correct));
        assert_eq!(session.ledger().state(1), Some(CharState::Corrected));
        assert_matches!(session.submit_character('t'), Submission::Accepted { .. });
    }

    #[test]
    fn test_alphabetic_correction_only_rewinds_errors() {
        let mut session = running("cat", Language::Alphabetic);
        session.submit_character('c');

        assert_eq!(session.request_correction(), Correction::Rejected);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.ledger().state(0), Some(CharState::Correct));
        assert_eq!(session.totals().typed, 1);
    }

    #[test]
    fn test_ideographic_correction_rewinds_unconditionally() {
        let mut session = running("中国人", Language::Ideographic);
        session.submit_composed_unit("中");
        session.submit_composed_unit("国");

        assert_eq!(
            session.request_correction(),
            Correction::Rewound {
                previous: CharState::Correct
            }
        );
        assert_eq!(
            session.request_correction(),
            Correction::Rewound {
                previous: CharState::Correct
            }
        );
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.totals(), Totals::default());
        assert_eq!(session.request_correction(), Correction::Ignored);
    }

    #[test]
    fn test_ideographic_correction_of_error_decrements_errors() {
        let mut session = running("中国人", Language::Ideographic);
        session.submit_composed_unit("中");
        session.submit_composed_unit("口");
        assert_eq!(session.totals(), Totals { typed: 2, errors: 1 });

        session.request_correction();
        assert_eq!(session.totals(), Totals { typed: 1, errors: 0 });

        session.submit_composed_unit("国");
        assert_eq!(session.ledger().state(1), Some(CharState::Corrected));
    }

    #[test]
    fn test_rewinding_corrected_position_keeps_marker() {
        let mut session = running("中国人", Language::Ideographic);
        session.submit_composed_unit("口");
        session.request_correction();
        session.submit_composed_unit("中");
        assert_eq!(session.ledger().state(0), Some(CharState::Corrected));

        assert_eq!(
            session.request_correction(),
            Correction::Rewound {
                previous: CharState::Corrected
            }
        );
        assert_eq!(session.totals(), Totals { typed: 0, errors: 0 });
        session.submit_composed_unit("中");
        assert_eq!(session.ledger().state(0), Some(CharState::Corrected));
    }

    #[test]
    fn test_composed_unit_must_be_exactly_the_target() {
        let mut session = running("中国", Language::Ideographic);

        assert_eq!(
            session.submit_composed_unit("中国"),
            accepted(Outcome::Incorrect)
        );
        session.request_correction();
        assert_eq!(session.submit_composed_unit(""), Submission::Ignored);
        assert_eq!(session.submit_composed_unit("中"), accepted(Outcome::Correct));
    }

    #[test]
    fn test_correction_at_start_is_ignored() {
        let mut session = running("cat", Language::Alphabetic);
        assert_eq!(session.request_correction(), Correction::Ignored);
    }

    #[test]
    fn test_input_ignored_when_not_running() {
        let mut session = running("cat", Language::Alphabetic);
        session.reset();

        assert_eq!(session.submit_character('c'), Submission::Ignored);
        assert_eq!(session.submit_composed_unit("c"), Submission::Ignored);
        assert_eq!(session.request_correction(), Correction::Ignored);
        assert_eq!(session.totals(), Totals::default());
    }

    #[test]
    fn test_rotation_preserves_totals() {
        let mut session = running("ab", Language::Alphabetic);

        assert_eq!(session.submit_character('a'), accepted(Outcome::Correct));
        assert_eq!(
            session.submit_character('x'),
            Submission::Accepted {
                outcome: Outcome::Incorrect,
                rotated: true
            }
        );

        assert_eq!(session.cursor(), 0);
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.ledger().count(CharState::Untyped), 2);
        assert_eq!(session.totals(), Totals { typed: 2, errors: 1 });
        assert_eq!(session.passages_completed(), 1);
        assert_eq!(session.source().generated, 2);

        // the error left behind in the old passage no longer gates input
        assert_eq!(session.submit_character('a'), accepted(Outcome::Correct));
        assert_eq!(session.totals(), Totals { typed: 3, errors: 1 });
    }

    #[test]
    fn test_rotation_failure_finishes_session() {
        let mut session = running("a", Language::Alphabetic);
        session.source_mut().text.clear();

        session.submit_character('a');
        assert_eq!(session.status(), Status::Finished);
        assert_eq!(session.totals().typed, 1);
    }

    #[test]
    fn test_cursor_ahead_positions_stay_untyped() {
        let mut session = running("typing", Language::Alphabetic);
        for c in "ty".chars() {
            session.submit_character(c);
        }
        let cursor = session.cursor();
        assert!(session
            .ledger()
            .states()
            .skip(cursor)
            .all(|s| s == CharState::Untyped));
    }
}
