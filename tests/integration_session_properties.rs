use assert_matches::assert_matches;
use zikey::error::SessionError;
use zikey::language::{Language, Passage, PassageSource};
use zikey::session::{CharState, Correction, Session, Status, Submission, Totals};
use zikey::stats::{accuracy, wpm, SessionStats};

/// Always hands out the same text
struct FixedSource(String);

impl PassageSource for FixedSource {
    fn is_ready(&self, _language: Language) -> bool {
        !self.0.is_empty()
    }

    fn generate(&mut self, language: Language) -> Result<Passage, SessionError> {
        if self.0.is_empty() {
            return Err(SessionError::NotReady { language });
        }
        Ok(Passage::new(&self.0))
    }
}

fn running(text: &str, language: Language) -> Session<FixedSource> {
    let mut session = Session::new(FixedSource(text.to_string()), language);
    session.start(language).unwrap();
    session
}

fn assert_ledger_matches_passage(session: &Session<FixedSource>) {
    assert_eq!(session.ledger().len(), session.passage().len());
}

#[test]
fn typing_past_an_error_is_rejected() {
    let mut session = running("cat", Language::Alphabetic);

    session.submit_character('c');
    session.submit_character('x');
    assert_matches!(session.submit_character('t'), Submission::Rejected);

    assert_eq!(session.cursor(), 2);
    assert_eq!(
        session.ledger().states().collect::<Vec<_>>(),
        vec![CharState::Correct, CharState::Incorrect, CharState::Untyped]
    );
    assert_ledger_matches_passage(&session);
}

#[test]
fn corrected_only_after_an_error_was_rewound() {
    let mut session = running("cat", Language::Alphabetic);

    session.submit_character('c');
    assert_eq!(session.ledger().state(0), Some(CharState::Correct));

    session.submit_character('x');
    assert_matches!(
        session.request_correction(),
        Correction::Rewound {
            previous: CharState::Incorrect
        }
    );
    assert_eq!(session.ledger().state(1), Some(CharState::Untyped));
    session.submit_character('a');
    assert_eq!(session.ledger().state(1), Some(CharState::Corrected));
    assert_eq!(session.totals(), Totals { typed: 2, errors: 0 });
    assert_ledger_matches_passage(&session);
}

#[test]
fn correction_over_correct_text_depends_on_language() {
    let mut english = running("ab", Language::Alphabetic);
    english.submit_character('a');
    assert_matches!(english.request_correction(), Correction::Rejected);
    assert_eq!(english.cursor(), 1);

    let mut chinese = running("字個", Language::Ideographic);
    chinese.submit_composed_unit("字");
    assert_matches!(chinese.request_correction(), Correction::Rewound { .. });
    assert_eq!(chinese.cursor(), 0);
    assert_eq!(chinese.totals(), Totals::default());
}

#[test]
fn accuracy_formula() {
    assert_eq!(accuracy(10, 3), 70);
    assert_eq!(accuracy(0, 0), 0);

    let stats = SessionStats::compute(Language::Alphabetic, 10, 3, 60, 30);
    assert_eq!(stats.accuracy, 70);
}

#[test]
fn wpm_after_a_full_minute_of_english() {
    assert_eq!(wpm(Language::Alphabetic, 250, 60), 50);
    assert_eq!(wpm(Language::Alphabetic, 250, 0), 0);

    let text = "a".repeat(300);
    let mut session = running(&text, Language::Alphabetic);
    for _ in 0..250 {
        session.submit_character('a');
    }
    for _ in 0..60 {
        session.tick();
    }

    assert_eq!(session.status(), Status::Finished);
    assert_eq!(session.stats().wpm, 50);
    assert_eq!(session.stats().accuracy, 100);
}

#[test]
fn rotation_carries_totals_into_the_next_passage() {
    let text = "字".repeat(100);
    let mut session = running(&text, Language::Ideographic);

    // four mistakes made and corrected along the way, one left on the last character
    for idx in 0..99 {
        if idx % 25 == 10 {
            session.submit_composed_unit("zi");
            session.request_correction();
        }
        session.submit_composed_unit("字");
    }
    assert_eq!(session.totals(), Totals { typed: 99, errors: 0 });

    assert_matches!(
        session.submit_composed_unit("個"),
        Submission::Accepted { rotated: true, .. }
    );

    assert_eq!(session.cursor(), 0);
    assert_eq!(session.passages_completed(), 1);
    assert_eq!(session.totals(), Totals { typed: 100, errors: 1 });
    assert_eq!(session.ledger().count(CharState::Untyped), 100);
    assert_ledger_matches_passage(&session);

    // the new passage starts ungated and keeps counting from there
    assert_matches!(
        session.submit_composed_unit("字"),
        Submission::Accepted { rotated: false, .. }
    );
    assert_eq!(session.totals(), Totals { typed: 101, errors: 1 });
}

#[test]
fn countdown_expiry_freezes_the_ledger() {
    let mut session = running("cat", Language::Alphabetic);
    assert_eq!(session.remaining_secs(), 60);
    session.submit_character('c');

    for _ in 0..60 {
        session.tick();
    }

    assert_eq!(session.status(), Status::Finished);
    assert!(!session.ticking());
    let before = session.ledger().clone();
    assert_matches!(session.submit_character('a'), Submission::Ignored);
    assert_matches!(session.request_correction(), Correction::Ignored);
    assert_eq!(session.ledger(), &before);
    assert_eq!(session.cursor(), 1);
}

#[test]
fn language_switch_resets_a_running_session() {
    let mut session = running("cat", Language::Alphabetic);
    session.submit_character('c');
    session.tick();

    assert!(session.switch_language(Language::Ideographic));

    assert_eq!(session.status(), Status::Idle);
    assert_eq!(session.language(), Language::Ideographic);
    assert_eq!(session.cursor(), 0);
    assert!(session.ledger().is_empty());
    assert_eq!(session.totals(), Totals::default());
    assert_eq!(session.remaining_secs(), 60);
}

#[test]
fn start_requires_a_vocabulary() {
    let mut session = Session::new(FixedSource(String::new()), Language::Alphabetic);
    assert_eq!(
        session.start(Language::Alphabetic),
        Err(SessionError::NotReady {
            language: Language::Alphabetic
        })
    );
    assert_eq!(session.status(), Status::Idle);
}
