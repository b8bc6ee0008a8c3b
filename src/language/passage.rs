use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::{Language, Vocabulary};
use crate::error::SessionError;

/// Words drawn for one English passage
pub const ALPHABETIC_WORDS: usize = 70;
/// Words per capitalized group
pub const GROUP_SIZE: usize = 10;
/// Characters drawn for one Chinese passage
pub const IDEOGRAPHIC_CHARS: usize = 100;

/// Target characters of one round; replaced wholesale, never edited
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Passage {
    chars: Vec<char>,
}

impl Passage {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl std::fmt::Display for Passage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Supplies passages to a session
pub trait PassageSource {
    fn is_ready(&self, language: Language) -> bool;

    fn generate(&mut self, language: Language) -> Result<Passage, SessionError>;
}

/// Random passages drawn from a loaded vocabulary
#[derive(Debug)]
pub struct TextSource {
    vocabulary: Option<Vocabulary>,
    rng: StdRng,
}

impl TextSource {
    /// A source with nothing loaded yet
    pub fn new() -> Self {
        Self {
            vocabulary: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic draws, for tests and reproducible runs
    pub fn seeded(vocabulary: Vocabulary, seed: u64) -> Self {
        Self {
            vocabulary: Some(vocabulary),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn install(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = Some(vocabulary);
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PassageSource for TextSource {
    fn is_ready(&self, language: Language) -> bool {
        self.vocabulary
            .as_ref()
            .is_some_and(|v| !v.words(language).is_empty())
    }

    fn generate(&mut self, language: Language) -> Result<Passage, SessionError> {
        let words = match self.vocabulary.as_ref() {
            Some(v) if !v.words(language).is_empty() => v.words(language),
            _ => return Err(SessionError::NotReady { language }),
        };

        let text = match language {
            Language::Alphabetic => alphabetic_text(words, &mut self.rng),
            Language::Ideographic => ideographic_text(words, &mut self.rng),
        };
        debug!(%language, len = text.chars().count(), "generated passage");
        Ok(Passage::new(&text))
    }
}

/// Uniform draws with replacement
fn draw<'a, R: rand::Rng>(words: &'a [String], count: usize, rng: &mut R) -> Vec<&'a str> {
    (0..count)
        .filter_map(|_| words.choose(rng).map(String::as_str))
        .collect()
}

/// Capitalized groups of words, each word followed by a single space
pub fn alphabetic_text<R: rand::Rng>(words: &[String], rng: &mut R) -> String {
    draw(words, ALPHABETIC_WORDS, rng)
        .into_iter()
        .enumerate()
        .map(|(i, word)| {
            if i % GROUP_SIZE == 0 {
                capitalize_first_letter(word)
            } else {
                word.to_string()
            }
        })
        .map(|word| format!("{word} "))
        .collect()
}

pub fn ideographic_text<R: rand::Rng>(characters: &[String], rng: &mut R) -> String {
    draw(characters, IDEOGRAPHIC_CHARS, rng).concat()
}

fn capitalize_first_letter(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
