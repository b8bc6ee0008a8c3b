pub mod passage;
pub mod vocabulary;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// Re-export the main types for convenience
pub use passage::{Passage, PassageSource, TextSource};
pub use vocabulary::Vocabulary;

/// Script of the passage being typed
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
pub enum Language {
    /// key-by-key Latin text
    #[default]
    #[value(name = "english", alias = "alphabetic")]
    #[serde(rename = "english", alias = "alphabetic")]
    #[strum(serialize = "English")]
    Alphabetic,
    /// IME-composed Chinese characters
    #[value(name = "chinese", alias = "ideographic")]
    #[serde(rename = "chinese", alias = "ideographic")]
    #[strum(serialize = "Chinese")]
    Ideographic,
}

/// How far back a correction request is allowed to rewind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionPolicy {
    /// only step back onto a position that was typed incorrectly
    IncorrectOnly,
    /// always step back one position, whatever its state
    Unconditional,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::Alphabetic => Language::Ideographic,
            Language::Ideographic => Language::Alphabetic,
        }
    }

    pub fn correction_policy(self) -> CorrectionPolicy {
        match self {
            Language::Alphabetic => CorrectionPolicy::IncorrectOnly,
            Language::Ideographic => CorrectionPolicy::Unconditional,
        }
    }

    /// Parse a stored language name, accepting both naming schemes
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name.trim(), true).ok()
    }

    /// Name used on the command line and in the config file
    pub fn name(self) -> &'static str {
        match self {
            Language::Alphabetic => "english",
            Language::Ideographic => "chinese",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled_round_trips() {
        assert_eq!(Language::Alphabetic.toggled(), Language::Ideographic);
        assert_eq!(Language::Ideographic.toggled(), Language::Alphabetic);
        assert_eq!(Language::Alphabetic.toggled().toggled(), Language::Alphabetic);
    }

    #[test]
    fn test_correction_policy_differs_between_modes() {
        assert_eq!(
            Language::Alphabetic.correction_policy(),
            CorrectionPolicy::IncorrectOnly
        );
        assert_eq!(
            Language::Ideographic.correction_policy(),
            CorrectionPolicy::Unconditional
        );
    }

    #[test]
    fn test_from_name_accepts_aliases() {
        assert_eq!(Language::from_name("english"), Some(Language::Alphabetic));
        assert_eq!(Language::from_name("Alphabetic"), Some(Language::Alphabetic));
        assert_eq!(Language::from_name("chinese"), Some(Language::Ideographic));
        assert_eq!(Language::from_name(" ideographic "), Some(Language::Ideographic));
        assert_eq!(Language::from_name("klingon"), None);
    }

    #[test]
    fn test_display_and_name() {
        assert_eq!(Language::Alphabetic.to_string(), "English");
        assert_eq!(Language::Ideographic.to_string(), "Chinese");
        assert_eq!(Language::Alphabetic.name(), "english");
        assert_eq!(Language::Ideographic.name(), "chinese");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Language::Ideographic).unwrap();
        assert_eq!(json, "\"chinese\"");
        let parsed: Language = serde_json::from_str("\"alphabetic\"").unwrap();
        assert_eq!(parsed, Language::Alphabetic);
    }
}
