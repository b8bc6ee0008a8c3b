use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use serde::Deserialize;
use tracing::{debug, info};

use super::Language;
use crate::error::SourceUnavailable;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

pub const ALPHABETIC_FILE: &str = "en_common.json";
pub const IDEOGRAPHIC_FILE: &str = "cn_common.json";

#[derive(Deserialize)]
struct WordList {
    data: Vec<String>,
}

#[derive(Deserialize)]
struct CharEntry {
    #[serde(default)]
    traditional: Option<String>,
    #[serde(default, rename = "char")]
    character: Option<String>,
}

impl CharEntry {
    /// Prefer the traditional form when the entry carries one
    fn display(self) -> Option<String> {
        self.traditional
            .filter(|t| !t.trim().is_empty())
            .or(self.character.filter(|c| !c.trim().is_empty()))
            .map(|s| s.trim().to_string())
    }
}

/// The two word pools a passage is drawn from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    alphabetic: Vec<String>,
    ideographic: Vec<String>,
}

impl Vocabulary {
    /// Both pools must be non-empty. Blank entries are dropped and each
    /// ideographic entry is reduced to its first character.
    pub fn new(alphabetic: Vec<String>, ideographic: Vec<String>) -> Result<Self, SourceUnavailable> {
        let alphabetic: Vec<String> = alphabetic
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if alphabetic.is_empty() {
            return Err(SourceUnavailable::Empty {
                language: Language::Alphabetic,
            });
        }
        let ideographic: Vec<String> = ideographic
            .iter()
            .filter_map(|entry| entry.trim().chars().next())
            .map(String::from)
            .collect();
        if ideographic.is_empty() {
            return Err(SourceUnavailable::Empty {
                language: Language::Ideographic,
            });
        }
        Ok(Self {
            alphabetic,
            ideographic,
        })
    }

    /// Parse the two word list documents
    pub fn from_json(alphabetic: &str, ideographic: &str) -> Result<Self, SourceUnavailable> {
        let words: WordList =
            serde_json::from_str(alphabetic).map_err(|source| SourceUnavailable::Malformed {
                name: ALPHABETIC_FILE.to_string(),
                source,
            })?;

        let entries: Vec<CharEntry> =
            serde_json::from_str(ideographic).map_err(|source| SourceUnavailable::Malformed {
                name: IDEOGRAPHIC_FILE.to_string(),
                source,
            })?;

        let characters = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .display()
                    .ok_or_else(|| SourceUnavailable::EntryWithoutCharacter {
                        name: IDEOGRAPHIC_FILE.to_string(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(words.data, characters)
    }

    /// Word lists bundled into the binary
    pub fn embedded() -> Result<Self, SourceUnavailable> {
        let alphabetic = read_embedded(ALPHABETIC_FILE)?;
        let ideographic = read_embedded(IDEOGRAPHIC_FILE)?;
        Self::from_json(alphabetic, ideographic)
    }

    /// Word lists read from a directory holding files shaped like the bundled ones
    pub fn from_dir(dir: &Path) -> Result<Self, SourceUnavailable> {
        let read = |name: &str| {
            let path = dir.join(name);
            debug!(path = %path.display(), "reading word list");
            fs::read_to_string(&path).map_err(|source| SourceUnavailable::Read { path, source })
        };
        let alphabetic = read(ALPHABETIC_FILE)?;
        let ideographic = read(IDEOGRAPHIC_FILE)?;
        Self::from_json(&alphabetic, &ideographic)
    }

    pub fn load(dir: Option<&Path>) -> Result<Self, SourceUnavailable> {
        let vocabulary = match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }?;
        info!(
            english = vocabulary.alphabetic.len(),
            chinese = vocabulary.ideographic.len(),
            "word lists loaded"
        );
        Ok(vocabulary)
    }

    pub fn words(&self, language: Language) -> &[String] {
        match language {
            Language::Alphabetic => &self.alphabetic,
            Language::Ideographic => &self.ideographic,
        }
    }
}

fn read_embedded(name: &str) -> Result<&'static str, SourceUnavailable> {
    LANG_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| SourceUnavailable::Missing {
            name: name.to_string(),
        })
}
