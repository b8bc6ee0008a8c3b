use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::language::Language;

/// Vocabulary could not be fetched or parsed; Start stays disabled
#[derive(Debug, Error)]
pub enum SourceUnavailable {
    #[error("cannot read word list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("word list {name} is not bundled")]
    Missing { name: String },

    #[error("word list {name} is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("entry {index} of {name} has no character")]
    EntryWithoutCharacter { name: String, index: usize },

    #[error("{language} word list is empty")]
    Empty { language: Language },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("{language} word list has not been loaded yet")]
    NotReady { language: Language },
}
