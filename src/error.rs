use std::io;
use std::path::PathBuf;

/// Failures that abort a [`Document`](crate::Document) operation.
///
/// Everything else (malformed lines, duplicates, missing values) is recoverable and only reported
/// through the [`Diagnostics`](crate::Diagnostics) sink.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{file}:{line}: key appears before any section")]
    KeyBeforeSection { file: String, line: usize },
}

/// An insert was rejected because the name is already taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate name: {name:?}")]
pub struct DuplicateName {
    name: String,
}

impl DuplicateName {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
