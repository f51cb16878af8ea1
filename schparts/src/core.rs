//! Errors and session options shared by the library and the CLI.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SchPartsError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Component {0} has no fields to copy placement from")]
    MalformedComponent(String),
    #[error("No components with value {0}")]
    NoSuchGroup(String),
    #[error("File has {in_file} component block(s) but {in_memory} are loaded; reload before saving")]
    ComponentCountMismatch { in_file: usize, in_memory: usize },
    #[error("Component block opened on line {line} is never closed")]
    UnterminatedComponent { line: usize },
    #[error("Index {index} out of range ({count} available)")]
    ComponentIndex { index: usize, count: usize },
    #[error("Unknown field key: {0}")]
    UnknownField(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl From<crate::parser::kicad_legacy::LegacyParseError> for SchPartsError {
    fn from(e: crate::parser::kicad_legacy::LegacyParseError) -> Self {
        SchPartsError::Parse(e.to_string())
    }
}

impl SchPartsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchPartsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// How `list` and `groups` render their output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Options for an editing session (CLI flags map onto these).
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// Where `save` writes when no path is given. `None` overwrites the schematic.
    pub output: Option<PathBuf>,
    /// Normalize every component right after loading.
    pub normalize_on_load: bool,
    pub format: OutputFormat,
}
