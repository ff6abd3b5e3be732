use std::path::PathBuf;
use std::process::ExitStatus;

use metrics_loader::MetricsLoadError;

/// Errors that can occur while generating fonts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to save font source {path:?}: {message}")]
    Ufo { path: PathBuf, message: String },
    #[error("could not run '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited unsuccessfully ({status})")]
    Compile { program: String, status: ExitStatus },
    #[error("{path:?} is not a usable font: {message}")]
    Font { path: PathBuf, message: String },
    #[error("command template '{0}' names no program")]
    EmptyCommand(String),
    #[error("invalid glyph budget {budget}: must be between 1 and {max}")]
    InvalidBudget { budget: usize, max: usize },
    #[error("'{0}' is not a font file name")]
    BadFileName(String),
    #[error("no font files found in {0:?}")]
    NoFonts(PathBuf),
    #[error("failed to load metrics: {0}")]
    MetricsLoad(#[from] MetricsLoadError),
    #[error("failed to export {file}: {source}")]
    Export {
        file: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the name of the file being written.
    pub(crate) fn exporting(self, file: impl Into<String>) -> Error {
        Error::Export {
            file: file.into(),
            source: Box::new(self),
        }
    }
}
