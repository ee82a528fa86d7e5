//! Error types for the shell core.
//!
//! [`ShellError`] covers every failure the parser and evaluator can surface.
//! Application failures arrive as [`AppError`] and are wrapped with the
//! application name so the top-level message reads `name: message`.

use thiserror::Error;

use crate::apps::AppError;

/// Result type alias using [`ShellError`].
pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Error, Debug)]
pub enum ShellError {
    /// Malformed command line: unbalanced quotes, dangling operators,
    /// empty commands between separators.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Ambiguous or duplicated redirection.
    #[error("redirection error: {0}")]
    Redirection(String),

    /// A redirection target could not be opened.
    #[error("redirection error: {path}: {source}")]
    RedirectOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A nested command substitution failed.
    #[error("command substitution `{command}` failed: {source}")]
    Substitution {
        command: String,
        #[source]
        source: Box<ShellError>,
    },

    /// Command substitutions nested deeper than the configured cap.
    #[error("command substitution nested deeper than {0} levels")]
    SubstitutionDepth(usize),

    /// No application registered under this name.
    #[error("{0}: command not found")]
    UnknownApplication(String),

    /// The application itself reported a failure.
    #[error("{app}: {source}")]
    Application {
        app: String,
        #[source]
        source: AppError,
    },

    /// Every failure from the items of a `;` sequence, in order.
    #[error("{}", join_lines(.0))]
    Sequence(Vec<ShellError>),

    /// Writing to the caller's output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Flatten sequence failures into individual errors.
    pub fn failures(&self) -> Vec<&ShellError> {
        match self {
            ShellError::Sequence(errors) => errors.iter().flat_map(|e| e.failures()).collect(),
            other => vec![other],
        }
    }
}

fn join_lines(errors: &[ShellError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
