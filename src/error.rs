//! Error types for collaborators, selection persistence and whole runs.

use thiserror::Error;

use crate::logic::summary::RunSummary;

/// Exit status used when the account owns no apps.
pub const EXIT_EMPTY_CATALOG: i32 = 2;
/// Exit status used when the LAN cache cannot be reached at all.
pub const EXIT_CACHE_UNREACHABLE: i32 = 3;
/// Exit status for every other run-level failure.
pub const EXIT_FAILURE: i32 = 1;

/// What a collaborator failure means for the rest of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The shared cache infrastructure is not reachable; no app can succeed.
    CacheUnreachable,
    /// Transport-level failure talking to a remote service.
    Network,
    /// A response arrived but could not be understood.
    Parse,
    /// The requested resource does not exist.
    NotFound,
    /// Anything else.
    Other,
}

/// Error returned by catalog, manifest and transfer collaborators.
///
/// The `kind` tag decides whether the prefill pipeline isolates the failure
/// to one app or aborts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SourceError {
    /// Classification used by the pipeline.
    pub kind: SourceErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl SourceError {
    /// Build an error with an explicit kind.
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for [`SourceErrorKind::CacheUnreachable`].
    pub fn cache_unreachable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::CacheUnreachable, message)
    }

    /// Shorthand for [`SourceErrorKind::Network`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Network, message)
    }

    /// Shorthand for [`SourceErrorKind::Parse`].
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Parse, message)
    }

    /// Shorthand for [`SourceErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound, message)
    }

    /// True when the error must abort the whole pipeline.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, SourceErrorKind::CacheUnreachable)
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::parse(e.to_string())
        } else if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            Self::not_found(e.to_string())
        } else {
            Self::network(e.to_string())
        }
    }
}

/// Failure reading or writing a durable state file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File the operation targeted.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file content is not the expected JSON shape.
    #[error("malformed JSON in {path}: {source}")]
    Json {
        /// File the operation targeted.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Run-level failure: anything that stops a command before or during the prefill loop.
#[derive(Debug, Error)]
pub enum PrefillError {
    /// The owned catalog has no entries.
    #[error(
        "Account has no owned apps! This is likely because it is a recently created account. Add some games to your account and try again"
    )]
    EmptyCatalog,
    /// The HTTP client could not be built.
    #[error("failed to set up networking: {0}")]
    Setup(#[source] SourceError),
    /// The catalog could not be listed at startup.
    #[error("failed to list owned apps: {0}")]
    Catalog(#[source] SourceError),
    /// The cache became unreachable mid-run; remaining apps were not attempted.
    #[error("lan cache unreachable while prefilling {app_id}: {message}")]
    CacheUnreachable {
        /// App whose attempt raised the condition.
        app_id: String,
        /// Detail from the collaborator.
        message: String,
        /// Summary of the apps processed before and including the abort.
        summary: RunSummary,
    },
    /// Saving the selection failed.
    #[error("failed to save selection: {0}")]
    Persistence(#[from] PersistError),
    /// Terminal setup, drawing or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl PrefillError {
    /// What: Map the error to the process exit status.
    ///
    /// Output:
    /// - `2` for an empty catalog, `3` for an unreachable cache, `1` otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyCatalog => EXIT_EMPTY_CATALOG,
            Self::CacheUnreachable { .. } => EXIT_CACHE_UNREACHABLE,
            _ => EXIT_FAILURE,
        }
    }
}
