/// Failures a service operation reports to its caller.
///
/// Everything except `Internal` carries a message that is safe to show to
/// clients. `Internal` keeps its source for logs only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ExternalService(String),
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn internal(message: &str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message: message.to_owned(),
            source: source.into(),
        }
    }

    /// Message followed by the source chain, for logging.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Internal { message, source } => format!("{message}: {source:#}"),
            err => err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
