//! Unified error for every stage of an episode run.
use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, EpisodeError>;

/// Top-level error covering the whole episode pipeline.
///
/// No stage recovers locally: whichever variant is raised aborts the run and
/// is reported by the binary before exiting non-zero.
#[derive(Debug, Error)]
pub enum EpisodeError {
    /// Missing or unusable configuration, such as absent credentials.
    #[error("configuration: {0}")]
    Configuration(String),
    /// Transport failure talking to a remote service.
    #[error("network: {0}")]
    Network(String),
    /// The games lookup returned no candidates for the requested window.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
    /// A game record was malformed or could not be parsed.
    #[error("fetch failure: {0}")]
    FetchFailure(String),
    /// A remote operation completed but produced no usable result.
    #[error("operation failure: {0}")]
    OperationFailure(String),
    /// Decoding, mixing, encoding or writing audio failed.
    #[error("file processing: {0}")]
    FileProcessing(String),
}

impl From<std::io::Error> for EpisodeError {
    fn from(err: std::io::Error) -> Self {
        Self::FileProcessing(err.to_string())
    }
}

impl EpisodeError {
    /// Short, stable label for the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Network(_) => "network",
            Self::DataUnavailable(_) => "data_unavailable",
            Self::FetchFailure(_) => "fetch_failure",
            Self::OperationFailure(_) => "operation_failure",
            Self::FileProcessing(_) => "file_processing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_file_processing() {
        let err: EpisodeError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), "file_processing");
        assert_eq!(err.to_string(), "file processing: gone");
    }

    #[test]
    fn display_prefixes_the_category() {
        let err = EpisodeError::DataUnavailable("no games between 1999 and 2001".into());
        assert_eq!(
            err.to_string(),
            "data unavailable: no games between 1999 and 2001"
        );
    }
}
