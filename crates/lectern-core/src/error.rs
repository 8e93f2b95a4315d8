use thiserror::Error;

/// Top-level error type for the Lectern system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates return
/// `Result<T, LecternError>` so the `?` operator works seamlessly across
/// crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LecternError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied an invalid request body (empty message list, missing link).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Headless browser launch or page load failed.
    #[error("Render error: {0}")]
    Render(String),

    /// A required field was missing or empty after scraping.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Embedding service call failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index service call failed.
    #[error("Index error: {0}")]
    Index(String),

    /// Chat completion service call failed.
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LecternError {
    /// Whether this error originated in an external service call.
    ///
    /// Upstream failures map to 502 at the API boundary; everything else is
    /// either a caller error or an internal fault.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            LecternError::Render(_)
                | LecternError::Embedding(_)
                | LecternError::Index(_)
                | LecternError::Generation(_)
        )
    }
}

impl From<toml::de::Error> for LecternError {
    fn from(err: toml::de::Error) -> Self {
        LecternError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LecternError {
    fn from(err: toml::ser::Error) -> Self {
        LecternError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LecternError {
    fn from(err: serde_json::Error) -> Self {
        LecternError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Lectern operations.
pub type Result<T> = std::result::Result<T, LecternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LecternError::Extraction("rating missing".to_string());
        assert_eq!(err.to_string(), "Extraction error: rating missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LecternError = io_err.into();
        assert!(matches!(err, LecternError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: LecternError = parsed.unwrap_err().into();
        assert!(matches!(err, LecternError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        let err: LecternError = parsed.unwrap_err().into();
        assert!(matches!(err, LecternError::Serialization(_)));
    }

    #[test]
    fn test_upstream_classification() {
        assert!(LecternError::Render("launch failed".into()).is_upstream());
        assert!(LecternError::Embedding("429".into()).is_upstream());
        assert!(LecternError::Index("timeout".into()).is_upstream());
        assert!(LecternError::Generation("closed".into()).is_upstream());
        assert!(!LecternError::Extraction("empty name".into()).is_upstream());
        assert!(!LecternError::MalformedInput("no messages".into()).is_upstream());
        assert!(!LecternError::Config("bad key".into()).is_upstream());
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(LecternError, &str)> = vec![
            (
                LecternError::Config("bad port".to_string()),
                "Configuration error: bad port",
            ),
            (
                LecternError::MalformedInput("empty body".to_string()),
                "Malformed input: empty body",
            ),
            (
                LecternError::Render("chrome not found".to_string()),
                "Render error: chrome not found",
            ),
            (
                LecternError::Extraction("no rating".to_string()),
                "Extraction error: no rating",
            ),
            (
                LecternError::Embedding("401".to_string()),
                "Embedding error: 401",
            ),
            (
                LecternError::Index("host unreachable".to_string()),
                "Index error: host unreachable",
            ),
            (
                LecternError::Generation("stream reset".to_string()),
                "Generation error: stream reset",
            ),
            (
                LecternError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
