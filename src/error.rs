use thiserror::Error;

/// Why an upstream lookup produced nothing usable.
///
/// Resolvers collapse all of these to `None` for their callers; the variants
/// exist so the swallowed failure can still be told apart in the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("response is missing `{0}`")]
    Schema(&'static str),
}

impl FetchError {
    /// Short stable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Decode(_) => "decode",
            Self::Schema(_) => "schema",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(FetchError::Schema("daily").kind(), "schema");
        assert_eq!(
            FetchError::Status(reqwest::StatusCode::BAD_GATEWAY).kind(),
            "status"
        );
        assert_eq!(FetchError::Decode("eof".into()).kind(), "decode");
    }

    #[test]
    fn test_serde_error_is_decode() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_schema_message_names_section() {
        let err = FetchError::Schema("current_weather");
        assert_eq!(err.to_string(), "response is missing `current_weather`");
    }
}
