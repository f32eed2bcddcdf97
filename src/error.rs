use thiserror::Error;

/// Failure classes of the analysis pipeline. Everything upstream of
/// enrichment is terminal for the request; enrichment failures never
/// reach this enum (they fall back to the heuristic tier).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("vision request timed out")]
    InferenceTimeout,

    #[error("vision provider returned HTTP {status}")]
    InferenceUpstream { status: u16, body: String },

    #[error("vision request failed: {0}")]
    InferenceTransport(String),

    #[error("could not recognize a dish in the model reply")]
    UnrecognizedDish { raw: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AnalysisError {
    /// HTTP status the API boundary reports for this class.
    pub fn http_status(&self) -> u16 {
        match self {
            AnalysisError::InvalidImage(_) => 400,
            AnalysisError::UnrecognizedDish { .. } => 422,
            AnalysisError::InferenceTimeout => 504,
            AnalysisError::InferenceUpstream { .. }
            | AnalysisError::InferenceTransport(_)
            | AnalysisError::Internal(_) => 500,
        }
    }

    /// Diagnostic detail safe to surface to the caller. The raw model
    /// reply is preserved for unrecognized dishes; provider bodies are
    /// passed through (they never contain our credential).
    pub fn debug_detail(&self) -> Option<String> {
        match self {
            AnalysisError::UnrecognizedDish { raw } => Some(raw.clone()),
            AnalysisError::InferenceUpstream { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AnalysisError::InvalidImage("empty".into()).http_status(), 400);
        assert_eq!(
            AnalysisError::UnrecognizedDish { raw: "hm".into() }.http_status(),
            422
        );
        assert_eq!(AnalysisError::InferenceTimeout.http_status(), 504);
        assert_eq!(
            AnalysisError::InferenceUpstream { status: 429, body: String::new() }.http_status(),
            500
        );
    }

    #[test]
    fn test_raw_reply_is_preserved() {
        let err = AnalysisError::UnrecognizedDish {
            raw: "the model rambled".into(),
        };
        assert_eq!(err.debug_detail().unwrap(), "the model rambled");
    }
}
