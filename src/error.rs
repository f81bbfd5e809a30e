use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("invalid word span ({start}, {end}) for {word_count} aligned words")]
    InvalidSpan {
        start: i64,
        end: i64,
        word_count: usize,
    },
    #[error("shape mismatch in {context}: expected {expected}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        actual: Vec<usize>,
    },
    #[error("reconstruction range error: {message}")]
    ReconstructionRange { message: String },
}

impl EditError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    /// Wraps an opaque failure (candle, codec, model) with the stage it came from.
    pub fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_span(start: i64, end: i64, word_count: usize) -> Self {
        Self::InvalidSpan {
            start,
            end,
            word_count,
        }
    }

    pub(crate) fn shape_mismatch(
        context: &'static str,
        expected: impl Into<String>,
        actual: &[usize],
    ) -> Self {
        Self::ShapeMismatch {
            context,
            expected: expected.into(),
            actual: actual.to_vec(),
        }
    }

    pub(crate) fn reconstruction_range(message: impl Into<String>) -> Self {
        Self::ReconstructionRange {
            message: message.into(),
        }
    }
}
