//! Timetable transform error types.

/// Errors raised while flattening a timetable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// A required caller-supplied input was absent
    #[error("{0} must be provided")]
    MissingInput(&'static str),

    /// A journey's hour or minute is not an integer, or is too large to
    /// express in minutes since midnight
    #[error("invalid {field}: {value}")]
    InvalidTimeComponent { field: &'static str, value: String },

    /// A value is present but has the wrong JSON type
    #[error("unexpected shape at {path}: expected {expected}")]
    UnexpectedShape { path: String, expected: &'static str },
}

impl TransformError {
    /// Prefix the path of an [`TransformError::UnexpectedShape`] with the
    /// location of the value it was found under.
    pub(crate) fn within(self, prefix: &str) -> Self {
        match self {
            TransformError::UnexpectedShape { path, expected } => {
                let path = match (prefix.is_empty(), path.is_empty()) {
                    (true, _) => path,
                    (false, true) => prefix.to_string(),
                    (false, false) => format!("{prefix}.{path}"),
                };
                TransformError::UnexpectedShape { path, expected }
            }
            other => other,
        }
    }
}
