/// Convenience result type used across luxfade.
pub type LuxResult<T> = Result<T, LuxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal for the evaluation that raised it: at most one is
/// produced per evaluation and the channel's prior state is left untouched.
/// Recoverable problems (a bad attribute field, a dropped fade entry) are
/// reported through [`crate::Diagnostics`] instead.
#[derive(thiserror::Error, Debug)]
pub enum LuxError {
    /// Missing or invalid location on the input record.
    #[error("location error: {0}")]
    Location(String),

    /// Missing/non-array fade list, or fewer than two valid entries.
    #[error("fades error: {0}")]
    Fades(String),

    /// The selected interpolation window is inverted (before > after).
    #[error("window error: {0}")]
    Window(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LuxError {
    /// Build a [`LuxError::Location`] value.
    pub fn location(msg: impl Into<String>) -> Self {
        Self::Location(msg.into())
    }

    /// Build a [`LuxError::Fades`] value.
    pub fn fades(msg: impl Into<String>) -> Self {
        Self::Fades(msg.into())
    }

    /// Build a [`LuxError::Window`] value.
    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }

    /// Build a [`LuxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
