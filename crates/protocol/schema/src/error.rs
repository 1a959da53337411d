use thiserror::Error;

/// An untrusted payload failed structural validation.
///
/// Decoders never coerce or default a field that fails validation, so any
/// [`SchemaError`] means the whole payload was rejected.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The payload was `null` where a value was required.
    #[error("expected {shape}, got null")]
    Null {
        /// The payload shape that was expected.
        shape: &'static str,
    },

    /// The payload did not deserialize into the expected shape.
    #[error("malformed {shape}: {source}")]
    Malformed {
        /// The payload shape that was expected.
        shape: &'static str,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The payload was well-formed but a field disagrees with what was requested.
    #[error("{shape} mismatch on {field}: expected {expected}, got {actual}")]
    Mismatch {
        /// The payload shape.
        shape: &'static str,
        /// The field that disagrees.
        field: &'static str,
        /// The expected value.
        expected: String,
        /// The value found in the payload.
        actual: String,
    },

    /// The payload was well-formed but violates a semantic rule of its shape.
    #[error("invalid {shape}: {reason}")]
    Invalid {
        /// The payload shape.
        shape: &'static str,
        /// Why the payload was rejected.
        reason: String,
    },
}

impl SchemaError {
    pub(crate) const fn malformed(shape: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { shape, source }
    }

    pub(crate) fn invalid(shape: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { shape, reason: reason.into() }
    }

    /// Returns the name of the payload shape that failed validation.
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Null { shape } |
            Self::Malformed { shape, .. } |
            Self::Mismatch { shape, .. } |
            Self::Invalid { shape, .. } => shape,
        }
    }
}
