use std::error::Error;
use std::io;
use thiserror::Error;

/// Errors produced while building or invoking a streaming marshaller.
///
/// None of these are retryable: every variant describes a local contract violation,
/// and a request that hits one is never handed to the transport.
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("missing mandatory field: {field}")]
    MissingField { field: &'static str },

    #[error("content length is required but the request body does not declare one")]
    LengthRequired,

    #[error("delegate marshaller failed: {source}")]
    Delegate { source: Box<dyn Error + Send + Sync> },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl MarshalError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn delegate<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Delegate { source: e.into() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the error was raised while assembling the marshaller rather than
    /// while marshalling a request.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, MarshalError::MissingField { .. })
    }

    #[inline]
    pub fn is_length_required(&self) -> bool {
        matches!(self, MarshalError::LengthRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(MarshalError::missing_field("request_body").to_string(), "missing mandatory field: request_body");
        assert_eq!(
            MarshalError::LengthRequired.to_string(),
            "content length is required but the request body does not declare one"
        );
        assert_eq!(MarshalError::invalid_header("bad value").to_string(), "invalid header: bad value");
    }

    #[test]
    fn delegate_keeps_source() {
        let error = MarshalError::delegate("no bucket name");
        assert_eq!(error.to_string(), "delegate marshaller failed: no bucket name");
        assert!(error.source().is_some());
        assert!(!error.is_configuration());
    }

    #[test]
    fn classification() {
        assert!(MarshalError::missing_field("delegate_marshaller").is_configuration());
        assert!(MarshalError::LengthRequired.is_length_required());
        assert!(!MarshalError::io(io::Error::from(io::ErrorKind::NotFound)).is_length_required());
    }
}
