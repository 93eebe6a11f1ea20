use thiserror::Error;

/// Result alias for the pure decoding functions.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failures raised while turning a [`RawObservation`](crate::RawObservation) into a snapshot.
///
/// The individual decoders never fail; only `normalize` does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("observation time {0} is out of range for a UTC timestamp")]
    InvalidTimestamp(i64),
}
