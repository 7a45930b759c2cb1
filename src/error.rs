use std::fmt;

/// Errors that can occur when creating or manipulating ULIDs.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Error {
    /// The given timestamp does not fit into 48 bits.
    TimestampOutOfRange,
    /// The ULID string is not exactly 26 characters, or the binary ULID is not exactly 16 bytes.
    InvalidLength,
    /// The ULID string contains an invalid character.
    InvalidChar,
    /// The ULID string encodes a value larger than 128 bits.
    ValueOverflow,
    /// The given entropy is not exactly 10 bytes.
    InvalidEntropyLength,
    /// Incrementing the entropy of the previous ULID overflowed 80 bits.
    EntropyOverflow,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    /// Formats the error message for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match *self {
            Self::TimestampOutOfRange => "timestamp is too large",
            Self::InvalidLength => "invalid length",
            Self::InvalidChar => "string contains an invalid character",
            Self::ValueOverflow => "value exceeds 128 bits",
            Self::InvalidEntropyLength => "entropy must be exactly 10 bytes",
            Self::EntropyOverflow => "entropy overflowed while incrementing it",
        };
        write!(f, "{message}")
    }
}

/// Errors that can occur when generating ULIDs from an [`EntropySource`](crate::EntropySource).
///
/// The error of the entropy source is passed through untouched as [`GenerateError::Entropy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError<E> {
    /// The ULID could not be built.
    Ulid(Error),
    /// The entropy source failed to deliver the requested bytes.
    Entropy(E),
}

impl<E> From<Error> for GenerateError<E> {
    fn from(err: Error) -> Self {
        Self::Ulid(err)
    }
}

impl<E: fmt::Display> fmt::Display for GenerateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ulid(err) => write!(f, "{err}"),
            Self::Entropy(err) => write!(f, "entropy source failed: {err}"),
        }
    }
}

impl<E> std::error::Error for GenerateError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ulid(err) => Some(err),
            Self::Entropy(err) => Some(err),
        }
    }
}
