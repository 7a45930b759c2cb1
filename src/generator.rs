#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{EntropySource, Error, GenerateError, Ulid, ENTROPY_BYTES, TIMESTAMP_MAX};

/// Builds a ULID from a timestamp and exactly 10 bytes of the entropy source.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(entropy)))]
pub fn new<S>(timestamp: u64, entropy: &mut S) -> Result<Ulid, GenerateError<S::Error>>
where
    S: EntropySource + ?Sized,
{
    if timestamp > TIMESTAMP_MAX {
        return Err(Error::TimestampOutOfRange.into());
    }

    let mut bytes = [0; 16];
    let (timestamp_bytes, entropy_bytes) = bytes.split_at_mut(16 - ENTROPY_BYTES);

    timestamp_bytes.copy_from_slice(&timestamp.to_be_bytes()[8 - (16 - ENTROPY_BYTES)..]);
    entropy.fill_entropy(entropy_bytes).map_err(GenerateError::Entropy)?;

    Ok(Ulid::from_bytes(bytes))
}

/// Increments a big endian unsigned integer of arbitrary width by one.
///
/// On overflow `bytes` is left untouched and [`Error::EntropyOverflow`] is returned.
pub fn increment_be(bytes: &mut [u8]) -> Result<(), Error> {
    match bytes.iter().rposition(|&byte| byte != u8::MAX) {
        Some(pos) => {
            bytes[pos] += 1;
            bytes[pos + 1..].fill(0);
            Ok(())
        }
        None => Err(Error::EntropyOverflow),
    }
}
