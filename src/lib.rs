//! # Sortable ULIDs
//!
//! This crate implements ULIDs (Universally Unique Lexicographically Sortable Identifiers):
//! 128-bit values made of a 48-bit millisecond timestamp followed by 80 bits of entropy.
//! A ULID is either 16 raw bytes (big endian) or a 26 character string in Crockford's
//! base 32, and both representations sort the same way.
//!
//! ## Creating ULIDs
//!
//! A single ULID is built from a timestamp and an [`EntropySource`]:
//!
//! ```
//! use sortid::{Ulid, ZeroEntropy};
//!
//! let u = Ulid::new(1_000_000_000_000, &mut ZeroEntropy).unwrap();
//!
//! // cspell:disable-next-line
//! assert_eq!(u.to_string(), "00X3AAA4000000000000000000");
//! ```
//!
//! Pure randomness cannot order ULIDs created within the same millisecond.
//! A [`Monotonic`] generator can: it increments the entropy of the previous ULID instead.
//!
//! ```
//! # #[cfg(feature = "rand")]
//! # {
//! use rand::rngs::OsRng;
//! use sortid::Monotonic;
//!
//! let mut generator = Monotonic::new(OsRng);
//!
//! let u1 = generator.generate(1_000_000_000_000).unwrap();
//! let u2 = generator.generate(1_000_000_000_000).unwrap();
//!
//! assert!(u1 < u2);
//! # }
//! ```
//!
//! With the `rand` feature, [`Ulid::generate()`] uses a process-wide, thread-safe
//! monotonic generator with the system clock:
//!
//! ```
//! # #[cfg(feature = "rand")]
//! # {
//! use sortid::Ulid;
//!
//! let u = Ulid::generate();
//!
//! println!("Generated ULID: {u}");
//! # }
//! ```
//!
//! ## Parsing ULIDs from Strings
//!
//! [`Ulid`] implements [`std::str::FromStr`], which decodes leniently: letters may be in any case,
//! and `O` is read as `0`, `I` and `L` as `1`. Use [`Ulid::parse()`] with [`Mode::Strict`]
//! to accept the canonical alphabet only.
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use sortid::{Mode, Ulid};
//!
//! // cspell:disable-next-line
//! let u1: Ulid = "01JB5C84ZBM8QVBE5QRZW6HY89".parse()?;
//! // cspell:disable-next-line
//! let u2 = Ulid::parse("01jb5c84zbm8qvbe5qrzw6hy89", Mode::Strict)?;
//!
//! assert_eq!(u1, u2);
//! # Ok(()) }
//! ```
//!
//! ## Feature Flags
//!
//! - **`rand`**: Entropy sources from the `rand` crate and [`Ulid::generate()`], enabled by default.
//! - **`serde`**: Serialization and deserialization via `Serde`, optional.
//! - **`tracing`**: Trace level spans and debug events for the generators, optional.
//!

mod base32;
mod entropy;
mod error;
mod generator;
mod monotonic;
#[cfg(feature = "serde")]
mod serde;
mod ulid;
mod util;

use std::{borrow::Cow, time::SystemTime};

pub use base32::Mode;
pub use entropy::{EntropySource, ReaderEntropy, ZeroEntropy};
pub use error::{Error, GenerateError};
pub use monotonic::{Monotonic, SyncMonotonic};
pub use ulid::Ulid;

const ENTROPY_BYTES: usize = 10;

const RANDOM_BITS: u32 = 80;
const RANDOM_MASK: u128 = (1 << RANDOM_BITS) - 1;

const TIMESTAMP_BITS: u32 = 48;

/// Largest timestamp a ULID can hold, in milliseconds since the Unix epoch (year 10889).
pub const TIMESTAMP_MAX: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Converts a [`SystemTime`] into a ULID timestamp (milliseconds since the Unix epoch).
///
/// # Errors
///
/// Fails with [`Error::TimestampOutOfRange`] for times before the Unix epoch or
/// after [`TIMESTAMP_MAX`].
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
///
/// assert_eq!(sortid::timestamp(time), Ok(1_000_000_000_000));
/// ```
pub fn timestamp(time: SystemTime) -> Result<u64, Error> {
    util::to_millis(time)
}

/// Canonicalizes a ULID string by converting it to a standard format.
///
/// Takes a ULID string and returns the canonicalized version:
/// Letters 'i', 'l', and 'o' are replaced by their corresponding digits '1' and `0`,
/// and all characters are converted into uppercase.
///
/// If the input is already in canonical form, it returns a borrowed version of the input string
/// without allocating a new `String`.
///
/// # Errors
///
/// The string must be a valid ULID in [`Mode::Lenient`]. It must have the correct length (26),
/// contain only valid characters, and not overflow. If not, an error is returned.
///
/// # Example
///
/// ```
// cspell:disable-next-line
/// let s = "olixjazthsfjzt7wd6j8ir92vn";
///
// cspell:disable-next-line
/// assert_eq!(sortid::canonicalize(s), Ok("011XJAZTHSFJZT7WD6J81R92VN".into()));
/// ```
pub fn canonicalize(ulid: &str) -> Result<Cow<'_, str>, Error> {
    let mut buffer = *util::as_array(ulid.as_bytes())?;
    let cleaned = base32::canonicalize(&mut buffer)?;

    if cleaned == ulid {
        Ok(ulid.into())
    } else {
        Ok(cleaned.to_string().into())
    }
}

/// Checks a ULID string for validity in the given [`Mode`].
///
/// To be valid, a ULID must have the correct length (26), contain only characters
/// allowed by the mode, and not overflow 128 bits.
///
/// # Errors
///
/// If the ULID string is not valid, an appropriate error is returned.
///
/// # Example
///
/// ```
/// use sortid::{Error, Mode};
///
// cspell:disable-next-line
/// assert!(sortid::validate("olixjazthsfjzt7wd6j8ir92vn", Mode::Lenient).is_ok());
// cspell:disable-next-line
/// assert_eq!(sortid::validate("olixjazthsfjzt7wd6j8ir92vn", Mode::Strict), Err(Error::InvalidChar));
///
/// assert!(sortid::validate("7FFFFFFFFFFFFFFFFFFFFFFFFF", Mode::Strict).is_ok());
/// assert_eq!(sortid::validate("80000000000000000000000000", Mode::Strict), Err(Error::ValueOverflow));
///
/// assert_eq!(sortid::validate("0000000000000000000000u89$", Mode::Lenient), Err(Error::InvalidChar));
/// assert_eq!(sortid::validate("xxxxxxxxxxxxxxxxxxxxxx", Mode::Lenient), Err(Error::InvalidLength));
/// ```
pub fn validate(ulid: &str, mode: Mode) -> Result<(), Error> {
    let buffer = util::as_array(ulid.as_bytes())?;
    base32::validate(buffer, mode)
}

#[cfg(test)]
mod tests;
