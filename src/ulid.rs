use std::{
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

use crate::{
    base32, generator, util, EntropySource, Error, GenerateError, Mode, ENTROPY_BYTES, RANDOM_BITS, RANDOM_MASK,
    TIMESTAMP_MAX,
};

/// A ULID: a 48-bit millisecond timestamp followed by 80 bits of entropy.
///
/// A `Ulid` is exactly 16 bytes in network byte order (big endian). Every 16 byte
/// sequence is a valid `Ulid`, including zero.
///
/// Ordering of `Ulid`s is the unsigned byte-wise ordering of their binary form, which is
/// the same as ordering them by timestamp first and entropy second, and the same as the
/// lexical ordering of their string representations.
///
/// # Example
///
/// ```
/// use sortid::{Ulid, ZeroEntropy};
///
/// let u1 = Ulid::new(1_000_000_000_000, &mut ZeroEntropy).unwrap();
/// let u2 = Ulid::new(1_000_000_000_001, &mut ZeroEntropy).unwrap();
///
/// assert!(u1 < u2);
/// assert!(u1.to_bytes() < u2.to_bytes());
/// assert!(u1.to_string() < u2.to_string());
/// ```
#[derive(Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Ulid(u128);

impl Ulid {
    /// Smallest possible [`Ulid`], all bits zero.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// assert_eq!(Ulid::MIN.to_string(), "00000000000000000000000000");
    /// ```
    pub const MIN: Self = Self(0);

    /// Largest possible [`Ulid`], all bits set.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// assert_eq!(Ulid::MAX.to_string(), "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
    /// ```
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Ulid` from a timestamp and an entropy source.
    ///
    /// The timestamp is measured in milliseconds since the Unix epoch and must fit into 48 bits.
    /// Exactly 10 bytes are requested from the entropy source.
    ///
    /// This method is stateless. Two calls within the same millisecond are *not* ordered by
    /// call order; use a [`Monotonic`](crate::Monotonic) generator for that.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOutOfRange`] if the timestamp is larger than 2<sup>48</sup> - 1.
    /// - [`GenerateError::Entropy`] with the unmodified error of the entropy source.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::{Error, GenerateError, Ulid, ZeroEntropy};
    ///
    /// let u = Ulid::new(1_000_000_000_000, &mut ZeroEntropy)?;
    ///
    /// assert_eq!(u.to_bytes(), [0x00, 0xE8, 0xD4, 0xA5, 0x10, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    ///
    /// assert_eq!(
    ///     Ulid::new(1 << 48, &mut ZeroEntropy),
    ///     Err(GenerateError::Ulid(Error::TimestampOutOfRange))
    /// );
    /// # Ok::<(), GenerateError<std::convert::Infallible>>(())
    /// ```
    pub fn new<S>(timestamp: u64, entropy: &mut S) -> Result<Self, GenerateError<S::Error>>
    where
        S: EntropySource + ?Sized,
    {
        generator::new(timestamp, entropy)
    }

    /// Creates a new `Ulid` from the current system time and an entropy source.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TimestampOutOfRange`] if the system clock is before the Unix epoch
    /// or after the year 10889, or with the error of the entropy source.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::{Ulid, ZeroEntropy};
    ///
    /// let u = Ulid::now(&mut ZeroEntropy).unwrap();
    ///
    /// assert!(u.timestamp() > 1704067200000); // 1st January 2024
    /// ```
    pub fn now<S>(entropy: &mut S) -> Result<Self, GenerateError<S::Error>>
    where
        S: EntropySource + ?Sized,
    {
        generator::new(util::to_millis(SystemTime::now())?, entropy)
    }

    /// Generates a new unique `Ulid` with the process-wide monotonic generator.
    ///
    /// The generated `Ulid`s are strictly monotonically increasing across all threads,
    /// as long as the system clock does not go backwards (see [`Monotonic`](crate::Monotonic)).
    /// Entropy is taken from a [`StdRng`](rand::rngs::StdRng) seeded by the operating system.
    ///
    /// # Panics
    ///
    /// Panics if the system clock is before the Unix epoch or after the year 10889,
    /// if the operating system cannot provide a seed, or if more than 2<sup>80</sup>
    /// `Ulid`s are requested within a single millisecond.
    /// See [`Ulid::try_generate()`] for a variant which never panics.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// let u1 = Ulid::generate();
    /// let u2 = Ulid::generate();
    ///
    /// assert!(u1 < u2);
    /// assert!(u1.timestamp() <= u2.timestamp());
    /// ```
    #[cfg(feature = "rand")]
    #[must_use]
    pub fn generate() -> Self {
        crate::monotonic::generate().unwrap()
    }

    /// Generates a new unique `Ulid` with the process-wide monotonic generator and never panics.
    ///
    /// This is a variant of [`Ulid::generate()`] returning `None` if generation fails.
    ///
    /// # Example
    ///
    /// ```
    /// # { inner(); fn inner() -> Option<()> {
    /// use sortid::Ulid;
    ///
    /// let u1 = Ulid::try_generate()?;
    /// let u2 = Ulid::try_generate()?;
    ///
    /// assert!(u1 < u2);
    /// # Some(()) }}
    /// ```
    #[cfg(feature = "rand")]
    #[must_use]
    pub fn try_generate() -> Option<Self> {
        crate::monotonic::generate().ok()
    }

    /// Returns the `Ulid` with value zero.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// assert!(Ulid::nil().is_nil());
    /// assert_eq!(Ulid::nil(), Ulid::default());
    /// ```
    #[must_use]
    pub const fn nil() -> Self {
        Self(0)
    }

    /// Tests if a `Ulid` is zero.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }

    /// Returns the timestamp part of a `Ulid`.
    ///
    /// The timestamp is measured in milliseconds since the Unix epoch (1. January 1970).
    /// ULID timestamps are limited to 48 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// // cspell:disable-next-line
    /// let u: Ulid = "00X3AAA4000000000000000000".parse().unwrap();
    ///
    /// assert_eq!(u.timestamp(), 1_000_000_000_000);
    /// ```
    #[must_use]
    pub const fn timestamp(self) -> u64 {
        (self.0 >> RANDOM_BITS) as u64
    }

    /// Replaces the timestamp part of a `Ulid`, keeping the entropy.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TimestampOutOfRange`] if the timestamp is larger than 2<sup>48</sup> - 1.
    /// The `Ulid` is left unchanged then.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::{Error, Ulid};
    ///
    /// let mut u = Ulid::nil();
    ///
    /// assert_eq!(u.set_timestamp(42), Ok(()));
    /// assert_eq!(u.timestamp(), 42);
    ///
    /// assert_eq!(u.set_timestamp(1 << 48), Err(Error::TimestampOutOfRange));
    /// assert_eq!(u.timestamp(), 42);
    /// ```
    pub fn set_timestamp(&mut self, timestamp: u64) -> Result<(), Error> {
        if timestamp > TIMESTAMP_MAX {
            return Err(Error::TimestampOutOfRange);
        }
        self.0 = (u128::from(timestamp) << RANDOM_BITS) | (self.0 & RANDOM_MASK);
        Ok(())
    }

    /// Returns the entropy part of a `Ulid` as 10 bytes in network byte order.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// let u = Ulid::from_u128(0xFF_0102);
    ///
    /// assert_eq!(u.entropy(), [0, 0, 0, 0, 0, 0, 0, 0xFF, 0x01, 0x02]);
    /// ```
    #[must_use]
    pub const fn entropy(self) -> [u8; ENTROPY_BYTES] {
        let bytes = self.0.to_be_bytes();
        let mut entropy = [0; ENTROPY_BYTES];
        let mut i = 0;
        while i < ENTROPY_BYTES {
            entropy[i] = bytes[16 - ENTROPY_BYTES + i];
            i += 1;
        }
        entropy
    }

    /// Replaces the entropy part of a `Ulid`, keeping the timestamp.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidEntropyLength`] unless exactly 10 bytes are given.
    /// The `Ulid` is left unchanged then.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::{Error, Ulid};
    ///
    /// let mut u = Ulid::nil();
    ///
    /// assert_eq!(u.set_entropy(&[0xAB; 10]), Ok(()));
    /// assert_eq!(u.entropy(), [0xAB; 10]);
    ///
    /// assert_eq!(u.set_entropy(&[0xCD; 9]), Err(Error::InvalidEntropyLength));
    /// assert_eq!(u.entropy(), [0xAB; 10]);
    /// ```
    pub fn set_entropy(&mut self, entropy: &[u8]) -> Result<(), Error> {
        let entropy: &[u8; ENTROPY_BYTES] = entropy.try_into().or(Err(Error::InvalidEntropyLength))?;

        let mut bytes = [0; 16];
        bytes[16 - ENTROPY_BYTES..].copy_from_slice(entropy);

        self.0 = (self.0 & !RANDOM_MASK) | u128::from_be_bytes(bytes);
        Ok(())
    }

    /// Returns the timestamp part of a `Ulid` as a `SystemTime`.
    ///
    /// # Panics
    ///
    /// In Rust the allowed range for [`SystemTime`] is not defined.
    /// So this method may panic if the timestamp of the `Ulid` cannot represented with [`SystemTime`].
    /// On most common systems that will not happen.
    ///
    /// For a variant which never panics, see [`Ulid::try_datetime`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    /// use sortid::Ulid;
    ///
    /// // cspell:disable-next-line
    /// let u: Ulid = "00X3AAA4000000000000000000".parse().unwrap();
    ///
    /// assert_eq!(u.datetime(), SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000));
    /// ```
    #[must_use]
    pub fn datetime(self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(self.timestamp())
    }

    /// Returns the timestamp part of a `Ulid` as a [`SystemTime`] and never panics.
    ///
    /// In the case that the timestamp cannot be represented as a [`SystemTime`], this method returns `None`.
    #[must_use]
    pub fn try_datetime(self) -> Option<SystemTime> {
        util::from_millis(self.timestamp())
    }

    /// Converts a `Ulid` into binary bytes
    ///
    /// The bytes are in network byte order (big endian).
    ///
    /// # Example
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use sortid::Ulid;
    ///
    // cspell:disable-next-line
    /// let u: Ulid = "01JB05JV6H9ZA2YQ6X3K1DAGVA".parse()?;
    ///
    /// assert_eq!(u.to_bytes(), [1, 146, 192, 89, 108, 209, 79, 212, 47, 92, 221, 28, 194, 213, 67, 106]);
    /// # Ok(()) }
    /// ```
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Creates a `Ulid` from a binary byte array.
    ///
    /// The byte array must be in network byte order (big endian). Any 16 bytes are a valid `Ulid`.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// let bytes: [u8; 16] = [1, 146, 192, 89, 108, 209, 79, 212, 47, 92, 221, 28, 194, 213, 67, 106];
    /// let u = Ulid::from_bytes(bytes);
    ///
    // cspell:disable-next-line
    /// assert_eq!(u.to_string(), "01JB05JV6H9ZA2YQ6X3K1DAGVA");
    /// ```
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }

    /// Converts a `Ulid` into a `u128` integer.
    #[must_use]
    pub const fn to_u128(self) -> u128 {
        self.0
    }

    /// Creates a `Ulid` from a `u128` integer.
    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(n)
    }

    /// Parses a `Ulid` from its 26 character string representation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] if the string is not exactly 26 bytes long. Length is measured
    ///   in UTF-8 bytes, so a non-ASCII character counts more than once.
    /// - [`Error::InvalidChar`] if a character is not allowed in the given [`Mode`].
    /// - [`Error::ValueOverflow`] if the first character is larger than `7`.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::{Error, Mode, Ulid};
    ///
    /// // cspell:disable-next-line
    /// let lenient = Ulid::parse("0lixjazthsfjzt7wd6j8ir92vn", Mode::Lenient);
    /// // cspell:disable-next-line
    /// let strict = Ulid::parse("011XJAZTHSFJZT7WD6J81R92VN", Mode::Strict);
    ///
    /// assert_eq!(lenient, strict);
    ///
    /// assert_eq!(Ulid::parse("80000000000000000000000000", Mode::Strict), Err(Error::ValueOverflow));
    /// assert_eq!(Ulid::parse("0000000000000000000000000", Mode::Strict), Err(Error::InvalidLength));
    /// ```
    pub fn parse(s: &str, mode: Mode) -> Result<Self, Error> {
        let buffer = util::as_array(s.as_bytes())?;
        Ok(Self(base32::decode(buffer, mode)?))
    }

    /// Parses a `Ulid` in [`Mode::Strict`].
    ///
    /// # Errors
    ///
    /// See [`Ulid::parse()`].
    pub fn parse_strict(s: &str) -> Result<Self, Error> {
        Self::parse(s, Mode::Strict)
    }

    /// Encodes a `Ulid` into a caller supplied buffer, without allocating.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::Ulid;
    ///
    /// let mut buffer = [0; 26];
    ///
    /// assert_eq!(Ulid::from_u128(1).encode(&mut buffer), "00000000000000000000000001");
    /// ```
    pub fn encode(self, buffer: &mut [u8; 26]) -> &str {
        base32::encode(self.0, buffer)
    }

    /// Return the string representation of a `Ulid` and never panics.
    ///
    /// While the blanket implementation of [`std::string::ToString`] for `std::fmt::Display` may
    /// panic, this method is guaranteed to never panic, but returns `None` if the string representation cannot be created.
    /// One reason this can happen is if the allocation of memory for the string fails.
    #[must_use]
    pub fn try_to_string(self) -> Option<String> {
        util::try_to_string(self.0)
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        util::debug_ulid("Ulid", self.0, f)
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0; 26];
        f.write_str(base32::encode(self.0, &mut buffer))
    }
}

impl FromStr for Ulid {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Mode::Lenient)
    }
}

impl From<Ulid> for u128 {
    fn from(ulid: Ulid) -> Self {
        ulid.to_u128()
    }
}

impl From<u128> for Ulid {
    fn from(n: u128) -> Self {
        Self::from_u128(n)
    }
}

impl From<Ulid> for [u8; 16] {
    fn from(ulid: Ulid) -> Self {
        ulid.to_bytes()
    }
}

impl From<[u8; 16]> for Ulid {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8; 16]> for Ulid {
    fn from(bytes: &[u8; 16]) -> Self {
        Self::from_bytes(*bytes)
    }
}

impl TryFrom<&[u8]> for Ulid {
    type Error = Error;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self::from_bytes(*util::as_array(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let mut u = Ulid::nil();
        u.set_timestamp(0x0102_0304_0506).unwrap();
        u.set_entropy(&[0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10]).unwrap();

        assert_eq!(u.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(u.timestamp(), 0x0102_0304_0506);
        assert_eq!(u.entropy(), [7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
    }

    #[test]
    fn test_setters_keep_other_field() {
        let mut u = Ulid::MAX;

        u.set_timestamp(0).unwrap();
        assert_eq!(u.entropy(), [0xFF; 10]);

        u.set_entropy(&[0; 10]).unwrap();
        assert_eq!(u.timestamp(), 0);
        assert!(u.is_nil());

        u.set_timestamp(TIMESTAMP_MAX).unwrap();
        assert_eq!(u.to_bytes(), [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_set_entropy_length() {
        let mut u = Ulid::nil();
        assert_eq!(u.set_entropy(&[]), Err(Error::InvalidEntropyLength));
        assert_eq!(u.set_entropy(&[1; 11]), Err(Error::InvalidEntropyLength));
        assert!(u.is_nil());
    }

    #[test]
    fn test_ordering_matches_bytes() {
        let values = [
            Ulid::nil(),
            Ulid::from_u128(1),
            Ulid::from_u128(0xFF),
            Ulid::from_u128(0x100),
            Ulid::from_u128(1 << RANDOM_BITS),
            Ulid::from_u128(u128::MAX - 1),
            Ulid::MAX,
        ];

        for a in values {
            for b in values {
                assert_eq!(a.cmp(&b), a.to_bytes().cmp(&b.to_bytes()));
                assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
            }
        }
    }

    #[test]
    fn test_try_from_slice() {
        let bytes = [0xAB; 16];
        assert_eq!(Ulid::try_from(&bytes[..]), Ok(Ulid::from_bytes(bytes)));
        assert_eq!(Ulid::try_from(&bytes[..15]), Err(Error::InvalidLength));
    }
}
