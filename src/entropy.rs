use std::{convert::Infallible, io};

/// Trait for entropy sources.
///
/// An entropy source fills a buffer with random (or, for testing, predictable) bytes.
/// Errors of the source are passed to the caller unmodified, wrapped in
/// [`GenerateError::Entropy`](crate::GenerateError::Entropy). The source is never retried.
///
/// With the `rand` feature enabled, every [`rand::RngCore`] is an entropy source,
/// e.g. [`OsRng`](rand::rngs::OsRng) for cryptographic entropy or a seeded
/// [`StdRng`](rand::rngs::StdRng) for reproducible sequences.
///
/// # Example
///
/// ```
/// use sortid::{EntropySource, Ulid};
///
/// struct Counter(u8);
///
/// impl EntropySource for Counter {
///     type Error = std::convert::Infallible;
///
///     fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
///         self.0 += 1;
///         dest.fill(self.0);
///         Ok(())
///     }
/// }
///
/// let u = Ulid::new(0, &mut Counter(0)).unwrap();
///
/// assert_eq!(u.entropy(), [1; 10]);
/// ```
pub trait EntropySource {
    /// Error returned when the source cannot fill the buffer.
    type Error;

    /// Fills the entire buffer with entropy.
    ///
    /// # Errors
    ///
    /// Implementations fail if they cannot provide `dest.len()` bytes.
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error>;
}

impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    type Error = S::Error;

    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
        (**self).fill_entropy(dest)
    }
}

#[cfg(feature = "rand")]
impl EntropySource for rand::rngs::StdRng {
    type Error = rand::Error;

    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
        rand::RngCore::try_fill_bytes(self, dest)
    }
}

#[cfg(feature = "rand")]
impl EntropySource for rand::rngs::OsRng {
    type Error = rand::Error;

    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
        rand::RngCore::try_fill_bytes(self, dest)
    }
}

#[cfg(feature = "rand")]
impl EntropySource for rand::rngs::ThreadRng {
    type Error = rand::Error;

    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
        rand::RngCore::try_fill_bytes(self, dest)
    }
}

/// Entropy source which always delivers zero bytes.
///
/// Useful for tests and for reproducible output.
///
/// # Example
///
/// ```
/// use sortid::{Ulid, ZeroEntropy};
///
/// // cspell:disable-next-line
/// assert_eq!(Ulid::new(1_000_000_000_000, &mut ZeroEntropy).unwrap().to_string(), "00X3AAA4000000000000000000");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroEntropy;

impl EntropySource for ZeroEntropy {
    type Error = Infallible;

    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
        dest.fill(0);
        Ok(())
    }
}

/// Entropy source reading bytes from any [`io::Read`].
///
/// A reader that runs dry before the buffer is full fails with
/// [`io::ErrorKind::UnexpectedEof`].
///
/// # Example
///
/// ```
/// use sortid::{GenerateError, ReaderEntropy, Ulid};
///
/// let mut source = ReaderEntropy::new(&[7_u8; 15][..]);
///
/// assert_eq!(Ulid::new(0, &mut source).unwrap().entropy(), [7; 10]);
///
/// // Only 5 bytes left
/// assert!(matches!(Ulid::new(0, &mut source), Err(GenerateError::Entropy(_))));
/// ```
#[derive(Debug, Clone)]
pub struct ReaderEntropy<R> {
    reader: R,
}

impl<R: io::Read> ReaderEntropy<R> {
    /// Wraps a reader as entropy source.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Unwraps the underlying reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: io::Read> EntropySource for ReaderEntropy<R> {
    type Error = io::Error;

    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
        self.reader.read_exact(dest)
    }
}
