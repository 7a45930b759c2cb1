use std::{
    sync::{Mutex, MutexGuard},
    time::SystemTime,
};

#[cfg(feature = "rand")]
use rand::{
    rngs::{OsRng, StdRng},
    SeedableRng as _,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{self, increment_be},
    util, EntropySource, Error, GenerateError, Ulid,
};

/// A generator of strictly monotonically increasing ULIDs.
///
/// Whenever the requested timestamp is larger than the one of the previous ULID,
/// a fresh ULID is built from the entropy source. Otherwise the entropy of the previous
/// ULID is incremented by one, so ULIDs requested within the same millisecond are still
/// strictly ordered.
///
/// When the requested timestamp is *smaller* than the previous one (the clock went backwards),
/// the new ULID carries the smaller timestamp but the incremented entropy of the previous ULID.
/// Compared with each other, such ULIDs sort by their timestamp field, not by call order.
///
/// A `Monotonic` needs `&mut self` to generate. To share one generator between threads,
/// use [`SyncMonotonic`].
///
/// # Example
///
/// ```
/// use sortid::{Monotonic, ZeroEntropy};
///
/// let mut generator = Monotonic::new(ZeroEntropy);
///
/// let u1 = generator.generate(1_000)?;
/// let u2 = generator.generate(1_000)?;
/// let u3 = generator.generate(1_001)?;
///
/// assert!(u1 < u2 && u2 < u3);
/// assert_eq!(u2.entropy(), [0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
/// # Ok::<(), sortid::GenerateError<std::convert::Infallible>>(())
/// ```
#[derive(Debug)]
pub struct Monotonic<S> {
    entropy: S,
    last: Option<Ulid>,
}

impl<S: EntropySource> Monotonic<S> {
    /// Creates a new generator which has not generated any ULID yet.
    #[must_use]
    pub const fn new(entropy: S) -> Self {
        Self { entropy, last: None }
    }

    /// Generates the next ULID for the given timestamp (milliseconds since the Unix epoch).
    ///
    /// On error, the state of the generator is not changed.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOutOfRange`] if the timestamp is larger than 2<sup>48</sup> - 1.
    /// - [`Error::EntropyOverflow`] if the entropy of the previous ULID is already all ones
    ///   and the timestamp did not advance.
    /// - [`GenerateError::Entropy`] if the entropy source fails.
    ///
    /// # Example
    ///
    /// ```
    /// use sortid::{Error, GenerateError, Monotonic, ZeroEntropy};
    ///
    /// let mut generator = Monotonic::new(ZeroEntropy);
    ///
    /// assert_eq!(
    ///     generator.generate(1 << 48),
    ///     Err(GenerateError::Ulid(Error::TimestampOutOfRange))
    /// );
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&mut self, timestamp: u64) -> Result<Ulid, GenerateError<S::Error>> {
        let ulid = match self.last {
            Some(last) if timestamp <= last.timestamp() => {
                #[cfg(feature = "tracing")]
                if timestamp < last.timestamp() {
                    tracing::debug!(timestamp, last = last.timestamp(), "clock went backwards");
                }
                Self::successor(last, timestamp)?
            }
            _ => generator::new(timestamp, &mut self.entropy)?,
        };

        self.last = Some(ulid);

        Ok(ulid)
    }

    /// Generates the next ULID for the current system time.
    ///
    /// # Errors
    ///
    /// See [`Monotonic::generate()`]. Additionally fails with [`Error::TimestampOutOfRange`]
    /// if the system clock is before the Unix epoch.
    pub fn generate_now(&mut self) -> Result<Ulid, GenerateError<S::Error>> {
        self.generate(util::to_millis(SystemTime::now())?)
    }

    /// Returns the last generated ULID, if any.
    #[must_use]
    pub const fn last(&self) -> Option<Ulid> {
        self.last
    }

    /// Unwraps the entropy source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.entropy
    }

    fn successor(last: Ulid, timestamp: u64) -> Result<Ulid, Error> {
        let mut entropy = last.entropy();

        if let Err(err) = increment_be(&mut entropy) {
            #[cfg(feature = "tracing")]
            tracing::debug!(timestamp, "entropy exhausted for millisecond");
            return Err(err);
        }

        let mut ulid = Ulid::nil();
        ulid.set_timestamp(timestamp)?;
        ulid.set_entropy(&entropy)?;

        Ok(ulid)
    }
}

/// A [`Monotonic`] generator behind a [`Mutex`], usable from many threads at once.
///
/// Each call holds the lock for the whole transition from the previous ULID to the next one,
/// so ULIDs are strictly increasing in the order the lock is acquired.
///
/// # Example
///
/// ```
/// use std::{sync::Arc, thread};
/// use sortid::{SyncMonotonic, ZeroEntropy};
///
/// let generator = Arc::new(SyncMonotonic::new(ZeroEntropy));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let generator = Arc::clone(&generator);
///         thread::spawn(move || generator.generate(42).unwrap())
///     })
///     .collect();
///
/// let mut ulids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// ulids.sort();
/// ulids.dedup();
///
/// assert_eq!(ulids.len(), 4);
/// ```
#[derive(Debug)]
pub struct SyncMonotonic<S> {
    inner: Mutex<Monotonic<S>>,
}

impl<S: EntropySource> SyncMonotonic<S> {
    /// Creates a new shareable generator.
    #[must_use]
    pub const fn new(entropy: S) -> Self {
        Self {
            inner: Mutex::new(Monotonic::new(entropy)),
        }
    }

    /// Generates the next ULID for the given timestamp.
    ///
    /// # Errors
    ///
    /// See [`Monotonic::generate()`].
    pub fn generate(&self, timestamp: u64) -> Result<Ulid, GenerateError<S::Error>> {
        lock(&self.inner).generate(timestamp)
    }

    /// Generates the next ULID for the current system time.
    ///
    /// # Errors
    ///
    /// See [`Monotonic::generate_now()`].
    pub fn generate_now(&self) -> Result<Ulid, GenerateError<S::Error>> {
        lock(&self.inner).generate_now()
    }

    /// Returns the last generated ULID, if any.
    #[must_use]
    pub fn last(&self) -> Option<Ulid> {
        lock(&self.inner).last()
    }

    /// Unwraps the entropy source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .into_inner()
    }
}

// A panic inside `Monotonic::generate()` can only happen before `last` is assigned,
// so the state behind a poisoned lock is always consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        mutex.clear_poison();
        poisoned.into_inner()
    })
}

#[cfg(feature = "rand")]
static GENERATOR: Mutex<Option<Monotonic<StdRng>>> = Mutex::new(None);

/// Generates a ULID with the process-wide generator, seeding it on first use.
#[cfg(feature = "rand")]
pub fn generate() -> Result<Ulid, GenerateError<rand::Error>> {
    let mut guard = lock(&GENERATOR);

    // Read the clock while holding the lock, so lock order and timestamp order agree.
    let timestamp = util::to_millis(SystemTime::now())?;

    let generator = match &mut *guard {
        Some(generator) => generator,
        None => guard.insert(Monotonic::new(
            StdRng::from_rng(OsRng).map_err(GenerateError::Entropy)?,
        )),
    };

    generator.generate(timestamp)
}
