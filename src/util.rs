use std::{
    fmt::Formatter,
    time::{Duration, SystemTime},
};

use crate::{base32, Error, RANDOM_BITS, RANDOM_MASK, TIMESTAMP_MAX};

pub fn as_array<const N: usize>(bytes: &[u8]) -> Result<&[u8; N], Error> {
    bytes.try_into().or(Err(Error::InvalidLength))
}

pub fn try_to_string(ulid: u128) -> Option<String> {
    let mut s = String::new();
    s.try_reserve_exact(26).ok()?;

    let mut buffer = [0; 26];
    s.push_str(base32::encode(ulid, &mut buffer));

    Some(s)
}

/// Milliseconds since the Unix epoch, if the time fits into 48 bits.
pub fn to_millis(time: SystemTime) -> Result<u64, Error> {
    let since_epoch = time
        .duration_since(SystemTime::UNIX_EPOCH)
        .or(Err(Error::TimestampOutOfRange))?;

    match u64::try_from(since_epoch.as_millis()) {
        Ok(millis) if millis <= TIMESTAMP_MAX => Ok(millis),
        _ => Err(Error::TimestampOutOfRange),
    }
}

pub fn from_millis(millis: u64) -> Option<SystemTime> {
    SystemTime::UNIX_EPOCH.checked_add(Duration::from_millis(millis))
}

pub fn debug_ulid(name: &str, ulid: u128, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
    struct Timestamp(u64);
    impl std::fmt::Debug for Timestamp {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            write!(f, "\"{ts}\"", ts = timestamp_to_string(self.0))
        }
    }

    struct Entropy(u128);
    impl std::fmt::Debug for Entropy {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            write!(f, "\"{:020X}\"", self.0)
        }
    }

    let mut buffer = [0; 26];

    let string = base32::encode(ulid, &mut buffer);
    let timestamp = Timestamp((ulid >> RANDOM_BITS) as u64);
    let entropy = Entropy(ulid & RANDOM_MASK);

    f.debug_struct(name)
        .field("string", &string)
        .field("timestamp", &timestamp)
        .field("entropy", &entropy)
        .finish()
}

/// Formats milliseconds since the Unix epoch as RFC 3339 with millisecond precision (UTC).
fn timestamp_to_string(millis: u64) -> String {
    let (days, millis_of_day) = (millis / 86_400_000, millis % 86_400_000);

    let hours = millis_of_day / 3_600_000;
    let minutes = millis_of_day / 60_000 % 60;
    let seconds = millis_of_day / 1000 % 60;
    let millis = millis_of_day % 1000;

    let (year, month, day) = civil_from_days(days);

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

// Proleptic Gregorian calendar, counted in eras of 400 years starting at 0000-03-01.
const fn civil_from_days(days: u64) -> (u64, u64, u64) {
    const DAYS_0000_03_01_TO_1970: u64 = 719_468;
    const DAYS_PER_ERA: u64 = 146_097;

    let days = days + DAYS_0000_03_01_TO_1970;
    let (era, day_of_era) = (days / DAYS_PER_ERA, days % DAYS_PER_ERA);

    let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);

    // Months counted from March, so February is last and leap days come at the end.
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 { shifted_month + 3 } else { shifted_month - 9 };
    let year = era * 400 + year_of_era + if month <= 2 { 1 } else { 0 };

    (year, month, day)
}
