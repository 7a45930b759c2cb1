use std::mem::size_of;

use rand::{rngs::StdRng, Rng as _, RngCore as _, SeedableRng as _};

use crate::*;

fn random_ulids(seed: u64, count: usize) -> Vec<Ulid> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut bytes = [0; 16];
            rng.fill_bytes(&mut bytes);
            Ulid::from_bytes(bytes)
        })
        .collect()
}

#[test]
fn test_sizeof() {
    assert_eq!(size_of::<Ulid>(), size_of::<u128>());
    assert_eq!(size_of::<Ulid>(), 16);
}

#[test]
const fn test_send_sync() {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}

    assert_send::<Ulid>();
    assert_sync::<Ulid>();

    assert_send::<Monotonic<ZeroEntropy>>();
    assert_send::<SyncMonotonic<ZeroEntropy>>();
    assert_sync::<SyncMonotonic<ZeroEntropy>>();
}

#[test]
fn test_end_to_end() {
    let ulid = Ulid::new(1_000_000_000_000, &mut ZeroEntropy).unwrap();

    assert_eq!(
        ulid.to_bytes(),
        [0x00, 0xE8, 0xD4, 0xA5, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );

    let text = ulid.to_string();
    assert_eq!(text, "00X3AAA4000000000000000000"); // cspell:disable-line

    assert_eq!(Ulid::parse(&text, Mode::Strict), Ok(ulid));
    assert_eq!(Ulid::parse(&text, Mode::Lenient), Ok(ulid));
    assert_eq!(Ulid::parse(&text, Mode::Strict).unwrap().to_bytes(), ulid.to_bytes());
}

#[test]
fn test_round_trip() {
    for ulid in random_ulids(1, 1000) {
        let text = ulid.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(Ulid::parse(&text, Mode::Strict), Ok(ulid));
        assert_eq!(Ulid::parse(&text.to_lowercase(), Mode::Strict), Ok(ulid));
        assert_eq!(Ulid::from_bytes(ulid.to_bytes()), ulid);
    }

    for ulid in [Ulid::MIN, Ulid::MAX] {
        assert_eq!(ulid.to_string().parse(), Ok(ulid));
    }
}

#[test]
fn test_order_preservation() {
    let ulids = random_ulids(2, 200);

    for a in &ulids {
        for b in &ulids {
            assert_eq!(a.to_bytes().cmp(&b.to_bytes()), a.to_string().cmp(&b.to_string()));
            assert_eq!(a.cmp(b), a.to_bytes().cmp(&b.to_bytes()));
        }
    }
}

#[cfg(feature = "rand")]
#[test]
fn test_monotonic_sequences() {
    for seed in 0..1000 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut now = rng.gen_range(0..1_000_000);
        let mut generator = Monotonic::new(StdRng::seed_from_u64(seed));

        let mut got = Vec::new();
        for _ in 0..rng.gen_range(1..=5) {
            got.push(generator.generate(now).unwrap().to_string());
        }
        now += 1;
        for _ in 0..rng.gen_range(1..=5) {
            got.push(generator.generate(now).unwrap().to_string());
        }

        let mut want = got.clone();
        want.sort();
        want.dedup();

        assert_eq!(want, got, "seed {seed}");
    }
}

#[cfg(feature = "rand")]
#[test]
fn test_monotonic_non_decreasing_timestamps() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut generator = Monotonic::new(StdRng::seed_from_u64(4));

    let mut timestamp = 0;
    let mut previous = generator.generate(timestamp).unwrap();

    for _ in 0..10_000 {
        timestamp += rng.gen_range(0..=1);
        let next = generator.generate(timestamp).unwrap();
        assert!(previous < next);
        assert_eq!(next.timestamp(), timestamp);
        previous = next;
    }
}

#[test]
fn test_strict_and_lenient_diverge() {
    let s = "00X3AAA400000000000000000O"; // cspell:disable-line

    assert_eq!(Ulid::parse(s, Mode::Strict), Err(Error::InvalidChar));
    assert_eq!(
        Ulid::parse(s, Mode::Lenient),
        Ulid::parse("00X3AAA4000000000000000000", Mode::Strict) // cspell:disable-line
    );

    for s in ["I0000000000000000000000000", "l0000000000000000000000000"] {
        assert_eq!(Ulid::parse(s, Mode::Strict), Err(Error::InvalidChar));
        assert_eq!(Ulid::parse(s, Mode::Lenient).map(Ulid::to_u128), Ok(1 << 125));
    }
}

#[test]
fn test_parse() {
    let ulid1 = Ulid::from_u128(0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF);
    let ulid2 = ulid1.to_string().to_lowercase().parse();
    assert_eq!(ulid2, Ok(ulid1));

    assert_eq!("oooooooooooooooooooooooooo".parse::<Ulid>(), Ok(Ulid::nil()));
    assert_eq!("zzzzzzzzzzzzzzzzzzzzzzzzzz".parse::<Ulid>(), Err(Error::ValueOverflow));
    assert_eq!("uuuuuuuuuuuuuuuuuuuuuuuuuu".parse::<Ulid>(), Err(Error::InvalidChar));
    assert_eq!("0000000000000000000000000ä".parse::<Ulid>(), Err(Error::InvalidLength));
    assert_eq!("000000000000000000000000\u{e4}".parse::<Ulid>(), Err(Error::InvalidChar));

    assert_eq!("".parse::<Ulid>(), Err(Error::InvalidLength));
    assert_eq!("1234567890123456789012345".parse::<Ulid>(), Err(Error::InvalidLength));
    assert_eq!("123456789012345678901234567".parse::<Ulid>(), Err(Error::InvalidLength));
}

#[test]
fn test_max() {
    assert_eq!(Ulid::MAX.to_string(), "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");

    assert_eq!("7zzzzzzzzzzzzzzzzzzzzzzzzz".parse::<Ulid>(), Ok(Ulid::MAX));
    assert_eq!(Ulid::parse_strict("7zzzzzzzzzzzzzzzzzzzzzzzzz"), Ok(Ulid::MAX));

    assert_eq!("80000000000000000000000000".parse::<Ulid>(), Err(Error::ValueOverflow));
    assert_eq!(Ulid::parse_strict("80000000000000000000000000"), Err(Error::ValueOverflow));
}

#[test]
fn test_timestamp_out_of_range() {
    assert_eq!(
        Ulid::new(1 << 48, &mut ZeroEntropy),
        Err(GenerateError::Ulid(Error::TimestampOutOfRange))
    );

    let ulid = Ulid::new(TIMESTAMP_MAX, &mut ZeroEntropy).unwrap();
    assert_eq!(ulid.timestamp(), TIMESTAMP_MAX);
    assert_eq!(ulid.to_string(), "7ZZZZZZZZZ0000000000000000");
}

#[test]
fn test_entropy_overflow() {
    let mut generator = Monotonic::new(ReaderEntropy::new(&[0xFF_u8; 10][..]));

    generator.generate(1_000).unwrap();

    assert!(matches!(generator.generate(1_000), Err(GenerateError::Ulid(Error::EntropyOverflow))));
    assert!(matches!(generator.generate(999), Err(GenerateError::Ulid(Error::EntropyOverflow))));
}

#[test]
fn test_string_length() {
    for ulid in random_ulids(5, 10) {
        assert_eq!(ulid.to_string().len(), 26);
        assert_eq!(ulid.try_to_string().map(|s| s.len()), Some(26));
    }
}

#[test]
fn test_debug_fmt() {
    let s = "01javee2cb2r1mp14kpoawiwiz"; // cspell:disable-line

    let ulid: Ulid = s.parse().unwrap();

    assert_eq!(
        format!("{ulid:?}"),
        r#"Ulid { string: "01JAVEE2CB2R1MP14KP0AW1W1Z", timestamp: "2024-10-23T01:04:07.563Z", entropy: "16034B0493B015C0F03F" }"# // cspell:disable-line
    );
}

#[test]
fn test_error_display() {
    assert_eq!(Error::InvalidChar.to_string(), "string contains an invalid character");
    assert_eq!(
        GenerateError::<std::io::Error>::Ulid(Error::EntropyOverflow).to_string(),
        "entropy overflowed while incrementing it"
    );

    let err = GenerateError::Entropy(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
    assert!(err.to_string().starts_with("entropy source failed: "));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_canonicalize() {
    let src = "0abcdefghijklmnopqrstvwxyz"; // cspell::disable-line
    let exp = "0ABCDEFGH1JK1MN0PQRSTVWXYZ"; // cspell::disable-line

    let c1 = canonicalize(src).unwrap();
    assert!(matches!(c1, Cow::Owned(_)));
    assert_eq!(c1, exp);

    let c2 = canonicalize(&c1).unwrap();
    assert!(matches!(c2, Cow::Borrowed(_)));
    assert_eq!(c2, exp);

    assert_eq!(Ulid::parse(src, Mode::Lenient), Ulid::parse(exp, Mode::Strict));
    assert_eq!(Ulid::parse(src, Mode::Lenient).unwrap().to_string(), exp);

    assert_eq!(
        canonicalize("000000000oooooooooOOOOOOOO"),
        Ok("00000000000000000000000000".into())
    );
    assert_eq!(
        canonicalize("iiiiiiiiiillllllllll111111"), // cspell::disable-line
        Ok("11111111111111111111111111".into())
    );
    assert_eq!(canonicalize("80000000000000000000000000"), Err(Error::ValueOverflow));
    assert_eq!(canonicalize("uzzzzzzzzzzzzzzzzzzzzzzzzz"), Err(Error::InvalidChar));
    assert_eq!(canonicalize("123456789012345678901234567"), Err(Error::InvalidLength));
}

#[test]
fn test_validate() {
    // cspell::disable-next-line
    assert!(validate("0abcdefghijklmnopqrstvwxyz", Mode::Lenient).is_ok());
    // cspell::disable-next-line
    assert_eq!(validate("0abcdefghijklmnopqrstvwxyz", Mode::Strict), Err(Error::InvalidChar));
    // cspell::disable-next-line
    assert!(validate("0abcdefghjkmnpqrstvwxyz123", Mode::Strict).is_ok());

    for s in ["oooooooooooooooooooooooooo", "IIIIIIIIIIIIIIIIIIIIIIIIII", "LLLLLLLLLLLLLLLLLLLLLLLLLL"] {
        assert!(validate(s, Mode::Lenient).is_ok());
        assert_eq!(validate(s, Mode::Strict), Err(Error::InvalidChar));
    }

    assert_eq!(validate("zzzzzzzzzzzzzzzzzzzzzzzzzz", Mode::Lenient), Err(Error::ValueOverflow));
    assert_eq!(validate("", Mode::Strict), Err(Error::InvalidLength));
}

#[test]
fn test_datetime() {
    let ulid = Ulid::new(1_000_000_000_000, &mut ZeroEntropy).unwrap();

    let datetime = ulid.datetime();
    assert_eq!(ulid.try_datetime(), Some(datetime));
    assert_eq!(timestamp(datetime), Ok(1_000_000_000_000));
}
