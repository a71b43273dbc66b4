//! Reservation code (PNR) minting.
//!
//! A code is `PNR` followed by a five-digit number drawn uniformly from
//! `10000..=99999`, giving 90 000 possible codes. Drawing is pure and kept
//! apart from the collision check, which the allocator runs against the
//! store with a fixed attempt bound.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::ReservationCode;

pub const CODE_PREFIX: &str = "PNR";
pub const CODE_MIN: u32 = 10_000;
pub const CODE_MAX: u32 = 99_999;

/// Number of distinct codes that can ever be minted.
pub const CODE_SPACE: u32 = CODE_MAX - CODE_MIN + 1;

impl ReservationCode {
    /// Accepts only codes this module could have minted.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix(CODE_PREFIX)?;
        if digits.len() != 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u32 = digits.parse().ok()?;
        if !(CODE_MIN..=CODE_MAX).contains(&n) {
            return None;
        }
        Some(Self::from_stored(raw.to_string()))
    }

    fn from_number(n: u32) -> Self {
        Self::from_stored(format!("{CODE_PREFIX}{n}"))
    }
}

/// Draws one candidate code. Uniqueness is the caller's concern.
pub fn draw_candidate<R: Rng + ?Sized>(rng: &mut R) -> ReservationCode {
    ReservationCode::from_number(rng.gen_range(CODE_MIN..=CODE_MAX))
}

/// Supplies candidate codes to the allocator's bounded retry loop.
///
/// `attempt` is zero-based within one booking.
pub trait CodeSource: Send + Sync {
    fn next_candidate(&self, attempt: u32) -> ReservationCode;
}

/// Uniform random draws from the full code space.
pub struct RandomCodeSource {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomCodeSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Reproducible sequence, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl CodeSource for RandomCodeSource {
    fn next_candidate(&self, _attempt: u32) -> ReservationCode {
        draw_candidate(&mut *self.rng.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn code_space_holds_ninety_thousand_values() {
        assert_eq!(CODE_SPACE, 90_000);
    }

    #[test]
    fn drawn_codes_are_well_formed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            let code = draw_candidate(&mut rng);
            assert!(
                ReservationCode::parse(code.as_str()).is_some(),
                "bad code {code}"
            );
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let a = RandomCodeSource::seeded(42);
        let b = RandomCodeSource::seeded(42);
        for attempt in 0..20 {
            assert_eq!(a.next_candidate(attempt), b.next_candidate(attempt));
        }
    }

    #[test]
    fn draws_spread_over_the_space() {
        let source = RandomCodeSource::seeded(1);
        let distinct: HashSet<_> = (0..500).map(|i| source.next_candidate(i)).collect();
        // 500 draws out of 90k collide rarely; a stuck generator would not.
        assert!(distinct.len() > 480, "only {} distinct codes", distinct.len());
    }

    #[test]
    fn parse_accepts_bounds() {
        assert!(ReservationCode::parse("PNR10000").is_some());
        assert!(ReservationCode::parse("PNR99999").is_some());
    }

    #[test]
    fn parse_rejects_malformed_codes() {
        for raw in [
            "", "PNR", "PNR1234", "PNR123456", "pnr12345", "XYZ12345", "PNR09999", "PNR1234a",
            "PNR+1234", " PNR12345",
        ] {
            assert!(ReservationCode::parse(raw).is_none(), "accepted {raw:?}");
        }
    }
}
