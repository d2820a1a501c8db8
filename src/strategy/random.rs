//! Randomized payloads. Neither strategy is reproducible without a fixed RNG
//! seed; both rely on the registry to reject collisions.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::sequence::parse_store_prefix;
use super::{CodeSynthesizer, SynthesisSeed};
use crate::checksum::PAYLOAD_LEN;
use crate::code::Payload;
use crate::error::GtinResult;

/// Twelve independently drawn decimal digits.
#[derive(Debug, Clone)]
pub struct PureRandom {
    rng: StdRng,
}

impl PureRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed RNG seed, for reproducible test runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CodeSynthesizer for PureRandom {
    fn synthesize(&mut self, _seed: &SynthesisSeed<'_>) -> GtinResult<Payload> {
        let rng = &mut self.rng;
        Ok(Payload::from_digit_values(
            (0..PAYLOAD_LEN).map(|_| rng.gen_range(0..10u32)),
        ))
    }
}

fn unix_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

const TAILS_PER_SECOND: u16 = 1000;

/// `[store:2][last 7 digits of unix seconds][random:3]`.
///
/// Each second's 1000 tails are drawn in shuffled order without repeats.
/// Once a second is used up the cursor moves to the next one, even if the
/// clock has not, so a single run never runs dry.
#[derive(Debug, Clone)]
pub struct TimeStamped {
    store_prefix: u8,
    rng: StdRng,
    clock: fn() -> i64,
    second: Option<i64>,
    tails: Vec<u16>,
}

impl TimeStamped {
    pub fn new(store_prefix: &str, rng_seed: Option<u64>) -> GtinResult<Self> {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            store_prefix: parse_store_prefix(store_prefix)?,
            rng,
            clock: unix_seconds,
            second: None,
            tails: Vec::new(),
        })
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn start_second(&mut self, second: i64) {
        if self.second.is_some_and(|current| second > current + 1) {
            trace!("TimeStamped: clock jumped to {second}");
        }
        self.second = Some(second);
        self.tails = (0..TAILS_PER_SECOND).collect();
        self.tails.shuffle(&mut self.rng);
    }

    fn next_slot(&mut self) -> (i64, u16) {
        let now = (self.clock)();
        loop {
            match self.second {
                Some(current) if current >= now => match self.tails.pop() {
                    Some(tail) => return (current, tail),
                    None => {
                        debug!("TimeStamped: tails for {current} used up, moving on");
                        self.start_second(current + 1);
                    }
                },
                _ => self.start_second(now),
            }
        }
    }
}

impl CodeSynthesizer for TimeStamped {
    fn synthesize(&mut self, _seed: &SynthesisSeed<'_>) -> GtinResult<Payload> {
        let (second, tail) = self.next_slot();
        Payload::new(format!(
            "{:02}{:07}{:03}",
            self.store_prefix,
            second.rem_euclid(10_000_000),
            tail
        ))
    }
}
