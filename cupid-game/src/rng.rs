//! Injectable randomness for every roll the engine makes.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::VecDeque;

/// Domain of a random draw. Each stream is seeded independently so that
/// extra draws in one domain never shift another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollStream {
    Roulette,
    SkipRoll,
    Prompt,
    Event,
}

impl RollStream {
    pub const ALL: [Self; 4] = [Self::Roulette, Self::SkipRoll, Self::Prompt, Self::Event];

    const fn domain_tag(self) -> &'static [u8] {
        match self {
            Self::Roulette => b"roulette",
            Self::SkipRoll => b"skip-roll",
            Self::Prompt => b"prompt",
            Self::Event => b"event",
        }
    }
}

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self, stream: RollStream) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self, stream: RollStream) -> f64 {
        (**self).next_unit(stream)
    }
}

/// Deterministic bundle of RNG streams segregated by roll domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    roulette: CountingRng<SmallRng>,
    skip_roll: CountingRng<SmallRng>,
    prompt: CountingRng<SmallRng>,
    event: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            roulette: CountingRng::new(derive_stream_seed(seed, RollStream::Roulette.domain_tag())),
            skip_roll: CountingRng::new(derive_stream_seed(seed, RollStream::SkipRoll.domain_tag())),
            prompt: CountingRng::new(derive_stream_seed(seed, RollStream::Prompt.domain_tag())),
            event: CountingRng::new(derive_stream_seed(seed, RollStream::Event.domain_tag())),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws performed against a stream.
    #[must_use]
    pub const fn draws(&self, stream: RollStream) -> u64 {
        match stream {
            RollStream::Roulette => self.roulette.draws(),
            RollStream::SkipRoll => self.skip_roll.draws(),
            RollStream::Prompt => self.prompt.draws(),
            RollStream::Event => self.event.draws(),
        }
    }

    fn stream_mut(&mut self, stream: RollStream) -> &mut CountingRng<SmallRng> {
        match stream {
            RollStream::Roulette => &mut self.roulette,
            RollStream::SkipRoll => &mut self.skip_roll,
            RollStream::Prompt => &mut self.prompt,
            RollStream::Event => &mut self.event,
        }
    }
}

impl RandomSource for RngBundle {
    fn next_unit(&mut self, stream: RollStream) -> f64 {
        self.stream_mut(stream).gen_range(0.0..1.0)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Source that always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self, _stream: RollStream) -> f64 {
        self.0
    }
}

/// Source that replays queued values, then repeats a fallback.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    queue: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            queue: values.into_iter().collect(),
            fallback,
            consumed: 0,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.queue.push_back(value);
    }

    /// Values still waiting in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self, _stream: RollStream) -> f64 {
        self.consumed = self.consumed.saturating_add(1);
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn rng_bundle_uses_domain_hmac() {
        let seed = 0xC0FF_EE42_u64;
        let mut bundle = RngBundle::from_user_seed(seed);

        let mut expected = SmallRng::seed_from_u64(derive_stream_seed(seed, b"roulette"));
        let expected_unit: f64 = expected.gen_range(0.0..1.0);
        let unit = bundle.next_unit(RollStream::Roulette);
        assert!((unit - expected_unit).abs() < f64::EPSILON);
        assert!(bundle.draws(RollStream::Roulette) >= 1);
        assert_eq!(bundle.draws(RollStream::Event), 0);

        assert_ne!(
            derive_stream_seed(seed, b"roulette"),
            derive_stream_seed(seed, b"skip-roll"),
            "domain tags must derive distinct seeds"
        );
    }

    #[test]
    fn same_seed_replays_the_same_stream() {
        let mut a = RngBundle::from_user_seed(7);
        let mut b = RngBundle::from_user_seed(7);
        for stream in RollStream::ALL {
            for _ in 0..16 {
                let x = a.next_unit(stream);
                assert!((0.0..1.0).contains(&x));
                assert!((x - b.next_unit(stream)).abs() < f64::EPSILON);
            }
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn streams_do_not_shift_each_other() {
        let mut quiet = RngBundle::from_user_seed(99);
        let mut noisy = RngBundle::from_user_seed(99);
        for _ in 0..10 {
            let _ = noisy.next_unit(RollStream::Prompt);
        }
        let a = quiet.next_unit(RollStream::SkipRoll);
        let b = noisy.next_unit(RollStream::SkipRoll);
        assert!((a - b).abs() < f64::EPSILON);
    }

    #[test]
    fn counting_rng_counts_raw_draws() {
        let mut rng = CountingRng::new(1);
        let _ = rng.next_u32();
        let _ = rng.next_u64();
        let mut buf = [0_u8; 4];
        rng.fill_bytes(&mut buf);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn scripted_random_replays_then_falls_back() {
        let mut rng = ScriptedRandom::new([0.1, 0.9], 0.5);
        assert!((rng.next_unit(RollStream::SkipRoll) - 0.1).abs() < f64::EPSILON);
        rng.push(0.3);
        assert_eq!(rng.remaining(), 2);
        assert!((rng.next_unit(RollStream::Prompt) - 0.9).abs() < f64::EPSILON);
        assert!((rng.next_unit(RollStream::Prompt) - 0.3).abs() < f64::EPSILON);
        assert!((rng.next_unit(RollStream::Event) - 0.5).abs() < f64::EPSILON);
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    fn fixed_random_ignores_stream() {
        let mut rng = FixedRandom(0.01);
        for stream in RollStream::ALL {
            assert!((rng.next_unit(stream) - 0.01).abs() < f64::EPSILON);
        }
    }
}
