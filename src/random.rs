//! Seedable randomness for impostor, word and room code selection

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Safe character set for room codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const CODE_LENGTH: usize = 6;

pub trait RandomSource: Send {
    /// Uniform index in `0..upper`. Callers never pass zero.
    fn index(&mut self, upper: usize) -> usize;
}

impl RandomSource for StdRng {
    fn index(&mut self, upper: usize) -> usize {
        self.random_range(0..upper)
    }
}

pub fn from_entropy() -> Box<dyn RandomSource> {
    Box::new(StdRng::from_os_rng())
}

pub fn seeded(seed: u64) -> Box<dyn RandomSource> {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Replays a fixed list of picks, wrapping around. Each pick is reduced
/// modulo `upper`, so scripts stay valid for any collection size.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    picks: Vec<usize>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, upper: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let pick = self.picks[self.next % self.picks.len()];
        self.next += 1;
        pick % upper
    }
}

/// Generate a random room code
pub fn room_code(source: &mut dyn RandomSource) -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[source.index(CODE_CHARS.len())] as char)
        .collect()
}
