//! Random draws behind a small capability trait so a year can be replayed.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Source of the random draws a year needs.
pub trait Dice {
    /// Uniform integer in the inclusive range `[lo, hi]`. Requires `lo <= hi`.
    fn roll(&mut self, lo: i64, hi: i64) -> i64;
    /// Bernoulli trial succeeding with probability `p` in `[0, 1]`.
    fn chance(&mut self, p: f64) -> bool;
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll(&mut self, lo: i64, hi: i64) -> i64 {
        (**self).roll(lo, hi)
    }

    fn chance(&mut self, p: f64) -> bool {
        (**self).chance(p)
    }
}

/// ChaCha-backed dice. The same seed always replays the same reign.
#[derive(Clone, Debug)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Dice with a fresh seed from the thread RNG; read it back with [`Self::seed`].
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Dice for SeededDice {
    fn roll(&mut self, lo: i64, hi: i64) -> i64 {
        let v = self.rng.gen_range(lo..=hi);
        debug!(lo, hi, v, "roll");
        v
    }

    fn chance(&mut self, p: f64) -> bool {
        let hit = self.rng.gen_bool(p);
        debug!(p, hit, "chance");
        hit
    }
}

/// Dice that replay fixed outcomes in order.
///
/// Once a queue runs dry, rolls return `lo` and trials fail.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i64>,
    chances: VecDeque<bool>,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = i64>, chances: impl IntoIterator<Item = bool>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            chances: chances.into_iter().collect(),
        }
    }

    /// Rolls not consumed yet.
    pub fn remaining_rolls(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, lo: i64, _hi: i64) -> i64 {
        self.rolls.pop_front().unwrap_or(lo)
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}
