//! RNG module - seeded piece generation
//!
//! Piece selection is deterministic for a given seed so games can be replayed
//! in tests. Three policies are available:
//!
//! - [`Randomizer::Uniform`]: every draw picks one of the 7 kinds with equal
//!   probability (the default).
//! - [`Randomizer::Bag`]: the "7-bag" shuffle; each run of 7 draws contains
//!   every kind exactly once.
//! - [`Randomizer::Sequence`]: a fixed list of kinds, repeated. Used to set up
//!   exact scenarios.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits; the low bits of a power-of-two LCG cycle with
    /// very short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Next-piece selection policy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Randomizer {
    #[default]
    Uniform,
    Bag,
    /// Repeat the given kinds in order. An empty list falls back to uniform.
    Sequence(Vec<PieceKind>),
}

impl Randomizer {
    /// Parse a policy name (`uniform` or `bag`, case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "random" => Some(Randomizer::Uniform),
            "bag" | "7bag" | "7-bag" => Some(Randomizer::Bag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Randomizer::Uniform => "uniform",
            Randomizer::Bag => "bag",
            Randomizer::Sequence(_) => "sequence",
        }
    }
}

/// Seeded source of piece kinds
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    policy: Randomizer,
    rng: SimpleRng,
    /// Current bag of pieces (bag policy only)
    bag: [PieceKind; 7],
    /// Index into current bag; 7 means exhausted
    bag_index: usize,
    /// Position in a fixed sequence
    seq_index: usize,
}

impl PieceGenerator {
    pub fn new(seed: u32, policy: Randomizer) -> Self {
        Self {
            policy,
            rng: SimpleRng::new(seed),
            bag: PieceKind::ALL,
            bag_index: PieceKind::ALL.len(),
            seq_index: 0,
        }
    }

    /// Uniform generator with the given seed
    pub fn uniform(seed: u32) -> Self {
        Self::new(seed, Randomizer::Uniform)
    }

    /// Generator that repeats `kinds` in order
    pub fn sequence(kinds: impl Into<Vec<PieceKind>>) -> Self {
        Self::new(1, Randomizer::Sequence(kinds.into()))
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        if let Randomizer::Sequence(kinds) = &self.policy {
            if !kinds.is_empty() {
                let kind = kinds[self.seq_index % kinds.len()];
                self.seq_index += 1;
                return kind;
            }
        }

        if self.policy == Randomizer::Bag {
            if self.bag_index >= self.bag.len() {
                self.refill_bag();
            }
            let kind = self.bag[self.bag_index];
            self.bag_index += 1;
            return kind;
        }

        PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize]
    }

    /// Forget per-game progress: a partially drawn bag is discarded and a
    /// fixed sequence starts over. The RNG stream keeps running so successive
    /// games differ.
    pub fn reset(&mut self) {
        self.bag_index = self.bag.len();
        self.seq_index = 0;
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::uniform(1)
    }
}
