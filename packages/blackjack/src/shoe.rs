use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::Rank;

/// Anything that can hand out the next card.
pub trait CardSource {
    fn draw(&mut self) -> Rank;
}

/// Infinite shoe: every draw picks one of the 13 rank symbols with equal
/// probability, independent of what came before.
///
/// Note the distribution is uniform over symbols, so a ten-valued card
/// (10, J, Q or K) turns up 4/13 of the time.
#[derive(Debug, Clone)]
pub struct InfiniteShoe {
    seed: Option<u64>,
    rng: ChaCha8Rng,
}

impl InfiniteShoe {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl CardSource for InfiniteShoe {
    fn draw(&mut self) -> Rank {
        Rank::from_index(self.rng.gen_range(0..Rank::ALL.len()))
    }
}

/// Pre-arranged cards dealt in order. Running out is a bug in whoever
/// stacked it.
#[derive(Debug, Clone, Default)]
pub struct StackedShoe {
    cards: VecDeque<Rank>,
}

impl StackedShoe {
    pub fn new(cards: &[Rank]) -> Self {
        Self {
            cards: cards.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl CardSource for StackedShoe {
    fn draw(&mut self) -> Rank {
        match self.cards.pop_front() {
            Some(card) => card,
            None => panic!("stacked shoe exhausted"),
        }
    }
}
