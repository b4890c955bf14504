use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Randomness used while setting up players: names and palette picks.
#[derive(Debug, Clone)]
pub struct SetupRng {
    rng: StdRng,
}

impl SetupRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for SetupRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
