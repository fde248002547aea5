use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::RandomSource;
use crate::infra::rng_seed::RngSeed;

/// Системный RNG (`thread_rng`) для боевых столов.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Позволяет воспроизводить одни и те же раздачи при одинаковом seed.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: StdRng::from_seed(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

/// RNG стола на цепочке seed'ов: каждая тасовка получает свой seed
/// `base.derive(table_id, n, n)`, так что любую раздачу можно
/// воспроизвести по базовому seed'у и её номеру, не проигрывая предыдущие.
#[derive(Clone, Debug)]
pub struct SeedChainRng {
    base: RngSeed,
    table_id: u64,
    shuffles: u64,
}

impl SeedChainRng {
    pub fn new(base: RngSeed, table_id: u64) -> Self {
        Self {
            base,
            table_id,
            shuffles: 0,
        }
    }

    /// Seed для тасовки номер `index` (с единицы).
    pub fn seed_for(&self, index: u64) -> RngSeed {
        self.base.derive(self.table_id, index, index)
    }
}

impl RandomSource for SeedChainRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        self.shuffles += 1;
        self.seed_for(self.shuffles).to_rng().shuffle(slice);
    }
}
