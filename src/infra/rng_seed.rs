//! RngSeed — доменный seed для RNG стола.
//!
//! Позволяет:
//!   - хранить базовый seed ([u8; 32] или u64 для тестов);
//!   - делать детерминированное hash-reseeding:
//!         new = H(domain || old || table_id || hand_id || hand_index)
//!   - создавать DeterministicRng из seed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::infra::rng::DeterministicRng;

const DOMAIN_TAG: &[u8] = b"POKER_TABLE_ENGINE_RNG_V1";

/// 32-байтовый seed для RNG.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Seed из u64 (для тестов и CLI).
    pub fn from_u64(x: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes }
    }

    /// Доменное хэш-расширение с контекстом стола и раздачи.
    pub fn derive(&self, table_id: u64, hand_id: u64, hand_index: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        hasher.update(self.bytes);
        hasher.update(table_id.to_le_bytes());
        hasher.update(hand_id.to_le_bytes());
        hasher.update(hand_index.to_le_bytes());

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self { bytes }
    }

    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed(self.bytes)
    }
}
