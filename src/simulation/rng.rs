//! Seedable random sources.
//!
//! Every random draw of a run goes through a [`SimRng`], so a fixed seed
//! reproduces pipe sequences and evolved populations alike.

use ndarray_rand::rand::SeedableRng as _;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Random source used for pipe gap draws, parent selection and mutation
/// scales.
pub type SimRng = ChaCha12Rng;

/// Random source for network weights. `ndarray-rand` draws through its own
/// `rand` release, so this is a separate generator seeded from a [`SimRng`].
pub type WeightRng = ndarray_rand::rand::rngs::StdRng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Seeded RNG when a seed is given, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => ChaCha12Rng::from_os_rng(),
    }
}

/// Derive the RNG of a given generation so every generation draws its own
/// pipe sequence while staying reproducible.
pub fn derive_generation_rng(base_seed: u64, generation: u32) -> SimRng {
    let offset = u64::from(generation).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    ChaCha12Rng::seed_from_u64(base_seed.wrapping_add(offset))
}

/// Create a deterministic weight RNG from a seed.
pub fn create_weight_rng(seed: u64) -> WeightRng {
    WeightRng::seed_from_u64(seed)
}

/// Split a weight RNG off `rng`, advancing it by one draw.
pub fn derive_weight_rng(rng: &mut SimRng) -> WeightRng {
    create_weight_rng(rng.random())
}
