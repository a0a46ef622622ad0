//! Human-friendly game codes.
//!
//! Codes look like `swift-falcon`; after repeated collisions a numeric
//! suffix (`swift-falcon-42`) widens the space.

use rand::seq::IndexedRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "cosmic", "fuzzy", "sneaky", "mighty", "lazy", "bold", "swift", "clever", "wild", "quiet",
];

const NOUNS: &[&str] = &[
    "banana", "dragon", "ninja", "panda", "rocket", "wizard", "tiger", "falcon", "phoenix",
    "robot",
];

/// Attempts before a numeric suffix is appended.
pub const PLAIN_ATTEMPTS: usize = 5;

/// Generate an `adjective-noun` code. `attempt` counts prior collisions.
pub fn generate_game_code<R: Rng + ?Sized>(rng: &mut R, attempt: usize) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("bold");
    let noun = NOUNS.choose(rng).copied().unwrap_or("panda");
    if attempt < PLAIN_ATTEMPTS {
        format!("{adjective}-{noun}")
    } else {
        let suffix: u32 = rng.random_range(10..10_000);
        format!("{adjective}-{noun}-{suffix}")
    }
}
