//! RNG seed derivation for reproducible boards.
//!
//! When a base seed is configured, every game id maps to its own stable
//! seed, so the same id always gets the same board.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Derive the board seed for one game.
///
/// FNV-1a over the id bytes, then mixed into the base seed with wrapping
/// arithmetic. Stable across platforms and releases.
pub fn derive_board_seed(base_seed: u64, game_id: &str) -> u64 {
    let id_hash = game_id.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });

    base_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(id_hash)
        .rotate_left(17)
}
