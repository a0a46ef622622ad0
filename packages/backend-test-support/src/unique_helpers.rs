//! Test helpers for generating unique test data
//!
//! Game identifiers share one store in some tests, so every test asks for its
//! own code instead of hard-coding `cosmic-banana`.

use uuid::Uuid;

/// Generate a unique, valid game code with the given prefix
///
/// The result only uses `[a-z0-9-]` and stays well under the 64 character limit.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_game_id;
///
/// let id1 = unique_game_id("reveal");
/// let id2 = unique_game_id("reveal");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("reveal-"));
/// ```
pub fn unique_game_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix.to_lowercase(), &simple[..12])
}
