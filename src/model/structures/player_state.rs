use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable per-player record owned by the model state.
///
/// Venue ratings are created lazily at first participation; the learning
/// update guarantees a venue entry exists before any delta lands on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub global_rating: f64,
    #[serde(default)]
    pub venue_ratings: BTreeMap<String, f64>,
    #[serde(default)]
    pub is_guest: bool,
    /// Matches played while flagged as a guest. Drives the ramp-up multiplier.
    #[serde(default)]
    pub guest_matches: u32,
    /// Accumulated role weights; "attack"/"defense" share this namespace with
    /// the finer-grained fan role tags.
    #[serde(default)]
    pub role_tendencies: BTreeMap<String, f64>,
    /// Additive prior applied to initial ratings only; kept for traceability.
    #[serde(default)]
    pub tier_bonus: f64
}

impl PlayerState {
    pub fn new(name: String, global_rating: f64) -> PlayerState {
        PlayerState {
            name,
            global_rating,
            venue_ratings: BTreeMap::new(),
            is_guest: false,
            guest_matches: 0,
            role_tendencies: BTreeMap::new(),
            tier_bonus: 0.0
        }
    }

    /// The rating at `venue`, or the seeded default for a venue this player
    /// has not visited yet.
    pub fn venue_rating(&self, venue: &str, default: f64) -> f64 {
        self.venue_ratings
            .get(venue)
            .copied()
            .unwrap_or(default + self.tier_bonus)
    }

    /// Seeds the venue entry if missing.
    pub fn ensure_venue(&mut self, venue: &str, default: f64) {
        if !self.venue_ratings.contains_key(venue) {
            self.venue_ratings.insert(venue.to_owned(), default + self.tier_bonus);
        }
    }

    pub fn add_role_weight(&mut self, role: &str, weight: f64) {
        *self.role_tendencies.entry(role.to_owned()).or_insert(0.0) += weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_venue_rating_default_includes_tier_bonus() {
        let mut player = PlayerState::new("A".to_string(), 1000.0);
        player.tier_bonus = 25.0;

        assert_abs_diff_eq!(player.venue_rating("V1", 1000.0), 1025.0);

        player.ensure_venue("V1", 1000.0);
        assert_abs_diff_eq!(player.venue_ratings["V1"], 1025.0);

        // A second ensure must not reset an existing entry
        player.venue_ratings.insert("V1".to_string(), 1100.0);
        player.ensure_venue("V1", 1000.0);
        assert_abs_diff_eq!(player.venue_ratings["V1"], 1100.0);
    }

    #[test]
    fn test_add_role_weight_accumulates() {
        let mut player = PlayerState::new("A".to_string(), 1000.0);
        player.add_role_weight("attack", 1.0);
        player.add_role_weight("attack", 0.5);

        assert_abs_diff_eq!(player.role_tendencies["attack"], 1.5);
    }
}
