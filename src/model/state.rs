use crate::model::{config::Config, interactions::InteractionLedger, structures::player_state::PlayerState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate model state for one context (a league or group partition).
///
/// Exclusively owned by the caller for the duration of one update or
/// team-generation call; the host serializes it through the codec after every
/// mutation and reloads it on demand. The engine itself never touches a
/// database or file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub players: BTreeMap<String, PlayerState>,
    pub interactions: InteractionLedger,
    pub config: Config,
    /// Authoritative per-player priors, copied into `PlayerState` at
    /// admission.
    pub tier_bonus: BTreeMap<String, f64>
}

impl ModelState {
    pub fn empty(config: Config) -> ModelState {
        ModelState {
            players: BTreeMap::new(),
            interactions: InteractionLedger::new(),
            config,
            tier_bonus: BTreeMap::new()
        }
    }

    /// Admits `name` if unknown (seeded from `initial_rating` plus the tier
    /// bonus) and guarantees a venue entry either way.
    pub fn ensure_player(&mut self, name: &str, venue: &str, initial_rating: f64, is_guest: bool) -> &mut PlayerState {
        let bonus = self.tier_bonus.get(name).copied().unwrap_or(0.0);
        let player = self.players.entry(name.to_owned()).or_insert_with(|| {
            let mut player = PlayerState::new(name.to_owned(), initial_rating + bonus);
            player.is_guest = is_guest;
            player.tier_bonus = bonus;
            player
        });
        player.ensure_venue(venue, initial_rating);
        player
    }
}
