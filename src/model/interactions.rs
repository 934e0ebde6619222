//! Pairwise interaction ledger.
//!
//! Two counters are maintained per venue: symmetric synergy (how a pair
//! performs together) and asymmetric domination (one player's ascendancy over
//! another across matchups). Every per-venue write is mirrored into a
//! reserved aggregate scope, and the team generator reads both scopes through
//! the same venue/global blend used for ratings.

use crate::model::{config::Config, structures::player_state::PlayerState};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Venue key under which every write is mirrored. Never a valid target venue:
/// the mutators refuse it so external callers cannot write the aggregate
/// directly.
pub const GLOBAL_SCOPE: &str = "__global__";

/// Role tag summed for the attack side of the role-balance penalty.
pub const ATTACK_ROLE: &str = "attack";
/// Role tag summed for the defense side of the role-balance penalty.
pub const DEFENSE_ROLE: &str = "defense";

/// Canonical unordered pair: the constructor sorts the two ids, so `{a, b}`
/// and `{b, a}` collapse onto one key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> PairKey {
        if a <= b {
            PairKey(a.to_owned(), b.to_owned())
        } else {
            PairKey(b.to_owned(), a.to_owned())
        }
    }
}

/// Ordered (dominator, dominated) pair; `(a, b)` and `(b, a)` are distinct
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderedPair {
    pub dominator: String,
    pub dominated: String
}

impl OrderedPair {
    pub fn new(dominator: &str, dominated: &str) -> OrderedPair {
        OrderedPair {
            dominator: dominator.to_owned(),
            dominated: dominated.to_owned()
        }
    }
}

/// The dual-scope interaction ledger. `add_synergy` and `add_domination` are
/// the only mutators, which keeps the global mirror and the self-pair guard
/// from being bypassed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionLedger {
    synergy: BTreeMap<String, BTreeMap<PairKey, f64>>,
    domination: BTreeMap<String, BTreeMap<OrderedPair, f64>>
}

impl InteractionLedger {
    pub fn new() -> InteractionLedger {
        InteractionLedger::default()
    }

    /// Accumulates synergy between `a` and `b` at `venue` and mirrors the
    /// write into the aggregate scope. Self-pairs and direct writes to the
    /// aggregate scope are ignored.
    pub fn add_synergy(&mut self, venue: &str, a: &str, b: &str, value: f64) {
        if a == b || venue == GLOBAL_SCOPE {
            return;
        }
        let key = PairKey::new(a, b);
        for scope in [venue, GLOBAL_SCOPE] {
            *self
                .synergy
                .entry(scope.to_owned())
                .or_default()
                .entry(key.clone())
                .or_insert(0.0) += value;
        }
    }

    /// Accumulates domination of `dominated` by `dominator` at `venue` and
    /// mirrors the write into the aggregate scope.
    pub fn add_domination(&mut self, venue: &str, dominator: &str, dominated: &str, value: f64) {
        if dominator == dominated || venue == GLOBAL_SCOPE {
            return;
        }
        let key = OrderedPair::new(dominator, dominated);
        for scope in [venue, GLOBAL_SCOPE] {
            *self
                .domination
                .entry(scope.to_owned())
                .or_default()
                .entry(key.clone())
                .or_insert(0.0) += value;
        }
    }

    pub fn synergy_between(&self, venue: &str, a: &str, b: &str) -> f64 {
        self.synergy
            .get(venue)
            .and_then(|m| m.get(&PairKey::new(a, b)))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn domination_over(&self, venue: &str, dominator: &str, dominated: &str) -> f64 {
        self.domination
            .get(venue)
            .and_then(|m| m.get(&OrderedPair::new(dominator, dominated)))
            .copied()
            .unwrap_or(0.0)
    }

    fn combined_synergy(&self, venue: &str, a: &str, b: &str, cfg: &Config) -> f64 {
        cfg.rating_eff_venue_weight * self.synergy_between(venue, a, b)
            + cfg.rating_eff_global_weight * self.synergy_between(GLOBAL_SCOPE, a, b)
    }

    fn combined_domination(&self, venue: &str, dominator: &str, dominated: &str, cfg: &Config) -> f64 {
        cfg.rating_eff_venue_weight * self.domination_over(venue, dominator, dominated)
            + cfg.rating_eff_global_weight * self.domination_over(GLOBAL_SCOPE, dominator, dominated)
    }

    /// Combined synergy over all unordered pairs within one candidate team.
    /// Positive synergy raises the score of a split that stacks a proven duo.
    pub fn synergy_penalty(&self, venue: &str, team: &[String], cfg: &Config) -> f64 {
        let penalty: f64 = team
            .iter()
            .tuple_combinations()
            .map(|(a, b)| self.combined_synergy(venue, a, b, cfg))
            .sum();
        penalty * cfg.teamgen_synergy_weight
    }

    /// Combined domination across the two candidate teams, both directions.
    pub fn domination_penalty(&self, venue: &str, team_a: &[String], team_b: &[String], cfg: &Config) -> f64 {
        let mut penalty = 0.0;
        for a in team_a {
            for b in team_b {
                penalty += self.combined_domination(venue, a, b, cfg);
                penalty += self.combined_domination(venue, b, a, cfg);
            }
        }
        penalty * cfg.teamgen_domination_weight
    }
}

/// Imbalance of accumulated attack and defense tendencies between the two
/// candidate lineups. Unknown players contribute nothing.
pub fn role_balance_penalty(
    players: &BTreeMap<String, PlayerState>,
    team_a: &[String],
    team_b: &[String],
    cfg: &Config
) -> f64 {
    let sum_role = |team: &[String], role: &str| -> f64 {
        team.iter()
            .filter_map(|name| players.get(name))
            .map(|p| p.role_tendencies.get(role).copied().unwrap_or(0.0))
            .sum()
    };

    let attack = (sum_role(team_a, ATTACK_ROLE) - sum_role(team_b, ATTACK_ROLE)).abs();
    let defense = (sum_role(team_a, DEFENSE_ROLE) - sum_role(team_b, DEFENSE_ROLE)).abs();
    (attack + defense) * cfg.teamgen_role_weight
}
