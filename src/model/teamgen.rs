//! Combinatorial team generator.
//!
//! Enumerates every split of the participant list into two equal halves,
//! scores each by the absolute rating gap plus synergy/domination/role/
//! top-heaviness penalties, and returns a diverse top-N. All enumeration and
//! sorting runs over lexicographically sorted ids, so the output is
//! deterministic for a given state.

use crate::model::{
    interactions::role_balance_penalty,
    ratings::{effective_rating, mean},
    state::ModelState
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Penalty components of one scored split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitComponents {
    pub syn: f64,
    pub dom: f64,
    pub role: f64,
    pub top: f64
}

/// One candidate division of the participants. Lower scores are better; the
/// lexicographically smallest participant always sits in `team_a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitCandidate {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    /// Signed rating gap `sum(A) - sum(B)` under the guest-capped map.
    pub d_hat: f64,
    pub score: f64,
    pub components: SplitComponents
}

/// A one-for-one exchange proposed against a chosen split, with the
/// per-component trade-off spelled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSuggestion {
    /// (leaves team A, leaves team B).
    pub swap: (String, String),
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub d_hat: f64,
    pub score: f64,
    pub score_delta: f64,
    pub abs_diff_delta: f64,
    pub components_delta: SplitComponents
}

/// Effective ratings for the lineup, with guests capped at the group mean so
/// a hot guest can never carry a team on paper. Unknown participants score as
/// freshly admitted players.
fn team_rating_map(model: &ModelState, participants: &[String], venue: &str) -> HashMap<String, f64> {
    let cfg = &model.config;
    let raw: Vec<(String, f64, bool)> = participants
        .iter()
        .map(|name| match model.players.get(name) {
            Some(player) => (name.clone(), effective_rating(player, venue, cfg), player.is_guest),
            None => (name.clone(), default_effective_rating(model, name), false)
        })
        .collect();
    let avg = mean(raw.iter().map(|(_, rating, _)| *rating));

    raw.into_iter()
        .map(|(name, rating, is_guest)| {
            let capped = if is_guest { rating.min(avg) } else { rating };
            (name, capped)
        })
        .collect()
}

fn default_effective_rating(model: &ModelState, name: &str) -> f64 {
    let cfg = &model.config;
    let bonus = model.tier_bonus.get(name).copied().unwrap_or(0.0);
    cfg.rating_eff_venue_weight * (cfg.venue_start_rating + bonus)
        + cfg.rating_eff_global_weight * (cfg.global_start_rating + bonus)
}

/// Penalizes hoarding of the `teamgen_top_k` highest-rated participants
/// beyond `teamgen_top_max_per_team` on either side.
fn top_penalty(team_a: &[String], team_b: &[String], rating_map: &HashMap<String, f64>, model: &ModelState) -> f64 {
    let cfg = &model.config;
    if cfg.teamgen_top_k == 0 {
        return 0.0;
    }
    let top_players: BTreeSet<&String> = rating_map
        .iter()
        .sorted_by(|a, b| {
            b.1.partial_cmp(a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        })
        .take(cfg.teamgen_top_k)
        .map(|(name, _)| name)
        .collect();

    let overflow = |team: &[String]| -> usize {
        let count = team.iter().filter(|name| top_players.contains(name)).count();
        count.saturating_sub(cfg.teamgen_top_max_per_team)
    };

    (overflow(team_a) + overflow(team_b)) as f64 * cfg.teamgen_top_penalty
}

/// Scores one concrete split, returning the gap, the total score and the
/// penalty components.
pub fn evaluate_split(model: &ModelState, team_a: &[String], team_b: &[String], venue: &str) -> SplitCandidate {
    let cfg = &model.config;
    let participants: Vec<String> = team_a.iter().chain(team_b.iter()).cloned().collect();
    let rating_map = team_rating_map(model, &participants, venue);

    let rating_a: f64 = team_a.iter().map(|name| rating_map[name.as_str()]).sum();
    let rating_b: f64 = team_b.iter().map(|name| rating_map[name.as_str()]).sum();
    let d_hat = rating_a - rating_b;

    let syn = model.interactions.synergy_penalty(venue, team_a, cfg)
        + model.interactions.synergy_penalty(venue, team_b, cfg);
    let dom = model.interactions.domination_penalty(venue, team_a, team_b, cfg);
    let role = role_balance_penalty(&model.players, team_a, team_b, cfg);
    let top = top_penalty(team_a, team_b, &rating_map, model);

    SplitCandidate {
        team_a: team_a.to_vec(),
        team_b: team_b.to_vec(),
        d_hat,
        score: d_hat.abs() + syn + dom + role + top,
        components: SplitComponents { syn, dom, role, top }
    }
}

fn normalize_split(team_a: &[String], team_b: &[String]) -> (Vec<String>, Vec<String>) {
    let a: Vec<String> = team_a.iter().cloned().sorted().collect();
    let b: Vec<String> = team_b.iter().cloned().sorted().collect();
    if a.first() <= b.first() {
        (a, b)
    } else {
        (b, a)
    }
}

fn candidate_order(x: &SplitCandidate, y: &SplitCandidate) -> Ordering {
    x.score
        .partial_cmp(&y.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            x.d_hat
                .abs()
                .partial_cmp(&y.d_hat.abs())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| x.team_a.cmp(&y.team_a))
}

/// Enumerates all splits for `participants` at `venue` and returns up to
/// `top_n` suggestions: the best split first, then diverse alternatives
/// (bounded team-A overlap), falling back to the next best splits deduped by
/// unordered team identity when diversity runs dry.
pub fn generate_teams(model: &ModelState, participants: &[String], venue: &str, top_n: usize) -> Vec<SplitCandidate> {
    let cfg = &model.config;
    let sorted: Vec<String> = participants.iter().cloned().sorted().collect();
    let team_size = sorted.len() / 2;
    if team_size == 0 || top_n == 0 {
        return Vec::new();
    }
    // Pinning the smallest id into team A halves the space and kills A/B
    // mirror duplicates
    let anchor = sorted[0].clone();

    let mut candidates: Vec<SplitCandidate> = sorted
        .iter()
        .cloned()
        .combinations(team_size)
        .filter(|team_a| team_a.contains(&anchor))
        .map(|team_a| {
            let team_b: Vec<String> = sorted.iter().filter(|&name| !team_a.contains(name)).cloned().collect();
            evaluate_split(model, &team_a, &team_b, venue)
        })
        .collect();
    candidates.sort_by(candidate_order);

    let min_diff = cfg.teamgen_overlap_min_diff.max(1);
    let mut selected: Vec<SplitCandidate> = Vec::new();
    for candidate in &candidates {
        if selected.len() == top_n {
            break;
        }
        if selected.is_empty() {
            selected.push(candidate.clone());
            continue;
        }
        let diverse = selected.iter().all(|chosen| {
            let overlap = candidate
                .team_a
                .iter()
                .filter(|&name| chosen.team_a.contains(name))
                .count();
            overlap + min_diff <= team_size
        });
        if diverse {
            selected.push(candidate.clone());
        }
    }

    if selected.len() < top_n {
        let mut seen: BTreeSet<(Vec<String>, Vec<String>)> = selected
            .iter()
            .map(|split| normalize_split(&split.team_a, &split.team_b))
            .collect();
        for candidate in &candidates {
            if selected.len() == top_n {
                break;
            }
            let norm = normalize_split(&candidate.team_a, &candidate.team_b);
            if seen.contains(&norm) {
                continue;
            }
            seen.insert(norm);
            selected.push(candidate.clone());
        }
    }

    selected
}

/// Enumerates one-for-one exchanges against `base_split`, dropping any swap
/// that lands on an already-shown split, and returns the `top_n` cheapest
/// ranked by `(score_delta, |abs_diff_delta|)`.
pub fn suggest_quick_swaps(
    model: &ModelState,
    base_split: &SplitCandidate,
    other_splits: &[SplitCandidate],
    venue: &str,
    top_n: usize
) -> Vec<SwapSuggestion> {
    let base_eval = evaluate_split(model, &base_split.team_a, &base_split.team_b, venue);
    let mut forbidden: BTreeSet<(Vec<String>, Vec<String>)> = other_splits
        .iter()
        .map(|split| normalize_split(&split.team_a, &split.team_b))
        .collect();
    forbidden.insert(normalize_split(&base_split.team_a, &base_split.team_b));

    let mut swaps: Vec<SwapSuggestion> = Vec::new();
    for a in &base_split.team_a {
        for b in &base_split.team_b {
            let team_a: Vec<String> = base_split
                .team_a
                .iter()
                .filter(|name| *name != a)
                .cloned()
                .chain(std::iter::once(b.clone()))
                .collect();
            let team_b: Vec<String> = base_split
                .team_b
                .iter()
                .filter(|name| *name != b)
                .cloned()
                .chain(std::iter::once(a.clone()))
                .collect();
            if forbidden.contains(&normalize_split(&team_a, &team_b)) {
                continue;
            }

            let eval = evaluate_split(model, &team_a, &team_b, venue);
            swaps.push(SwapSuggestion {
                swap: (a.clone(), b.clone()),
                score_delta: eval.score - base_eval.score,
                abs_diff_delta: eval.d_hat.abs() - base_eval.d_hat.abs(),
                components_delta: SplitComponents {
                    syn: eval.components.syn - base_eval.components.syn,
                    dom: eval.components.dom - base_eval.components.dom,
                    role: eval.components.role - base_eval.components.role,
                    top: eval.components.top - base_eval.components.top
                },
                team_a: eval.team_a,
                team_b: eval.team_b,
                d_hat: eval.d_hat,
                score: eval.score
            });
        }
    }

    swaps.sort_by(|x, y| {
        x.score_delta
            .partial_cmp(&y.score_delta)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                x.abs_diff_delta
                    .abs()
                    .partial_cmp(&y.abs_diff_delta.abs())
                    .unwrap_or(Ordering::Equal)
            })
    });
    swaps.truncate(top_n);
    swaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Config;
    use crate::utils::test_utils::*;
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    fn four_player_model() -> ModelState {
        let mut model = generate_model();
        seed_player(&mut model, "A", 1100.0, "V1");
        seed_player(&mut model, "B", 1000.0, "V1");
        seed_player(&mut model, "C", 1000.0, "V1");
        seed_player(&mut model, "D", 900.0, "V1");
        model
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_best_split_minimizes_gap() {
        let model = four_player_model();
        let splits = generate_teams(&model, &names(&["A", "B", "C", "D"]), "V1", 3);

        assert_eq!(splits.len(), 3);
        assert!(splits[0].d_hat.abs() <= splits.last().unwrap().d_hat.abs());
        // A+D vs B+C is the even pairing
        assert_eq!(splits[0].team_a, names(&["A", "D"]));
        assert_abs_diff_eq!(splits[0].d_hat, 0.0);
    }

    #[test]
    fn test_anchor_always_in_team_a() {
        let model = four_player_model();
        let splits = generate_teams(&model, &names(&["D", "C", "B", "A"]), "V1", 3);

        for split in &splits {
            assert!(split.team_a.contains(&"A".to_string()));
        }
    }

    #[test]
    fn test_no_duplicate_unordered_splits() {
        let model = four_player_model();
        let splits = generate_teams(&model, &names(&["A", "B", "C", "D"]), "V1", 3);

        let normalized: Vec<_> = splits
            .iter()
            .map(|s| normalize_split(&s.team_a, &s.team_b))
            .collect();
        assert_eq!(normalized.iter().unique().count(), normalized.len());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let model = four_player_model();
        let participants = names(&["A", "B", "C", "D"]);

        let first = generate_teams(&model, &participants, "V1", 3);
        let second = generate_teams(&model, &participants, "V1", 3);

        assert_eq!(first, second);
    }

    #[test]
    fn test_guest_rating_capped_at_group_mean() {
        let mut model = four_player_model();
        seed_player(&mut model, "G", 1400.0, "V1");
        model.players.get_mut("G").unwrap().is_guest = true;

        let participants = names(&["A", "B", "C", "D", "G"]);
        let rating_map = team_rating_map(&model, &participants, "V1");

        // Mean of 1100/1000/1000/900/1400 = 1080; the guest is pulled down to it
        assert_abs_diff_eq!(rating_map["G"], 1080.0);
        assert_abs_diff_eq!(rating_map["A"], 1100.0);
    }

    #[test]
    fn test_unknown_participant_scores_as_default() {
        let model = generate_model();
        let rating_map = team_rating_map(&model, &names(&["X"]), "V1");
        assert_abs_diff_eq!(rating_map["X"], 1000.0);
    }

    #[test]
    fn test_synergy_steers_away_from_stacked_duo() {
        let mut model = generate_model();
        for name in ["A", "B", "C", "D"] {
            seed_player(&mut model, name, 1000.0, "V1");
        }
        // A and B are a proven duo; the generator should prefer to separate them
        for _ in 0..50 {
            model.interactions.add_synergy("V1", "A", "B", 1.0);
        }

        let splits = generate_teams(&model, &names(&["A", "B", "C", "D"]), "V1", 1);
        assert!(!splits[0].team_a.contains(&"B".to_string()));
    }

    #[test]
    fn test_top_penalty_counts_overflow() {
        let mut model = generate_model();
        for (name, rating) in [("A", 1300.0), ("B", 1250.0), ("C", 1200.0), ("D", 1150.0), ("E", 900.0), ("F", 880.0)] {
            seed_player(&mut model, name, rating, "V1");
        }

        let participants = names(&["A", "B", "C", "D", "E", "F"]);
        let rating_map = team_rating_map(&model, &participants, "V1");

        // Three of the top four on one side overflows by one
        let penalty = top_penalty(&names(&["A", "B", "C"]), &names(&["D", "E", "F"]), &rating_map, &model);
        assert_abs_diff_eq!(penalty, model.config.teamgen_top_penalty);

        let balanced = top_penalty(&names(&["A", "B", "E"]), &names(&["C", "D", "F"]), &rating_map, &model);
        assert_abs_diff_eq!(balanced, 0.0);
    }

    #[test]
    fn test_quick_swaps_skip_shown_splits_and_rank_by_score() {
        let model = four_player_model();
        let splits = generate_teams(&model, &names(&["A", "B", "C", "D"]), "V1", 3);

        // With only the base split shown, every exchange lands on a fresh pairing
        let swaps = suggest_quick_swaps(&model, &splits[0], &splits[..1], "V1", 4);

        assert!(!swaps.is_empty());
        let base_norm = normalize_split(&splits[0].team_a, &splits[0].team_b);
        for swap in &swaps {
            assert_ne!(normalize_split(&swap.team_a, &swap.team_b), base_norm);
        }
        for window in swaps.windows(2) {
            assert!(window[0].score_delta <= window[1].score_delta);
        }

        // Once every split is on the table there is nothing left to propose
        let exhausted = suggest_quick_swaps(&model, &splits[0], &splits, "V1", 4);
        assert!(exhausted.is_empty());
    }

    #[test]
    fn test_degenerate_inputs_yield_no_splits() {
        let model = generate_model();
        assert!(generate_teams(&model, &names(&["A"]), "V1", 3).is_empty());
        assert!(generate_teams(&model, &[], "V1", 3).is_empty());
    }

    #[test]
    fn test_overlap_min_diff_relaxed_config() {
        let mut model = four_player_model();
        model.config = Config {
            teamgen_overlap_min_diff: 0,
            ..model.config.clone()
        };

        // min_diff floors at 1, so the selection still cannot repeat a split
        let splits = generate_teams(&model, &names(&["A", "B", "C", "D"]), "V1", 3);
        let normalized: Vec<_> = splits
            .iter()
            .map(|s| normalize_split(&s.team_a, &s.team_b))
            .collect();
        assert_eq!(normalized.iter().unique().count(), normalized.len());
    }
}
