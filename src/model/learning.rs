//! The central learning recurrence.
//!
//! Given a finished match (plus optional quick/expanded feedback), the update
//! mutates the model state and reports per-player deltas with a component
//! breakdown.
//!
//! # Update steps
//! 1. **Admission**: unknown participants are admitted (guests shaded below
//!    the existing average), known ones get a venue entry.
//! 2. **Team impulse**: the weighted goal differential maps onto a saturating
//!    impulse, split evenly among winners and rating-proportionally among
//!    losers.
//! 3. **Bonuses and nudges**: goal/assist bonuses and capped quick-feedback
//!    adjustments are added per player.
//! 4. **Damping and caps**: top-player damping, guest acceleration, then the
//!    absolute per-match cap.
//! 5. **Apply and accrue**: deltas land on global and venue ratings in one
//!    pass, then the interaction ledger absorbs win/loss, goal-assist and
//!    feedback interactions.
//!
//! The update is a pure function of its inputs and the pre-state; it fails
//! before any mutation when the ingestion contract is violated.

use crate::model::{
    config::Config,
    feedback::{anchor_deltas, fan_rating_deltas, pairwise_deltas, quick_adjustments},
    ratings::{avg_match_rating, effective_rating},
    segments::{segment_weight, weighted_goal_diff},
    state::ModelState,
    structures::{
        breakdown::{PlayerBreakdown, UpdateOutcome},
        feedback_data::{ExpandedFeedback, FanResponse, InteractionKind, QuickFeedback},
        match_data::{EventType, Match, MatchEvent, Segment, Team}
    }
};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

/// Contract violations that fail the update before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The same id appears in both lineups.
    #[error("player {0} appears on both teams")]
    PlayerOnBothTeams(String),
    /// The match carries no venue to attribute ratings to.
    #[error("match venue is empty")]
    MissingVenue
}

fn event_base(event_type: EventType, cfg: &Config) -> f64 {
    match event_type {
        EventType::Goal => cfg.event_base_goal,
        EventType::Assist => cfg.event_base_assist
    }
}

/// Value of one event before the global event scale. Events in a butt game
/// are amplified; an event pointing outside `segments` contributes nothing
/// (the host validates indices).
fn event_value(event: &MatchEvent, segments: &[Segment], cfg: &Config) -> f64 {
    let Some(seg) = segments.get(event.segment_index) else {
        return 0.0;
    };
    let weight = segment_weight(seg.segment_index, segments.len(), cfg);
    let mult = if seg.is_butt_game {
        cfg.butt_game_event_multiplier
    } else {
        1.0
    };
    event_base(event.event_type, cfg) * weight * mult
}

/// Piecewise-linear mapping from the weighted goal differential to the
/// team-level impulse, saturating at 220.
fn team_impulse(weighted_diff: f64) -> f64 {
    let abs_d = weighted_diff.abs();
    let value = if abs_d <= 1.0 {
        60.0 * abs_d
    } else if abs_d <= 2.0 {
        60.0 + 60.0 * (abs_d - 1.0)
    } else if abs_d <= 3.0 {
        120.0 + 60.0 * (abs_d - 2.0)
    } else {
        180.0 + 40.0 * (abs_d - 3.0)
    };
    value.min(220.0)
}

/// Damping for players far above the match average. Applies only to positive
/// deltas and only strictly above `avg + top_player_thresh`.
fn top_player_multiplier(delta: f64, r_pre: f64, avg_rating: f64, cfg: &Config) -> f64 {
    if delta <= 0.0 {
        return 1.0;
    }
    let threshold = avg_rating + cfg.top_player_thresh;
    if r_pre <= threshold {
        return 1.0;
    }
    let excess = r_pre - threshold;
    if excess <= cfg.top_player_band1 {
        cfg.top_player_mult1
    } else if excess <= cfg.top_player_band2 {
        cfg.top_player_mult2
    } else {
        cfg.top_player_mult3
    }
}

/// Accelerated learning for a guest's first three matches.
fn guest_multiplier(guest_matches: u32, cfg: &Config) -> f64 {
    if guest_matches < 2 {
        cfg.guest_learning_mult_first2
    } else if guest_matches == 2 {
        cfg.guest_learning_mult_third
    } else {
        1.0
    }
}

/// Weighted goal differential for the update, degraded to zero when either
/// lineup is empty so degenerate matches produce zero deltas and accrue
/// nothing.
fn match_goal_diff(match_: &Match, cfg: &Config) -> f64 {
    if match_.team_a.is_empty() || match_.team_b.is_empty() {
        return 0.0;
    }
    weighted_goal_diff(&match_.segments, cfg)
}

fn validate(match_: &Match) -> Result<(), UpdateError> {
    if match_.venue.is_empty() {
        return Err(UpdateError::MissingVenue);
    }
    let team_a: HashSet<&String> = match_.team_a.iter().collect();
    if let Some(dup) = match_.team_b.iter().find(|p| team_a.contains(*p)) {
        return Err(UpdateError::PlayerOnBothTeams(dup.clone()));
    }
    Ok(())
}

/// Applies one match (plus optional feedback) to the model and returns the
/// per-player deltas together with the component breakdown the host persists
/// for audit.
pub fn update_from_match_with_breakdown(
    model: &mut ModelState,
    match_: &Match,
    quick: Option<&QuickFeedback>,
    expanded: Option<&ExpandedFeedback>
) -> Result<UpdateOutcome, UpdateError> {
    validate(match_)?;

    let cfg = model.config.clone();
    let venue = match_.venue.as_str();

    // Average over already-known participants, used to shade guest seeds
    let existing: Vec<_> = match_.participants().filter_map(|p| model.players.get(p)).collect();
    let avg_existing = if existing.is_empty() {
        cfg.global_start_rating
    } else {
        avg_match_rating(existing, venue, &cfg)
    };

    for name in match_.participants() {
        let is_guest = match_.guests.contains(name);
        if let Some(player) = model.players.get_mut(name) {
            player.ensure_venue(venue, cfg.venue_start_rating);
        } else {
            let initial = if is_guest {
                (avg_existing - cfg.guest_initial_offset).clamp(cfg.guest_initial_min, cfg.guest_initial_max)
            } else {
                cfg.global_start_rating
            };
            model.ensure_player(name, venue, initial, is_guest);
        }
    }

    let participants: Vec<String> = match_.participants().cloned().collect();
    let avg_rating = avg_match_rating(participants.iter().map(|name| &model.players[name]), venue, &cfg);

    let weighted_diff = match_goal_diff(match_, &cfg);
    let impulse = team_impulse(weighted_diff);
    let team_a_impulse = if weighted_diff > 0.0 { impulse } else { -impulse };
    let team_b_impulse = -team_a_impulse;

    let base_delta_a = if match_.team_a.is_empty() {
        0.0
    } else {
        team_a_impulse / match_.team_a.len() as f64
    };
    let base_delta_b = if match_.team_b.is_empty() {
        0.0
    } else {
        team_b_impulse / match_.team_b.len() as f64
    };

    let losing_team: Option<HashSet<&String>> = if team_a_impulse < 0.0 {
        Some(match_.team_a.iter().collect())
    } else if team_b_impulse < 0.0 {
        Some(match_.team_b.iter().collect())
    } else {
        None
    };

    // The losing side is reweighted by effective-rating share: weak players
    // lose less, strong losers lose more. Winners always split evenly.
    let mut losing_weights: HashMap<&String, f64> = HashMap::new();
    if let Some(losers) = &losing_team {
        let total: f64 = losers
            .iter()
            .map(|name| effective_rating(&model.players[*name], venue, &cfg))
            .sum();
        if total > 0.0 {
            for name in losers {
                let share = effective_rating(&model.players[*name], venue, &cfg) / total;
                losing_weights.insert(*name, share);
            }
        }
    }

    let mut event_bonus: HashMap<&String, f64> = HashMap::new();
    let mut goal_bonus: HashMap<&String, f64> = HashMap::new();
    let mut assist_bonus: HashMap<&String, f64> = HashMap::new();
    for event in &match_.events {
        let value = event_value(event, &match_.segments, &cfg) * cfg.event_scale;
        *event_bonus.entry(&event.player).or_insert(0.0) += value;
        match event.event_type {
            EventType::Goal => *goal_bonus.entry(&event.player).or_insert(0.0) += value,
            EventType::Assist => *assist_bonus.entry(&event.player).or_insert(0.0) += value
        }
    }

    let (quick_map, anchor_map, pairwise_map, fan_map) = match quick {
        Some(quick) => (
            quick_adjustments(quick, &cfg),
            anchor_deltas(quick, &cfg),
            pairwise_deltas(&quick.pairwise, &cfg),
            fan_rating_deltas(&quick.fan_responses, &cfg)
        ),
        None => Default::default()
    };

    let team_a_members: HashSet<&String> = match_.team_a.iter().collect();
    let mut deltas: IndexMap<String, f64> = IndexMap::new();
    let mut breakdown: IndexMap<String, PlayerBreakdown> = IndexMap::new();

    for name in &participants {
        let player = &model.players[name];
        let in_team_a = team_a_members.contains(name);

        let mut base_delta = if in_team_a { base_delta_a } else { base_delta_b };
        if let Some(losers) = &losing_team {
            if losers.contains(name) && !losing_weights.is_empty() {
                let side_impulse = if in_team_a { team_a_impulse } else { team_b_impulse };
                base_delta = side_impulse * losing_weights[name];
            }
        }

        let mvp_delta = anchor_map.get(name).copied().unwrap_or(0.0);
        let pairwise_delta = pairwise_map.get(name).copied().unwrap_or(0.0);
        let fan_delta = fan_map.get(name).copied().unwrap_or(0.0);
        let quick_raw = quick_map.get(name).copied().unwrap_or(0.0);
        let quick_cap = base_delta.abs() * cfg.quick_adjustment_cap_pct;
        let quick_adj = if quick_cap > 0.0 {
            quick_raw.clamp(-quick_cap, quick_cap)
        } else {
            0.0
        };

        let event_delta = event_bonus.get(name).copied().unwrap_or(0.0);
        let mut raw_delta = base_delta + event_delta + quick_adj;

        let r_pre = effective_rating(player, venue, &cfg);
        raw_delta *= top_player_multiplier(raw_delta, r_pre, avg_rating, &cfg);

        if player.is_guest {
            raw_delta *= guest_multiplier(player.guest_matches, &cfg);
        }

        let cap = avg_rating * cfg.cap_pct;
        let final_delta = raw_delta.clamp(-cap, cap);

        deltas.insert(name.clone(), final_delta);
        breakdown.insert(
            name.clone(),
            PlayerBreakdown {
                result_delta: base_delta,
                event_delta,
                goal_delta: goal_bonus.get(name).copied().unwrap_or(0.0),
                assist_delta: assist_bonus.get(name).copied().unwrap_or(0.0),
                quick_delta: quick_adj,
                mvp_delta,
                pairwise_delta,
                fan_delta,
                raw_delta,
                cap,
                final_delta
            }
        );
    }

    // Single apply pass after every delta is known
    for name in &participants {
        let delta = deltas[name.as_str()];
        if let Some(player) = model.players.get_mut(name) {
            player.global_rating += delta;
            *player
                .venue_ratings
                .entry(venue.to_owned())
                .or_insert(cfg.venue_start_rating) += delta;
            if player.is_guest {
                player.guest_matches += 1;
            }
        }
    }

    apply_interactions(model, match_, quick, expanded);

    Ok(UpdateOutcome { deltas, breakdown })
}

/// Deltas-only variant of [`update_from_match_with_breakdown`]; same core,
/// breakdown discarded.
pub fn update_from_match(
    model: &mut ModelState,
    match_: &Match,
    quick: Option<&QuickFeedback>,
    expanded: Option<&ExpandedFeedback>
) -> Result<IndexMap<String, f64>, UpdateError> {
    update_from_match_with_breakdown(model, match_, quick, expanded).map(|outcome| outcome.deltas)
}

fn apply_interactions(
    model: &mut ModelState,
    match_: &Match,
    quick: Option<&QuickFeedback>,
    expanded: Option<&ExpandedFeedback>
) {
    apply_match_interactions(model, match_);
    let venue = match_.venue.as_str();
    if let Some(quick) = quick {
        for response in &quick.fan_responses {
            apply_fan_interaction(model, venue, response);
        }
    }
    if let Some(expanded) = expanded {
        for response in &expanded.fan_responses {
            apply_fan_interaction(model, venue, response);
        }
        for syn in &expanded.synergies {
            model
                .interactions
                .add_synergy(venue, &syn.player_a, &syn.player_b, syn.value);
        }
        for dom in &expanded.dominations {
            model
                .interactions
                .add_domination(venue, &dom.dominator, &dom.dominated, dom.value);
        }
        for role in &expanded.role_impressions {
            if let Some(player) = model.players.get_mut(&role.player) {
                player.add_role_weight(&role.role, role.weight);
            }
        }
    }
}

/// Win/loss and goal-assist accrual. A drawn match (zero weighted diff) adds
/// nothing; there are no winners to credit.
fn apply_match_interactions(model: &mut ModelState, match_: &Match) {
    let weighted_diff = match_goal_diff(match_, &model.config);
    if weighted_diff == 0.0 {
        return;
    }

    let auto_synergy_win = model.config.auto_synergy_win;
    let auto_domination_win = model.config.auto_domination_win;
    let auto_synergy_goal_assist = model.config.auto_synergy_goal_assist;
    let venue = match_.venue.as_str();

    let (winners, losers) = if weighted_diff > 0.0 {
        (&match_.team_a, &match_.team_b)
    } else {
        (&match_.team_b, &match_.team_a)
    };

    for (i, a) in winners.iter().enumerate() {
        for b in &winners[i + 1..] {
            model.interactions.add_synergy(venue, a, b, auto_synergy_win);
        }
    }
    for (i, a) in losers.iter().enumerate() {
        for b in &losers[i + 1..] {
            model.interactions.add_synergy(venue, a, b, -auto_synergy_win);
        }
    }
    for winner in winners {
        for loser in losers {
            model.interactions.add_domination(venue, winner, loser, auto_domination_win);
            model.interactions.add_domination(venue, loser, winner, -auto_domination_win);
        }
    }

    // Assists queue up per (team, segment); each goal consumes the oldest
    // pending assist from its own side of the same segment
    let mut assist_queue: HashMap<(Team, usize), VecDeque<&String>> = HashMap::new();
    for event in &match_.events {
        let key = (event.team, event.segment_index);
        match event.event_type {
            EventType::Assist => assist_queue.entry(key).or_default().push_back(&event.player),
            EventType::Goal => {
                if let Some(assister) = assist_queue.get_mut(&key).and_then(|queue| queue.pop_front()) {
                    model
                        .interactions
                        .add_synergy(venue, &event.player, assister, auto_synergy_goal_assist);
                }
            }
        }
    }
}

fn apply_fan_interaction(model: &mut ModelState, venue: &str, response: &FanResponse) {
    match response.interaction_type {
        Some(InteractionKind::Synergy) => {
            if let Some(related) = &response.related_player {
                model
                    .interactions
                    .add_synergy(venue, &response.player, related, f64::from(response.polarity));
            }
        }
        Some(InteractionKind::Domination) => {
            if let Some(related) = &response.related_player {
                model
                    .interactions
                    .add_domination(venue, &response.player, related, f64::from(response.polarity));
            }
        }
        Some(InteractionKind::Role) => {
            if let Some(role) = &response.role {
                if let Some(player) = model.players.get_mut(&response.player) {
                    player.add_role_weight(role, f64::from(response.polarity));
                }
            }
        }
        _ => {}
    }
}
