//! Distills normalized post-match survey answers into per-player rating
//! nudges. The three components (anchor votes, pairwise verdicts, fan
//! polarities) are computed separately so the learning update can report them
//! individually in its breakdown.

use crate::model::{
    config::Config,
    structures::feedback_data::{FanResponse, InteractionKind, PairwiseComparison, QuickFeedback}
};
use std::collections::HashMap;

/// Rating nudge for a net anchor-vote count (`mvp - brought_down`).
///
/// Successive net votes follow the step schedule
/// `[step1, step2_to_4, step2_to_4, step2_to_4, step5_plus, ...]`; the sum is
/// signed by the net count. The first vote moves the needle, pile-ons barely
/// do.
pub fn anchor_delta(net_votes: i32, cfg: &Config) -> f64 {
    let magnitude: f64 = (1..=net_votes.unsigned_abs())
        .map(|idx| {
            if idx == 1 {
                cfg.anchor_step1
            } else if idx <= 4 {
                cfg.anchor_step2_to_4
            } else {
                cfg.anchor_step5_plus
            }
        })
        .sum();

    if net_votes < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Anchor deltas for every player voted on.
pub fn anchor_deltas(quick: &QuickFeedback, cfg: &Config) -> HashMap<String, f64> {
    let mut deltas: HashMap<String, f64> = HashMap::new();
    for (player, anchor) in &quick.anchors {
        let net = anchor.mvp - anchor.brought_down;
        *deltas.entry(player.clone()).or_insert(0.0) += anchor_delta(net, cfg);
    }
    deltas
}

/// Each comparison credits the stronger player and debits the weaker one;
/// the per-player sum is clamped to `±pairwise_clamp`.
pub fn pairwise_deltas(pairwise: &[PairwiseComparison], cfg: &Config) -> HashMap<String, f64> {
    let mut deltas: HashMap<String, f64> = HashMap::new();
    for comp in pairwise {
        *deltas.entry(comp.stronger.clone()).or_insert(0.0) += cfg.pairwise_delta;
        *deltas.entry(comp.weaker.clone()).or_insert(0.0) -= cfg.pairwise_delta;
    }
    for value in deltas.values_mut() {
        *value = value.clamp(-cfg.pairwise_clamp, cfg.pairwise_clamp);
    }
    deltas
}

/// Fan polarities as rating nudges, clamped per player. `guest_peer`
/// responses are survey-only and never touch ratings.
pub fn fan_rating_deltas(responses: &[FanResponse], cfg: &Config) -> HashMap<String, f64> {
    let mut deltas: HashMap<String, f64> = HashMap::new();
    for response in responses {
        if response.interaction_type == Some(InteractionKind::GuestPeer) {
            continue;
        }
        let value = if response.polarity > 0 {
            cfg.fan_delta
        } else {
            -cfg.fan_delta
        };
        *deltas.entry(response.player.clone()).or_insert(0.0) += value;
    }
    for value in deltas.values_mut() {
        *value = value.clamp(-cfg.fan_clamp, cfg.fan_clamp);
    }
    deltas
}

/// Anchor + pairwise + fan nudges summed per player. This is the raw figure
/// the quick-adjustment cap is applied to during the learning update.
pub fn quick_adjustments(quick: &QuickFeedback, cfg: &Config) -> HashMap<String, f64> {
    let mut deltas = anchor_deltas(quick, cfg);
    for (player, value) in pairwise_deltas(&quick.pairwise, cfg) {
        *deltas.entry(player).or_insert(0.0) += value;
    }
    for (player, value) in fan_rating_deltas(&quick.fan_responses, cfg) {
        *deltas.entry(player).or_insert(0.0) += value;
    }
    deltas
}
