use serde::{Deserialize, Serialize};

/// Tuning constants for the rating and team-formation engine.
///
/// The bundle is immutable once built and travels inside the serialized
/// model state, so historical blobs replay under the constants they were
/// written with. Tests inject variants through struct update syntax on
/// `Config::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed rating for a newly admitted non-guest player.
    pub global_start_rating: f64,
    /// Seed rating for a venue entry created at first participation.
    pub venue_start_rating: f64,

    /// Venue share of the effective-rating blend. Must sum to 1 with the
    /// global share.
    pub rating_eff_venue_weight: f64,
    pub rating_eff_global_weight: f64,

    pub segment_weight_first: f64,
    pub segment_weight_middle: f64,
    pub segment_weight_last: f64,

    pub butt_game_segment_multiplier: f64,
    pub butt_game_event_multiplier: f64,

    pub event_base_goal: f64,
    pub event_base_assist: f64,
    pub event_scale: f64,

    pub anchor_step1: f64,
    pub anchor_step2_to_4: f64,
    pub anchor_step5_plus: f64,

    pub pairwise_delta: f64,
    pub pairwise_clamp: f64,

    pub fan_delta: f64,
    pub fan_clamp: f64,

    /// Quick-feedback cap as a fraction of the base-delta magnitude.
    pub quick_adjustment_cap_pct: f64,

    /// Damping kicks in for positive deltas once the effective rating exceeds
    /// the match average by this much.
    pub top_player_thresh: f64,
    pub top_player_band1: f64,
    pub top_player_band2: f64,
    pub top_player_mult1: f64,
    pub top_player_mult2: f64,
    pub top_player_mult3: f64,

    pub guest_initial_offset: f64,
    pub guest_initial_min: f64,
    pub guest_initial_max: f64,
    pub guest_learning_mult_first2: f64,
    pub guest_learning_mult_third: f64,

    /// Absolute per-match cap as a fraction of the average effective rating.
    pub cap_pct: f64,

    pub teamgen_synergy_weight: f64,
    pub teamgen_domination_weight: f64,
    pub teamgen_role_weight: f64,
    /// Minimum number of players by which a further suggestion must differ
    /// from every already-selected one.
    pub teamgen_overlap_min_diff: usize,
    pub teamgen_top_k: usize,
    pub teamgen_top_max_per_team: usize,
    pub teamgen_top_penalty: f64,

    pub auto_synergy_win: f64,
    pub auto_domination_win: f64,
    pub auto_synergy_goal_assist: f64
}

impl Default for Config {
    fn default() -> Config {
        Config {
            global_start_rating: 1000.0,
            venue_start_rating: 1000.0,

            rating_eff_venue_weight: 0.60,
            rating_eff_global_weight: 0.40,

            segment_weight_first: 0.3,
            segment_weight_middle: 0.6,
            segment_weight_last: 1.0,

            butt_game_segment_multiplier: 1.375,
            butt_game_event_multiplier: 1.75,

            event_base_goal: 10.0,
            event_base_assist: 6.0,
            event_scale: 0.6,

            anchor_step1: 15.0,
            anchor_step2_to_4: 2.0,
            anchor_step5_plus: 1.0,

            pairwise_delta: 4.0,
            pairwise_clamp: 12.0,

            fan_delta: 2.0,
            fan_clamp: 6.0,

            quick_adjustment_cap_pct: 0.9,

            top_player_thresh: 500.0,
            top_player_band1: 100.0,
            top_player_band2: 200.0,
            top_player_mult1: 0.9,
            top_player_mult2: 0.75,
            top_player_mult3: 0.6,

            guest_initial_offset: 40.0,
            guest_initial_min: 850.0,
            guest_initial_max: 1150.0,
            guest_learning_mult_first2: 1.35,
            guest_learning_mult_third: 1.15,

            cap_pct: 0.08,

            teamgen_synergy_weight: 0.002,
            teamgen_domination_weight: 0.002,
            teamgen_role_weight: 0.01,
            teamgen_overlap_min_diff: 2,
            teamgen_top_k: 4,
            teamgen_top_max_per_team: 2,
            teamgen_top_penalty: 50.0,

            auto_synergy_win: 0.5,
            auto_domination_win: 0.3,
            auto_synergy_goal_assist: 0.4
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_blend_weights_sum_to_one() {
        let cfg = Config::default();
        assert_abs_diff_eq!(cfg.rating_eff_venue_weight + cfg.rating_eff_global_weight, 1.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"cap_pct": 0.1}"#).unwrap();
        assert_abs_diff_eq!(cfg.cap_pct, 0.1);
        assert_abs_diff_eq!(cfg.global_start_rating, 1000.0);
    }
}
