use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-component trace of one player's rating change within a single update.
/// The host persists this verbatim for audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBreakdown {
    /// Share of the team impulse (after losing-team reweighting).
    pub result_delta: f64,
    /// Total goal + assist bonus.
    pub event_delta: f64,
    pub goal_delta: f64,
    pub assist_delta: f64,
    /// Combined quick-feedback adjustment after the per-player cap.
    pub quick_delta: f64,
    /// Anchor-vote component before the quick cap.
    pub mvp_delta: f64,
    /// Pairwise-comparison component before the quick cap.
    pub pairwise_delta: f64,
    /// Fan-polarity component before the quick cap.
    pub fan_delta: f64,
    /// Sum of the above after damping and guest acceleration, before the
    /// absolute cap.
    pub raw_delta: f64,
    /// Absolute cap in force for this match.
    pub cap: f64,
    pub final_delta: f64
}

/// Result of one learning update, keyed in participant order (team A first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub deltas: IndexMap<String, f64>,
    pub breakdown: IndexMap<String, PlayerBreakdown>
}
