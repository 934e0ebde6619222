use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

/// MVP / brought-down-the-team tallies for one player, already summed across
/// all submitted survey forms by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorVote {
    #[serde(default)]
    pub mvp: i32,
    #[serde(default)]
    pub brought_down: i32
}

/// One "X played stronger than Y" verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub stronger: String,
    pub weaker: String
}

/// What a fan response is about, beyond the bare polarity.
///
/// `GuestPeer` responses come from the guest-survey surface and never touch
/// ratings or interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InteractionKind {
    Synergy,
    Domination,
    Role,
    GuestPeer
}

/// A single thumbs-up/down style response about one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanResponse {
    pub player: String,
    /// +1 or -1.
    pub polarity: i32,
    #[serde(default)]
    pub interaction_type: Option<InteractionKind>,
    #[serde(default)]
    pub related_player: Option<String>,
    #[serde(default)]
    pub role: Option<String>
}

/// Explicit "these two click together" feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyFeedback {
    pub player_a: String,
    pub player_b: String,
    #[serde(default = "default_weight")]
    pub value: f64
}

/// Explicit "A has B's number" feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominationFeedback {
    pub dominator: String,
    pub dominated: String,
    #[serde(default = "default_weight")]
    pub value: f64
}

/// A role impression ("mostly played as a defender") with a weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleFeedback {
    pub player: String,
    pub role: String,
    #[serde(default = "default_weight")]
    pub weight: f64
}

fn default_weight() -> f64 {
    1.0
}

/// The short post-match survey, normalized by the host. The only feedback
/// form that can nudge ratings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickFeedback {
    #[serde(default)]
    pub anchors: BTreeMap<String, AnchorVote>,
    #[serde(default)]
    pub pairwise: Vec<PairwiseComparison>,
    #[serde(default)]
    pub fan_responses: Vec<FanResponse>
}

/// The long-form survey. Feeds interactions and role tendencies only; it
/// never changes rating deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedFeedback {
    #[serde(default)]
    pub fan_responses: Vec<FanResponse>,
    #[serde(default)]
    pub synergies: Vec<SynergyFeedback>,
    #[serde(default)]
    pub dominations: Vec<DominationFeedback>,
    #[serde(default)]
    pub role_impressions: Vec<RoleFeedback>
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_kind_wire_names() {
        assert_eq!(serde_json::to_string(&InteractionKind::GuestPeer).unwrap(), "\"guest_peer\"");
        assert_eq!(
            serde_json::from_str::<InteractionKind>("\"domination\"").unwrap(),
            InteractionKind::Domination
        );
    }

    #[test]
    fn test_feedback_defaults() {
        let quick: QuickFeedback = serde_json::from_str("{}").unwrap();
        assert!(quick.anchors.is_empty());
        assert!(quick.pairwise.is_empty());

        let syn: SynergyFeedback = serde_json::from_str(r#"{"player_a": "A", "player_b": "B"}"#).unwrap();
        assert_eq!(syn.value, 1.0);
    }
}
