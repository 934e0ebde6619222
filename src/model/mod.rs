pub mod codec;
pub mod config;
pub mod feedback;
pub mod interactions;
pub mod learning;
pub mod ratings;
pub mod segments;
pub mod state;
pub mod structures;
pub mod teamgen;

pub use codec::{decode, encode, CodecError};
pub use config::Config;
pub use learning::{update_from_match, update_from_match_with_breakdown, UpdateError};
pub use state::ModelState;
pub use structures::breakdown::{PlayerBreakdown, UpdateOutcome};
pub use structures::feedback_data::{ExpandedFeedback, QuickFeedback};
pub use structures::match_data::{EventType, Match, MatchEvent, Segment, Team};
pub use structures::player_state::PlayerState;
pub use teamgen::{evaluate_split, generate_teams, suggest_quick_swaps, SplitCandidate, SwapSuggestion};
