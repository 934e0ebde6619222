//! Shared generators for unit and integration tests.

use crate::model::{
    config::Config,
    state::ModelState,
    structures::{
        match_data::{EventType, Match, MatchEvent, Segment, Team},
        player_state::PlayerState
    }
};

pub fn generate_model() -> ModelState {
    ModelState::empty(Config::default())
}

pub fn generate_segment(goals_a: i32, goals_b: i32, segment_index: usize, is_butt_game: bool) -> Segment {
    Segment {
        goals_a,
        goals_b,
        segment_index,
        is_butt_game
    }
}

pub fn generate_match(venue: &str, team_a: &[&str], team_b: &[&str], segments: Vec<Segment>) -> Match {
    Match {
        venue: venue.to_string(),
        team_a: team_a.iter().map(|s| s.to_string()).collect(),
        team_b: team_b.iter().map(|s| s.to_string()).collect(),
        segments,
        events: vec![],
        guests: Default::default()
    }
}

pub fn generate_match_with_guests(
    venue: &str,
    team_a: &[&str],
    team_b: &[&str],
    segments: Vec<Segment>,
    guests: &[&str]
) -> Match {
    let mut match_ = generate_match(venue, team_a, team_b, segments);
    match_.guests = guests.iter().map(|s| s.to_string()).collect();
    match_
}

pub fn generate_event(player: &str, team: Team, event_type: EventType, segment_index: usize) -> MatchEvent {
    MatchEvent {
        player: player.to_string(),
        team,
        event_type,
        segment_index
    }
}

/// Seeds a player with equal global and venue rating, the way a settled
/// regular looks at their home venue.
pub fn seed_player(model: &mut ModelState, name: &str, rating: f64, venue: &str) {
    let mut player = PlayerState::new(name.to_string(), rating);
    player.venue_ratings.insert(venue.to_string(), rating);
    model.players.insert(name.to_string(), player);
}
