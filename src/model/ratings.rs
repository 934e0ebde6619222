use crate::model::{config::Config, structures::player_state::PlayerState};

/// Blended venue-plus-global rating used for averages and team generation.
pub fn effective_rating(player: &PlayerState, venue: &str, cfg: &Config) -> f64 {
    let venue_rating = player.venue_rating(venue, cfg.venue_start_rating);
    cfg.rating_eff_venue_weight * venue_rating + cfg.rating_eff_global_weight * player.global_rating
}

/// Arithmetic mean of effective ratings; 0 for an empty lineup.
pub fn avg_match_rating<'a, I>(players: I, venue: &str, cfg: &Config) -> f64
where
    I: IntoIterator<Item = &'a PlayerState>
{
    mean(players.into_iter().map(|p| effective_rating(p, venue, cfg)))
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (count, sum) = values.fold((0usize, 0.0), |(count, sum), v| (count + 1, sum + v));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_effective_rating_blend() {
        let cfg = Config::default();
        let mut player = PlayerState::new("A".to_string(), 1000.0);
        player.venue_ratings.insert("V1".to_string(), 1100.0);

        // 0.6 * 1100 + 0.4 * 1000
        assert_abs_diff_eq!(effective_rating(&player, "V1", &cfg), 1060.0);
    }

    #[test]
    fn test_effective_rating_unseen_venue_defaults() {
        let cfg = Config::default();
        let player = PlayerState::new("A".to_string(), 1200.0);

        // 0.6 * 1000 + 0.4 * 1200
        assert_abs_diff_eq!(effective_rating(&player, "V1", &cfg), 1080.0);
    }

    #[test]
    fn test_avg_match_rating() {
        let cfg = Config::default();
        let players = vec![
            PlayerState::new("A".to_string(), 900.0),
            PlayerState::new("B".to_string(), 1100.0),
        ];

        // Venue ratings default to 1000 for both, so the blend averages out
        assert_abs_diff_eq!(avg_match_rating(&players, "V1", &cfg), 1000.0);
        assert_abs_diff_eq!(avg_match_rating(std::iter::empty::<&PlayerState>(), "V1", &cfg), 0.0);
    }
}
