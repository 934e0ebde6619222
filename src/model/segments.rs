use crate::model::{config::Config, structures::match_data::Segment};

/// Weight applied to a segment's goal differential. Openers count least, the
/// decisive last segment counts in full; a lone segment counts as last.
pub fn segment_weight(index: usize, total: usize, cfg: &Config) -> f64 {
    if total <= 1 {
        return cfg.segment_weight_last;
    }
    if index == 0 {
        return cfg.segment_weight_first;
    }
    if index == total - 1 {
        return cfg.segment_weight_last;
    }
    cfg.segment_weight_middle
}

/// Sum of per-segment goal differentials, weighted by segment position and
/// amplified for butt games. An empty match yields 0.
pub fn weighted_goal_diff(segments: &[Segment], cfg: &Config) -> f64 {
    let total = segments.len();
    segments
        .iter()
        .map(|seg| {
            let diff = f64::from(seg.goals_a - seg.goals_b);
            let weight = segment_weight(seg.segment_index, total, cfg);
            let mult = if seg.is_butt_game {
                cfg.butt_game_segment_multiplier
            } else {
                1.0
            };
            diff * weight * mult
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::generate_segment;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_segment_uses_last_weight() {
        let cfg = Config::default();
        assert_abs_diff_eq!(segment_weight(0, 1, &cfg), cfg.segment_weight_last);
    }

    #[test]
    fn test_three_segment_weights() {
        let cfg = Config::default();
        assert_abs_diff_eq!(segment_weight(0, 3, &cfg), 0.3);
        assert_abs_diff_eq!(segment_weight(1, 3, &cfg), 0.6);
        assert_abs_diff_eq!(segment_weight(2, 3, &cfg), 1.0);
    }

    #[test]
    fn test_weighted_goal_diff() {
        let cfg = Config::default();
        let segments = vec![
            generate_segment(2, 0, 0, false),
            generate_segment(0, 1, 1, false),
            generate_segment(1, 0, 2, false),
        ];

        // 2*0.3 - 1*0.6 + 1*1.0
        assert_abs_diff_eq!(weighted_goal_diff(&segments, &cfg), 1.0);
    }

    #[test]
    fn test_butt_game_segment_amplified() {
        let cfg = Config::default();
        let segments = vec![generate_segment(1, 0, 0, true)];

        assert_abs_diff_eq!(weighted_goal_diff(&segments, &cfg), cfg.butt_game_segment_multiplier);
    }

    #[test]
    fn test_no_segments_is_zero() {
        let cfg = Config::default();
        assert_abs_diff_eq!(weighted_goal_diff(&[], &cfg), 0.0);
    }
}
