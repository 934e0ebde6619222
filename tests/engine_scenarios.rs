//! End-to-end scenarios driving the learning update and the team generator
//! through the public API, the way the host does.

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use team_model::model::{
    generate_teams, update_from_match, update_from_match_with_breakdown,
    structures::feedback_data::AnchorVote, QuickFeedback
};

#[test]
fn even_teams_two_nil_no_events() {
    let mut model = generate_model();
    let match_ = generate_match("V1", &["A", "B"], &["C", "D"], vec![generate_segment(2, 0, 0, false)]);

    let deltas = update_from_match(&mut model, &match_, None, None).unwrap();

    assert_abs_diff_eq!(deltas["A"], 60.0);
    assert_abs_diff_eq!(deltas["B"], 60.0);
    assert_abs_diff_eq!(deltas["C"], -60.0);
    assert_abs_diff_eq!(deltas["D"], -60.0);

    assert_abs_diff_eq!(model.players["A"].global_rating, 1060.0);
    assert_abs_diff_eq!(model.players["A"].venue_ratings["V1"], 1060.0);
    assert_abs_diff_eq!(model.players["C"].global_rating, 940.0);
}

#[test]
fn three_nil_hits_the_absolute_cap() {
    let mut model = generate_model();
    let match_ = generate_match("V1", &["A", "B"], &["C", "D"], vec![generate_segment(3, 0, 0, false)]);

    let outcome = update_from_match_with_breakdown(&mut model, &match_, None, None).unwrap();

    // Pre-cap impulse 180 gives 90 per winner; the cap is 1000 * 0.08
    assert_abs_diff_eq!(outcome.breakdown["A"].raw_delta, 90.0);
    assert_abs_diff_eq!(outcome.breakdown["A"].cap, 80.0);
    for (name, expected) in [("A", 80.0), ("B", 80.0), ("C", -80.0), ("D", -80.0)] {
        assert_abs_diff_eq!(outcome.deltas[name], expected);
    }
}

#[test]
fn guest_is_shaded_and_learns_faster() {
    let mut model = generate_model();
    seed_regulars(&mut model, 3, "V1");

    let match_ = generate_match_with_guests(
        "V1",
        &["Guest", "Regular1"],
        &["Regular2", "Regular3"],
        vec![generate_segment(1, 0, 0, false)],
        &["Guest"]
    );

    let deltas = update_from_match(&mut model, &match_, None, None).unwrap();

    // Admitted at avg - 40, then moved by this match's delta
    let guest = &model.players["Guest"];
    assert!(guest.is_guest);
    assert_abs_diff_eq!(guest.global_rating, 960.0 + deltas["Guest"]);
    assert_eq!(guest.guest_matches, 1);

    // Same base share, amplified by the first-two-matches multiplier
    assert_abs_diff_eq!(deltas["Guest"], deltas["Regular1"] * 1.35, epsilon = 1e-9);
    assert!(deltas["Guest"] > deltas["Regular1"]);
}

#[test]
fn star_gains_are_damped() {
    let mut model = generate_model();
    seed_player(&mut model, "Star", 1700.0, "V1");
    for name in ["A2", "B2", "C2"] {
        seed_player(&mut model, name, 1000.0, "V1");
    }

    let match_ = generate_match("V1", &["Star", "A2"], &["B2", "C2"], vec![generate_segment(1, 0, 0, false)]);
    let deltas = update_from_match(&mut model, &match_, None, None).unwrap();

    // avg 1175, Star sits 25 above avg + 500: band 1, multiplier 0.9
    assert_abs_diff_eq!(deltas["A2"], 30.0);
    assert_abs_diff_eq!(deltas["Star"], 27.0);
    assert!(deltas["Star"] < deltas["A2"]);
}

#[test]
fn anchor_votes_are_capped_by_the_base_delta() {
    let mut quick = QuickFeedback::default();
    quick.anchors.insert(
        "X".to_string(),
        AnchorVote {
            mvp: 2,
            brought_down: 0
        }
    );

    // Drawn match: zero base delta pins the quick adjustment to zero
    let mut model = generate_model();
    let draw = generate_match("V1", &["X", "B"], &["C", "D"], vec![generate_segment(0, 0, 0, false)]);
    let deltas = update_from_match(&mut model, &draw, Some(&quick), None).unwrap();
    assert_abs_diff_eq!(deltas["X"], 0.0);

    // A win gives room: anchor_delta(2) = 17 rides on top of the base 30
    let mut model = generate_model();
    let win = generate_match("V1", &["X", "B"], &["C", "D"], vec![generate_segment(1, 0, 0, false)]);
    let outcome = update_from_match_with_breakdown(&mut model, &win, Some(&quick), None).unwrap();
    assert_abs_diff_eq!(outcome.breakdown["X"].mvp_delta, 17.0);
    assert_abs_diff_eq!(outcome.breakdown["X"].quick_delta, 17.0);
    assert_abs_diff_eq!(outcome.deltas["X"], 47.0);
}

#[test]
fn generated_splits_are_deterministic_and_anchored() {
    let mut model = generate_model();
    for (name, rating) in [("A", 1100.0), ("B", 1000.0), ("C", 1000.0), ("D", 900.0)] {
        seed_player(&mut model, name, rating, "V1");
    }
    let participants: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();

    let splits = generate_teams(&model, &participants, "V1", 3);
    let rerun = generate_teams(&model, &participants, "V1", 3);

    assert_eq!(splits, rerun);
    assert_eq!(splits.len(), 3);

    // The best split has the smallest gap and the lexicographic anchor in A
    for split in &splits {
        assert!(split.d_hat.abs() >= splits[0].d_hat.abs() || split.score >= splits[0].score);
        assert!(split.team_a.contains(&"A".to_string()));
    }
    assert_abs_diff_eq!(splits[0].d_hat, 0.0);

    // No unordered team pair appears twice
    let mut seen: Vec<(Vec<String>, Vec<String>)> = Vec::new();
    for split in &splits {
        let mut a = split.team_a.clone();
        let mut b = split.team_b.clone();
        a.sort();
        b.sort();
        let norm = if a <= b { (a, b) } else { (b, a) };
        assert!(!seen.contains(&norm));
        seen.push(norm);
    }
}
