pub use team_model::utils::test_utils::*;

use team_model::model::ModelState;

/// Pre-admits `count` regulars named `Regular1..RegularN` at 1000 on `venue`.
pub fn seed_regulars(model: &mut ModelState, count: usize, venue: &str) -> Vec<String> {
    (1..=count)
        .map(|i| {
            let name = format!("Regular{i}");
            seed_player(model, &name, 1000.0, venue);
            name
        })
        .collect()
}
