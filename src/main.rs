mod args;

use args::{Args, Command};
use clap::Parser;
use serde_json::json;
use std::{fs, path::Path};
use team_model::{
    model::{self, Config, ExpandedFeedback, Match, ModelState, QuickFeedback},
    utils::progress_utils::progress_bar
};
use tracing::info;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&args.log_level))
        .init();

    let mut state = load_state(&args.state);

    match args.command {
        Command::Update {
            match_file,
            quick,
            expanded
        } => {
            let match_: Match = read_json(&match_file);
            let quick: Option<QuickFeedback> = quick.map(|path| read_json(&path));
            let expanded: Option<ExpandedFeedback> = expanded.map(|path| read_json(&path));

            let outcome = model::update_from_match_with_breakdown(&mut state, &match_, quick.as_ref(), expanded.as_ref())
                .expect("match must satisfy the ingestion contract");

            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).expect("outcome must serialize")
            );
            save_state(&args.state, &state);
        }
        Command::Teams {
            venue,
            players,
            top_n,
            swaps
        } => {
            let splits = model::generate_teams(&state, &players, &venue, top_n);
            let swap_suggestions = match (swaps, splits.first()) {
                (true, Some(best)) => model::suggest_quick_swaps(&state, best, &splits, &venue, top_n),
                _ => Vec::new()
            };

            let report = json!({ "splits": splits, "swaps": swap_suggestions });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report must serialize")
            );
        }
        Command::Replay { matches } => {
            let content = fs::read_to_string(&matches).expect("match log must be readable");
            let lines: Vec<&str> = content.lines().filter(|line| !line.trim().is_empty()).collect();

            let bar = progress_bar(lines.len() as u64, "Replaying match log".to_string());
            for line in lines {
                let match_: Match = serde_json::from_str(line).expect("each line must hold one match object");
                model::update_from_match(&mut state, &match_, None, None)
                    .expect("replayed match must satisfy the ingestion contract");
                bar.inc(1);
            }
            bar.finish();

            save_state(&args.state, &state);

            let mut ratings: Vec<(&String, f64)> = state
                .players
                .iter()
                .map(|(name, player)| (name, player.global_rating))
                .collect();
            ratings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            for (name, rating) in ratings {
                println!("{rating:>8.1}  {name}");
            }
        }
    }
}

fn load_state(path: &Path) -> ModelState {
    match fs::read(path) {
        Ok(blob) => model::decode(&blob).expect("state blob must decode"),
        Err(_) => {
            info!("no state blob at {}, starting from an empty state", path.display());
            ModelState::empty(Config::default())
        }
    }
}

fn save_state(path: &Path, state: &ModelState) {
    let blob = model::encode(state).expect("state must encode");
    fs::write(path, &blob).expect("state blob must be writable");
    info!(
        "saved state: {} players, {} bytes at {}",
        state.players.len(),
        blob.len(),
        path.display()
    );
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path).expect("input file must be readable");
    serde_json::from_str(&content).expect("input file must hold valid JSON for its schema")
}
