//! Rating and team-formation engine for small-sided football groups.
//!
//! The engine ingests finished matches (multi-segment scores plus per-segment
//! goal/assist events) and optional post-match peer feedback, updates player
//! ratings and pairwise interaction ledgers, and proposes balanced team
//! splits for upcoming matches. State is held per context in a [`model::ModelState`]
//! that the host persists through the opaque [`model::codec`].
//!
//! The engine is single-threaded per update and never performs I/O; loading,
//! storing and input validation are the host's concern.

pub mod model;
pub mod utils;
