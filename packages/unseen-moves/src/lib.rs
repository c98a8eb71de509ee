//! Unseen Moves episode generator.
//!
//! One run walks a straight pipeline: drills over random squares, a master
//! game from the Lichess explorer narrated move by move, an SSML script,
//! Polly speech, and a music bed mixed underneath. Each stage lives in its
//! own module and [`pipeline::Episode`] wires them together around injected
//! collaborators.

pub mod audio;
pub mod cli;
pub mod exercises;
pub mod explorer;
pub mod narrator;
pub mod pgn;
pub mod pipeline;
pub mod script;
pub mod ssml;

pub use pipeline::{Episode, EpisodeOutput, EpisodeSettings};
pub use unseen_moves_domain::{EpisodeError, Result};
