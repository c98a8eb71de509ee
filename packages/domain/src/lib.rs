//! # Unseen Moves Domain
//!
//! Shared domain objects and types for the unseen-moves workspace.
//!
//! This crate holds the error taxonomy every pipeline stage reports through,
//! the small value types describing how an episode is voiced and encoded,
//! and the [`SpeechSynthesizer`] seam that lets the pipeline run against a
//! cloud engine in production and a stub in tests.

pub mod audio_format;
pub mod episode_error;
pub mod speech_synthesizer;
pub mod voice;

pub use audio_format::AudioFormat;
pub use episode_error::{EpisodeError, Result};
pub use speech_synthesizer::SpeechSynthesizer;
pub use voice::VoiceProfile;
