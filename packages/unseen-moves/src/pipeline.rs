//! One episode, end to end.

use std::path::PathBuf;

use rand::Rng;
use tracing::info;
use unseen_moves_domain::{EpisodeError, Result, SpeechSynthesizer};

use crate::audio::{
    AudioEncoder, BackgroundTrack, choose_track, decode_bytes, decode_file, default_catalog,
    export, mix_episode,
};
use crate::exercises::{generate_color_drill, generate_journey_drill};
use crate::explorer::{
    GameSource, fetch_candidate_games, fetch_game_record, pick_target_year, select_game,
};
use crate::narrator::{DEFAULT_PLIES, narrate_game};
use crate::script::compose_script;

/// Knobs for a run that are not collaborators.
#[derive(Debug, Clone)]
pub struct EpisodeSettings {
    /// Plies of the master game to narrate
    pub plies: usize,
    /// Directory the finished episode is written to
    pub output_dir: PathBuf,
    /// Directory holding the background tracks
    pub assets_dir: PathBuf,
    /// Where to keep the raw synthesised voice, if anywhere
    pub speech_file: Option<PathBuf>,
    pub catalog: Vec<BackgroundTrack>,
}

impl Default for EpisodeSettings {
    fn default() -> Self {
        Self {
            plies: DEFAULT_PLIES,
            output_dir: PathBuf::from("."),
            assets_dir: PathBuf::from("."),
            speech_file: None,
            catalog: default_catalog(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct EpisodeOutput {
    pub game_id: String,
    pub path: PathBuf,
    pub duration_ms: u64,
    pub script: String,
}

/// The pipeline with its collaborators wired in.
pub struct Episode<G, S, E> {
    source: G,
    synthesizer: S,
    encoder: E,
    settings: EpisodeSettings,
}

impl<G, S, E> Episode<G, S, E>
where
    G: GameSource,
    S: SpeechSynthesizer,
    E: AudioEncoder,
{
    pub fn new(source: G, synthesizer: S, encoder: E, settings: EpisodeSettings) -> Self {
        Self {
            source,
            synthesizer,
            encoder,
            settings,
        }
    }

    /// Generate drills, fetch and narrate a game, voice the script and write
    /// the mixed episode. Every random choice is drawn from `rng`.
    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EpisodeOutput> {
        let colors = generate_color_drill(rng);
        let journey = generate_journey_drill(rng);
        info!(
            piece = ?journey.piece,
            start = %journey.start,
            "Generated visualisation drills"
        );

        let year = pick_target_year(rng);
        let candidates = fetch_candidate_games(&self.source, year).await?;
        let summary = select_game(rng, &candidates)?;
        info!(
            game_id = %summary.id,
            white = %summary.white.name,
            black = %summary.black.name,
            year = summary.year,
            "Selected master game"
        );

        let record = fetch_game_record(&self.source, &summary.id).await?;
        let narration = narrate_game(&record, self.settings.plies)?;
        info!(plies = narration.plies(), "Narrated game");

        let track = choose_track(rng, &self.settings.catalog)?;
        let script = compose_script(&colors, &journey, &record, &narration, &track.attribution)?;
        info!(track = %track.file_name, chars = script.len(), "Composed script");

        let voice = self.synthesizer.synthesize(&script).await?;
        info!(bytes = voice.len(), "Synthesised speech");

        if let Some(path) = &self.settings.speech_file {
            tokio::fs::write(path, &voice).await.map_err(|e| {
                EpisodeError::FileProcessing(format!("{} could not be written: {e}", path.display()))
            })?;
        }

        let speech = decode_bytes(voice.to_vec())?;
        let background = decode_file(&track.path_in(&self.settings.assets_dir)).await?;
        let mix = mix_episode(&speech, &background, track.gain_db)?;
        let path = export(&self.encoder, &mix, &self.settings.output_dir, record.id()).await?;

        Ok(EpisodeOutput {
            game_id: record.id().to_string(),
            path,
            duration_ms: mix.duration_ms(),
            script,
        })
    }
}
