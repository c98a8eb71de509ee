//! Voice over a faded music bed.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};
use unseen_moves_domain::{EpisodeError, Result};

use super::{AudioEncoder, AudioSegment};

/// Music left running after the last word.
pub const TRAILING_PAD_MS: u64 = 10_000;
/// Length of the bed's closing fade.
pub const FADE_OUT_MS: u64 = 5_000;

/// A music bed in the assets directory, with the gain it is mixed at and the
/// credit read out at the end of the episode.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundTrack {
    pub file_name: String,
    pub gain_db: f32,
    pub attribution: String,
}

impl BackgroundTrack {
    pub fn new(file_name: impl Into<String>, gain_db: f32, attribution: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            gain_db,
            attribution: attribution.into(),
        }
    }

    pub fn path_in(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join(&self.file_name)
    }
}

fn scott_buckley(title: &str) -> String {
    format!(r#""{title}" by Scott Buckley - released under CC-BY 4.0. www.scottbuckley.com.au"#)
}

/// The three beds episodes are published with.
pub fn default_catalog() -> Vec<BackgroundTrack> {
    vec![
        BackgroundTrack::new("sb_signaltonoise.mp3", -28.0, scott_buckley("Signal to Noise")),
        BackgroundTrack::new("sb_aurora.mp3", -20.0, scott_buckley("Aurora")),
        BackgroundTrack::new("HymnToTheDawn.mp3", -25.0, scott_buckley("Hymn To The Dawn")),
    ]
}

pub fn choose_track<'a, R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &'a [BackgroundTrack],
) -> Result<&'a BackgroundTrack> {
    catalog
        .choose(rng)
        .ok_or_else(|| EpisodeError::Configuration("background catalogue is empty".into()))
}

/// Lay `speech` over `background`.
///
/// The bed is cut to the speech length plus [`TRAILING_PAD_MS`], faded over
/// its last [`FADE_OUT_MS`] and attenuated by `gain_db`. Both tracks are
/// brought to the higher of their sample rates and channel counts first. The
/// result always lasts the speech plus the pad, even if the bed is shorter.
pub fn mix_episode(
    speech: &AudioSegment,
    background: &AudioSegment,
    gain_db: f32,
) -> Result<AudioSegment> {
    let sample_rate = speech.sample_rate().max(background.sample_rate());
    let channels = speech.channels().max(background.channels());
    let speech = speech.converted(sample_rate, channels)?;
    let background = background.converted(sample_rate, channels)?;

    let total_ms = speech.duration_ms() + TRAILING_PAD_MS;
    let bed = background
        .slice_to(total_ms)
        .fade_out(FADE_OUT_MS)
        .apply_gain(gain_db);

    debug!(
        sample_rate,
        channels,
        speech_ms = speech.duration_ms(),
        bed_ms = bed.duration_ms(),
        "Mixing episode"
    );

    AudioSegment::silent(total_ms, sample_rate, channels)
        .overlay(&bed)?
        .overlay(&speech)
}

/// Encode `mix` and write it to `<output_dir>/<game_id>.<ext>`.
pub async fn export<E: AudioEncoder>(
    encoder: &E,
    mix: &AudioSegment,
    output_dir: &Path,
    game_id: &str,
) -> Result<PathBuf> {
    let path = output_dir.join(format!("{game_id}.{}", encoder.format().extension()));
    let bytes = encoder.encode(mix)?;

    tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
        EpisodeError::FileProcessing(format!("{} could not be created: {e}", output_dir.display()))
    })?;
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        EpisodeError::FileProcessing(format!("{} could not be written: {e}", path.display()))
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "Episode written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::WavEncoder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn catalogue_matches_published_beds() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].gain_db, -28.0);
        assert_eq!(catalog[1].file_name, "sb_aurora.mp3");
        assert_eq!(
            catalog[2].attribution,
            r#""Hymn To The Dawn" by Scott Buckley - released under CC-BY 4.0. www.scottbuckley.com.au"#
        );
        assert_eq!(
            catalog[0].path_in(Path::new("assets")),
            Path::new("assets/sb_signaltonoise.mp3")
        );
    }

    #[test]
    fn empty_catalogue_is_a_configuration_error() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            choose_track(&mut rng, &[]),
            Err(EpisodeError::Configuration(_))
        ));
    }

    #[test]
    fn mix_runs_ten_seconds_past_the_speech() {
        let speech = AudioSegment::new(vec![1000; 8000], 8000, 1);
        let bed = AudioSegment::new(vec![2000; 60 * 16_000 * 2], 16_000, 2);
        let mix = mix_episode(&speech, &bed, -6.0).unwrap();

        assert_eq!(mix.sample_rate(), 16_000);
        assert_eq!(mix.channels(), 2);
        assert_eq!(mix.duration_ms(), 11_000);

        // Speech and the attenuated bed sum while the voice is on.
        let voiced = mix.samples()[2 * 8000];
        assert!((1970..=2040).contains(&voiced), "{voiced}");
        // The bed alone carries the pad, then fades to nothing.
        let pad = mix.samples()[2 * 16_000 * 3];
        assert!((990..=1010).contains(&pad), "{pad}");
        assert!(mix.samples().last().is_some_and(|&s| s.abs() < 5));
    }

    #[test]
    fn short_bed_still_yields_full_length() {
        let speech = AudioSegment::new(vec![0; 16_000], 16_000, 1);
        let bed = AudioSegment::new(vec![100; 1600], 16_000, 1);
        assert_eq!(mix_episode(&speech, &bed, 0.0).unwrap().duration_ms(), 11_000);
    }

    #[tokio::test]
    async fn export_writes_game_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mix = AudioSegment::silent(100, 8000, 1);
        let path = export(&WavEncoder, &mix, dir.path(), "abcd1234").await.unwrap();
        assert_eq!(path, dir.path().join("abcd1234.wav"));
        assert!(std::fs::metadata(&path).unwrap().len() > 44);
    }
}
