//! Container formats an episode can be written in.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudioFormat {
    /// MPEG-1 Layer III, the published podcast format.
    #[default]
    Mp3,
    /// RIFF/WAVE with 16-bit PCM samples.
    Wav,
}

impl AudioFormat {
    /// File extension, without the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" | "wave" => Ok(Self::Wav),
            other => Err(format!("unsupported audio format '{other}', expected mp3 or wav")),
        }
    }
}
