//! Who reads the episode and with which engine.

/// A named voice, the BCP-47 tag it speaks and the synthesis engine rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub voice: String,
    pub language: String,
    /// Engine name as the synthesis service spells it, e.g. `neural`.
    pub engine: String,
}

impl VoiceProfile {
    pub fn new(
        voice: impl Into<String>,
        language: impl Into<String>,
        engine: impl Into<String>,
    ) -> Self {
        Self {
            voice: voice.into(),
            language: language.into(),
            engine: engine.into(),
        }
    }

    /// The British English neural voice episodes are published with.
    pub fn amy() -> Self {
        Self::new("Amy", "en-GB", "neural")
    }
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self::amy()
    }
}
