//! The fixed output encoding profile.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output video codec (H.264)
pub const VIDEO_CODEC: &str = "libx264";
/// Output audio codec
pub const AUDIO_CODEC: &str = "aac";
/// Constant Rate Factor for all encodes
pub const CRF: u8 = 23;
/// Pixel format required for broad player compatibility
pub const PIX_FMT: &str = "yuv420p";
/// Frame rate for generated clips
pub const FPS: u32 = 30;

/// The single H.264/AAC output profile every encode in the pipeline uses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodingProfile {
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Constant Rate Factor (0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    #[serde(default = "default_pix_fmt")]
    pub pix_fmt: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
}

fn default_codec() -> String {
    VIDEO_CODEC.to_string()
}
fn default_crf() -> u8 {
    CRF
}
fn default_pix_fmt() -> String {
    PIX_FMT.to_string()
}
fn default_audio_codec() -> String {
    AUDIO_CODEC.to_string()
}

impl Default for EncodingProfile {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            crf: default_crf(),
            pix_fmt: default_pix_fmt(),
            audio_codec: default_audio_codec(),
        }
    }
}

impl EncodingProfile {
    /// Video-only FFmpeg output arguments.
    pub fn video_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.codec.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-pix_fmt".to_string(),
            self.pix_fmt.clone(),
        ]
    }

    /// Full FFmpeg output arguments including the audio codec.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let mut args = self.video_args();
        args.extend(["-c:a".to_string(), self.audio_codec.clone()]);
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = EncodingProfile::default();
        assert_eq!(profile.codec, "libx264");
        assert_eq!(profile.crf, 23);
        assert_eq!(profile.pix_fmt, "yuv420p");
    }

    #[test]
    fn test_ffmpeg_args() {
        let args = EncodingProfile::default().to_ffmpeg_args();
        assert!(args.contains(&"-crf".to_string()));
        assert!(args.contains(&"23".to_string()));
        assert!(args.contains(&"aac".to_string()));
    }
}
