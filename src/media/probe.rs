use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SubforgeError};
use super::MediaCommandBuilder;

/// Raw ffprobe `-show_format -show_streams` output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub format: ProbeFormat,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    pub duration: Option<String>,
    pub format_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub r_frame_rate: Option<String>,
}

/// Read-only snapshot of a media file's container and stream metadata
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub has_audio: bool,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl From<ProbeOutput> for MediaInfo {
    fn from(probe: ProbeOutput) -> Self {
        let first_of = |kind: &str| {
            probe
                .streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some(kind))
        };
        let video = first_of("video");
        let audio = first_of("audio");

        Self {
            duration: probe
                .format
                .duration
                .as_deref()
                .and_then(|d| d.trim().parse::<f64>().ok())
                .unwrap_or(0.0),
            has_audio: audio.is_some(),
            video_codec: video.and_then(|s| s.codec_name.clone()),
            audio_codec: audio.and_then(|s| s.codec_name.clone()),
            width: video.and_then(|s| s.width).unwrap_or(0),
            height: video.and_then(|s| s.height).unwrap_or(0),
            fps: video
                .and_then(|s| s.r_frame_rate.as_deref())
                .map(parse_frame_rate)
                .unwrap_or(0.0),
        }
    }
}

impl MediaInfo {
    /// Parse ffprobe JSON output
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let probe: ProbeOutput = serde_json::from_slice(json)
            .map_err(|e| SubforgeError::Media(format!("Failed to parse probe output: {}", e)))?;
        Ok(probe.into())
    }
}

/// Frame rate as `num/den` or a plain number; 0.0 when unparseable
pub fn parse_frame_rate(rate: &str) -> f64 {
    let parsed = match rate.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(num), Ok(den)) if den != 0.0 => Some(num / den),
            _ => None,
        },
        None => rate.trim().parse::<f64>().ok(),
    };
    parsed.filter(|fps| fps.is_finite()).unwrap_or(0.0)
}

/// Run ffprobe against `path` and parse the result
pub async fn probe_media<P: AsRef<Path>>(ffprobe_path: &str, path: P) -> Result<MediaInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SubforgeError::Media(format!("Media file not found: {}", path.display())));
    }

    debug!("Probing media file: {}", path.display());

    let stdout = MediaCommandBuilder::new(ffprobe_path)
        .custom(format!("Probing {}", path.display()))
        .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
        .output(path)
        .execute(SubforgeError::Media)
        .await?;

    MediaInfo::from_json(&stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080, "r_frame_rate": "30000/1001"},
            {"index": 1, "codec_type": "audio", "codec_name": "aac", "sample_rate": "48000"},
            {"index": 2, "codec_type": "audio", "codec_name": "opus"}
        ],
        "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "3600.250000"}
    }"#;

    #[test]
    fn test_parse_full_probe() {
        let info = MediaInfo::from_json(SAMPLE.as_bytes()).unwrap();

        assert_eq!(info.duration, 3600.25);
        assert!(info.has_audio);
        assert_eq!(info.video_codec.as_deref(), Some("h264"));
        assert_eq!(info.audio_codec.as_deref(), Some("aac"));
        assert_eq!((info.width, info.height), (1920, 1080));
        assert!((info.fps - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let info = MediaInfo::from_json(br#"{"streams": [{"codec_type": "audio", "codec_name": "mp3"}], "format": {}}"#).unwrap();

        assert_eq!(info.duration, 0.0);
        assert!(info.has_audio);
        assert_eq!(info.video_codec, None);
        assert_eq!((info.width, info.height), (0, 0));
        assert_eq!(info.fps, 0.0);
    }

    #[test]
    fn test_garbage_is_media_error() {
        assert!(matches!(MediaInfo::from_json(b"not json"), Err(SubforgeError::Media(_))));
    }

    #[test]
    fn test_frame_rate_forms() {
        assert_eq!(parse_frame_rate("25/1"), 25.0);
        assert_eq!(parse_frame_rate("24"), 24.0);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("abc"), 0.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_media_error() {
        let err = probe_media("ffprobe", "/nonexistent/clip.mp4").await.unwrap_err();
        assert!(matches!(err, SubforgeError::Media(_)));
    }
}
