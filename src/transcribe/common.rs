use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SubforgeError};
use crate::transcript::{Segment, Transcript};

/// `verbose_json` body of a Whisper-compatible transcription endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerboseResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<ApiSegment>,
    pub language: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

/// Converts a service-specific response into a `Transcript`
pub trait TranscriptionMapper<T> {
    fn to_transcript(output: T, audio_path: &Path, language: Option<&str>) -> Transcript;
}

pub struct VerboseJsonMapper;

impl TranscriptionMapper<VerboseResponse> for VerboseJsonMapper {
    fn to_transcript(output: VerboseResponse, audio_path: &Path, language: Option<&str>) -> Transcript {
        let segments = output
            .segments
            .into_iter()
            .map(|seg| Segment::new(seg.start, seg.end, seg.text))
            .collect();

        Transcript {
            text: output.text,
            segments,
            audio_file: audio_path.to_path_buf(),
            duration: audio_duration(audio_path),
            language: language.map(str::to_string),
        }
    }
}

/// Parse a response body according to the requested `response_format`.
///
/// Only `verbose_json` carries segments; `json` yields the text alone and
/// anything else is taken as a plain-text body.
pub fn parse_response(body: &str, response_format: &str, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
    match response_format {
        "verbose_json" | "json" => {
            let mut output: VerboseResponse = serde_json::from_str(body)
                .map_err(|e| SubforgeError::Transcription(format!("Failed to parse API response: {}", e)))?;
            if response_format == "json" {
                output.segments.clear();
            }
            Ok(VerboseJsonMapper::to_transcript(output, audio_path, language))
        }
        _ => Ok(VerboseJsonMapper::to_transcript(
            VerboseResponse {
                text: body.trim().to_string(),
                ..VerboseResponse::default()
            },
            audio_path,
            language,
        )),
    }
}

/// Audio duration in seconds from the WAV header; 0.0 when unreadable
pub fn audio_duration(path: &Path) -> f64 {
    match hound::WavReader::open(path) {
        Ok(reader) => {
            let spec = reader.spec();
            if spec.sample_rate == 0 {
                return 0.0;
            }
            reader.duration() as f64 / spec.sample_rate as f64
        }
        Err(e) => {
            debug!("Could not read WAV header of {}: {}", path.display(), e);
            0.0
        }
    }
}

/// Basename sent as the multipart file name
pub fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio.wav".to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    /// Write `seconds` of 16 kHz mono silence
    pub fn write_silence(path: &Path, seconds: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(16_000 * seconds) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
}
