// Speech-to-text through a hosted Whisper-compatible API
//
// - Common: response shapes, the response→Transcript mapper, WAV duration
// - Api: multipart upload client
//
// Another service plugs in by adding its response type, a
// TranscriptionMapper for it, and a Transcriber implementation.

pub mod api;
pub mod common;

use async_trait::async_trait;
use std::path::Path;

pub use api::ApiTranscriber;
pub use common::{audio_duration, TranscriptionMapper, VerboseJsonMapper, VerboseResponse};
use crate::config::TranscriberConfig;
use crate::error::Result;
use crate::transcript::Transcript;

/// Main trait for transcription operations
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file; `language` is an optional source-language hint
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the hosted API transcriber; `api_key` overrides the configured env var
    pub fn create_transcriber(config: TranscriberConfig, api_key: Option<String>) -> Box<dyn Transcriber> {
        Box::new(ApiTranscriber::new(config, api_key))
    }
}
