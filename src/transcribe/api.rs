// Whisper-compatible hosted transcription (Groq, OpenAI and friends)

use async_trait::async_trait;
use reqwest::{multipart, Client};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{resolve_api_key, TranscriberConfig};
use crate::error::{Result, SubforgeError};
use crate::transcript::Transcript;
use super::common::{parse_response, upload_file_name};
use super::Transcriber;

pub struct ApiTranscriber {
    client: Client,
    config: TranscriberConfig,
    api_key: Option<String>,
}

impl ApiTranscriber {
    /// `api_key` takes precedence over the configured environment variable
    pub fn new(config: TranscriberConfig, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            config,
            api_key,
        }
    }

    fn api_key(&self) -> Result<String> {
        resolve_api_key(self.api_key.as_deref(), &self.config.api_key_env).ok_or_else(|| {
            SubforgeError::Transcription(format!(
                "No API key provided. Pass one explicitly or set {}",
                self.config.api_key_env
            ))
        })
    }

    fn url(&self) -> String {
        format!("{}/audio/transcriptions", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Transcriber for ApiTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
        let api_key = self.api_key()?;

        let audio = tokio::fs::read(audio_path).await.map_err(|e| {
            SubforgeError::Transcription(format!("Failed to read {}: {}", audio_path.display(), e))
        })?;
        debug!("Uploading {} bytes to {}", audio.len(), self.url());

        let file_part = multipart::Part::bytes(audio).file_name(upload_file_name(audio_path));
        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", self.config.response_format.clone());
        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        let response = self
            .client
            .post(self.url())
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubforgeError::Transcription(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SubforgeError::Transcription(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SubforgeError::Transcription(format!("Failed to read response: {}", e)))?;

        let transcript = parse_response(&body, &self.config.response_format, audio_path, language)?;
        info!(
            "Transcribed {:.1}s of audio into {} segments using {}",
            transcript.duration,
            transcript.segments.len(),
            self.config.model
        );
        Ok(transcript)
    }
}
