use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{resolve_api_key, TranslateConfig};
use crate::error::{Result, SubforgeError};
use crate::transcript::Transcript;
use super::common::{
    apply_segment_translations, segment_texts, translated_transcript, TranslateRequest, TranslateResponse,
};
use super::Translator;

/// DeepL REST translator
pub struct DeeplTranslator {
    client: Client,
    config: TranslateConfig,
    api_key: Option<String>,
}

impl DeeplTranslator {
    /// `api_key` takes precedence over the configured environment variable
    pub fn new(config: TranslateConfig, api_key: Option<String>) -> Self {
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
            SubforgeError::Translation(format!(
                "No API key provided. Pass one explicitly or set {}",
                self.config.api_key_env
            ))
        })
    }

    /// One translate call for a batch of texts
    async fn translate_batch(&self, api_key: &str, text: Vec<String>, target_lang: &str) -> Result<Vec<String>> {
        let request = TranslateRequest {
            text,
            target_lang: target_lang.to_string(),
        };

        debug!("Sending {} text(s) to {}", request.text.len(), self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| SubforgeError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SubforgeError::Translation(format!(
                "DeepL API error {}: {}",
                status, error_text
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| SubforgeError::Translation(format!("Failed to parse response: {}", e)))?;

        Ok(body.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(&self, transcript: &Transcript, target_language: &str) -> Result<Transcript> {
        let api_key = self.api_key()?;

        if transcript.text.is_empty() {
            return Err(SubforgeError::Translation("No text found in transcript for translation".to_string()));
        }

        let target_lang = target_language.to_uppercase();

        let text = self
            .translate_batch(&api_key, vec![transcript.text.clone()], &target_lang)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SubforgeError::Translation("No translation returned".to_string()))?;

        let texts = segment_texts(&transcript.segments);
        let segments = if texts.is_empty() {
            transcript.segments.clone()
        } else {
            let translations = self.translate_batch(&api_key, texts, &target_lang).await?;
            apply_segment_translations(&transcript.segments, translations)?
        };

        info!("Translated transcript into {} ({} segments)", target_lang, segments.len());
        Ok(translated_transcript(transcript, text, segments, target_language))
    }
}
