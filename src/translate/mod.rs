// Machine translation of transcripts
//
// - Common: request/response shapes and segment re-assembly
// - DeepL: hosted DeepL REST client

pub mod common;
pub mod deepl;

use async_trait::async_trait;

pub use common::*;
pub use deepl::DeeplTranslator;
use crate::config::TranslateConfig;
use crate::error::Result;
use crate::transcript::Transcript;

/// Main trait for translation operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a transcript into `target_language`, returning a new transcript
    /// with the same segment count
    async fn translate(&self, transcript: &Transcript, target_language: &str) -> Result<Transcript>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: TranslateConfig, api_key: Option<String>) -> Box<dyn Translator> {
        Box::new(DeeplTranslator::new(config, api_key))
    }
}
