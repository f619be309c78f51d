use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubforgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Subtitle error: {0}")]
    Subtitle(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl SubforgeError {
    /// Short label of the pipeline stage this error belongs to
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Media(_) => "media",
            Self::Transcription(_) => "transcription",
            Self::Translation(_) => "translation",
            Self::Subtitle(_) => "subtitle",
            Self::Encode(_) => "encode",
            Self::Config(_) | Self::Toml(_) => "config",
            Self::Io(_) | Self::Json(_) | Self::FileNotFound(_) | Self::UnsupportedFormat(_) => "input",
        }
    }
}

pub type Result<T> = std::result::Result<T, SubforgeError>;
