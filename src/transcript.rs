use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A time-bounded span of transcribed text, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl Segment {
    pub fn new<S: Into<String>>(start: f64, end: f64, text: S) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Normalized speech-to-text result.
///
/// Segments are kept in chronological order. Stages never mutate a
/// transcript they received; they build a new one with the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub audio_file: PathBuf,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub language: Option<String>,
}

impl Transcript {
    /// Transcript carrying only flat text, without timing
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
            audio_file: PathBuf::new(),
            duration: 0.0,
            language: None,
        }
    }

    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Check that segment boundaries never go backwards
    pub fn is_chronological(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start && pair[0].end <= pair[1].end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let transcript: Transcript =
            serde_json::from_str(r#"{"text": "Hello.", "segments": [{"text": "Hello."}]}"#).unwrap();

        assert_eq!(transcript.segments[0].start, 0.0);
        assert_eq!(transcript.segments[0].end, 0.0);
        assert_eq!(transcript.duration, 0.0);
        assert!(transcript.language.is_none());
    }

    #[test]
    fn test_chronological_check() {
        let mut transcript = Transcript::from_text("a b");
        transcript.segments = vec![Segment::new(0.0, 1.0, "a"), Segment::new(1.0, 2.5, "b")];
        assert!(transcript.is_chronological());

        transcript.segments.push(Segment::new(0.5, 0.8, "c"));
        assert!(!transcript.is_chronological());
    }
}
