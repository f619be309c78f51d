use serde::{Deserialize, Serialize};

use crate::error::{Result, SubforgeError};
use crate::transcript::{Segment, Transcript};

/// JSON body of a translate call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: Vec<String>,
    pub target_lang: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translations: Vec<TranslatedText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedText {
    pub text: String,
}

/// Texts of the segments that carry any, in order
pub fn segment_texts(segments: &[Segment]) -> Vec<String> {
    segments
        .iter()
        .filter(|seg| seg.has_text())
        .map(|seg| seg.text.clone())
        .collect()
}

/// Put translations back onto the segments that were submitted.
///
/// Segments without text pass through unchanged; the number of
/// translations has to match the number of non-empty segments.
pub fn apply_segment_translations(segments: &[Segment], translations: Vec<String>) -> Result<Vec<Segment>> {
    let expected = segments.iter().filter(|seg| seg.has_text()).count();
    if translations.len() != expected {
        return Err(SubforgeError::Translation(format!(
            "Expected {} segment translations, got {}",
            expected,
            translations.len()
        )));
    }

    let mut translations = translations.into_iter();
    Ok(segments
        .iter()
        .map(|seg| match seg.has_text() {
            true => Segment {
                text: translations.next().unwrap_or_default(),
                ..seg.clone()
            },
            false => seg.clone(),
        })
        .collect())
}

/// New transcript carrying the translated text and segments
pub fn translated_transcript(source: &Transcript, text: String, segments: Vec<Segment>, target_language: &str) -> Transcript {
    Transcript {
        text,
        segments,
        language: Some(target_language.to_string()),
        ..source.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 1.0, "One"),
            Segment::new(1.0, 2.0, ""),
            Segment::new(2.0, 3.0, "Three"),
            Segment::new(3.0, 4.0, "Four"),
        ]
    }

    #[test]
    fn test_empty_segments_pass_through() {
        let translated = apply_segment_translations(
            &segments(),
            vec!["Uno".to_string(), "Tres".to_string(), "Cuatro".to_string()],
        )
        .unwrap();

        assert_eq!(translated.len(), 4);
        assert_eq!(translated[0], Segment::new(0.0, 1.0, "Uno"));
        assert_eq!(translated[1], Segment::new(1.0, 2.0, ""));
        assert_eq!(translated[3].text, "Cuatro");
    }

    #[test]
    fn test_count_mismatch_is_translation_error() {
        let all_text: Vec<Segment> = (0..4)
            .map(|i| Segment::new(i as f64, i as f64 + 1.0, format!("s{}", i)))
            .collect();
        let err = apply_segment_translations(&all_text, vec!["a".into(), "b".into(), "c".into()]).unwrap_err();

        assert!(matches!(err, SubforgeError::Translation(msg) if msg.contains("4") && msg.contains("3")));
    }

    #[test]
    fn test_segment_texts_skip_empty() {
        assert_eq!(segment_texts(&segments()), vec!["One", "Three", "Four"]);
    }

    #[test]
    fn test_request_shape() {
        let request = TranslateRequest {
            text: vec!["Hello".to_string()],
            target_lang: "ES".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"text": ["Hello"], "target_lang": "ES"})
        );
    }
}
