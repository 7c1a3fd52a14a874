pub mod handlers;
pub mod routes;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::tts::VoiceProfile;

#[derive(Debug, Default, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default, deserialize_with = "lenient_voice")]
    pub voice: Option<String>,
}

/// A voice that is not a string is ignored rather than failing the request.
fn lenient_voice<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(voice) => Ok(Some(voice)),
        _ => Ok(None),
    }
}

impl SpeechRequest {
    /// Returns the word and the optional voice, untouched.
    pub fn validate(self) -> Result<(String, Option<String>), AppError> {
        match self.word {
            Some(word) if !word.is_empty() => Ok((word, self.voice)),
            _ => Err(AppError::missing_word()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    pub audio: String,
    pub word: String,
    pub voice: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub provider: String,
    pub default_voice: String,
    pub voices: Vec<VoiceProfile>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
    pub provider: String,
    pub voices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_word_is_rejected() {
        let err = SpeechRequest::default().validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Se necesita una palabra"));
    }

    #[test]
    fn empty_word_is_rejected() {
        let request = SpeechRequest {
            word: Some(String::new()),
            voice: Some("rachel".into()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn non_string_voice_is_ignored() {
        for raw in [
            r#"{"word": "carrot", "voice": 5}"#,
            r#"{"word": "carrot", "voice": null}"#,
            r#"{"word": "carrot", "voice": {"name": "bella"}}"#,
        ] {
            let request: SpeechRequest = serde_json::from_str(raw).unwrap();
            let (word, voice) = request.validate().unwrap();
            assert_eq!(word, "carrot");
            assert!(voice.is_none(), "body {}", raw);
        }
    }

    #[test]
    fn word_is_passed_through_unchanged() {
        let request: SpeechRequest =
            serde_json::from_str(r#"{"word": "  Hello There ", "voice": "Bella"}"#).unwrap();
        let (word, voice) = request.validate().unwrap();
        assert_eq!(word, "  Hello There ");
        assert_eq!(voice.as_deref(), Some("Bella"));
    }
}
