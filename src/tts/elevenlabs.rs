use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use serde::Serialize;

use crate::error::AppError;
use crate::tts::provider::{fetch_audio, SpeechProvider};
use crate::tts::voice::{Gender, VoiceCatalog, VoiceProfile};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

const VOICES: &[VoiceProfile] = &[
    VoiceProfile {
        name: "rachel",
        id: "21m00Tcm4TlvDq8ikWAM",
        gender: Gender::Female,
        style: "calm",
        locale: "en-US",
    },
    VoiceProfile {
        name: "bella",
        id: "EXAVITQu4vr4xnAQ5iL5",
        gender: Gender::Female,
        style: "soft",
        locale: "en-US",
    },
    VoiceProfile {
        name: "antoni",
        id: "ErXwobaYiR6tESSZkRc8",
        gender: Gender::Male,
        style: "well-rounded",
        locale: "en-US",
    },
    VoiceProfile {
        name: "elli",
        id: "MF3mGyEYCl7XYWbV9V6O",
        gender: Gender::Female,
        style: "emotional",
        locale: "en-US",
    },
    VoiceProfile {
        name: "josh",
        id: "TxGEqnHWrfWFTfGW9XQX",
        gender: Gender::Male,
        style: "deep",
        locale: "en-US",
    },
];

lazy_static! {
    static ref CATALOG: VoiceCatalog =
        VoiceCatalog::new(VOICES, "rachel", &["rachel", "antoni", "bella", "josh"]);
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

pub struct ElevenLabsProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

impl ElevenLabsProvider {
    pub fn new(api_key: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model_id, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
        }
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn name(&self) -> &'static str {
        "ElevenLabs"
    }

    fn catalog(&self) -> &VoiceCatalog {
        &CATALOG
    }

    fn mime_type(&self) -> &'static str {
        "audio/mpeg"
    }

    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, AppError> {
        let body = SynthesizeRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings::default(),
        };

        let request = self
            .client
            .post(self.speech_url(voice.id))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body);

        fetch_audio(request, self.name()).await
    }
}
