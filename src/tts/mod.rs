pub mod azure;
pub mod elevenlabs;
pub mod provider;
pub mod voice;

use std::sync::Arc;

use crate::config::{Config, ProviderKind};
use crate::error::AppError;

pub use azure::AzureProvider;
pub use elevenlabs::ElevenLabsProvider;
pub use provider::SpeechProvider;
pub use voice::{VoiceCatalog, VoiceProfile, VoiceRotation};

/// Synthesized audio plus what is needed to describe it to the client.
#[derive(Debug)]
pub struct SpeechResult {
    pub audio: Vec<u8>,
    pub mime_type: &'static str,
    pub voice: String,
}

pub struct TtsService {
    provider: Arc<dyn SpeechProvider>,
    rotation: VoiceRotation,
}

impl TtsService {
    pub fn new(provider: Arc<dyn SpeechProvider>) -> Self {
        Self {
            provider,
            rotation: VoiceRotation::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let api_key = config.api_key().unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(
                "No API key configured for provider '{}', speech requests will fail",
                config.provider
            );
        }

        let provider: Arc<dyn SpeechProvider> = match config.provider {
            ProviderKind::Azure => {
                let azure = AzureProvider::new(api_key, &config.azure_region);
                tracing::info!("Azure endpoint: {}", azure.endpoint());
                Arc::new(azure)
            }
            ProviderKind::ElevenLabs => {
                Arc::new(ElevenLabsProvider::new(api_key, &config.elevenlabs_model))
            }
        };

        Self::new(provider)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        self.provider.catalog()
    }

    /// An explicit voice is resolved against the catalog, otherwise the
    /// next voice in the rotation is used.
    pub fn select_voice(&self, requested: Option<&str>) -> &VoiceProfile {
        let catalog = self.provider.catalog();
        match requested {
            Some(name) if !name.is_empty() => catalog.resolve(name),
            _ => self.rotation.next_voice(catalog),
        }
    }

    pub async fn speak(&self, text: &str, voice: Option<&str>) -> Result<SpeechResult, AppError> {
        let profile = self.select_voice(voice);

        tracing::info!(
            provider = self.provider.name(),
            voice = profile.id,
            "Generating audio for: \"{}\"",
            text
        );

        let audio = self.provider.synthesize(text, profile).await?;

        tracing::info!(
            bytes = audio.len(),
            mime = self.provider.mime_type(),
            "Audio generated for: \"{}\"",
            text
        );

        Ok(SpeechResult {
            audio,
            mime_type: self.provider.mime_type(),
            voice: profile.name.to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubProvider;
    use super::*;

    #[tokio::test]
    async fn speak_returns_provider_audio() {
        let service = TtsService::new(Arc::new(StubProvider::returning(vec![7, 8, 9])));
        let result = service.speak("hop", Some("two")).await.unwrap();
        assert_eq!(result.audio, vec![7, 8, 9]);
        assert_eq!(result.voice, "two");
        assert_eq!(result.mime_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn omitted_voice_rotates() {
        let stub = Arc::new(StubProvider::returning(vec![1]));
        let service = TtsService::new(stub.clone());

        for _ in 0..4 {
            service.speak("hop", None).await.unwrap();
        }
        // Empty selector counts as omitted
        service.speak("hop", Some("")).await.unwrap();

        let calls = stub.calls.lock().unwrap().clone();
        assert_eq!(calls, ["voice-1", "voice-2", "voice-3", "voice-1", "voice-2"]);
    }

    #[tokio::test]
    async fn explicit_voice_does_not_advance_rotation() {
        let service = TtsService::new(Arc::new(StubProvider::returning(vec![1])));
        assert_eq!(service.select_voice(None).name, "one");
        assert_eq!(service.select_voice(Some("three")).name, "three");
        assert_eq!(service.select_voice(Some("missing")).name, "one");
        assert_eq!(service.select_voice(None).name, "two");
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let service = TtsService::new(Arc::new(StubProvider::failing()));
        let err = service.speak("hop", None).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: Some(503), .. }));
    }

    #[test]
    fn from_config_picks_provider() {
        let config = Config::from_lookup(|key| match key {
            "TTS_PROVIDER" => Some("elevenlabs".to_string()),
            _ => None,
        })
        .unwrap();
        let service = TtsService::from_config(&config);
        assert_eq!(service.provider_name(), "ElevenLabs");
        assert_eq!(service.catalog().default_voice().name, "rachel");
    }
}
