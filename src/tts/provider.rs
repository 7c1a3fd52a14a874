use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};

use crate::error::AppError;
use crate::tts::voice::{VoiceCatalog, VoiceProfile};

/// An upstream text-to-speech service.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Name used in logs and upstream error messages
    fn name(&self) -> &'static str;

    fn catalog(&self) -> &VoiceCatalog;

    /// MIME type of the audio returned by `synthesize`
    fn mime_type(&self) -> &'static str;

    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, AppError>;
}

/// Sends a prepared upstream request and buffers the full audio body.
///
/// Anything other than 200 is an error, as is any transport failure.
pub async fn fetch_audio(request: RequestBuilder, provider: &str) -> Result<Vec<u8>, AppError> {
    let response = request.send().await?;
    let status = response.status();

    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        let body = body.trim();
        let message = if body.is_empty() {
            format!("Error de {}: {}", provider, status.as_u16())
        } else {
            format!("Error de {}: {} - {}", provider, status.as_u16(), body)
        };
        return Err(AppError::Upstream {
            status: Some(status.as_u16()),
            message,
        });
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
