use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use super::{HealthResponse, SpeechRequest, SpeechResponse, VoicesResponse};
use crate::api::routes::AppState;
use crate::error::AppError;

pub async fn speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Json<SpeechResponse>, AppError> {
    // A body that does not parse is treated like one without a word
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable speech body: {}", rejection);
            SpeechRequest::default()
        }
    };
    let (word, voice) = request.validate()?;

    let result = state.tts.speak(&word, voice.as_deref()).await?;
    tracing::debug!(mime = result.mime_type, "Encoding {} bytes", result.audio.len());

    Ok(Json(SpeechResponse {
        audio: STANDARD.encode(&result.audio),
        word,
        voice: result.voice,
        success: true,
    }))
}

pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoicesResponse> {
    let catalog = state.tts.catalog();
    Json(VoicesResponse {
        provider: state.tts.provider_name().to_string(),
        default_voice: catalog.default_voice().name.to_string(),
        voices: catalog.profiles().to_vec(),
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server funcionando".to_string(),
        time: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        provider: state.tts.provider_name().to_string(),
        voices: state.tts.catalog().voice_count(),
    })
}
