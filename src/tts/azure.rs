use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;

use crate::error::AppError;
use crate::tts::provider::{fetch_audio, SpeechProvider};
use crate::tts::voice::{Gender, VoiceCatalog, VoiceProfile};

const OUTPUT_FORMAT: &str = "audio-16khz-128kbitrate-mono-mp3";
const SPEAKING_RATE: &str = "0.9";

const VOICES: &[VoiceProfile] = &[
    VoiceProfile {
        name: "aria",
        id: "en-US-AriaNeural",
        gender: Gender::Female,
        style: "friendly",
        locale: "en-US",
    },
    VoiceProfile {
        name: "jenny",
        id: "en-US-JennyNeural",
        gender: Gender::Female,
        style: "assistant",
        locale: "en-US",
    },
    VoiceProfile {
        name: "guy",
        id: "en-US-GuyNeural",
        gender: Gender::Male,
        style: "newscast",
        locale: "en-US",
    },
    VoiceProfile {
        name: "sonia",
        id: "en-GB-SoniaNeural",
        gender: Gender::Female,
        style: "cheerful",
        locale: "en-GB",
    },
];

lazy_static! {
    // Aria is the only voice handed out when the client does not pick one
    static ref CATALOG: VoiceCatalog = VoiceCatalog::new(VOICES, "aria", &["aria"]);
}

pub struct AzureProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AzureProvider {
    pub fn new(api_key: impl Into<String>, region: &str) -> Self {
        Self::with_endpoint(
            api_key,
            format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region),
        )
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechProvider for AzureProvider {
    fn name(&self) -> &'static str {
        "Azure"
    }

    fn catalog(&self) -> &VoiceCatalog {
        &CATALOG
    }

    fn mime_type(&self) -> &'static str {
        "audio/mpeg"
    }

    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, AppError> {
        let request = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header(
                "User-Agent",
                concat!("tts-proxy-server/", env!("CARGO_PKG_VERSION")),
            )
            .body(build_ssml(text, voice));

        fetch_audio(request, self.name()).await
    }
}

/// Wraps `text` in an SSML document for `voice` at the fixed speaking rate.
pub fn build_ssml(text: &str, voice: &VoiceProfile) -> String {
    format!(
        concat!(
            r#"<speak version="1.0" xml:lang="{locale}">"#,
            r#"<voice name="{voice}">"#,
            r#"<prosody rate="{rate}" pitch="medium">{text}</prosody>"#,
            "</voice></speak>"
        ),
        locale = voice.locale,
        voice = voice.id,
        rate = SPEAKING_RATE,
        text = escape_xml(text),
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn region_goes_into_hostname() {
        let provider = AzureProvider::new("key", "westeurope");
        assert_eq!(
            provider.endpoint(),
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn ssml_uses_voice_and_rate() {
        let ssml = build_ssml("rabbit", CATALOG.default_voice());
        assert!(ssml.starts_with(r#"<speak version="1.0" xml:lang="en-US">"#));
        assert!(ssml.contains(r#"<voice name="en-US-AriaNeural">"#));
        assert!(ssml.contains(r#"<prosody rate="0.9" pitch="medium">rabbit</prosody>"#));
        assert!(ssml.ends_with("</voice></speak>"));
    }

    #[test]
    fn ssml_escapes_markup() {
        let ssml = build_ssml("salt & <pepper>", CATALOG.default_voice());
        assert!(ssml.contains("salt &amp; &lt;pepper&gt;"));
    }

    #[test]
    fn default_and_rotation_are_aria() {
        assert_eq!(CATALOG.default_voice().id, "en-US-AriaNeural");
        assert_eq!(CATALOG.rotation_len(), 1);
        assert_eq!(CATALOG.rotation_at(3).id, "en-US-AriaNeural");
    }

    #[tokio::test]
    async fn sends_ssml_with_azure_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cognitiveservices/v1"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .and(header("Content-Type", "application/ssml+xml"))
            .and(header("X-Microsoft-OutputFormat", OUTPUT_FORMAT))
            .and(body_string_contains("<voice name=\"en-US-GuyNeural\">"))
            .and(body_string_contains(">bunny</prosody>"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3fake".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AzureProvider::with_endpoint(
            "test-key",
            format!("{}/cognitiveservices/v1", server.uri()),
        );
        let voice = CATALOG.resolve("guy");
        let audio = provider.synthesize("bunny", voice).await.unwrap();
        assert_eq!(audio, b"ID3fake");
    }

    #[tokio::test]
    async fn unauthorized_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = AzureProvider::with_endpoint("bad-key", server.uri());
        let err = provider
            .synthesize("bunny", CATALOG.default_voice())
            .await
            .unwrap_err();
        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "Error de Azure: 401");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
