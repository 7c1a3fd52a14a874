use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("PORT must be a number, got '{0}'")]
    InvalidPort(String),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Unknown TTS_PROVIDER '{0}' (expected 'azure' or 'elevenlabs')")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Azure,
    ElevenLabs,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "azure" => Ok(ProviderKind::Azure),
            "elevenlabs" | "eleven_labs" | "11labs" => Ok(ProviderKind::ElevenLabs),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Azure => write!(f, "azure"),
            ProviderKind::ElevenLabs => write!(f, "elevenlabs"),
        }
    }
}

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub provider: ProviderKind,
    pub azure_key: Option<String>,
    pub azure_region: String,
    pub elevenlabs_key: Option<String>,
    pub elevenlabs_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port_raw = get("PORT").unwrap_or_else(|| "3000".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;
        let ip: IpAddr = host
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(host.clone()))?;
        let addr = SocketAddr::new(ip, port);

        let azure_key = get("AZURE_TTS_KEY");
        let elevenlabs_key = get("ELEVENLABS_API_KEY");

        let provider = match get("TTS_PROVIDER") {
            Some(name) => name.parse()?,
            None if elevenlabs_key.is_some() && azure_key.is_none() => ProviderKind::ElevenLabs,
            None => ProviderKind::Azure,
        };

        Ok(Self {
            addr,
            provider,
            azure_key,
            azure_region: get("AZURE_TTS_REGION").unwrap_or_else(|| "eastus".to_string()),
            elevenlabs_key,
            elevenlabs_model: get("ELEVENLABS_MODEL_ID")
                .unwrap_or_else(|| "eleven_multilingual_v2".to_string()),
        })
    }

    /// API key for the selected provider, if one was configured.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::Azure => self.azure_key.as_deref(),
            ProviderKind::ElevenLabs => self.elevenlabs_key.as_deref(),
        }
    }
}
