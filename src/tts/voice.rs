use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

/// A named voice and the identifier the provider knows it by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub name: &'static str,
    pub id: &'static str,
    pub gender: Gender,
    pub style: &'static str,
    pub locale: &'static str,
}

/// The voices a provider offers, its fallback voice and the order voices are
/// handed out in when the client does not ask for one.
#[derive(Debug)]
pub struct VoiceCatalog {
    profiles: Vec<VoiceProfile>,
    default_index: usize,
    rotation: Vec<usize>,
}

impl VoiceCatalog {
    /// Rotation names that are not in `profiles` are skipped. An unknown
    /// default falls back to the first profile.
    pub fn new(profiles: &[VoiceProfile], default_voice: &str, rotation: &[&str]) -> Self {
        assert!(!profiles.is_empty(), "voice catalog cannot be empty");

        let position = |name: &str| profiles.iter().position(|p| p.name == name);
        let default_index = position(default_voice).unwrap_or(0);

        let mut rotation: Vec<usize> = rotation.iter().filter_map(|n| position(n)).collect();
        if rotation.is_empty() {
            rotation.push(default_index);
        }

        Self {
            profiles: profiles.to_vec(),
            default_index,
            rotation,
        }
    }

    pub fn get(&self, name: &str) -> Option<&VoiceProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn default_voice(&self) -> &VoiceProfile {
        &self.profiles[self.default_index]
    }

    /// Looks up `name`, falling back to the default voice when it is unknown.
    pub fn resolve(&self, name: &str) -> &VoiceProfile {
        match self.get(name) {
            Some(profile) => profile,
            None => {
                tracing::warn!(
                    "Unknown voice '{}', using default '{}'",
                    name,
                    self.default_voice().name
                );
                self.default_voice()
            }
        }
    }

    pub fn rotation_len(&self) -> usize {
        self.rotation.len()
    }

    /// Entry `index` of the rotation, wrapping around.
    pub fn rotation_at(&self, index: usize) -> &VoiceProfile {
        &self.profiles[self.rotation[index % self.rotation.len()]]
    }

    pub fn profiles(&self) -> &[VoiceProfile] {
        &self.profiles
    }

    pub fn voice_count(&self) -> usize {
        self.profiles.len()
    }
}

/// Round-robin position shared by all requests that omit a voice.
#[derive(Debug, Default)]
pub struct VoiceRotation {
    next: AtomicUsize,
}

impl VoiceRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current position and advances it.
    pub fn advance(&self, len: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % len.max(1)
    }

    pub fn next_voice<'a>(&self, catalog: &'a VoiceCatalog) -> &'a VoiceProfile {
        catalog.rotation_at(self.advance(catalog.rotation_len()))
    }
}
