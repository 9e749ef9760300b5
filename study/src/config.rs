use crate::artifact::ArtifactKind;
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_ANALYSE_PROMPT: &str = "Explain artificial intelligence";
/// Gemini rejects inline documents above 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Process configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub legacy_document_path: Option<PathBuf>,
    pub analyse_prompt: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;

        let bind_addr: SocketAddr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let max_upload_bytes: usize = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("MAX_UPLOAD_BYTES '{raw}' is not a byte count"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            bind_addr,
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
            legacy_document_path: get("LEGACY_DOCUMENT_PATH").map(PathBuf::from),
            analyse_prompt: get("ANALYSE_PROMPT")
                .unwrap_or_else(|| DEFAULT_ANALYSE_PROMPT.to_string()),
            max_upload_bytes,
        })
    }

    pub fn profiles(&self) -> ModelProfiles {
        ModelProfiles::new(&self.model)
    }
}

/// Model settings used for one kind of call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Per-artifact model settings plus the profile for free-text streaming.
#[derive(Debug, Clone)]
pub struct ModelProfiles {
    summary: ModelProfile,
    flashcards: ModelProfile,
    quiz: ModelProfile,
    streaming: ModelProfile,
}

impl ModelProfiles {
    pub fn new(model: &str) -> Self {
        let profile = |temperature, max_output_tokens| ModelProfile {
            model: model.to_string(),
            temperature,
            max_output_tokens,
        };

        Self {
            summary: profile(0.3, 4096),
            flashcards: profile(0.5, 4096),
            quiz: profile(0.5, 4096),
            streaming: profile(0.7, 2048),
        }
    }

    pub fn for_kind(&self, kind: ArtifactKind) -> &ModelProfile {
        match kind {
            ArtifactKind::Summary => &self.summary,
            ArtifactKind::Flashcards => &self.flashcards,
            ArtifactKind::Quiz => &self.quiz,
        }
    }

    pub fn streaming(&self) -> &ModelProfile {
        &self.streaming
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn missing_api_key_fails_fast() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert!(Config::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.legacy_document_path, None);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("GEMINI_BASE_URL", "http://127.0.0.1:9000/v1beta/"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("LEGACY_DOCUMENT_PATH", "docs/sample.pdf"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1beta");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(
            config.legacy_document_path,
            Some(PathBuf::from("docs/sample.pdf"))
        );
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(
            config.profiles().for_kind(ArtifactKind::Quiz).model,
            "gemini-2.5-flash"
        );
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("BIND_ADDR", "not-an-address"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn every_kind_has_a_profile() {
        let profiles = ModelProfiles::new(DEFAULT_MODEL);
        for kind in ArtifactKind::ALL {
            assert_eq!(profiles.for_kind(kind).model, DEFAULT_MODEL);
        }
        assert_eq!(profiles.streaming().model, DEFAULT_MODEL);
    }

    #[test]
    fn summary_runs_cooler_than_flashcards_and_quiz() {
        let profiles = ModelProfiles::new(DEFAULT_MODEL);
        let summary = profiles.for_kind(ArtifactKind::Summary);
        assert_eq!(summary.temperature, 0.3);
        assert_eq!(profiles.for_kind(ArtifactKind::Flashcards).temperature, 0.5);
        assert_eq!(profiles.for_kind(ArtifactKind::Quiz).temperature, 0.5);
        assert_eq!(profiles.streaming().max_output_tokens, 2048);
    }
}
