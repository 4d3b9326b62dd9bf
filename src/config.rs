use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Optional settings file. Every field has a default, so an empty file and
/// no file behave the same.
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub base_url: Option<String>,
    /// Cap on web searches the model may run per request.
    pub web_search_max_uses: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: None,
            web_search_max_uses: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_max_tokens() -> u32 {
    4000
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read settings {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse settings: {e}")))
    }

    /// Settings from `path` if given, then environment and CLI overrides.
    pub fn resolve(
        path: Option<&Path>,
        base_url_env: Option<String>,
        model_override: Option<String>,
    ) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(url) = base_url_env.filter(|u| !u.trim().is_empty()) {
            settings.llm.base_url = Some(url);
        }
        if let Some(model) = model_override {
            settings.llm.model = model;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(Error::config("llm.model must not be empty"));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::config("llm.max_tokens must be greater than zero"));
        }
        if self.llm.web_search_max_uses == Some(0) {
            return Err(Error::config(
                "llm.web_search_max_uses must be at least 1 when set",
            ));
        }
        Ok(())
    }
}
