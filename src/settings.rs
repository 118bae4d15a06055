//! User configuration: load, merge with defaults, persist.
//!
//! Settings are loaded once at startup and passed explicitly to the
//! components that need them. Changing a setting produces a new `Settings`
//! value which is saved wholesale; nothing mutates a shared instance.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Language;
use crate::utils::{ensure_parent_directory, write_atomically};

/// Model used when the settings file does not name one.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Maximum number of tags requested when the settings file does not say.
pub const DEFAULT_MAX_TAGS: u32 = 5;

/// Persisted configuration.
///
/// Serialized as camelCase JSON. Fields absent from the file fall back to
/// their defaults; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Anthropic API key. Empty means "not configured".
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Upper bound on the number of suggested tags.
    pub max_tags: u32,
    /// Whether bulk tagging writes suggestions without review.
    pub auto_apply: bool,
    /// Language the tags should be written in.
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tags: DEFAULT_MAX_TAGS,
            auto_apply: false,
            language: Language::Auto,
        }
    }
}

impl Settings {
    /// Parses a settings blob, merging present fields over the defaults.
    ///
    /// A stored `maxTags` of zero is replaced by the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if settings.max_tags == 0 {
            warn!("maxTags of 0 in settings, using {}", DEFAULT_MAX_TAGS);
            settings.max_tags = DEFAULT_MAX_TAGS;
        }
        Ok(settings)
    }

    /// Loads settings from `path`, returning the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    /// Persists settings to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        ensure_parent_directory(path)?;

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        write_atomically(path, &format!("{json}\n"))
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;

        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Checks invariants that the type system does not enforce.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_tags` is zero or `model` is blank.
    pub fn validate(&self) -> Result<()> {
        if self.max_tags == 0 {
            anyhow::bail!("Max tags must be at least 1");
        }
        if self.model.trim().is_empty() {
            anyhow::bail!("Model cannot be empty");
        }
        Ok(())
    }

    /// Fills an empty API key from `ANTHROPIC_API_KEY`.
    ///
    /// A key stored in the settings file always wins.
    #[must_use]
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_empty()
            && let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
        {
            self.api_key = key.trim().to_string();
        }
        self
    }

    /// Returns `true` if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Returns the API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        if !self.has_api_key() {
            return "(not set)".to_string();
        }
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(8), tail)
    }
}

/// A partial change to `Settings`, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tags: Option<u32>,
    pub auto_apply: Option<bool>,
    pub language: Option<Language>,
}

impl SettingsUpdate {
    /// Returns `true` if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produces the new settings value with this update applied.
    #[must_use]
    pub fn apply(self, settings: &Settings) -> Settings {
        Settings {
            api_key: self.api_key.unwrap_or_else(|| settings.api_key.clone()),
            model: self.model.unwrap_or_else(|| settings.model.clone()),
            max_tags: self.max_tags.unwrap_or(settings.max_tags),
            auto_apply: self.auto_apply.unwrap_or(settings.auto_apply),
            language: self.language.unwrap_or(settings.language),
        }
    }
}
