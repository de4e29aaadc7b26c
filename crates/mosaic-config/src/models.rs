use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Default fal.ai model for image generation
pub const DEFAULT_IMAGE_MODEL: &str = "fal-ai/flux-pro/kontext";

/// Default fal.ai model for video generation
pub const DEFAULT_VIDEO_MODEL: &str = "fal-ai/veo3.1/fast";

/// Default audio model; empty means no audio model is configured
pub const DEFAULT_AUDIO_MODEL: &str = "";

/// Kind of media generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TaskKind {
    /// Text-to-image
    Image,
    /// Text-to-video
    Video,
    /// Audio generation or transcription
    Audio,
}

impl TaskKind {
    /// Built-in model id used when the configuration file has no entry
    pub const fn default_model_id(self) -> &'static str {
        match self {
            Self::Image => DEFAULT_IMAGE_MODEL,
            Self::Video => DEFAULT_VIDEO_MODEL,
            Self::Audio => DEFAULT_AUDIO_MODEL,
        }
    }

    /// Key holding this kind's model id in `models.json`
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Image => "image_model_id",
            Self::Video => "video_model_id",
            Self::Audio => "audio_model_id",
        }
    }

    /// Whether requests of this kind carry a `prompt` argument by default
    pub const fn takes_prompt(self) -> bool {
        !matches!(self, Self::Audio)
    }
}

/// Model ids read from `models.json`
///
/// Every field is optional. A missing or non-string field falls back to the
/// built-in default for that task kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModelConfig {
    /// Image model id
    #[serde(default, deserialize_with = "string_or_absent")]
    pub image_model_id: Option<String>,
    /// Video model id
    #[serde(default, deserialize_with = "string_or_absent")]
    pub video_model_id: Option<String>,
    /// Audio model id
    #[serde(default, deserialize_with = "string_or_absent")]
    pub audio_model_id: Option<String>,
}

/// Accept any JSON value, keeping only strings
fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(model_id) => Ok(Some(model_id)),
        _ => Ok(None),
    }
}

impl ModelConfig {
    /// Load the model configuration from a JSON file
    ///
    /// Never fails. A missing, unreadable or malformed file yields an empty
    /// configuration so that every lookup falls back to the defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|reason| {
                tracing::warn!(path = %path.display(), %reason, "ignoring malformed model config");
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no model config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read model config");
                Self::default()
            }
        }
    }

    /// Parse a model configuration document
    ///
    /// The document must be a JSON object. Unknown keys are ignored and
    /// fields holding anything other than a string are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the text is not valid JSON or
    /// the top-level value is not an object
    pub fn parse(raw: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;

        // Checked up front since serde would also accept a positional array
        if !value.is_object() {
            return Err("top-level value is not an object".to_owned());
        }

        Self::deserialize(value).map_err(|e| e.to_string())
    }

    /// Configured entry for a task kind, if any
    pub fn configured(&self, kind: TaskKind) -> Option<&str> {
        match kind {
            TaskKind::Image => self.image_model_id.as_deref(),
            TaskKind::Video => self.video_model_id.as_deref(),
            TaskKind::Audio => self.audio_model_id.as_deref(),
        }
    }

    /// Model id for a task kind, falling back to the built-in default
    ///
    /// A configured empty string is returned as-is.
    pub fn model_id(&self, kind: TaskKind) -> &str {
        self.configured(kind).unwrap_or_else(|| kind.default_model_id())
    }
}
