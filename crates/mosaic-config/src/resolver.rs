use std::path::{Path, PathBuf};

use crate::{ModelConfig, TaskKind, env::non_empty_var};

/// Default location of the model configuration file, relative to the working directory
pub const DEFAULT_MODELS_PATH: &str = "config/models.json";

/// Environment variable overriding the model configuration path
pub const MODELS_PATH_ENV: &str = "MOSAIC_MODELS_CONFIG";

/// Resolves the effective model id for a task
///
/// The configuration file is re-read on every resolution, so edits take
/// effect on the next call without a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResolver {
    path: PathBuf,
}

impl Default for ModelResolver {
    /// Resolver for `$MOSAIC_MODELS_CONFIG`, or `config/models.json` when unset
    fn default() -> Self {
        let path = non_empty_var(MODELS_PATH_ENV).unwrap_or_else(|| DEFAULT_MODELS_PATH.to_owned());
        Self::new(path)
    }
}

impl ModelResolver {
    /// Create a resolver reading the given configuration file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the configuration file this resolver reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current configuration from disk
    pub fn load(&self) -> ModelConfig {
        ModelConfig::load(&self.path)
    }

    /// Resolve the model id for `kind`
    ///
    /// A non-empty `override_id` wins without touching the filesystem.
    /// Otherwise the configuration file is consulted, falling back to the
    /// built-in default for the task kind.
    pub fn resolve(&self, kind: TaskKind, override_id: Option<&str>) -> String {
        if let Some(model_id) = override_id.filter(|id| !id.is_empty()) {
            tracing::debug!(task = %kind, model_id, "using model override");
            return model_id.to_owned();
        }

        let config = self.load();
        let model_id = config.model_id(kind).to_owned();

        tracing::debug!(
            task = %kind,
            key = kind.config_key(),
            model_id = %model_id,
            source = if config.configured(kind).is_some() { "file" } else { "default" },
            "resolved model id"
        );

        model_id
    }
}
