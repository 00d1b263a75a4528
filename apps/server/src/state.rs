use ytscript_core::{Config, ConfigError, Orchestrator};

/// Shared per-process state. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub default_lang: String,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, default_lang: impl Into<String>) -> Self {
        Self {
            orchestrator,
            default_lang: default_lang.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(Orchestrator::standard(config)?, config.lang.as_str()))
    }

    /// The requested language, or the default when absent or blank.
    pub fn lang_or_default(&self, lang: Option<String>) -> String {
        lang.map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_lang.clone())
    }
}
