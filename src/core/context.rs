use std::path::PathBuf;
use std::sync::Arc;

use super::config::Config;
use super::library::DocumentLibrary;
use super::utils::ensure_dir;
use crate::api::{FlowRunner, LlmCompletion};

/// Runtime context holding paths and configuration.
pub struct AppCtx {
    pub base_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config: Config,
}

impl AppCtx {
    pub fn init() -> Result<Self, String> {
        let base_dir = Config::base_dir()?;
        let data_dir = base_dir.join("data");

        ensure_dir(&base_dir)?;
        ensure_dir(&data_dir)?;

        let config = Config::load_from(&base_dir.join("config.toml"))?;

        Ok(Self {
            base_dir,
            data_dir,
            config,
        })
    }

    /// Builds the provider client. Fails only here, so commands that never
    /// call the model work without an API key.
    pub fn runner(&self) -> Result<FlowRunner, String> {
        let settings = self.config.provider.settings()?;
        let service = LlmCompletion::new(settings)?;
        Ok(FlowRunner::new(Arc::new(service)))
    }

    pub fn library(&self) -> DocumentLibrary {
        DocumentLibrary::on_disk(self.config.user.clone(), &self.data_dir)
    }
}
