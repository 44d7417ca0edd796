pub mod buddy;
pub mod config;
pub mod impact;

use anyhow::Context;
use carebuddy_client::HttpApiClient;
use carebuddy_core::config::ConsoleConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// Global flags shared by every command.
pub struct Session {
    pub root: PathBuf,
    pub api_url: Option<String>,
    pub json: bool,
}

impl Session {
    pub fn config(&self) -> anyhow::Result<ConsoleConfig> {
        let mut config = ConsoleConfig::load(&self.root).context("failed to load config")?;
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        Ok(config)
    }

    pub fn client(&self, config: &ConsoleConfig) -> Arc<HttpApiClient> {
        tracing::debug!(api_url = %config.api_base(), "connecting to CareBuddy backend");
        Arc::new(HttpApiClient::new(config.api_base()))
    }
}

/// Run `fut` to completion on a fresh Tokio runtime.
pub fn block_on<F: std::future::Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(rt.block_on(fut))
}
