use std::sync::Arc;

use anyhow::Result;

use super::{
    analyzer::{Analyzer, RemoteAnalyzer},
    config::Config,
};

pub struct AppState {
    pub config: Config,
    pub analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    pub fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;
        let analyzer = Arc::new(RemoteAnalyzer::new(&config)?);

        Ok(Self::with_analyzer(config, analyzer))
    }

    pub fn with_analyzer(config: Config, analyzer: Arc<dyn Analyzer>) -> Arc<Self> {
        Arc::new(Self { config, analyzer })
    }
}
