use std::sync::Arc;

use crate::{
    acquirer::{self, DocumentAcquirer},
    config::Config,
    sink::ResultSink,
};

#[derive(Clone)]
pub struct AppState {
    pub acquirer: Arc<dyn DocumentAcquirer>,
    pub sink: Option<Arc<dyn ResultSink>>,
}

impl AppState {
    pub fn new(acquirer: Arc<dyn DocumentAcquirer>, sink: Option<Arc<dyn ResultSink>>) -> Self {
        Self { acquirer, sink }
    }

    /// Acquirer chosen by the deployment's configured strategy.
    pub fn from_config(config: &Config, sink: Option<Arc<dyn ResultSink>>) -> Self {
        let acquirer =
            acquirer::for_strategy(config.strategy(), config.chrome_executable().cloned());
        Self::new(acquirer, sink)
    }
}
