use std::sync::Arc;

use crate::config::Config;
use crate::controllers::VideoController;
use crate::extractor::Extractor;

/// Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub videos: Arc<VideoController>,
}

impl AppState {
    pub fn new(config: Config, extractor: Arc<dyn Extractor>) -> Self {
        AppState {
            config: Arc::new(config),
            videos: Arc::new(VideoController::new(extractor)),
        }
    }
}
