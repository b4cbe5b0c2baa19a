use crate::prelude::Stage;
use log::{debug, info, warn};

/// Stage-scoped wrapper around the `log` facade.
pub struct LogManager {
    stage: Stage,
}

impl LogManager {
    pub fn new(stage: Stage) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.stage, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.stage, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.stage, message);
    }
}
