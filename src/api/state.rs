use std::sync::Arc;

use crate::storage::TournamentSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn TournamentSource>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(source: Arc<dyn TournamentSource>) -> Self {
        Self {
            source,
            cors_origin: "*".to_string(),
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }
}
