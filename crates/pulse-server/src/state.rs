//! Shared application state.

use parking_lot::RwLock;
use pulse_core::PulseConfig;
use pulse_narrate::NarrativeConfig;
use pulse_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: PulseConfig,
    pub store: SqliteStore,
    pub narrative: RwLock<NarrativeConfig>,
}

impl AppState {
    pub fn new(config: PulseConfig, store: SqliteStore) -> Self {
        // Load narrative provider config
        let narrative = NarrativeConfig::load(&config.data_paths.narrative_config_file);

        Self {
            config,
            store,
            narrative: RwLock::new(narrative),
        }
    }
}
