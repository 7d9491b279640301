//! Shared harness for protocol tests.

use circulate::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// A coordinator over its own in-memory store, with direct access to the
/// gateway for view-level assertions.
pub struct TestLibrary {
    pub store: Arc<MemoryGateway>,
    pub library: ReservationCoordinator<MemoryGateway>,
}

impl TestLibrary {
    /// Reference configuration (30 s lock TTL).
    pub fn new() -> Self {
        Self::with_config(CirculationConfig::new())
    }

    /// Short lock TTL for expiry tests.
    pub fn with_lock_ttl(ttl: Duration) -> Self {
        Self::with_config(CirculationConfig::new().with_lock_ttl(ttl))
    }

    pub fn with_config(config: CirculationConfig) -> Self {
        let store = Arc::new(MemoryGateway::new());
        let library = ReservationCoordinator::new(Arc::clone(&store), config);
        Self { store, library }
    }
}

pub fn holder(name: &str) -> HolderId {
    name.into()
}
