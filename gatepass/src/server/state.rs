//! Shared application state.

use std::sync::Arc;

use gatepass_core::environment::SystemClock;

use crate::auth::ScopeAuthority;
use crate::config::Config;
use crate::directory::{
    EventDirectory, InMemoryEventDirectory, InMemoryStaffDirectory, StaffDirectory,
};
use crate::ledger::{AccessLedger, AccessSink};
use crate::projections::AccessFeed;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The access ledger
    pub ledger: Arc<AccessLedger>,
    /// Event directory
    pub events: Arc<dyn EventDirectory>,
    /// Staff directory
    pub staff: Arc<dyn StaffDirectory>,
    /// Scope authority
    pub scopes: Arc<ScopeAuthority>,
    /// Access feed projection
    pub feed: Arc<AccessFeed>,
}

impl AppState {
    /// Build a fully in-memory state from configuration.
    #[must_use]
    pub fn in_memory(config: &Config) -> Self {
        let events: Arc<dyn EventDirectory> = Arc::new(InMemoryEventDirectory::new());
        let staff: Arc<dyn StaffDirectory> = Arc::new(InMemoryStaffDirectory::new());
        let scopes = Arc::new(ScopeAuthority::new());
        let feed = Arc::new(AccessFeed::new());
        let sink: Arc<dyn AccessSink> = Arc::clone(&feed) as Arc<dyn AccessSink>;

        let ledger = Arc::new(AccessLedger::new(
            Arc::clone(&events),
            Arc::clone(&scopes),
            sink,
            Arc::new(SystemClock),
            config.ledger.scan_dedup_window_secs,
        ));

        Self {
            ledger,
            events,
            staff,
            scopes,
            feed,
        }
    }
}
