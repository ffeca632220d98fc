//! Scope authority: which staff actor may operate on which event.
//!
//! Grants are keyed by (staff, event) and carry an active flag rather
//! than being deleted, so revocation leaves an auditable trace and a
//! re-assignment simply reactivates the existing grant.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::{EventId, ScopeGrant, StaffId};

/// Authorization decisions for admission operations.
#[derive(Debug, Default)]
pub struct ScopeAuthority {
    grants: Arc<RwLock<HashMap<(StaffId, EventId), ScopeGrant>>>,
}

impl ScopeAuthority {
    /// Create an empty authority
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a staff actor scope over an event.
    ///
    /// Idempotent: assigning an existing grant reactivates it.
    pub async fn assign(&self, staff_id: StaffId, event_id: EventId) -> ScopeGrant {
        let mut grants = self.grants.write().await;
        let grant = grants
            .entry((staff_id, event_id))
            .or_insert_with(|| ScopeGrant {
                staff_id,
                event_id,
                active: true,
            });
        grant.active = true;
        grant.clone()
    }

    /// Deactivate a grant. Returns the updated grant if one existed.
    pub async fn deactivate(&self, staff_id: StaffId, event_id: EventId) -> Option<ScopeGrant> {
        let mut grants = self.grants.write().await;
        let grant = grants.get_mut(&(staff_id, event_id))?;
        grant.active = false;
        Some(grant.clone())
    }

    /// Whether the staff actor currently holds an active grant for the event.
    pub async fn authorizes(&self, staff_id: StaffId, event_id: EventId) -> bool {
        let grants = self.grants.read().await;
        grants
            .get(&(staff_id, event_id))
            .is_some_and(|g| g.active)
    }

    /// All grants for an event, active and inactive.
    pub async fn grants_for_event(&self, event_id: EventId) -> Vec<ScopeGrant> {
        let grants = self.grants.read().await;
        grants
            .values()
            .filter(|g| g.event_id == event_id)
            .cloned()
            .collect()
    }
}
