//! Guest registry: ownership of per-guest ledger state.
//!
//! Each guest lives behind its own `tokio::sync::Mutex`, the serialization
//! unit for that guest's commits. The registry's outer `RwLock` protects
//! only the lookup maps; commit paths clone the cell `Arc` and drop the
//! outer guard before locking the cell, so scans for different guests never
//! contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::{Mutex, RwLock};

use super::reducer::GuestLedgerState;
use crate::error::AccessError;
use crate::types::{Credential, Event, EventId, Guest, GuestId};

const CREDENTIAL_LEN: usize = 32;
const MIN_PASSES: u32 = 1;
const MAX_PASSES: u32 = 10;
const DNI_LEN: usize = 8;

/// Shared handle to one guest's serialized ledger state.
pub type GuestCell = Arc<Mutex<GuestLedgerState>>;

/// Fields for registering a guest.
#[derive(Clone, Debug)]
pub struct NewGuest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// National identity number
    pub dni: String,
    /// Table assignment
    pub table_number: u32,
    /// Total allotted passes
    pub passes: u32,
}

/// Fields for editing a guest's profile.
#[derive(Clone, Debug)]
pub struct GuestUpdate {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// National identity number
    pub dni: String,
    /// Table assignment
    pub table_number: u32,
    /// Total allotted passes
    pub passes: u32,
}

#[derive(Default)]
struct RegistryInner {
    guests: HashMap<GuestId, GuestCell>,
    credentials: HashMap<String, GuestId>,
    identities: HashMap<(EventId, String), GuestId>,
    pass_totals: HashMap<EventId, u32>,
}

/// Registry of all guests and their ledger cells.
#[derive(Default)]
pub struct GuestRegistry {
    inner: RwLock<RegistryInner>,
}

impl GuestRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a guest for an event and issue their credential.
    ///
    /// # Errors
    ///
    /// Fails when the profile is invalid, the identity number is already
    /// registered for the event, or the event's pass capacity would be
    /// exceeded.
    pub async fn create(&self, event: &Event, new: NewGuest) -> Result<Guest, AccessError> {
        validate_profile(&new.dni, new.table_number, new.passes)?;

        let mut inner = self.inner.write().await;

        let identity_key = (event.id, new.dni.clone());
        if inner.identities.contains_key(&identity_key) {
            return Err(AccessError::DuplicateIdentity { dni: new.dni });
        }

        let allocated = inner.pass_totals.get(&event.id).copied().unwrap_or(0);
        if allocated + new.passes > event.capacity {
            return Err(AccessError::CapacityExceeded {
                remaining: event.capacity.saturating_sub(allocated),
            });
        }

        let credential = issue_credential(&inner.credentials);

        let guest = Guest {
            id: GuestId::new(),
            event_id: event.id,
            first_name: new.first_name,
            last_name: new.last_name,
            dni: new.dni,
            table_number: new.table_number,
            passes: new.passes,
            used_passes: 0,
            credential: Credential::new(credential.clone()),
            last_access: None,
            created_at: Utc::now(),
        };

        inner.credentials.insert(credential, guest.id);
        inner.identities.insert(identity_key, guest.id);
        *inner.pass_totals.entry(event.id).or_insert(0) += guest.passes;
        inner.guests.insert(
            guest.id,
            Arc::new(Mutex::new(GuestLedgerState::new(guest.clone()))),
        );

        Ok(guest)
    }

    /// Resolve a scanned credential to the guest's ledger cell.
    pub async fn resolve(&self, credential: &str) -> Option<(GuestId, GuestCell)> {
        let inner = self.inner.read().await;
        let guest_id = inner.credentials.get(credential).copied()?;
        let cell = Arc::clone(inner.guests.get(&guest_id)?);
        Some((guest_id, cell))
    }

    /// Look up a guest's ledger cell by id.
    pub async fn get(&self, guest_id: GuestId) -> Option<GuestCell> {
        let inner = self.inner.read().await;
        inner.guests.get(&guest_id).map(Arc::clone)
    }

    /// Edit a guest's profile.
    ///
    /// The pass total cannot drop below what the guest has already used.
    ///
    /// # Errors
    ///
    /// Fails on unknown guest, invalid profile, duplicate identity,
    /// capacity overflow, or a pass total below the used count.
    pub async fn update(
        &self,
        event: &Event,
        guest_id: GuestId,
        update: GuestUpdate,
    ) -> Result<Guest, AccessError> {
        validate_profile(&update.dni, update.table_number, update.passes)?;

        let mut inner = self.inner.write().await;
        let cell = Arc::clone(inner.guests.get(&guest_id).ok_or(AccessError::UnknownGuest)?);
        let mut state = cell.lock().await;

        if update.passes < state.guest.used_passes {
            return Err(AccessError::PassesBelowUsed {
                passes: update.passes,
                used: state.guest.used_passes,
            });
        }

        let old_dni = state.guest.dni.clone();
        if update.dni != old_dni {
            let identity_key = (event.id, update.dni.clone());
            if inner.identities.contains_key(&identity_key) {
                return Err(AccessError::DuplicateIdentity { dni: update.dni });
            }
        }

        let old_passes = state.guest.passes;
        let allocated = inner.pass_totals.get(&event.id).copied().unwrap_or(0);
        let others = allocated - old_passes;
        if others + update.passes > event.capacity {
            return Err(AccessError::CapacityExceeded {
                remaining: event.capacity.saturating_sub(others),
            });
        }

        if update.dni != old_dni {
            inner.identities.remove(&(event.id, old_dni));
            inner
                .identities
                .insert((event.id, update.dni.clone()), guest_id);
        }
        inner.pass_totals.insert(event.id, others + update.passes);

        state.guest.first_name = update.first_name;
        state.guest.last_name = update.last_name;
        state.guest.dni = update.dni;
        state.guest.table_number = update.table_number;
        state.guest.passes = update.passes;

        Ok(state.guest.clone())
    }

    /// Remove a guest.
    ///
    /// # Errors
    ///
    /// Fails when the guest is unknown or has recorded admissions.
    pub async fn delete(&self, guest_id: GuestId) -> Result<Guest, AccessError> {
        let mut inner = self.inner.write().await;
        let cell = Arc::clone(inner.guests.get(&guest_id).ok_or(AccessError::UnknownGuest)?);
        let state = cell.lock().await;

        if !state.records.is_empty() {
            return Err(AccessError::GuestHasAccesses);
        }

        let guest = state.guest.clone();
        drop(state);

        inner.guests.remove(&guest_id);
        inner.credentials.remove(guest.credential.as_str());
        inner.identities.remove(&(guest.event_id, guest.dni.clone()));
        if let Some(total) = inner.pass_totals.get_mut(&guest.event_id) {
            *total = total.saturating_sub(guest.passes);
        }

        Ok(guest)
    }

    /// Snapshot of all guests registered for an event.
    pub async fn list_for_event(&self, event_id: EventId) -> Vec<Guest> {
        let cells: Vec<GuestCell> = {
            let inner = self.inner.read().await;
            inner.guests.values().map(Arc::clone).collect()
        };
        let mut guests = Vec::new();
        for cell in cells {
            let state = cell.lock().await;
            if state.guest.event_id == event_id {
                guests.push(state.guest.clone());
            }
        }
        guests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        guests
    }

    /// Total passes currently allotted to an event's guests.
    pub async fn allocated_passes(&self, event_id: EventId) -> u32 {
        let inner = self.inner.read().await;
        inner.pass_totals.get(&event_id).copied().unwrap_or(0)
    }
}

fn validate_profile(dni: &str, table_number: u32, passes: u32) -> Result<(), AccessError> {
    if dni.chars().count() != DNI_LEN {
        return Err(AccessError::Validation(format!(
            "identity number must be exactly {DNI_LEN} characters"
        )));
    }
    if table_number < 1 {
        return Err(AccessError::Validation(
            "table number must be at least 1".into(),
        ));
    }
    if !(MIN_PASSES..=MAX_PASSES).contains(&passes) {
        return Err(AccessError::Validation(format!(
            "passes must be between {MIN_PASSES} and {MAX_PASSES}"
        )));
    }
    Ok(())
}

fn issue_credential(existing: &HashMap<String, GuestId>) -> String {
    loop {
        let candidate: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CREDENTIAL_LEN)
            .map(char::from)
            .collect();
        if !existing.contains_key(&candidate) {
            return candidate;
        }
    }
}
