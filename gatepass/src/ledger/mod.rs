//! The access ledger: admission commits and guest administration.
//!
//! [`AccessLedger`] is the imperative shell around the pure pieces in
//! [`eligibility`] and [`reducer`]. A commit resolves the credential,
//! enters the guest's serialization unit, re-reads authorization and event
//! status inside it, runs the reducer, and executes the resulting effects
//! before releasing the unit. Two simultaneous scans for the same guest
//! therefore observe each other's balance updates; scans for different
//! guests proceed in parallel.

use std::sync::Arc;

use chrono::Duration;
use gatepass_core::{effect::Effect, environment::Clock, reducer::Reducer};
use metrics::counter;
use tracing::{debug, info, warn};

pub mod eligibility;
pub mod reducer;
mod registry;

pub use eligibility::{Decision, DenyReason};
pub use reducer::{
    AccessSink, CommitOutcome, GuestLedgerState, LedgerAction, LedgerEnvironment, LedgerReducer,
};
pub use registry::{GuestCell, GuestRegistry, GuestUpdate, NewGuest};

use crate::directory::EventDirectory;
use crate::error::AccessError;
use crate::types::{
    AccessRecord, AccessType, Event, EventId, Guest, GuestId, GuestSummary, Staff,
};
use crate::auth::ScopeAuthority;

/// Result of a committed scan, as reported to the gate device.
#[derive(Clone, Debug)]
pub struct CommitReceipt {
    /// The record that stands for this scan
    pub record: AccessRecord,
    /// Guest display name for the operator
    pub guest_name: String,
    /// Passes remaining after the commit
    pub remaining_passes: u32,
    /// True when the scan duplicated a recent identical one and the prior
    /// record was returned instead of appending a new one
    pub duplicate: bool,
}

/// The access ledger service.
pub struct AccessLedger {
    registry: GuestRegistry,
    events: Arc<dyn EventDirectory>,
    scopes: Arc<ScopeAuthority>,
    sink: Arc<dyn AccessSink>,
    clock: Arc<dyn Clock>,
    dedup_window: Option<Duration>,
    reducer: LedgerReducer,
}

impl AccessLedger {
    /// Build a ledger over the given directories and sink.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventDirectory>,
        scopes: Arc<ScopeAuthority>,
        sink: Arc<dyn AccessSink>,
        clock: Arc<dyn Clock>,
        dedup_window_secs: u64,
    ) -> Self {
        let dedup_window = match i64::try_from(dedup_window_secs) {
            Ok(secs) if secs > 0 => Some(Duration::seconds(secs)),
            _ => None,
        };
        Self {
            registry: GuestRegistry::new(),
            events,
            scopes,
            sink,
            clock,
            dedup_window,
            reducer: LedgerReducer::new(),
        }
    }

    // ------------------------------------------------------------------
    // Scanning
    // ------------------------------------------------------------------

    /// Commit an admission for a scanned credential.
    ///
    /// Authorization and event status are read inside the guest's
    /// serialization unit, so a revoked grant or a status change is
    /// honored by every scan that commits after it.
    ///
    /// # Errors
    ///
    /// Returns the reason the admission was rejected; the ledger is
    /// unchanged in that case.
    pub async fn commit(
        &self,
        staff: &Staff,
        credential: &str,
        people_count: i64,
        access_type: AccessType,
        observations: Option<String>,
    ) -> Result<CommitReceipt, AccessError> {
        let Some((guest_id, cell)) = self.registry.resolve(credential).await else {
            counter!("gatepass_scans_total", "outcome" => "unknown_credential").increment(1);
            warn!(staff_id = %staff.id, "scan with unknown credential");
            return Err(AccessError::UnknownCredential);
        };

        let mut state = cell.lock().await;
        let event_id = state.guest.event_id;

        if !self.scopes.authorizes(staff.id, event_id).await {
            counter!("gatepass_scans_total", "outcome" => "not_authorized").increment(1);
            warn!(staff_id = %staff.id, %event_id, "scan by unauthorized staff");
            return Err(AccessError::NotAuthorized);
        }

        let event = self.events.get(event_id).await?;

        let env = LedgerEnvironment::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.sink),
            self.dedup_window,
        );
        let action = LedgerAction::RecordAccess {
            event_status: event.status,
            people_count,
            access_type,
            observations,
        };

        let effects = self.reducer.reduce(&mut state, action, &env);
        for effect in effects {
            if let Effect::Future(fut) = effect {
                // The publish runs on its own task so a caller that drops
                // the request mid-commit cannot take the feed update with
                // it; awaiting the handle keeps the feed current before
                // the response goes out.
                let publish = tokio::spawn(fut);
                let _ = publish.await;
            }
        }

        let outcome = state
            .last_outcome
            .clone()
            .ok_or_else(|| AccessError::Storage("reducer produced no outcome".into()))?;

        match outcome {
            CommitOutcome::Recorded(record) => {
                counter!("gatepass_scans_total", "outcome" => "recorded").increment(1);
                info!(
                    %guest_id,
                    %event_id,
                    people = record.people_count,
                    access_type = %record.access_type,
                    "admission recorded"
                );
                Ok(CommitReceipt {
                    guest_name: state.guest.full_name(),
                    remaining_passes: state.guest.remaining_passes(),
                    record,
                    duplicate: false,
                })
            }
            CommitOutcome::Deduplicated(record) => {
                counter!("gatepass_scans_total", "outcome" => "deduplicated").increment(1);
                debug!(%guest_id, %event_id, "duplicate scan absorbed");
                Ok(CommitReceipt {
                    guest_name: state.guest.full_name(),
                    remaining_passes: state.guest.remaining_passes(),
                    record,
                    duplicate: true,
                })
            }
            CommitOutcome::Denied(reason) => {
                let err = deny_to_error(reason);
                counter!("gatepass_scans_total", "outcome" => err.reason_code()).increment(1);
                debug!(%guest_id, %event_id, reason = err.reason_code(), "admission rejected");
                Err(err)
            }
        }
    }

    /// Dry-run a scan: report the guest and whether an admission would be
    /// accepted, committing nothing.
    ///
    /// # Errors
    ///
    /// Returns the reason the admission would be rejected.
    pub async fn validate(
        &self,
        staff: &Staff,
        credential: &str,
        people_count: i64,
        access_type: AccessType,
    ) -> Result<GuestSummary, AccessError> {
        let Some((_, cell)) = self.registry.resolve(credential).await else {
            return Err(AccessError::UnknownCredential);
        };
        let guest = cell.lock().await.guest.clone();

        if !self.scopes.authorizes(staff.id, guest.event_id).await {
            return Err(AccessError::NotAuthorized);
        }

        let event = self.events.get(guest.event_id).await?;

        match eligibility::evaluate(event.status, &guest, people_count, access_type) {
            Decision::Admit => {
                let full_name = guest.full_name();
                let available_passes = guest.remaining_passes();
                Ok(GuestSummary {
                    id: guest.id,
                    full_name,
                    dni: guest.dni,
                    table_number: guest.table_number,
                    total_passes: guest.passes,
                    available_passes,
                    event_name: event.name,
                })
            }
            Decision::Deny(reason) => Err(deny_to_error(reason)),
        }
    }

    // ------------------------------------------------------------------
    // Guest administration
    // ------------------------------------------------------------------

    /// Register a guest for an event.
    ///
    /// # Errors
    ///
    /// See [`GuestRegistry::create`]; also fails when the event is unknown.
    pub async fn create_guest(
        &self,
        event_id: EventId,
        new: NewGuest,
    ) -> Result<Guest, AccessError> {
        let event = self.events.get(event_id).await?;
        let guest = self.registry.create(&event, new).await?;
        info!(guest_id = %guest.id, %event_id, passes = guest.passes, "guest registered");
        Ok(guest)
    }

    /// Edit a guest's profile.
    ///
    /// # Errors
    ///
    /// See [`GuestRegistry::update`].
    pub async fn update_guest(
        &self,
        guest_id: GuestId,
        update: GuestUpdate,
    ) -> Result<Guest, AccessError> {
        let cell = self.registry.get(guest_id).await.ok_or(AccessError::UnknownGuest)?;
        let event_id = cell.lock().await.guest.event_id;
        let event = self.events.get(event_id).await?;
        self.registry.update(&event, guest_id, update).await
    }

    /// Remove a guest with no recorded admissions.
    ///
    /// # Errors
    ///
    /// See [`GuestRegistry::delete`].
    pub async fn delete_guest(&self, guest_id: GuestId) -> Result<Guest, AccessError> {
        self.registry.delete(guest_id).await
    }

    /// All guests registered for an event.
    pub async fn guests_for_event(&self, event_id: EventId) -> Vec<Guest> {
        self.registry.list_for_event(event_id).await
    }

    /// Total passes currently allotted to an event's guests.
    pub async fn allocated_passes(&self, event_id: EventId) -> u32 {
        self.registry.allocated_passes(event_id).await
    }

    /// Event lookup, shared with the HTTP layer.
    ///
    /// # Errors
    ///
    /// Fails when the event is unknown.
    pub async fn event(&self, event_id: EventId) -> Result<Event, AccessError> {
        self.events.get(event_id).await
    }
}

fn deny_to_error(reason: DenyReason) -> AccessError {
    match reason {
        DenyReason::EventNotActive { status } => AccessError::EventNotActive { status },
        DenyReason::InvalidCount { requested } => AccessError::InvalidCount { requested },
        DenyReason::InsufficientPasses {
            requested,
            remaining,
        } => AccessError::InsufficientPasses {
            requested,
            remaining,
        },
    }
}
