//! Ledger reducer: the pure state machine for one guest's admissions.
//!
//! All balance mutation happens here, driven by actions, with side effects
//! described as [`Effect`] values for the shell to run. The reducer never
//! performs I/O itself, which keeps every admission rule unit-testable with
//! a fixed clock.

use std::sync::Arc;

use chrono::Duration;
use gatepass_core::{
    effect::Effect,
    environment::Clock,
    reducer::Reducer,
    smallvec, SmallVec,
};

use super::eligibility::{self, Decision, DenyReason};
use crate::directory::BoxFuture;
use crate::types::{AccessRecord, AccessRecordId, AccessType, EventStatus, Guest};

/// Receives committed access records for downstream consumers.
pub trait AccessSink: Send + Sync {
    /// Publish a committed record. Must not fail; consumers that can fail
    /// should buffer internally.
    fn publish(&self, record: AccessRecord) -> BoxFuture<'static, ()>;
}

/// Per-guest ledger state: the guest's balance plus every record committed
/// for them, in commit order.
#[derive(Clone, Debug)]
pub struct GuestLedgerState {
    /// The guest and their current balance
    pub guest: Guest,
    /// Records committed for this guest, oldest first
    pub records: Vec<AccessRecord>,
    /// Outcome of the most recent action, for the shell to report
    pub last_outcome: Option<CommitOutcome>,
}

impl GuestLedgerState {
    /// Fresh state for a guest with no recorded admissions
    #[must_use]
    pub const fn new(guest: Guest) -> Self {
        Self {
            guest,
            records: Vec::new(),
            last_outcome: None,
        }
    }
}

/// Result of processing one admission action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new record was appended and the balance updated
    Recorded(AccessRecord),
    /// The scan duplicated a recent identical one; the prior record stands
    Deduplicated(AccessRecord),
    /// The admission was rejected
    Denied(DenyReason),
}

/// Actions the ledger reducer accepts.
#[derive(Clone, Debug)]
pub enum LedgerAction {
    /// Attempt to commit an admission for the guest
    RecordAccess {
        /// Event status as read inside the serialization unit
        event_status: EventStatus,
        /// People count as received, validated by the reducer
        people_count: i64,
        /// Entry or exit
        access_type: AccessType,
        /// Optional operator note
        observations: Option<String>,
    },
}

/// Dependencies the reducer needs from its environment.
pub struct LedgerEnvironment {
    /// Clock for record timestamps and dedup windows
    pub clock: Arc<dyn Clock>,
    /// Sink committed records are published to
    pub sink: Arc<dyn AccessSink>,
    /// Duplicate-scan suppression window; `None` disables deduplication
    pub dedup_window: Option<Duration>,
}

impl LedgerEnvironment {
    /// Build an environment
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AccessSink>,
        dedup_window: Option<Duration>,
    ) -> Self {
        Self {
            clock,
            sink,
            dedup_window,
        }
    }
}

/// The ledger reducer.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerReducer;

impl LedgerReducer {
    /// Create a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn find_duplicate(
        state: &GuestLedgerState,
        env: &LedgerEnvironment,
        people_count: i64,
        access_type: AccessType,
    ) -> Option<AccessRecord> {
        let window = env.dedup_window?;
        let last = state.records.last()?;
        let same_shape = last.access_type == access_type
            && i64::from(last.people_count) == people_count;
        let recent = env.clock.now() - last.recorded_at <= window;
        (same_shape && recent).then(|| last.clone())
    }

    fn apply_record(state: &mut GuestLedgerState, record: &AccessRecord) {
        if record.access_type == AccessType::Entry {
            state.guest.used_passes += record.people_count;
        }
        state.guest.last_access = Some(record.recorded_at);
        state.records.push(record.clone());
    }
}

impl Reducer for LedgerReducer {
    type State = GuestLedgerState;
    type Action = LedgerAction;
    type Environment = LedgerEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LedgerAction::RecordAccess {
                event_status,
                people_count,
                access_type,
                observations,
            } => {
                if let Some(prior) =
                    Self::find_duplicate(state, env, people_count, access_type)
                {
                    state.last_outcome = Some(CommitOutcome::Deduplicated(prior));
                    return smallvec![Effect::None];
                }

                match eligibility::evaluate(event_status, &state.guest, people_count, access_type)
                {
                    Decision::Deny(reason) => {
                        state.last_outcome = Some(CommitOutcome::Denied(reason));
                        smallvec![Effect::None]
                    }
                    Decision::Admit => {
                        // evaluate() admits only counts that fit in u32
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let people_count = people_count as u32;
                        let record = AccessRecord {
                            id: AccessRecordId::new(),
                            guest_id: state.guest.id,
                            event_id: state.guest.event_id,
                            people_count,
                            access_type,
                            recorded_at: env.clock.now(),
                            observations,
                        };
                        Self::apply_record(state, &record);
                        state.last_outcome = Some(CommitOutcome::Recorded(record.clone()));

                        let sink = Arc::clone(&env.sink);
                        smallvec![Effect::future(async move {
                            sink.publish(record).await;
                            None
                        })]
                    }
                }
            }
        }
    }
}
