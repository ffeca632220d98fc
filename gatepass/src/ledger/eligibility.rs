//! Pure eligibility rules for admissions.
//!
//! [`evaluate`] is a total function over event status, guest balance, and
//! the requested admission. Rule precedence is fixed: event status first,
//! then the people count, then the pass balance. A request that fails an
//! earlier rule reports that rule's reason even if later rules would also
//! fail.

use crate::types::{AccessType, EventStatus, Guest};

/// Outcome of an eligibility evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The admission may be committed
    Admit,
    /// The admission must be rejected
    Deny(DenyReason),
}

/// Why an admission was denied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// Event status does not permit the admission
    EventNotActive {
        /// The event's status at evaluation time
        status: EventStatus,
    },
    /// People count is below 1
    InvalidCount {
        /// The rejected count as received
        requested: i64,
    },
    /// Entry would exceed the guest's remaining balance
    InsufficientPasses {
        /// People count requested
        requested: u32,
        /// Passes still available
        remaining: u32,
    },
}

/// Evaluate whether an admission is eligible.
///
/// Entries require the event to be in progress and consume passes; exits
/// are advisory, permitted in any status except cancelled, and never touch
/// the balance.
#[must_use]
pub fn evaluate(
    status: EventStatus,
    guest: &Guest,
    people_count: i64,
    access_type: AccessType,
) -> Decision {
    let status_ok = match (access_type, status) {
        (AccessType::Entry, EventStatus::InProgress) => true,
        (AccessType::Entry, _) => false,
        (AccessType::Exit, EventStatus::Cancelled) => false,
        (AccessType::Exit, _) => true,
    };
    if !status_ok {
        return Decision::Deny(DenyReason::EventNotActive { status });
    }

    if people_count < 1 {
        return Decision::Deny(DenyReason::InvalidCount {
            requested: people_count,
        });
    }
    let Ok(requested) = u32::try_from(people_count) else {
        return Decision::Deny(DenyReason::InvalidCount {
            requested: people_count,
        });
    };

    if access_type == AccessType::Entry && !guest.can_admit(requested) {
        return Decision::Deny(DenyReason::InsufficientPasses {
            requested,
            remaining: guest.remaining_passes(),
        });
    }

    Decision::Admit
}
