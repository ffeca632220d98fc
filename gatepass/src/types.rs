//! Domain types for the guest access ledger.
//!
//! This module contains the value objects and entities shared across the
//! service: identifiers, the event lifecycle, guests with their pass
//! balances, and the immutable access records the ledger appends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a guest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(Uuid);

impl GuestId {
    /// Creates a new random `GuestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `GuestId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a staff actor (gate operator)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(Uuid);

impl StaffId {
    /// Creates a new random `StaffId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `StaffId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StaffId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an access record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRecordId(Uuid);

impl AccessRecordId {
    /// Creates a new random `AccessRecordId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccessRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccessRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Credential
// ============================================================================

/// Opaque scannable token uniquely identifying a guest.
///
/// Issued once at guest creation (collision-checked against every existing
/// credential) and immutable afterwards. The ledger resolves scans by exact
/// match on this value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    /// Wrap an already-issued credential string
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// The credential as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Event
// ============================================================================

/// Event lifecycle status.
///
/// The sole source of truth for whether admission is permitted: only
/// `InProgress` allows entry-type admissions. Matching on this enum is
/// exhaustive everywhere so that a new status is a compile-time-visible
/// change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Event is planned but has not started
    Scheduled,
    /// Event is running; entries are permitted
    InProgress,
    /// Event has finished
    Completed,
    /// Event was cancelled
    Cancelled,
}

impl EventStatus {
    /// Human-readable label for gate-device messages
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Event entity.
///
/// Capacity is an informational upper bound on the total passes allotted to
/// the event's guests; it is enforced at guest-creation time, never at scan
/// time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Upper bound on total guest passes
    pub capacity: u32,
    /// Current lifecycle status
    pub status: EventStatus,
    /// When the event was created
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new `Event` in `Scheduled` status
    #[must_use]
    pub const fn new(id: EventId, name: String, capacity: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            capacity,
            status: EventStatus::Scheduled,
            created_at,
        }
    }
}

// ============================================================================
// Guest
// ============================================================================

/// Guest entity with its pass balance.
///
/// Invariant: `used_passes <= passes` at all times. The balance fields are
/// written only by the access ledger's commit step, under the guest's
/// serialization unit; administrative edits go through the same unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// Unique guest identifier
    pub id: GuestId,
    /// Event this guest is invited to
    pub event_id: EventId,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// National identity number, unique per event
    pub dni: String,
    /// Table assignment
    pub table_number: u32,
    /// Total allotted passes (>= 1)
    pub passes: u32,
    /// Passes consumed by entry admissions
    pub used_passes: u32,
    /// The guest's scannable credential
    pub credential: Credential,
    /// Timestamp of the most recent admission, if any
    pub last_access: Option<DateTime<Utc>>,
    /// When the guest was created
    pub created_at: DateTime<Utc>,
}

impl Guest {
    /// Full display name
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Passes still available for entry admissions
    #[must_use]
    pub const fn remaining_passes(&self) -> u32 {
        self.passes - self.used_passes
    }

    /// Whether an entry for `people_count` fits the remaining balance
    #[must_use]
    pub const fn can_admit(&self, people_count: u32) -> bool {
        self.used_passes + people_count <= self.passes
    }
}

/// Read-only guest summary returned by the scan dry-run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSummary {
    /// Guest identifier
    pub id: GuestId,
    /// Full display name
    pub full_name: String,
    /// National identity number
    pub dni: String,
    /// Table assignment
    pub table_number: u32,
    /// Total allotted passes
    pub total_passes: u32,
    /// Passes still available
    pub available_passes: u32,
    /// Name of the event the guest belongs to
    pub event_name: String,
}

// ============================================================================
// Access records
// ============================================================================

/// Whether an admission records people entering or leaving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// People entering; consumes passes
    Entry,
    /// People leaving; advisory only, never consumes passes
    Exit,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// Immutable ledger entry for one admission.
///
/// Appended atomically with the guest balance update; never mutated or
/// deleted afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Unique record identifier
    pub id: AccessRecordId,
    /// Guest the admission belongs to
    pub guest_id: GuestId,
    /// Event the admission belongs to
    pub event_id: EventId,
    /// Number of people admitted or released (>= 1)
    pub people_count: u32,
    /// Entry or exit
    pub access_type: AccessType,
    /// When the admission was committed
    pub recorded_at: DateTime<Utc>,
    /// Optional free-text observation from the gate operator
    pub observations: Option<String>,
}

// ============================================================================
// Scope grants and staff
// ============================================================================

/// Authorization linking a staff actor to an event.
///
/// Only active grants authorize admission operations on the event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeGrant {
    /// The staff actor the grant belongs to
    pub staff_id: StaffId,
    /// The event the grant covers
    pub event_id: EventId,
    /// Whether the grant currently authorizes operations
    pub active: bool,
}

/// A staff actor known to the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique staff identifier
    pub id: StaffId,
    /// Display name
    pub name: String,
}
