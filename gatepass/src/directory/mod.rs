//! Directories for events and staff.
//!
//! The traits here are the seams between the ledger core and whatever
//! stores events and staff actors. Methods return boxed futures so the
//! traits stay dyn-compatible and can be mocked in tests.

use std::future::Future;
use std::pin::Pin;

mod events;
mod staff;

pub use events::{EventDirectory, InMemoryEventDirectory};
pub use staff::{InMemoryStaffDirectory, StaffDirectory, StaffToken};

/// Boxed future used by dyn-compatible directory traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
