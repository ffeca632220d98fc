//! Staff directory: provisioning and token resolution.
//!
//! Staff identity is deliberately thin. Actors are provisioned with a
//! bearer token; full identity management lives outside this service.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::BoxFuture;
use crate::error::AccessError;
use crate::types::{Staff, StaffId};

/// Bearer token identifying a staff actor on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StaffToken(String);

impl StaffToken {
    /// Wrap a raw token string
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// The token as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Provisioning and authentication of staff actors.
pub trait StaffDirectory: Send + Sync {
    /// Register a staff actor and issue a bearer token.
    fn provision(&self, name: String) -> BoxFuture<'_, Result<(Staff, StaffToken), AccessError>>;

    /// Resolve a bearer token to the staff actor it was issued to.
    fn resolve_token(&self, token: &StaffToken) -> BoxFuture<'_, Option<Staff>>;
}

/// In-memory staff directory.
#[derive(Debug, Default)]
pub struct InMemoryStaffDirectory {
    by_token: Arc<RwLock<HashMap<StaffToken, Staff>>>,
}

impl InMemoryStaffDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StaffDirectory for InMemoryStaffDirectory {
    fn provision(&self, name: String) -> BoxFuture<'_, Result<(Staff, StaffToken), AccessError>> {
        Box::pin(async move {
            if name.trim().is_empty() {
                return Err(AccessError::Validation("staff name is required".into()));
            }
            let staff = Staff {
                id: StaffId::new(),
                name,
            };
            let token = StaffToken::new(Uuid::new_v4().simple().to_string());
            let mut by_token = self.by_token.write().await;
            by_token.insert(token.clone(), staff.clone());
            Ok((staff, token))
        })
    }

    fn resolve_token(&self, token: &StaffToken) -> BoxFuture<'_, Option<Staff>> {
        let token = token.clone();
        Box::pin(async move {
            let by_token = self.by_token.read().await;
            by_token.get(&token).cloned()
        })
    }
}
