//! Authentication and authorization.

mod middleware;
mod scope;

pub use middleware::{BearerToken, SessionStaff};
pub use scope::ScopeAuthority;
