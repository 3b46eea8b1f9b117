//! Per-request state.

mod identity;
pub use identity::IdentityTracker;

mod request;
pub use request::{RequestScope, ScopeState};
