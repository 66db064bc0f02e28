//! Admission control
//!
//! Per-identity request budgets with two strategies chosen once at startup:
//! an in-memory token bucket, or a fixed-window counter in a shared store
//! when one is reachable. Store failures fail open.

mod distributed;
mod limiter;
mod local;
mod store;
mod types;


pub use distributed::{DEFAULT_STORE_TIMEOUT, DistributedAdmission};
pub use limiter::AdmissionController;
pub use local::LocalAdmission;
pub use store::CounterStore;
#[cfg(test)]
pub use store::MockCounterStore;
pub use types::{AdmissionDecision, AdmissionMode, ClientIdentity, WINDOW_SECS};
