//! Tapdeck: a client-local networking CRM.
//!
//! The contact store owns the data; everything derived (event rollups,
//! analytics series, urgency badges) is recomputed from a point-in-time
//! snapshot of the contact list. No aggregator mutates the store.

pub mod analytics;
pub mod cache;
pub mod error;
pub mod events;
pub mod export;
pub mod followup;
pub mod store;
pub mod types;
pub mod util;

pub use analytics::{compute_analytics, AnalyticsSnapshot};
pub use cache::SnapshotCache;
pub use error::StoreError;
pub use events::{aggregate_events, EventAggregate};
pub use followup::{classify_urgency, Urgency};
pub use store::ContactStore;
pub use types::{CardProfile, Contact, FollowUpStatus};
