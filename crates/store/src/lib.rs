//! In-memory advertisement catalog and the read-only data sources it serves.

pub mod catalog;
pub mod memory;

pub use catalog::Catalog;
pub use memory::{ContentStore, ProfileStore, TargetingGroupStore};
