//! Jurisdiction priors module
//!
//! Historical appeal statistics per taxing jurisdiction, the conservative
//! fallback used when none exist, and the reference-data lookup seam.

mod priors;
mod store;

pub use priors::{default_priors, JurisdictionPriors, JurisdictionPriorsBuilder};
pub use store::{InMemoryPriorsStore, PriorsRecord, PriorsStore};
