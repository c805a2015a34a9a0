//! Tracking engine: the storage- and browser-agnostic core of the service.
//!
//! Everything here is expressed against the [`stores`] traits, so the same
//! engine runs over Postgres and a real browser in production and over
//! in-memory fakes in tests. The concrete adapters live in the server
//! binary.

pub mod batch;
#[cfg(test)]
mod testing;
pub mod rotation;
pub mod service;
pub mod stores;

pub use batch::{run_batch, BatchConfig, BatchReport};
pub use service::{CreatedTracking, RankEngine, StopOutcome};
pub use stores::{
    EngineError, HistoryStore, Observation, ProbeError, RankProbe, StoreError, Tracking,
    TrackingStore,
};
