//! Application layer logic for taskdeck.
//!
//! This crate owns the mutable task store, the clocks that stamp it, shared
//! access for multiple surfaces, and the host preferences file.

pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod shared;
pub mod store;

// Re-exports for convenience
pub use board::TaskBoard;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Preferences, Theme, ViewConfig};
pub use error::{StoreError, StoreResult};
pub use shared::SharedTaskStore;
pub use store::TaskStore;
