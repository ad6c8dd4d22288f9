//! Price alert persistence, evaluation ticks and notification handoff.

pub mod memory;
pub mod notifier;
pub mod poller;
pub mod repository;
pub mod repository_sqlx;
pub mod service;
pub mod store;

pub use memory::MemoryKeyValueStore;
pub use notifier::{AlertNotifier, LogNotifier, TriggeredAlert};
pub use repository::KeyValueStore;
pub use repository_sqlx::SqlxKeyValueStore;
pub use service::{AlertService, TickReport};
pub use store::{AlertStore, StoreError};
