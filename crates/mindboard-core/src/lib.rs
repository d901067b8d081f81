//! # Mindboard Core
//!
//! Core types, errors, and utilities shared across the Mindboard
//! workspace. Provides the error taxonomy, the engine-wide tunables, and
//! the event bus used for best-effort side-channel notifications.

pub mod constants;
pub mod error;
pub mod event_bus;

pub use error::{DocumentError, Error, HistoryError, PersistenceError, Result};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, DocumentEvent, EntityEvent, ErrorEvent, EventBus, EventBusConfig, EventCategory,
    EventFilter, HistoryEvent, LayerEvent, SubscriptionId,
};
