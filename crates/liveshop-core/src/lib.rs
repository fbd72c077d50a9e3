//! # liveshop-core
//!
//! Domain layer for the live-shopping polling synchronization engine.
//! Contains entities, value objects, the error taxonomy, and the ports
//! (collaborator traits) the engine polls against. This crate has zero
//! dependencies on infrastructure (HTTP client, runtime timers, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChatMessage, MessageKind, OrderRecord, PaymentRequest};
pub use error::{SyncError, SyncResult};
pub use traits::{ChatPage, ChatStore, OrderSink, PaymentGateway, PaymentStatus};
pub use value_objects::{Cursor, PaymentId, RoomId, SubscriptionId, SubscriptionKind};
