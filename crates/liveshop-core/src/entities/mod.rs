//! Domain entities

mod message;
mod order;

pub use message::{ChatMessage, MessageKind};
pub use order::{OrderRecord, PaymentRequest};
