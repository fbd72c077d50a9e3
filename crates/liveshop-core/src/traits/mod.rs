//! Collaborator ports - the black-box services the engine polls
//!
//! The domain layer defines what it needs; infrastructure crates (HTTP
//! clients) and test fakes provide the implementations.

mod collaborators;

pub use collaborators::{ChatPage, ChatStore, OrderSink, PaymentGateway, PaymentStatus};
