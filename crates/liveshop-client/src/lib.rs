//! # liveshop-client
//!
//! HTTP implementations of the collaborator ports defined in
//! `liveshop-core`: the chat fetch/send endpoint, the payment provider, and
//! the order persistence endpoint. Transport failures are mapped into the
//! `SyncError` taxonomy at this boundary; nothing upstream sees reqwest.

pub mod chat;
pub mod dto;
pub mod error;
pub mod orders;
pub mod payment;

pub use chat::HttpChatStore;
pub use orders::HttpOrderSink;
pub use payment::HttpPaymentGateway;
