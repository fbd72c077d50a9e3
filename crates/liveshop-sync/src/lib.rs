//! # liveshop-sync
//!
//! The polling synchronization engine behind live chat delivery and payment
//! confirmation. Four cooperating parts:
//!
//! - [`cursor::CursorStore`] tracks the last-seen position per subscription.
//! - [`scheduler::PollScheduler`] drives fetches at a fixed interval,
//!   enforces non-overlap structurally (one task, serialized ticks), and
//!   stops on detach, terminal outcome, or attempt exhaustion.
//! - [`merge`] folds fetched chat items into the client-held ordered log,
//!   deduplicating by id.
//! - [`payment`] classifies provider statuses into continue/stop and runs
//!   the checkout confirmation flow.

pub mod chat;
pub mod cursor;
pub mod merge;
pub mod payment;
pub mod scheduler;

pub use chat::ChatSession;
pub use cursor::CursorStore;
pub use payment::{PaymentFlow, PaymentReceipt, PendingPayment};
pub use scheduler::{PollHandle, PollScheduler, PollState, PollTask, StopReason, TickOutcome};
