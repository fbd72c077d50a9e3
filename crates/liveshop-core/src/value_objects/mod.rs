//! Value objects - cursors, identifiers, and subscription handles

mod cursor;
mod ids;
mod subscription;

pub use cursor::Cursor;
pub use ids::{PaymentId, RoomId};
pub use subscription::{SubscriptionId, SubscriptionKind};
