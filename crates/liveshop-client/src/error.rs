//! Transport-to-domain error mapping
//!
//! Every reqwest failure or non-2xx response becomes a `SyncError` here, so
//! the engine only ever sees the taxonomy it knows how to handle.

use liveshop_core::SyncError;

/// Map a transport error on a fetch path to a transient error
pub(crate) fn map_fetch_error(err: &reqwest::Error) -> SyncError {
    SyncError::transient(err.to_string())
}

/// Map a non-2xx fetch response to a transient error
pub(crate) fn map_fetch_status(status: reqwest::StatusCode) -> SyncError {
    SyncError::transient(format!("unexpected status {status}"))
}

/// Map a transport error on the chat send path
pub(crate) fn map_send_error(err: &reqwest::Error) -> SyncError {
    SyncError::SendFailed(err.to_string())
}

/// Map a transport error on the payment initiation path
pub(crate) fn map_initiate_error(err: &reqwest::Error) -> SyncError {
    SyncError::InitiationFailed(err.to_string())
}
