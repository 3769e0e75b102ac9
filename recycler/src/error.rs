use alloc::string::String;

use thiserror::Error;

/// Rejected store mutation. The store is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid range: {count} item(s) from {from} in a store of {len}")]
    InvalidRange {
        from: usize,
        count: usize,
        len: usize,
    },
}

/// Raised by a [`crate::ChangeSink`] that cannot apply a structural operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The host view is in a state where it refuses the update (e.g. mid-layout).
    #[error("host rejected update: {0}")]
    Rejected(String),
    /// The update referenced positions the host does not know about.
    #[error("host out of sync at position {position}")]
    OutOfSync { position: usize },
}

/// The sticky overlay could not be measured or laid out.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeasureError {
    #[error("header at position {0} is not in the store")]
    MissingHeader(usize),
    #[error("host failed to measure header at position {position}: {reason}")]
    Host { position: usize, reason: String },
}
