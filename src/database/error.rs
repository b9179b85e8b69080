//! Error type shared by every store operation.

use mongodb::bson;
use thiserror::Error;

/// Failure of a single repository operation.
///
/// Driver errors are carried verbatim; this layer adds only the
/// conditions it detects itself (no match, cancellation, codec failures).
#[derive(Debug, Error)]
pub enum StoreError {
    /// FindOne matched zero documents.
    #[error("no document matched the filter")]
    NotFound,

    /// The operation's context was cancelled before the store answered.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation's context deadline passed before the store answered.
    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// The caller's document could not be converted to BSON.
    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    /// A matched document did not fit the requested result shape.
    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    /// Anything reported by the driver: connectivity, server errors, timeouts.
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

impl StoreError {
    /// `true` if the operation failed only because nothing matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// `true` for both explicit cancellation and an expired deadline.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}
