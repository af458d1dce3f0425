//! Password-gated record administration.
//!
//! The secret is a plain shared string from configuration. There is no
//! session model: an [`AdminPanel`] only exists after a successful
//! [`AdminPanel::login`], and the mutating service operations require one.

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AdminConfig;
use crate::record::RecordCollection;

/// Reasons an admin operation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// The submitted secret did not match.
    #[error("incorrect password")]
    AuthenticationFailed,

    /// The target row does not exist, usually because the listing was stale.
    #[error("no record at index {index} (collection has {len})")]
    IndexOutOfRange {
        /// The requested position.
        index: i64,
        /// Size of the collection at the time of the request.
        len: usize,
    },
}

/// Check `submitted` against the configured secret.
///
/// This is exact string equality. The comparison goes through BLAKE3 digests
/// so it does not short-circuit on the first differing byte.
#[must_use]
pub fn authenticate(submitted: &str, config: &AdminConfig) -> bool {
    blake3::hash(submitted.as_bytes()) == blake3::hash(config.secret.as_bytes())
}

/// Return `collection` without the record at `index`.
///
/// # Errors
///
/// Returns [`AdminError::IndexOutOfRange`] if `index` is negative or not less
/// than the collection length.
pub fn delete_record(
    collection: &RecordCollection,
    index: i64,
) -> Result<RecordCollection, AdminError> {
    let out_of_range = AdminError::IndexOutOfRange {
        index,
        len: collection.len(),
    };
    let position = usize::try_from(index).map_err(|_| out_of_range.clone())?;
    collection.without(position).ok_or(out_of_range)
}

/// Return an empty collection, whatever the input.
#[must_use]
pub fn clear_all(collection: &RecordCollection) -> RecordCollection {
    debug!("Clearing {} records", collection.len());
    RecordCollection::new()
}

/// Proof of a successful admin login.
#[derive(Debug)]
pub struct AdminPanel {
    _private: (),
}

impl AdminPanel {
    /// Open the admin panel.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::AuthenticationFailed`] if the secret is wrong.
    pub fn login(submitted: &str, config: &AdminConfig) -> Result<Self, AdminError> {
        if authenticate(submitted, config) {
            debug!("Admin login accepted");
            Ok(Self { _private: () })
        } else {
            warn!("Admin login rejected");
            Err(AdminError::AuthenticationFailed)
        }
    }
}
