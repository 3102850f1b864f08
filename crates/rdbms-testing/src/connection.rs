//! Handles produced by the recording balancer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::balancer::Request;

/// An eager connection handle.
///
/// Must be handed back through `reuse_connection`; dropping it does
/// nothing.
#[derive(Debug, PartialEq, Eq)]
pub struct MockConnection {
    /// Unique handle ID.
    pub id: u64,
    /// The request this handle answers.
    pub request: Request,
}

/// A self-releasing connection handle.
///
/// Dropping it counts as a release on the balancer that produced it.
#[derive(Debug)]
pub struct MockConnectionRef {
    id: u64,
    lazy: bool,
    request: Request,
    released: Arc<AtomicU64>,
}

impl MockConnectionRef {
    pub(crate) fn new(id: u64, lazy: bool, request: Request, released: Arc<AtomicU64>) -> Self {
        Self {
            id,
            lazy,
            request,
            released,
        }
    }

    /// Unique handle ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether acquisition was deferred when the handle was created.
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// The request this handle answers.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl Drop for MockConnectionRef {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            connection_id = self.id,
            lazy = self.lazy,
            "connection ref released"
        );
    }
}
