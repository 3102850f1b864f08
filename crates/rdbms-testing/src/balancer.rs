//! A load balancer that records what it is asked for.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rdbms_balancer::{ConnectionFlags, Domain, Groups, LoadBalancer, Target};
use thiserror::Error;

use crate::connection::{MockConnection, MockConnectionRef};

/// The parameters of one acquisition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Requested server role.
    pub target: Target,
    /// Groups as received.
    pub groups: Groups,
    /// Domain as received.
    pub domain: Domain,
    /// Flags as received; empty for the ref paths.
    pub flags: ConnectionFlags,
}

impl Request {
    /// Create a request description.
    pub fn new(
        target: Target,
        groups: impl Into<Groups>,
        domain: Domain,
        flags: ConnectionFlags,
    ) -> Self {
        Self {
            target,
            groups: groups.into(),
            domain,
            flags,
        }
    }
}

/// One call made on a [`RecordingLoadBalancer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Eager `connection` acquisition.
    Connection(Request),
    /// Eager `connection_ref` acquisition.
    ConnectionRef(Request),
    /// Deferred `lazy_connection_ref` creation.
    LazyConnectionRef(Request),
    /// `reuse_connection` of an eager handle.
    Reuse {
        /// ID of the returned handle.
        connection_id: u64,
    },
}

impl Call {
    /// Get the request, if this call was an acquisition.
    #[must_use]
    pub fn request(&self) -> Option<&Request> {
        match self {
            Self::Connection(request)
            | Self::ConnectionRef(request)
            | Self::LazyConnectionRef(request) => Some(request),
            Self::Reuse { .. } => None,
        }
    }

    /// Check if this call acquired a connection immediately.
    #[must_use]
    pub fn is_eager(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ConnectionRef(_))
    }
}

/// Errors a [`RecordingLoadBalancer`] can be scripted to return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockError {
    /// No server with the requested role is reachable.
    #[error("no {target} server available")]
    NoServerAvailable {
        /// Requested role.
        target: Target,
    },

    /// The domain is not known to the balancer.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// The server refused the connection.
    #[error("connection refused")]
    ConnectionRefused,
}

/// A scripted [`LoadBalancer`] for tests.
///
/// Every call is appended to an in-order log available from
/// [`calls()`](Self::calls). Acquisitions succeed with handles that carry
/// their [`Request`] unless a failure was queued with
/// [`fail_next()`](Self::fail_next).
#[derive(Debug, Default)]
pub struct RecordingLoadBalancer {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    failure: Mutex<Option<MockError>>,
    released_refs: Arc<AtomicU64>,
}

impl RecordingLoadBalancer {
    /// Create a balancer with an empty call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next acquisition (eager or lazy) fail with `error`.
    pub fn fail_next(&self, error: MockError) {
        *self.failure.lock() = Some(error);
    }

    /// Get a copy of the call log.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Get the most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    /// Number of calls that acquired a connection immediately.
    #[must_use]
    pub fn eager_acquisitions(&self) -> usize {
        self.calls.lock().iter().filter(|call| call.is_eager()).count()
    }

    /// Number of ref handles dropped so far.
    #[must_use]
    pub fn released_refs(&self) -> u64 {
        self.released_refs.load(Ordering::Relaxed)
    }

    /// Clear the call log.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: Call) -> Result<u64, MockError> {
        tracing::trace!(call = ?call, "load balancer call");
        self.calls.lock().push(call);
        if let Some(error) = self.failure.lock().take() {
            return Err(error);
        }
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl LoadBalancer for RecordingLoadBalancer {
    type Connection = MockConnection;
    type ConnectionRef = MockConnectionRef;
    type Error = MockError;

    async fn connection(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
        flags: ConnectionFlags,
    ) -> Result<Self::Connection, Self::Error> {
        let request = Request::new(target, groups.clone(), domain.clone(), flags);
        let id = self.record(Call::Connection(request.clone()))?;
        Ok(MockConnection { id, request })
    }

    async fn connection_ref(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
    ) -> Result<Self::ConnectionRef, Self::Error> {
        let request = Request::new(target, groups.clone(), domain.clone(), ConnectionFlags::empty());
        let id = self.record(Call::ConnectionRef(request.clone()))?;
        Ok(MockConnectionRef::new(
            id,
            false,
            request,
            Arc::clone(&self.released_refs),
        ))
    }

    fn lazy_connection_ref(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
    ) -> Result<Self::ConnectionRef, Self::Error> {
        let request = Request::new(target, groups.clone(), domain.clone(), ConnectionFlags::empty());
        let id = self.record(Call::LazyConnectionRef(request.clone()))?;
        Ok(MockConnectionRef::new(
            id,
            true,
            request,
            Arc::clone(&self.released_refs),
        ))
    }

    fn reuse_connection(&self, connection: Self::Connection) {
        tracing::trace!(connection_id = connection.id, "connection reused");
        self.calls.lock().push(Call::Reuse {
            connection_id: connection.id,
        });
    }
}
