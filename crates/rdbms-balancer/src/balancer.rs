//! The load balancer contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Domain;
use crate::groups::Groups;
use crate::target::{ConnectionFlags, Target};

/// A pool of database connections spread over a primary and its replicas.
///
/// Implementations own connection pooling, server selection, replica lag
/// tracking and failover. Callers only describe what they want: a target
/// role, the server groups to prefer, the logical domain, and opaque flags.
///
/// Two kinds of handle are produced:
///
/// - [`Connection`](LoadBalancer::Connection): an eager handle that must be
///   handed back through [`reuse_connection`](LoadBalancer::reuse_connection).
/// - [`ConnectionRef`](LoadBalancer::ConnectionRef): a self-releasing handle
///   returned by both the eager and the lazy ref paths. A lazy ref defers
///   acquisition until first use but looks the same to its holder.
///
/// Implementations must be safe to call concurrently with distinct
/// arguments.
#[async_trait]
pub trait LoadBalancer: Send + Sync {
    /// Eager connection handle.
    type Connection: Send;

    /// Self-releasing connection handle.
    type ConnectionRef: Send;

    /// Error reported when no connection can be provided.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Acquire a connection to a server with the given role.
    async fn connection(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
        flags: ConnectionFlags,
    ) -> Result<Self::Connection, Self::Error>;

    /// Acquire a connection wrapped in a self-releasing handle.
    async fn connection_ref(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
    ) -> Result<Self::ConnectionRef, Self::Error>;

    /// Create a self-releasing handle that connects on first use.
    ///
    /// Must not acquire a connection when called.
    fn lazy_connection_ref(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
    ) -> Result<Self::ConnectionRef, Self::Error>;

    /// Return an eager connection to the pool.
    fn reuse_connection(&self, connection: Self::Connection);
}

#[async_trait]
impl<L: LoadBalancer + ?Sized> LoadBalancer for Arc<L> {
    type Connection = L::Connection;
    type ConnectionRef = L::ConnectionRef;
    type Error = L::Error;

    async fn connection(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
        flags: ConnectionFlags,
    ) -> Result<Self::Connection, Self::Error> {
        (**self).connection(target, groups, domain, flags).await
    }

    async fn connection_ref(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
    ) -> Result<Self::ConnectionRef, Self::Error> {
        (**self).connection_ref(target, groups, domain).await
    }

    fn lazy_connection_ref(
        &self,
        target: Target,
        groups: &Groups,
        domain: &Domain,
    ) -> Result<Self::ConnectionRef, Self::Error> {
        (**self).lazy_connection_ref(target, groups, domain)
    }

    fn reuse_connection(&self, connection: Self::Connection) {
        (**self).reuse_connection(connection);
    }
}
