//! Primary/replica connection routing.

use std::fmt;

use rdbms_balancer::{ConnectionFlags, Domain, Groups, LoadBalancer, Target};

use crate::builder::ConnectionManagerBuilder;
use crate::config::ManagerConfig;

/// Hands out primary and replica connections for one logical database.
///
/// The manager borrows its load balancer and never owns a connection. It
/// stores a [`Domain`] and a default [`Groups`] list, both fixed at
/// construction, and adds them to every request it forwards:
///
/// | Accessor | Target | Groups | Flags |
/// |---|---|---|---|
/// | [`write_connection`](Self::write_connection) | primary | default | caller's |
/// | [`read_connection`](Self::read_connection) | replica | override or default | caller's |
/// | [`write_connection_ref`](Self::write_connection_ref) | primary | default | empty |
/// | [`read_connection_ref`](Self::read_connection_ref) | replica | override or default | empty |
/// | [`lazy_write_connection_ref`](Self::lazy_write_connection_ref) | primary | default | empty |
/// | [`lazy_read_connection_ref`](Self::lazy_read_connection_ref) | replica | override or default | empty |
///
/// Handles from the two eager non-ref accessors must be given back with
/// [`release_connection`](Self::release_connection). Ref handles release
/// themselves.
///
/// Errors from the load balancer are returned as they are.
pub struct ConnectionManager<'lb, L: LoadBalancer + ?Sized> {
    load_balancer: &'lb L,
    domain: Domain,
    groups: Groups,
}

/// A resolved request: what every accessor sends to the load balancer.
struct Route<'a> {
    target: Target,
    groups: &'a Groups,
    domain: &'a Domain,
}

impl<'lb, L: LoadBalancer + ?Sized> ConnectionManager<'lb, L> {
    /// Create a manager for the local domain with no default groups.
    pub fn new(load_balancer: &'lb L) -> Self {
        Self::with_domain(load_balancer, Domain::LOCAL, Groups::new())
    }

    /// Create a manager for a domain and default group list.
    pub fn with_domain(load_balancer: &'lb L, domain: Domain, groups: impl Into<Groups>) -> Self {
        let groups = groups.into();
        tracing::debug!(
            domain = %domain,
            groups = groups.len(),
            "connection manager created"
        );
        Self {
            load_balancer,
            domain,
            groups,
        }
    }

    /// Create a manager from a configuration.
    ///
    /// The configuration's domain was validated when it was parsed.
    pub fn from_config(load_balancer: &'lb L, config: &ManagerConfig) -> Self {
        Self::with_domain(load_balancer, config.domain.clone(), config.groups.clone())
    }

    /// Create a builder.
    ///
    /// Use the builder when the domain comes from untyped input; it is
    /// validated when [`build()`](ConnectionManagerBuilder::build) is called.
    #[must_use]
    pub fn builder(load_balancer: &'lb L) -> ConnectionManagerBuilder<'lb, L> {
        ConnectionManagerBuilder::new(load_balancer)
    }

    /// Get the domain injected into every request.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Get the groups used when a call site gives none.
    #[must_use]
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Get the load balancer requests are forwarded to.
    #[must_use]
    pub fn load_balancer(&self) -> &'lb L {
        self.load_balancer
    }

    /// Get a primary connection for writing.
    ///
    /// The connection must be returned with
    /// [`release_connection`](Self::release_connection).
    pub async fn write_connection(
        &self,
        flags: ConnectionFlags,
    ) -> Result<L::Connection, L::Error> {
        self.connection(Target::Primary, None, flags).await
    }

    /// Get a replica connection for reading.
    ///
    /// `groups` replaces the default groups for this call only. The
    /// connection must be returned with
    /// [`release_connection`](Self::release_connection).
    pub async fn read_connection(
        &self,
        groups: Option<&Groups>,
        flags: ConnectionFlags,
    ) -> Result<L::Connection, L::Error> {
        self.connection(Target::Replica, groups, flags).await
    }

    /// Return a connection from [`write_connection`](Self::write_connection)
    /// or [`read_connection`](Self::read_connection) to the load balancer.
    pub fn release_connection(&self, connection: L::Connection) {
        tracing::trace!(domain = %self.domain, "releasing connection");
        self.load_balancer.reuse_connection(connection);
    }

    /// Get a self-releasing primary connection for writing.
    pub async fn write_connection_ref(&self) -> Result<L::ConnectionRef, L::Error> {
        self.connection_ref(Target::Primary, None).await
    }

    /// Get a self-releasing replica connection for reading.
    pub async fn read_connection_ref(
        &self,
        groups: Option<&Groups>,
    ) -> Result<L::ConnectionRef, L::Error> {
        self.connection_ref(Target::Replica, groups).await
    }

    /// Get a primary connection handle that connects on first use.
    pub fn lazy_write_connection_ref(&self) -> Result<L::ConnectionRef, L::Error> {
        self.lazy_connection_ref(Target::Primary, None)
    }

    /// Get a replica connection handle that connects on first use.
    pub fn lazy_read_connection_ref(
        &self,
        groups: Option<&Groups>,
    ) -> Result<L::ConnectionRef, L::Error> {
        self.lazy_connection_ref(Target::Replica, groups)
    }

    async fn connection(
        &self,
        target: Target,
        groups: Option<&Groups>,
        flags: ConnectionFlags,
    ) -> Result<L::Connection, L::Error> {
        let route = self.route(target, groups, flags, false);
        self.load_balancer
            .connection(route.target, route.groups, route.domain, flags)
            .await
    }

    async fn connection_ref(
        &self,
        target: Target,
        groups: Option<&Groups>,
    ) -> Result<L::ConnectionRef, L::Error> {
        let route = self.route(target, groups, ConnectionFlags::empty(), false);
        self.load_balancer
            .connection_ref(route.target, route.groups, route.domain)
            .await
    }

    fn lazy_connection_ref(
        &self,
        target: Target,
        groups: Option<&Groups>,
    ) -> Result<L::ConnectionRef, L::Error> {
        let route = self.route(target, groups, ConnectionFlags::empty(), true);
        self.load_balancer
            .lazy_connection_ref(route.target, route.groups, route.domain)
    }

    /// Resolve the groups override and attach the domain.
    fn route<'a>(
        &'a self,
        target: Target,
        groups: Option<&'a Groups>,
        flags: ConnectionFlags,
        lazy: bool,
    ) -> Route<'a> {
        let groups = groups.unwrap_or(&self.groups);
        tracing::trace!(
            role = %target,
            domain = %self.domain,
            groups = ?groups.as_slice(),
            flags = flags.bits(),
            lazy,
            "routing connection request"
        );
        Route {
            target,
            groups,
            domain: &self.domain,
        }
    }
}

impl<L: LoadBalancer + ?Sized> Clone for ConnectionManager<'_, L> {
    fn clone(&self) -> Self {
        Self {
            load_balancer: self.load_balancer,
            domain: self.domain.clone(),
            groups: self.groups.clone(),
        }
    }
}

impl<L: LoadBalancer + ?Sized> fmt::Debug for ConnectionManager<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("domain", &self.domain)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}
