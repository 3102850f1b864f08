//! Connection manager builder.

use rdbms_balancer::{Domain, Groups, LoadBalancer};
use serde_json::Value;

use crate::error::Result;
use crate::manager::ConnectionManager;

/// Builder for creating a [`ConnectionManager`].
///
/// The domain may be given as a name, as the local sentinel, or as an
/// untyped value from a settings document. It is checked when
/// [`build()`](Self::build) is called, and the manager is never created
/// with an invalid domain.
///
/// # Example
///
/// ```rust,ignore
/// let manager = ConnectionManager::builder(&lb)
///     .domain("wikidb")
///     .group("api")
///     .build()?;
/// ```
pub struct ConnectionManagerBuilder<'lb, L: LoadBalancer + ?Sized> {
    load_balancer: &'lb L,
    domain: DomainInput,
    groups: Groups,
}

enum DomainInput {
    Domain(Domain),
    Name(String),
    Value(Value),
}

impl<'lb, L: LoadBalancer + ?Sized> ConnectionManagerBuilder<'lb, L> {
    /// Create a builder for the local domain with no default groups.
    pub fn new(load_balancer: &'lb L) -> Self {
        Self {
            load_balancer,
            domain: DomainInput::Domain(Domain::LOCAL),
            groups: Groups::new(),
        }
    }

    /// Target a named domain.
    #[must_use]
    pub fn domain(mut self, name: impl Into<String>) -> Self {
        self.domain = DomainInput::Name(name.into());
        self
    }

    /// Target the caller's local domain.
    #[must_use]
    pub fn local_domain(mut self) -> Self {
        self.domain = DomainInput::Domain(Domain::LOCAL);
        self
    }

    /// Take the domain from an untyped settings value.
    ///
    /// Strings name a domain, including the empty string, and `false`
    /// selects the local domain. Anything else, null included, makes
    /// [`build()`](Self::build) fail.
    #[must_use]
    pub fn domain_value(mut self, value: Value) -> Self {
        self.domain = DomainInput::Value(value);
        self
    }

    /// Set the default groups, replacing any added so far.
    #[must_use]
    pub fn groups(mut self, groups: impl Into<Groups>) -> Self {
        self.groups = groups.into();
        self
    }

    /// Add one default group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group);
        self
    }

    /// Build the manager.
    pub fn build(self) -> Result<ConnectionManager<'lb, L>> {
        let domain = match self.domain {
            DomainInput::Domain(domain) => domain,
            DomainInput::Name(name) => Domain::named(name),
            DomainInput::Value(value) => Domain::try_from(&value)?,
        };
        Ok(ConnectionManager::with_domain(
            self.load_balancer,
            domain,
            self.groups,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rdbms_balancer::DomainError;
    use rdbms_testing::RecordingLoadBalancer;
    use serde_json::json;

    #[test]
    fn test_builder_default() {
        let lb = RecordingLoadBalancer::new();
        let manager = ConnectionManager::builder(&lb).build().unwrap();
        assert!(manager.domain().is_local());
        assert!(manager.groups().is_empty());
    }

    #[test]
    fn test_builder_fluent() {
        let lb = RecordingLoadBalancer::new();
        let manager = ConnectionManager::builder(&lb)
            .domain("wikidb")
            .group("api")
            .group("dump")
            .build()
            .unwrap();

        assert_eq!(manager.domain().as_name(), Some("wikidb"));
        assert_eq!(manager.groups().as_slice(), ["api", "dump"]);
    }

    #[test]
    fn test_groups_replaces_previous() {
        let lb = RecordingLoadBalancer::new();
        let manager = ConnectionManager::builder(&lb)
            .group("api")
            .groups(["vslow"])
            .build()
            .unwrap();
        assert_eq!(manager.groups().as_slice(), ["vslow"]);
    }

    #[test]
    fn test_local_domain_overrides_name() {
        let lb = RecordingLoadBalancer::new();
        let manager = ConnectionManager::builder(&lb)
            .domain("wikidb")
            .local_domain()
            .build()
            .unwrap();
        assert!(manager.domain().is_local());
    }

    #[test]
    fn test_empty_name_is_kept() {
        let lb = RecordingLoadBalancer::new();
        let by_name = ConnectionManager::builder(&lb).domain("").build().unwrap();
        let by_value = ConnectionManager::builder(&lb)
            .domain_value(json!(""))
            .build()
            .unwrap();

        assert_eq!(by_name.domain().as_name(), Some(""));
        assert_eq!(by_value.domain(), by_name.domain());
    }

    #[test]
    fn test_null_domain_value_rejected() {
        let lb = RecordingLoadBalancer::new();
        let err = ConnectionManager::builder(&lb)
            .domain_value(Value::Null)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDomain(DomainError::InvalidKind { kind: "null" })
        );
        assert!(lb.calls().is_empty());
    }

    #[test]
    fn test_domain_value() {
        let lb = RecordingLoadBalancer::new();

        let manager = ConnectionManager::builder(&lb)
            .domain_value(json!(false))
            .build()
            .unwrap();
        assert!(manager.domain().is_local());

        let err = ConnectionManager::builder(&lb)
            .domain_value(json!([1, 2]))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidDomain(DomainError::InvalidKind { kind: "array" })
        );
        assert!(lb.calls().is_empty());
    }
}
