//! Logical database domains.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::DomainError;

/// The logical database a connection targets.
///
/// A domain is either a name following the load balancer's database naming
/// convention, or [`Domain::LOCAL`], meaning whatever database the caller
/// considers local. Names are stored unchanged; the empty name is a valid
/// domain that balancers commonly read as "any database".
///
/// Untyped input (JSON, TOML, settings files) follows the classic
/// configuration convention: a string names a domain, `false` selects the
/// local database, and any other kind of value, null included, is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Domain {
    name: Option<String>,
}

impl Domain {
    /// The caller's local database.
    pub const LOCAL: Self = Self { name: None };

    /// The local-database sentinel.
    #[must_use]
    pub const fn local() -> Self {
        Self::LOCAL
    }

    /// Create a named domain.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Get the domain name, or `None` for the local domain.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if this is the local-domain sentinel.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_name().unwrap_or("<local>"))
    }
}

impl TryFrom<&Value> for Domain {
    type Error = DomainError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => Ok(Self::named(name.as_str())),
            Value::Bool(false) => Ok(Self::LOCAL),
            other => Err(DomainError::InvalidKind {
                kind: value_kind(other),
            }),
        }
    }
}

impl TryFrom<Value> for Domain {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(true) => "true",
        Value::Bool(false) => "false",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for Domain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DomainVisitor)
    }
}

struct DomainVisitor;

impl<'de> Visitor<'de> for DomainVisitor {
    type Value = Domain;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a domain name or false")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Domain, E> {
        Ok(Domain::named(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Domain, E> {
        Ok(Domain::named(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Domain, E> {
        if v {
            return Err(E::invalid_value(de::Unexpected::Bool(true), &self));
        }
        Ok(Domain::LOCAL)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Domain, E> {
        Err(E::invalid_type(de::Unexpected::Unit, &self))
    }

    fn visit_none<E: de::Error>(self) -> Result<Domain, E> {
        Err(E::invalid_type(de::Unexpected::Option, &self))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Domain, D::Error> {
        deserializer.deserialize_any(self)
    }
}
