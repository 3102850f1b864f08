//! Connection targets and request flags.

use std::fmt;

/// The server role a connection is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Target {
    /// The writable primary server.
    Primary,
    /// A read-only replica, possibly lagging the primary.
    Replica,
}

impl Target {
    /// Check if this is the primary target.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary)
    }

    /// Get the lowercase role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Replica => "replica",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Per-request flags understood by the load balancer.
    ///
    /// The routing layer never interprets these; every bit is carried to
    /// the balancer as given. [`ConnectionFlags::empty()`] is the zero value
    /// used by the ref-style accessors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConnectionFlags: u32 {
        const _ = !0;
    }
}
