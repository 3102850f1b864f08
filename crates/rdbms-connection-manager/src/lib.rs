//! # rdbms-connection-manager
//!
//! Routes connection requests to the primary or to replicas of a logical
//! database, through a [`LoadBalancer`] that owns the actual connections.
//!
//! A [`ConnectionManager`] is bound to one domain and one default list of
//! server groups. Every accessor injects the domain, and uses the default
//! groups unless the call site passes its own.
//!
//! ## Features
//!
//! - Write accessors route to the primary, read accessors to replicas
//! - Eager handles, self-releasing ref handles, and lazy ref handles that
//!   connect on first use
//! - Per-call group overrides (`None` keeps the defaults, `Some(&empty)`
//!   explicitly asks for no group)
//! - Collaborator errors are returned unchanged
//!
//! ## Example
//!
//! ```rust,ignore
//! use rdbms_connection_manager::{ConnectionManager, Groups};
//!
//! let manager = ConnectionManager::builder(&load_balancer)
//!     .domain("wikidb")
//!     .groups(["api"])
//!     .build()?;
//!
//! // Replica in the "api" group of wikidb, released on drop
//! let db = manager.read_connection_ref(None).await?;
//!
//! // Same domain, "dump" replicas instead
//! let dump = manager.read_connection_ref(Some(&Groups::from(["dump"]))).await?;
//!
//! // Nothing is acquired until the handle is first used
//! let lazy = manager.lazy_write_connection_ref()?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod manager;

pub use builder::ConnectionManagerBuilder;
pub use config::ManagerConfig;
pub use error::{Error, Result};
pub use manager::ConnectionManager;

// Contract types used in the accessor signatures
pub use rdbms_balancer::{ConnectionFlags, Domain, DomainError, Groups, LoadBalancer, Target};
