//! # rdbms-testing
//!
//! Test infrastructure for code built on the `rdbms-balancer` contract.
//!
//! [`RecordingLoadBalancer`] stands in for a real pool: it hands out
//! handles that describe the request they answer, records every call in
//! order, and can be told to fail the next acquisition.
//!
//! ```rust,ignore
//! use rdbms_testing::{Call, RecordingLoadBalancer};
//!
//! let lb = RecordingLoadBalancer::new();
//! let manager = ConnectionManager::with_domain(&lb, domain, ["api"]);
//! manager.read_connection_ref(None).await?;
//!
//! assert!(matches!(lb.calls()[0], Call::ConnectionRef(_)));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod balancer;
pub mod connection;

pub use balancer::{Call, MockError, RecordingLoadBalancer, Request};
pub use connection::{MockConnection, MockConnectionRef};
