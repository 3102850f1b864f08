//! # rdbms-balancer
//!
//! The contract between a connection routing layer and the load balancer
//! that owns the actual database connections.
//!
//! This crate holds only types: the [`LoadBalancer`] trait a pool
//! implementation provides, and the parameters every request carries:
//!
//! - [`Target`]: primary (writable) or replica (read-only)
//! - [`Groups`]: named server groups used to pick a subset of replicas
//! - [`Domain`]: the logical database, or the caller's local one
//! - [`ConnectionFlags`]: opaque bits interpreted only by the balancer
//!
//! Nothing here performs I/O.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod balancer;
pub mod domain;
pub mod error;
pub mod groups;
pub mod target;

pub use balancer::LoadBalancer;
pub use domain::Domain;
pub use error::DomainError;
pub use groups::Groups;
pub use target::{ConnectionFlags, Target};
