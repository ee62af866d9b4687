//! Infrastructure Layer
//!
//! Adapters implementing the application ports. Everything here is an
//! in-memory reference implementation suitable for tests, development, and
//! embedding; production deployments supply their own adapters against the
//! same ports.

pub mod authorization;
pub mod certificates;
pub mod ledger;
pub mod oracle;
pub mod persistence;
pub mod provider_store;
