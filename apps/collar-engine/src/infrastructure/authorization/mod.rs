//! Authorization Registry Adapters

mod static_registry;

pub use static_registry::StaticAuthorizationRegistry;
