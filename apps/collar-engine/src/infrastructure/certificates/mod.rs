//! Certificate Registry Adapters

mod in_memory;

pub use in_memory::InMemoryCertificateRegistry;
