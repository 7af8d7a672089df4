//! Domain model for namespaces.

mod error;
mod id;
mod namespace;

pub use error::NamespaceDomainError;
pub use id::NamespaceId;
pub use namespace::{Namespace, PersistedNamespaceData};
