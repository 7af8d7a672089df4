//! Application services for namespace management.

mod directory;

pub use directory::{
    CreateNamespaceRequest, NamespaceService, NamespaceServiceError, NamespaceServiceResult,
    UpdateNamespaceRequest,
};
