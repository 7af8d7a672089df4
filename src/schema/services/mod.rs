//! Application services for extension schema management.

mod registry;

pub use registry::{
    RegisterSchemaRequest, SchemaRegistryService, SchemaRegistryServiceError,
    SchemaRegistryServiceResult, UpdateSchemaRequest,
};
