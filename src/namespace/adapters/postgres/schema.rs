//! Diesel schema for namespace persistence.

diesel::table! {
    /// Namespace records.
    namespaces (id) {
        /// Namespace key.
        #[max_length = 128]
        id -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Description.
        description -> Text,
        /// Whether the namespace is enabled.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
