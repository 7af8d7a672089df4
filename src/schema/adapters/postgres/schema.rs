//! Diesel schema for extension schema persistence.

diesel::table! {
    /// Extension schema definitions.
    schema_definitions (id) {
        /// Internal schema identifier.
        id -> Uuid,
        /// Globally unique schema URI.
        #[max_length = 512]
        uri -> Varchar,
        /// Type tag grouping versions.
        #[max_length = 128]
        schema_type -> Varchar,
        /// Version tag.
        #[max_length = 32]
        version -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Optional example payload.
        example_data -> Nullable<Jsonb>,
        /// Whether the schema appears in the catalog.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Field constraints owned by a schema definition.
    schema_fields (schema_id, name) {
        /// Owning schema identifier.
        schema_id -> Uuid,
        /// Field name, unique within the schema.
        #[max_length = 128]
        name -> Varchar,
        /// Declared field type.
        #[max_length = 20]
        field_type -> Varchar,
        /// Whether payloads must contain the field.
        required -> Bool,
        /// Field description.
        description -> Text,
        /// Advertised default value.
        default_value -> Nullable<Jsonb>,
        /// Minimum string length.
        min_length -> Nullable<Int8>,
        /// Maximum string length.
        max_length -> Nullable<Int8>,
        /// Inclusive minimum value.
        min_value -> Nullable<Float8>,
        /// Inclusive maximum value.
        max_value -> Nullable<Float8>,
        /// Enum choices as a JSON string array.
        enum_choices -> Nullable<Jsonb>,
        /// Advertised regular expression.
        #[max_length = 500]
        pattern -> Nullable<Varchar>,
        /// Display order.
        field_order -> Int4,
    }
}

diesel::joinable!(schema_fields -> schema_definitions (schema_id));
diesel::allow_tables_to_appear_in_same_query!(schema_definitions, schema_fields);
