//! Diesel schema for agent card persistence.

diesel::table! {
    /// Versioned agent cards.
    agent_cards (id) {
        /// Internal card identifier.
        id -> Uuid,
        /// Owning namespace.
        #[max_length = 128]
        namespace_id -> Varchar,
        /// Agent name.
        #[max_length = 64]
        name -> Varchar,
        /// Agent version.
        #[max_length = 32]
        version -> Varchar,
        /// Whether this version is the default for its name.
        is_default_version -> Bool,
        /// Whether the card is published.
        is_active -> Bool,
        /// Protocol revision.
        #[max_length = 16]
        protocol_version -> Varchar,
        /// Agent description.
        description -> Text,
        /// Endpoint URL.
        #[max_length = 512]
        url -> Varchar,
        /// Preferred transport label.
        #[max_length = 32]
        preferred_transport -> Varchar,
        /// Capability flags object.
        capabilities -> Jsonb,
        /// Default input MIME types.
        default_input_modes -> Jsonb,
        /// Default output MIME types.
        default_output_modes -> Jsonb,
        /// Skill objects.
        skills -> Jsonb,
        /// Provider object.
        provider -> Nullable<Jsonb>,
        /// Icon URL.
        #[max_length = 512]
        icon_url -> Nullable<Varchar>,
        /// Documentation URL.
        #[max_length = 512]
        documentation_url -> Nullable<Varchar>,
        /// Additional interface objects.
        additional_interfaces -> Jsonb,
        /// Security scheme definitions.
        security_schemes -> Jsonb,
        /// Security requirements.
        security -> Jsonb,
        /// Whether an authenticated extended card is available.
        supports_authenticated_extended_card -> Bool,
        /// Card signatures.
        signatures -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Creator username.
        #[max_length = 150]
        created_by -> Nullable<Varchar>,
        /// Last editor username.
        #[max_length = 150]
        updated_by -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Extension records owned by a card.
    agent_card_extensions (id) {
        /// Internal extension identifier.
        id -> Uuid,
        /// Owning card.
        card_id -> Uuid,
        /// Extension URI, unique per card.
        #[max_length = 512]
        uri -> Varchar,
        /// Description.
        description -> Text,
        /// Whether clients must understand the extension.
        required -> Bool,
        /// Params object.
        params -> Jsonb,
        /// Referenced schema definition.
        schema_id -> Nullable<Uuid>,
        /// Display order.
        display_order -> Int4,
    }
}

diesel::joinable!(agent_card_extensions -> agent_cards (card_id));
diesel::allow_tables_to_appear_in_same_query!(agent_cards, agent_card_extensions);
