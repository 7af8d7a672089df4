//! Read model listing active schemas grouped by type tag.

use super::{FieldDefinition, SchemaDefinition};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One schema version as shown in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Schema URI.
    pub uri: String,
    /// Version tag.
    pub version: String,
    /// Schema description.
    pub description: String,
    /// Field summaries in display order.
    pub fields: Vec<FieldDefinition>,
    /// Number of extension records referencing the URI.
    pub usage_count: u64,
    /// Example payload, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_data: Option<Value>,
}

/// Active schemas grouped by type tag, newest version first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaCatalog {
    /// Entries keyed by type tag.
    pub catalog: BTreeMap<String, Vec<CatalogEntry>>,
    /// Type tags in ascending order.
    pub categories: Vec<String>,
    /// Number of schemas listed.
    pub total_schemas: usize,
}

impl SchemaCatalog {
    /// Builds the catalog from schemas paired with their usage counts.
    ///
    /// Inactive schemas are skipped. Within a type tag, versions are sorted
    /// in descending order.
    #[must_use]
    pub fn build<'a>(schemas: impl IntoIterator<Item = (&'a SchemaDefinition, u64)>) -> Self {
        let mut catalog: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        let mut total_schemas = 0;

        for (schema, usage_count) in schemas {
            if !schema.is_active() {
                continue;
            }
            total_schemas += 1;
            catalog
                .entry(schema.schema_type().to_string())
                .or_default()
                .push(CatalogEntry {
                    uri: schema.uri().to_string(),
                    version: schema.version().to_string(),
                    description: schema.description().to_owned(),
                    fields: schema.field_definitions(),
                    usage_count,
                    example_data: schema.example_data().cloned(),
                });
        }

        for entries in catalog.values_mut() {
            entries.sort_by(|a, b| b.version.cmp(&a.version).then_with(|| a.uri.cmp(&b.uri)));
        }

        Self {
            categories: catalog.keys().cloned().collect(),
            catalog,
            total_schemas,
        }
    }

    /// Returns the entries for a type tag.
    #[must_use]
    pub fn entries(&self, schema_type: &str) -> &[CatalogEntry] {
        self.catalog.get(schema_type).map_or(&[], Vec::as_slice)
    }
}
