//! `PostgreSQL` repository implementation for extension schemas.

use super::{
    models::{NewSchemaDefinitionRow, SchemaDefinitionRow, SchemaFieldRow},
    schema::{schema_definitions, schema_fields},
};
use crate::schema::{
    domain::{
        FieldConstraint, FieldSpec, FieldType, PersistedSchemaData, SchemaDefinition, SchemaId,
        SchemaType, SchemaUri, SchemaVersion,
    },
    ports::{SchemaRepository, SchemaRepositoryError, SchemaRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by schema adapters.
pub type SchemaPgPool = Pool<ConnectionManager<PgConnection>>;

const URI_CONSTRAINT: &str = "uq_schema_definitions_uri";
const TYPE_VERSION_CONSTRAINT: &str = "uq_schema_definitions_type_version";

/// `PostgreSQL`-backed schema repository.
#[derive(Debug, Clone)]
pub struct PostgresSchemaRepository {
    pool: SchemaPgPool,
}

impl PostgresSchemaRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SchemaPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SchemaRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SchemaRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SchemaRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SchemaRepositoryError::persistence)?
    }
}

#[async_trait]
impl SchemaRepository for PostgresSchemaRepository {
    async fn create(&self, schema: &SchemaDefinition) -> SchemaRepositoryResult<()> {
        let schema_id = schema.id();
        let uri = schema.uri().clone();
        let identity = (schema.schema_type().clone(), schema.version().clone());
        let new_row = to_new_row(schema);
        let field_rows = to_field_rows(schema)?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(schema_definitions::table)
                        .values(&new_row)
                        .execute(tx)?;
                    insert_fields(tx, &field_rows)
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), URI_CONSTRAINT) =>
                    {
                        SchemaRepositoryError::DuplicateUri(uri.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), TYPE_VERSION_CONSTRAINT) =>
                    {
                        SchemaRepositoryError::DuplicateTypeVersion {
                            schema_type: identity.0.clone(),
                            version: identity.1.clone(),
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        SchemaRepositoryError::DuplicateSchema(schema_id)
                    }
                    _ => SchemaRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn update(&self, schema: &SchemaDefinition) -> SchemaRepositoryResult<()> {
        let schema_id = schema.id();
        let uri = schema.uri().clone();
        let identity = (schema.schema_type().clone(), schema.version().clone());
        let row = to_new_row(schema);
        let field_rows = to_field_rows(schema)?;

        self.run_blocking(move |connection| {
            let found = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let updated_count = diesel::update(
                        schema_definitions::table.filter(schema_definitions::id.eq(row.id)),
                    )
                    .set((
                        schema_definitions::uri.eq(&row.uri),
                        schema_definitions::schema_type.eq(&row.schema_type),
                        schema_definitions::version.eq(&row.version),
                        schema_definitions::description.eq(&row.description),
                        schema_definitions::example_data.eq(&row.example_data),
                        schema_definitions::is_active.eq(row.is_active),
                        schema_definitions::updated_at.eq(row.updated_at),
                    ))
                    .execute(tx)?;
                    if updated_count == 0 {
                        return Ok(false);
                    }

                    diesel::delete(
                        schema_fields::table.filter(schema_fields::schema_id.eq(row.id)),
                    )
                    .execute(tx)?;
                    insert_fields(tx, &field_rows)?;
                    Ok(true)
                })
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), URI_CONSTRAINT) =>
                    {
                        SchemaRepositoryError::DuplicateUri(uri.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), TYPE_VERSION_CONSTRAINT) =>
                    {
                        SchemaRepositoryError::DuplicateTypeVersion {
                            schema_type: identity.0.clone(),
                            version: identity.1.clone(),
                        }
                    }
                    _ => SchemaRepositoryError::persistence(err),
                })?;

            if found {
                Ok(())
            } else {
                Err(SchemaRepositoryError::NotFound(schema_id))
            }
        })
        .await
    }

    async fn delete(&self, id: SchemaId) -> SchemaRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count = diesel::delete(
                schema_definitions::table.filter(schema_definitions::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(SchemaRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(SchemaRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: SchemaId) -> SchemaRepositoryResult<Option<SchemaDefinition>> {
        self.run_blocking(move |connection| {
            let row = schema_definitions::table
                .filter(schema_definitions::id.eq(id.into_inner()))
                .select(SchemaDefinitionRow::as_select())
                .first::<SchemaDefinitionRow>(connection)
                .optional()
                .map_err(SchemaRepositoryError::persistence)?;
            row.map(|found| load_single(connection, found)).transpose()
        })
        .await
    }

    async fn find_by_uri(
        &self,
        uri: &SchemaUri,
    ) -> SchemaRepositoryResult<Option<SchemaDefinition>> {
        let uri_str = uri.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = schema_definitions::table
                .filter(schema_definitions::uri.eq(&uri_str))
                .select(SchemaDefinitionRow::as_select())
                .first::<SchemaDefinitionRow>(connection)
                .optional()
                .map_err(SchemaRepositoryError::persistence)?;
            row.map(|found| load_single(connection, found)).transpose()
        })
        .await
    }

    async fn list_all(&self) -> SchemaRepositoryResult<Vec<SchemaDefinition>> {
        self.run_blocking(move |connection| {
            let rows = schema_definitions::table
                .order((schema_definitions::schema_type, schema_definitions::version))
                .select(SchemaDefinitionRow::as_select())
                .load::<SchemaDefinitionRow>(connection)
                .map_err(SchemaRepositoryError::persistence)?;
            load_many(connection, rows)
        })
        .await
    }

    async fn list_active(&self) -> SchemaRepositoryResult<Vec<SchemaDefinition>> {
        self.run_blocking(move |connection| {
            let rows = schema_definitions::table
                .filter(schema_definitions::is_active.eq(true))
                .order((schema_definitions::schema_type, schema_definitions::version))
                .select(SchemaDefinitionRow::as_select())
                .load::<SchemaDefinitionRow>(connection)
                .map_err(SchemaRepositoryError::persistence)?;
            load_many(connection, rows)
        })
        .await
    }
}

fn to_new_row(schema: &SchemaDefinition) -> NewSchemaDefinitionRow {
    NewSchemaDefinitionRow {
        id: schema.id().into_inner(),
        uri: schema.uri().as_str().to_owned(),
        schema_type: schema.schema_type().as_str().to_owned(),
        version: schema.version().as_str().to_owned(),
        description: schema.description().to_owned(),
        example_data: schema.example_data().cloned(),
        is_active: schema.is_active(),
        created_at: schema.created_at(),
        updated_at: schema.updated_at(),
    }
}

fn to_field_rows(schema: &SchemaDefinition) -> SchemaRepositoryResult<Vec<SchemaFieldRow>> {
    let schema_id = schema.id().into_inner();
    schema
        .fields()
        .iter()
        .map(|field| {
            let spec = field.to_spec();
            let enum_choices = spec
                .enum_choices
                .map(serde_json::to_value)
                .transpose()
                .map_err(SchemaRepositoryError::persistence)?;
            Ok(SchemaFieldRow {
                schema_id,
                name: spec.name,
                field_type: spec.field_type.as_str().to_owned(),
                required: spec.required,
                description: spec.description,
                default_value: spec.default_value,
                min_length: spec.min_length.map(to_column_length).transpose()?,
                max_length: spec.max_length.map(to_column_length).transpose()?,
                min_value: spec.min_value,
                max_value: spec.max_value,
                enum_choices,
                pattern: spec.pattern,
                field_order: spec.order,
            })
        })
        .collect()
}

fn insert_fields(connection: &mut PgConnection, rows: &[SchemaFieldRow]) -> QueryResult<()> {
    if !rows.is_empty() {
        diesel::insert_into(schema_fields::table)
            .values(rows)
            .execute(connection)?;
    }
    Ok(())
}

fn to_column_length(length: u64) -> SchemaRepositoryResult<i64> {
    i64::try_from(length).map_err(SchemaRepositoryError::persistence)
}

fn from_column_length(length: i64) -> SchemaRepositoryResult<u64> {
    u64::try_from(length).map_err(SchemaRepositoryError::invalid_persisted_data)
}

fn load_single(
    connection: &mut PgConnection,
    row: SchemaDefinitionRow,
) -> SchemaRepositoryResult<SchemaDefinition> {
    let field_rows = schema_fields::table
        .filter(schema_fields::schema_id.eq(row.id))
        .select(SchemaFieldRow::as_select())
        .load::<SchemaFieldRow>(connection)
        .map_err(SchemaRepositoryError::persistence)?;
    row_to_schema(row, field_rows)
}

fn load_many(
    connection: &mut PgConnection,
    rows: Vec<SchemaDefinitionRow>,
) -> SchemaRepositoryResult<Vec<SchemaDefinition>> {
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let field_rows = schema_fields::table
        .filter(schema_fields::schema_id.eq_any(ids))
        .select(SchemaFieldRow::as_select())
        .load::<SchemaFieldRow>(connection)
        .map_err(SchemaRepositoryError::persistence)?;

    let mut fields_by_schema: HashMap<uuid::Uuid, Vec<SchemaFieldRow>> = HashMap::new();
    for field_row in field_rows {
        fields_by_schema
            .entry(field_row.schema_id)
            .or_default()
            .push(field_row);
    }

    rows.into_iter()
        .map(|row| {
            let fields = fields_by_schema.remove(&row.id).unwrap_or_default();
            row_to_schema(row, fields)
        })
        .collect()
}

fn row_to_schema(
    row: SchemaDefinitionRow,
    field_rows: Vec<SchemaFieldRow>,
) -> SchemaRepositoryResult<SchemaDefinition> {
    let SchemaDefinitionRow {
        id,
        uri,
        schema_type,
        version,
        description,
        example_data,
        is_active,
        created_at,
        updated_at,
    } = row;

    let fields = field_rows
        .into_iter()
        .map(row_to_field)
        .collect::<SchemaRepositoryResult<Vec<_>>>()?;

    let data = PersistedSchemaData {
        id: SchemaId::from_uuid(id),
        uri: SchemaUri::new(uri).map_err(SchemaRepositoryError::invalid_persisted_data)?,
        schema_type: SchemaType::new(schema_type)
            .map_err(SchemaRepositoryError::invalid_persisted_data)?,
        version: SchemaVersion::new(version)
            .map_err(SchemaRepositoryError::invalid_persisted_data)?,
        description,
        example_data,
        is_active,
        fields,
        created_at,
        updated_at,
    };
    Ok(SchemaDefinition::from_persisted(data))
}

fn row_to_field(row: SchemaFieldRow) -> SchemaRepositoryResult<FieldConstraint> {
    let field_type = FieldType::try_from(row.field_type.as_str())
        .map_err(SchemaRepositoryError::invalid_persisted_data)?;
    let enum_choices = row
        .enum_choices
        .map(serde_json::from_value::<Vec<String>>)
        .transpose()
        .map_err(SchemaRepositoryError::invalid_persisted_data)?;

    let spec = FieldSpec {
        name: row.name,
        field_type,
        required: row.required,
        description: row.description,
        default_value: row.default_value,
        min_length: row.min_length.map(from_column_length).transpose()?,
        max_length: row.max_length.map(from_column_length).transpose()?,
        min_value: row.min_value,
        max_value: row.max_value,
        enum_choices,
        pattern: row.pattern,
        order: row.field_order,
    };
    FieldConstraint::new(spec).map_err(SchemaRepositoryError::invalid_persisted_data)
}

fn violates(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
