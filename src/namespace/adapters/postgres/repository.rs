//! `PostgreSQL` repository implementation for namespaces.

use super::{models::NamespaceRow, schema::namespaces};
use crate::namespace::{
    domain::{Namespace, NamespaceId, PersistedNamespaceData},
    ports::{NamespaceRepository, NamespaceRepositoryError, NamespaceRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by namespace adapters.
pub type NamespacePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed namespace repository.
#[derive(Debug, Clone)]
pub struct PostgresNamespaceRepository {
    pool: NamespacePgPool,
}

impl PostgresNamespaceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NamespacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NamespaceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NamespaceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(NamespaceRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NamespaceRepositoryError::persistence)?
    }
}

#[async_trait]
impl NamespaceRepository for PostgresNamespaceRepository {
    async fn create(&self, namespace: &Namespace) -> NamespaceRepositoryResult<()> {
        let namespace_id = namespace.id().clone();
        let row = to_row(namespace);

        self.run_blocking(move |connection| {
            diesel::insert_into(namespaces::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NamespaceRepositoryError::DuplicateNamespace(namespace_id.clone())
                    }
                    _ => NamespaceRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, namespace: &Namespace) -> NamespaceRepositoryResult<()> {
        let namespace_id = namespace.id().clone();
        let row = to_row(namespace);

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(namespaces::table.filter(namespaces::id.eq(&row.id)))
                    .set((
                        namespaces::name.eq(&row.name),
                        namespaces::description.eq(&row.description),
                        namespaces::is_active.eq(row.is_active),
                        namespaces::updated_at.eq(row.updated_at),
                    ))
                    .execute(connection)
                    .map_err(NamespaceRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(NamespaceRepositoryError::NotFound(namespace_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &NamespaceId) -> NamespaceRepositoryResult<()> {
        let namespace_id = id.clone();
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(namespaces::table.filter(namespaces::id.eq(namespace_id.as_str())))
                    .execute(connection)
                    .map_err(NamespaceRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(NamespaceRepositoryError::NotFound(namespace_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &NamespaceId) -> NamespaceRepositoryResult<Option<Namespace>> {
        let id_str = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = namespaces::table
                .filter(namespaces::id.eq(&id_str))
                .select(NamespaceRow::as_select())
                .first::<NamespaceRow>(connection)
                .optional()
                .map_err(NamespaceRepositoryError::persistence)?;
            row.map(row_to_namespace).transpose()
        })
        .await
    }

    async fn list_all(&self) -> NamespaceRepositoryResult<Vec<Namespace>> {
        self.run_blocking(move |connection| {
            let rows = namespaces::table
                .order(namespaces::id)
                .select(NamespaceRow::as_select())
                .load::<NamespaceRow>(connection)
                .map_err(NamespaceRepositoryError::persistence)?;
            rows.into_iter().map(row_to_namespace).collect()
        })
        .await
    }
}

fn to_row(namespace: &Namespace) -> NamespaceRow {
    NamespaceRow {
        id: namespace.id().as_str().to_owned(),
        name: namespace.name().to_owned(),
        description: namespace.description().to_owned(),
        is_active: namespace.is_active(),
        created_at: namespace.created_at(),
        updated_at: namespace.updated_at(),
    }
}

fn row_to_namespace(row: NamespaceRow) -> NamespaceRepositoryResult<Namespace> {
    let NamespaceRow {
        id,
        name,
        description,
        is_active,
        created_at,
        updated_at,
    } = row;

    let data = PersistedNamespaceData {
        id: NamespaceId::new(id).map_err(NamespaceRepositoryError::invalid_persisted_data)?,
        name,
        description,
        is_active,
        created_at,
        updated_at,
    };
    Ok(Namespace::from_persisted(data))
}
