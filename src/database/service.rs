use serde::Serialize;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::database::connection::{DatabaseError, MySqlConnection};
use crate::database::entity::{Entity, PartialUpdate};
use crate::database::models::blog::{publish_query, BlogCreate};
use crate::database::models::client::{self, Client, NewClient};
use crate::database::models::user::{self, UserInDb};
use crate::filter::{FilterData, SqlResult};

/// One page of a listing plus the unpaginated match count
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

/// Every call opens its own connection, runs its statement(s) and closes it.
/// Queries are built before connecting so malformed input never touches the
/// database.
#[derive(Debug, Clone)]
pub struct MySqlService {
    config: DatabaseConfig,
}

impl MySqlService {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<MySqlConnection, DatabaseError> {
        MySqlConnection::connect(&self.config).await
    }

    pub async fn find_entities<E: Entity>(
        &self,
        filters: &FilterData,
        skip: i64,
        limit: i64,
    ) -> Result<Page<E::Row>, DatabaseError> {
        let select = E::select_query(filters, skip, limit)?;
        let count = E::count_query(filters)?;

        let mut conn = self.connect().await?;
        let result = async {
            let items = conn.fetch_all::<E::Row>(&select).await?;
            let total = conn.count(&count).await?;
            Ok::<_, DatabaseError>(Page { items, total, skip, limit })
        }
        .await;
        conn.disconnect().await;
        result
    }

    pub async fn find_entity_by_id<E: Entity>(&self, id: i64) -> Result<E::Row, DatabaseError> {
        let sql = E::select_by_id_query(id);

        let mut conn = self.connect().await?;
        let result = conn.fetch_optional::<E::Row>(&sql).await;
        conn.disconnect().await;

        result?.ok_or_else(|| DatabaseError::NotFound(format!("{} not found", E::LABEL)))
    }

    /// Returns the new row id
    pub async fn create_entity<E: Entity>(&self, entity: &E) -> Result<u64, DatabaseError> {
        let sql = entity.insert_query();

        let mut conn = self.connect().await?;
        let result = conn.execute(&sql).await;
        conn.disconnect().await;

        let outcome = result?;
        info!("Created {} {}", E::LABEL, outcome.last_insert_id);
        Ok(outcome.last_insert_id)
    }

    /// Full replace of every column
    pub async fn update_entity<E: Entity>(&self, id: i64, entity: &E) -> Result<(), DatabaseError> {
        let sql = entity.update_query(id);
        self.run_update::<E>(id, &sql).await
    }

    pub async fn update_partial<P: PartialUpdate>(&self, id: i64, changes: &P) -> Result<(), DatabaseError> {
        let sql = changes.update_query(id)?;
        self.run_update::<P::Target>(id, &sql).await
    }

    pub async fn delete_entity<E: Entity>(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = E::delete_query(id);

        let mut conn = self.connect().await?;
        let result = conn.execute(&sql).await;
        conn.disconnect().await;

        if result?.rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("{} not found", E::LABEL)));
        }
        info!("Deleted {} {}", E::LABEL, id);
        Ok(())
    }

    // MySQL reports changed rows, not matched rows, so an UPDATE that writes
    // identical values affects 0 rows. Only then do we look the id up.
    async fn run_update<E: Entity>(&self, id: i64, sql: &SqlResult) -> Result<(), DatabaseError> {
        let mut conn = self.connect().await?;
        let result = async {
            let outcome = conn.execute(sql).await?;
            if outcome.rows_affected > 0 {
                return Ok(true);
            }
            let existing = conn.fetch_optional::<E::Row>(&E::select_by_id_query(id)).await?;
            Ok::<bool, DatabaseError>(existing.is_some())
        }
        .await;
        conn.disconnect().await;

        if !result? {
            return Err(DatabaseError::NotFound(format!("{} not found", E::LABEL)));
        }
        debug!("Updated {} {}", E::LABEL, id);
        Ok(())
    }

    pub async fn set_published(&self, id: i64, publish: bool) -> Result<(), DatabaseError> {
        let sql = publish_query(id, publish)?;
        self.run_update::<BlogCreate>(id, &sql).await
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<UserInDb>, DatabaseError> {
        let sql = user::find_user_query(username);

        let mut conn = self.connect().await?;
        let result = conn.fetch_optional::<UserInDb>(&sql).await;
        conn.disconnect().await;
        result
    }

    pub async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<u64, DatabaseError> {
        let sql = user::insert_user_query(username, email, password_hash);

        let mut conn = self.connect().await?;
        let result = conn.execute(&sql).await;
        conn.disconnect().await;
        Ok(result?.last_insert_id)
    }

    pub async fn find_client(&self, client_id: &str) -> Result<Option<Client>, DatabaseError> {
        let sql = client::select_by_client_id_query(client_id);

        let mut conn = self.connect().await?;
        let result = conn.fetch_optional::<Client>(&sql).await;
        conn.disconnect().await;
        result
    }

    pub async fn create_client(&self, new_client: &NewClient) -> Result<u64, DatabaseError> {
        match self.create_entity(new_client).await {
            Err(DatabaseError::Duplicate(_)) => Err(DatabaseError::Duplicate(format!(
                "Client ID '{}' already exists",
                new_client.client_id
            ))),
            other => other,
        }
    }

    pub async fn list_clients(&self, skip: i64, limit: i64) -> Result<Page<Client>, DatabaseError> {
        self.find_entities::<NewClient>(&FilterData::new(), skip, limit).await
    }

    pub async fn deactivate_client(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = client::deactivate_query(id);
        self.run_update::<NewClient>(id, &sql).await
    }

    /// Run a multi-statement script (schema setup)
    pub async fn run_script(&self, statements: &[String]) -> Result<usize, DatabaseError> {
        let mut conn = self.connect().await?;
        let result = conn.execute_script(statements).await;
        conn.disconnect().await;
        result
    }
}
