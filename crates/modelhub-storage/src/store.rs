use sea_orm::{
    ActiveValue, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Schema,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities;

/// Upper bound on status checks returned by a single listing.
pub const STATUS_LIST_LIMIT: u64 = 1000;

#[derive(Clone)]
pub struct HubStorage {
    db: DatabaseConnection,
}

impl HubStorage {
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let db = Database::connect(database_url).await?;
        Ok(Self { db })
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn sync(&self) -> Result<(), DbErr> {
        Schema::new(self.db.get_database_backend())
            .builder()
            .register(entities::ApiKeys)
            .register(entities::StatusChecks)
            .sync(&self.db)
            .await
    }

    /// Upsert by provider: any existing credential rows for the provider are
    /// dropped before the new one is inserted, so at most one row per
    /// provider survives. The prior key is unrecoverable afterwards.
    pub async fn save_api_key(
        &self,
        api_key: &str,
        provider: &str,
    ) -> Result<entities::api_keys::Model, DbErr> {
        entities::ApiKeys::delete_many()
            .filter(entities::api_keys::Column::Provider.eq(provider))
            .exec(&self.db)
            .await?;

        let record = entities::api_keys::Model {
            id: Uuid::new_v4().to_string(),
            api_key: api_key.to_string(),
            provider: provider.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        let active = entities::api_keys::ActiveModel {
            id: ActiveValue::Set(record.id.clone()),
            api_key: ActiveValue::Set(record.api_key.clone()),
            provider: ActiveValue::Set(record.provider.clone()),
            created_at: ActiveValue::Set(record.created_at),
        };
        entities::ApiKeys::insert(active).exec(&self.db).await?;
        Ok(record)
    }

    /// Missing credentials are a normal outcome, not an error.
    pub async fn get_api_key(
        &self,
        provider: &str,
    ) -> Result<Option<entities::api_keys::Model>, DbErr> {
        entities::ApiKeys::find()
            .filter(entities::api_keys::Column::Provider.eq(provider))
            .one(&self.db)
            .await
    }

    pub async fn delete_api_keys(&self, provider: &str) -> Result<u64, DbErr> {
        let result = entities::ApiKeys::delete_many()
            .filter(entities::api_keys::Column::Provider.eq(provider))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn insert_status_check(
        &self,
        client_name: &str,
    ) -> Result<entities::status_checks::Model, DbErr> {
        let record = entities::status_checks::Model {
            id: Uuid::new_v4().to_string(),
            client_name: client_name.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        };
        let active = entities::status_checks::ActiveModel {
            id: ActiveValue::Set(record.id.clone()),
            client_name: ActiveValue::Set(record.client_name.clone()),
            timestamp: ActiveValue::Set(record.timestamp),
        };
        entities::StatusChecks::insert(active).exec(&self.db).await?;
        Ok(record)
    }

    pub async fn list_status_checks(
        &self,
    ) -> Result<Vec<entities::status_checks::Model>, DbErr> {
        entities::StatusChecks::find()
            .order_by_asc(entities::status_checks::Column::Timestamp)
            .limit(STATUS_LIST_LIMIT)
            .all(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> HubStorage {
        let storage = HubStorage::connect("sqlite::memory:")
            .await
            .expect("connect in-memory sqlite");
        storage.sync().await.expect("schema sync");
        storage
    }

    #[tokio::test]
    async fn save_then_get_roundtrips() {
        let storage = memory_store().await;
        let saved = storage.save_api_key("sk-test-1", "a4f").await.unwrap();
        let fetched = storage.get_api_key("a4f").await.unwrap().unwrap();
        assert_eq!(fetched.api_key, "sk-test-1");
        assert_eq!(fetched.id, saved.id);
    }

    #[tokio::test]
    async fn resave_replaces_instead_of_appending() {
        let storage = memory_store().await;
        storage.save_api_key("sk-old", "a4f").await.unwrap();
        storage.save_api_key("sk-new", "a4f").await.unwrap();

        let fetched = storage.get_api_key("a4f").await.unwrap().unwrap();
        assert_eq!(fetched.api_key, "sk-new");
        // Exactly one row remains for the provider.
        assert_eq!(storage.delete_api_keys("a4f").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn providers_are_independent() {
        let storage = memory_store().await;
        storage.save_api_key("sk-a", "a4f").await.unwrap();
        storage.save_api_key("sk-b", "other").await.unwrap();

        assert_eq!(
            storage.get_api_key("a4f").await.unwrap().unwrap().api_key,
            "sk-a"
        );
        assert_eq!(
            storage.get_api_key("other").await.unwrap().unwrap().api_key,
            "sk-b"
        );
    }

    #[tokio::test]
    async fn delete_on_empty_provider_reports_zero() {
        let storage = memory_store().await;
        assert_eq!(storage.delete_api_keys("missing").await.unwrap(), 0);
        assert!(storage.get_api_key("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_checks_append_in_order() {
        let storage = memory_store().await;
        storage.insert_status_check("client-a").await.unwrap();
        storage.insert_status_check("client-b").await.unwrap();

        let checks = storage.list_status_checks().await.unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].client_name, "client-a");
        assert_eq!(checks[1].client_name, "client-b");
        assert!(checks[0].timestamp <= checks[1].timestamp);
    }
}
