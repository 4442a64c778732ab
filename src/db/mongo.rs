//! # MongoDB 저장소 어댑터
//!
//! [`DocumentStore`]의 MongoDB 구현입니다.
//!
//! ## 작업 흐름
//!
//! ```text
//! select/insert/update/delete/count
//!   1. 레지스트리에서 논리 이름 해석 (미등록 → UnknownCollectionError, I/O 없음)
//!   2. 쓰기 작업이면 스키마 검증 (실패 → ValidationError, I/O 없음)
//!   3. ensure_connected → ConnectionPool (재사용 또는 수립)
//!   4. 드라이버 호출 → 결과
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mongodb::bson::doc;
//!
//! let config = DatabaseConfig::load()?;
//! let pool = Arc::new(ConnectionPool::new(MongoConnector::from_config(&config)));
//! let store = MongoDatabase::with_default_models(&config.uri, pool.clone());
//!
//! let penny = store.select(doc! { "firstName": "Penny" }.into(), "User").await?;
//! let removed = store.delete(Query::all(), "User").await?;
//!
//! pool.close_all().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use super::adapter::{Database, DatabaseAdapter, OnDisconnect};
use super::pool::{ConnectionPool, Connector};
use super::query::{InsertData, Inserted, Query};
use super::store::DocumentStore;
use crate::config::DatabaseConfig;
use crate::core::registry::{CollectionRegistration, CollectionRegistry};
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::redact_url;

/// 수립된 MongoDB 연결
///
/// 드라이버의 `Client`는 내부적으로 자체 커넥션 풀을 가지므로,
/// URL 당 하나의 핸들을 모든 어댑터가 공유합니다.
#[derive(Debug, Clone)]
pub struct MongoConnection {
    client: Client,
    database: mongodb::Database,
}

impl MongoConnection {
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &mongodb::Database {
        &self.database
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

/// MongoDB 클라이언트를 생성하고 연결을 검증하는 커넥터
#[derive(Debug, Clone)]
pub struct MongoConnector {
    app_name: String,
    default_database: String,
    server_selection_timeout: Duration,
}

impl MongoConnector {
    pub fn new(app_name: impl Into<String>, default_database: impl Into<String>, server_selection_timeout: Duration) -> Self {
        Self {
            app_name: app_name.into(),
            default_database: default_database.into(),
            server_selection_timeout,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(
            config.app_name.clone(),
            config.database_name.clone(),
            config.server_selection_timeout,
        )
    }
}

impl Default for MongoConnector {
    fn default() -> Self {
        Self::from_config(&DatabaseConfig::default())
    }
}

fn connection_error(url: &str, err: impl std::fmt::Display) -> AppError {
    AppError::ConnectionError(format!("{}: {}", redact_url(url), err))
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = MongoConnection;

    /// 옵션 파싱, 클라이언트 생성, `ping`까지 성공해야 연결이 수립된 것으로 봅니다.
    ///
    /// URI에 기본 데이터베이스가 있으면 그것을, 없으면 설정의 데이터베이스 이름을 사용합니다.
    async fn establish(&self, url: &str) -> AppResult<MongoConnection> {
        let mut options = ClientOptions::parse(url)
            .await
            .map_err(|e| connection_error(url, e))?;

        options.app_name = Some(self.app_name.clone());
        options.server_selection_timeout = Some(self.server_selection_timeout);

        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| self.default_database.clone());

        let client = Client::with_options(options).map_err(|e| connection_error(url, e))?;
        let database = client.database(&database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| connection_error(url, e))?;

        debug!("MongoDB ping 성공: {}", database_name);

        Ok(MongoConnection { client, database })
    }

    async fn close(&self, handle: Arc<MongoConnection>) {
        handle.client.clone().shutdown().await;
        info!("Mongo client shut down");
    }
}

/// MongoDB 기반 문서 저장소 어댑터
///
/// 기본 어댑터([`Database`])를 포함하고, 닫힌 [`CollectionRegistry`]로 컬렉션을 해석합니다.
/// 어댑터 자체는 연결 핸들 외의 가변 상태가 없으므로 `Arc`로 공유해 동시에 사용할 수 있습니다.
pub struct MongoDatabase {
    base: Database<MongoConnector>,
    registry: CollectionRegistry,
}

impl MongoDatabase {
    pub fn new(url: impl Into<String>, pool: Arc<ConnectionPool<MongoConnector>>, registry: CollectionRegistry) -> Self {
        Self {
            base: Database::new(url, pool),
            registry,
        }
    }

    /// 이 크레이트의 모든 모델이 등록된 어댑터
    pub fn with_default_models(url: impl Into<String>, pool: Arc<ConnectionPool<MongoConnector>>) -> Self {
        Self::new(url, pool, CollectionRegistry::with_default_models())
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &Arc<ConnectionPool<MongoConnector>> {
        self.base.pool()
    }

    pub fn is_connected(&self) -> bool {
        self.base.is_connected()
    }

    /// 논리 이름을 드라이버 컬렉션 핸들로 해석합니다.
    ///
    /// 등록되지 않은 이름은 연결을 시도하기 전에 `UnknownCollectionError`로 실패합니다.
    pub async fn collection(&self, collection_name: &str) -> AppResult<Collection<Document>> {
        let entry = self.registry.resolve(collection_name)?;
        self.open(entry).await
    }

    async fn open(&self, entry: &CollectionRegistration) -> AppResult<Collection<Document>> {
        let handle = self.base.ensure_connected(Some(entry.name())).await?;
        Ok(handle.database().collection::<Document>(entry.physical_name()))
    }
}

/// 삽입된 문서에 할당된 `_id`를 맨 앞에 붙인 결과 문서를 만듭니다.
fn with_assigned_id(document: Document, id: Bson) -> Document {
    if document.contains_key("_id") {
        return document;
    }

    let mut result = doc! { "_id": id };
    result.extend(document);
    result
}

#[async_trait]
impl DatabaseAdapter for MongoDatabase {
    type Handle = MongoConnection;

    fn url(&self) -> &str {
        self.base.url()
    }

    async fn ensure_connected(&self, collection_name: Option<&str>) -> AppResult<Arc<MongoConnection>> {
        self.base.ensure_connected(collection_name).await
    }

    async fn connect(&self, collection_name: Option<&str>) -> AppResult<Arc<MongoConnection>> {
        self.base.connect(collection_name).await
    }

    async fn disconnect(&self, on_complete: Option<OnDisconnect>) {
        self.base.disconnect(on_complete).await
    }

    /// 테스트 정리용. 컬렉션과 모든 문서를 되돌릴 수 없이 삭제합니다.
    async fn drop_collection(&self, collection_name: &str) -> AppResult<()> {
        let collection = self.collection(collection_name).await?;
        collection.drop().await?;
        info!("Dropped collection {}", collection.name());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MongoDatabase {
    async fn select(&self, query: Query, collection_name: &str) -> AppResult<Vec<Document>> {
        let collection = self.collection(collection_name).await?;

        let cursor = collection.find(query.to_filter()).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        debug!("Selected {} objects from collection {}", documents.len(), collection_name);
        Ok(documents)
    }

    async fn select_one(&self, query: Query, collection_name: &str) -> AppResult<Option<Document>> {
        let collection = self.collection(collection_name).await?;

        Ok(collection.find_one(query.to_filter()).await?)
    }

    async fn insert(&self, data: InsertData, collection_name: &str) -> AppResult<Inserted> {
        let entry = self.registry.resolve(collection_name)?;
        for document in data.documents() {
            entry.schema().validate_document(document)?;
        }

        let collection = self.open(entry).await?;

        let inserted = match data {
            InsertData::One(document) => {
                let result = collection.insert_one(&document).await?;
                Inserted::One(with_assigned_id(document, result.inserted_id))
            }
            InsertData::Many(documents) if documents.is_empty() => Inserted::Many(documents),
            InsertData::Many(documents) => {
                let mut result = collection.insert_many(&documents).await?;
                let inserted = documents
                    .into_iter()
                    .enumerate()
                    .map(|(index, document)| match result.inserted_ids.remove(&index) {
                        Some(id) => with_assigned_id(document, id),
                        None => document,
                    })
                    .collect();
                Inserted::Many(inserted)
            }
        };

        info!("Inserted {} records into collection {}", inserted.len(), collection_name);
        Ok(inserted)
    }

    async fn update(&self, query: Query, data: Document, collection_name: &str) -> AppResult<u64> {
        let entry = self.registry.resolve(collection_name)?;
        entry.schema().validate_patch(&data)?;

        let collection = self.open(entry).await?;

        let result = collection
            .update_many(query.to_filter(), doc! { "$set": data })
            .await?;

        info!("Updated {} objects in collection {}", result.modified_count, collection_name);
        Ok(result.modified_count)
    }

    async fn delete(&self, query: Query, collection_name: &str) -> AppResult<u64> {
        let collection = self.collection(collection_name).await?;

        let result = collection.delete_many(query.to_filter()).await?;

        info!("Deleted {} objects in collection {}", result.deleted_count, collection_name);
        Ok(result.deleted_count)
    }

    async fn count(&self, query: Query, collection_name: &str) -> AppResult<u64> {
        let collection = self.collection(collection_name).await?;

        let count = collection.count_documents(query.to_filter()).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{oid::ObjectId, DateTime};

    // 연결이 시도되면 즉시 실패하는 주소
    const UNREACHABLE: &str = "mongodb://127.0.0.1:1/mongo_user_model_test";

    fn store() -> MongoDatabase {
        let connector = MongoConnector::new("test", "unused", Duration::from_millis(50));
        MongoDatabase::with_default_models(UNREACHABLE, Arc::new(ConnectionPool::new(connector)))
    }

    #[test]
    fn test_with_assigned_id_puts_id_first() {
        let id = ObjectId::new();
        let result = with_assigned_id(doc! { "email": "a@example.com" }, Bson::ObjectId(id));

        assert_eq!(result.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(result.get_object_id("_id").unwrap(), id);
        assert_eq!(result.get_str("email").unwrap(), "a@example.com");
    }

    #[test]
    fn test_with_assigned_id_keeps_existing_id() {
        let document = doc! { "_id": "fixed", "email": "a@example.com" };

        assert_eq!(with_assigned_id(document.clone(), Bson::Int32(1)), document);
    }

    #[tokio::test]
    async fn test_unknown_collection_fails_without_connecting() {
        let store = store();

        let select = store.select(Query::all(), "Comment").await;
        let select_one = store.select_one(Query::all(), "Comment").await;
        let insert = store.insert(doc! {}.into(), "Comment").await;
        let update = store.update(Query::all(), doc! { "a": 1 }, "Comment").await;
        let delete = store.delete(Query::all(), "Comment").await;
        let count = store.count(Query::all(), "Comment").await;
        let drop = store.drop_collection("Comment").await;

        for result in [
            select.map(|_| ()),
            select_one.map(|_| ()),
            insert.map(|_| ()),
            update.map(|_| ()),
            delete.map(|_| ()),
            count.map(|_| ()),
            drop,
        ] {
            assert!(matches!(result, Err(AppError::UnknownCollectionError(_))));
        }
        assert!(!store.is_connected());
        assert!(store.pool().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_insert_fails_before_any_write() {
        let store = store();
        let valid = doc! {
            "email": "example1@example.com",
            "firstName": "test",
            "lastName": "test",
            "registrationDate": DateTime::now(),
        };
        let mut invalid = valid.clone();
        invalid.insert("email", "not-an-email");

        let result = store
            .insert(InsertData::Many(vec![valid, invalid]), "User")
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_invalid_patch_fails_before_any_write() {
        let store = store();

        let result = store
            .update(Query::all(), doc! { "password": "x" }, "User")
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let store = store();

        let result = store.count(Query::all(), "User").await;

        assert!(matches!(result, Err(AppError::ConnectionError(_))));
        assert!(!store.is_connected());
        assert!(store.pool().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_without_connection_does_not_fail() {
        let store = store();

        store.disconnect(None).await;

        assert!(!store.is_connected());
    }
}
