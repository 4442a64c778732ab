//! 서버 없이 리포지토리 계약을 검증하기 위한 인메모리 문서 저장소
//!
//! 최상위 필드 동등 비교와 `$exists`, `$eq`, `$ne` 연산자만 지원합니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::core::registry::CollectionRegistry;
use crate::db::pool::testing::{CountingConnector, FakeHandle};
use crate::db::{
    ConnectionPool, Database, DatabaseAdapter, DocumentStore, InsertData, Inserted, OnDisconnect,
    Query,
};
use crate::errors::AppResult;

pub struct InMemoryStore {
    base: Database<CountingConnector>,
    registry: CollectionRegistry,
    collections: Mutex<HashMap<&'static str, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        let pool = Arc::new(ConnectionPool::new(CountingConnector::default()));
        Self {
            base: Database::new("mongodb://memory/test", pool),
            registry: CollectionRegistry::with_default_models(),
            collections: Mutex::new(HashMap::new()),
        }
    }

    pub fn connections_established(&self) -> usize {
        self.base.pool().connector().established()
    }

    fn physical(&self, name: &str) -> AppResult<&'static str> {
        Ok(self.registry.resolve(name)?.physical_name())
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let value = document.get(key);
        match condition {
            Bson::Document(ops) if ops.keys().all(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, arg)| match op.as_str() {
                    "$exists" => value.is_some() == arg.as_bool().unwrap_or(true),
                    "$eq" => value == Some(arg),
                    "$ne" => value != Some(arg),
                    _ => false,
                })
            }
            expected => value == Some(expected),
        }
    })
}

#[async_trait]
impl DatabaseAdapter for InMemoryStore {
    type Handle = FakeHandle;

    fn url(&self) -> &str {
        self.base.url()
    }

    async fn ensure_connected(&self, collection_name: Option<&str>) -> AppResult<Arc<FakeHandle>> {
        self.base.ensure_connected(collection_name).await
    }

    async fn connect(&self, collection_name: Option<&str>) -> AppResult<Arc<FakeHandle>> {
        self.base.connect(collection_name).await
    }

    async fn disconnect(&self, on_complete: Option<OnDisconnect>) {
        self.base.disconnect(on_complete).await
    }

    async fn drop_collection(&self, collection_name: &str) -> AppResult<()> {
        let physical = self.physical(collection_name)?;
        self.ensure_connected(Some(collection_name)).await?;
        self.collections.lock().unwrap().remove(physical);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn select(&self, query: Query, collection_name: &str) -> AppResult<Vec<Document>> {
        let physical = self.physical(collection_name)?;
        self.ensure_connected(Some(collection_name)).await?;

        let filter = query.to_filter();
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(physical)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn select_one(&self, query: Query, collection_name: &str) -> AppResult<Option<Document>> {
        let physical = self.physical(collection_name)?;
        self.ensure_connected(Some(collection_name)).await?;

        let filter = query.to_filter();
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(physical)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn insert(&self, data: InsertData, collection_name: &str) -> AppResult<Inserted> {
        let entry = self.registry.resolve(collection_name)?;
        for document in data.documents() {
            entry.schema().validate_document(document)?;
        }
        self.ensure_connected(Some(collection_name)).await?;

        let assign = |document: Document| {
            if document.contains_key("_id") {
                document
            } else {
                let mut with_id = doc! { "_id": ObjectId::new() };
                with_id.extend(document);
                with_id
            }
        };

        let mut collections = self.collections.lock().unwrap();
        let stored = collections.entry(entry.physical_name()).or_default();

        Ok(match data {
            InsertData::One(document) => {
                let document = assign(document);
                stored.push(document.clone());
                Inserted::One(document)
            }
            InsertData::Many(documents) => {
                let documents: Vec<Document> = documents.into_iter().map(assign).collect();
                stored.extend(documents.iter().cloned());
                Inserted::Many(documents)
            }
        })
    }

    async fn update(&self, query: Query, data: Document, collection_name: &str) -> AppResult<u64> {
        let entry = self.registry.resolve(collection_name)?;
        entry.schema().validate_patch(&data)?;
        self.ensure_connected(Some(collection_name)).await?;

        let filter = query.to_filter();
        let mut collections = self.collections.lock().unwrap();
        let mut modified = 0;
        for document in collections.entry(entry.physical_name()).or_default() {
            if !matches(document, &filter) {
                continue;
            }
            let mut changed = false;
            for (key, value) in data.iter() {
                if document.get(key) != Some(value) {
                    document.insert(key.clone(), value.clone());
                    changed = true;
                }
            }
            if changed {
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn delete(&self, query: Query, collection_name: &str) -> AppResult<u64> {
        let physical = self.physical(collection_name)?;
        self.ensure_connected(Some(collection_name)).await?;

        let filter = query.to_filter();
        let mut collections = self.collections.lock().unwrap();
        let stored = collections.entry(physical).or_default();
        let before = stored.len();
        stored.retain(|d| !matches(d, &filter));
        Ok((before - stored.len()) as u64)
    }

    async fn count(&self, query: Query, collection_name: &str) -> AppResult<u64> {
        Ok(self.select(query, collection_name).await?.len() as u64)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
