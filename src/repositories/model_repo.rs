//! # 모델 리포지토리
//!
//! 하나의 [`DocumentStore`] 인스턴스와 하나의 고정 컬렉션을 묶는 얇은 파사드입니다.
//! 모든 메서드는 고정된 논리 컬렉션 이름으로 저장소에 위임할 뿐,
//! 별도의 비즈니스 로직을 갖지 않습니다.
//!
//! ## 컬렉션 범위 메서드
//!
//! `find`, `find_one`, `find_by_id`, `insert`, `insert_many`, `update`, `apply`, `delete`, `count`
//!
//! ## 인스턴스 범위 메서드
//!
//! 인스턴스의 식별자(`_id`)를 조건으로 사용합니다.
//! 식별자가 없는(아직 삽입되지 않은) 인스턴스는 `ValidationError`로 거부됩니다.
//!
//! - `save`: 인스턴스의 모든 필드를 `$set`으로 병합
//! - `remove`: 인스턴스 삭제
//! - `reload`: 저장소의 최신 상태로 다시 읽기

use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::{self, oid::ObjectId, Document};

use crate::core::model::Model;
use crate::db::{DocumentStore, InsertData, Query};
use crate::errors::{AppError, AppResult};

/// 모델 `M`을 저장소 `S`의 고정 컬렉션에 바인딩한 파사드
pub struct ModelRepository<M: Model, S: DocumentStore> {
    db: Arc<S>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model, S: DocumentStore> Clone for ModelRepository<M, S> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

impl<M: Model, S: DocumentStore> ModelRepository<M, S> {
    pub fn new(db: Arc<S>) -> Self {
        Self {
            db,
            _model: PhantomData,
        }
    }

    /// 바인딩된 저장소
    pub fn db(&self) -> &Arc<S> {
        &self.db
    }

    /// 바인딩된 논리 컬렉션 이름
    pub fn collection_name(&self) -> &'static str {
        M::COLLECTION_NAME
    }

    fn decode(document: Document) -> AppResult<M> {
        Ok(bson::from_document(document)?)
    }

    fn identity(model: &M) -> AppResult<ObjectId> {
        model.id().ok_or_else(|| {
            AppError::ValidationError(format!(
                "{} 인스턴스에 식별자가 없습니다 (삽입 전 인스턴스)",
                M::COLLECTION_NAME
            ))
        })
    }

    pub async fn find(&self, query: impl Into<Query>) -> AppResult<Vec<M>> {
        self.db
            .select(query.into(), M::COLLECTION_NAME)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// 첫 번째로 일치하는 문서, 없으면 `None`
    pub async fn find_one(&self, query: impl Into<Query>) -> AppResult<Option<M>> {
        self.db
            .select_one(query.into(), M::COLLECTION_NAME)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<M>> {
        self.find_one(id).await
    }

    /// 인스턴스를 삽입하고, 식별자가 할당된 인스턴스를 반환합니다.
    pub async fn insert(&self, model: &M) -> AppResult<M> {
        let document = bson::to_document(model)?;

        let inserted = self
            .db
            .insert(InsertData::One(document), M::COLLECTION_NAME)
            .await?;

        let document = inserted.into_documents().into_iter().next().ok_or_else(|| {
            AppError::StorageError("삽입 결과에 문서가 없습니다".to_string())
        })?;
        Self::decode(document)
    }

    /// 여러 인스턴스를 순서대로 삽입합니다. 결과 순서는 입력 순서와 같습니다.
    pub async fn insert_many(&self, models: &[M]) -> AppResult<Vec<M>> {
        let documents = models
            .iter()
            .map(bson::to_document)
            .collect::<Result<Vec<_>, _>>()?;

        self.db
            .insert(InsertData::Many(documents), M::COLLECTION_NAME)
            .await?
            .into_documents()
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// 일치하는 모든 문서에 `data`를 병합하고 수정된 수를 반환합니다.
    pub async fn update(&self, query: impl Into<Query>, data: Document) -> AppResult<u64> {
        self.db.update(query.into(), data, M::COLLECTION_NAME).await
    }

    /// 타입이 있는 부분 수정 문서로 [`update`](Self::update)를 수행합니다.
    pub async fn apply(&self, query: impl Into<Query>, patch: &M::Patch) -> AppResult<u64> {
        self.update(query, bson::to_document(patch)?).await
    }

    /// 일치하는 문서를 삭제합니다. `Query::All`이면 컬렉션의 모든 문서가 삭제됩니다.
    pub async fn delete(&self, query: impl Into<Query>) -> AppResult<u64> {
        self.db.delete(query.into(), M::COLLECTION_NAME).await
    }

    pub async fn count(&self, query: impl Into<Query>) -> AppResult<u64> {
        self.db.count(query.into(), M::COLLECTION_NAME).await
    }

    /// 인스턴스의 현재 필드를 식별자로 찾은 문서에 병합합니다.
    pub async fn save(&self, model: &M) -> AppResult<u64> {
        let id = Self::identity(model)?;
        let mut document = bson::to_document(model)?;
        document.remove("_id");

        self.update(id, document).await
    }

    pub async fn remove(&self, model: &M) -> AppResult<u64> {
        let id = Self::identity(model)?;
        self.delete(id).await
    }

    pub async fn reload(&self, model: &M) -> AppResult<Option<M>> {
        let id = Self::identity(model)?;
        self.find_by_id(id).await
    }
}
