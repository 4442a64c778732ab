//! # 컬렉션 레지스트리
//!
//! 논리 컬렉션 이름을 실제 컬렉션과 스키마에 매핑하는 닫힌(closed) 레지스트리입니다.
//! 어댑터 생성 시점에 구성되어 이후 변경되지 않으며,
//! 등록되지 않은 이름은 항상 `UnknownCollectionError`로 거부됩니다.
//!
//! ## 구성 예제
//!
//! ```rust,ignore
//! use crate::core::registry::CollectionRegistry;
//! use crate::domain::entities::users::User;
//!
//! let registry = CollectionRegistry::new().register::<User>();
//! let entry = registry.resolve("User")?;
//! assert_eq!(entry.physical_name(), "users");
//! ```
//!
//! ## 스키마 검증
//!
//! 각 항목은 [`DocumentSchema`]를 가지며, 쓰기 작업 전에 입력 문서를 검증합니다.
//! 모델 기반 스키마([`ModelSchema`])는 문서를 모델 타입으로 역직렬화한 뒤
//! `validator` 규칙을 적용합니다.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::{self, Document};
use validator::Validate;

use super::model::Model;
use crate::errors::{AppError, AppResult};

/// 컬렉션 문서의 스키마 검증기
pub trait DocumentSchema: Send + Sync {
    /// 삽입될 전체 문서를 검증합니다.
    fn validate_document(&self, document: &Document) -> AppResult<()>;

    /// `$set`으로 병합될 부분 수정 문서를 검증합니다.
    fn validate_patch(&self, patch: &Document) -> AppResult<()>;
}

/// [`Model`] 타입에서 파생된 스키마
pub struct ModelSchema<M: Model> {
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ModelSchema<M> {
    pub fn new() -> Self {
        Self { _model: PhantomData }
    }
}

impl<M: Model> Default for ModelSchema<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> DocumentSchema for ModelSchema<M> {
    fn validate_document(&self, document: &Document) -> AppResult<()> {
        let model: M = bson::from_document(document.clone()).map_err(|e| {
            AppError::ValidationError(format!("{} 스키마 위반: {}", M::COLLECTION_NAME, e))
        })?;
        model.validate()?;
        Ok(())
    }

    fn validate_patch(&self, patch: &Document) -> AppResult<()> {
        if patch.is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} 수정 문서가 비어 있습니다",
                M::COLLECTION_NAME
            )));
        }

        let patch: M::Patch = bson::from_document(patch.clone()).map_err(|e| {
            AppError::ValidationError(format!("{} 수정 문서 스키마 위반: {}", M::COLLECTION_NAME, e))
        })?;
        patch.validate()?;
        Ok(())
    }
}

/// 레지스트리의 단일 항목
#[derive(Clone)]
pub struct CollectionRegistration {
    name: &'static str,
    physical_name: &'static str,
    schema: Arc<dyn DocumentSchema>,
}

impl CollectionRegistration {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn physical_name(&self) -> &'static str {
        self.physical_name
    }

    pub fn schema(&self) -> &dyn DocumentSchema {
        self.schema.as_ref()
    }
}

impl fmt::Debug for CollectionRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRegistration")
            .field("name", &self.name)
            .field("physical_name", &self.physical_name)
            .finish()
    }
}

/// 논리 이름 → 컬렉션 항목
#[derive(Clone, Debug, Default)]
pub struct CollectionRegistry {
    entries: HashMap<&'static str, CollectionRegistration>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이 크레이트가 제공하는 모든 모델이 등록된 레지스트리
    pub fn with_default_models() -> Self {
        Self::new().register::<crate::domain::entities::users::User>()
    }

    /// 모델을 등록합니다. 같은 논리 이름이 이미 있으면 교체됩니다.
    pub fn register<M: Model>(self) -> Self {
        self.register_schema(M::COLLECTION_NAME, M::PHYSICAL_NAME, ModelSchema::<M>::new())
    }

    /// 임의의 스키마로 컬렉션을 등록합니다.
    pub fn register_schema<S>(mut self, name: &'static str, physical_name: &'static str, schema: S) -> Self
    where
        S: DocumentSchema + 'static,
    {
        self.entries.insert(
            name,
            CollectionRegistration {
                name,
                physical_name,
                schema: Arc::new(schema),
            },
        );
        self
    }

    /// 논리 이름을 항목으로 해석합니다. I/O는 발생하지 않습니다.
    pub fn resolve(&self, name: &str) -> AppResult<&CollectionRegistration> {
        self.entries
            .get(name)
            .ok_or_else(|| AppError::unknown_collection(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
