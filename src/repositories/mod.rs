//! 모델 파사드 계층을 담당하는 리포지토리 모듈
//!
//! [`ModelRepository`]는 하나의 저장소 인스턴스와 하나의 고정 컬렉션을 묶어
//! 컬렉션/인스턴스 범위의 편의 메서드를 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::repositories::users::UserRepository;
//!
//! let users = UserRepository::new(Arc::new(MongoDatabase::with_default_models(&config.uri, pool)));
//! let penny = users.find_one(doc! { "firstName": "Penny" }).await?;
//! ```

pub mod model_repo;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use model_repo::ModelRepository;
pub use users::UserRepository;
