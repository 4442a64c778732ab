//! MongoDB 사용자 모델 계층
//!
//! 문서 데이터베이스 위의 최소한의 객체-문서 매핑(ODM) 계층입니다.
//! 연결 풀링과 재사용, 지연 연결, 컬렉션 해석, CRUD 계약을 제공하며
//! 그 위에 `User` 모델 파사드를 얹습니다.
//!
//! # Features
//!
//! - **연결 풀**: URL 당 하나의 연결, 동시 최초 접근 시에도 한 번만 수립
//! - **지연 연결**: 첫 작업 시점에 연결 수립
//! - **닫힌 컬렉션 레지스트리**: 미등록 컬렉션은 I/O 없이 거부
//! - **스키마 검증**: `validator` 규칙으로 쓰기 전 검증
//! - **모델 파사드**: 고정 컬렉션에 바인딩된 `find`/`insert`/`update`/`delete`/`count`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ ModelRepository │ ← 모델 파사드 (UserRepository)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  MongoDatabase  │ ← 컬렉션 해석 + CRUD (DocumentStore)
//! └─────────────────┘
//!          │ ensure_connected
//!          ▼
//! ┌─────────────────┐
//! │ ConnectionPool  │ ← URL → 연결 핸들 (establish-once)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mongodb::bson::doc;
//! use mongo_user_model::config::{init_logging, DatabaseConfig};
//! use mongo_user_model::db::{ConnectionPool, MongoConnector, MongoDatabase, Query};
//! use mongo_user_model::domain::entities::users::User;
//! use mongo_user_model::repositories::UserRepository;
//!
//! init_logging();
//! let config = DatabaseConfig::load()?;
//! let pool = Arc::new(ConnectionPool::new(MongoConnector::from_config(&config)));
//! let users = UserRepository::new(Arc::new(MongoDatabase::with_default_models(&config.uri, pool.clone())));
//!
//! users.insert(&User::new("example1@example.com", "test", "test")).await?;
//! users.update(doc! { "email": "example1@example.com" }, doc! { "firstName": "Penny" }).await?;
//! let total = users.count(Query::all()).await?;
//!
//! pool.close_all().await;
//! ```

pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod utils;
