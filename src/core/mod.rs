//! # Core Module
//!
//! 모델 계약과 컬렉션 레지스트리를 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`model`] - 모델 트레이트
//! - 논리/물리 컬렉션 이름과 부분 수정 스키마를 고정
//!
//! ### [`registry`] - 컬렉션 레지스트리
//! - 어댑터 생성 시점에 구성되는 닫힌 매핑
//! - 등록되지 않은 이름은 `UnknownCollectionError`
//! - 쓰기 전 스키마 검증

pub mod model;
pub mod registry;

pub use model::Model;
pub use registry::{CollectionRegistration, CollectionRegistry, DocumentSchema, ModelSchema};
