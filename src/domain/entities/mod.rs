//! # Domain Entities Module
//!
//! MongoDB 문서와 직접 매핑되는 엔티티들을 정의합니다.
//!
//! 모든 엔티티는 다음 특징을 가집니다:
//! - **BSON 직렬화**: `serde`를 통한 자동 변환
//! - **ObjectId 지원**: MongoDB의 `_id` 필드와 매핑
//! - **스키마 검증**: `validator` 규칙으로 쓰기 전 검증
//! - **레지스트리 등록**: [`Model`](crate::core::Model) 구현으로 컬렉션에 바인딩

pub mod users;
