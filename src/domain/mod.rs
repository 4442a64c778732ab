//! # Domain Layer Module
//!
//! 저장소에 영속되는 도메인 엔티티를 담는 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! └── entities     - 컬렉션 문서와 대응하는 엔티티
//!      │
//!      ▼
//! Repositories     - 모델 파사드 (고정 컬렉션 바인딩)
//!      │
//!      ▼
//! DB               - 연결 풀, 어댑터, MongoDB 구현
//! ```

pub mod entities;
