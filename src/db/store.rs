//! 문서 저장소 CRUD 인터페이스
//!
//! [`DatabaseAdapter`] 위에 얹히는 CRUD 기능 집합입니다.
//! 모든 작업은 실행 전에 연결을 보장하며, 드라이버 에러는 복구 없이 호출자에게 전파됩니다.
//!
//! | 작업 | 결과 | 0건일 때 |
//! |------|------|----------|
//! | `select` | 일치하는 문서 목록 | 빈 목록 |
//! | `select_one` | 첫 번째로 일치하는 문서 | `None` |
//! | `insert` | 입력과 같은 모양의 삽입 결과 | - |
//! | `update` | 수정된 문서 수 (`$set` 병합) | 0 |
//! | `delete` | 삭제된 문서 수 (`Query::All`이면 전체) | 0 |
//! | `count` | 일치하는 문서 수 | 0 |

use async_trait::async_trait;
use mongodb::bson::Document;

use super::adapter::DatabaseAdapter;
use super::query::{InsertData, Inserted, Query};
use crate::errors::AppResult;

#[async_trait]
pub trait DocumentStore: DatabaseAdapter {
    /// `query`와 일치하는 문서를 반환합니다.
    async fn select(&self, query: Query, collection_name: &str) -> AppResult<Vec<Document>>;

    /// 첫 번째로 일치하는 문서, 없으면 `None`
    ///
    /// 기본 구현은 [`select`](Self::select) 결과의 첫 문서입니다.
    /// 저장소가 한 건만 읽을 수 있으면 재정의합니다.
    async fn select_one(&self, query: Query, collection_name: &str) -> AppResult<Option<Document>> {
        Ok(self.select(query, collection_name).await?.into_iter().next())
    }

    /// 단건 또는 다건 문서를 삽입합니다.
    ///
    /// 모든 문서는 쓰기 전에 스키마 검증을 통과해야 하며,
    /// 하나라도 실패하면 아무것도 쓰지 않고 `ValidationError`를 반환합니다.
    async fn insert(&self, data: InsertData, collection_name: &str) -> AppResult<Inserted>;

    /// 일치하는 모든 문서에 `data`의 필드를 병합합니다 (문서 교체 아님).
    async fn update(&self, query: Query, data: Document, collection_name: &str) -> AppResult<u64>;

    /// 일치하는 문서를 삭제합니다.
    async fn delete(&self, query: Query, collection_name: &str) -> AppResult<u64>;

    /// 일치하는 문서 수를 셉니다.
    async fn count(&self, query: Query, collection_name: &str) -> AppResult<u64>;
}
