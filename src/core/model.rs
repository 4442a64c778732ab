//! 모델 트레이트
//!
//! 컬렉션에 저장되는 도메인 엔티티가 구현하는 계약입니다.
//! 논리 컬렉션 이름, 실제 컬렉션 이름, 부분 수정(patch) 타입을 고정합니다.

use mongodb::bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

/// 하나의 컬렉션에 바인딩된 도메인 엔티티
///
/// ```rust,ignore
/// impl Model for User {
///     const COLLECTION_NAME: &'static str = "User";
///     const PHYSICAL_NAME: &'static str = "users";
///     type Patch = UserPatch;
///
///     fn id(&self) -> Option<ObjectId> { self.id }
/// }
/// ```
pub trait Model: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    /// 레지스트리와 모델 API에서 사용하는 논리 이름
    const COLLECTION_NAME: &'static str;

    /// MongoDB에 실제로 생성되는 컬렉션 이름
    const PHYSICAL_NAME: &'static str;

    /// `$set`으로 병합되는 부분 수정 문서의 스키마.
    /// 알 수 없는 필드와 `_id`는 역직렬화 단계에서 거부되어야 합니다.
    type Patch: Serialize + DeserializeOwned + Validate + Send + Sync;

    /// 할당된 식별자 (삽입 전이면 `None`)
    fn id(&self) -> Option<ObjectId>;
}
