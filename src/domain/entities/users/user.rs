//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! `users` 컬렉션의 문서와 1:1로 대응하며, 필드는 camelCase로 저장됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::model::Model;

/// 사용자 엔티티
///
/// 저장 형태:
///
/// ```json
/// {
///   "_id": ObjectId("..."),
///   "email": "example@example.com",
///   "firstName": "test",
///   "lastName": "test",
///   "registrationDate": ISODate("...")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
    /// 이름
    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    pub first_name: String,
    /// 성
    #[validate(length(min = 1, max = 50, message = "성은 1-50자 사이여야 합니다"))]
    pub last_name: String,
    /// 가입 시간
    pub registration_date: DateTime,
}

impl User {
    /// 새 사용자 생성 (가입 시간은 현재 시각)
    ///
    /// ID는 삽입 시 MongoDB가 할당합니다.
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            registration_date: DateTime::now(),
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 표시용 전체 이름
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Model for User {
    const COLLECTION_NAME: &'static str = "User";
    const PHYSICAL_NAME: &'static str = "users";
    type Patch = UserPatch;

    fn id(&self) -> Option<ObjectId> {
        self.id
    }
}

/// 사용자 부분 수정 문서
///
/// 지정된 필드만 `$set`으로 병합됩니다. 알 수 없는 필드와 `_id`는 거부됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "성은 1-50자 사이여야 합니다"))]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<DateTime>,
}
