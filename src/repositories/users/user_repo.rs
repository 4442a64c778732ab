//! # 사용자 리포지토리
//!
//! `User` 컬렉션에 바인딩된 모델 파사드입니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use mongodb::bson::doc;
//! use crate::repositories::users::UserRepository;
//! use crate::domain::entities::users::User;
//!
//! async fn user_operations(users: &UserRepository) -> Result<(), AppError> {
//!     // 사용자 생성
//!     let created = users.insert(&User::new("john@example.com", "John", "Doe")).await?;
//!
//!     // 부분 수정 ($set 병합)
//!     users.update(doc! { "email": "john@example.com" }, doc! { "firstName": "Johnny" }).await?;
//!
//!     // 이메일로 조회
//!     let found = users.find_by_email("john@example.com").await?;
//!
//!     // 삭제
//!     users.remove(&created).await?;
//!     Ok(())
//! }
//! ```

use mongodb::bson::doc;

use super::super::model_repo::ModelRepository;
use crate::db::{DocumentStore, MongoDatabase};
use crate::domain::entities::users::User;
use crate::errors::AppResult;

/// MongoDB 기반 사용자 리포지토리
pub type UserRepository = ModelRepository<User, MongoDatabase>;

impl<S: DocumentStore> ModelRepository<User, S> {
    /// 이메일 주소로 사용자 조회
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 이메일의 사용자가 없는 경우
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one(doc! { "email": email }).await
    }

    /// 성(`lastName`) 필드가 있는 모든 사용자
    pub async fn find_with_last_name(&self) -> AppResult<Vec<User>> {
        self.find(doc! { "lastName": { "$exists": true } }).await
    }
}
