//! 데이터 액세스 계층 전역에서 사용하는 에러 시스템
//!
//! `thiserror` 기반의 통합 에러 타입입니다.
//! 드라이버 에러는 의미를 유지한 채 호출자에게 그대로 전파되며,
//! 어댑터는 자체적인 복구나 재시도를 수행하지 않습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn find_users(store: &MongoDatabase) -> Result<Vec<Document>, AppError> {
//!     let users = store.select(Query::all(), "User").await?;
//!     Ok(users)
//! }
//! ```

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// MongoDB 서버가 스키마 검증 실패 시 반환하는 에러 코드 (`DocumentValidationFailure`)
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// 애플리케이션 전역 에러 타입
///
/// 0건 조회/수정/삭제는 에러가 아닌 정상 결과이며, 이 타입으로 표현되지 않습니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 연결 수립 실패 (작업이 실행되기 전에 실패)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 레지스트리에 등록되지 않은 컬렉션 이름
    #[error("Unknown collection: {0}")]
    UnknownCollectionError(String),

    /// 입력 문서가 컬렉션 스키마를 위반
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 드라이버 수준의 일반 저장소 에러 (네트워크, 직렬화, 서버 에러)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 잘못된 설정값
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// 레지스트리 조회 실패 에러를 생성합니다.
    pub fn unknown_collection(name: &str) -> Self {
        AppError::UnknownCollectionError(format!(
            "The collection with the given name does not exist: {}",
            name
        ))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    /// 드라이버 에러를 분류합니다.
    ///
    /// 서버 측 스키마 검증 실패(단건/다건 쓰기 모두)는 `ValidationError`로,
    /// 나머지는 모두 `StorageError`로 변환됩니다.
    fn from(err: mongodb::error::Error) -> Self {
        let is_validation_failure = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                write_error.code == DOCUMENT_VALIDATION_FAILURE
            }
            ErrorKind::InsertMany(insert_error) => insert_error
                .write_errors
                .as_ref()
                .map(|errors| {
                    errors
                        .iter()
                        .any(|e| e.code == DOCUMENT_VALIDATION_FAILURE)
                })
                .unwrap_or(false),
            _ => false,
        };

        if is_validation_failure {
            AppError::ValidationError(err.to_string())
        } else {
            AppError::StorageError(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::ValidationError(format!("문서를 BSON으로 변환할 수 없습니다: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::StorageError(format!("저장된 문서를 해석할 수 없습니다: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_unknown_collection_message() {
        let error = AppError::unknown_collection("Comment");

        assert!(matches!(error, AppError::UnknownCollectionError(_)));
        assert!(error.to_string().contains("Comment"));
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            AppError::ConnectionError("refused".to_string()).to_string(),
            "Connection error: refused"
        );
        assert_eq!(
            AppError::StorageError("timeout".to_string()).to_string(),
            "Storage error: timeout"
        );
    }

    #[test]
    fn test_bson_deserialize_error_is_storage_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }

        let result: Result<Named, _> =
            mongodb::bson::from_document(mongodb::bson::doc! { "name": 42 });
        let error: AppError = result.unwrap_err().into();

        assert!(matches!(error, AppError::StorageError(_)));
    }

    #[test]
    fn test_validator_errors_become_validation_error() {
        #[derive(Validate)]
        struct Contact {
            #[validate(email)]
            email: String,
        }

        let contact = Contact {
            email: "not-an-email".to_string(),
        };
        let error: AppError = contact.validate().unwrap_err().into();

        if let AppError::ValidationError(msg) = error {
            assert!(msg.contains("email"));
        } else {
            panic!("Expected ValidationError");
        }
    }
}
