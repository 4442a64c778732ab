//! CRUD 작업의 입력/출력 타입
//!
//! - [`Query`]: 구조화된 필터, 식별자 단축 조회, 전체 선택
//! - [`InsertData`] / [`Inserted`]: 단건/다건 입력과 그 모양을 그대로 따르는 결과

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// 문서 선택 조건
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Query {
    /// 컬렉션의 모든 문서
    #[default]
    All,
    /// 필드 → 기대값/연산자 매핑
    Filter(Document),
    /// `{_id: value}`의 단축 표현
    Id(Bson),
}

impl Query {
    pub fn all() -> Self {
        Query::All
    }

    /// 식별자 단축 조회
    ///
    /// 24자리 16진수 문자열은 `ObjectId`로 해석하고, 그 외 문자열은 그대로 비교합니다.
    pub fn by_id(id: &str) -> Self {
        match ObjectId::parse_str(id) {
            Ok(oid) => Query::Id(Bson::ObjectId(oid)),
            Err(_) => Query::Id(Bson::String(id.to_string())),
        }
    }

    /// 드라이버에 전달할 필터 문서
    pub fn to_filter(&self) -> Document {
        match self {
            Query::All => Document::new(),
            Query::Filter(filter) => filter.clone(),
            Query::Id(id) => doc! { "_id": id.clone() },
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            Query::All => true,
            Query::Filter(filter) => filter.is_empty(),
            Query::Id(_) => false,
        }
    }
}

impl From<Document> for Query {
    fn from(filter: Document) -> Self {
        Query::Filter(filter)
    }
}

impl From<Option<Document>> for Query {
    fn from(filter: Option<Document>) -> Self {
        filter.map(Query::Filter).unwrap_or(Query::All)
    }
}

impl From<ObjectId> for Query {
    fn from(id: ObjectId) -> Self {
        Query::Id(Bson::ObjectId(id))
    }
}

impl From<&str> for Query {
    fn from(id: &str) -> Self {
        Query::by_id(id)
    }
}

impl From<String> for Query {
    fn from(id: String) -> Self {
        Query::by_id(&id)
    }
}

impl TryFrom<Value> for Query {
    type Error = AppError;

    /// JSON 값에서 조건을 만듭니다.
    ///
    /// 객체는 필터, 스칼라는 식별자 단축 표현, `null`은 전체 선택입니다.
    fn try_from(value: Value) -> AppResult<Self> {
        match value {
            Value::Null => Ok(Query::All),
            Value::String(id) => Ok(Query::by_id(&id)),
            Value::Object(_) => {
                let filter = mongodb::bson::to_document(&value)?;
                Ok(Query::Filter(filter))
            }
            scalar @ (Value::Bool(_) | Value::Number(_)) => {
                Ok(Query::Id(mongodb::bson::to_bson(&scalar)?))
            }
            Value::Array(_) => Err(AppError::ValidationError(
                "배열은 조회 조건으로 사용할 수 없습니다".to_string(),
            )),
        }
    }
}

/// 삽입 입력: 단건 또는 순서 있는 다건
#[derive(Debug, Clone, PartialEq)]
pub enum InsertData {
    One(Document),
    Many(Vec<Document>),
}

impl InsertData {
    pub fn len(&self) -> usize {
        match self {
            InsertData::One(_) => 1,
            InsertData::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn documents(&self) -> Vec<&Document> {
        match self {
            InsertData::One(doc) => vec![doc],
            InsertData::Many(docs) => docs.iter().collect(),
        }
    }
}

impl From<Document> for InsertData {
    fn from(doc: Document) -> Self {
        InsertData::One(doc)
    }
}

impl From<Vec<Document>> for InsertData {
    fn from(docs: Vec<Document>) -> Self {
        InsertData::Many(docs)
    }
}

/// 삽입 결과: 입력과 같은 모양이며 각 문서에는 할당된 `_id`가 포함됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted {
    One(Document),
    Many(Vec<Document>),
}

impl Inserted {
    pub fn len(&self) -> usize {
        match self {
            Inserted::One(_) => 1,
            Inserted::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 결과 모양과 무관하게 문서 목록으로 변환합니다.
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            Inserted::One(doc) => vec![doc],
            Inserted::Many(docs) => docs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_string_is_id_shorthand() {
        let oid = ObjectId::new();

        assert_eq!(Query::from(oid.to_hex().as_str()).to_filter(), doc! { "_id": oid });
        assert_eq!(Query::from("custom-key").to_filter(), doc! { "_id": "custom-key" });
    }

    #[test]
    fn test_filter_and_all() {
        let filter = doc! { "lastName": { "$exists": true } };

        assert_eq!(Query::from(filter.clone()).to_filter(), filter);
        assert_eq!(Query::all().to_filter(), Document::new());
        assert_eq!(Query::from(None::<Document>), Query::All);
        assert!(Query::from(Document::new()).is_all());
        assert!(!Query::by_id("x").is_all());
    }

    #[test]
    fn test_query_from_json() {
        let query = Query::try_from(json!({ "email": "example1@example.com" })).unwrap();
        assert_eq!(query.to_filter(), doc! { "email": "example1@example.com" });

        assert_eq!(Query::try_from(json!(null)).unwrap(), Query::All);
        assert_eq!(
            Query::try_from(json!(7)).unwrap().to_filter(),
            doc! { "_id": 7_i64 }
        );
        assert!(matches!(
            Query::try_from(json!([1, 2])),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_insert_shapes() {
        let one = InsertData::from(doc! { "email": "a@example.com" });
        let many = InsertData::from(vec![doc! { "n": 1 }, doc! { "n": 2 }]);

        assert_eq!(one.len(), 1);
        assert_eq!(many.documents().len(), 2);
        assert!(InsertData::Many(Vec::new()).is_empty());
        assert_eq!(Inserted::One(doc! {}).into_documents().len(), 1);
    }
}
