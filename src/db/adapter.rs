//! # 데이터베이스 어댑터
//!
//! 연결 URL과 드라이버 핸들을 소유하는 기본 추상화입니다.
//! 연결은 첫 작업 시점에 지연 수립되며([`DatabaseAdapter::ensure_connected`]),
//! 실제 수립은 주입된 [`ConnectionPool`]에 위임됩니다.
//!
//! 구체적인 저장소 어댑터(예: [`MongoDatabase`](super::mongo::MongoDatabase))는
//! 상속 대신 [`Database`]를 필드로 포함하고 이 트레이트를 위임 구현합니다.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::{debug, info, warn};

use super::pool::{ConnectionPool, Connector};
use crate::errors::AppResult;
use crate::utils::string_utils::redact_url;

/// 연결 해제 완료 후 호출되는 콜백
pub type OnDisconnect = Box<dyn FnOnce() + Send + 'static>;

/// 연결 생명주기를 관리하는 어댑터 인터페이스
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    type Handle: Send + Sync + 'static;

    /// 생성 후 변경되지 않는 연결 URL
    fn url(&self) -> &str;

    /// 연결되어 있지 않으면 [`connect`](Self::connect)를 호출합니다.
    ///
    /// 이미 연결된 경우 풀의 핸들을 얻는 것 외에 아무 일도 하지 않습니다.
    /// 반환되는 핸들은 항상 풀이 현재 URL에 대해 가진 핸들입니다.
    async fn ensure_connected(&self, collection_name: Option<&str>) -> AppResult<Arc<Self::Handle>>;

    /// 풀에서 핸들을 얻어 저장합니다.
    ///
    /// `collection_name`은 향후 암묵적 컬렉션 생성을 위한 힌트이며 현재는 사용되지 않습니다.
    async fn connect(&self, collection_name: Option<&str>) -> AppResult<Arc<Self::Handle>>;

    /// 풀에서 항목을 제거하고 연결을 닫은 뒤 `on_complete`를 호출합니다.
    ///
    /// 열린 연결이 없어도 실패하지 않습니다.
    async fn disconnect(&self, on_complete: Option<OnDisconnect>);

    /// 컬렉션과 그 안의 모든 문서를 영구 삭제합니다.
    async fn drop_collection(&self, collection_name: &str) -> AppResult<()>;
}

/// URL, 풀, 현재 핸들을 묶은 기본 어댑터 구현
///
/// 같은 URL을 쓰는 모든 모델이 하나의 인스턴스를 공유할 수 있습니다.
/// 저장된 핸들은 풀의 현재 핸들과 같을 때만 유효합니다. 같은 풀을 쓰는 다른 어댑터가
/// 연결을 해제하면 다음 [`ensure_connected`](Self::ensure_connected)에서 새 핸들로 교체됩니다.
/// 핸들 슬롯 잠금은 await 지점을 넘어 유지되지 않습니다.
pub struct Database<C: Connector> {
    url: String,
    pool: Arc<ConnectionPool<C>>,
    db: RwLock<Option<Arc<C::Handle>>>,
}

impl<C: Connector> Database<C> {
    pub fn new(url: impl Into<String>, pool: Arc<ConnectionPool<C>>) -> Self {
        Self {
            url: url.into(),
            pool,
            db: RwLock::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pool(&self) -> &Arc<ConnectionPool<C>> {
        &self.pool
    }

    /// 현재 저장된 핸들 (연결 전이면 `None`)
    pub fn handle(&self) -> Option<Arc<C::Handle>> {
        self.db
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 저장된 핸들이 아직 풀의 현재 핸들인지 확인합니다.
    pub fn is_connected(&self) -> bool {
        match (self.handle(), self.pool.current(&self.url)) {
            (Some(cached), Some(current)) => Arc::ptr_eq(&cached, &current),
            _ => false,
        }
    }

    fn store_handle(&self, handle: Option<Arc<C::Handle>>) -> Option<Arc<C::Handle>> {
        let mut slot = self.db.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *slot, handle)
    }

    pub async fn ensure_connected(&self, collection_name: Option<&str>) -> AppResult<Arc<C::Handle>> {
        let Some(current) = self.pool.current(&self.url) else {
            return self.connect(collection_name).await;
        };

        match self.handle() {
            Some(cached) if Arc::ptr_eq(&cached, &current) => {}
            Some(_) => {
                debug!("Replacing released db handle {}", redact_url(&self.url));
                self.store_handle(Some(current.clone()));
            }
            None => {
                self.store_handle(Some(current.clone()));
            }
        }

        Ok(current)
    }

    pub async fn connect(&self, collection_name: Option<&str>) -> AppResult<Arc<C::Handle>> {
        let handle = self.pool.acquire(&self.url).await?;
        self.store_handle(Some(handle.clone()));

        if let Some(name) = collection_name {
            debug!("Connected for collection {} ({})", name, redact_url(&self.url));
        }

        Ok(handle)
    }

    /// 풀의 현재 핸들만 닫습니다.
    ///
    /// 저장된 핸들이 이미 다른 어댑터에 의해 해제된 것이라면 그 연결은 이미 닫혔으므로
    /// 다시 닫지 않습니다.
    pub async fn disconnect(&self, on_complete: Option<OnDisconnect>) {
        self.store_handle(None);

        match self.pool.release(&self.url) {
            Some(handle) => {
                self.pool.connector().close(handle).await;
                if let Some(callback) = on_complete {
                    callback();
                }
                info!("Closed db connection {}", redact_url(&self.url));
            }
            None => {
                warn!("No open db connection to close for {}", redact_url(&self.url));
            }
        }
    }
}
