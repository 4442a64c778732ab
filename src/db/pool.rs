//! # 연결 풀
//!
//! 연결 URL을 키로 하는 연결 핸들 저장소입니다.
//! 프로세스 시작 시 명시적으로 생성되어 어댑터들에 주입되며,
//! 종료 시 [`ConnectionPool::close_all`]로 정리합니다.
//!
//! ## 불변 조건
//!
//! - URL 당 최대 하나의 핸들만 존재합니다.
//! - 같은 URL에 대한 최초 동시 요청은 하나의 연결 수립만 발생시키고,
//!   모든 호출자가 동일한 핸들을 관찰합니다 (establish-once).
//! - 연결 수립에 실패하면 항목은 미수립 상태로 남으며, 다음 요청이 다시 수립을 시도합니다.
//!
//! ```rust,ignore
//! let pool = Arc::new(ConnectionPool::new(MongoConnector::from_config(&config)));
//! let handle = pool.acquire("mongodb://localhost:27017/app").await?;
//! // ...
//! pool.close_all().await;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::OnceCell;

use crate::errors::AppResult;
use crate::utils::string_utils::redact_url;

/// 실제 연결을 수립하고 닫는 드라이버 측 구현
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// 수립된 연결을 나타내는 불투명 핸들
    type Handle: Send + Sync + 'static;

    /// `url`에 대한 새 연결을 수립합니다. 실패 시 `ConnectionError`를 반환해야 합니다.
    async fn establish(&self, url: &str) -> AppResult<Self::Handle>;

    /// 핸들의 연결을 닫습니다. 실패하더라도 에러를 반환하지 않습니다.
    async fn close(&self, handle: Arc<Self::Handle>);
}

type Slot<H> = Arc<OnceCell<Arc<H>>>;

/// URL → 연결 핸들 매핑
pub struct ConnectionPool<C: Connector> {
    connector: C,
    entries: Mutex<HashMap<String, Slot<C::Handle>>>,
}

impl<C: Connector> ConnectionPool<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Slot<C::Handle>>> {
        // 잠금 구간에서 패닉이 발생해도 맵 자체는 일관된 상태이다
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `url`의 핸들을 반환하고, 없으면 수립하여 저장합니다.
    ///
    /// 맵 잠금은 슬롯을 찾는 동안만 유지되며, 연결 수립은 URL별 슬롯에서 직렬화됩니다.
    /// 따라서 서로 다른 URL의 수립은 서로를 기다리지 않습니다.
    pub async fn acquire(&self, url: &str) -> AppResult<Arc<C::Handle>> {
        let slot = {
            let mut entries = self.entries();
            entries
                .entry(url.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        if let Some(handle) = slot.get() {
            debug!("Reusing pooled connection {}", redact_url(url));
            return Ok(handle.clone());
        }

        let handle = slot
            .get_or_try_init(|| async {
                let handle = self.connector.establish(url).await?;
                info!("✅ Opened database connection {}", redact_url(url));
                Ok::<_, crate::errors::AppError>(Arc::new(handle))
            })
            .await?;

        Ok(handle.clone())
    }

    /// 현재 풀에 수립되어 있는 `url`의 핸들. 연결을 수립하지 않습니다.
    pub fn current(&self, url: &str) -> Option<Arc<C::Handle>> {
        self.entries().get(url).and_then(|slot| slot.get().cloned())
    }

    /// `url`의 항목을 제거하고, 수립되어 있던 핸들을 반환합니다.
    ///
    /// 연결을 닫지는 않습니다. 반환된 핸들을 닫는 것은 호출자의 책임입니다.
    pub fn release(&self, url: &str) -> Option<Arc<C::Handle>> {
        let slot = self.entries().remove(url)?;
        slot.get().cloned()
    }

    /// 풀의 모든 항목을 제거하고 수립된 연결을 모두 닫습니다.
    pub async fn close_all(&self) {
        let drained: Vec<(String, Slot<C::Handle>)> = self.entries().drain().collect();

        for (url, slot) in drained {
            if let Some(handle) = slot.get() {
                self.connector.close(handle.clone()).await;
                info!("Closed db connection {}", redact_url(&url));
            }
        }
    }

    /// 수립된 핸들이 있는 URL인지 확인합니다.
    pub fn contains(&self, url: &str) -> bool {
        self.entries()
            .get(url)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }

    /// 수립된 핸들의 개수
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 실제 서버 없이 풀과 어댑터를 검증하기 위한 인메모리 커넥터

    use super::*;
    use crate::errors::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    pub struct FakeHandle {
        pub url: String,
        pub serial: usize,
    }

    #[derive(Default)]
    pub struct CountingConnector {
        pub established: AtomicUsize,
        pub closed: AtomicUsize,
        pub failures_remaining: AtomicUsize,
    }

    impl CountingConnector {
        pub fn failing(times: usize) -> Self {
            let connector = Self::default();
            connector.failures_remaining.store(times, Ordering::SeqCst);
            connector
        }

        pub fn established(&self) -> usize {
            self.established.load(Ordering::SeqCst)
        }

        pub fn closed(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Connector for CountingConnector {
        type Handle = FakeHandle;

        async fn establish(&self, url: &str) -> AppResult<FakeHandle> {
            // 다른 호출자가 끼어들 수 있도록 양보
            tokio::task::yield_now().await;

            let failures = self.failures_remaining.load(Ordering::SeqCst);
            if failures > 0 {
                self.failures_remaining.store(failures - 1, Ordering::SeqCst);
                return Err(AppError::ConnectionError(format!("refused: {}", url)));
            }

            let serial = self.established.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(FakeHandle {
                url: url.to_string(),
                serial,
            })
        }

        async fn close(&self, _handle: Arc<FakeHandle>) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
