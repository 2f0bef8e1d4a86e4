//! 단일 슬롯 응답 캐시
//!
//! 모든 월드, 모든 호출자가 하나의 슬롯을 공유합니다.
//! 갱신은 한 번에 하나만 진행되고, 그동안 도착한 호출은 성공이든 실패든 그 결과를 재사용합니다.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

struct Cached<T> {
    payload: Arc<T>,
    fetched_at: Instant,
}

pub struct ResponseCache<T, E> {
    ttl: Duration,
    slot: RwLock<Option<Cached<T>>>,
    /// 마지막으로 끝난 갱신의 실패. 갱신하는 동안 잠겨 있음
    refresh: Mutex<Option<E>>,
    /// 끝난 갱신 수, `refresh` 락을 잡은 채로만 증가
    rounds: AtomicU64,
}

impl<T, E: Clone> ResponseCache<T, E> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
            refresh: Mutex::new(None),
            rounds: AtomicU64::new(0),
        }
    }

    /// 캐시가 유효하면 그대로 반환, 아니면 `refresh`로 갱신
    ///
    /// `refresh`가 실패하면 기존 슬롯은 그대로 남고, 그 갱신을 기다리던 호출자도
    /// 같은 에러를 받습니다. 다음 호출은 다시 갱신을 시도합니다.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let seen = self.rounds.load(Ordering::Acquire);

        if let Some(payload) = self.fresh().await {
            tracing::debug!("Using cached Horus response");
            return Ok(payload);
        }

        let mut last_failure = self.refresh.lock().await;

        // 락을 기다리는 동안 다른 호출이 이미 갱신했을 수 있음
        if let Some(payload) = self.fresh().await {
            tracing::debug!("Horus response refreshed by a concurrent caller");
            return Ok(payload);
        }
        if self.rounds.load(Ordering::Acquire) != seen {
            if let Some(e) = last_failure.as_ref() {
                tracing::debug!("Horus refresh failed while waiting, reusing its error");
                return Err(e.clone());
            }
        }

        let result = refresh().await;
        self.rounds.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(payload) => {
                let payload = Arc::new(payload);
                *self.slot.write().await = Some(Cached {
                    payload: Arc::clone(&payload),
                    fetched_at: Instant::now(),
                });
                *last_failure = None;
                Ok(payload)
            }
            Err(e) => {
                *last_failure = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn fresh(&self) -> Option<Arc<T>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cached| cached.fetched_at.elapsed() <= self.ttl)
            .map(|cached| Arc::clone(&cached.payload))
    }

    /// 만료 여부와 관계없이 마지막으로 저장된 응답
    #[cfg(test)]
    pub async fn peek(&self) -> Option<Arc<T>> {
        self.slot.read().await.as_ref().map(|cached| Arc::clone(&cached.payload))
    }
}
