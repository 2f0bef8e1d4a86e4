use std::collections::{BTreeSet, HashMap};
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast::{self, error::RecvError, Receiver, Sender};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::diff::{diff, HuntEvent};
use super::subscription::Subscriptions;
use crate::error::HuntError;
use crate::horus::service::normalize_world;
use crate::horus::{HuntSnapshot, HuntSnapshotService, TimerSource};
use crate::marks::HuntReferenceEntry;

/// 알림 대상 채널이 정해진 이벤트
#[derive(Debug, Clone)]
pub struct HuntNotice {
    pub event: HuntEvent,
    pub channels: Vec<u64>,
}

/// 주기적으로 월드를 다시 조회하고 변화를 구독 채널에 알리는 관리자
pub struct HuntTracker<S> {
    horus: Arc<HuntSnapshotService<S>>,
    subscriptions: Subscriptions,
    /// 구독과 관계없이 항상 추적하는 월드
    worlds: Vec<String>,
    snapshots: RwLock<HashMap<String, HashMap<String, HuntSnapshot>>>,
    notices: Sender<Arc<HuntNotice>>,
}

impl<S: TimerSource> HuntTracker<S> {
    pub fn new(horus: Arc<HuntSnapshotService<S>>, worlds: Vec<String>) -> Arc<Self> {
        let (tx, _) = broadcast::channel(64);
        Arc::new(Self {
            horus,
            subscriptions: Subscriptions::default(),
            worlds: worlds.iter().map(|world| normalize_world(world)).collect(),
            snapshots: Default::default(),
            notices: tx,
        })
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn notices(&self) -> Receiver<Arc<HuntNotice>> {
        self.notices.subscribe()
    }

    pub async fn watched_worlds(&self) -> BTreeSet<String> {
        let mut worlds = self.subscriptions.worlds().await;
        worlds.extend(self.worlds.iter().cloned());
        worlds
    }

    /// `info <hunt>` 조회
    pub fn info(&self, hunt_name: &str) -> Result<HuntReferenceEntry, HuntError> {
        self.horus
            .marks()
            .by_name(hunt_name)
            .cloned()
            .ok_or_else(|| HuntError::HuntNotFound(hunt_name.trim().to_string()))
    }

    #[cfg(test)]
    pub(crate) async fn has_snapshot(&self, world: &str) -> bool {
        self.snapshots.read().await.contains_key(world)
    }

    /// `status <world> <hunt>` 조회
    pub async fn get(&self, world: &str, hunt_name: &str) -> Result<Vec<HuntSnapshot>, HuntError> {
        self.horus.find(world, hunt_name).await
    }

    /// 추적 중인 모든 월드를 다시 조회하고 변화를 발행합니다. 발행한 이벤트 수를 반환합니다.
    ///
    /// 없는 월드는 건너뛰고, 원격 조회 실패는 이번 사이클 전체를 중단합니다.
    /// 더 이상 추적하지 않는 월드의 스냅샷은 버려서, 나중에 다시 구독해도 오래된 상태와 비교하지 않습니다.
    pub async fn recheck(&self) -> Result<usize, HuntError> {
        let watched = self.watched_worlds().await;
        self.snapshots.write().await.retain(|world, _| {
            let keep = watched.contains(world);
            if !keep {
                tracing::debug!("Dropping snapshot for unwatched world {}", world);
            }
            keep
        });

        let mut published = 0;
        for world in watched {
            let hunts = match self.horus.load(&world).await {
                Ok(hunts) => hunts,
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Skipping {}: {}", world, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let events = {
                let mut snapshots = self.snapshots.write().await;
                let events = snapshots
                    .get(&world)
                    .map(|previous| diff(previous, &hunts))
                    .unwrap_or_default();
                snapshots.insert(world, hunts);
                events
            };

            for event in events {
                let channels = self.subscriptions.recipients(&event).await;
                // 수신자가 없으면 send가 실패하지만 무시
                let _ = self.notices.send(Arc::new(HuntNotice { event, channels }));
                published += 1;
            }
        }

        Ok(published)
    }
}

pub fn spawn_recheck_task<S>(tracker: Arc<HuntTracker<S>>, interval: Duration) -> JoinHandle<()>
where
    S: TimerSource + 'static,
{
    tokio::task::spawn(async move {
        tracing::info!("Starting hunt recheck service (every {:?})...", interval);
        loop {
            match tracker.recheck().await {
                Ok(0) => {}
                Ok(count) => tracing::info!("Published {} hunt events", count),
                Err(e) => tracing::error!("Exception thrown while reloading hunts: {:?}", e),
            }
            tokio::time::sleep(interval).await;
        }
    })
}

/// 채팅 연동 계층 대신 알림을 로그로 남깁니다.
pub fn spawn_announce_task(mut notices: Receiver<Arc<HuntNotice>>) -> JoinHandle<()> {
    tokio::task::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notice) => {
                    tracing::info!(channels = ?notice.channels, "{}", notice.event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Announcer lagged behind, {} notices dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
