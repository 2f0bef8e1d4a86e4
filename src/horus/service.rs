use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::cache::ResponseCache;
use super::client::TimerSource;
use super::hunt::HuntSnapshot;
use super::timer::TimerResponse;
use crate::error::HuntError;
use crate::marks::MarksInfo;

/// 리전 응답을 병합하고 월드별 마물 스냅샷을 제공
pub struct HuntSnapshotService<S> {
    source: S,
    regions: Vec<String>,
    marks: MarksInfo,
    cache: ResponseCache<TimerResponse, HuntError>,
}

impl<S: TimerSource> HuntSnapshotService<S> {
    pub fn new(source: S, regions: Vec<String>, marks: MarksInfo, cache_ttl: Duration) -> Self {
        Self {
            source,
            regions,
            marks,
            cache: ResponseCache::new(cache_ttl),
        }
    }

    pub fn marks(&self) -> &MarksInfo {
        &self.marks
    }

    /// 월드의 모든 마물 스냅샷 (key: "이름_인스턴스")
    ///
    /// 월드 이름은 대소문자를 구분합니다. 정규화는 호출자 몫입니다.
    pub async fn load(&self, world: &str) -> Result<HashMap<String, HuntSnapshot>, HuntError> {
        self.load_at(world, Utc::now().timestamp_millis()).await
    }

    /// `now_ms` 시점 기준으로 상태를 계산하는 `load`
    pub async fn load_at(
        &self,
        world: &str,
        now_ms: i64,
    ) -> Result<HashMap<String, HuntSnapshot>, HuntError> {
        let response = self.response().await?;

        let timers = &response
            .get(world)
            .ok_or_else(|| HuntError::WorldNotFound(world.to_string()))?
            .timers;

        let mut hunts = HashMap::with_capacity(timers.len());
        for timer in timers.values() {
            let hunt = self.marks.resolve(&timer.id)?;
            let snapshot = HuntSnapshot::new(hunt, timer, now_ms);
            hunts.insert(snapshot.key(), snapshot);
        }

        Ok(hunts)
    }

    /// `status <world> <hunt>` 조회용
    ///
    /// 입력을 정규화한 뒤 이름이 일치하는 모든 인스턴스를 인스턴스 순서로 반환합니다.
    pub async fn find(&self, world: &str, hunt_name: &str) -> Result<Vec<HuntSnapshot>, HuntError> {
        let world = normalize_world(world);
        let hunt_name = hunt_name.trim().to_lowercase();

        let mut found: Vec<HuntSnapshot> = self
            .load(&world)
            .await?
            .into_values()
            .filter(|hunt| hunt.name.trim().to_lowercase() == hunt_name)
            .collect();

        if found.is_empty() {
            return Err(HuntError::HuntNotFound(hunt_name));
        }

        found.sort_by_key(|hunt| hunt.instance);
        Ok(found)
    }

    /// 현재 응답에 포함된 월드 목록 (정렬됨)
    pub async fn worlds(&self) -> Result<Vec<String>, HuntError> {
        let mut worlds: Vec<String> = self.response().await?.keys().cloned().collect();
        worlds.sort();
        Ok(worlds)
    }

    async fn response(&self) -> Result<Arc<TimerResponse>, HuntError> {
        self.cache.get_or_refresh(move || self.refresh()).await
    }

    /// 모든 리전을 순서대로 조회해 하나의 응답으로 병합
    ///
    /// 하나라도 실패하면 전체 갱신을 포기합니다.
    async fn refresh(&self) -> Result<TimerResponse, HuntError> {
        tracing::info!("Querying Horus ({} regions)", self.regions.len());

        let mut merged = TimerResponse::new();
        for region in &self.regions {
            let body = self.source.fetch(region).await?;
            let response: TimerResponse =
                serde_json::from_str(&body).map_err(|source| HuntError::Parse {
                    url: self.source.endpoint(region),
                    source: Arc::new(source),
                })?;

            for (world, timers) in response {
                if merged.contains_key(&world) {
                    return Err(HuntError::DuplicateWorld { world });
                }
                merged.insert(world, timers);
            }
        }

        tracing::info!("Horus refresh complete: {} worlds", merged.len());
        Ok(merged)
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResponseCache<TimerResponse, HuntError> {
        &self.cache
    }
}

/// " zALERA " → "Zalera"
pub fn normalize_world(world: &str) -> String {
    world
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::normalize_world;

    #[test]
    fn normalizes_world_names() {
        assert_eq!(normalize_world("  zALERA "), "Zalera");
        assert_eq!(normalize_world("Gilgamesh"), "Gilgamesh");
        assert_eq!(normalize_world(""), "");
    }
}
