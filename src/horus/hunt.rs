use chrono::{DateTime, TimeZone, Utc};
use chrono_humanize::HumanTime;
use std::fmt;

use super::timer::RawTimerRecord;
use crate::marks::{Expansion, HuntReferenceEntry};

/// 마물 스폰 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuntStatus {
    /// 최대 스폰 시간 도달 (강제 스폰)
    Maxed,
    /// 스폰 창이 열림
    Open,
    /// 처치됨, 다음 창 대기 중
    Died,
    Closed,
}

impl HuntStatus {
    /// 우선순위 순서를 바꾸지 말 것: 경계값(open == max 등)에서 여러 조건이 동시에 참이 됩니다.
    pub fn derive(now_ms: i64, open_date: i64, max_date: i64, last_death: Option<i64>) -> Self {
        if now_ms >= max_date {
            HuntStatus::Maxed
        } else if now_ms >= open_date {
            HuntStatus::Open
        } else if last_death.map_or(false, |t| t != 0) {
            HuntStatus::Died
        } else {
            HuntStatus::Closed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HuntStatus::Maxed => "spawn forced",
            HuntStatus::Open => "open",
            HuntStatus::Died => "dead",
            HuntStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for HuntStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 마물 정보 + 월드 타이머 + 계산된 상태
///
/// `load` 때마다 새로 만들어지며 수정되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct HuntSnapshot {
    // Hunt data
    pub name: String,
    /// 0 = 인스턴스 없는 지역, 1-3 = 인스턴스 번호
    pub instance: u8,
    pub rank: String,
    pub image: String,
    pub zone: String,
    pub region: String,
    pub spawn_trigger: String,
    pub tips: String,

    // Timer data
    pub world: String,
    pub min_respawn: i64,
    pub max_respawn: i64,
    pub last_death: Option<i64>,
    pub open_date: i64,
    pub max_date: i64,
    pub last_alive: Option<i64>,
    pub last_try: Option<i64>,
    pub last_try_user: Option<String>,
    pub last_mark: Option<i64>,

    /// 생성 시각 기준 상태
    pub status: HuntStatus,
}

impl HuntSnapshot {
    pub fn new(hunt: &HuntReferenceEntry, timer: &RawTimerRecord, now_ms: i64) -> Self {
        let last_death = timer.last_death();

        Self {
            name: hunt.name.clone(),
            instance: timer.instance,
            rank: hunt.rank.clone(),
            image: hunt.image.clone(),
            zone: hunt.zone_name.clone(),
            region: hunt.region_name.clone(),
            spawn_trigger: hunt.spawn_trigger.clone(),
            tips: hunt.tips.clone(),
            world: timer.world.clone(),
            min_respawn: timer.min_respawn,
            max_respawn: timer.max_respawn,
            last_death,
            open_date: timer.open_date,
            max_date: timer.max_date,
            last_alive: timer.last_alive,
            last_try: timer.last_try,
            last_try_user: timer.last_try_user.clone(),
            last_mark: timer.last_mark,
            status: HuntStatus::derive(now_ms, timer.open_date, timer.max_date, last_death),
        }
    }

    /// 월드 내 식별 키 (예: "zona seeker_1")
    pub fn key(&self) -> String {
        format!("{}_{}", self.name.trim().to_lowercase(), self.instance)
    }

    pub fn expansion(&self) -> Option<Expansion> {
        Expansion::of(&self.region, &self.zone)
    }

    /// 스냅샷을 늦게 읽는 경우 현재 시각으로 다시 계산
    pub fn status_at(&self, now_ms: i64) -> HuntStatus {
        HuntStatus::derive(now_ms, self.open_date, self.max_date, self.last_death)
    }

    pub fn died_at(&self) -> Option<DateTime<Utc>> {
        self.last_death
            .and_then(|t| Utc.timestamp_millis_opt(t).single())
    }

    /// "3 minutes ago" 형태의 처치 경과 시간
    pub fn human_since_death(&self) -> Option<HumanTime> {
        self.died_at().map(|died| HumanTime::from(died - Utc::now()))
    }
}
