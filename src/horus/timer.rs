//! Horus `GetDcTimers` 응답 타입
//!
//! 응답 형태: `{ "<world>": { "timers": { "<key>": { ...timer } } } }`

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// 리전 응답을 병합한 결과 (key: 월드 이름)
pub type TimerResponse = HashMap<String, WorldTimers>;

#[derive(Debug, Clone, Deserialize)]
pub struct WorldTimers {
    #[serde(default)]
    pub timers: HashMap<String, RawTimerRecord>,
}

/// 월드별, 인스턴스별 마물 타이머 (타임스탬프는 모두 epoch 밀리초)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimerRecord {
    /// marks_info.json의 키. 숫자 또는 문자열로 내려옵니다.
    #[serde(rename = "Id", deserialize_with = "id_as_string")]
    pub id: String,
    pub world: String,
    #[serde(default)]
    pub min_respawn: i64,
    #[serde(default)]
    pub max_respawn: i64,
    #[serde(default)]
    pub last_death: Option<i64>,
    pub open_date: i64,
    pub max_date: i64,
    #[serde(default)]
    pub last_alive: Option<i64>,
    #[serde(rename = "lastTryUnix", default)]
    pub last_try: Option<i64>,
    #[serde(default)]
    pub last_try_user: Option<String>,
    #[serde(default)]
    pub last_mark: Option<i64>,
    /// 0 = 인스턴스 없는 지역, 1-3 = 인스턴스 번호
    #[serde(rename = "ins", default)]
    pub instance: u8,
}

impl RawTimerRecord {
    /// null과 0은 모두 "처치 기록 없음"
    pub fn last_death(&self) -> Option<i64> {
        self.last_death.filter(|&t| t != 0)
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid hunt id: {}", other))),
    }
}
