use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub horus: HorusConfig,
    #[serde(default)]
    pub marks: MarksConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// 시작 시 등록할 채널 구독
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HorusConfig {
    pub url: String,
    /// `?DC=` 쿼리로 조회할 리전(데이터센터) 목록
    pub regions: Vec<String>,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HorusConfig {
    fn default() -> Self {
        Self {
            url: "https://horus-hunts.net/Timers/GetDcTimers/".into(),
            regions: ["Aether", "Primal", "Crystal", "Chaos", "Light"]
                .iter()
                .map(|region| region.to_string())
                .collect(),
            cache_ttl_secs: 15,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarksConfig {
    pub path: PathBuf,
}

impl Default for MarksConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/marks_info.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub interval_secs: u64,
    /// 구독이 없어도 항상 추적할 월드
    pub worlds: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            worlds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    pub channel: u64,
    /// 월드 이름 또는 `data_center`와 함께 생략
    #[serde(default)]
    pub world: Option<String>,
    /// 데이터센터 전체 구독 (`sub-all`)
    #[serde(default)]
    pub data_center: Option<String>,
    /// "all", "S", "SB_S" 등
    #[serde(default = "all", alias = "rank")]
    pub category: String,
    #[serde(default = "all")]
    pub conditions: String,
}

fn all() -> String {
    "all".into()
}
