//! 마물 정보 테이블 (marks_info.json)
//!
//! Horus 타이머의 `Id`를 실제 마물 정보로 매핑합니다.
//! 프로세스 시작 시 한 번 로드되며 이후 변경되지 않습니다.

use anyhow::Context;
use maplit::hashmap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;

use crate::error::HuntError;

/// 마물 기본 정보
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HuntReferenceEntry {
    pub name: String,
    /// S / A / B
    pub rank: String,
    #[serde(default)]
    pub image: String,
    pub zone_name: String,
    pub region_name: String,
    #[serde(default)]
    pub spawn_trigger: String,
    #[serde(default)]
    pub tips: String,
}

impl HuntReferenceEntry {
    pub fn expansion(&self) -> Option<Expansion> {
        Expansion::of(&self.region_name, &self.zone_name)
    }
}

/// 마물이 속한 확장팩. 구독 분류(`SB_S` 등)에 사용
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expansion {
    /// 신생 에오르제아
    Arr,
    /// 창천의 이슈가르드
    Hw,
    /// 홍련의 해방자
    Sb,
}

lazy_static::lazy_static! {
    static ref REGIONS: HashMap<&'static str, Expansion> = hashmap! {
        "la noscea" => Expansion::Arr,
        "the black shroud" => Expansion::Arr,
        "thanalan" => Expansion::Arr,
        "mor dhona" => Expansion::Arr,
        "abalathia's spine" => Expansion::Hw,
        "dravania" => Expansion::Hw,
        "gyr abania" => Expansion::Sb,
        "othard" => Expansion::Sb,
    };
}

impl Expansion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Expansion::Arr => "ARR",
            Expansion::Hw => "HW",
            Expansion::Sb => "SB",
        }
    }

    /// 지역 이름으로 확장팩 판별
    ///
    /// 커르다스는 두 확장팩에 걸쳐 있어 구역 이름으로 구분합니다.
    pub fn of(region: &str, zone: &str) -> Option<Expansion> {
        let region = region.trim().to_lowercase();
        if region == "coerthas" {
            return match zone.trim().to_lowercase().as_str() {
                "coerthas central highlands" => Some(Expansion::Arr),
                "coerthas western highlands" => Some(Expansion::Hw),
                _ => None,
            };
        }
        REGIONS.get(region.as_str()).copied()
    }

    pub fn parse(s: &str) -> Option<Expansion> {
        match s.trim().to_uppercase().as_str() {
            "ARR" => Some(Expansion::Arr),
            "HW" => Some(Expansion::Hw),
            "SB" => Some(Expansion::Sb),
            _ => None,
        }
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarksInfo {
    entries: HashMap<String, HuntReferenceEntry>,
}

impl MarksInfo {
    pub async fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read marks info from {}", path.display()))?;
        let marks = Self::from_json(&json).context("could not parse marks info")?;

        tracing::info!("Loaded {} hunt marks from {}", marks.len(), path.display());
        Ok(marks)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    /// Horus ID → 마물 정보
    ///
    /// 원격 응답은 ID를 숫자로 줄 때도 있어서 문자열로 변환한 뒤 조회합니다.
    pub fn resolve(&self, id: impl Display) -> Result<&HuntReferenceEntry, HuntError> {
        let id = id.to_string();
        self.entries.get(&id).ok_or(HuntError::HuntNotFound(id))
    }

    /// 이름으로 조회 (대소문자, 앞뒤 공백 무시)
    pub fn by_name(&self, name: &str) -> Option<&HuntReferenceEntry> {
        let name = name.trim();
        self.entries
            .values()
            .find(|entry| entry.name.trim().eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
