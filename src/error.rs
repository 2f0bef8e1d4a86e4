//! 헌트 추적 에러 타입
//!
//! 호출자가 "월드/마물 없음"과 "원격 API 실패"를 구분해서 응답할 수 있도록
//! 에러 종류를 나눕니다.

use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 캐시 갱신이 실패하면 같은 에러를 대기 중인 호출자 모두에게 돌려주므로 `Clone`
#[derive(Debug, Clone, thiserror::Error)]
pub enum HuntError {
    #[error("World {0} does not exist")]
    WorldNotFound(String),

    #[error("ID {0} does not exist")]
    HuntNotFound(String),

    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("World {world} was reported by more than one region")]
    DuplicateWorld { world: String },
}

impl HuntError {
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        HuntError::Transport {
            url: url.into(),
            source: Arc::from(source.into()),
        }
    }

    /// 사용자에게 "철자를 확인하세요" 류의 응답을 돌려줄 에러인지 여부
    pub fn is_not_found(&self) -> bool {
        matches!(self, HuntError::WorldNotFound(_) | HuntError::HuntNotFound(_))
    }
}

/// 채널 구독 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("No subscriptions have been specified for channel {0}")]
    NoSubscriptions(u64),

    #[error("Unknown condition {0:?} (allowed: deaths, openings, maxed, all)")]
    UnknownCondition(String),

    #[error("Unknown category {0:?} (allowed: all, S, A, B, or ARR/HW/SB with a rank such as SB_S)")]
    UnknownCategory(String),

    #[error("Unknown data center {0}")]
    UnknownDataCenter(String),
}
