//! Horus API 클라이언트
//!
//! `https://horus-hunts.net/Timers/GetDcTimers/?DC=<region>` 을 리전별로 조회합니다.

use std::future::Future;
use std::time::Duration;

use crate::config::HorusConfig;
use crate::error::HuntError;

/// 리전 하나의 타이머 응답 본문(JSON 텍스트)을 가져오는 원격 소스
pub trait TimerSource: Send + Sync {
    fn fetch(&self, region: &str) -> impl Future<Output = Result<String, HuntError>> + Send;

    /// 로그/에러 메시지용 주소
    fn endpoint(&self, region: &str) -> String;
}

pub struct HorusClient {
    url: String,
    http: reqwest::Client,
}

impl HorusClient {
    pub fn new(config: &HorusConfig) -> anyhow::Result<Self> {
        // 응답이 없는 리전 하나가 전체 갱신을 막지 않도록 요청마다 타임아웃 적용
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: config.url.clone(),
            http,
        })
    }
}

impl TimerSource for HorusClient {
    async fn fetch(&self, region: &str) -> Result<String, HuntError> {
        let url = self.endpoint(region);
        tracing::debug!("Querying: {}", url);

        let response = self
            .http
            .get(&self.url)
            .query(&[("DC", region)])
            .send()
            .await
            .map_err(|e| HuntError::transport(&url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HuntError::transport(
                url,
                format!("Horus API error: {} - {}", status, body),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| HuntError::transport(url, e))
    }

    fn endpoint(&self, region: &str) -> String {
        format!("{}?DC={}", self.url, region)
    }
}
