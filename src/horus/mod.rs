//! Horus 헌트 타이머 모듈
//!
//! - `client`: Horus API 클라이언트 (`TimerSource`)
//! - `timer`: 원격 응답 타입
//! - `hunt`: 마물 스냅샷과 상태 계산
//! - `cache`: 단일 슬롯 응답 캐시
//! - `service`: 리전별 조회 → 병합 → 캐시 → 월드별 스냅샷

pub mod cache;
pub mod client;
pub mod hunt;
pub mod service;
pub mod timer;

// 편의를 위한 re-export
pub use client::{HorusClient, TimerSource};
pub use hunt::{HuntSnapshot, HuntStatus};
pub use service::HuntSnapshotService;

/// 실제 운영에서 사용하는 서비스 타입
pub type Horus = HuntSnapshotService<HorusClient>;
