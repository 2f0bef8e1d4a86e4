//! Horus 헌트 타이머 추적
//!
//! 리전별 타이머를 모아 캐시하고, 월드별 마물 상태 변화를 구독 채널에 알립니다.

pub mod config;
pub mod error;
pub mod horus;
pub mod marks;
pub mod tracker;
pub mod worlds;
