//! 헌트 알림 모듈
//!
//! - `diff`: 연속된 스냅샷 비교
//! - `subscription`: 채널 구독
//! - `background`: 주기적 재조회와 알림 발행

pub mod background;
pub mod diff;
pub mod subscription;

pub use background::{spawn_announce_task, spawn_recheck_task, HuntTracker};
pub use diff::HuntEventKind;
pub use subscription::{Category, Conditions, Rank};
