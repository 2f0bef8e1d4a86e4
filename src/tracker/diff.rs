use std::collections::HashMap;
use std::fmt;

use crate::horus::{HuntSnapshot, HuntStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HuntEventKind {
    Died,
    Opened,
    Maxed,
}

/// 이전 스냅샷과 비교해서 발견한 변화
#[derive(Debug, Clone)]
pub struct HuntEvent {
    pub kind: HuntEventKind,
    /// 변화 이후의 스냅샷
    pub hunt: HuntSnapshot,
}

impl fmt::Display for HuntEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hunt = &self.hunt;
        write!(f, "[{}] {}", hunt.rank, hunt.name)?;
        if hunt.instance > 0 {
            write!(f, " (instance {})", hunt.instance)?;
        }
        write!(f, " on {}", hunt.world)?;

        match self.kind {
            HuntEventKind::Died => match hunt.human_since_death() {
                Some(ago) => write!(f, " was killed {}", ago),
                None => write!(f, " was killed"),
            },
            HuntEventKind::Opened => write!(f, " has opened in {}", hunt.zone),
            HuntEventKind::Maxed => write!(f, " is now spawn forced in {}", hunt.zone),
        }
    }
}

/// 한 월드의 두 스냅샷 비교
///
/// 처음 보는 마물은 이벤트를 만들지 않습니다. 결과는 키 순서로 정렬됩니다.
pub fn diff(
    previous: &HashMap<String, HuntSnapshot>,
    current: &HashMap<String, HuntSnapshot>,
) -> Vec<HuntEvent> {
    let mut keys: Vec<&String> = current.keys().collect();
    keys.sort();

    keys.into_iter()
        .filter_map(|key| {
            let before = previous.get(key)?;
            let after = &current[key];

            let kind = if after.last_death > before.last_death {
                HuntEventKind::Died
            } else if after.status == before.status {
                return None;
            } else {
                match after.status {
                    HuntStatus::Open => HuntEventKind::Opened,
                    HuntStatus::Maxed => HuntEventKind::Maxed,
                    HuntStatus::Died | HuntStatus::Closed => return None,
                }
            };

            Some(HuntEvent {
                kind,
                hunt: after.clone(),
            })
        })
        .collect()
}
