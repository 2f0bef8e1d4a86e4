//! 채널 구독 (메모리 보관)
//!
//! 채널별로 (월드, 분류, 조건) 조합을 저장하고, 이벤트를 받을 채널을 골라냅니다.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;

use super::diff::{HuntEvent, HuntEventKind};
use crate::config::SubscriptionConfig;
use crate::error::SubscriptionError;
use crate::horus::service::normalize_world;
use crate::horus::HuntSnapshot;
use crate::marks::Expansion;

bitflags::bitflags! {
    /// 알림 조건
    pub struct Conditions: u8 {
        const DEATHS = 0b001;
        const OPENINGS = 0b010;
        const MAXED = 0b100;
    }
}

impl Conditions {
    pub fn for_event(kind: HuntEventKind) -> Self {
        match kind {
            HuntEventKind::Died => Conditions::DEATHS,
            HuntEventKind::Opened => Conditions::OPENINGS,
            HuntEventKind::Maxed => Conditions::MAXED,
        }
    }
}

/// "all" 또는 "deaths, openings" 형태
impl FromStr for Conditions {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut conditions = Conditions::empty();
        for token in s.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
            conditions |= match token.to_lowercase().as_str() {
                "all" => Conditions::all(),
                "deaths" | "death" => Conditions::DEATHS,
                "openings" | "opening" | "open" => Conditions::OPENINGS,
                "maxed" | "forced" => Conditions::MAXED,
                _ => return Err(SubscriptionError::UnknownCondition(token.to_string())),
            };
        }

        if conditions.is_empty() {
            Ok(Conditions::all())
        } else {
            Ok(conditions)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    S,
    A,
    B,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
        }
    }

    fn parse(s: &str) -> Option<Rank> {
        match s.trim().to_uppercase().as_str() {
            "S" => Some(Rank::S),
            "A" => Some(Rank::A),
            "B" => Some(Rank::B),
            _ => None,
        }
    }
}

/// 구독 분류: 확장팩과 랭크. 비어 있는 쪽은 전체를 뜻합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Category {
    pub expansion: Option<Expansion>,
    pub rank: Option<Rank>,
}

impl Category {
    pub const ALL: Category = Category {
        expansion: None,
        rank: None,
    };

    pub fn new(expansion: Option<Expansion>, rank: Option<Rank>) -> Self {
        Self { expansion, rank }
    }

    pub fn for_rank(rank: Rank) -> Self {
        Self::new(None, Some(rank))
    }

    pub fn matches(&self, hunt: &HuntSnapshot) -> bool {
        self.rank
            .map_or(true, |rank| hunt.rank.trim().eq_ignore_ascii_case(rank.as_str()))
            && self
                .expansion
                .map_or(true, |expansion| hunt.expansion() == Some(expansion))
    }
}

/// "all", "S", "SB", "SB_S" 형태
impl FromStr for Category {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("all") {
            return Ok(Category::ALL);
        }

        let unknown = || SubscriptionError::UnknownCategory(s.to_string());
        match token.split_once(|c: char| c == '_' || c == '-') {
            Some((expansion, rank)) => {
                let expansion = Expansion::parse(expansion).ok_or_else(unknown)?;
                let rank = match rank.trim() {
                    r if r.eq_ignore_ascii_case("all") => None,
                    r => Some(Rank::parse(r).ok_or_else(unknown)?),
                };
                Ok(Category::new(Some(expansion), rank))
            }
            None => match (Rank::parse(token), Expansion::parse(token)) {
                (Some(rank), _) => Ok(Category::for_rank(rank)),
                (None, Some(expansion)) => Ok(Category::new(Some(expansion), None)),
                (None, None) => Err(unknown()),
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.expansion, self.rank) {
            (None, None) => f.write_str("ALL"),
            (None, Some(rank)) => f.write_str(rank.as_str()),
            (Some(expansion), None) => f.write_str(expansion.as_str()),
            (Some(expansion), Some(rank)) => write!(f, "{}_{}", expansion, rank.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub world: String,
    pub category: Category,
    pub conditions: Conditions,
}

impl Subscription {
    pub fn matches(&self, event: &HuntEvent) -> bool {
        self.world == event.hunt.world
            && self.category.matches(&event.hunt)
            && self.conditions.contains(Conditions::for_event(event.kind))
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{:?}]", self.world, self.category, self.conditions)
    }
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    channels: RwLock<HashMap<u64, Vec<Subscription>>>,
}

impl Subscriptions {
    /// 같은 (월드, 분류) 구독이 있으면 조건을 교체합니다.
    pub async fn subscribe(&self, channel: u64, world: &str, category: Category, conditions: Conditions) {
        let subscription = Subscription {
            world: normalize_world(world),
            category,
            conditions,
        };
        tracing::info!("Channel {} subscribed to {}", channel, subscription);

        let mut channels = self.channels.write().await;
        let subs = channels.entry(channel).or_default();
        subs.retain(|s| !(s.world == subscription.world && s.category == subscription.category));
        subs.push(subscription);
    }

    /// 데이터센터의 모든 월드 구독. 등록한 월드 수를 반환합니다.
    pub async fn subscribe_all(
        &self,
        channel: u64,
        data_center: &str,
        category: Category,
        conditions: Conditions,
    ) -> Result<usize, SubscriptionError> {
        let worlds = crate::worlds::worlds_in(data_center)
            .ok_or_else(|| SubscriptionError::UnknownDataCenter(data_center.to_string()))?;

        for world in worlds {
            self.subscribe(channel, world, category, conditions).await;
        }
        Ok(worlds.len())
    }

    /// 구독 해제. 실제로 지운 항목이 있었는지 반환합니다.
    pub async fn unsubscribe(&self, channel: u64, world: &str, category: Category) -> bool {
        let world = normalize_world(world);
        let mut channels = self.channels.write().await;

        let Some(subs) = channels.get_mut(&channel) else {
            return false;
        };
        let before = subs.len();
        subs.retain(|s| !(s.world == world && s.category == category));
        let removed = subs.len() != before;

        if subs.is_empty() {
            channels.remove(&channel);
        }
        removed
    }

    pub async fn list(&self, channel: u64) -> Result<Vec<Subscription>, SubscriptionError> {
        self.channels
            .read()
            .await
            .get(&channel)
            .filter(|subs| !subs.is_empty())
            .cloned()
            .ok_or(SubscriptionError::NoSubscriptions(channel))
    }

    pub async fn clear(&self, channel: u64) -> Result<(), SubscriptionError> {
        match self.channels.write().await.remove(&channel) {
            Some(_) => {
                tracing::info!("Cleared subscriptions for channel {}", channel);
                Ok(())
            }
            None => Err(SubscriptionError::NoSubscriptions(channel)),
        }
    }

    /// 이벤트를 받아야 하는 채널 목록 (정렬됨)
    pub async fn recipients(&self, event: &HuntEvent) -> Vec<u64> {
        let mut recipients: Vec<u64> = self
            .channels
            .read()
            .await
            .iter()
            .filter(|(_, subs)| subs.iter().any(|s| s.matches(event)))
            .map(|(channel, _)| *channel)
            .collect();
        recipients.sort_unstable();
        recipients
    }

    /// 하나 이상의 채널이 구독 중인 월드
    pub async fn worlds(&self) -> BTreeSet<String> {
        self.channels
            .read()
            .await
            .values()
            .flatten()
            .map(|s| s.world.clone())
            .collect()
    }

    /// 설정 파일의 `[[subscriptions]]` 항목 등록
    pub async fn apply(&self, config: &SubscriptionConfig) -> Result<(), SubscriptionError> {
        let category: Category = config.category.parse()?;
        let conditions: Conditions = config.conditions.parse()?;

        if let Some(world) = &config.world {
            self.subscribe(config.channel, world, category, conditions).await;
        }
        if let Some(data_center) = &config.data_center {
            self.subscribe_all(config.channel, data_center, category, conditions).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horus::HuntStatus;

    fn hunt(world: &str, rank: &str, zone: &str, region: &str) -> HuntSnapshot {
        HuntSnapshot {
            name: "Zona Seeker".into(),
            instance: 0,
            rank: rank.into(),
            image: String::new(),
            zone: zone.into(),
            region: region.into(),
            spawn_trigger: String::new(),
            tips: String::new(),
            world: world.into(),
            min_respawn: 0,
            max_respawn: 0,
            last_death: None,
            open_date: 0,
            max_date: 0,
            last_alive: None,
            last_try: None,
            last_try_user: None,
            last_mark: None,
            status: HuntStatus::Open,
        }
    }

    fn event(world: &str, rank: &str, kind: HuntEventKind) -> HuntEvent {
        HuntEvent {
            kind,
            hunt: hunt(world, rank, "Western Thanalan", "Thanalan"),
        }
    }

    #[test]
    fn parses_conditions() {
        assert_eq!("all".parse::<Conditions>().unwrap(), Conditions::all());
        assert_eq!("".parse::<Conditions>().unwrap(), Conditions::all());
        assert_eq!(
            "Deaths, openings".parse::<Conditions>().unwrap(),
            Conditions::DEATHS | Conditions::OPENINGS
        );
        assert!(matches!(
            "finds".parse::<Conditions>(),
            Err(SubscriptionError::UnknownCondition(token)) if token == "finds"
        ));
    }

    #[test]
    fn parses_categories() {
        assert_eq!("all".parse::<Category>().unwrap(), Category::ALL);
        assert_eq!("".parse::<Category>().unwrap(), Category::ALL);
        assert_eq!("s".parse::<Category>().unwrap(), Category::for_rank(Rank::S));
        assert_eq!(
            "SB_A".parse::<Category>().unwrap(),
            Category::new(Some(Expansion::Sb), Some(Rank::A))
        );
        assert_eq!(
            "arr_s".parse::<Category>().unwrap(),
            Category::new(Some(Expansion::Arr), Some(Rank::S))
        );
        assert_eq!("HW".parse::<Category>().unwrap(), Category::new(Some(Expansion::Hw), None));
        assert_eq!("HW_all".parse::<Category>().unwrap(), Category::new(Some(Expansion::Hw), None));

        for bad in ["SS", "SHB_S", "SB_C", "_S"] {
            assert!(matches!(
                bad.parse::<Category>(),
                Err(SubscriptionError::UnknownCategory(token)) if token == bad
            ));
        }
    }

    #[test]
    fn category_display_matches_input_form() {
        for token in ["ALL", "S", "SB", "SB_S", "ARR_A", "HW_B"] {
            assert_eq!(token.parse::<Category>().unwrap().to_string(), token);
        }
    }

    #[test]
    fn category_filters_by_expansion_and_rank() {
        let zona_seeker = hunt("Zalera", "S", "Western Thanalan", "Thanalan");
        let kaiser = hunt("Zalera", "S", "Coerthas Western Highlands", "Coerthas");
        let orcus = hunt("Zalera", "A", "The Peaks", "Gyr Abania");
        let unknown = hunt("Zalera", "S", "Somewhere", "Nowhere");

        let sb_s: Category = "SB_S".parse().unwrap();
        assert!(!sb_s.matches(&zona_seeker));
        assert!(!sb_s.matches(&orcus));

        let sb_a: Category = "SB_A".parse().unwrap();
        assert!(sb_a.matches(&orcus));

        let hw_s: Category = "HW_S".parse().unwrap();
        assert!(hw_s.matches(&kaiser));
        assert!(!hw_s.matches(&zona_seeker));

        let arr_s: Category = "ARR_S".parse().unwrap();
        assert!(arr_s.matches(&zona_seeker));
        assert!(!arr_s.matches(&unknown));

        let s: Category = "S".parse().unwrap();
        assert!(s.matches(&unknown) && s.matches(&kaiser) && !s.matches(&orcus));
        assert!(Category::ALL.matches(&unknown));
    }

    #[tokio::test]
    async fn recipients_match_world_category_and_condition() {
        let subs = Subscriptions::default();
        subs.subscribe(1, "zalera", Category::for_rank(Rank::S), Conditions::DEATHS).await;
        subs.subscribe(2, "Zalera", Category::ALL, Conditions::all()).await;
        subs.subscribe(3, "Balmung", Category::ALL, Conditions::all()).await;
        subs.subscribe(4, "Zalera", "SB_S".parse().unwrap(), Conditions::all()).await;
        subs.subscribe(5, "Zalera", "ARR_S".parse().unwrap(), Conditions::all()).await;

        assert_eq!(subs.recipients(&event("Zalera", "S", HuntEventKind::Died)).await, vec![1, 2, 5]);
        assert_eq!(subs.recipients(&event("Zalera", "S", HuntEventKind::Opened)).await, vec![2, 5]);
        assert_eq!(subs.recipients(&event("Zalera", "A", HuntEventKind::Died)).await, vec![2]);
        assert_eq!(subs.recipients(&event("Balmung", "B", HuntEventKind::Maxed)).await, vec![3]);

        let udumbara = HuntEvent {
            kind: HuntEventKind::Died,
            hunt: hunt("Zalera", "S", "The Fringes", "Gyr Abania"),
        };
        assert_eq!(subs.recipients(&udumbara).await, vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn resubscribe_replaces_conditions() {
        let subs = Subscriptions::default();
        subs.subscribe(1, "Zalera", Category::for_rank(Rank::S), Conditions::DEATHS).await;
        subs.subscribe(1, "Zalera", Category::for_rank(Rank::S), Conditions::OPENINGS).await;
        subs.subscribe(1, "Zalera", "SB_S".parse().unwrap(), Conditions::DEATHS).await;

        let list = subs.list(1).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].conditions, Conditions::OPENINGS);
        assert_eq!(list[1].to_string(), "Zalera SB_S [DEATHS]");
    }

    #[tokio::test]
    async fn subscribe_all_expands_data_center() {
        let subs = Subscriptions::default();
        let count = subs.subscribe_all(7, "crystal", Category::ALL, Conditions::all()).await.unwrap();

        assert_eq!(count, 8);
        assert!(subs.worlds().await.contains("Zalera"));
        assert!(matches!(
            subs.subscribe_all(7, "Shadow", Category::ALL, Conditions::all()).await,
            Err(SubscriptionError::UnknownDataCenter(_))
        ));
    }

    #[tokio::test]
    async fn unsubscribe_and_clear() {
        let subs = Subscriptions::default();
        subs.subscribe(1, "Zalera", Category::ALL, Conditions::all()).await;
        subs.subscribe(1, "Zalera", "HW_A".parse().unwrap(), Conditions::all()).await;
        subs.subscribe(1, "Balmung", Category::ALL, Conditions::all()).await;

        assert!(subs.unsubscribe(1, "zalera", Category::ALL).await);
        assert!(!subs.unsubscribe(1, "zalera", Category::ALL).await);
        assert!(subs.unsubscribe(1, "Zalera", "hw_a".parse().unwrap()).await);
        assert_eq!(subs.list(1).await.unwrap().len(), 1);

        subs.clear(1).await.unwrap();
        assert!(matches!(subs.list(1).await, Err(SubscriptionError::NoSubscriptions(1))));
        assert!(subs.clear(1).await.is_err());
    }

    #[tokio::test]
    async fn applies_config_entries() {
        let subs = Subscriptions::default();
        let config = SubscriptionConfig {
            channel: 9,
            world: Some("zalera".into()),
            data_center: None,
            category: "SB_S".into(),
            conditions: "deaths".into(),
        };
        subs.apply(&config).await.unwrap();

        let list = subs.list(9).await.unwrap();
        assert_eq!(list[0].to_string(), "Zalera SB_S [DEATHS]");

        let bad = SubscriptionConfig {
            category: "SHB_S".into(),
            ..config
        };
        assert!(matches!(subs.apply(&bad).await, Err(SubscriptionError::UnknownCategory(_))));
    }
}
