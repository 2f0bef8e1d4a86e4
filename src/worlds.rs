//! 월드 ↔ 데이터센터 매핑
//!
//! `sub-all` 처럼 데이터센터 단위 요청을 월드 목록으로 풀 때 사용합니다.

use maplit::hashmap;
use std::collections::HashMap;

lazy_static::lazy_static! {
    /// 데이터센터 → 월드 목록
    pub static ref DATA_CENTERS: HashMap<&'static str, &'static [&'static str]> = hashmap! {
        // NA
        "Aether" => &["Adamantoise", "Cactuar", "Faerie", "Gilgamesh", "Jenova", "Midgardsormr", "Sargatanas", "Siren"] as &[&str],
        "Primal" => &["Behemoth", "Excalibur", "Exodus", "Famfrit", "Hyperion", "Lamia", "Leviathan", "Ultros"] as &[&str],
        "Crystal" => &["Balmung", "Brynhildr", "Coeurl", "Diabolos", "Goblin", "Malboro", "Mateus", "Zalera"] as &[&str],
        "Dynamis" => &["Cuchulainn", "Golem", "Halicarnassus", "Kraken", "Maduin", "Marilith", "Rafflesia", "Seraph"] as &[&str],
        // EU
        "Chaos" => &["Cerberus", "Louisoix", "Moogle", "Omega", "Phantom", "Ragnarok", "Sagittarius", "Spriggan"] as &[&str],
        "Light" => &["Alpha", "Lich", "Odin", "Phoenix", "Raiden", "Shiva", "Twintania", "Zodiark"] as &[&str],
        // OCE
        "Materia" => &["Bismarck", "Ravana", "Sephirot", "Sophia", "Zurvan"] as &[&str],
        // JP
        "Elemental" => &["Aegis", "Atomos", "Carbuncle", "Garuda", "Gungnir", "Kujata", "Tonberry", "Typhon"] as &[&str],
        "Gaia" => &["Alexander", "Bahamut", "Durandal", "Fenrir", "Ifrit", "Ridill", "Tiamat", "Ultima"] as &[&str],
        "Mana" => &["Anima", "Asura", "Chocobo", "Hades", "Ixion", "Masamune", "Pandaemonium", "Titan"] as &[&str],
        "Meteor" => &["Belias", "Mandragora", "Ramuh", "Shinryu", "Unicorn", "Valefor", "Yojimbo", "Zeromus"] as &[&str],
    };
}

/// 데이터센터 이름으로 월드 목록 조회 (대소문자 무시)
pub fn worlds_in(data_center: &str) -> Option<&'static [&'static str]> {
    let data_center = data_center.trim();
    DATA_CENTERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(data_center))
        .map(|(_, worlds)| *worlds)
}

/// 월드가 속한 데이터센터
pub fn data_center_of(world: &str) -> Option<&'static str> {
    let world = world.trim();
    DATA_CENTERS
        .iter()
        .find(|(_, worlds)| worlds.iter().any(|w| w.eq_ignore_ascii_case(world)))
        .map(|(name, _)| *name)
}
